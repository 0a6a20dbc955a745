//! Desired-state documents
//!
//! Provides:
//! - Format v0 schema
//! - YAML/JSON parser with validation
//! - Policy building from a validated document

pub mod format_v0;
pub mod parser;

pub use format_v0::DesiredStateV0;
pub use parser::{build_policies, load_desired_file, load_desired_str};
