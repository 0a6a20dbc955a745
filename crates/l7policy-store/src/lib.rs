//! L7 policy store - desired-state and device snapshot documents on disk
//!
//! Provides:
//! - Desired-state document format v0 (YAML or JSON) with validation
//! - Device snapshot loading (single policy or list response)
//! - Building canonical policies from loaded documents

pub mod device;
pub mod document;
pub mod errors;

// Re-export key types
pub use device::{load_device_file, load_device_str};
pub use document::{build_policies, load_desired_file, load_desired_str, DesiredStateV0};
pub use errors::Result;
