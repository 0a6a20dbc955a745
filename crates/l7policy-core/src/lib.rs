//! L7 policy core - canonical policy model and structural diff
//!
//! This crate turns L7 traffic-policy documents (desired state from
//! configuration, or the reference-wrapped graph read back from the device)
//! into a canonical [`Policy`] tree and decides whether two trees are
//! equivalent:
//! - Document types for desired state ([`document`])
//! - Normalization of the device's `...Reference.items` wrappers ([`normalize`])
//! - Policy, Rule, Action and Condition with scoped equality ([`model`])
//! - Structured diff and semantic digests ([`diff`], [`digest`])
//! - Error facility and structured logging

pub mod diff;
pub mod digest;
pub mod document;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod normalize;

pub use l7policy_core_types as core_types;

// Re-export commonly used types
pub use diff::{
    compare_documents, compare_documents_traced, compute_diff, compute_diff_traced,
    render_human_summary, PolicyDiff,
};
pub use digest::policy_digest;
pub use document::{ActionDoc, ConditionDoc, PolicyDoc, RuleDoc};
pub use errors::{ExError, ExErrorKind, PolicyError, Result};
pub use model::{
    Action, AnyResource, Condition, FieldMismatch, MatchOperator, MatchType, Policy, Resource,
    Rule, UriSelector,
};
pub use normalize::{normalize_collection, normalize_value};
