//! Structured policy diff
//!
//! Compares a desired policy against the policy found on the device and
//! produces a deterministic [`PolicyDiff`] for reconciliation decisions and
//! human review.
//!
//! ## Entry point
//!
//! ```ignore
//! use l7policy_core::diff::compute_diff;
//!
//! let diff = compute_diff(&desired, &existing);
//! if !diff.is_equal() {
//!     println!("{}", l7policy_core::diff::render_human_summary(&diff));
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce byte-identical serialized diffs.
//! - **Scoped**: only declared fields take part; device-only attributes never
//!   show up as changes.
//! - **Total**: diffing two built policies never fails.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compare_documents, compare_documents_traced, compute_diff, compute_diff_traced};
pub use human_summary::render_human_summary;
pub use model::{DiffClassification, DiffIdentity, DiffMismatch, PolicyDiff, RuleChanges};
