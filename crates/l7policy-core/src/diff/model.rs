//! Policy diff output types
//!
//! Collections are sorted `Vec`s so serialization is deterministic.

use crate::model::FieldMismatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current value of [`PolicyDiff::diff_schema_version`]
pub const DIFF_SCHEMA_VERSION: u32 = 1;

/// The structured diff between a desired and an existing policy
///
/// Every sub-struct is populated even when nothing changed (empty lists,
/// `false` flags) so consumers can process diffs uniformly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyDiff {
    pub diff_schema_version: u32,
    pub identity: DiffIdentity,
    pub classification: DiffClassification,
    /// First differing declared field in comparison order, `None` when identical
    pub first_mismatch: Option<DiffMismatch>,
    pub rule_changes: RuleChanges,
}

impl PolicyDiff {
    /// The equality verdict: `true` when the device needs no update
    pub fn is_equal(&self) -> bool {
        self.classification == DiffClassification::Identical
    }
}

/// Paths and semantic digests of both sides
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiffIdentity {
    pub desired_path: String,
    pub existing_path: String,
    pub desired_digest: String,
    pub existing_digest: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DiffClassification {
    /// Every declared field matches
    Identical,
    /// At least one declared field differs
    Changed,
}

/// First differing field, labelled by side
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiffMismatch {
    /// Location of the resource inside the policy, e.g. `rules[0].conditions[0]`
    pub path: String,
    pub field: String,
    pub desired: Value,
    pub existing: Value,
}

impl DiffMismatch {
    /// `path.field`, or just `field` at the policy level
    pub fn location(&self) -> String {
        if self.path.is_empty() {
            self.field.clone()
        } else {
            format!("{}.{}", self.path, self.field)
        }
    }
}

/// Mismatch computed as `desired.first_mismatch(existing)`
impl From<FieldMismatch> for DiffMismatch {
    fn from(m: FieldMismatch) -> Self {
        Self {
            path: m.path,
            field: m.field,
            desired: m.ours,
            existing: m.theirs,
        }
    }
}

/// Rule-level changes, keyed by rule name
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuleChanges {
    /// Rules only in the desired policy, in ordinal order
    pub added_rules: Vec<String>,
    /// Rules only on the device, in ordinal order
    pub removed_rules: Vec<String>,
    /// Rules on both sides whose content differs, in desired ordinal order
    pub changed_rules: Vec<String>,
    /// True if rules present on both sides appear in a different order
    pub ordering_changed: bool,
}

impl RuleChanges {
    pub fn is_empty(&self) -> bool {
        self.added_rules.is_empty()
            && self.removed_rules.is_empty()
            && self.changed_rules.is_empty()
            && !self.ordering_changed
    }
}
