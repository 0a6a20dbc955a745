//! Policy diff computation
//!
//! [`compute_diff`] compares two built policies; [`compare_documents`] builds
//! both sides first, normalizing the device's reference-wrapped graph.

use crate::core_types::{RequestContext, TraceId};
use crate::diff::model::{
    DiffClassification, DiffIdentity, DiffMismatch, PolicyDiff, RuleChanges, DIFF_SCHEMA_VERSION,
};
use crate::digest::policy_digest;
use crate::document::PolicyDoc;
use crate::errors::{ExError, Result};
use crate::model::{Policy, Resource, Rule};
use crate::normalize::normalize_value;
use crate::{log_op_end, log_op_error, log_op_start};
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Instant;

/// Compute a set-delta between two ordered name lists
///
/// Returns `(added, removed)`: added = in `desired` but not `existing`,
/// removed = in `existing` but not `desired`. Input order is kept.
fn set_delta(desired: &[&str], existing: &[&str]) -> (Vec<String>, Vec<String>) {
    let set_d: BTreeSet<&str> = desired.iter().copied().collect();
    let set_e: BTreeSet<&str> = existing.iter().copied().collect();
    let added = desired
        .iter()
        .filter(|s| !set_e.contains(*s))
        .map(|s| s.to_string())
        .collect();
    let removed = existing
        .iter()
        .filter(|s| !set_d.contains(*s))
        .map(|s| s.to_string())
        .collect();
    (added, removed)
}

fn rule_changes(desired: &[Rule], existing: &[Rule]) -> RuleChanges {
    let d_names: Vec<&str> = desired.iter().map(|r| r.name()).collect();
    let e_names: Vec<&str> = existing.iter().map(|r| r.name()).collect();
    let (added_rules, removed_rules) = set_delta(&d_names, &e_names);

    let changed_rules = desired
        .iter()
        .filter_map(|d| {
            existing
                .iter()
                .find(|e| e.name() == d.name())
                .filter(|e| !d.equals(e))
                .map(|_| d.name().to_string())
        })
        .collect();

    let common_d: Vec<&str> = d_names
        .iter()
        .copied()
        .filter(|n| e_names.contains(n))
        .collect();
    let common_e: Vec<&str> = e_names
        .iter()
        .copied()
        .filter(|n| d_names.contains(n))
        .collect();

    RuleChanges {
        added_rules,
        removed_rules,
        changed_rules,
        ordering_changed: common_d != common_e,
    }
}

/// Compute the structured diff of `desired` against `existing`
///
/// Never fails. The verdict matches `desired.equals(existing)`; the first
/// mismatch is reported in comparison order (policy fields, then rules).
pub fn compute_diff(desired: &Policy, existing: &Policy) -> PolicyDiff {
    let start = Instant::now();
    let desired_path = desired.full_path();
    log_op_start!("compute_diff", policy = %desired_path);

    let diff = diff_policies(desired, existing);

    log_op_end!(
        "compute_diff",
        duration_ms = start.elapsed().as_millis() as u64,
        policy = %desired_path,
        equal = diff.is_equal()
    );
    diff
}

/// [`compute_diff`] with the request correlation ids on its log events
pub fn compute_diff_traced(ctx: &RequestContext, desired: &Policy, existing: &Policy) -> PolicyDiff {
    let start = Instant::now();
    let desired_path = desired.full_path();
    let trace_id = ctx.trace_id.as_ref().map_or("", TraceId::as_str);
    log_op_start!(
        "compute_diff",
        policy = %desired_path,
        request_id = ctx.request_id.as_str(),
        trace_id = trace_id
    );

    let diff = diff_policies(desired, existing);

    log_op_end!(
        "compute_diff",
        duration_ms = start.elapsed().as_millis() as u64,
        policy = %desired_path,
        request_id = ctx.request_id.as_str(),
        trace_id = trace_id,
        equal = diff.is_equal()
    );
    diff
}

fn diff_policies(desired: &Policy, existing: &Policy) -> PolicyDiff {
    let first_mismatch = desired.first_mismatch(existing).map(DiffMismatch::from);
    let classification = if first_mismatch.is_none() {
        DiffClassification::Identical
    } else {
        DiffClassification::Changed
    };
    PolicyDiff {
        diff_schema_version: DIFF_SCHEMA_VERSION,
        identity: DiffIdentity {
            desired_path: desired.full_path(),
            existing_path: existing.full_path(),
            desired_digest: policy_digest(desired),
            existing_digest: policy_digest(existing),
        },
        classification,
        first_mismatch,
        rule_changes: rule_changes(desired.rules(), existing.rules()),
    }
}

/// Build the desired policy and the normalized device policy, then diff them
///
/// # Errors
///
/// Any construction error from either side (invalid condition, missing
/// identity, duplicate ordinal), or `Serialization` if the device value does
/// not have the device policy shape.
pub fn compare_documents(desired: &PolicyDoc, device: &Value) -> Result<PolicyDiff> {
    let start = Instant::now();
    log_op_start!("compare_documents", policy = %desired.name);

    let result = build_both(desired, device);
    match result {
        Ok((d, e)) => {
            let diff = compute_diff(&d, &e);
            log_op_end!(
                "compare_documents",
                duration_ms = start.elapsed().as_millis() as u64
            );
            Ok(diff)
        }
        Err(err) => {
            log_op_error!(
                "compare_documents",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

/// [`compare_documents`] under a request context
///
/// The log events carry `request_id` and `trace_id`, and a construction
/// error is returned as an [`ExError`] stamped with both ids.
///
/// # Errors
///
/// Same failures as [`compare_documents`], converted to [`ExError`].
pub fn compare_documents_traced(
    ctx: &RequestContext,
    desired: &PolicyDoc,
    device: &Value,
) -> std::result::Result<PolicyDiff, ExError> {
    let start = Instant::now();
    let trace_id = ctx.trace_id.as_ref().map_or("", TraceId::as_str);
    log_op_start!(
        "compare_documents",
        policy = %desired.name,
        request_id = ctx.request_id.as_str(),
        trace_id = trace_id
    );

    match build_both(desired, device) {
        Ok((d, e)) => {
            let diff = compute_diff_traced(ctx, &d, &e);
            log_op_end!(
                "compare_documents",
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = ctx.request_id.as_str(),
                trace_id = trace_id
            );
            Ok(diff)
        }
        Err(err) => {
            let mut ex_err = ExError::from(err).with_request_id(ctx.request_id.clone());
            if let Some(trace) = &ctx.trace_id {
                ex_err = ex_err.with_trace_id(trace.clone());
            }
            log_op_error!(
                "compare_documents",
                ex_err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = ctx.request_id.as_str(),
                trace_id = trace_id
            );
            Err(ex_err)
        }
    }
}

fn build_both(desired: &PolicyDoc, device: &Value) -> Result<(Policy, Policy)> {
    let desired = Policy::new(desired)?;
    let existing = Policy::new(&normalize_value(device)?)?;
    Ok((desired, existing))
}
