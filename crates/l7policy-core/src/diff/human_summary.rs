//! Human-readable summary renderer for policy diffs

use crate::diff::model::{DiffClassification, PolicyDiff};

/// Render a Markdown summary of a [`PolicyDiff`]
///
/// Informational only; the structured diff is the source of truth.
pub fn render_human_summary(diff: &PolicyDiff) -> String {
    let mut out = String::new();

    out.push_str(&format!("## Policy Diff: {}\n\n", diff.identity.desired_path));

    let class_label = match diff.classification {
        DiffClassification::Identical => "Identical",
        DiffClassification::Changed => "Changed",
    };
    out.push_str(&format!("**Classification**: {class_label}\n\n"));

    out.push_str("### Identity\n\n");
    out.push_str(&format!(
        "| | Path | Digest |\n\
         |---|---|---|\n\
         | Desired | `{}` | `{}` |\n\
         | Existing | `{}` | `{}` |\n\n",
        diff.identity.desired_path,
        short(&diff.identity.desired_digest),
        diff.identity.existing_path,
        short(&diff.identity.existing_digest),
    ));

    if diff.classification == DiffClassification::Identical {
        out.push_str("_No changes detected._\n");
        return out;
    }

    if let Some(m) = &diff.first_mismatch {
        out.push_str("### First Mismatch\n\n");
        out.push_str(&format!(
            "- **{}**: desired `{}`, existing `{}`\n\n",
            m.location(),
            m.desired,
            m.existing
        ));
    }

    let rc = &diff.rule_changes;
    if !rc.is_empty() {
        out.push_str("### Rule Changes\n\n");
        list_line(&mut out, "Added", &rc.added_rules);
        list_line(&mut out, "Removed", &rc.removed_rules);
        list_line(&mut out, "Changed", &rc.changed_rules);
        if rc.ordering_changed {
            out.push_str("- **Ordering changed**\n");
        }
        out.push('\n');
    }

    out
}

fn list_line(out: &mut String, label: &str, names: &[String]) {
    if !names.is_empty() {
        out.push_str(&format!(
            "- **{} rules** ({}): {}\n",
            label,
            names.len(),
            names.join(", ")
        ));
    }
}

/// First 12 hex characters of a digest
fn short(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::{DiffIdentity, DiffMismatch, RuleChanges};
    use serde_json::json;

    fn diff(classification: DiffClassification) -> PolicyDiff {
        PolicyDiff {
            diff_schema_version: 1,
            identity: DiffIdentity {
                desired_path: "/Common/p1".into(),
                existing_path: "/Common/p1".into(),
                desired_digest: "a".repeat(64),
                existing_digest: "b".repeat(64),
            },
            classification,
            first_mismatch: None,
            rule_changes: RuleChanges::default(),
        }
    }

    #[test]
    fn test_identical_summary() {
        let out = render_human_summary(&diff(DiffClassification::Identical));
        assert!(out.contains("**Classification**: Identical"));
        assert!(out.contains("_No changes detected._"));
        assert!(out.contains("`aaaaaaaaaaaa`"));
    }

    #[test]
    fn test_changed_summary_lists_mismatch_and_rules() {
        let mut d = diff(DiffClassification::Changed);
        d.first_mismatch = Some(DiffMismatch {
            path: "rules[0].conditions[0]".into(),
            field: "values".into(),
            desired: json!(["/api"]),
            existing: json!(["/api2"]),
        });
        d.rule_changes.added_rules = vec!["r1".into()];
        d.rule_changes.ordering_changed = true;

        let out = render_human_summary(&d);
        assert!(out.contains("rules[0].conditions[0].values"));
        assert!(out.contains("desired `[\"/api\"]`"));
        assert!(out.contains("**Added rules** (1): r1"));
        assert!(out.contains("**Ordering changed**"));
        assert!(!out.contains("Removed rules"));
    }

    #[test]
    fn test_short_handles_short_digest() {
        assert_eq!(short("abc"), "abc");
    }
}
