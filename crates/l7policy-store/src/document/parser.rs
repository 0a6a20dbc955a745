//! Desired-state parser with validation
//!
//! Parses YAML or JSON and validates the schema version and policy identity
//! uniqueness. Rule- and condition-level checks happen when policies are built.

use crate::document::format_v0::DesiredStateV0;
use crate::errors::{document_validation, from_policy_error, io_error, Result};
use l7policy_core::{Policy, Resource};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a desired-state file
///
/// `.json` files are read as JSON, everything else as YAML.
pub fn load_desired_file(path: &Path) -> Result<DesiredStateV0> {
    let content = fs::read_to_string(path).map_err(|e| io_error("load_desired_file", e))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let doc = if is_json {
        serde_json::from_str(&content).map_err(|e| {
            document_validation("load_desired_file", &format!("JSON parse error: {}", e))
        })?
    } else {
        parse_yaml(&content)?
    };

    validate_document(&doc)?;
    tracing::debug!(
        path = %path.display(),
        policy_count = doc.policies.len(),
        "Loaded desired state"
    );
    Ok(doc)
}

/// Parse a desired-state document from a YAML (or JSON) string
pub fn load_desired_str(content: &str) -> Result<DesiredStateV0> {
    let doc = parse_yaml(content)?;
    validate_document(&doc)?;
    Ok(doc)
}

fn parse_yaml(content: &str) -> Result<DesiredStateV0> {
    serde_yaml::from_str(content)
        .map_err(|e| document_validation("load_desired", &format!("YAML parse error: {}", e)))
}

/// Validate a parsed document
fn validate_document(doc: &DesiredStateV0) -> Result<()> {
    if doc.schema_version != 0 {
        return Err(document_validation(
            "validate_desired",
            &format!(
                "Unsupported schema_version: {}. Expected 0",
                doc.schema_version
            ),
        ));
    }

    let mut seen = HashSet::new();
    for policy in &doc.policies {
        let partition = policy.partition.as_deref().unwrap_or_default();
        if !seen.insert((partition, policy.name.as_str())) {
            return Err(document_validation(
                "validate_desired",
                &format!("Duplicate policy /{}/{}", partition, policy.name),
            ));
        }
    }

    Ok(())
}

/// Build the canonical policy for every entry of a desired-state document
///
/// Stops at the first policy that fails to build; the error keeps the
/// structured kind, entity and ordinal of the model error.
pub fn build_policies(doc: &DesiredStateV0) -> Result<Vec<Policy>> {
    let policies = doc
        .policies
        .iter()
        .map(|p| Policy::new(p).map_err(from_policy_error))
        .collect::<Result<Vec<_>>>()?;

    for policy in &policies {
        tracing::debug!(
            policy = %policy.full_path(),
            kind = Policy::KIND,
            rule_count = policy.rules().len(),
            "Built desired policy"
        );
    }
    Ok(policies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use l7policy_core::ExErrorKind;

    #[test]
    fn test_parse_valid_document() {
        let yaml = r#"
schema_version: 0
policies:
  - name: p1
    partition: Common
"#;

        let result = load_desired_str(yaml);
        assert!(result.is_ok());
    }

    #[test]
    fn test_json_content_accepted_as_yaml() {
        let json = r#"{"schema_version": 0, "policies": [{"name": "p1", "partition": "Common"}]}"#;
        let doc = load_desired_str(json).unwrap();
        assert_eq!(doc.policies[0].name, "p1");
    }

    #[test]
    fn test_reject_invalid_schema_version() {
        let err = load_desired_str("schema_version: 99\npolicies: []\n").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidDocument);
        assert!(err.to_string().contains("schema_version"));
    }

    #[test]
    fn test_reject_duplicate_policy() {
        let yaml = r#"
schema_version: 0
policies:
  - name: p1
    partition: Common
  - name: p1
    partition: Common
"#;

        let err = load_desired_str(yaml).unwrap_err();
        assert!(err.to_string().contains("Duplicate policy /Common/p1"));
    }

    #[test]
    fn test_same_name_in_different_partitions_allowed() {
        let yaml = r#"
schema_version: 0
policies:
  - name: p1
    partition: Common
  - name: p1
    partition: Tenant
"#;

        let doc = load_desired_str(yaml).unwrap();
        let policies = build_policies(&doc).unwrap();
        assert_eq!(policies.len(), 2);
        assert_eq!(policies[1].full_path(), "/Tenant/p1");
    }

    #[test]
    fn test_build_error_keeps_structured_kind() {
        let yaml = r#"
schema_version: 0
policies:
  - name: p1
    partition: Common
    rules:
      - name: r0
        conditions:
          - values: [x]
"#;

        let doc = load_desired_str(yaml).unwrap();
        let err = build_policies(&doc).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidCondition);
        assert_eq!(err.entity(), Some("/Common/p1/r0/conditions/0"));
    }
}
