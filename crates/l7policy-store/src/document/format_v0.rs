//! Desired-state format v0
//!
//! ```yaml
//! schema_version: 0
//! policies:
//!   - name: api_policy
//!     partition: Common
//!     rules:
//!       - name: r0
//!         actions: [{forward: true, pool: /Common/pool1}]
//!         conditions: [{httpUri: true, path: true, values: [/api]}]
//! ```

use l7policy_core::PolicyDoc;
use serde::{Deserialize, Serialize};

/// Top-level desired-state file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredStateV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    /// Policies to reconcile, one per `(partition, name)`
    #[serde(default)]
    pub policies: Vec<PolicyDoc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let yaml = r#"
schema_version: 0
policies:
  - name: api_policy
    partition: Common
    rules:
      - name: r0
        actions:
          - forward: true
            pool: /Common/pool1
        conditions:
          - httpUri: true
            path: true
            values: ["/api"]
"#;

        let doc: DesiredStateV0 = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(doc.schema_version, 0);
        assert_eq!(doc.policies.len(), 1);
        assert_eq!(doc.policies[0].rules[0].conditions[0].values, vec!["/api"]);
        assert!(doc.policies[0].rules[0].conditions[0].http_uri);
    }

    #[test]
    fn test_policies_default_to_empty() {
        let doc: DesiredStateV0 = serde_yaml::from_str("schema_version: 0\n").unwrap();
        assert!(doc.policies.is_empty());
    }
}
