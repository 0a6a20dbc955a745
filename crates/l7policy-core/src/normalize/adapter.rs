//! Flattening of device documents into canonical documents

use crate::document::{PolicyDoc, RuleDoc};
use crate::errors::Result;
use crate::normalize::wire::{DeviceCollection, DevicePolicy, DeviceRule, Reference};
use serde_json::Value;

fn items<T>(reference: Option<Reference<T>>) -> Vec<T> {
    reference.map(|r| r.items).unwrap_or_default()
}

fn normalize_rule(rule: DeviceRule) -> RuleDoc {
    RuleDoc {
        name: rule.name,
        ordinal: rule.ordinal,
        actions: items(rule.actions_reference),
        conditions: items(rule.conditions_reference),
    }
}

/// Flatten a typed device policy
///
/// The device-contract attributes are not carried over; the model forces
/// them anyway.
pub fn normalize_policy(policy: DevicePolicy) -> PolicyDoc {
    PolicyDoc {
        name: policy.name,
        partition: policy.partition,
        strategy: policy.strategy,
        rules: items(policy.rules_reference)
            .into_iter()
            .map(normalize_rule)
            .collect(),
        ..Default::default()
    }
}

/// Flatten a raw device policy object
///
/// # Errors
///
/// `Serialization` if the value is not an object of the device policy shape
/// (for example a wrapper whose `items` is not a list).
pub fn normalize_value(raw: &Value) -> Result<PolicyDoc> {
    let policy: DevicePolicy = serde_json::from_value(raw.clone())?;
    Ok(normalize_policy(policy))
}

/// Flatten a raw collection response (`{"items": [...]}`)
///
/// # Errors
///
/// `Serialization` if the value does not have the collection shape.
pub fn normalize_collection(raw: &Value) -> Result<Vec<PolicyDoc>> {
    let collection: DeviceCollection = serde_json::from_value(raw.clone())?;
    Ok(collection.items.into_iter().map(normalize_policy).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_rules_reference_is_empty() {
        let doc = normalize_value(&json!({
            "name": "fresh",
            "partition": "Common",
            "strategy": "/Common/first-match"
        }))
        .unwrap();
        assert!(doc.rules.is_empty());
        assert_eq!(doc.partition.as_deref(), Some("Common"));
    }

    #[test]
    fn test_missing_items_and_subreferences_are_empty() {
        let doc = normalize_value(&json!({
            "name": "p1",
            "partition": "Common",
            "rulesReference": {
                "link": "https://localhost/mgmt/tm/ltm/policy/~Common~p1/rules",
                "items": [{"name": "r0", "ordinal": 0, "actionsReference": {"link": "x"}}]
            }
        }))
        .unwrap();
        assert_eq!(doc.rules.len(), 1);
        assert!(doc.rules[0].actions.is_empty());
        assert!(doc.rules[0].conditions.is_empty());
        assert_eq!(doc.rules[0].ordinal, Some(0));
    }

    #[test]
    fn test_items_pulled_inline() {
        let doc = normalize_value(&json!({
            "name": "p1",
            "partition": "Common",
            "fullPath": "/Common/p1",
            "rulesReference": {"items": [{
                "name": "r0",
                "fullPath": "r0",
                "actionsReference": {"items": [
                    {"name": "0", "forward": true, "pool": "/Common/pool1", "request": true}
                ]},
                "conditionsReference": {"items": [
                    {"name": "0", "index": 0, "httpUri": true, "path": true, "values": ["/api"]}
                ]}
            }]}
        }))
        .unwrap();
        let rule = &doc.rules[0];
        assert_eq!(rule.actions[0].pool.as_deref(), Some("/Common/pool1"));
        assert!(rule.conditions[0].http_uri);
        assert_eq!(rule.conditions[0].values, vec!["/api".to_string()]);
    }

    #[test]
    fn test_non_list_items_is_error() {
        let result = normalize_value(&json!({
            "name": "p1",
            "rulesReference": {"items": "not-a-list"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_collection_flattens_each_policy() {
        let docs = normalize_collection(&json!({
            "kind": "tm:ltm:policy:policycollectionstate",
            "items": [
                {"name": "a", "partition": "Common"},
                {"name": "b", "partition": "Tenant"}
            ]
        }))
        .unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
