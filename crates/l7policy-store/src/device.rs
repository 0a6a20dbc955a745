//! Device snapshot documents
//!
//! A snapshot is the JSON the device returned for the policy endpoint:
//! either one policy object, or a list response with the policies under
//! `items`. Either way the result is the normalized document list.

use crate::errors::{document_validation, from_policy_error, io_error, Result};
use l7policy_core::normalize::{normalize_collection, normalize_value};
use l7policy_core::PolicyDoc;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load and normalize a device snapshot file
pub fn load_device_file(path: &Path) -> Result<Vec<PolicyDoc>> {
    let content = fs::read_to_string(path).map_err(|e| io_error("load_device_file", e))?;
    let docs = load_device_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        policy_count = docs.len(),
        "Loaded device snapshot"
    );
    Ok(docs)
}

/// Normalize a device snapshot given as a JSON string
pub fn load_device_str(content: &str) -> Result<Vec<PolicyDoc>> {
    let raw: Value = serde_json::from_str(content).map_err(|e| {
        document_validation("load_device", &format!("JSON parse error: {}", e))
    })?;

    match &raw {
        Value::Object(obj) if obj.contains_key("items") => {
            normalize_collection(&raw).map_err(from_policy_error)
        }
        Value::Object(_) => Ok(vec![normalize_value(&raw).map_err(from_policy_error)?]),
        _ => Err(document_validation(
            "load_device",
            "device snapshot root must be an object",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use l7policy_core::ExErrorKind;

    #[test]
    fn test_single_policy_object() {
        let docs = load_device_str(
            r#"{"name": "p1", "partition": "Common", "rulesReference": {"items": [{"name": "r0"}]}}"#,
        )
        .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].rules[0].name, "r0");
    }

    #[test]
    fn test_list_response() {
        let docs = load_device_str(
            r#"{"kind": "tm:ltm:policy:policycollectionstate", "items": [{"name": "a"}, {"name": "b"}]}"#,
        )
        .unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_empty_list_response() {
        assert!(load_device_str(r#"{"items": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_reject_non_object_root() {
        let err = load_device_str("[1, 2]").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidDocument);
    }

    #[test]
    fn test_reject_invalid_json() {
        let err = load_device_str("{not json").unwrap_err();
        assert!(err.to_string().contains("JSON parse error"));
    }

    #[test]
    fn test_malformed_wrapper_is_serialization_error() {
        let err = load_device_str(r#"{"name": "p1", "rulesReference": {"items": 3}}"#).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
