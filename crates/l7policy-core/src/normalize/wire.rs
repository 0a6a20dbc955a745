//! Device wire shape

use crate::document::{ActionDoc, ConditionDoc};
use serde::{Deserialize, Serialize};

/// Subcollection wrapper: `{"link": "...", "items": [...]}`
///
/// A wrapper without `items` is an empty collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DevicePolicy {
    pub name: String,
    pub partition: Option<String>,
    pub strategy: Option<String>,
    pub rules_reference: Option<Reference<DeviceRule>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceRule {
    pub name: String,
    pub ordinal: Option<u32>,
    pub actions_reference: Option<Reference<ActionDoc>>,
    pub conditions_reference: Option<Reference<ConditionDoc>>,
}

/// List response for the policy collection endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceCollection {
    pub items: Vec<DevicePolicy>,
}
