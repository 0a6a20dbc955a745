//! Canonical document shape
//!
//! Desired-state documents and normalized device documents both deserialize
//! into these types, and the model constructors consume nothing else. Fields
//! the model does not declare are dropped by serde, which is what keeps
//! device-injected attributes (`fullPath`, `selfLink`, `generation`, ...) out
//! of every comparison.
//!
//! Field names follow the device API (camelCase).

use serde::{Deserialize, Serialize};

/// A policy as declared by the user, or as flattened from the device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyDoc {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,

    /// Matching strategy, e.g. `/Common/first-match`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Accepted on input for round-tripping; the model always forces `true`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy: Option<bool>,

    /// Accepted on input for round-tripping; the model always forces `["forwarding"]`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<String>,

    /// Accepted on input for round-tripping; the model always forces `["http"]`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,

    pub rules: Vec<RuleDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleDoc {
    pub name: String,

    /// Evaluation position; the enclosing policy assigns one when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u32>,

    pub actions: Vec<ActionDoc>,

    pub conditions: Vec<ConditionDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Target pool, e.g. `/Common/pool1`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<bool>,
}

/// A condition in the device's flag-based encoding
///
/// Match type, URI selector and operator are each a set of booleans of which
/// exactly one is meant to be true; [`Condition`](crate::model::Condition)
/// resolves them by precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<bool>,

    // match type
    #[serde(skip_serializing_if = "is_false")]
    pub http_host: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub http_uri: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub http_header: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub http_cookie: bool,

    // httpHost
    #[serde(skip_serializing_if = "is_false")]
    pub host: bool,

    // httpUri selector
    #[serde(skip_serializing_if = "is_false")]
    pub path: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub path_segment: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub extension: bool,

    /// Header or cookie name for httpHeader / httpCookie
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tm_name: Option<String>,

    // operator
    #[serde(skip_serializing_if = "is_false")]
    pub equals: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub starts_with: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub ends_with: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub contains: bool,

    pub values: Vec<String>,

    #[serde(skip_serializing_if = "is_false")]
    pub negate: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub missing: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}
