//! Condition match-type and operator disambiguation
use l7policy_core::{Condition, ConditionDoc, MatchOperator, MatchType, Resource, UriSelector};
use serde_json::json;

fn condition(value: serde_json::Value) -> Condition {
    let doc: ConditionDoc = serde_json::from_value(value).unwrap();
    Condition::new(&doc, 0).unwrap()
}

#[test]
fn test_host_wins_over_uri() {
    let c = condition(json!({"httpHost": true, "httpUri": true, "path": true, "values": ["a"]}));
    assert_eq!(c.match_type(), &MatchType::HttpHost);
}

#[test]
fn test_path_wins_over_path_segment() {
    let c = condition(json!({"httpUri": true, "path": true, "pathSegment": true, "values": ["/a"]}));
    assert_eq!(c.match_type(), &MatchType::HttpUri(UriSelector::Path));
}

#[test]
fn test_path_segment_wins_over_extension() {
    let c = condition(json!({"httpUri": true, "pathSegment": true, "extension": true}));
    assert_eq!(c.match_type().uri_selector(), Some(UriSelector::PathSegment));
}

#[test]
fn test_header_carries_tm_name() {
    let c = condition(json!({"httpHeader": true, "tmName": "X-Env", "values": ["prod"]}));
    assert_eq!(c.match_type().tm_name(), Some("X-Env"));
    assert_eq!(c.operator(), MatchOperator::Equals);
}

#[test]
fn test_header_wins_over_cookie() {
    let c = condition(json!({"httpHeader": true, "httpCookie": true, "tmName": "session"}));
    assert!(matches!(c.match_type(), MatchType::HttpHeader { .. }));
}

#[test]
fn test_operator_precedence() {
    let c = condition(json!({"httpHost": true, "startsWith": true, "contains": true}));
    assert_eq!(c.operator(), MatchOperator::StartsWith);
}

#[test]
fn test_losing_flags_do_not_affect_equality() {
    // GIVEN two conditions that resolve to the same match type
    let a = condition(json!({"httpHost": true, "values": ["example.com"]}));
    let b = condition(json!({"httpHost": true, "httpUri": true, "values": ["example.com"]}));

    // THEN they compare equal
    assert!(a.equals(&b));
}

#[test]
fn test_request_forced_true() {
    let a = condition(json!({"httpHost": true, "request": false}));
    let b = condition(json!({"httpHost": true}));
    assert!(a.equals(&b));
    assert_eq!(a.canonical()["request"], json!(true));
}
