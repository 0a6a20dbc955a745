use l7policy_core::{Policy, PolicyDoc};
use serde_json::{json, Value};

/// Desired-state policy `/Common/{name}` forwarding `uri` to `/Common/pool1`
#[allow(dead_code)]
pub fn desired_uri_policy(name: &str, uri: &str) -> Value {
    json!({
        "name": name,
        "partition": "Common",
        "strategy": "/Common/first-match",
        "rules": [{
            "name": "r0",
            "actions": [{"forward": true, "pool": "/Common/pool1", "request": true}],
            "conditions": [{"httpUri": true, "path": true, "equals": true, "values": [uri]}]
        }]
    })
}

/// The same policy as read back from the device, with reference wrappers and
/// device-only attributes
#[allow(dead_code)]
pub fn device_uri_policy(name: &str, uri: &str) -> Value {
    json!({
        "kind": "tm:ltm:policy:policystate",
        "name": name,
        "partition": "Common",
        "fullPath": format!("/Common/{}", name),
        "generation": 42,
        "status": "published",
        "legacy": true,
        "controls": ["forwarding"],
        "requires": ["http"],
        "strategy": "/Common/first-match",
        "rulesReference": {
            "link": format!("https://localhost/mgmt/tm/ltm/policy/~Common~{}/rules", name),
            "isSubcollection": true,
            "items": [{
                "kind": "tm:ltm:policy:rules:rulesstate",
                "name": "r0",
                "ordinal": 0,
                "generation": 42,
                "actionsReference": {"items": [{
                    "name": "0",
                    "forward": true,
                    "pool": "/Common/pool1",
                    "request": true,
                    "select": true,
                    "code": 0,
                    "port": 0
                }]},
                "conditionsReference": {"items": [{
                    "name": "0",
                    "index": 0,
                    "httpUri": true,
                    "path": true,
                    "equals": true,
                    "caseInsensitive": true,
                    "external": true,
                    "present": true,
                    "remote": true,
                    "request": true,
                    "values": [uri]
                }]}
            }]
        }
    })
}

#[allow(dead_code)]
pub fn policy_doc(value: Value) -> PolicyDoc {
    serde_json::from_value(value).expect("valid policy document")
}

#[allow(dead_code)]
pub fn build(value: Value) -> Policy {
    Policy::new(&policy_doc(value)).expect("policy should build")
}
