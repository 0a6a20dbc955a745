//! Semantic digest of a canonical policy
//!
//! SHA-256 over the compact JSON of [`Resource::canonical`]: rules in ordinal
//! order, actions and conditions in index order, declared fields only. Equal
//! policies have equal digests, so the digest works as a cache key for
//! "already reconciled" checks.

use crate::model::{Policy, Resource};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 (64 characters) of the policy's canonical form
pub fn policy_digest(policy: &Policy) -> String {
    hash_string(&policy.canonical().to_string())
}

fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{PolicyDoc, RuleDoc};

    fn policy(strategy: Option<&str>, rules: &[&str]) -> Policy {
        Policy::new(&PolicyDoc {
            name: "p1".into(),
            partition: Some("Common".into()),
            strategy: strategy.map(String::from),
            rules: rules
                .iter()
                .map(|n| RuleDoc {
                    name: n.to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = policy_digest(&policy(None, &["r0"]));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_equal_policies_equal_digests() {
        let a = policy(None, &["r0"]);
        let b = policy(Some("/Common/first-match"), &["r0"]);
        assert_eq!(a, b);
        assert_eq!(policy_digest(&a), policy_digest(&b));
    }

    #[test]
    fn test_changed_policy_changes_digest() {
        let a = policy(None, &["r0"]);
        let b = policy(None, &["r0", "r1"]);
        assert_ne!(policy_digest(&a), policy_digest(&b));
    }
}
