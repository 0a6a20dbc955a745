use crate::document::PolicyDoc;
use crate::errors::{PolicyError, Result};
use crate::model::resource::{
    compare_children, compare_fields, fields_to_object, DeclaredFields, FieldMismatch, Resource,
};
use crate::model::Rule;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Strategy applied when a document does not name one
pub const DEFAULT_STRATEGY: &str = "/Common/first-match";

/// Fixed device-contract attributes; never taken from input
pub const LEGACY: bool = true;
pub const CONTROLS: &[&str] = &["forwarding"];
pub const REQUIRES: &[&str] = &["http"];

/// An L7 policy: scalar attributes plus rules in ascending ordinal order
#[derive(Debug, Clone)]
pub struct Policy {
    name: String,
    partition: String,
    strategy: String,
    rules: Vec<Rule>,
}

impl Policy {
    /// Build the canonical policy from a desired-state or normalized device document
    ///
    /// Each rule takes its explicit ordinal when it has one. Rules without
    /// one are numbered in list order from 0, skipping every value claimed
    /// explicitly, so a list with no explicit ordinals gets its 0-based
    /// positions. `legacy`, `controls` and `requires` in the document are
    /// ignored.
    ///
    /// # Errors
    ///
    /// - `MissingIdentity` when `name` or `partition` is absent or empty
    /// - `DuplicateOrdinal` when two rules declare the same explicit ordinal
    /// - any rule or condition error, wrapped with the policy path
    pub fn new(doc: &PolicyDoc) -> Result<Self> {
        if doc.name.is_empty() {
            return Err(PolicyError::MissingIdentity {
                kind: Self::KIND,
                field: "name",
            });
        }
        let partition = match doc.partition.as_deref() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => {
                return Err(PolicyError::MissingIdentity {
                    kind: Self::KIND,
                    field: "partition",
                })
            }
        };
        let full_path = format!("/{}/{}", partition, doc.name);

        let explicit: BTreeSet<u32> = doc.rules.iter().filter_map(|r| r.ordinal).collect();
        let mut next_free = 0u32;
        let mut seen: BTreeMap<u32, &str> = BTreeMap::new();
        let mut rules = Vec::with_capacity(doc.rules.len());
        for rule_doc in &doc.rules {
            let ordinal = match rule_doc.ordinal {
                Some(ordinal) => ordinal,
                None => {
                    while explicit.contains(&next_free) {
                        next_free = next_free.saturating_add(1);
                    }
                    let ordinal = next_free;
                    next_free = next_free.saturating_add(1);
                    ordinal
                }
            };
            if let Some(first) = seen.insert(ordinal, rule_doc.name.as_str()) {
                return Err(PolicyError::DuplicateOrdinal {
                    ordinal,
                    first: first.to_string(),
                    second: rule_doc.name.clone(),
                }
                .in_policy(&full_path));
            }
            let rule = Rule::new(rule_doc, ordinal).map_err(|e| e.in_policy(&full_path))?;
            rules.push(rule);
        }
        rules.sort_by(Rule::cmp_by_ordinal);

        Ok(Self {
            name: doc.name.clone(),
            partition,
            strategy: doc
                .strategy
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_STRATEGY.to_string()),
            rules,
        })
    }

    /// `/partition/name`
    pub fn full_path(&self) -> String {
        format!("/{}/{}", self.partition, self.name)
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn legacy(&self) -> bool {
        LEGACY
    }

    pub fn controls(&self) -> Vec<String> {
        CONTROLS.iter().map(|s| s.to_string()).collect()
    }

    pub fn requires(&self) -> Vec<String> {
        REQUIRES.iter().map(|s| s.to_string()).collect()
    }

    /// Rules in ascending ordinal order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Canonical document suitable as a create/update payload
    pub fn to_document(&self) -> PolicyDoc {
        PolicyDoc {
            name: self.name.clone(),
            partition: Some(self.partition.clone()),
            strategy: Some(self.strategy.clone()),
            legacy: Some(LEGACY),
            controls: self.controls(),
            requires: self.requires(),
            rules: self.rules.iter().map(Rule::to_document).collect(),
        }
    }
}

impl Resource for Policy {
    const KIND: &'static str = "policy";

    fn name(&self) -> &str {
        &self.name
    }

    fn partition(&self) -> Option<&str> {
        Some(&self.partition)
    }

    fn declared_fields(&self) -> DeclaredFields {
        vec![
            ("name", Value::from(self.name.as_str())),
            ("partition", Value::from(self.partition.as_str())),
            ("strategy", Value::from(self.strategy.as_str())),
            ("legacy", Value::Bool(LEGACY)),
            ("controls", Value::from(CONTROLS.to_vec())),
            ("requires", Value::from(REQUIRES.to_vec())),
        ]
    }

    fn canonical(&self) -> Value {
        let mut value = fields_to_object(self.declared_fields());
        value["rules"] = self.rules.iter().map(Resource::canonical).collect();
        value
    }

    /// Metadata first, then the rule list; both are always part of the verdict
    fn first_mismatch(&self, other: &Self) -> Option<FieldMismatch> {
        compare_fields(
            Self::KIND,
            &self.name,
            &self.declared_fields(),
            &other.declared_fields(),
        )
        .or_else(|| compare_children(Self::KIND, &self.name, "rules", &self.rules, &other.rules))
    }
}

impl PartialEq for Policy {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}
