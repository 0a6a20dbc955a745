//! Scoped equality shared by every policy resource
//!
//! Each resource type declares the ordered list of fields that take part in
//! comparison. Two resources are equal when every declared field is equal;
//! nothing outside the list is ever looked at.

use crate::core_types::schema::EVENT_MISMATCH;
use crate::model::{Action, Condition, Policy, Rule};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Ordered `(field, value)` pairs making up a resource's comparable state
pub type DeclaredFields = Vec<(&'static str, Value)>;

/// The first declared field found to differ between two resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMismatch {
    /// Location of the differing resource inside the policy,
    /// e.g. `rules[0].conditions[1]`; empty for the policy itself
    pub path: String,
    pub field: String,
    /// Value on the receiver side of the comparison
    pub ours: Value,
    /// Value on the argument side of the comparison
    pub theirs: Value,
}

impl FieldMismatch {
    pub fn new(field: impl Into<String>, ours: Value, theirs: Value) -> Self {
        Self {
            path: String::new(),
            field: field.into(),
            ours,
            theirs,
        }
    }

    /// Prefix the path with the segment of the enclosing collection
    pub(crate) fn within(mut self, segment: String) -> Self {
        self.path = if self.path.is_empty() {
            segment
        } else {
            format!("{}.{}", segment, self.path)
        };
        self
    }

    /// `path.field`, or just `field` at the top level
    pub fn location(&self) -> String {
        if self.path.is_empty() {
            self.field.clone()
        } else {
            format!("{}.{}", self.path, self.field)
        }
    }
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} != {}", self.location(), self.ours, self.theirs)
    }
}

/// Identity plus field allow-list equality
pub trait Resource {
    /// Resource kind used in logs and errors
    const KIND: &'static str;

    fn name(&self) -> &str;

    fn partition(&self) -> Option<&str> {
        None
    }

    /// Scalar fields taking part in equality, in comparison order
    fn declared_fields(&self) -> DeclaredFields;

    /// Full canonical state, nested collections included
    fn canonical(&self) -> Value {
        fields_to_object(self.declared_fields())
    }

    /// First declared field that differs from `other`, if any
    fn first_mismatch(&self, other: &Self) -> Option<FieldMismatch> {
        compare_fields(
            Self::KIND,
            self.name(),
            &self.declared_fields(),
            &other.declared_fields(),
        )
    }

    fn equals(&self, other: &Self) -> bool {
        self.first_mismatch(other).is_none()
    }
}

/// Compare two declared field lists of the same resource kind
///
/// Logs the first difference at debug level and returns it.
pub(crate) fn compare_fields(
    kind: &'static str,
    name: &str,
    ours: &[(&'static str, Value)],
    theirs: &[(&'static str, Value)],
) -> Option<FieldMismatch> {
    for ((field, a), (_, b)) in ours.iter().zip(theirs.iter()) {
        if a != b {
            tracing::debug!(
                component = module_path!(),
                event = EVENT_MISMATCH,
                kind = kind,
                resource = name,
                field = *field,
                ours = %a,
                theirs = %b,
                "{} {} unequal, {} does not match",
                kind,
                name,
                field
            );
            return Some(FieldMismatch::new(*field, a.clone(), b.clone()));
        }
    }
    None
}

/// Compare two sorted child collections: count first, then pairwise
pub(crate) fn compare_children<T: Resource>(
    parent_kind: &'static str,
    parent_name: &str,
    collection: &'static str,
    ours: &[T],
    theirs: &[T],
) -> Option<FieldMismatch> {
    if ours.len() != theirs.len() {
        tracing::debug!(
            component = module_path!(),
            event = EVENT_MISMATCH,
            kind = parent_kind,
            resource = parent_name,
            field = collection,
            ours = ours.len(),
            theirs = theirs.len(),
            "{} length is unequal",
            collection
        );
        return Some(FieldMismatch::new(
            collection,
            Value::from(ours.len()),
            Value::from(theirs.len()),
        ));
    }
    ours.iter()
        .zip(theirs.iter())
        .enumerate()
        .find_map(|(i, (a, b))| {
            a.first_mismatch(b)
                .map(|m| m.within(format!("{}[{}]", collection, i)))
        })
}

pub(crate) fn fields_to_object(fields: DeclaredFields) -> Value {
    let map: Map<String, Value> = fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    Value::Object(map)
}

/// A borrowed resource of any kind
///
/// Lets callers holding mixed resources compare them without knowing the
/// concrete type up front; different kinds never compare equal.
#[derive(Debug, Clone, Copy)]
pub enum AnyResource<'a> {
    Policy(&'a Policy),
    Rule(&'a Rule),
    Action(&'a Action),
    Condition(&'a Condition),
}

impl AnyResource<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            AnyResource::Policy(_) => Policy::KIND,
            AnyResource::Rule(_) => Rule::KIND,
            AnyResource::Action(_) => Action::KIND,
            AnyResource::Condition(_) => Condition::KIND,
        }
    }

    pub fn equals(&self, other: &AnyResource<'_>) -> bool {
        match (self, other) {
            (AnyResource::Policy(a), AnyResource::Policy(b)) => a.equals(b),
            (AnyResource::Rule(a), AnyResource::Rule(b)) => a.equals(b),
            (AnyResource::Action(a), AnyResource::Action(b)) => a.equals(b),
            (AnyResource::Condition(a), AnyResource::Condition(b)) => a.equals(b),
            _ => false,
        }
    }
}

impl<'a> From<&'a Policy> for AnyResource<'a> {
    fn from(p: &'a Policy) -> Self {
        AnyResource::Policy(p)
    }
}

impl<'a> From<&'a Rule> for AnyResource<'a> {
    fn from(r: &'a Rule) -> Self {
        AnyResource::Rule(r)
    }
}

impl<'a> From<&'a Action> for AnyResource<'a> {
    fn from(a: &'a Action) -> Self {
        AnyResource::Action(a)
    }
}

impl<'a> From<&'a Condition> for AnyResource<'a> {
    fn from(c: &'a Condition) -> Self {
        AnyResource::Condition(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ActionDoc, RuleDoc};
    use serde_json::json;

    #[test]
    fn test_compare_fields_reports_first_difference() {
        let ours = vec![("name", json!("a")), ("pool", json!("/Common/p1")), ("forward", json!(true))];
        let theirs = vec![("name", json!("a")), ("pool", json!("/Common/p2")), ("forward", json!(false))];

        let mismatch = compare_fields("action", "a", &ours, &theirs).unwrap();
        assert_eq!(mismatch.field, "pool");
        assert_eq!(mismatch.ours, json!("/Common/p1"));
        assert_eq!(mismatch.theirs, json!("/Common/p2"));
    }

    #[test]
    fn test_within_builds_nested_path() {
        let m = FieldMismatch::new("values", json!(["/a"]), json!(["/b"]))
            .within("conditions[0]".into())
            .within("rules[2]".into());
        assert_eq!(m.path, "rules[2].conditions[0]");
        assert_eq!(m.location(), "rules[2].conditions[0].values");
    }

    #[test]
    fn test_any_resource_different_kinds_never_equal() {
        let rule = Rule::new(
            &RuleDoc {
                name: "0".into(),
                ..Default::default()
            },
            0,
        )
        .unwrap();
        let action = Action::new(
            &ActionDoc {
                name: Some("0".into()),
                ..Default::default()
            },
            0,
        );

        let a = AnyResource::from(&rule);
        let b = AnyResource::from(&action);
        assert_eq!(a.kind(), "rule");
        assert_eq!(b.kind(), "action");
        assert!(!a.equals(&b));
        assert!(!b.equals(&a));
    }

    #[test]
    fn test_any_resource_same_kind_delegates() {
        let pool = |p: &str| ActionDoc {
            pool: Some(p.into()),
            ..Default::default()
        };
        let a = Action::new(&pool("/Common/pool1"), 0);
        let b = Action::new(&pool("/Common/pool1"), 0);
        let c = Action::new(&pool("/Common/pool2"), 0);

        assert!(AnyResource::from(&a).equals(&AnyResource::from(&b)));
        assert!(!AnyResource::from(&a).equals(&AnyResource::from(&c)));
    }

    #[test]
    fn test_top_level_location_is_field() {
        let m = FieldMismatch::new("strategy", json!("a"), json!("b"));
        assert_eq!(m.location(), "strategy");
        assert_eq!(m.to_string(), "strategy: \"a\" != \"b\"");
    }
}
