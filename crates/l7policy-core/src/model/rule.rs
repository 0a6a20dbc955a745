use crate::document::RuleDoc;
use crate::errors::{PolicyError, Result};
use crate::model::resource::{
    compare_children, compare_fields, fields_to_object, DeclaredFields, FieldMismatch, Resource,
};
use crate::model::{Action, Condition};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// An ordered bundle of conditions (when to match) and actions (what to do)
///
/// Actions and conditions are kept sorted by their own index, so documents
/// listing them in a different order build equal rules.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    ordinal: u32,
    actions: Vec<Action>,
    conditions: Vec<Condition>,
}

impl Rule {
    /// Build a rule with the ordinal chosen by the enclosing policy
    ///
    /// The document's own `ordinal` is not consulted here; the policy decides
    /// between it and the rule's position.
    ///
    /// # Errors
    ///
    /// - `MissingIdentity` if the rule has no name
    /// - any condition error, wrapped with the rule name
    pub fn new(doc: &RuleDoc, ordinal: u32) -> Result<Self> {
        if doc.name.is_empty() {
            return Err(PolicyError::MissingIdentity {
                kind: Self::KIND,
                field: "name",
            });
        }

        let mut actions: Vec<Action> = doc
            .actions
            .iter()
            .enumerate()
            .map(|(i, a)| Action::new(a, i))
            .collect();
        actions.sort_by_key(Action::index);

        let mut conditions = doc
            .conditions
            .iter()
            .enumerate()
            .map(|(i, c)| Condition::new(c, i))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| e.in_rule(&doc.name))?;
        conditions.sort_by_key(Condition::index);

        Ok(Self {
            name: doc.name.clone(),
            ordinal,
            actions,
            conditions,
        })
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluation order; presentation and sorting only, not equality
    pub fn cmp_by_ordinal(&self, other: &Self) -> Ordering {
        self.ordinal.cmp(&other.ordinal)
    }

    pub fn to_document(&self) -> RuleDoc {
        RuleDoc {
            name: self.name.clone(),
            ordinal: Some(self.ordinal),
            actions: self.actions.iter().map(Action::to_document).collect(),
            conditions: self.conditions.iter().map(Condition::to_document).collect(),
        }
    }
}

impl Resource for Rule {
    const KIND: &'static str = "rule";

    fn name(&self) -> &str {
        &self.name
    }

    fn declared_fields(&self) -> DeclaredFields {
        vec![
            ("name", Value::from(self.name.as_str())),
            ("ordinal", Value::from(self.ordinal)),
        ]
    }

    fn canonical(&self) -> Value {
        let mut value = fields_to_object(self.declared_fields());
        value["actions"] = self.actions.iter().map(Resource::canonical).collect();
        value["conditions"] = self.conditions.iter().map(Resource::canonical).collect();
        value
    }

    fn first_mismatch(&self, other: &Self) -> Option<FieldMismatch> {
        compare_fields(
            Self::KIND,
            &self.name,
            &self.declared_fields(),
            &other.declared_fields(),
        )
        .or_else(|| {
            compare_children(
                Self::KIND,
                &self.name,
                "actions",
                &self.actions,
                &other.actions,
            )
        })
        .or_else(|| {
            compare_children(
                Self::KIND,
                &self.name,
                "conditions",
                &self.conditions,
                &other.conditions,
            )
        })
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}
