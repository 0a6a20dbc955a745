use crate::document::ActionDoc;
use crate::model::resource::{DeclaredFields, Resource};
use serde_json::Value;
use std::fmt;

/// One effect applied when a rule matches
///
/// Content is taken as provided; only the declared fields are kept.
#[derive(Debug, Clone)]
pub struct Action {
    name: String,
    index: u32,
    pool: Option<String>,
    forward: Option<bool>,
    request: Option<bool>,
}

impl Action {
    /// Build an action from its document and its position in the rule
    ///
    /// The device names actions by their index (`"0"`, `"1"`, ...). When the
    /// document has no name the position is used instead, and a numeric name
    /// doubles as the sort index.
    pub fn new(doc: &ActionDoc, position: usize) -> Self {
        let position = u32::try_from(position).unwrap_or(u32::MAX);
        let name = doc.name.clone().unwrap_or_else(|| position.to_string());
        let index = name.parse().unwrap_or(position);
        Self {
            name,
            index,
            pool: doc.pool.clone(),
            forward: doc.forward,
            request: doc.request,
        }
    }

    /// Sort key within the owning rule
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn pool(&self) -> Option<&str> {
        self.pool.as_deref()
    }

    pub fn forward(&self) -> Option<bool> {
        self.forward
    }

    pub fn request(&self) -> Option<bool> {
        self.request
    }

    pub fn to_document(&self) -> ActionDoc {
        ActionDoc {
            name: Some(self.name.clone()),
            pool: self.pool.clone(),
            forward: self.forward,
            request: self.request,
        }
    }
}

impl Resource for Action {
    const KIND: &'static str = "action";

    fn name(&self) -> &str {
        &self.name
    }

    fn declared_fields(&self) -> DeclaredFields {
        vec![
            ("name", Value::from(self.name.as_str())),
            ("pool", self.pool.as_deref().map_or(Value::Null, Value::from)),
            ("forward", self.forward.map_or(Value::Null, Value::from)),
            ("request", self.request.map_or(Value::Null, Value::from)),
        ]
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}
