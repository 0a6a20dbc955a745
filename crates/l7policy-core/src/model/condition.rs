//! Rule conditions and match-type disambiguation
//!
//! The device encodes a condition's match type, URI selector and operator as
//! independent boolean flags. Documents may set more than one; the first set
//! flag in each precedence list wins, and the result is stored as an enum so
//! it is never derived again.

use crate::document::ConditionDoc;
use crate::errors::{PolicyError, Result};
use crate::model::resource::{DeclaredFields, Resource};
use serde_json::Value;
use std::fmt;

/// Which part of the URI an `httpUri` condition inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriSelector {
    Path,
    PathSegment,
    Extension,
}

impl UriSelector {
    /// Selector precedence for `httpUri` conditions
    pub const PRECEDENCE: [UriSelector; 3] = [
        UriSelector::Path,
        UriSelector::PathSegment,
        UriSelector::Extension,
    ];

    /// Device flag name
    pub fn field(&self) -> &'static str {
        match self {
            UriSelector::Path => "path",
            UriSelector::PathSegment => "pathSegment",
            UriSelector::Extension => "extension",
        }
    }

    fn is_set(&self, doc: &ConditionDoc) -> bool {
        match self {
            UriSelector::Path => doc.path,
            UriSelector::PathSegment => doc.path_segment,
            UriSelector::Extension => doc.extension,
        }
    }
}

/// The request attribute a condition matches on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchType {
    HttpHost,
    HttpUri(UriSelector),
    HttpHeader { tm_name: String },
    HttpCookie { tm_name: String },
}

/// Flag-level match kind, used only while resolving a [`MatchType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    HttpHost,
    HttpUri,
    HttpHeader,
    HttpCookie,
}

const MATCH_PRECEDENCE: [MatchKind; 4] = [
    MatchKind::HttpHost,
    MatchKind::HttpUri,
    MatchKind::HttpHeader,
    MatchKind::HttpCookie,
];

impl MatchKind {
    fn field(&self) -> &'static str {
        match self {
            MatchKind::HttpHost => "httpHost",
            MatchKind::HttpUri => "httpUri",
            MatchKind::HttpHeader => "httpHeader",
            MatchKind::HttpCookie => "httpCookie",
        }
    }

    fn is_set(&self, doc: &ConditionDoc) -> bool {
        match self {
            MatchKind::HttpHost => doc.http_host,
            MatchKind::HttpUri => doc.http_uri,
            MatchKind::HttpHeader => doc.http_header,
            MatchKind::HttpCookie => doc.http_cookie,
        }
    }
}

impl MatchType {
    /// Resolve the match type of a condition document
    ///
    /// # Errors
    ///
    /// - `NoMatchType` when no match flag is set
    /// - `MissingUriSelector` for `httpUri` without path/pathSegment/extension
    /// - `MissingTmName` for `httpHeader` / `httpCookie` without a name
    pub fn resolve(doc: &ConditionDoc, condition: &str) -> Result<MatchType> {
        let kind = MATCH_PRECEDENCE
            .iter()
            .find(|kind| kind.is_set(doc))
            .ok_or_else(|| PolicyError::NoMatchType {
                condition: condition.to_string(),
            })?;

        match kind {
            MatchKind::HttpHost => Ok(MatchType::HttpHost),
            MatchKind::HttpUri => UriSelector::PRECEDENCE
                .iter()
                .find(|selector| selector.is_set(doc))
                .map(|selector| MatchType::HttpUri(*selector))
                .ok_or_else(|| PolicyError::MissingUriSelector {
                    condition: condition.to_string(),
                }),
            MatchKind::HttpHeader | MatchKind::HttpCookie => {
                let tm_name = doc
                    .tm_name
                    .as_deref()
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| PolicyError::MissingTmName {
                        condition: condition.to_string(),
                        match_type: kind.field(),
                    })?
                    .to_string();
                if *kind == MatchKind::HttpHeader {
                    Ok(MatchType::HttpHeader { tm_name })
                } else {
                    Ok(MatchType::HttpCookie { tm_name })
                }
            }
        }
    }

    /// Device flag name of the match type
    pub fn field(&self) -> &'static str {
        match self {
            MatchType::HttpHost => "httpHost",
            MatchType::HttpUri(_) => "httpUri",
            MatchType::HttpHeader { .. } => "httpHeader",
            MatchType::HttpCookie { .. } => "httpCookie",
        }
    }

    pub fn uri_selector(&self) -> Option<UriSelector> {
        match self {
            MatchType::HttpUri(selector) => Some(*selector),
            _ => None,
        }
    }

    /// Header or cookie name
    pub fn tm_name(&self) -> Option<&str> {
        match self {
            MatchType::HttpHeader { tm_name } | MatchType::HttpCookie { tm_name } => Some(tm_name),
            _ => None,
        }
    }
}

/// How `values` are compared against the request attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchOperator {
    /// Used when the document sets no operator flag; the device reports the
    /// same condition with `equals: true`
    #[default]
    Equals,
    StartsWith,
    EndsWith,
    Contains,
}

impl MatchOperator {
    pub const PRECEDENCE: [MatchOperator; 4] = [
        MatchOperator::Equals,
        MatchOperator::StartsWith,
        MatchOperator::EndsWith,
        MatchOperator::Contains,
    ];

    pub fn field(&self) -> &'static str {
        match self {
            MatchOperator::Equals => "equals",
            MatchOperator::StartsWith => "startsWith",
            MatchOperator::EndsWith => "endsWith",
            MatchOperator::Contains => "contains",
        }
    }

    fn is_set(&self, doc: &ConditionDoc) -> bool {
        match self {
            MatchOperator::Equals => doc.equals,
            MatchOperator::StartsWith => doc.starts_with,
            MatchOperator::EndsWith => doc.ends_with,
            MatchOperator::Contains => doc.contains,
        }
    }

    pub fn resolve(doc: &ConditionDoc) -> MatchOperator {
        Self::PRECEDENCE
            .iter()
            .copied()
            .find(|op| op.is_set(doc))
            .unwrap_or_default()
    }
}

/// One request-side match predicate of a rule
#[derive(Debug, Clone)]
pub struct Condition {
    name: String,
    index: u32,
    match_type: MatchType,
    operator: MatchOperator,
    values: Vec<String>,
    negate: bool,
    missing: bool,
}

impl Condition {
    /// Build a condition from its document and its position in the rule
    ///
    /// `name` and `index` fall back to the position when the document omits
    /// them. Only request-side matching is modeled, so `request` is always
    /// true regardless of the document.
    ///
    /// # Errors
    ///
    /// Fails when the match type cannot be resolved, see [`MatchType::resolve`].
    pub fn new(doc: &ConditionDoc, position: usize) -> Result<Self> {
        let position = u32::try_from(position).unwrap_or(u32::MAX);
        let name = doc.name.clone().unwrap_or_else(|| position.to_string());
        let match_type = MatchType::resolve(doc, &name)?;
        Ok(Self {
            index: doc.index.unwrap_or(position),
            match_type,
            operator: MatchOperator::resolve(doc),
            values: doc.values.clone(),
            negate: doc.negate,
            missing: doc.missing,
            name,
        })
    }

    /// Sort key within the owning rule
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn match_type(&self) -> &MatchType {
        &self.match_type
    }

    pub fn operator(&self) -> MatchOperator {
        self.operator
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn negate(&self) -> bool {
        self.negate
    }

    pub fn missing(&self) -> bool {
        self.missing
    }

    /// Render back to the device's flag encoding, one flag per dimension
    pub fn to_document(&self) -> ConditionDoc {
        let mut doc = ConditionDoc {
            name: Some(self.name.clone()),
            index: Some(self.index),
            request: Some(true),
            values: self.values.clone(),
            negate: self.negate,
            missing: self.missing,
            ..Default::default()
        };
        match &self.match_type {
            MatchType::HttpHost => {
                doc.http_host = true;
                doc.host = true;
            }
            MatchType::HttpUri(selector) => {
                doc.http_uri = true;
                match selector {
                    UriSelector::Path => doc.path = true,
                    UriSelector::PathSegment => doc.path_segment = true,
                    UriSelector::Extension => doc.extension = true,
                }
            }
            MatchType::HttpHeader { tm_name } => {
                doc.http_header = true;
                doc.tm_name = Some(tm_name.clone());
            }
            MatchType::HttpCookie { tm_name } => {
                doc.http_cookie = true;
                doc.tm_name = Some(tm_name.clone());
            }
        }
        match self.operator {
            MatchOperator::Equals => doc.equals = true,
            MatchOperator::StartsWith => doc.starts_with = true,
            MatchOperator::EndsWith => doc.ends_with = true,
            MatchOperator::Contains => doc.contains = true,
        }
        doc
    }
}

impl Resource for Condition {
    const KIND: &'static str = "condition";

    fn name(&self) -> &str {
        &self.name
    }

    fn declared_fields(&self) -> DeclaredFields {
        vec![
            ("name", Value::from(self.name.as_str())),
            ("index", Value::from(self.index)),
            ("request", Value::Bool(true)),
            ("matchType", Value::from(self.match_type.field())),
            (
                "selector",
                self.match_type
                    .uri_selector()
                    .map_or(Value::Null, |s| Value::from(s.field())),
            ),
            (
                "tmName",
                self.match_type.tm_name().map_or(Value::Null, Value::from),
            ),
            ("operator", Value::from(self.operator.field())),
            ("values", Value::from(self.values.clone())),
            ("negate", Value::Bool(self.negate)),
            ("missing", Value::Bool(self.missing)),
        ]
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}
