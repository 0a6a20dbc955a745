use l7policy_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using PolicyError
pub type Result<T> = std::result::Result<T, PolicyError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the reconciliation
/// loop, log pipelines, tests) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Construction
    /// A condition has no recognized match type, or an incomplete one
    InvalidCondition,
    /// A policy or rule is missing its name or partition
    MissingIdentity,
    /// Two rules in one policy share an ordinal
    InvalidOrdinal,

    // Documents
    /// A desired-state or device document could not be parsed or failed validation
    InvalidDocument,
    Serialization,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidCondition => "ERR_INVALID_CONDITION",
            ExErrorKind::MissingIdentity => "ERR_MISSING_IDENTITY",
            ExErrorKind::InvalidOrdinal => "ERR_INVALID_ORDINAL",
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context: the operation that
/// failed, the resource path (`/Common/p1/r0`), the rule ordinal and the
/// correlation identifiers of the reconciliation pass.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    ordinal: Option<u32>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            ordinal: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the path of the resource that failed to build
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_ordinal(mut self, ordinal: u32) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn ordinal(&self) -> Option<u32> {
        self.ordinal
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(ordinal) = self.ordinal {
            write!(f, " (ordinal: {})", ordinal)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Construction-time errors for the policy model
///
/// Errors raised while building a rule or condition are wrapped in
/// [`PolicyError::InRule`] / [`PolicyError::InPolicy`] so the message names
/// the resource that failed. [`PolicyError::root_cause`] strips the wrappers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// None of httpHost, httpUri, httpHeader, httpCookie is set
    #[error("Condition {condition} has no recognized match type")]
    NoMatchType { condition: String },

    /// httpUri is set but none of path, pathSegment, extension is
    #[error("Condition {condition} matches httpUri but sets none of path, pathSegment, extension")]
    MissingUriSelector { condition: String },

    /// httpHeader / httpCookie without the header or cookie name
    #[error("Condition {condition} matches {match_type} but has no tmName")]
    MissingTmName {
        condition: String,
        match_type: &'static str,
    },

    /// A required identity field is absent or empty
    #[error("{kind} is missing required field `{field}`")]
    MissingIdentity {
        kind: &'static str,
        field: &'static str,
    },

    /// Two rules of the same policy resolve to the same ordinal
    #[error("Duplicate rule ordinal {ordinal} (rules {first} and {second})")]
    DuplicateOrdinal {
        ordinal: u32,
        first: String,
        second: String,
    },

    /// A raw document did not match the expected shape
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("in rule '{rule}': {source}")]
    InRule {
        rule: String,
        #[source]
        source: Box<PolicyError>,
    },

    #[error("in policy '{policy}': {source}")]
    InPolicy {
        policy: String,
        #[source]
        source: Box<PolicyError>,
    },
}

impl PolicyError {
    /// Wrap this error with the name of the rule being built
    pub fn in_rule(self, rule: impl Into<String>) -> Self {
        PolicyError::InRule {
            rule: rule.into(),
            source: Box::new(self),
        }
    }

    /// Wrap this error with the full path of the policy being built
    pub fn in_policy(self, policy: impl Into<String>) -> Self {
        PolicyError::InPolicy {
            policy: policy.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, without rule/policy context
    pub fn root_cause(&self) -> &PolicyError {
        match self {
            PolicyError::InRule { source, .. } | PolicyError::InPolicy { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    /// Resource path of the failing object, outermost first (`/Common/p1/r0`)
    pub fn resource_path(&self) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = self;
        loop {
            match current {
                PolicyError::InPolicy { policy, source } => {
                    segments.push(policy.clone());
                    current = source;
                }
                PolicyError::InRule { rule, source } => {
                    segments.push(rule.clone());
                    current = source;
                }
                _ => break,
            }
        }
        if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        }
    }
}

impl From<PolicyError> for ExError {
    fn from(err: PolicyError) -> Self {
        let entity = err.resource_path();
        let message = err.to_string();
        let ex = match err.root_cause() {
            PolicyError::NoMatchType { condition }
            | PolicyError::MissingUriSelector { condition }
            | PolicyError::MissingTmName { condition, .. } => {
                ExError::new(ExErrorKind::InvalidCondition)
                    .with_op("build_condition")
                    .with_entity(match &entity {
                        Some(path) => format!("{}/conditions/{}", path, condition),
                        None => condition.clone(),
                    })
            }
            PolicyError::MissingIdentity { kind, .. } => {
                let ex = ExError::new(ExErrorKind::MissingIdentity).with_op(format!("build_{kind}"));
                match &entity {
                    Some(path) => ex.with_entity(path.clone()),
                    None => ex,
                }
            }
            PolicyError::DuplicateOrdinal { ordinal, .. } => {
                let ex = ExError::new(ExErrorKind::InvalidOrdinal)
                    .with_op("build_policy")
                    .with_ordinal(*ordinal);
                match &entity {
                    Some(path) => ex.with_entity(path.clone()),
                    None => ex,
                }
            }
            PolicyError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_op("normalize")
            }
            PolicyError::InRule { .. } | PolicyError::InPolicy { .. } => {
                ExError::new(ExErrorKind::Internal)
            }
        };
        ex.with_message(message)
    }
}

/// Conversion from serde_json::Error to PolicyError
impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_are_stable() {
        let cases = [
            (ExErrorKind::InvalidCondition, "ERR_INVALID_CONDITION"),
            (ExErrorKind::MissingIdentity, "ERR_MISSING_IDENTITY"),
            (ExErrorKind::InvalidOrdinal, "ERR_INVALID_ORDINAL"),
            (ExErrorKind::InvalidDocument, "ERR_INVALID_DOCUMENT"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_root_cause_strips_context() {
        let err = PolicyError::NoMatchType {
            condition: "0".into(),
        }
        .in_rule("r0")
        .in_policy("/Common/p1");

        assert_eq!(
            err.root_cause(),
            &PolicyError::NoMatchType {
                condition: "0".into()
            }
        );
        assert_eq!(err.resource_path().as_deref(), Some("/Common/p1/r0"));
    }

    #[test]
    fn test_display_names_every_layer() {
        let err = PolicyError::MissingUriSelector {
            condition: "1".into(),
        }
        .in_rule("api");
        let text = err.to_string();
        assert!(text.contains("in rule 'api'"));
        assert!(text.contains("pathSegment"));
    }

    #[test]
    fn test_ex_error_display_includes_code_and_entity() {
        let ex = ExError::new(ExErrorKind::InvalidOrdinal)
            .with_op("build_policy")
            .with_entity("/Common/p1")
            .with_ordinal(3)
            .with_message("duplicate");
        let text = ex.to_string();
        assert!(text.starts_with("[ERR_INVALID_ORDINAL]"));
        assert!(text.contains("/Common/p1"));
        assert!(text.contains("(ordinal: 3)"));
    }
}
