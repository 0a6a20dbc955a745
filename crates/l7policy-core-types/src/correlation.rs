//! Correlation types for tracking one reconciliation pass
//!
//! The surrounding controller typically compares many policies per pass.
//! Tagging each comparison with the pass identifiers lets log lines and
//! construction errors be grouped after the fact.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh identifier (UUIDv7, time ordered)
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Wrap an identifier supplied by the caller
            pub fn from_string(s: String) -> Self {
                Self(s)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Identifier of a single reconciliation pass
    RequestId
);

correlation_id!(
    /// Identifier propagated from an upstream tracing system
    TraceId
);

/// Correlation context handed to traced diff operations
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            trace_id: None,
        }
    }

    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            trace_id: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_display_matches_inner() {
        let id = TraceId::from_string("trace-7".to_string());
        assert_eq!(id.to_string(), "trace-7");
        assert_eq!(id.as_str(), "trace-7");
    }

    #[test]
    fn test_context_carries_trace_id() {
        let trace = TraceId::new();
        let ctx = RequestContext::with_request_id(RequestId::from_string("pass-1".into()))
            .with_trace_id(trace.clone());
        assert_eq!(ctx.request_id.as_str(), "pass-1");
        assert_eq!(ctx.trace_id, Some(trace));
    }

    #[test]
    fn test_request_id_serde_is_transparent_string() {
        let id = RequestId::from_string("pass-9".into());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"pass-9\"");
        let back: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
