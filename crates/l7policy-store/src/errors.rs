//! Error handling for l7policy-store
//!
//! Wraps l7policy-core ExError with store-specific helpers

use l7policy_core::errors::{ExError, ExErrorKind, PolicyError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a document validation error
pub fn document_validation(op: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidDocument)
        .with_op(op.to_string())
        .with_message(reason.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Convert a model construction error, keeping its structured fields
pub fn from_policy_error(err: PolicyError) -> ExError {
    ExError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_validation_kind() {
        let err = document_validation("load_desired", "bad version");
        assert_eq!(err.kind(), ExErrorKind::InvalidDocument);
        assert_eq!(err.op(), Some("load_desired"));
        assert_eq!(err.message(), "bad version");
    }

    #[test]
    fn test_io_error_kind() {
        let err = io_error(
            "load_device_file",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.code(), "ERR_IO");
    }
}
