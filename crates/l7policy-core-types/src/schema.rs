//! Canonical schema constants for structured logging and events
//!
//! Every log line emitted by the diff engine uses these keys so that
//! reconciliation output can be filtered uniformly.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Mismatch reporting
pub const FIELD_KIND: &str = "kind";
pub const FIELD_FIELD: &str = "field";
pub const FIELD_OURS: &str = "ours";
pub const FIELD_THEIRS: &str = "theirs";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_MISMATCH: &str = "mismatch";
