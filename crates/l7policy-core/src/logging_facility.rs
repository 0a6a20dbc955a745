//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions on emitted events
//!
//! Field mismatches found during equality are logged at `debug` with the
//! `mismatch` event, so `RUST_LOG=l7policy_core=debug` shows why a policy
//! is considered changed.
//!
//! # Usage
//!
//! ```rust
//! use l7policy_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
