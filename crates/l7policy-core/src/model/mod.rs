//! Canonical policy model
//!
//! `Policy` → `Rule` → `Action` / `Condition`, all immutable once built and
//! compared over their declared fields only (see [`resource`]).

pub mod action;
pub mod condition;
pub mod policy;
pub mod resource;
pub mod rule;

pub use action::Action;
pub use condition::{Condition, MatchOperator, MatchType, UriSelector};
pub use policy::Policy;
pub use resource::{AnyResource, FieldMismatch, Resource};
pub use rule::Rule;
