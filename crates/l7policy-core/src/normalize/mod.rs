//! Normalization of the device's reference-wrapped policy graph
//!
//! The device returns a policy's rules under `rulesReference.items`, and each
//! rule's actions and conditions under `actionsReference.items` /
//! `conditionsReference.items`. This module is the only code that knows that
//! shape: [`wire`] models it and [`adapter`] flattens it into the canonical
//! [`PolicyDoc`](crate::document::PolicyDoc).

pub mod adapter;
pub mod wire;

pub use adapter::{normalize_collection, normalize_policy, normalize_value};
pub use wire::{DeviceCollection, DevicePolicy, DeviceRule, Reference};
