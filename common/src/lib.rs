//! # Exposr Common
//!
//! Shared vocabulary for the exposure auditor.
//!
//! * **[`network`]**: address ranges, the public/private classifier and port ranges.
//! * **[`firewall`]**: raw rule sets and the normalized ingress rules derived from them.
//! * **[`resource`]**: the audited resource kinds behind a single [`resource::Resource`] trait.
//! * **[`finding`]**: correlation output, per resource.
//! * **[`providers`]**: the traits adapters implement to feed the core (inventory, rule sets).
//! * **[`error`]**: the error taxonomy shared by every layer.

pub mod config;
pub mod error;
pub mod finding;
pub mod firewall;
pub mod network;
pub mod providers;
pub mod resource;
