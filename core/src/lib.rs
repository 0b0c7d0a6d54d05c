//! # Exposr Core
//!
//! Exposure analysis and the adapters feeding it.
//!
//! * **[`extractor`]**: turns a rule set into its public-sourced ingress rules.
//! * **[`correlator`]**: resolves a resource's rule sets and emits findings.
//! * **[`auditor`]**: runs the correlation over every resource kind and builds the report.
//! * **[`report`]**: the grouped, per-kind result of a run.
//! * **[`throttle`]**: bounds concurrency and latency of rule-set fetches.
//! * **[`aws`]** / **[`memory`]**: provider implementations.

pub mod auditor;
pub mod aws;
pub mod correlator;
pub mod extractor;
pub mod memory;
pub mod report;
pub mod throttle;
