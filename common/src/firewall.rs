//! # Firewall Rule Sets
//!
//! Raw rule sets as returned by a provider ([`RuleSet`], [`Permission`], [`SourceRange`])
//! and the normalized form the auditor reports on ([`IngressRule`]).

use crate::error::AddressRangeError;
use crate::network::port::PortRange;
use crate::network::range::AddressRange;

/// Shown when a source range carries no annotation.
pub const NO_DESCRIPTION: &str = "no description";

/// One source range attached to a permission, exactly as the provider wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRange {
    pub cidr: String,
    pub description: Option<String>,
}

impl SourceRange {
    pub fn new(cidr: impl Into<String>) -> Self {
        Self {
            cidr: cidr.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A raw ingress permission entry. Expands to one [`IngressRule`] per source range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Permission {
    /// IP protocol label (`tcp`, `udp`, `icmp`, `-1` for all).
    pub protocol: String,
    pub from_port: Option<i32>,
    pub to_port: Option<i32>,
    pub sources: Vec<SourceRange>,
}

impl Permission {
    pub fn new(protocol: impl Into<String>, from_port: Option<i32>, to_port: Option<i32>) -> Self {
        Self {
            protocol: protocol.into(),
            from_port,
            to_port,
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: SourceRange) -> Self {
        self.sources.push(source);
        self
    }
}

/// An ordered collection of ingress permissions, identified by an opaque id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleSet {
    pub id: String,
    pub name: Option<String>,
    pub ingress: Vec<Permission>,
}

impl RuleSet {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            ingress: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.ingress.push(permission);
        self
    }
}

/// A normalized ingress rule: one port range, one source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressRule {
    pub port_range: PortRange,
    pub source: AddressRange,
    pub description: Option<String>,
    pub protocol: String,
}

impl IngressRule {
    pub fn is_public(&self) -> bool {
        self.source.is_public()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(NO_DESCRIPTION)
    }
}

/// A source range that could not be parsed and was left out of the extracted rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedSource {
    pub rule_set_id: String,
    pub error: AddressRangeError,
}

impl MalformedSource {
    pub fn raw(&self) -> &str {
        match &self.error {
            AddressRangeError::Malformed { input, .. } => input,
        }
    }
}
