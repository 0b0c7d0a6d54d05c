//! Error types shared across the workspace.
//!
//! Errors are scoped: an [`AddressRangeError`] affects one source range, a
//! [`RuleSetError`] one resource, an [`InventoryError`] one resource kind. Only
//! [`ExposureError`] aborts a run.

use std::time::Duration;

use thiserror::Error;

use crate::resource::ResourceKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressRangeError {
    #[error("invalid address range '{input}': {reason}")]
    Malformed { input: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleSetError {
    #[error("rule set {0} not found")]
    NotFound(String),

    #[error("transient failure fetching rule set {id}: {message}")]
    Transient { id: String, message: String },

    #[error("failed to fetch rule set {id}: {message}")]
    Fetch { id: String, message: String },

    #[error("fetching rule set {id} timed out after {after:?}")]
    TimedOut { id: String, after: Duration },
}

impl RuleSetError {
    pub fn rule_set_id(&self) -> &str {
        match self {
            RuleSetError::NotFound(id)
            | RuleSetError::Transient { id, .. }
            | RuleSetError::Fetch { id, .. }
            | RuleSetError::TimedOut { id, .. } => id,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, RuleSetError::Transient { .. } | RuleSetError::TimedOut { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("transient failure listing {kind}: {message}")]
    Transient { kind: ResourceKind, message: String },

    #[error("failed to list {kind}: {message}")]
    Fetch { kind: ResourceKind, message: String },

    #[error("listing {kind} did not finish before the run deadline")]
    TimedOut { kind: ResourceKind },
}

impl InventoryError {
    pub fn kind(&self) -> ResourceKind {
        match self {
            InventoryError::Transient { kind, .. }
            | InventoryError::Fetch { kind, .. }
            | InventoryError::TimedOut { kind } => *kind,
        }
    }
}

/// Why a single resource could not be correlated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrelationError {
    #[error(transparent)]
    RuleSet(#[from] RuleSetError),

    #[error("run deadline expired before the resource was evaluated")]
    DeadlineExceeded,
}

#[derive(Error, Debug)]
pub enum ExposureError {
    #[error("no inventory could be fetched ({} resource kinds failed)", .0.len())]
    InventoryUnavailable(Vec<InventoryError>),
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
