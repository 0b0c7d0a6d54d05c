//! # Providers
//!
//! Contracts for the data the auditor reads but does not own. Adapters implement these
//! against a concrete cloud API (or an in-memory snapshot); the core only sees the traits.
//!
//! Implementations must be safe to call concurrently from several in-flight requests.

use async_trait::async_trait;

use crate::error::{InventoryError, RuleSetError};
use crate::firewall::RuleSet;
use crate::resource::{ComputeInstance, LoadBalancer, LoadBalancerGeneration, ManagedDatabase};

/// Lists the resources of a region. Pagination is handled inside the implementation.
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// Running instances that have a public address.
    async fn list_running_compute_instances(&self) -> Result<Vec<ComputeInstance>, InventoryError>;

    /// Balancers of one generation. Generations are listed separately so that one
    /// failing API does not hide the other.
    async fn list_load_balancers(
        &self,
        generation: LoadBalancerGeneration,
    ) -> Result<Vec<LoadBalancer>, InventoryError>;

    async fn list_database_instances(&self) -> Result<Vec<ManagedDatabase>, InventoryError>;
}

/// Resolves a rule set by its identifier.
#[async_trait]
pub trait RuleSetProvider: Send + Sync {
    /// Fails with [`RuleSetError::NotFound`] for unknown identifiers and
    /// [`RuleSetError::Transient`] for retriable network failures.
    async fn get_rule_set(&self, id: &str) -> Result<RuleSet, RuleSetError>;
}
