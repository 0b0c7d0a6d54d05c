//! In-memory providers backed by owned snapshots.
//!
//! Useful for offline runs against a captured inventory and for exercising the
//! auditor without a cloud account. Failures and latency can be injected per
//! resource kind or per rule set.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use exposr_common::error::{InventoryError, RuleSetError};
use exposr_common::firewall::RuleSet;
use exposr_common::providers::{InventoryProvider, RuleSetProvider};
use exposr_common::resource::{
    ComputeInstance, LoadBalancer, LoadBalancerGeneration, ManagedDatabase, ResourceKind,
};

/// Returns the resources it was built with. Unlike a live provider it does not
/// pre-filter instances without a public address.
#[derive(Debug, Default, Clone)]
pub struct StaticInventory {
    instances: Vec<ComputeInstance>,
    load_balancers: Vec<LoadBalancer>,
    databases: Vec<ManagedDatabase>,
    failures: HashMap<ResourceKind, InventoryError>,
    latency: HashMap<ResourceKind, Duration>,
}

impl StaticInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instances(mut self, instances: Vec<ComputeInstance>) -> Self {
        self.instances.extend(instances);
        self
    }

    /// Balancers of both generations; they are split by generation when listed.
    pub fn with_load_balancers(mut self, load_balancers: Vec<LoadBalancer>) -> Self {
        self.load_balancers.extend(load_balancers);
        self
    }

    pub fn with_databases(mut self, databases: Vec<ManagedDatabase>) -> Self {
        self.databases.extend(databases);
        self
    }

    /// Makes listing `error.kind()` fail with `error`.
    pub fn with_failure(mut self, error: InventoryError) -> Self {
        self.failures.insert(error.kind(), error);
        self
    }

    /// Delays listing `kind`, to simulate a slow inventory API.
    pub fn with_latency(mut self, kind: ResourceKind, latency: Duration) -> Self {
        self.latency.insert(kind, latency);
        self
    }

    async fn check(&self, kind: ResourceKind) -> Result<(), InventoryError> {
        if let Some(latency) = self.latency.get(&kind) {
            tokio::time::sleep(*latency).await;
        }
        match self.failures.get(&kind) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl InventoryProvider for StaticInventory {
    async fn list_running_compute_instances(&self) -> Result<Vec<ComputeInstance>, InventoryError> {
        self.check(ResourceKind::ComputeInstance).await?;
        Ok(self.instances.clone())
    }

    async fn list_load_balancers(
        &self,
        generation: LoadBalancerGeneration,
    ) -> Result<Vec<LoadBalancer>, InventoryError> {
        self.check(generation.kind()).await?;
        Ok(self
            .load_balancers
            .iter()
            .filter(|lb| lb.generation == generation)
            .cloned()
            .collect())
    }

    async fn list_database_instances(&self) -> Result<Vec<ManagedDatabase>, InventoryError> {
        self.check(ResourceKind::ManagedDatabase).await?;
        Ok(self.databases.clone())
    }
}

/// Resolves rule sets from a map. Unknown identifiers are [`RuleSetError::NotFound`].
#[derive(Debug, Default, Clone)]
pub struct StaticRuleSets {
    rule_sets: HashMap<String, RuleSet>,
    failures: HashMap<String, RuleSetError>,
    latency: Option<Duration>,
}

impl StaticRuleSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule_set(mut self, rule_set: RuleSet) -> Self {
        self.rule_sets.insert(rule_set.id.clone(), rule_set);
        self
    }

    pub fn with_failure(mut self, id: impl Into<String>, error: RuleSetError) -> Self {
        self.failures.insert(id.into(), error);
        self
    }

    /// Delays every lookup, to simulate a slow API.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl RuleSetProvider for StaticRuleSets {
    async fn get_rule_set(&self, id: &str) -> Result<RuleSet, RuleSetError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = self.failures.get(id) {
            return Err(error.clone());
        }
        self.rule_sets
            .get(id)
            .cloned()
            .ok_or_else(|| RuleSetError::NotFound(id.to_string()))
    }
}
