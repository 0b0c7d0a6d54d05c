//! # Exposure Audit Service
//!
//! Implements the "audit a region" use case.
//!
//! Orchestrates the run by:
//! 1. fetching the four inventories concurrently through the [`InventoryProvider`],
//! 2. dropping resources that fail their reachability gate,
//! 3. correlating the rest through a bounded, order-preserving stream,
//! 4. grouping findings and failures per resource kind into an [`ExposureReport`].
//!
//! Nothing here retries or caches: adapters own retry policy, and each run re-reads
//! everything.

use std::future::Future;
use std::time::Duration;

use exposr_common::config::Config;
use exposr_common::error::{CorrelationError, ExposureError, InventoryError};
use exposr_common::finding::ResourceFailure;
use exposr_common::providers::{InventoryProvider, RuleSetProvider};
use exposr_common::resource::{LoadBalancerGeneration, Resource, ResourceKind, to_boxed};
use futures::stream::{self, StreamExt};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, info, warn};

use crate::correlator::find_exposures;
use crate::report::{ExposureReport, KindReport};
use crate::throttle::ThrottledRuleSets;

type Inventory = Result<Vec<Box<dyn Resource>>, InventoryError>;

/// Called after each resource settles with `(kind, settled, total)`.
pub type ProgressCallback = Box<dyn Fn(ResourceKind, usize, usize) + Send + Sync>;

/// Application service for the exposure audit.
pub struct ExposureAuditor {
    inventory: Box<dyn InventoryProvider>,
    rule_sets: ThrottledRuleSets,
    concurrency: usize,
    deadline: Option<Duration>,
    on_progress: Option<ProgressCallback>,
}

impl ExposureAuditor {
    pub fn new(
        inventory: Box<dyn InventoryProvider>,
        rule_sets: Box<dyn RuleSetProvider>,
        cfg: &Config,
    ) -> Self {
        let concurrency = cfg.concurrency.max(1);
        Self {
            inventory,
            rule_sets: ThrottledRuleSets::new(rule_sets, concurrency, cfg.fetch_timeout),
            concurrency,
            deadline: cfg.deadline,
            on_progress: None,
        }
    }

    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Runs the audit.
    ///
    /// Fails only when no inventory at all could be fetched; every narrower failure
    /// is recorded in the report instead.
    pub async fn run(&self) -> Result<ExposureReport, ExposureError> {
        let deadline = self.deadline.map(|limit| Instant::now() + limit);

        let inventories = self.fetch_inventories(deadline).await;

        if inventories.iter().all(|(_, inventory)| inventory.is_err()) {
            let errors: Vec<InventoryError> = inventories
                .into_iter()
                .filter_map(|(_, inventory)| inventory.err())
                .collect();
            error!("Every inventory request failed, aborting");
            return Err(ExposureError::InventoryUnavailable(errors));
        }

        let mut report = ExposureReport::default();
        for (kind, inventory) in inventories {
            let section = match inventory {
                Ok(resources) => self.audit_kind(kind, resources, deadline).await,
                Err(err) => {
                    warn!(%kind, error = %err, "Inventory unavailable");
                    KindReport::unavailable(err)
                }
            };
            report.sections.push(section);
        }

        info!(
            findings = report.total_findings(),
            resources = report.total_resources(),
            "Audit finished"
        );
        Ok(report)
    }

    async fn fetch_inventories(&self, deadline: Option<Instant>) -> Vec<(ResourceKind, Inventory)> {
        let provider = self.inventory.as_ref();

        let (instances, application, legacy, databases) = tokio::join!(
            within(deadline, provider.list_running_compute_instances()),
            within(deadline, provider.list_load_balancers(LoadBalancerGeneration::Application)),
            within(deadline, provider.list_load_balancers(LoadBalancerGeneration::Legacy)),
            within(deadline, provider.list_database_instances()),
        );

        vec![
            settle(ResourceKind::ComputeInstance, instances.map(|r| r.map(to_boxed))),
            settle(ResourceKind::ApplicationLoadBalancer, application.map(|r| r.map(to_boxed))),
            settle(ResourceKind::LegacyLoadBalancer, legacy.map(|r| r.map(to_boxed))),
            settle(ResourceKind::ManagedDatabase, databases.map(|r| r.map(to_boxed))),
        ]
    }

    async fn audit_kind(
        &self,
        kind: ResourceKind,
        resources: Vec<Box<dyn Resource>>,
        deadline: Option<Instant>,
    ) -> KindReport {
        let mut section = KindReport::new(kind);

        let (reachable, excluded): (Vec<_>, Vec<_>) =
            resources.into_iter().partition(|resource| resource.is_reachable());
        for resource in &excluded {
            debug!(resource = %resource.display_name(), "Excluded by reachability gate");
        }
        section.excluded = excluded.len();
        section.resources = reachable.iter().map(|resource| resource.identity()).collect();

        let total = reachable.len();
        info!(%kind, total, excluded = section.excluded, "Correlating resources");

        let rule_sets = &self.rule_sets;
        let mut outcomes = stream::iter(reachable.iter().map(|resource| async move {
            (resource.identity(), find_exposures(&**resource, rule_sets).await)
        }))
        .buffered(self.concurrency);

        let mut settled = 0;
        while let Some(next) = within(deadline, outcomes.next()).await {
            let Some((identity, outcome)) = next else { break };
            match outcome {
                Ok(correlation) => {
                    section.findings.extend(correlation.findings);
                    section.malformed.extend(correlation.malformed);
                }
                Err(err) => {
                    warn!(
                        resource = %identity.name,
                        rule_set = err.rule_set_id(),
                        error = %err,
                        "Could not evaluate resource"
                    );
                    section.failures.push(ResourceFailure {
                        resource: identity,
                        error: CorrelationError::RuleSet(err),
                    });
                }
            }
            settled += 1;
            if let Some(on_progress) = &self.on_progress {
                on_progress(kind, settled, total);
            }
        }
        drop(outcomes);

        if settled < total {
            warn!(%kind, pending = total - settled, "Run deadline expired");
            section.partial = true;
            section
                .failures
                .extend(reachable[settled..].iter().map(|resource| ResourceFailure {
                    resource: resource.identity(),
                    error: CorrelationError::DeadlineExceeded,
                }));
        }

        section
    }
}

/// Awaits `future` unless `deadline` passes first.
async fn within<F: Future>(deadline: Option<Instant>, future: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => timeout_at(deadline, future).await.ok(),
        None => Some(future.await),
    }
}

fn settle(kind: ResourceKind, fetched: Option<Inventory>) -> (ResourceKind, Inventory) {
    let inventory = fetched.unwrap_or(Err(InventoryError::TimedOut { kind }));
    (kind, inventory)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
