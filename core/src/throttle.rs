//! Rate and latency bounds for rule-set fetches.

use std::time::Duration;

use async_trait::async_trait;
use exposr_common::error::RuleSetError;
use exposr_common::firewall::RuleSet;
use exposr_common::providers::RuleSetProvider;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::warn;

/// Wraps a [`RuleSetProvider`] so that at most `concurrency` fetches are in flight and
/// no single fetch outlives `fetch_timeout`.
///
/// The timeout starts once a permit is held; time spent queueing is not counted.
pub struct ThrottledRuleSets {
    inner: Box<dyn RuleSetProvider>,
    permits: Semaphore,
    fetch_timeout: Duration,
}

impl ThrottledRuleSets {
    pub fn new(inner: Box<dyn RuleSetProvider>, concurrency: usize, fetch_timeout: Duration) -> Self {
        Self {
            inner,
            permits: Semaphore::new(concurrency.max(1)),
            fetch_timeout,
        }
    }
}

#[async_trait]
impl RuleSetProvider for ThrottledRuleSets {
    async fn get_rule_set(&self, id: &str) -> Result<RuleSet, RuleSetError> {
        let _permit = self.permits.acquire().await.map_err(|_| RuleSetError::Fetch {
            id: id.to_string(),
            message: "fetch throttle closed".to_string(),
        })?;

        match timeout(self.fetch_timeout, self.inner.get_rule_set(id)).await {
            Ok(result) => result,
            Err(_elapsed) => {
                warn!(rule_set = id, timeout = ?self.fetch_timeout, "Rule set fetch timed out");
                Err(RuleSetError::TimedOut {
                    id: id.to_string(),
                    after: self.fetch_timeout,
                })
            }
        }
    }
}
