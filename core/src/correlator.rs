//! # Resource Correlator
//!
//! Resolves the rule sets attached to one resource and turns every public-sourced
//! ingress rule into a [`Finding`] for that resource.
//!
//! A failing lookup fails the whole resource: reporting the rule sets that did resolve
//! would present a partial picture as a complete one.

use exposr_common::error::RuleSetError;
use exposr_common::finding::Finding;
use exposr_common::firewall::MalformedSource;
use exposr_common::providers::RuleSetProvider;
use exposr_common::resource::Resource;
use futures::future::try_join_all;
use tracing::debug;

use crate::extractor::{Extraction, extract_public_ingress_rules};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Correlation {
    pub findings: Vec<Finding>,
    pub malformed: Vec<MalformedSource>,
}

/// Produces the findings of `resource`, in the order of its rule-set identifiers.
///
/// Rule sets are fetched concurrently. A resource without rule sets yields an empty
/// [`Correlation`].
pub async fn find_exposures(
    resource: &dyn Resource,
    rule_sets: &dyn RuleSetProvider,
) -> Result<Correlation, RuleSetError> {
    let identity = resource.identity();
    let ids = resource.rule_set_ids();

    debug!(resource = %identity.name, rule_sets = ids.len(), "Correlating");

    let resolved = try_join_all(ids.iter().map(|id| rule_sets.get_rule_set(id))).await?;

    let mut correlation = Correlation::default();
    for rule_set in &resolved {
        let Extraction { rules, malformed } = extract_public_ingress_rules(rule_set);
        correlation.findings.extend(rules.into_iter().map(|rule| Finding {
            resource: identity.clone(),
            rule,
        }));
        correlation.malformed.extend(malformed);
    }

    Ok(correlation)
}
