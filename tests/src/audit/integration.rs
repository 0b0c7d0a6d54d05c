use std::time::Duration;

use exposr_common::error::{CorrelationError, ExposureError, InventoryError, RuleSetError};
use exposr_common::firewall::{NO_DESCRIPTION, Permission, RuleSet, SourceRange};
use exposr_common::resource::{LoadBalancerGeneration, ResourceKind};
use exposr_core::auditor::ExposureAuditor;
use exposr_core::memory::{StaticInventory, StaticRuleSets};
use exposr_core::report::{ExposureReport, KindStatus};

use super::fixtures::{balancer, config, database, instance, rule_set};

async fn audit(inventory: StaticInventory, rule_sets: StaticRuleSets) -> ExposureReport {
    let auditor = ExposureAuditor::new(Box::new(inventory), Box::new(rule_sets), &config());
    auditor.run().await.expect("audit aborted")
}

/// A web host with SSH open to the world yields exactly one instance finding.
#[tokio::test]
async fn open_ssh_on_public_instance() {
    let inventory = StaticInventory::new().with_instances(vec![instance(
        "web",
        "i-1",
        "203.0.113.5",
        &["sg-1"],
    )]);
    let rule_sets =
        StaticRuleSets::new().with_rule_set(rule_set("sg-1", &[(22, 22, "0.0.0.0/0", "ssh")]));

    let report = audit(inventory, rule_sets).await;

    let findings = report.findings(ResourceKind::ComputeInstance);
    assert_eq!(findings.len(), 1, "Unexpected findings: {:?}", findings);
    let finding = &findings[0];
    assert_eq!(finding.resource.name, "web");
    assert_eq!(finding.resource.address, "203.0.113.5");
    assert_eq!(finding.rule.port_range.to_string(), "22");
    assert_eq!(finding.rule.source.to_string(), "0.0.0.0/0");
    assert_eq!(finding.rule.description(), "ssh");
    assert!(report.is_complete());
    assert_eq!(report.total_findings(), 1);
}

#[tokio::test]
async fn private_source_is_not_exposure() {
    let inventory = StaticInventory::new().with_instances(vec![instance(
        "app",
        "i-2",
        "203.0.113.6",
        &["sg-2"],
    )]);
    let rule_sets = StaticRuleSets::new()
        .with_rule_set(rule_set("sg-2", &[(5432, 5432, "10.0.0.0/16", "vpc")]));

    let report = audit(inventory, rule_sets).await;

    assert_eq!(report.total_findings(), 0);
    let section = report.section(ResourceKind::ComputeInstance).unwrap();
    assert_eq!(section.status(), KindStatus::NoExposure);
    assert_eq!(section.resources.len(), 1);
}

#[tokio::test]
async fn internal_balancer_is_excluded() {
    let inventory = StaticInventory::new().with_load_balancers(vec![
        balancer(LoadBalancerGeneration::Application, "private-api", "internal", &["sg-open"]),
        balancer(LoadBalancerGeneration::Legacy, "legacy-web", "internet-facing", &["sg-open"]),
    ]);
    let rule_sets = StaticRuleSets::new()
        .with_rule_set(rule_set("sg-open", &[(0, 65535, "0.0.0.0/0", "everything")]));

    let report = audit(inventory, rule_sets).await;

    let albs = report.section(ResourceKind::ApplicationLoadBalancer).unwrap();
    assert!(albs.findings.is_empty());
    assert!(albs.resources.is_empty());
    assert_eq!(albs.excluded, 1);

    let elbs = report.findings(ResourceKind::LegacyLoadBalancer);
    assert_eq!(elbs.len(), 1);
    assert_eq!(elbs[0].resource.name, "legacy-web");
    assert_eq!(elbs[0].rule.port_range.to_string(), "0 - 65535");
}

#[tokio::test]
async fn private_database_is_excluded() {
    let inventory = StaticInventory::new().with_databases(vec![
        database("orders", false, &["sg-db"]),
        database("analytics", true, &["sg-db"]),
    ]);
    let rule_sets = StaticRuleSets::new()
        .with_rule_set(rule_set("sg-db", &[(5432, 5432, "0.0.0.0/0", "postgres")]));

    let report = audit(inventory, rule_sets).await;

    let findings = report.findings(ResourceKind::ManagedDatabase);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].resource.name, "analytics");
    assert_eq!(findings[0].resource.address, "analytics.rds.amazonaws.com:5432");
}

/// A rule set that cannot be fetched fails its resource without hiding anyone else's findings.
#[tokio::test]
async fn failed_lookup_is_isolated() {
    let inventory = StaticInventory::new().with_instances(vec![
        instance("broken", "i-3", "203.0.113.7", &["sg-gone"]),
        instance("web", "i-4", "203.0.113.8", &["sg-web"]),
    ]);
    let rule_sets = StaticRuleSets::new()
        .with_rule_set(rule_set("sg-web", &[(443, 443, "0.0.0.0/0", "https")]))
        .with_failure(
            "sg-gone",
            RuleSetError::Fetch {
                id: "sg-gone".to_string(),
                message: "access denied".to_string(),
            },
        );

    let report = audit(inventory, rule_sets).await;

    let section = report.section(ResourceKind::ComputeInstance).unwrap();
    assert_eq!(section.findings.len(), 1);
    assert_eq!(section.findings[0].resource.name, "web");
    assert_eq!(section.failures.len(), 1);
    assert_eq!(section.failures[0].resource.id, "i-3");
    assert!(!report.is_complete());
    assert!(!report.is_partial());
}

#[tokio::test]
async fn unknown_rule_set_is_a_failure() {
    let inventory = StaticInventory::new().with_instances(vec![instance(
        "orphan",
        "i-5",
        "203.0.113.9",
        &["sg-missing"],
    )]);

    let report = audit(inventory, StaticRuleSets::new()).await;

    let section = report.section(ResourceKind::ComputeInstance).unwrap();
    assert_eq!(section.status(), KindStatus::Indeterminate);
    assert_eq!(
        section.failures[0].error,
        CorrelationError::RuleSet(RuleSetError::NotFound("sg-missing".to_string()))
    );
}

#[tokio::test]
async fn malformed_range_is_reported() {
    let inventory = StaticInventory::new().with_instances(vec![instance(
        "web",
        "i-6",
        "203.0.113.10",
        &["sg-mixed"],
    )]);
    let mixed = RuleSet::new("sg-mixed").with_permission(
        Permission::new("tcp", Some(80), Some(80))
            .with_source(SourceRange::new("not-a-cidr"))
            .with_source(SourceRange::new("0.0.0.0/0")),
    );
    let rule_sets = StaticRuleSets::new().with_rule_set(mixed);

    let report = audit(inventory, rule_sets).await;

    let section = report.section(ResourceKind::ComputeInstance).unwrap();
    assert_eq!(section.findings.len(), 1);
    assert_eq!(section.findings[0].rule.description(), NO_DESCRIPTION);
    assert_eq!(section.malformed.len(), 1);
    assert_eq!(section.malformed[0].raw(), "not-a-cidr");
    assert_eq!(section.malformed[0].rule_set_id, "sg-mixed");
}

#[tokio::test]
async fn failed_inventory_keeps_other_sections() {
    let inventory = StaticInventory::new()
        .with_instances(vec![instance("web", "i-7", "203.0.113.11", &["sg-web"])])
        .with_failure(InventoryError::Fetch {
            kind: ResourceKind::ManagedDatabase,
            message: "throttled".to_string(),
        });
    let rule_sets =
        StaticRuleSets::new().with_rule_set(rule_set("sg-web", &[(80, 80, "0.0.0.0/0", "http")]));

    let report = audit(inventory, rule_sets).await;

    assert_eq!(report.findings(ResourceKind::ComputeInstance).len(), 1);
    let databases = report.section(ResourceKind::ManagedDatabase).unwrap();
    assert_eq!(databases.status(), KindStatus::Unavailable);
    assert!(!report.is_complete());
}

#[tokio::test]
async fn total_inventory_outage_aborts() {
    let inventory = ResourceKind::ALL
        .into_iter()
        .fold(StaticInventory::new(), |inventory, kind| {
            inventory.with_failure(InventoryError::Transient {
                kind,
                message: "service unavailable".to_string(),
            })
        });
    let auditor = ExposureAuditor::new(
        Box::new(inventory),
        Box::new(StaticRuleSets::new()),
        &config(),
    );

    match auditor.run().await {
        Err(ExposureError::InventoryUnavailable(errors)) => assert_eq!(errors.len(), 4),
        other => panic!("Expected an aborted audit, got {:?}", other),
    }
}

#[tokio::test]
async fn slow_lookup_times_out() {
    let inventory = StaticInventory::new().with_instances(vec![instance(
        "web",
        "i-8",
        "203.0.113.12",
        &["sg-slow"],
    )]);
    let rule_sets = StaticRuleSets::new()
        .with_rule_set(rule_set("sg-slow", &[(22, 22, "0.0.0.0/0", "ssh")]))
        .with_latency(Duration::from_millis(500));

    let mut cfg = config();
    cfg.fetch_timeout = Duration::from_millis(20);
    let auditor = ExposureAuditor::new(Box::new(inventory), Box::new(rule_sets), &cfg);
    let report = auditor.run().await.expect("audit aborted");

    let section = report.section(ResourceKind::ComputeInstance).unwrap();
    assert!(section.findings.is_empty());
    assert!(matches!(
        section.failures[0].error,
        CorrelationError::RuleSet(RuleSetError::TimedOut { .. })
    ));
}

#[tokio::test]
async fn run_deadline_yields_partial_report() {
    let inventory = StaticInventory::new().with_instances(vec![
        instance("a", "i-9", "203.0.113.13", &["sg-web"]),
        instance("b", "i-10", "203.0.113.14", &["sg-web"]),
    ]);
    let rule_sets = StaticRuleSets::new()
        .with_rule_set(rule_set("sg-web", &[(80, 80, "0.0.0.0/0", "http")]))
        .with_latency(Duration::from_millis(500));

    let mut cfg = config();
    cfg.deadline = Some(Duration::from_millis(50));
    let auditor = ExposureAuditor::new(Box::new(inventory), Box::new(rule_sets), &cfg);
    let report = auditor.run().await.expect("audit aborted");

    assert!(report.is_partial());
    assert!(!report.is_complete());
    let section = report.section(ResourceKind::ComputeInstance).unwrap();
    assert_eq!(section.failures.len(), 2);
    assert!(section
        .failures
        .iter()
        .all(|failure| failure.error == CorrelationError::DeadlineExceeded));
}
