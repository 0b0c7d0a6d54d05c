use std::time::Duration;

use exposr_common::config::Config;
use exposr_common::firewall::{Permission, RuleSet, SourceRange};
use exposr_common::resource::{
    ComputeInstance, LoadBalancer, LoadBalancerGeneration, ManagedDatabase,
};

pub fn config() -> Config {
    Config {
        region: Some("eu-west-1".to_string()),
        concurrency: 4,
        fetch_timeout: Duration::from_secs(5),
        deadline: None,
        no_banner: true,
        quiet: 2,
    }
}

pub fn instance(name: &str, id: &str, ip: &str, groups: &[&str]) -> ComputeInstance {
    ComputeInstance {
        name: name.to_string(),
        instance_id: id.to_string(),
        public_ip: Some(ip.to_string()),
        security_group_ids: groups.iter().map(|g| g.to_string()).collect(),
    }
}

pub fn balancer(
    generation: LoadBalancerGeneration,
    name: &str,
    scheme: &str,
    groups: &[&str],
) -> LoadBalancer {
    LoadBalancer {
        generation,
        name: name.to_string(),
        dns_name: format!("{name}.eu-west-1.elb.amazonaws.com"),
        scheme: scheme.to_string(),
        security_group_ids: groups.iter().map(|g| g.to_string()).collect(),
    }
}

pub fn database(identifier: &str, publicly_accessible: bool, groups: &[&str]) -> ManagedDatabase {
    ManagedDatabase {
        identifier: identifier.to_string(),
        endpoint: Some(format!("{identifier}.rds.amazonaws.com:5432")),
        publicly_accessible,
        security_group_ids: groups.iter().map(|g| g.to_string()).collect(),
    }
}

/// A rule set with one TCP permission per `(from, to, cidr, description)`.
pub fn rule_set(id: &str, rules: &[(i32, i32, &str, &str)]) -> RuleSet {
    rules
        .iter()
        .fold(RuleSet::new(id), |rule_set, (from, to, cidr, description)| {
            rule_set.with_permission(
                Permission::new("tcp", Some(*from), Some(*to))
                    .with_source(SourceRange::new(*cidr).with_description(*description)),
            )
        })
}
