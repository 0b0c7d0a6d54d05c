//! # Audited Resources
//!
//! Every resource kind the auditor looks at implements [`Resource`]: it knows its
//! identity, the rule sets attached to it, and whether it passes its own reachability
//! gate (public address, non-internal scheme, publicly accessible flag).

use std::fmt;

/// Name used for compute instances without a `Name` tag.
pub const UNNAMED: &str = "unnamed";

/// Load balancer scheme value that keeps a balancer off the Internet.
pub const INTERNAL_SCHEME: &str = "internal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    ComputeInstance,
    ApplicationLoadBalancer,
    LegacyLoadBalancer,
    ManagedDatabase,
}

impl ResourceKind {
    /// Presentation order of the report sections.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::ComputeInstance,
        ResourceKind::ApplicationLoadBalancer,
        ResourceKind::LegacyLoadBalancer,
        ResourceKind::ManagedDatabase,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::ComputeInstance => "compute instances",
            ResourceKind::ApplicationLoadBalancer => "application load balancers",
            ResourceKind::LegacyLoadBalancer => "legacy load balancers",
            ResourceKind::ManagedDatabase => "database instances",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a resource shows up in a report row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentity {
    pub kind: ResourceKind,
    pub name: String,
    /// Provider identifier (instance id, balancer name, database identifier).
    pub id: String,
    /// Public address, DNS name or endpoint. Empty when the provider reported none.
    pub address: String,
}

pub trait Resource: fmt::Debug + Send + Sync {
    fn kind(&self) -> ResourceKind;
    fn identity(&self) -> ResourceIdentity;
    fn is_reachable(&self) -> bool;
    fn rule_set_ids(&self) -> &[String];

    fn display_name(&self) -> String {
        self.identity().name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeInstance {
    pub name: String,
    pub instance_id: String,
    pub public_ip: Option<String>,
    pub security_group_ids: Vec<String>,
}

impl ComputeInstance {
    /// Picks the `Name` tag value, or [`UNNAMED`].
    pub fn name_from_tags<'a, I>(tags: I) -> String
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        tags.into_iter()
            .find(|(key, _)| *key == "Name")
            .map(|(_, value)| value.to_string())
            .unwrap_or_else(|| UNNAMED.to_string())
    }
}

impl Resource for ComputeInstance {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeInstance
    }

    fn identity(&self) -> ResourceIdentity {
        ResourceIdentity {
            kind: self.kind(),
            name: self.name.clone(),
            id: self.instance_id.clone(),
            address: self.public_ip.clone().unwrap_or_default(),
        }
    }

    fn is_reachable(&self) -> bool {
        self.public_ip.is_some()
    }

    fn rule_set_ids(&self) -> &[String] {
        &self.security_group_ids
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadBalancerGeneration {
    /// Classic balancers.
    Legacy,
    /// Application and network balancers.
    Application,
}

impl LoadBalancerGeneration {
    pub fn kind(&self) -> ResourceKind {
        match self {
            LoadBalancerGeneration::Legacy => ResourceKind::LegacyLoadBalancer,
            LoadBalancerGeneration::Application => ResourceKind::ApplicationLoadBalancer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancer {
    pub generation: LoadBalancerGeneration,
    pub name: String,
    pub dns_name: String,
    pub scheme: String,
    pub security_group_ids: Vec<String>,
}

impl Resource for LoadBalancer {
    fn kind(&self) -> ResourceKind {
        self.generation.kind()
    }

    fn identity(&self) -> ResourceIdentity {
        ResourceIdentity {
            kind: self.kind(),
            name: self.name.clone(),
            id: self.name.clone(),
            address: self.dns_name.clone(),
        }
    }

    fn is_reachable(&self) -> bool {
        self.scheme != INTERNAL_SCHEME
    }

    fn rule_set_ids(&self) -> &[String] {
        &self.security_group_ids
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedDatabase {
    pub identifier: String,
    /// `host:port`, when the instance has an endpoint yet.
    pub endpoint: Option<String>,
    pub publicly_accessible: bool,
    pub security_group_ids: Vec<String>,
}

impl Resource for ManagedDatabase {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ManagedDatabase
    }

    fn identity(&self) -> ResourceIdentity {
        ResourceIdentity {
            kind: self.kind(),
            name: self.identifier.clone(),
            id: self.identifier.clone(),
            address: self.endpoint.clone().unwrap_or_default(),
        }
    }

    fn is_reachable(&self) -> bool {
        self.publicly_accessible
    }

    fn rule_set_ids(&self) -> &[String] {
        &self.security_group_ids
    }
}

pub fn to_boxed<R>(resources: Vec<R>) -> Vec<Box<dyn Resource>>
where
    R: Resource + 'static,
{
    resources
        .into_iter()
        .map(|resource| Box::new(resource) as Box<dyn Resource>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balancer(scheme: &str) -> LoadBalancer {
        LoadBalancer {
            generation: LoadBalancerGeneration::Application,
            name: "edge".to_string(),
            dns_name: "edge-123.elb.example.com".to_string(),
            scheme: scheme.to_string(),
            security_group_ids: vec!["sg-1".to_string()],
        }
    }

    #[test]
    fn name_tag_is_used_when_present() {
        let tags = [("env", "prod"), ("Name", "bastion")];
        assert_eq!(ComputeInstance::name_from_tags(tags), "bastion");
    }

    #[test]
    fn missing_name_tag_falls_back_to_unnamed() {
        assert_eq!(ComputeInstance::name_from_tags([("name", "lowercase")]), UNNAMED);
        assert_eq!(ComputeInstance::name_from_tags(Vec::<(&str, &str)>::new()), UNNAMED);
    }

    #[test]
    fn compute_instance_gate_is_public_address() {
        let mut instance = ComputeInstance {
            name: "web".to_string(),
            instance_id: "i-0abc".to_string(),
            public_ip: None,
            security_group_ids: vec![],
        };
        assert!(!instance.is_reachable());
        instance.public_ip = Some("203.0.113.5".to_string());
        assert!(instance.is_reachable());
        assert_eq!(instance.identity().address, "203.0.113.5");
    }

    #[test]
    fn internal_balancers_are_not_reachable() {
        assert!(!balancer("internal").is_reachable());
        assert!(balancer("internet-facing").is_reachable());
    }

    #[test]
    fn balancer_kind_follows_generation() {
        let mut lb = balancer("internet-facing");
        assert_eq!(lb.kind(), ResourceKind::ApplicationLoadBalancer);
        lb.generation = LoadBalancerGeneration::Legacy;
        assert_eq!(lb.identity().kind, ResourceKind::LegacyLoadBalancer);
    }

    #[test]
    fn database_gate_is_publicly_accessible_flag() {
        let db = ManagedDatabase {
            identifier: "orders".to_string(),
            endpoint: Some("orders.example.com:5432".to_string()),
            publicly_accessible: false,
            security_group_ids: vec!["sg-db".to_string()],
        };
        assert!(!db.is_reachable());
        assert_eq!(db.rule_set_ids(), ["sg-db".to_string()]);
    }
}
