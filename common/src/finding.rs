use crate::error::CorrelationError;
use crate::firewall::IngressRule;
use crate::resource::ResourceIdentity;

/// A resource reachable from a public range through one ingress rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub resource: ResourceIdentity,
    pub rule: IngressRule,
}

/// A resource whose exposure could not be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFailure {
    pub resource: ResourceIdentity,
    pub error: CorrelationError,
}
