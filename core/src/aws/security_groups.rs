use async_trait::async_trait;
use aws_sdk_ec2::error::SdkError;
use aws_sdk_ec2::operation::describe_security_groups::DescribeSecurityGroupsError;
use aws_sdk_ec2::types::{IpPermission, SecurityGroup};
use exposr_common::error::RuleSetError;
use exposr_common::firewall::{Permission, RuleSet, SourceRange};
use exposr_common::providers::RuleSetProvider;
use tracing::debug;

use super::{FailureClass, classify, describe};

const NOT_FOUND_CODES: &[&str] = &["InvalidGroup.NotFound"];

/// Resolves security groups by id through `DescribeSecurityGroups`.
pub struct Ec2SecurityGroups {
    ec2: aws_sdk_ec2::Client,
}

impl Ec2SecurityGroups {
    pub fn new(ec2: aws_sdk_ec2::Client) -> Self {
        Self { ec2 }
    }
}

#[async_trait]
impl RuleSetProvider for Ec2SecurityGroups {
    async fn get_rule_set(&self, id: &str) -> Result<RuleSet, RuleSetError> {
        debug!(rule_set = id, "Describing security group");

        let output = self
            .ec2
            .describe_security_groups()
            .group_ids(id)
            .send()
            .await
            .map_err(|err| to_rule_set_error(id, &err))?;

        output
            .security_groups()
            .first()
            .map(to_rule_set)
            .ok_or_else(|| RuleSetError::NotFound(id.to_string()))
    }
}

fn to_rule_set_error<R>(id: &str, err: &SdkError<DescribeSecurityGroupsError, R>) -> RuleSetError
where
    R: std::fmt::Debug,
{
    let id = id.to_string();
    match classify(err, NOT_FOUND_CODES) {
        FailureClass::NotFound => RuleSetError::NotFound(id),
        FailureClass::Transient => RuleSetError::Transient {
            id,
            message: describe(err),
        },
        FailureClass::Other => RuleSetError::Fetch {
            id,
            message: describe(err),
        },
    }
}

/// Ingress side only; egress permissions are not part of the audit.
pub(crate) fn to_rule_set(group: &SecurityGroup) -> RuleSet {
    RuleSet {
        id: group.group_id().unwrap_or_default().to_string(),
        name: group.group_name().map(str::to_string),
        ingress: group.ip_permissions().iter().map(to_permission).collect(),
    }
}

/// Only IPv4 ranges are carried over.
fn to_permission(permission: &IpPermission) -> Permission {
    Permission {
        protocol: permission.ip_protocol().unwrap_or("-1").to_string(),
        from_port: permission.from_port(),
        to_port: permission.to_port(),
        sources: permission
            .ip_ranges()
            .iter()
            .filter_map(|range| {
                range.cidr_ip().map(|cidr| SourceRange {
                    cidr: cidr.to_string(),
                    description: range.description().map(str::to_string),
                })
            })
            .collect(),
    }
}
