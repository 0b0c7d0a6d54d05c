//! # AWS Adapters
//!
//! Inventory and rule-set providers backed by the EC2, Elastic Load Balancing (classic
//! and v2) and RDS APIs, plus the STS caller identity shown before a run.
//!
//! All clients come from one [`SdkConfig`] loaded at startup and are handed to the
//! adapters explicitly through [`AwsClients`]. The SDK clients are reference counted and
//! safe to share between concurrent requests. Retries with backoff happen inside the
//! SDK (standard retry mode); the adapters only classify what is left.

use std::error::Error;
use std::fmt::Debug;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use exposr_common::config::Config;

mod identity;
mod inventory;
mod security_groups;

pub use identity::{CallerIdentity, caller_identity};
pub use inventory::AwsInventory;
pub use security_groups::Ec2SecurityGroups;

const MAX_ATTEMPTS: u32 = 3;

/// Error codes AWS uses when it is shedding load.
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "RequestLimitExceeded",
    "RequestThrottled",
    "TooManyRequestsException",
];

/// One client per service, all built from the same configuration.
#[derive(Debug, Clone)]
pub struct AwsClients {
    pub ec2: aws_sdk_ec2::Client,
    pub elb: aws_sdk_elasticloadbalancing::Client,
    pub elbv2: aws_sdk_elasticloadbalancingv2::Client,
    pub rds: aws_sdk_rds::Client,
    pub sts: aws_sdk_sts::Client,
}

impl AwsClients {
    pub fn from_conf(sdk_config: &SdkConfig) -> Self {
        Self {
            ec2: aws_sdk_ec2::Client::new(sdk_config),
            elb: aws_sdk_elasticloadbalancing::Client::new(sdk_config),
            elbv2: aws_sdk_elasticloadbalancingv2::Client::new(sdk_config),
            rds: aws_sdk_rds::Client::new(sdk_config),
            sts: aws_sdk_sts::Client::new(sdk_config),
        }
    }
}

/// Loads credentials and region from the default provider chain.
///
/// `cfg.region` overrides the region; `cfg.fetch_timeout` bounds every SDK operation,
/// retries included.
pub async fn load_sdk_config(cfg: &Config) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .retry_config(RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(cfg.fetch_timeout)
                .build(),
        );

    if let Some(region) = &cfg.region {
        loader = loader.region(Region::new(region.clone()));
    }

    loader.load().await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureClass {
    NotFound,
    Transient,
    Other,
}

pub(crate) fn classify<E, R>(err: &SdkError<E, R>, not_found_codes: &[&str]) -> FailureClass
where
    E: ProvideErrorMetadata,
{
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            FailureClass::Transient
        }
        _ => match err.code() {
            Some(code) if not_found_codes.contains(&code) => FailureClass::NotFound,
            Some(code) if THROTTLING_CODES.contains(&code) => FailureClass::Transient,
            _ => FailureClass::Other,
        },
    }
}

/// Full error chain, service message included.
pub(crate) fn describe<E, R>(err: &SdkError<E, R>) -> String
where
    E: Error + 'static,
    R: Debug,
{
    DisplayErrorContext(err).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::error::ErrorMetadata;
    use aws_sdk_ec2::operation::describe_security_groups::DescribeSecurityGroupsError;

    fn service_error(code: &str) -> SdkError<DescribeSecurityGroupsError, ()> {
        let meta = ErrorMetadata::builder().code(code).message("boom").build();
        SdkError::service_error(DescribeSecurityGroupsError::generic(meta), ())
    }

    #[test]
    fn timeouts_are_transient() {
        let err: SdkError<DescribeSecurityGroupsError, ()> = SdkError::timeout_error("slow");
        assert_eq!(classify(&err, &[]), FailureClass::Transient);
    }

    #[test]
    fn throttling_is_transient() {
        assert_eq!(classify(&service_error("RequestLimitExceeded"), &[]), FailureClass::Transient);
    }

    #[test]
    fn not_found_codes_are_recognised() {
        let err = service_error("InvalidGroup.NotFound");
        assert_eq!(classify(&err, &["InvalidGroup.NotFound"]), FailureClass::NotFound);
        assert_eq!(classify(&err, &[]), FailureClass::Other);
    }

    #[test]
    fn access_denied_is_neither() {
        assert_eq!(classify(&service_error("UnauthorizedOperation"), &[]), FailureClass::Other);
    }
}
