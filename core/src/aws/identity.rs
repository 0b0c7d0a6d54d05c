use aws_sdk_sts::operation::get_caller_identity::GetCallerIdentityOutput;
use tracing::warn;

use super::{AwsClients, describe};

const UNKNOWN: &str = "unknown";

/// Account and principal the credentials resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
}

impl CallerIdentity {
    fn from_output(output: &GetCallerIdentityOutput) -> Self {
        Self {
            account: output.account().unwrap_or(UNKNOWN).to_string(),
            arn: output.arn().unwrap_or(UNKNOWN).to_string(),
        }
    }
}

/// `None` when STS cannot be reached; the audit itself does not depend on it.
pub async fn caller_identity(clients: &AwsClients) -> Option<CallerIdentity> {
    match clients.sts.get_caller_identity().send().await {
        Ok(output) => Some(CallerIdentity::from_output(&output)),
        Err(err) => {
            warn!(error = %describe(&err), "Could not resolve caller identity");
            None
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
