use std::time::Duration;

pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Run configuration, built once by the command line and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Region to audit.
    ///
    /// `None` defers to the provider's default resolution chain (environment, profile).
    pub region: Option<String>,
    /// Maximum number of rule-set fetches in flight, and of resources correlated at once.
    pub concurrency: usize,
    /// Upper bound for a single rule-set fetch.
    pub fetch_timeout: Duration,
    /// Upper bound for the whole run. Work still pending when it expires is abandoned
    /// and reported as incomplete.
    pub deadline: Option<Duration>,
    pub no_banner: bool,
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: None,
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            deadline: None,
            no_banner: false,
            quiet: 0,
        }
    }
}
