//! Configuration for the indexing engine.

use crate::error::ConfigError;
use std::env;
use std::time::Duration;

pub const DEFAULT_USERS_URL: &str = "http://localhost:8000/users";
pub const DEFAULT_VIDEOS_URL: &str = "http://localhost:8001/videos";
pub const DEFAULT_INDEX_URL: &str = "http://localhost:8002/index";

/// Per-call timeout applied by the shared HTTP client.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// How failed items are put back on the queue.
///
/// The default matches the historical behavior: one detached task per
/// failure, no cap and no delay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry tasks allowed to re-enqueue at the same time.
    /// Must be at least 1 when set.
    pub max_in_flight: Option<usize>,
    /// Pause before a retry task re-enqueues its item
    pub delay: Duration,
}

/// Immutable engine configuration, captured once at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Base URL of the users service
    pub users_url: String,
    /// Base URL of the videos service
    pub videos_url: String,
    /// Endpoint of the index service
    pub index_url: String,
    /// Window without a successful submission after which the run finishes
    pub idle_timeout: Duration,
    /// Number of concurrent workers
    pub threads: usize,
    /// Per-HTTP-call timeout
    pub http_timeout: Duration,
    pub retry: RetryPolicy,
}

impl EngineConfig {
    pub fn new(
        users_url: impl Into<String>,
        videos_url: impl Into<String>,
        index_url: impl Into<String>,
        idle_timeout: Duration,
        threads: usize,
    ) -> Self {
        Self {
            users_url: users_url.into(),
            videos_url: videos_url.into(),
            index_url: index_url.into(),
            idle_timeout,
            threads,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_http_timeout(mut self, http_timeout: Duration) -> Self {
        self.http_timeout = http_timeout;
        self
    }

    /// Load configuration from environment variables (and a `.env` file if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let timeout: u64 = required(&lookup, "TIMEOUT")?;
        let threads: usize = required(&lookup, "NUM_THREADS")?;
        if threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }

        let http_timeout = optional::<u64, _>(&lookup, "HTTP_TIMEOUT")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT);

        let max_in_flight: Option<usize> = optional(&lookup, "RETRY_MAX_IN_FLIGHT")?;
        if max_in_flight == Some(0) {
            return Err(ConfigError::ZeroRetryLimit);
        }

        let retry = RetryPolicy {
            max_in_flight,
            delay: optional::<u64, _>(&lookup, "RETRY_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or_default(),
        };

        Ok(Self {
            users_url: url("USERS_URL", DEFAULT_USERS_URL),
            videos_url: url("VIDEOS_URL", DEFAULT_VIDEOS_URL),
            index_url: url("INDEX_URL", DEFAULT_INDEX_URL),
            idle_timeout: Duration::from_secs(timeout),
            threads,
            http_timeout,
            retry,
        })
    }
}

fn required<T, F>(lookup: &F, key: &'static str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key)?.ok_or(ConfigError::Missing(key))
}

fn optional<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
