use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Base URL used when `ORBIT_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// How result fetches are retried after the server reports completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRetryPolicy {
    /// Total automatic fetch attempts per round, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each one after.
    pub initial_backoff: Duration,
}

impl ResultRetryPolicy {
    /// Upper bound on any single backoff delay.
    pub const MAX_BACKOFF: Duration = Duration::from_secs(8);

    /// Delay before fetch attempt `attempt` (1-based), or `None` if the round
    /// has no such attempt. The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_attempts {
            return None;
        }
        if attempt == 1 {
            return Some(Duration::ZERO);
        }
        let factor = 2u32.saturating_pow(attempt - 2);
        Some(
            self.initial_backoff
                .saturating_mul(factor)
                .min(Self::MAX_BACKOFF),
        )
    }
}

impl Default for ResultRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// API host. Not validated here: a malformed URL fails at call time.
    pub api_url: String,
    pub request_timeout: Duration,
    pub result_retry: ResultRetryPolicy,
    pub recording_enabled: bool,
    pub recording_log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            result_retry: ResultRetryPolicy::default(),
            recording_enabled: false,
            recording_log_path: PathBuf::from("orbit-recordings.jsonl"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = parse_api_url(lookup("ORBIT_API_URL"));

        let request_timeout_secs = lookup("ORBIT_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("ORBIT_REQUEST_TIMEOUT_SECS must be a valid number")?;

        let max_attempts = lookup("ORBIT_RESULT_FETCH_ATTEMPTS")
            .unwrap_or_else(|| "3".to_string())
            .parse::<u32>()
            .context("ORBIT_RESULT_FETCH_ATTEMPTS must be a valid number")?;
        if max_attempts == 0 {
            bail!("ORBIT_RESULT_FETCH_ATTEMPTS must be at least 1");
        }

        let backoff_ms = lookup("ORBIT_RESULT_RETRY_BACKOFF_MS")
            .unwrap_or_else(|| "500".to_string())
            .parse::<u64>()
            .context("ORBIT_RESULT_RETRY_BACKOFF_MS must be a valid number")?;

        let recording_enabled = lookup("ORBIT_RECORDING_ENABLED")
            .unwrap_or_else(|| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let recording_log_path = lookup("ORBIT_RECORDING_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("orbit-recordings.jsonl"));

        Ok(Config {
            api_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            result_retry: ResultRetryPolicy {
                max_attempts,
                initial_backoff: Duration::from_millis(backoff_ms),
            },
            recording_enabled,
            recording_log_path,
        })
    }

    /// Replace the API base URL (e.g. from a command-line override).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = parse_api_url(Some(url.into()));
        self
    }
}

/// Resolve the API base URL from an optional raw value.
///
/// Missing, empty and whitespace-only values fall back to the local
/// development endpoint. Trailing slashes are dropped.
pub fn parse_api_url(value: Option<String>) -> String {
    match value {
        Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        _ => DEFAULT_API_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_api_url_none() {
        assert_eq!(parse_api_url(None), DEFAULT_API_URL);
    }

    #[test]
    fn test_parse_api_url_whitespace_only() {
        assert_eq!(parse_api_url(Some("   ".to_string())), DEFAULT_API_URL);
    }

    #[test]
    fn test_parse_api_url_strips_trailing_slash() {
        assert_eq!(
            parse_api_url(Some("https://orbit.example.com/api/".to_string())),
            "https://orbit.example.com/api"
        );
    }

    #[test]
    fn test_parse_api_url_keeps_malformed_value() {
        // Validation happens when a request is made.
        assert_eq!(parse_api_url(Some("not a url".to_string())), "not a url");
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.result_retry, ResultRetryPolicy::default());
        assert!(!config.recording_enabled);
        assert_eq!(
            config.recording_log_path,
            PathBuf::from("orbit-recordings.jsonl")
        );
    }

    #[test]
    fn test_values_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("ORBIT_API_URL", "http://10.0.0.5:9000"),
            ("ORBIT_REQUEST_TIMEOUT_SECS", "5"),
            ("ORBIT_RESULT_FETCH_ATTEMPTS", "5"),
            ("ORBIT_RESULT_RETRY_BACKOFF_MS", "100"),
            ("ORBIT_RECORDING_ENABLED", "true"),
            ("ORBIT_RECORDING_LOG_PATH", "/tmp/rec.jsonl"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://10.0.0.5:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.result_retry.max_attempts, 5);
        assert_eq!(
            config.result_retry.initial_backoff,
            Duration::from_millis(100)
        );
        assert!(config.recording_enabled);
        assert_eq!(config.recording_log_path, PathBuf::from("/tmp/rec.jsonl"));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("ORBIT_REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("ORBIT_REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn test_zero_fetch_attempts_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("ORBIT_RESULT_FETCH_ATTEMPTS", "0")])).is_err());
    }

    #[test]
    fn test_with_api_url_override() {
        let config = Config::default().with_api_url("http://override:1234/");
        assert_eq!(config.api_url, "http://override:1234");
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = ResultRetryPolicy {
            max_attempts: 8,
            initial_backoff: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_before(1), Some(Duration::ZERO));
        assert_eq!(policy.delay_before(2), Some(Duration::from_millis(500)));
        assert_eq!(policy.delay_before(3), Some(Duration::from_millis(1000)));
        assert_eq!(policy.delay_before(4), Some(Duration::from_millis(2000)));
        assert_eq!(policy.delay_before(6), Some(Duration::from_secs(8)));
        assert_eq!(policy.delay_before(8), Some(ResultRetryPolicy::MAX_BACKOFF));
        assert_eq!(policy.delay_before(9), None);
    }

    #[test]
    fn test_single_attempt_policy_never_retries() {
        let policy = ResultRetryPolicy {
            max_attempts: 1,
            initial_backoff: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_before(2), None);
    }
}
