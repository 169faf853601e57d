//! Harness configuration
//!
//! Read from the environment with defaults; the binary may override any
//! value from the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use divcheck_domain::divide_endpoint;
use thiserror::Error;
use url::Url;

/// Environment variable holding the service base URL.
pub const API_URL_VAR: &str = "API_URL";
/// Environment variable holding the log directory.
pub const LOG_DIR_VAR: &str = "DIVCHECK_LOG_DIR";
/// Environment variable holding an optional request timeout in milliseconds.
pub const TIMEOUT_VAR: &str = "DIVCHECK_TIMEOUT_MS";

/// Base URL used when `API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
/// Log directory used when `DIVCHECK_LOG_DIR` is unset.
pub const DEFAULT_LOG_DIR: &str = "/app/logs";
/// Name of the log file inside the log directory.
pub const LOG_FILE_NAME: &str = "test_results.log";

/// What the harness does when a case fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure and report `false`; the batch keeps going.
    #[default]
    ReportAndContinue,
    /// Return the failure as an error; the batch stops.
    Raise,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL '{value}': {reason}")]
    InvalidBaseUrl {
        /// Rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The timeout is not a positive number of milliseconds.
    #[error("invalid timeout '{0}': expected a positive number of milliseconds")]
    InvalidTimeout(String),
}

/// Settings for one harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Base URL of the target service.
    pub base_url: Url,
    /// Directory receiving the log file.
    pub log_dir: PathBuf,
    /// Per-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Failure handling.
    pub policy: FailurePolicy,
}

impl HarnessConfig {
    /// Creates a configuration pointing at `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the URL is not http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            timeout: None,
            policy: FailurePolicy::default(),
        })
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get(API_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Some(dir) = get(LOG_DIR_VAR) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get(TIMEOUT_VAR) {
            config.timeout = Some(parse_timeout_ms(&raw)?);
        }

        Ok(config)
    }

    /// Sets the log directory.
    #[must_use]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Full URL of the divide endpoint.
    #[must_use]
    pub fn divide_endpoint(&self) -> String {
        divide_endpoint(self.base_url.as_str())
    }

    /// Path of the log file.
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }

    /// Directory receiving the log file.
    #[must_use]
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Parses and checks a service base URL.
///
/// # Errors
///
/// Returns `ConfigError::InvalidBaseUrl` if the URL does not parse or is not http(s).
pub fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidBaseUrl {
            value: value.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Parses a timeout given in milliseconds.
///
/// # Errors
///
/// Returns `ConfigError::InvalidTimeout` for zero or non-numeric input.
pub fn parse_timeout_ms(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout(value.to_string())),
    }
}
