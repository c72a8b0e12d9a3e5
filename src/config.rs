// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Client configuration.

use std::time::Duration;

use crate::error::{LcrError, Result};

/// Query endpoint of the Fermi-LAT Light Curve Repository.
pub const DEFAULT_BASE_URL: &str =
    "https://fermi.gsfc.nasa.gov/ssc/data/access/lat/LightCurveRepository/queryDB.php";

/// Overrides [`ClientConfig::base_url`] in [`ClientConfig::from_env`].
pub const ENV_BASE_URL: &str = "LCR_BASE_URL";

/// Overrides [`ClientConfig::timeout`] (whole seconds) in [`ClientConfig::from_env`].
pub const ENV_TIMEOUT_SECS: &str = "LCR_TIMEOUT_SECS";

/// Retry behaviour of [`RetryingFetcher`](crate::fetch::RetryingFetcher).
///
/// Only transport failures are retried; an HTTP status is an answer from
/// the service and is returned as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. `0` is treated as `1`.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt, no retry.
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    pub const fn attempts(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Settings for [`HttpFetcher`](crate::fetch::HttpFetcher).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Whole-request deadline; `None` leaves the transport default.
    pub timeout: Option<Duration>,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            retry: RetryPolicy::none(),
        }
    }
}

impl ClientConfig {
    /// Defaults, overridden by `LCR_BASE_URL` and `LCR_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| LcrError::InvalidConfig {
                reason: format!("{ENV_TIMEOUT_SECS}='{raw}' is not a whole number of seconds"),
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Check that the base URL parses as an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| LcrError::InvalidConfig {
            reason: format!("base URL '{}': {e}", self.base_url),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(LcrError::InvalidConfig {
                reason: format!("unsupported URL scheme '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, None);
        assert_eq!(config.retry, RetryPolicy::none());
        assert!(config.user_agent.starts_with("fermi-lcr/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "http://127.0.0.1:8080/queryDB.php"),
            (ENV_TIMEOUT_SECS, " 30 "),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080/queryDB.php");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn bad_env_values_are_config_errors() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, LcrError::InvalidConfig { .. }));

        let err = ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "ftp://example.org/")]))
            .unwrap_err();
        assert!(matches!(err, LcrError::InvalidConfig { .. }));

        let err = ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "not a url")])).unwrap_err();
        assert!(matches!(err, LcrError::InvalidConfig { .. }));
    }

    #[test]
    fn builder_setters() {
        let config = ClientConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent")
            .with_retry(RetryPolicy::attempts(3, Duration::from_millis(10)));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.retry.max_attempts, 3);
    }
}
