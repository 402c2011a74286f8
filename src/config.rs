// ABOUTME: Settings for sessions and invokers - service endpoint,
// ABOUTME: credential, and default timings, loadable from the environment.

use std::time::Duration;

use crate::error::ConfigError;

const ENV_SERVICE_ENDPOINT: &str = "COURIER_SERVICE_ENDPOINT";
const ENV_API_KEY: &str = "COURIER_API_KEY";
const ENV_HTTP_TIMEOUT_SECS: &str = "COURIER_HTTP_TIMEOUT_SECS";
const ENV_POLL_INTERVAL_MS: &str = "COURIER_POLL_INTERVAL_MS";

/// Runtime settings consumed by sessions and invokers.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote agent service.
    pub service_endpoint: String,
    /// Static bearer credential attached to outgoing requests.
    pub api_key: Option<String>,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
    /// Delay between run-status polls.
    pub poll_interval: Duration,
}

impl Config {
    /// Create a config with defaults: 30s HTTP timeout, 1s poll interval,
    /// no credential. Endpoints without a scheme are normalized to https.
    pub fn new(service_endpoint: impl Into<String>) -> Self {
        Self {
            service_endpoint: normalize_url(service_endpoint.into()),
            api_key: None,
            http_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
        }
    }

    /// Set the bearer credential.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Set the run-status poll interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Load settings from the environment, honoring a `.env` file when
    /// present. The service endpoint is required; everything else falls
    /// back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let endpoint = std::env::var(ENV_SERVICE_ENDPOINT)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_SERVICE_ENDPOINT))?;

        let mut config = Config::new(endpoint);

        if let Ok(key) = std::env::var(ENV_API_KEY) {
            if !key.trim().is_empty() {
                config.api_key = Some(key);
            }
        }

        if let Ok(raw) = std::env::var(ENV_HTTP_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                name: ENV_HTTP_TIMEOUT_SECS,
                reason: format!("expected whole seconds, got {raw:?}"),
            })?;
            config.http_timeout = Duration::from_secs(secs);
        }

        if let Ok(raw) = std::env::var(ENV_POLL_INTERVAL_MS) {
            let millis: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                name: ENV_POLL_INTERVAL_MS,
                reason: format!("expected milliseconds, got {raw:?}"),
            })?;
            config.poll_interval = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

fn normalize_url(url: String) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url
    } else {
        format!("https://{url}")
    }
}
