// ABOUTME: Defines all error types for the courier library using thiserror.
// ABOUTME: Each submodule has its own error enum, unified under CourierError.

use std::time::Duration;

/// Top-level error type for the courier library.
#[derive(Debug, thiserror::Error)]
pub enum CourierError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("invocation error: {0}")]
    Invocation(#[from] InvocationError),

    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    #[error("run error: {0}")]
    Run(#[from] RunError),
}

/// Errors from loading or validating configuration. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Errors from tool resolution and local handler execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("no handler for tool {0}")]
    Unknown(String),

    #[error("handler failed: {0}")]
    Handler(#[source] anyhow::Error),
}

/// Errors from invoking a remote tool endpoint.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("endpoint {endpoint} returned {status}: {body}")]
    Status {
        status: u16,
        endpoint: String,
        /// Response body, truncated to 500 characters.
        body: String,
    },

    #[error("invalid JSON from {endpoint}: {source}")]
    Deserialize {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("workflow {correlation_id} did not complete within {waited:?}")]
    Timeout {
        correlation_id: String,
        waited: Duration,
    },
}

impl InvocationError {
    /// True for network-level failures, the only kind retried by default.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Errors from conversation service calls.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl ServiceError {
    /// True for network-level failures, the only kind retried by default.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// Terminal failure of a conversation run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The run ended in a failed state; carries the service-reported message.
    #[error("run failed: {0}")]
    Failed(String),

    #[error("run cancelled")]
    Cancelled,

    #[error("run timed out after {0:?}")]
    TimedOut(Duration),

    #[error("service error: {0}")]
    Service(#[from] ServiceError),
}
