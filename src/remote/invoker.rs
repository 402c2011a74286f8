// ABOUTME: RemoteInvoker - executes remote-call descriptors over HTTP and
// ABOUTME: polls long-running workflows to a terminal status.

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::{HttpMethod, ParamPlacement, RemoteDescriptor, WorkflowResponse};
use crate::config::Config;
use crate::error::InvocationError;

const BODY_EXCERPT_LEN: usize = 500;

/// Executes remote-call descriptors against their HTTP endpoints.
pub struct RemoteInvoker {
    client: reqwest::Client,
    bearer: Option<String>,
}

impl Default for RemoteInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteInvoker {
    /// Create an invoker with a 30 second request timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create an invoker with the given request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            bearer: None,
        }
    }

    /// Create an invoker from settings: timeout and credential.
    pub fn from_config(config: &Config) -> Self {
        let mut invoker = Self::with_timeout(config.http_timeout);
        invoker.bearer = config.api_key.clone();
        invoker
    }

    /// Create with a custom reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            bearer: None,
        }
    }

    /// Attach a bearer credential sent with every request.
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Invoke the endpoint once and return its JSON response verbatim.
    ///
    /// Arguments are substituted into the query string or the JSON body per
    /// the descriptor's placement. A non-2xx response yields a status-kind
    /// error carrying up to 500 characters of the body; network failures
    /// yield a transport-kind error, the only kind retried by default.
    pub async fn invoke(
        &self,
        descriptor: &RemoteDescriptor,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value, InvocationError> {
        tracing::debug!(
            method = %descriptor.method,
            endpoint = %descriptor.url,
            "invoking remote tool"
        );

        let mut request = match descriptor.method {
            HttpMethod::Get => self.client.get(&descriptor.url),
            HttpMethod::Post => self.client.post(&descriptor.url),
        };

        request = request
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        request = match descriptor.placement {
            ParamPlacement::Query => request.query(&query_pairs(args)),
            ParamPlacement::Body => request.json(args),
        };

        let response = request
            .send()
            .await
            .map_err(|source| InvocationError::Transport {
                endpoint: descriptor.url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| InvocationError::Transport {
                endpoint: descriptor.url.clone(),
                source,
            })?;

        if !status.is_success() {
            tracing::error!(
                endpoint = %descriptor.url,
                status = status.as_u16(),
                "remote tool returned error status"
            );
            return Err(InvocationError::Status {
                status: status.as_u16(),
                endpoint: descriptor.url.clone(),
                body: excerpt(&body),
            });
        }

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&body).map_err(|source| InvocationError::Deserialize {
            endpoint: descriptor.url.clone(),
            source,
        })
    }

    /// Invoke the endpoint and poll until the workflow reaches a terminal
    /// status.
    ///
    /// While the reported status is pending or running, sleeps
    /// `poll_interval` and re-invokes the descriptor's status-check variant
    /// with the correlation id as a query argument. Fails with a timeout
    /// carrying the correlation id once `max_wait` has elapsed.
    pub async fn invoke_and_await(
        &self,
        descriptor: &RemoteDescriptor,
        args: &serde_json::Value,
        poll_interval: Duration,
        max_wait: Duration,
    ) -> Result<WorkflowResponse, InvocationError> {
        let initial = self.invoke(descriptor, args).await?;
        let mut response = parse_workflow(&descriptor.url, initial)?;

        let status_check = descriptor.status_check();
        let started = Instant::now();

        while response.is_running() {
            if started.elapsed() >= max_wait {
                return Err(InvocationError::Timeout {
                    correlation_id: response.workflow_run_id.unwrap_or_default(),
                    waited: started.elapsed(),
                });
            }

            tokio::time::sleep(poll_interval).await;
            tracing::debug!(
                elapsed = ?started.elapsed(),
                run_id = response.workflow_run_id.as_deref().unwrap_or(""),
                "polling workflow status"
            );

            let status_args = match &response.workflow_run_id {
                Some(id) => serde_json::json!({ "correlation_id": id }),
                None => serde_json::json!({}),
            };
            let polled = self.invoke(&status_check, &status_args).await?;
            response = parse_workflow(&status_check.url, polled)?;
        }

        Ok(response)
    }
}

fn parse_workflow(
    endpoint: &str,
    value: serde_json::Value,
) -> Result<WorkflowResponse, InvocationError> {
    serde_json::from_value(value).map_err(|source| InvocationError::Deserialize {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Flatten a JSON object into query pairs; non-string scalars and nested
/// values are rendered as their JSON text.
fn query_pairs(args: &serde_json::Value) -> Vec<(String, String)> {
    match args {
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(k, v)| {
                let rendered = match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn excerpt(body: &str) -> String {
    if body.len() <= BODY_EXCERPT_LEN {
        body.to_string()
    } else {
        let mut end = BODY_EXCERPT_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body[..end].to_string()
    }
}
