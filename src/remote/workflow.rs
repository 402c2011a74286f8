// ABOUTME: Remote-call descriptors and workflow wire models - how a tool
// ABOUTME: call is shaped into an HTTP request and how results come back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// HTTP method of a remote-call descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// Where tool-call arguments are placed in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamPlacement {
    Query,
    Body,
}

/// Declarative description of a remote tool endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub placement: ParamPlacement,
    /// Endpoint polled for long-running workflow status. Falls back to
    /// `url` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_url: Option<String>,
}

impl RemoteDescriptor {
    /// A GET endpoint taking its arguments as query parameters.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            placement: ParamPlacement::Query,
            status_url: None,
        }
    }

    /// A POST endpoint taking its arguments as the JSON body.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            placement: ParamPlacement::Body,
            status_url: None,
        }
    }

    /// Override the argument placement.
    pub fn placement(mut self, placement: ParamPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Set a dedicated status-check endpoint for workflow polling.
    pub fn status_url(mut self, url: impl Into<String>) -> Self {
        self.status_url = Some(url.into());
        self
    }

    /// The descriptor used to poll workflow status: GET with query
    /// placement against the status endpoint.
    pub(crate) fn status_check(&self) -> RemoteDescriptor {
        RemoteDescriptor {
            method: HttpMethod::Get,
            url: self.status_url.clone().unwrap_or_else(|| self.url.clone()),
            placement: ParamPlacement::Query,
            status_url: None,
        }
    }
}

/// Execution status reported by a workflow endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl WorkflowStatus {
    /// True while the workflow has not reached a terminal status.
    pub fn is_running(self) -> bool {
        matches!(self, WorkflowStatus::Pending | WorkflowStatus::Running)
    }

    /// True once the workflow can no longer change status.
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }
}

/// Request payload for triggering a workflow endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowRequest {
    pub action: String,
    pub input: serde_json::Value,
    pub correlation_id: String,
    pub metadata: serde_json::Value,
}

impl WorkflowRequest {
    /// Create a request with a fresh correlation id.
    pub fn new(action: impl Into<String>, input: serde_json::Value) -> Self {
        Self {
            action: action.into(),
            input,
            correlation_id: Uuid::new_v4().to_string(),
            metadata: serde_json::Value::Null,
        }
    }

    /// Override the correlation id.
    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }

    /// Attach metadata passed through to the workflow.
    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Render the payload in the camelCase shape workflow triggers expect.
    pub fn to_trigger_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "action": self.action,
            "inputData": self.input,
            "correlationId": self.correlation_id,
            "metadata": self.metadata,
        })
    }
}

/// Response envelope from a workflow endpoint, parsed leniently: every
/// field is optional on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowResponse {
    #[serde(default)]
    pub workflow_run_id: Option<String>,
    #[serde(default = "default_status")]
    pub status: WorkflowStatus,
    #[serde(default)]
    pub output: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_status() -> WorkflowStatus {
    WorkflowStatus::Succeeded
}

impl WorkflowResponse {
    /// True if the workflow completed successfully.
    pub fn is_successful(&self) -> bool {
        self.status == WorkflowStatus::Succeeded
    }

    /// True while the workflow is still pending or running.
    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }
}
