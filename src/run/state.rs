// ABOUTME: Core types for conversation runs - run states, tool call
// ABOUTME: requests and outputs, and thread messages.

use serde::{Deserialize, Serialize};

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A message within a conversation thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub role: Role,
    pub content: String,
}

impl ThreadMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an agent message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A pending tool call the remote service is waiting on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Opaque call identifier outputs must be keyed by.
    pub id: String,
    pub name: String,
    /// Untyped argument payload; validated only by the handler it reaches.
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// Result of one tool call, keyed by its call identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub call_id: String,
    pub output: serde_json::Value,
}

impl ToolOutput {
    /// A successful output.
    pub fn new(call_id: impl Into<String>, output: serde_json::Value) -> Self {
        Self {
            call_id: call_id.into(),
            output,
        }
    }

    /// An error output in the `{"error": ...}` shape the service expects.
    pub fn error(call_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            output: serde_json::json!({ "error": message.into() }),
        }
    }
}

/// State of a conversation run.
///
/// `Completed`, `Failed`, `Cancelled`, and `TimedOut` are terminal; no
/// transitions leave them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunState {
    Created,
    Queued,
    InProgress,
    RequiresAction { calls: Vec<ToolCallRequest> },
    Completed,
    Failed { message: String },
    Cancelled,
    TimedOut,
}

impl RunState {
    /// True once the run can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Completed
                | RunState::Failed { .. }
                | RunState::Cancelled
                | RunState::TimedOut
        )
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Created => write!(f, "created"),
            RunState::Queued => write!(f, "queued"),
            RunState::InProgress => write!(f, "in_progress"),
            RunState::RequiresAction { calls } => {
                write!(f, "requires_action ({} calls)", calls.len())
            }
            RunState::Completed => write!(f, "completed"),
            RunState::Failed { message } => write!(f, "failed: {message}"),
            RunState::Cancelled => write!(f, "cancelled"),
            RunState::TimedOut => write!(f, "timed_out"),
        }
    }
}
