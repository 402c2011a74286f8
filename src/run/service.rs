// ABOUTME: Defines the ConversationService trait - the narrow contract the
// ABOUTME: run engine needs from a remote agent service client.

use async_trait::async_trait;

use super::{RunState, ThreadMessage, ToolOutput};
use crate::error::ServiceError;

/// Client contract for the remote conversation service.
///
/// Every method is a network call the engine may retry on transport
/// failures; implementations must be idempotent under retry.
#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Create a new conversation thread and return its identifier.
    async fn create_thread(&self) -> Result<String, ServiceError>;

    /// Load an existing thread, returning its identifier.
    async fn get_thread(&self, thread_id: &str) -> Result<String, ServiceError>;

    /// Append a user message to the thread.
    async fn post_message(&self, thread_id: &str, content: &str) -> Result<(), ServiceError>;

    /// Start (or advance) a run on the thread, returning the run identifier.
    async fn start_run(&self, thread_id: &str) -> Result<String, ServiceError>;

    /// Fetch the current state of a run.
    async fn run_state(&self, thread_id: &str, run_id: &str) -> Result<RunState, ServiceError>;

    /// Submit the outputs for one requires-action batch and return the
    /// resulting run state. One submission covers the whole batch.
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<RunState, ServiceError>;

    /// List the thread's messages, most recent first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, ServiceError>;
}
