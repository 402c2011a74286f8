// ABOUTME: Blocking adapters - thin wrappers that run the async session and
// ABOUTME: invoker on an owned current-thread runtime.

use std::time::Duration;

use crate::error::{InvocationError, RunError};
use crate::remote::{RemoteDescriptor, RemoteInvoker, WorkflowResponse};
use crate::run::{CancelHandle, Session};

/// Blocking wrapper around [`Session`].
///
/// Every suspension point (retry backoff, run-status poll) blocks the
/// calling thread instead of yielding. Must not be used from within an
/// async context; tokio will panic rather than block a runtime thread.
pub struct BlockingSession {
    inner: Session,
    runtime: tokio::runtime::Runtime,
}

impl BlockingSession {
    /// Wrap a session for blocking use.
    ///
    /// # Panics
    ///
    /// Panics if the backing runtime cannot be created.
    pub fn new(session: Session) -> Self {
        Self {
            inner: session,
            runtime: blocking_runtime(),
        }
    }

    /// Blocking equivalent of [`Session::run`].
    pub fn run(&mut self, message: &str, thread_id: Option<&str>) -> Result<String, RunError> {
        self.runtime.block_on(self.inner.run(message, thread_id))
    }

    /// Thread identifier of the most recent run.
    pub fn thread_id(&self) -> Option<&str> {
        self.inner.thread_id()
    }

    /// Handle for cancelling the in-flight run from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.inner.cancel_handle()
    }
}

/// Blocking wrapper around [`RemoteInvoker`].
pub struct BlockingInvoker {
    inner: RemoteInvoker,
    runtime: tokio::runtime::Runtime,
}

impl BlockingInvoker {
    /// Wrap an invoker for blocking use.
    ///
    /// # Panics
    ///
    /// Panics if the backing runtime cannot be created.
    pub fn new(invoker: RemoteInvoker) -> Self {
        Self {
            inner: invoker,
            runtime: blocking_runtime(),
        }
    }

    /// Blocking equivalent of [`RemoteInvoker::invoke`].
    pub fn invoke(
        &self,
        descriptor: &RemoteDescriptor,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value, InvocationError> {
        self.runtime.block_on(self.inner.invoke(descriptor, args))
    }

    /// Blocking equivalent of [`RemoteInvoker::invoke_and_await`].
    pub fn invoke_and_await(
        &self,
        descriptor: &RemoteDescriptor,
        args: &serde_json::Value,
        poll_interval: Duration,
        max_wait: Duration,
    ) -> Result<WorkflowResponse, InvocationError> {
        self.runtime
            .block_on(
                self.inner
                    .invoke_and_await(descriptor, args, poll_interval, max_wait),
            )
    }
}

fn blocking_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create blocking runtime")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ServiceError;
    use crate::retry::RetryPolicy;
    use crate::run::{ConversationService, RunState, ThreadMessage, ToolOutput};
    use crate::tool::Registry;

    struct OneShotService;

    #[async_trait]
    impl ConversationService for OneShotService {
        async fn create_thread(&self) -> Result<String, ServiceError> {
            Ok("t-1".into())
        }

        async fn get_thread(&self, thread_id: &str) -> Result<String, ServiceError> {
            Ok(thread_id.to_string())
        }

        async fn post_message(&self, _: &str, _: &str) -> Result<(), ServiceError> {
            Ok(())
        }

        async fn start_run(&self, _: &str) -> Result<String, ServiceError> {
            Ok("r-1".into())
        }

        async fn run_state(&self, _: &str, _: &str) -> Result<RunState, ServiceError> {
            Ok(RunState::Completed)
        }

        async fn submit_tool_outputs(
            &self,
            _: &str,
            _: &str,
            _: &[ToolOutput],
        ) -> Result<RunState, ServiceError> {
            Ok(RunState::Completed)
        }

        async fn list_messages(&self, _: &str) -> Result<Vec<ThreadMessage>, ServiceError> {
            Ok(vec![ThreadMessage::assistant("from the blocking side")])
        }
    }

    #[test]
    fn test_blocking_session_runs_to_completion() {
        let session = Session::new(Arc::new(OneShotService), Registry::new())
            .poll_interval(Duration::from_millis(10))
            .retry_policy(RetryPolicy::no_retry());
        let mut blocking = BlockingSession::new(session);

        let reply = blocking.run("hello", None).unwrap();
        assert_eq!(reply, "from the blocking side");
        assert_eq!(blocking.thread_id(), Some("t-1"));
    }

    #[test]
    fn test_blocking_invoker_transport_error() {
        let invoker = BlockingInvoker::new(RemoteInvoker::with_timeout(Duration::from_millis(
            500,
        )));
        let descriptor = RemoteDescriptor::get("http://127.0.0.1:1/unreachable");
        let err = invoker.invoke(&descriptor, &serde_json::json!({})).unwrap_err();
        assert!(err.is_transport());
    }
}
