// ABOUTME: Session engine - drives a conversation run through its state
// ABOUTME: machine, servicing tool-call pauses until a terminal state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Notify;

use super::{ConversationService, Role, RunState, ThreadMessage, ToolCallRequest, ToolOutput};
use crate::error::{RunError, ServiceError};
use crate::remote::RemoteInvoker;
use crate::retry::RetryPolicy;
use crate::tool::{Registry, ToolBinding};

/// Sentinel returned when a completed run produced no agent message.
pub const NO_RESPONSE: &str = "No response from agent";

/// Handle for cancelling an in-flight run from another task.
#[derive(Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelHandle {
    /// Request cancellation. Polling and tool invocation stop at the next
    /// suspension point; already-submitted tool outputs stay submitted.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    async fn notified(&self) {
        self.notify.notified().await;
    }

    fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// A conversation session against a remote agent service.
///
/// The session owns its tool registry reference and thread identifier;
/// separate sessions share nothing. A session drives one run at a time:
/// running two `run()` calls concurrently against the same thread
/// identifier is undefined and must be prevented by the caller.
pub struct Session {
    service: Arc<dyn ConversationService>,
    tools: Registry,
    invoker: RemoteInvoker,
    retry: RetryPolicy,
    poll_interval: Duration,
    timeout: Option<Duration>,
    max_action_cycles: Option<u32>,
    thread_id: Option<String>,
    cancel: CancelHandle,
}

impl Session {
    /// Create a session over a conversation service and a tool registry.
    pub fn new(service: Arc<dyn ConversationService>, tools: Registry) -> Self {
        Self {
            service,
            tools,
            invoker: RemoteInvoker::new(),
            retry: RetryPolicy::default(),
            poll_interval: Duration::from_secs(1),
            timeout: None,
            max_action_cycles: None,
            thread_id: None,
            cancel: CancelHandle::default(),
        }
    }

    /// Use a custom invoker for remote tool bindings.
    pub fn invoker(mut self, invoker: RemoteInvoker) -> Self {
        self.invoker = invoker;
        self
    }

    /// Set the retry policy for orchestration calls.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Set the delay between run-status polls.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Impose an overall wall-clock limit on each run.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Bound the number of tool-action cycles per run. Unbounded by
    /// default: a service that keeps requesting actions keeps being
    /// serviced unless the caller supplies a budget.
    pub fn max_action_cycles(mut self, cycles: u32) -> Self {
        self.max_action_cycles = Some(cycles);
        self
    }

    /// Handle for cancelling the in-flight run.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Thread identifier of the most recent run, for continuing the
    /// conversation in a later call.
    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    /// Run the conversation one message forward and return the agent's
    /// reply text.
    ///
    /// With `thread_id` the existing thread is continued; without it a
    /// fresh thread is created and recorded on the session. Tool-call
    /// pauses are serviced from the registry; a failure inside a single
    /// tool call becomes that call's `{"error": ...}` output and never
    /// aborts the run. Only orchestration failures surface, after the
    /// retry policy is exhausted.
    pub async fn run(
        &mut self,
        message: &str,
        thread_id: Option<&str>,
    ) -> Result<String, RunError> {
        let started = Instant::now();
        self.cancel.reset();

        let thread = match thread_id {
            Some(id) => self.load_thread(id).await?,
            None => self.create_thread().await?,
        };
        self.thread_id = Some(thread.clone());

        tracing::info!(thread = %thread, "posting user message");
        self.post_message(&thread, message).await?;

        let run_id = self.start_run(&thread).await?;
        let mut state = self.poll_state(&thread, &run_id).await?;
        let mut cycles: u32 = 0;

        loop {
            self.check_cancelled()?;
            self.check_deadline(started)?;

            match state {
                RunState::RequiresAction { calls } => {
                    cycles += 1;
                    if self.max_action_cycles.is_some_and(|max| cycles > max) {
                        tracing::error!(thread = %thread, cycles = cycles - 1, "tool action budget exhausted");
                        return Err(RunError::Failed(format!(
                            "tool action budget exhausted after {} cycles",
                            cycles - 1
                        )));
                    }

                    tracing::info!(thread = %thread, pending = calls.len(), "run requires tool action");
                    let mut outputs = Vec::with_capacity(calls.len());
                    for call in &calls {
                        self.check_cancelled()?;
                        outputs.push(self.execute_call(call).await);
                    }

                    state = self.submit_outputs(&thread, &run_id, &outputs).await?;
                }
                RunState::Completed => {
                    let messages = self.list_messages(&thread).await?;
                    return Ok(extract_response(&messages));
                }
                RunState::Failed { message } => {
                    tracing::error!(thread = %thread, error = %message, "run failed");
                    return Err(RunError::Failed(message));
                }
                RunState::Cancelled => return Err(RunError::Cancelled),
                RunState::TimedOut => return Err(RunError::TimedOut(started.elapsed())),
                RunState::Created | RunState::Queued | RunState::InProgress => {
                    self.wait_poll(started).await?;
                    state = self.poll_state(&thread, &run_id).await?;
                }
            }
        }
    }

    /// Execute one pending call, converting every failure into an error
    /// output rather than letting it abort the run.
    async fn execute_call(&self, call: &ToolCallRequest) -> ToolOutput {
        tracing::info!(tool = %call.name, call_id = %call.id, "handling tool call");

        match self.tools.resolve(&call.name).await {
            Err(err) => ToolOutput::error(&call.id, err.to_string()),
            Ok(ToolBinding::Local(handler)) => {
                match handler.call(call.arguments.clone()).await {
                    Ok(value) => ToolOutput::new(&call.id, value),
                    Err(err) => {
                        tracing::error!(tool = %call.name, error = %err, "tool handler failed");
                        ToolOutput::error(&call.id, err.to_string())
                    }
                }
            }
            Ok(ToolBinding::Remote(descriptor)) => {
                match self.invoker.invoke(&descriptor, &call.arguments).await {
                    Ok(value) => ToolOutput::new(&call.id, value),
                    Err(err) => {
                        tracing::error!(tool = %call.name, error = %err, "remote invocation failed");
                        ToolOutput::error(&call.id, err.to_string())
                    }
                }
            }
        }
    }

    // Orchestration calls, each wrapped in the retry policy. Only
    // transport-kind failures are eligible.

    async fn create_thread(&self) -> Result<String, ServiceError> {
        let service = Arc::clone(&self.service);
        self.retry
            .execute(
                move || {
                    let service = Arc::clone(&service);
                    async move { service.create_thread().await }
                },
                ServiceError::is_transport,
            )
            .await
    }

    async fn load_thread(&self, id: &str) -> Result<String, ServiceError> {
        let service = Arc::clone(&self.service);
        self.retry
            .execute(
                move || {
                    let service = Arc::clone(&service);
                    async move { service.get_thread(id).await }
                },
                ServiceError::is_transport,
            )
            .await
    }

    async fn post_message(&self, thread: &str, content: &str) -> Result<(), ServiceError> {
        let service = Arc::clone(&self.service);
        self.retry
            .execute(
                move || {
                    let service = Arc::clone(&service);
                    async move { service.post_message(thread, content).await }
                },
                ServiceError::is_transport,
            )
            .await
    }

    async fn start_run(&self, thread: &str) -> Result<String, ServiceError> {
        let service = Arc::clone(&self.service);
        self.retry
            .execute(
                move || {
                    let service = Arc::clone(&service);
                    async move { service.start_run(thread).await }
                },
                ServiceError::is_transport,
            )
            .await
    }

    async fn poll_state(&self, thread: &str, run_id: &str) -> Result<RunState, ServiceError> {
        let service = Arc::clone(&self.service);
        self.retry
            .execute(
                move || {
                    let service = Arc::clone(&service);
                    async move { service.run_state(thread, run_id).await }
                },
                ServiceError::is_transport,
            )
            .await
    }

    async fn submit_outputs(
        &self,
        thread: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<RunState, ServiceError> {
        let service = Arc::clone(&self.service);
        self.retry
            .execute(
                move || {
                    let service = Arc::clone(&service);
                    async move { service.submit_tool_outputs(thread, run_id, outputs).await }
                },
                ServiceError::is_transport,
            )
            .await
    }

    async fn list_messages(&self, thread: &str) -> Result<Vec<ThreadMessage>, ServiceError> {
        let service = Arc::clone(&self.service);
        self.retry
            .execute(
                move || {
                    let service = Arc::clone(&service);
                    async move { service.list_messages(thread).await }
                },
                ServiceError::is_transport,
            )
            .await
    }

    fn check_cancelled(&self) -> Result<(), RunError> {
        if self.cancel.is_cancelled() {
            tracing::warn!("run cancelled");
            return Err(RunError::Cancelled);
        }
        Ok(())
    }

    fn check_deadline(&self, started: Instant) -> Result<(), RunError> {
        if let Some(limit) = self.timeout {
            if started.elapsed() >= limit {
                tracing::warn!(elapsed = ?started.elapsed(), "run timed out");
                return Err(RunError::TimedOut(started.elapsed()));
            }
        }
        Ok(())
    }

    /// Sleep one poll interval, waking early on cancellation and capping
    /// the wait at the run deadline.
    async fn wait_poll(&self, started: Instant) -> Result<(), RunError> {
        let mut wait = self.poll_interval;
        if let Some(limit) = self.timeout {
            let remaining = limit.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return Err(RunError::TimedOut(started.elapsed()));
            }
            wait = wait.min(remaining);
        }

        tokio::select! {
            biased;
            () = self.cancel.notified() => {
                if self.cancel.is_cancelled() {
                    Err(RunError::Cancelled)
                } else {
                    // Stale wakeup from a cancel issued before this run.
                    Ok(())
                }
            }
            () = tokio::time::sleep(wait) => Ok(()),
        }
    }
}

/// Extract the most recent agent-authored message from a thread listing
/// (most recent first). An empty agent turn yields [`NO_RESPONSE`] rather
/// than an error.
pub fn extract_response(messages: &[ThreadMessage]) -> String {
    messages
        .iter()
        .find(|m| m.role == Role::Assistant)
        .map(|m| m.content.clone())
        .unwrap_or_else(|| NO_RESPONSE.to_string())
}
