// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use courier::prelude::*;` to get started quickly.

pub use crate::blocking::{BlockingInvoker, BlockingSession};
pub use crate::config::Config;
pub use crate::error::{
    ConfigError, CourierError, InvocationError, RunError, ServiceError, ToolError,
};
pub use crate::remote::{
    HttpMethod, ParamPlacement, RemoteDescriptor, RemoteInvoker, WorkflowRequest,
    WorkflowResponse, WorkflowStatus,
};
pub use crate::retry::RetryPolicy;
pub use crate::run::{
    CancelHandle, ConversationService, Role, RunState, Session, ThreadMessage, ToolCallRequest,
    ToolOutput, NO_RESPONSE,
};
pub use crate::tool::{
    handler_fn, ParamKind, Registry, ToolBinding, ToolDefinition, ToolHandler, ToolParameter,
};
