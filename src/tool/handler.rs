// ABOUTME: Defines the ToolHandler trait - a local callable bound to a tool.
// ABOUTME: Handlers take JSON arguments and return a JSON-compatible result.

use async_trait::async_trait;

/// A local handler that services calls to a registered tool.
///
/// Arguments arrive as the untyped key-value payload the remote service
/// supplied; validation is the handler's responsibility.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the handler with the given arguments.
    async fn call(&self, args: serde_json::Value) -> Result<serde_json::Value, anyhow::Error>;
}

/// Adapter that exposes a plain closure as a [`ToolHandler`].
pub struct FnHandler<F>(F);

/// Wrap a synchronous closure as a tool handler.
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(serde_json::Value) -> Result<serde_json::Value, anyhow::Error> + Send + Sync,
{
    FnHandler(f)
}

#[async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(serde_json::Value) -> Result<serde_json::Value, anyhow::Error> + Send + Sync,
{
    async fn call(&self, args: serde_json::Value) -> Result<serde_json::Value, anyhow::Error> {
        (self.0)(args)
    }
}
