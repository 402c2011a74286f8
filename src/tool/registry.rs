// ABOUTME: Implements the Registry - a thread-safe container mapping tool
// ABOUTME: names to their definitions and executable bindings.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{ToolDefinition, ToolHandler};
use crate::error::ToolError;
use crate::remote::RemoteDescriptor;

/// The executable side of a registered tool: a local handler or a
/// remote-call descriptor.
#[derive(Clone)]
pub enum ToolBinding {
    Local(Arc<dyn ToolHandler>),
    Remote(RemoteDescriptor),
}

impl std::fmt::Debug for ToolBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolBinding::Local(_) => f.write_str("ToolBinding::Local"),
            ToolBinding::Remote(d) => f.debug_tuple("ToolBinding::Remote").field(d).finish(),
        }
    }
}

struct ToolEntry {
    definition: ToolDefinition,
    binding: Option<ToolBinding>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, ToolEntry>,
    /// Names in insertion order, for stable declaration output.
    order: Vec<String>,
}

/// A thread-safe registry of tools. Cloning shares the underlying state.
#[derive(Default, Clone)]
pub struct Registry {
    inner: Arc<RwLock<Inner>>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with a binding, overwriting any existing entry.
    pub async fn register(&self, definition: ToolDefinition, binding: ToolBinding) {
        self.insert(definition, Some(binding)).await;
    }

    /// Register a tool with a local handler.
    pub async fn register_local<H: ToolHandler + 'static>(
        &self,
        definition: ToolDefinition,
        handler: H,
    ) {
        self.register(definition, ToolBinding::Local(Arc::new(handler)))
            .await;
    }

    /// Register a tool backed by a remote endpoint.
    pub async fn register_remote(&self, definition: ToolDefinition, descriptor: RemoteDescriptor) {
        self.register(definition, ToolBinding::Remote(descriptor))
            .await;
    }

    /// Register a definition with no binding. The tool is presented to the
    /// remote service but cannot be executed locally; resolution fails.
    pub async fn declare(&self, definition: ToolDefinition) {
        self.insert(definition, None).await;
    }

    async fn insert(&self, definition: ToolDefinition, binding: Option<ToolBinding>) {
        let name = definition.name.clone();
        let mut inner = self.inner.write().await;

        let entry = ToolEntry {
            definition,
            binding,
        };

        if inner.entries.insert(name.clone(), entry).is_some() {
            // Overwrite keeps the original declaration position.
            tracing::warn!(tool = %name, "re-registering tool, previous binding replaced");
        } else {
            inner.order.push(name.clone());
            tracing::info!(tool = %name, "tool registered");
        }
    }

    /// Unregister a tool by name. No-op if absent.
    pub async fn unregister(&self, name: &str) {
        let mut inner = self.inner.write().await;
        if inner.entries.remove(name).is_some() {
            inner.order.retain(|n| n != name);
        }
    }

    /// Resolve a tool name to its binding.
    ///
    /// Fails with [`ToolError::Unknown`] when the name is unregistered or
    /// was only declared.
    pub async fn resolve(&self, name: &str) -> Result<ToolBinding, ToolError> {
        let inner = self.inner.read().await;
        inner
            .entries
            .get(name)
            .and_then(|e| e.binding.clone())
            .ok_or_else(|| ToolError::Unknown(name.to_string()))
    }

    /// Get a tool's definition by name.
    pub async fn definition(&self, name: &str) -> Option<ToolDefinition> {
        let inner = self.inner.read().await;
        inner.entries.get(name).map(|e| e.definition.clone())
    }

    /// All definitions in insertion order, for presenting to the remote
    /// agent service.
    pub async fn declarations(&self) -> Vec<ToolDefinition> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|name| inner.entries.get(name))
            .map(|e| e.definition.clone())
            .collect()
    }

    /// Number of registered tools.
    pub async fn count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.entries.len()
    }
}
