// ABOUTME: Tool module - definitions, handlers, bindings, and the registry.
// ABOUTME: Core abstraction for the capabilities a conversation can invoke.

mod definition;
mod handler;
mod registry;

pub use definition::*;
pub use handler::*;
pub use registry::*;
