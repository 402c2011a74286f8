// ABOUTME: Remote module - descriptors and HTTP invocation for tools hosted
// ABOUTME: on external endpoints, including long-running workflow polling.

mod invoker;
mod workflow;

pub use invoker::*;
pub use workflow::*;

#[cfg(test)]
mod invoker_test;
