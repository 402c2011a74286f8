// ABOUTME: Retry module - bounded-attempt retry with exponential backoff.
// ABOUTME: Shared by the conversation service calls and remote tool invocations.

mod policy;

pub use policy::*;
