// ABOUTME: Run module - conversation run state machine and the service
// ABOUTME: contract it drives, plus the session engine tying it together.

mod engine;
mod service;
mod state;

pub use engine::*;
pub use service::*;
pub use state::*;

#[cfg(test)]
mod state_test;
