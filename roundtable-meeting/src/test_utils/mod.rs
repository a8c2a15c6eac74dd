//! Scripted collaborators for tests.
//!
//! Available behind the `test-utils` feature flag. Each double records what
//! it was given so tests can assert on the views the scheduler hands out.

mod agents;
mod evaluators;

pub use agents::{EchoAgent, FailingAgent, ScriptedAgent};
pub use evaluators::ScriptedEvaluator;
