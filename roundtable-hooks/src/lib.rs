#![deny(missing_docs)]
//! Append hook composition for roundtable.
//!
//! A [`MainThread`](roundtable_model::MainThread) notifies exactly one
//! [`AppendHook`] per message. [`HookChain`] fans that single slot out to an
//! ordered pipeline of hooks. Hooks run in registration order and the chain
//! stops at the first error, which aborts the append.
//!
//! Two hooks ship with the crate: [`TracingHook`] logs each message and
//! [`YamlSink`] persists it as a thread record.

pub mod sink;
pub mod tracing_hook;

pub use sink::YamlSink;
pub use tracing_hook::TracingHook;

use roundtable_model::{AppendHook, HookError, Message};
use std::sync::Arc;

/// An ordered pipeline of append hooks behind a single hook slot.
#[derive(Clone, Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn AppendHook>>,
}

impl HookChain {
    /// Create a new empty chain.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Add a hook to the end of the pipeline.
    pub fn add(&mut self, hook: Arc<dyn AppendHook>) {
        self.hooks.push(hook);
    }

    /// Builder form of [`HookChain::add`].
    pub fn with(mut self, hook: impl AppendHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Number of hooks in the pipeline.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl AppendHook for HookChain {
    fn on_append(&self, message: &Message) -> Result<(), HookError> {
        for (position, hook) in self.hooks.iter().enumerate() {
            if let Err(e) = hook.on_append(message) {
                tracing::warn!(id = message.id(), position, error = %e, "append hook failed");
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder(log: Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> impl AppendHook {
        move |_: &Message| -> Result<(), HookError> {
            log.lock().unwrap().push(name);
            Ok(())
        }
    }

    fn message() -> Message {
        Message::new(0, 1, "alice", ["rt_public"], "hi").unwrap()
    }

    #[test]
    fn runs_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = HookChain::new()
            .with(recorder(log.clone(), "first"))
            .with(recorder(log.clone(), "second"));
        chain.on_append(&message()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn stops_at_first_error() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = HookChain::new()
            .with(recorder(log.clone(), "first"))
            .with(|_: &Message| -> Result<(), HookError> { Err(HookError::Failed("boom".into())) })
            .with(recorder(log.clone(), "never"));
        let err = chain.on_append(&message()).unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(*log.lock().unwrap(), vec!["first"]);
    }

    #[test]
    fn empty_chain_accepts() {
        let chain = HookChain::default();
        assert!(chain.is_empty());
        assert!(chain.on_append(&message()).is_ok());
    }

    #[test]
    fn chain_is_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        _assert_send_sync::<HookChain>();
    }
}
