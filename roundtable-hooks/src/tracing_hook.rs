//! Concrete [`AppendHook`] using the [`tracing`] crate.

use roundtable_model::{AppendHook, HookError, Message};

/// An [`AppendHook`] that emits one structured `INFO` event per message.
///
/// Always accepts: observes but never vetoes an append. Content is only
/// logged at `TRACE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHook;

impl TracingHook {
    /// Create a new `TracingHook`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AppendHook for TracingHook {
    fn on_append(&self, message: &Message) -> Result<(), HookError> {
        tracing::info!(
            id = message.id(),
            speaker = message.speaker(),
            permissions = message.permissions().len(),
            "roundtable.thread.append"
        );
        tracing::trace!(id = message.id(), content = message.content(), "roundtable.thread.content");
        Ok(())
    }
}
