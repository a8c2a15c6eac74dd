//! Evaluator doubles.

use crate::agent::{EvalInput, Evaluator};
use crate::error::AgentError;
use async_trait::async_trait;
use std::sync::Mutex;

/// Returns queued values in order, repeating the last one once the queue
/// runs dry. Records every input.
#[derive(Debug)]
pub struct ScriptedEvaluator<T> {
    name: String,
    values: Mutex<Vec<T>>,
    seen: Mutex<Vec<EvalInput>>,
}

impl<T: Clone> ScriptedEvaluator<T> {
    /// An evaluator named `name` answering with `values`.
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = T>) -> Self {
        let mut values: Vec<T> = values.into_iter().collect();
        values.reverse();
        Self {
            name: name.into(),
            values: Mutex::new(values),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// An evaluator that always answers `value`.
    pub fn always(name: impl Into<String>, value: T) -> Self {
        Self::new(name, [value])
    }

    /// How often `evaluate` ran.
    pub fn calls(&self) -> usize {
        self.seen.lock().map(|s| s.len()).unwrap_or_default()
    }

    /// Inputs received, in order.
    pub fn seen(&self) -> Vec<EvalInput> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Evaluator<T> for ScriptedEvaluator<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, input: EvalInput) -> Result<T, AgentError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(input);
        }
        let mut values = self
            .values
            .lock()
            .map_err(|_| AgentError::Model("evaluator lock poisoned".into()))?;
        let value = if values.len() > 1 {
            values.pop()
        } else {
            values.last().cloned()
        };
        value.ok_or_else(|| AgentError::Model(format!("{} has no values", self.name)))
    }
}
