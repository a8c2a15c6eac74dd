//! Model-backed evaluators.

use crate::format::render_read;
use crate::provider::Provider;
use crate::types::{ChatMessage, ProviderRequest};
use async_trait::async_trait;
use roundtable_meeting::{AgentError, Discard, EvalInput, Evaluator, Report};
use roundtable_schema::Section;
use std::sync::Arc;

/// Turns a model's answer into an evaluation value.
pub trait Interpret: Send + Sync {
    /// What the evaluator produces.
    type Output: Send + 'static;

    /// Instructions sent as the system prompt.
    fn instructions(&self) -> Section;

    /// Read the model's answer.
    fn interpret(&self, output: &str) -> Self::Output;
}

/// Decides whether the discussion should end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndJudge {
    agenda: String,
}

impl EndJudge {
    /// A judge for a meeting about `agenda`.
    pub fn new(agenda: impl Into<String>) -> Self {
        Self {
            agenda: agenda.into(),
        }
    }
}

impl Interpret for EndJudge {
    type Output = bool;

    fn instructions(&self) -> Section {
        Section::new(
            "When to Stop Discussing",
            format!(
                "You carefully evaluate the content of the discussion and\n\
                 decide whether you should continue or end the discussion.\n\
                 For example, you should end the discussion in the following situations:\n\
                 \n\
                 - The agenda item has been fully discussed and a conclusion has been reached\n\
                 - No conclusion can be reached by continuing the discussion.\n\
                 - Similar opinions are being repeated.\n\
                 \n\
                 When deciding whether to continue or end the discussion,\n\
                 only reply \"yes\" to end the discussion, or \"no\" if not.\n\
                 The agenda item is {}.",
                self.agenda
            ),
        )
    }

    fn interpret(&self, output: &str) -> bool {
        output
            .split_whitespace()
            .next()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
            .is_some_and(|word| word.eq_ignore_ascii_case("yes"))
    }
}

/// Summarizes the discussion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summarizer {
    language: String,
}

impl Summarizer {
    /// Summaries written in `language`.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl Interpret for Summarizer {
    type Output = String;

    fn instructions(&self) -> Section {
        Section::new(
            "Summary",
            format!(
                "Provide summary of input text concisely and comprehensively in {}.",
                self.language
            ),
        )
    }

    fn interpret(&self, output: &str) -> String {
        output.trim().to_owned()
    }
}

/// An evaluator that asks a model about the latest messages.
///
/// Sends the judge's instructions and the last `latest` messages of the
/// moderator's view, each as a user turn in the read format. The
/// interpreted value goes to the report hook before it is returned.
pub struct LlmEvaluator<P: Provider, J: Interpret> {
    name: String,
    provider: P,
    judge: J,
    latest: usize,
    model: Option<String>,
    report: Arc<dyn Report<J::Output>>,
}

impl<P: Provider, J: Interpret> LlmEvaluator<P, J> {
    /// An evaluator reading the last `latest` messages. Reports are
    /// discarded until [`LlmEvaluator::with_report`] sets a hook.
    pub fn new(name: impl Into<String>, provider: P, judge: J, latest: usize) -> Self {
        Self {
            name: name.into(),
            provider,
            judge,
            latest,
            model: None,
            report: Arc::new(Discard),
        }
    }

    /// Use a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Send every value to `report`.
    pub fn with_report(mut self, report: impl Report<J::Output> + 'static) -> Self {
        self.report = Arc::new(report);
        self
    }

    fn request(&self, input: &EvalInput) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            system: Some(self.judge.instructions().render()),
            messages: input
                .visible
                .latest(self.latest)
                .iter()
                .map(|m| ChatMessage::user(render_read(m)))
                .collect(),
            ..ProviderRequest::default()
        }
    }
}

#[async_trait]
impl<P, J> Evaluator<J::Output> for LlmEvaluator<P, J>
where
    P: Provider + 'static,
    J: Interpret + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, input: EvalInput) -> Result<J::Output, AgentError> {
        tracing::info!(evaluator = %self.name, turn = input.turn, "evaluation started");
        let request = self.request(&input);
        for (i, m) in request.messages.iter().enumerate() {
            tracing::debug!(evaluator = %self.name, index = i, content = %m.content, "evaluator input");
        }
        let response = self
            .provider
            .complete(request)
            .await?;
        let value = self.judge.interpret(&response.content);
        self.report.report(&value)?;
        tracing::info!(evaluator = %self.name, turn = input.turn, "evaluation finished");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_judge_reads_the_first_word() {
        let judge = EndJudge::new("x");
        assert!(judge.interpret("yes"));
        assert!(judge.interpret("  Yes, we are done."));
        assert!(judge.interpret("**YES**"));
        assert!(!judge.interpret("no"));
        assert!(!judge.interpret("not yes"));
        assert!(!judge.interpret("eyes on the agenda"));
        assert!(!judge.interpret("yesterday we agreed"));
        assert!(!judge.interpret(""));
    }

    #[test]
    fn instructions_name_agenda_and_language() {
        let end = EndJudge::new("Budget").instructions().render();
        assert!(end.starts_with("# When to Stop Discussing\n"));
        assert!(end.ends_with("The agenda item is Budget."));
        let summary = Summarizer::new("Japanese").instructions().render();
        assert_eq!(
            summary,
            "# Summary\nProvide summary of input text concisely and comprehensively in Japanese."
        );
    }
}
