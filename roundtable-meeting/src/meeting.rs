//! The turn loop.

use crate::agent::{EvalInput, Evaluator, ReplyAgent, ReplyInput};
use crate::error::MeetingError;
use crate::policy::{rotation, should_skip};
use roundtable_model::{Config, IntegrityError, ModelError, Speaker, builtin};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Static limits for one meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetingConfig {
    /// Hard stop after this many turns.
    pub max_turns: u32,
    /// Turns before the first evaluation may happen. Negative disables
    /// evaluation altogether.
    pub skip_eval_turns: i32,
}

impl Default for MeetingConfig {
    fn default() -> Self {
        Self {
            max_turns: 16,
            skip_eval_turns: 0,
        }
    }
}

/// Why a meeting ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Every allowed turn was taken.
    MaxTurns,
    /// The end evaluator said the discussion is over.
    EvaluatorDecision,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndReason::MaxTurns => "max_turns",
            EndReason::EvaluatorDecision => "evaluator_decision",
        })
    }
}

/// Where a meeting is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingState {
    /// `run` has not been called, or refused to start.
    NotStarted,
    /// Inside the turn loop.
    Running {
        /// The turn being played.
        turn: u32,
    },
    /// Halted normally.
    Ended(EndReason),
    /// A collaborator or configuration error stopped the loop.
    Aborted,
}

/// What [`Meeting::run`] returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Why the loop stopped.
    pub reason: EndReason,
    /// Turns played.
    pub turns: u32,
    /// `(evaluator name, value)` for each report evaluator, in order. Empty
    /// unless the end evaluator decided.
    pub reports: Vec<(String, String)>,
}

/// A meeting: the configuration, who answers for each speaker, and who
/// decides when to stop.
///
/// The meeting owns the [`Config`] and with it the main thread. Agents and
/// evaluators only ever see filtered copies.
pub struct Meeting {
    config: Config,
    settings: MeetingConfig,
    agents: HashMap<String, Arc<dyn ReplyAgent>>,
    end_evaluator: Option<Arc<dyn Evaluator<bool>>>,
    reports: Vec<Arc<dyn Evaluator<String>>>,
    state: MeetingState,
}

impl Meeting {
    /// A meeting that has not started.
    pub fn new(config: Config, settings: MeetingConfig) -> Self {
        Self {
            config,
            settings,
            agents: HashMap::new(),
            end_evaluator: None,
            reports: Vec::new(),
            state: MeetingState::NotStarted,
        }
    }

    /// Register the reply agent for `speaker`, replacing any earlier one.
    pub fn register(&mut self, speaker: impl Into<String>, agent: Arc<dyn ReplyAgent>) {
        self.agents.insert(speaker.into(), agent);
    }

    /// Set the evaluator that decides whether the discussion is over.
    pub fn set_end_evaluator(&mut self, evaluator: Arc<dyn Evaluator<bool>>) {
        self.end_evaluator = Some(evaluator);
    }

    /// Add an evaluator that runs once the end evaluator has decided.
    pub fn add_report(&mut self, evaluator: Arc<dyn Evaluator<String>>) {
        self.reports.push(evaluator);
    }

    /// The configuration, main thread included.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable configuration, for hooks and clocks before the run.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The limits this meeting runs with.
    pub fn settings(&self) -> MeetingConfig {
        self.settings
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MeetingState {
        self.state
    }

    /// Give the meeting back its configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Generate builtins and validate the configuration.
    pub fn setup(&mut self) -> Result<(), MeetingError> {
        if self.state != MeetingState::NotStarted {
            return Err(MeetingError::AlreadyStarted);
        }
        self.config.setup()?;
        Ok(())
    }

    /// Open an empty thread with `agenda`, written by the moderator and
    /// readable by everyone. Returns whether a message was appended.
    pub fn seed_agenda(&mut self, agenda: &str) -> Result<bool, MeetingError> {
        if !self.config.is_set_up() {
            return Err(MeetingError::NotSetUp);
        }
        if !self.config.main_thread().is_empty() {
            return Ok(false);
        }
        let id = self
            .config
            .main_thread_mut()
            .append(builtin::MODERATOR, [builtin::public_name()], agenda)?
            .id();
        tracing::info!(id, speaker = builtin::MODERATOR, "agenda seeded");
        Ok(true)
    }

    /// The speaker who plays `turn` (1-based).
    pub fn speaker_for(&self, turn: u32) -> Option<&Speaker> {
        let speakers = self.config.speakers();
        speakers.get(rotation(turn, speakers.len())?)
    }

    /// Play the meeting to its end.
    ///
    /// Every speaker needs a registered agent before the first turn. Any
    /// failure after that aborts the meeting; turns already taken stay in
    /// the thread.
    pub async fn run(&mut self) -> Result<Outcome, MeetingError> {
        if self.state != MeetingState::NotStarted {
            return Err(MeetingError::AlreadyStarted);
        }
        if !self.config.is_set_up() {
            return Err(MeetingError::NotSetUp);
        }
        let speakers = self.config.speakers().to_vec();
        let agents = speakers
            .iter()
            .map(|s| {
                self.agents
                    .get(s.name())
                    .cloned()
                    .ok_or_else(|| MeetingError::AgentNotFound(s.name().to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match self.turns(&speakers, &agents).await {
            Ok(outcome) => {
                self.state = MeetingState::Ended(outcome.reason);
                tracing::info!(
                    turns = outcome.turns,
                    reason = %outcome.reason,
                    "meeting ended"
                );
                Ok(outcome)
            }
            Err(e) => {
                self.state = MeetingState::Aborted;
                tracing::error!(error = %e, "meeting aborted");
                Err(e)
            }
        }
    }

    async fn turns(
        &mut self,
        speakers: &[Speaker],
        agents: &[Arc<dyn ReplyAgent>],
    ) -> Result<Outcome, MeetingError> {
        let count = speakers.len();
        for turn in 1..=self.settings.max_turns {
            self.state = MeetingState::Running { turn };
            let Some(index) = rotation(turn, count) else {
                return Err(ModelError::from(IntegrityError::NoSpeakers).into());
            };
            let speaker = &speakers[index];

            let visible = self.config.visible_to(speaker.name())?;
            let input = ReplyInput::new(turn, speaker.clone(), visible);
            let reply = agents[index]
                .reply(input)
                .await
                .map_err(|e| MeetingError::reply_agent(speaker.name(), e))?;
            let id = self
                .config
                .post(speaker.name(), &reply.role, reply.content)?
                .id();
            tracing::info!(turn, speaker = speaker.name(), id, role = %reply.role, "turn taken");

            if let Some(skip) = should_skip(turn, self.settings.skip_eval_turns, count) {
                tracing::debug!(turn, reason = %skip, "evaluation skipped");
                continue;
            }
            let Some(end) = self.end_evaluator.clone() else {
                continue;
            };
            let view = self.config.visible_to_role(&builtin::moderator_name())?;
            let done = end
                .evaluate(EvalInput::new(turn, view.clone()))
                .await
                .map_err(|e| MeetingError::evaluator(end.name(), e))?;
            tracing::info!(turn, evaluator = end.name(), done, "end evaluated");
            if !done {
                continue;
            }

            let mut reports = Vec::with_capacity(self.reports.len());
            for evaluator in &self.reports {
                let value = evaluator
                    .evaluate(EvalInput::new(turn, view.clone()))
                    .await
                    .map_err(|e| MeetingError::evaluator(evaluator.name(), e))?;
                tracing::debug!(turn, evaluator = evaluator.name(), "report produced");
                reports.push((evaluator.name().to_owned(), value));
            }
            return Ok(Outcome {
                reason: EndReason::EvaluatorDecision,
                turns: turn,
                reports,
            });
        }
        Ok(Outcome {
            reason: EndReason::MaxTurns,
            turns: self.settings.max_turns,
            reports: Vec::new(),
        })
    }
}

impl fmt::Debug for Meeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut agents: Vec<_> = self.agents.keys().collect();
        agents.sort();
        f.debug_struct("Meeting")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("agents", &agents)
            .field("end_evaluator", &self.end_evaluator.as_ref().map(|e| e.name()))
            .field("reports", &self.reports.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trio() -> Config {
        Config::new(
            vec![],
            vec![],
            ["a", "b", "c"]
                .into_iter()
                .map(|n| Speaker::new(n, "participant").unwrap())
                .collect(),
        )
    }

    #[test]
    fn speakers_rotate_by_turn() {
        let meeting = Meeting::new(trio(), MeetingConfig::default());
        let names: Vec<_> = (1..=7)
            .map(|t| meeting.speaker_for(t).unwrap().name().to_owned())
            .collect();
        assert_eq!(names, ["a", "b", "c", "a", "b", "c", "a"]);
        assert!(meeting.speaker_for(0).is_none());
    }

    #[test]
    fn setup_once_before_start() {
        let mut meeting = Meeting::new(trio(), MeetingConfig::default());
        meeting.setup().unwrap();
        assert!(matches!(meeting.setup(), Err(MeetingError::Config(_))));
    }

    #[test]
    fn seed_requires_setup() {
        let mut meeting = Meeting::new(trio(), MeetingConfig::default());
        assert!(matches!(
            meeting.seed_agenda("topic"),
            Err(MeetingError::NotSetUp)
        ));
        meeting.setup().unwrap();
        assert!(meeting.seed_agenda("topic").unwrap());
        assert!(!meeting.seed_agenda("again").unwrap());
        let first = &meeting.config().main_thread().messages()[0];
        assert_eq!(first.speaker(), "moderator");
        assert!(first.permissions().contains("rt_public"));
        assert!(first.permissions().contains("rt_moderator"));
    }

    #[test]
    fn default_limits() {
        let c = MeetingConfig::default();
        assert_eq!((c.max_turns, c.skip_eval_turns), (16, 0));
        assert_eq!(EndReason::MaxTurns.to_string(), "max_turns");
    }
}
