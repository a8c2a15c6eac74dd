//! Loading inputs and wiring a meeting together.

use anyhow::{Context, bail};
use roundtable_agent::{
    Bot, BotConfig, EndJudge, Human, LlmEvaluator, Rules, StdinSource, Summarizer,
};
use roundtable_hooks::{HookChain, TracingHook, YamlSink};
use roundtable_meeting::{AgentError, Meeting, MeetingConfig, ReplyAgent};
use roundtable_model::document::dump_yaml;
use roundtable_model::{Config, ConfigDocument};
use roundtable_provider_openai::OpenAiProvider;
use roundtable_schema::Value;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Everything `run` needs from the command line.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: PathBuf,
    pub thread: Option<String>,
    pub agenda: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: String,
    pub out: Option<PathBuf>,
    pub eval_out: Option<PathBuf>,
    pub max_turns: u32,
    pub eval_messages: usize,
    pub skip_eval: i32,
    pub user_input_end: String,
    pub language: String,
    pub instructions: Option<usize>,
}

/// Text given directly, `@path` for a file, or `@-` for standard input.
pub fn text_or_file(arg: &str) -> anyhow::Result<String> {
    match arg.strip_prefix('@') {
        Some("-") => read_stdin(),
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}")),
        None => Ok(arg.to_owned()),
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading standard input")?;
    Ok(text)
}

/// Load the config file and, if given, the thread (`-` for standard input;
/// a path that does not exist yet is an empty thread).
pub fn load_config(config: &Path, thread: Option<&str>) -> anyhow::Result<Config> {
    let config_text = std::fs::read_to_string(config)
        .with_context(|| format!("reading config {}", config.display()))?;
    let thread_text = match thread {
        None => String::new(),
        Some("-") => read_stdin()?,
        Some(path) if Path::new(path).is_file() => {
            std::fs::read_to_string(path).with_context(|| format!("reading thread {path}"))?
        }
        Some(path) => {
            tracing::debug!(path, "thread file does not exist yet");
            String::new()
        }
    };
    ConfigDocument::new(config_text, thread_text)
        .into_config()
        .with_context(|| format!("loading {}", config.display()))
}

/// The agenda: from the flag, a placeholder when only printing
/// instructions, else the first message of the loaded thread.
pub fn resolve_agenda(settings: &Settings, config: &Config) -> anyhow::Result<String> {
    if let Some(agenda) = &settings.agenda {
        return text_or_file(agenda);
    }
    if settings.instructions.is_some() {
        return Ok("DUMMY AGENDA".to_owned());
    }
    match config.main_thread().messages().first() {
        Some(first) => Ok(first.content().to_owned()),
        None => bail!("no agenda!"),
    }
}

/// Rendered instructions for the `index`-th speaker.
pub fn instructions(
    config: &Config,
    index: usize,
    language: &str,
    agenda: &str,
) -> anyhow::Result<String> {
    let Some(speaker) = config.speakers().get(index) else {
        bail!(
            "no speaker at index {index}, the config has {}",
            config.speakers().len()
        );
    };
    Ok(Rules::new(language, agenda).render(config, speaker.name())?)
}

/// One `[{summary: ...}]` record.
pub fn summary_record(summary: &str) -> anyhow::Result<String> {
    let record = Value::Seq(vec![Value::map([(
        "summary",
        Value::Str(summary.to_owned()),
    )])]);
    Ok(dump_yaml(&record)?)
}

fn append_file(path: &Path) -> anyhow::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))
}

impl Settings {
    fn provider(&self) -> OpenAiProvider {
        let provider = OpenAiProvider::new(self.api_key.clone()).model(self.model.clone());
        match &self.base_url {
            Some(url) => provider.base_url(url.clone()),
            None => provider,
        }
    }
}

/// Load, set up and play a meeting, or print instructions.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::debug!("start roundtable");
    let config = load_config(&settings.config, settings.thread.as_deref())?;
    let agenda = resolve_agenda(&settings, &config)?;

    let mut meeting = Meeting::new(
        config,
        MeetingConfig {
            max_turns: settings.max_turns,
            skip_eval_turns: settings.skip_eval,
        },
    );
    meeting.setup()?;

    if let Some(index) = settings.instructions {
        println!(
            "{}",
            instructions(meeting.config(), index, &settings.language, &agenda)?
        );
        return Ok(());
    }

    let mut chain = HookChain::new().with(TracingHook::new());
    if let Some(out) = &settings.out {
        chain = chain.with(
            YamlSink::append_to(out).with_context(|| format!("opening {}", out.display()))?,
        );
    }
    meeting
        .config_mut()
        .main_thread_mut()
        .set_append_hook(Arc::new(chain));
    meeting.seed_agenda(&agenda)?;

    let rules = Rules::new(settings.language.clone(), agenda.clone());
    let speakers = meeting.config().speakers().to_vec();
    for speaker in &speakers {
        let agent: Arc<dyn ReplyAgent> = if speaker.is_human() {
            Arc::new(Human::new(
                StdinSource::new(),
                settings.user_input_end.clone(),
            ))
        } else {
            Arc::new(Bot::new(
                settings.provider(),
                BotConfig {
                    instructions: rules.render(meeting.config(), speaker.name())?,
                    model: Some(settings.model.clone()),
                    ..BotConfig::default()
                },
            ))
        };
        meeting.register(speaker.name(), agent);
    }

    let end = LlmEvaluator::new(
        "end",
        settings.provider(),
        EndJudge::new(agenda.clone()),
        settings.eval_messages,
    )
    .with_report(|done: &bool| -> Result<(), AgentError> {
        tracing::info!(done, "end evaluation");
        Ok(())
    });
    meeting.set_end_evaluator(Arc::new(end));

    let eval_out = match &settings.eval_out {
        Some(path) => Some(Mutex::new(append_file(path)?)),
        None => None,
    };
    let summary = LlmEvaluator::new(
        "summary",
        settings.provider(),
        Summarizer::new(settings.language.clone()),
        settings.eval_messages,
    )
    .with_report(move |text: &String| -> Result<(), AgentError> {
        tracing::info!("summary evaluation");
        let Some(out) = &eval_out else {
            return Ok(());
        };
        let record = summary_record(text).map_err(|e| AgentError::Report(e.to_string()))?;
        let mut file = out
            .lock()
            .map_err(|_| AgentError::Report("summary output lock poisoned".into()))?;
        file.write_all(record.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| AgentError::Report(e.to_string()))
    });
    meeting.add_report(Arc::new(summary));

    let outcome = meeting.run().await?;
    tracing::info!(turns = outcome.turns, reason = %outcome.reason, "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            config: PathBuf::from("config.yml"),
            thread: None,
            agenda: None,
            model: "gpt-4o-mini".into(),
            base_url: None,
            api_key: String::new(),
            out: None,
            eval_out: None,
            max_turns: 16,
            eval_messages: 5,
            skip_eval: 0,
            user_input_end: "END".into(),
            language: "English".into(),
            instructions: None,
        }
    }

    const CONFIG: &str = "speakers:\n- name: alice\n  desc: consultant\n";
    const THREAD: &str = "- timestamp: 1\n  id: 1\n  speaker: moderator\n  permissions: [rt_public, rt_moderator]\n  content: Is AI a friend?\n";

    #[test]
    fn agenda_from_flag_file_or_thread() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("agenda.txt");
        std::fs::write(&file, "from a file").unwrap();

        let empty = ConfigDocument::new(CONFIG, "").into_config().unwrap();
        let mut s = settings();
        assert_eq!(
            resolve_agenda(&s, &empty).unwrap_err().to_string(),
            "no agenda!"
        );

        s.instructions = Some(0);
        assert_eq!(resolve_agenda(&s, &empty).unwrap(), "DUMMY AGENDA");

        s.agenda = Some(format!("@{}", file.display()));
        assert_eq!(resolve_agenda(&s, &empty).unwrap(), "from a file");

        let resumed = ConfigDocument::new(CONFIG, THREAD).into_config().unwrap();
        assert_eq!(
            resolve_agenda(&settings(), &resumed).unwrap(),
            "Is AI a friend?"
        );
    }

    #[test]
    fn missing_thread_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.yml");
        std::fs::write(&config, CONFIG).unwrap();
        let thread = dir.path().join("thread.yml");
        let c = load_config(&config, Some(thread.to_str().unwrap())).unwrap();
        assert!(c.main_thread().is_empty());

        std::fs::write(&thread, THREAD).unwrap();
        let c = load_config(&config, Some(thread.to_str().unwrap())).unwrap();
        assert_eq!(c.main_thread().len(), 1);
    }

    #[test]
    fn instructions_index_must_exist() {
        let mut c = ConfigDocument::new(CONFIG, "").into_config().unwrap();
        c.setup().unwrap();
        assert!(instructions(&c, 0, "English", "x").unwrap().contains("named alice"));
        assert!(instructions(&c, 1, "English", "x").is_err());
    }

    #[test]
    fn summary_records_are_lists() {
        let text = summary_record("short\nand sweet").unwrap();
        assert!(text.starts_with("- summary:"));
    }
}
