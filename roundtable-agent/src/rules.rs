//! The instruction document handed to a speaker's model.

use crate::format::{render_read, render_write};
use roundtable_meeting::Reply;
use roundtable_model::{Config, Message, ModelError, Speaker, builtin};
use roundtable_schema::Section;

/// Meeting-wide settings that go into every speaker's rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    /// Language every statement must be written in.
    pub language: String,
    /// What the meeting is about.
    pub agenda: String,
}

impl Rules {
    /// Rules for a meeting about `agenda`, held in `language`.
    pub fn new(language: impl Into<String>, agenda: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            agenda: agenda.into(),
        }
    }

    /// The full document for `speaker`.
    pub fn for_speaker(&self, config: &Config, speaker: &str) -> Result<Section, ModelError> {
        let s = config.speaker(speaker)?;
        Ok(Section::new(
            "Rules of Meeting",
            "You are about to attend a meeting.\n\
             Please read and understand the rules as they are explained to you.",
        )
        .with_children(vec![
            self.language(),
            messages(s),
            role_of_speaker(s),
            introduction(config, speaker),
            self.agenda(),
        ]))
    }

    /// Rendered Markdown for `speaker`.
    pub fn render(&self, config: &Config, speaker: &str) -> Result<String, ModelError> {
        Ok(self.for_speaker(config, speaker)?.render())
    }

    fn language(&self) -> Section {
        Section::new(
            "Language",
            format!("You must write your own opinions **in {}**.", self.language),
        )
    }

    fn agenda(&self) -> Section {
        Section::new("Agenda", format!("**{}**", self.agenda))
    }
}

fn messages(speaker: &Speaker) -> Section {
    let example = Message::new(
        1742785200,
        2,
        "alice",
        [builtin::public_name(), builtin::dm_name("alice")],
        "To be, or not to be,\nthat is the question.",
    )
    .map(|m| render_read(&m))
    .unwrap_or_default();
    let roles: Vec<&str> = speaker.write_roles().iter().map(String::as_str).collect();
    let reply = render_write(&Reply::public(
        "There's always good weather\nto be found somewhere.",
    ));

    Section::new("Read and Write Messages", "").with_children(vec![
        Section::new(
            "Read Messages",
            format!(
                "Each Message you are given looks like this:\n\n```\n{example}\n```\n\n\
                 `speaker` is who wrote it and `content` is everything after the `content:` line."
            ),
        ),
        Section::new(
            "Write Messages",
            format!(
                "Write exactly one Message in the following format:\n\n```\n{reply}\n```\n\n\
                 `role` decides who can read your Message. You may write as: {}.\n\
                 Without a `role:` line your Message is public.\n\
                 Participant names should be written in their original language\n\
                 regardless of the language indicated in **Language** section.",
                roles.join(", ")
            ),
        ),
    ])
}

fn role_of_speaker(speaker: &Speaker) -> Section {
    Section::new(
        "You are a Speaker",
        format!(
            "You are a Speaker named {}.\n{}",
            speaker.name(),
            speaker.description()
        ),
    )
}

fn introduction(config: &Config, speaker: &str) -> Section {
    let others: Vec<&str> = config
        .speakers()
        .iter()
        .map(Speaker::name)
        .filter(|name| *name != speaker)
        .collect();
    Section::new(
        "Introduction",
        format!(
            "You are about to attend a meeting.\n\
             There will be {} participants including you, {}.\n\
             Please read **Read and Write Messages**, **Language**, **Agenda** and **You are a Speaker** sections,\n\
             read the conference messages you will be given, and write your own opinions.\n\
             DO NOT respond to this instruction and write your own opinions immediately.",
            config.speakers().len(),
            others.join(", ")
        ),
    )
}
