//! # roundtable CLI
//!
//! Discuss an agenda with several language models, and optionally people.

mod app;
mod skeleton;

use clap::Parser;
use skeleton::Skeleton;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "Examples:
  # start a discussion
  roundtable --skeleton dual > dual.yml
  roundtable -c dual.yml -a \"Can AI be a friend to humans?\"
  # keep the thread and continue it later
  roundtable -c dual.yml -a \"Can AI be a friend to humans?\" -o thread.yml
  roundtable -c dual.yml -t thread.yml -o thread.yml
  # another OpenAI-compatible server
  roundtable -c dual.yml -a \"Can AI be a friend to humans?\" -u http://localhost:11434/v1 -m gemma3";

#[derive(Parser)]
#[command(name = "roundtable")]
#[command(version, about = "Discuss with multiple AIs", after_help = EXAMPLES)]
struct Cli {
    /// Config file
    #[arg(short, long, default_value = "config.yml")]
    config: PathBuf,

    /// Thread file to continue, `-` for standard input
    #[arg(short, long)]
    thread: Option<String>,

    /// Agenda: the text itself, `@file`, or `@-` for standard input.
    /// Defaults to the first message of the thread.
    #[arg(short, long)]
    agenda: Option<String>,

    /// Model name
    #[arg(short, long, default_value = "gpt-4o-mini")]
    model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(short = 'u', long)]
    base_url: Option<String>,

    /// API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, default_value = "")]
    api_key: String,

    /// Append every new message to this file
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Append summaries to this file
    #[arg(short, long)]
    eval_out: Option<PathBuf>,

    /// Maximum number of statements
    #[arg(short = 'n', long, default_value_t = 16)]
    max_turns: u32,

    /// How many of the latest statements evaluators read
    #[arg(long, default_value_t = 5)]
    eval_messages: usize,

    /// Turns without evaluation; negative never evaluates
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    skip_eval: i32,

    /// Line that ends a human's input
    #[arg(long, default_value = "END")]
    user_input_end: String,

    /// Language of the discussion
    #[arg(short, long, default_value = "English")]
    language: String,

    /// Enable debug logs
    #[arg(long)]
    debug: bool,

    /// Only log errors
    #[arg(long)]
    quiet: bool,

    /// Print a starter config and exit
    #[arg(long, value_enum)]
    skeleton: Option<Skeleton>,

    /// Print the instructions for the n-th speaker (0 is the first) and exit
    #[arg(long)]
    instructions: Option<usize>,
}

impl Cli {
    fn settings(self) -> app::Settings {
        app::Settings {
            config: self.config,
            thread: self.thread,
            agenda: self.agenda,
            model: self.model,
            base_url: self.base_url,
            api_key: self.api_key,
            out: self.out,
            eval_out: self.eval_out,
            max_turns: self.max_turns,
            eval_messages: self.eval_messages,
            skip_eval: self.skip_eval,
            user_input_end: self.user_input_end,
            language: self.language,
            instructions: self.instructions,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        tracing::Level::ERROR
    } else if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(skeleton) = cli.skeleton {
        println!("{}", skeleton.render()?);
        return Ok(());
    }

    app::run(cli.settings()).await
}
