//! CLI for the topicbus event bus.
//!
//! `demo` replays the publish/subscribe walkthrough; `repl` opens an
//! interactive shell where handlers print what they receive.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use topicbus::config::Config;
use topicbus::logging::init_logging_with;
use topicbus::shell::{Shell, DEMO_SCRIPT, HELP};
use topicbus::EventBus;

/// Command-line interface for topicbus.
#[derive(Debug, Parser)]
#[command(
    name = "topicbus-cli",
    version,
    about = "topicbus CLI: in-process pub/sub demo and shell"
)]
pub struct Cli {
    /// Path to a TOML config file (falls back to $TOPICBUS_CONFIG, then defaults)
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Supported CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the scripted subscribe / publish / unsubscribe walkthrough
    Demo,

    /// Start an interactive shell (default)
    Repl,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    init_logging_with(&config.logging);

    let mut shell = Shell::new(EventBus::with_config(&config.bus));

    match cli.command.unwrap_or(Command::Repl) {
        Command::Demo => run_demo(&mut shell),
        Command::Repl => run_repl(&mut shell)?,
    }

    Ok(())
}

fn run_demo(shell: &mut Shell) {
    for line in DEMO_SCRIPT {
        println!("> {line}");
        if let Some(out) = shell.run_line(line) {
            for l in out {
                println!("  {l}");
            }
        }
    }
}

fn run_repl(shell: &mut Shell) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("{HELP}");

    loop {
        match editor.readline("topicbus> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                match shell.run_line(&line) {
                    Some(out) => out.iter().for_each(|l| println!("{l}")),
                    None => break,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    info!(topics = shell.bus().topics().len(), "Shell closed");
    Ok(())
}
