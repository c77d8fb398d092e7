use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::classifier::KeywordClassifier;
use crate::config::Config;
use crate::interpreter::{load, validate_script, Script};
use crate::session::Session;

#[derive(Parser)]
#[command(name = "chatflow")]
#[command(about = "Chatflow - run and check line-oriented chat scripts", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Step cap per turn (overrides config file and env vars)
    #[arg(long, global = true)]
    pub max_steps: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Hold a conversation with a script on stdin/stdout
    Run {
        /// Script file to run
        script: PathBuf,
    },

    /// Load and validate a script, then print its statements
    Check {
        /// Script file to check
        script: PathBuf,

        /// Print the parsed script as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Layered configuration with this invocation's overrides applied
    pub fn load_config(&self) -> Result<Config> {
        Config::builder()
            .config_path(self.config.clone())
            .max_steps_per_turn(self.max_steps)
            .build()
    }
}

/// Dispatch a parsed command against an already loaded configuration
pub fn run_cli_with_args(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Commands::Run { script } => {
            let script = read_script(&script)?;
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_conversation(script, config, stdin.lock(), stdout.lock())?;
        }

        Commands::Check { script, json } => {
            let path = script;
            let script = read_script(&path)?;
            let problems = validate_script(&script);

            if json {
                println!("{}", serde_json::to_string_pretty(&script)?);
            } else {
                println!("{}: {} statement(s)", path.display(), script.len());
                for (index, stmt) in script.statements.iter().enumerate() {
                    let line = script.line_of(index).unwrap_or(0);
                    println!("  {:>4} | {:>3} | {:?}", line, index, stmt);
                }
            }

            if problems.is_empty() {
                eprintln!("✓ No problems found");
            } else {
                for problem in &problems {
                    eprintln!("✗ {}", problem);
                }
                anyhow::bail!("{} problem(s) found in {}", problems.len(), path.display());
            }
        }
    }

    Ok(())
}

fn read_script(path: &Path) -> Result<Script> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    load(&source).with_context(|| format!("Failed to load script {}", path.display()))
}

/// Drive one conversation until the script exits or input runs out
///
/// Each line read from `input` is one user message. Failed turns print the
/// configured fallback reply and the conversation carries on.
pub fn run_conversation<R: BufRead, W: Write>(
    script: Script,
    config: &Config,
    input: R,
    mut output: W,
) -> Result<()> {
    let mut session = Session::new(Arc::new(script), config)?;
    session.register_classifier(KeywordClassifier::new(
        config.session.fallback_intent.clone(),
    ));

    let mut exited = match session.run_turn() {
        Ok(outcome) => {
            for reply in &outcome.replies {
                writeln!(output, "{}", reply)?;
            }
            outcome.is_exited()
        }
        Err(err) => {
            tracing::error!("Turn failed: {}", err);
            writeln!(output, "{}", config.session.fallback_reply)?;
            false
        }
    };

    let mut lines = input.lines();
    while !exited {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match session.respond(line.trim()) {
            Ok(outcome) => {
                for reply in &outcome.replies {
                    writeln!(output, "{}", reply)?;
                }
                exited = outcome.is_exited();
            }
            Err(err) => {
                tracing::error!("Turn failed: {}", err);
                writeln!(output, "{}", config.session.fallback_reply)?;
            }
        }
    }

    output.flush()?;
    Ok(())
}
