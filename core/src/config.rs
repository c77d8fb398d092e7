//! Configuration loading
//!
//! Layers, lowest priority first:
//! 1. Built-in defaults
//! 2. TOML file (`chatflow.toml` in the working directory, or an explicit path)
//! 3. Environment variables prefixed `CHATFLOW__` (e.g. `CHATFLOW__INTERPRETER__MAX_STEPS_PER_TURN`)
//! 4. Builder overrides

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::interpreter::executor::DEFAULT_MAX_STEPS_PER_TURN;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "chatflow.toml";

/// Environment variable naming a config file
pub const CONFIG_PATH_ENV: &str = "CHATFLOW_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub interpreter: InterpreterConfig,
    pub session: SessionConfig,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterpreterConfig {
    /// Steps one turn may take before it is aborted as a likely infinite loop
    pub max_steps_per_turn: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Variable `Session::respond` writes the user's message to
    pub input_variable: String,
    /// Answer used when the classifier picks nothing from the candidates
    pub fallback_intent: String,
    /// Message a driver shows when a turn fails
    pub fallback_reply: String,
    /// Variables seeded into every new or reset session
    #[serde(default)]
    pub initial_variables: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interpreter: InterpreterConfig {
                max_steps_per_turn: DEFAULT_MAX_STEPS_PER_TURN,
            },
            session: SessionConfig {
                input_variable: "user_input".to_string(),
                fallback_intent: "other".to_string(),
                fallback_reply: "Sorry, something went wrong. Please try again.".to_string(),
                initial_variables: HashMap::new(),
            },
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load with default search and no overrides
    pub fn load() -> Result<Self> {
        Self::builder().build()
    }
}

/* ===================== Builder ===================== */

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    max_steps_per_turn: Option<usize>,
    fallback_intent: Option<String>,
}

impl ConfigBuilder {
    /// Config file to read (overrides `CHATFLOW_CONFIG_PATH` and the default search)
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn max_steps_per_turn(mut self, steps: Option<usize>) -> Self {
        self.max_steps_per_turn = steps;
        self
    }

    pub fn fallback_intent(mut self, intent: Option<String>) -> Self {
        self.fallback_intent = intent;
        self
    }

    pub fn build(self) -> Result<Config> {
        let defaults = Config::default();

        let mut builder = ::config::Config::builder()
            .set_default(
                "interpreter.max_steps_per_turn",
                defaults.interpreter.max_steps_per_turn as u64,
            )?
            .set_default("session.input_variable", defaults.session.input_variable)?
            .set_default("session.fallback_intent", defaults.session.fallback_intent)?
            .set_default("session.fallback_reply", defaults.session.fallback_reply)?
            .set_default("log_level", defaults.log_level)?;

        let explicit = self
            .config_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        builder = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                builder.add_source(::config::File::from(path))
            }
            None => builder.add_source(::config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        builder = builder.add_source(
            ::config::Environment::with_prefix("CHATFLOW")
                .prefix_separator("__")
                .separator("__"),
        );

        if let Some(steps) = self.max_steps_per_turn {
            builder = builder.set_override("interpreter.max_steps_per_turn", steps as u64)?;
        }
        if let Some(intent) = self.fallback_intent {
            builder = builder.set_override("session.fallback_intent", intent)?;
        }

        let config: Config = builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        if config.interpreter.max_steps_per_turn == 0 {
            bail!("interpreter.max_steps_per_turn must be at least 1");
        }

        Ok(config)
    }
}
