//! Interpreter state
//!
//! The interpreter holds everything needed to drive a script one turn at a
//! time: the shared script, the environment it owns, and the execution state.
//! The program counter plus the variables is the complete resumable state;
//! there is no call stack.

use std::sync::Arc;

use tracing::info;

use super::environment::Environment;
use super::labels;
use super::types::{ExecState, PauseReason, Script, Stmt};
use crate::interpreter::errors::RuntimeError;

/// Step cap per turn unless configured otherwise
pub const DEFAULT_MAX_STEPS_PER_TURN: usize = 1000;

/* ===================== Interpreter ===================== */

#[derive(Debug, Clone)]
pub struct Interpreter {
    pub(super) script: Arc<Script>,
    pub(super) env: Environment,
    pub(super) state: ExecState,
    pub(super) max_steps: usize,
}

impl Interpreter {
    /// Create an interpreter over `script` using `env` for its state
    ///
    /// Variables already in `env` are kept. Labels are prescanned here, so a
    /// script that defines one label at two positions is rejected up front.
    pub fn new(script: Arc<Script>, env: Environment) -> Result<Self, RuntimeError> {
        let mut vm = Interpreter {
            script,
            env,
            state: ExecState::Running,
            max_steps: DEFAULT_MAX_STEPS_PER_TURN,
        };
        labels::prescan(&mut vm.env, &vm.script)?;
        Ok(vm)
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn state(&self) -> &ExecState {
        &self.state
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Input variable of the `get_intent` the interpreter is paused on
    pub fn paused_intent_input(&self) -> Option<&str> {
        if self.state != ExecState::Paused(PauseReason::AwaitingIntent) {
            return None;
        }
        match self.script.get(self.env.pc()) {
            Some(Stmt::GetIntent { input }) => Some(input),
            _ => None,
        }
    }

    /// Start the script over with a cleared environment
    pub fn reset(&mut self) -> Result<(), RuntimeError> {
        info!("Resetting interpreter");
        self.env.reset();
        self.state = ExecState::Running;
        labels::prescan(&mut self.env, &self.script)
    }
}

/// Fresh interpreter with an empty environment
pub fn new_session(script: Arc<Script>) -> Result<Interpreter, RuntimeError> {
    Interpreter::new(script, Environment::new())
}
