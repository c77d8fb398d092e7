//! Execution state and step results

use serde::{Deserialize, Serialize};

use crate::interpreter::errors::RuntimeError;

/// Why a turn stopped before the script ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauseReason {
    /// A `reply` (or `pause_for_user_input`) is waiting for the user's next message
    AwaitingReply,
    /// A `get_intent` is waiting for the classifier's answer in `$intent`
    AwaitingIntent,
}

/// Interpreter state
///
/// The single source of truth for where a run stands. Only `step` and
/// `run_turn` change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecState {
    Running,
    Paused(PauseReason),
    Exited,
    Failed(RuntimeError),
}

/// Result of executing one statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Program counter moved (next statement or jump target)
    Continue,
    /// Program counter left on the pausing statement
    Paused(PauseReason),
    /// Script ended or `exit` ran
    Done,
}

/// How a completed turn left the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStatus {
    Paused(PauseReason),
    Exited,
}

/// Everything a caller gets back from one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Output lines in emission order
    pub replies: Vec<String>,
    pub status: TurnStatus,
}

impl TurnOutcome {
    pub fn is_exited(&self) -> bool {
        self.status == TurnStatus::Exited
    }
}
