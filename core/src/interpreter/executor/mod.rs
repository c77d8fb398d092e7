//! # Executor - Turn-Driven Resumable Interpreter
//!
//! ## Core Principles
//!
//! 1. **Flat program**: a script is a list of statements; the index is the jump address
//! 2. **Explicit state**: `ExecState` is the only record of running/paused/exited/failed
//! 3. **Caller-driven suspension**: `reply` and `get_intent` pause and return;
//!    nothing blocks, nothing is scheduled
//! 4. **Pure executor**: no I/O - classification happens in the driver between turns

pub mod environment;
pub mod exec_loop;
pub mod interpolate;
pub mod labels;
pub mod statements;
pub mod types;
pub mod vm;

#[cfg(test)]
mod tests;

/// Variable a `get_intent` answer is written to
pub const INTENT_VAR: &str = "intent";

/// Reserved variable holding the `intents {}` list
pub const DECLARED_INTENTS_VAR: &str = "intents";

/// Name of the external classification function
pub const GET_INTENT_FN: &str = "get_intent";

// Re-export commonly used items
pub use environment::{Environment, LabelResolution};
pub use exec_loop::{run_turn, step};
pub use types::{ExecState, PauseReason, Script, SetValue, Step, Stmt, TurnOutcome, TurnStatus, Val};
pub use vm::{new_session, Interpreter, DEFAULT_MAX_STEPS_PER_TURN};
