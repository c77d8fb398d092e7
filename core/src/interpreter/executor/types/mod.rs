//! Type definitions for the executor
//!
//! This module contains all the core types used by the executor:
//! - AST nodes (Stmt, Script)
//! - Runtime values (Val)
//! - Execution state (ExecState, PauseReason, Step, TurnOutcome)

pub mod ast;
pub mod control;
pub mod values;

// Re-export all types for convenient access
pub use ast::{Script, SetValue, Stmt};
pub use control::{ExecState, PauseReason, Step, TurnOutcome, TurnStatus};
pub use values::Val;
