//! Core execution loop
//!
//! This module contains the step() function - the heart of the interpreter.
//!
//! ## Function Organization
//! 1. run_turn() - Top-level driver (resumes, then calls step repeatedly)
//! 2. step() - Executes the statement at the program counter

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::statements::{execute_statement, Flow};
use super::types::{ExecState, Step, TurnOutcome, TurnStatus};
use super::vm::Interpreter;
use crate::interpreter::errors::RuntimeError;

/* ===================== Public API ===================== */

/// Run one turn: from the current program counter until a pause, the end of
/// the script, `exit`, or an error
///
/// A paused interpreter first moves past the statement it paused on. A failed
/// one retries the statement it failed on. An exited one stays exited and
/// produces nothing.
///
/// Errors leave the environment as the failing statement found it; earlier
/// effects of the turn are not rolled back.
pub fn run_turn(vm: &mut Interpreter) -> Result<TurnOutcome, RuntimeError> {
    match vm.state {
        ExecState::Exited => {
            return Ok(TurnOutcome {
                replies: Vec::new(),
                status: TurnStatus::Exited,
            })
        }
        ExecState::Paused(reason) => {
            let pc = vm.env.pc();
            debug!(?reason, pc, "Resuming");
            vm.env.advance_to(pc + 1);
        }
        ExecState::Running | ExecState::Failed(_) => {}
    }
    vm.state = ExecState::Running;

    let mut replies = Vec::new();
    let mut executed = 0usize;

    loop {
        let result = step(vm);
        executed += 1;

        if let Some(line) = vm.env.take_pending_output() {
            replies.push(line);
        }

        match result {
            Ok(Step::Continue) => {
                if executed >= vm.max_steps {
                    let err = RuntimeError::PossibleInfiniteLoop {
                        limit: vm.max_steps,
                    };
                    warn!(pc = vm.env.pc(), "{}", err);
                    vm.state = ExecState::Failed(err.clone());
                    return Err(err);
                }
            }
            Ok(Step::Paused(reason)) => {
                info!(?reason, pc = vm.env.pc(), "Paused");
                vm.state = ExecState::Paused(reason);
                return Ok(TurnOutcome {
                    replies,
                    status: TurnStatus::Paused(reason),
                });
            }
            Ok(Step::Done) => {
                info!(pc = vm.env.pc(), "Exited");
                vm.state = ExecState::Exited;
                return Ok(TurnOutcome {
                    replies,
                    status: TurnStatus::Exited,
                });
            }
            Err(err) => {
                warn!(pc = vm.env.pc(), "Turn failed: {}", err);
                vm.state = ExecState::Failed(err.clone());
                return Err(err);
            }
        }
    }
}

/// Execute one statement
///
/// Produces at most one output line (left in the environment's pending
/// slot) and then either moves the program counter (next statement or jump
/// target) or pauses without moving it.
pub fn step(vm: &mut Interpreter) -> Result<Step, RuntimeError> {
    if vm.env.is_exit_requested() {
        return Ok(Step::Done);
    }

    let pc = vm.env.pc();
    let script = Arc::clone(&vm.script);
    let Some(stmt) = script.get(pc) else {
        // Ran off the end
        return Ok(Step::Done);
    };

    debug!(pc, line = script.line_of(pc), ?stmt, "Executing");

    match execute_statement(&mut vm.env, &script, stmt)? {
        Flow::Next => {
            vm.env.advance_to(pc + 1);
            Ok(Step::Continue)
        }
        Flow::Jump(target) => {
            debug!(from = pc, to = target, "Jump");
            vm.env.advance_to(target);
            Ok(Step::Continue)
        }
        Flow::Pause(reason) => Ok(Step::Paused(reason)),
        Flow::Exit => Ok(Step::Done),
    }
}
