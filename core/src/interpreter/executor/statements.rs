//! Statement execution handlers
//!
//! Each handler applies one statement's effect to the environment and tells
//! the loop how the program counter should move.

use super::environment::Environment;
use super::interpolate::interpolate;
use super::labels::resolve_jump;
use super::types::{PauseReason, Script, SetValue, Stmt, Val};
use crate::interpreter::errors::RuntimeError;

/// Where control goes after a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Next,
    Jump(usize),
    /// Stay on this statement until resumed
    Pause(PauseReason),
    Exit,
}

/* ===================== Statement Handlers ===================== */

pub fn execute_statement(
    env: &mut Environment,
    script: &Script,
    stmt: &Stmt,
) -> Result<Flow, RuntimeError> {
    match stmt {
        Stmt::LabelDecl { names } => {
            for name in names {
                env.declare_label(name);
            }
            Ok(Flow::Next)
        }

        Stmt::Intents { names } => {
            env.set_declared_intents(names.clone());
            Ok(Flow::Next)
        }

        Stmt::Label { .. } => Ok(Flow::Next),

        Stmt::Reply { template } => {
            let line = interpolate(template, env);
            env.set_pending_output(line);
            Ok(Flow::Pause(PauseReason::AwaitingReply))
        }

        Stmt::Set { name, value } => execute_set(env, name, value),

        // The classifier runs outside the interpreter; see `Session::run_turn`
        Stmt::GetIntent { .. } => Ok(Flow::Pause(PauseReason::AwaitingIntent)),

        Stmt::If {
            name,
            expected,
            target,
        } => execute_if(env, script, name, expected, target),

        Stmt::Goto { target } => Ok(Flow::Jump(resolve_jump(env, script, target)?)),

        Stmt::Exit => {
            env.request_exit();
            Ok(Flow::Exit)
        }

        Stmt::PauseForInput => Ok(Flow::Pause(PauseReason::AwaitingReply)),
    }
}

fn execute_set(env: &mut Environment, name: &str, value: &SetValue) -> Result<Flow, RuntimeError> {
    let resolved = match value {
        SetValue::Literal(s) => Val::Str(s.clone()),
        SetValue::Variable(source) => {
            env.get(source)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedVariable {
                    name: source.clone(),
                })?
        }
    };
    env.set(name, resolved);
    Ok(Flow::Next)
}

/// Exact string equality; an unset variable compares as ""
fn execute_if(
    env: &Environment,
    script: &Script,
    name: &str,
    expected: &str,
    target: &str,
) -> Result<Flow, RuntimeError> {
    let actual = env.get_or(name, Val::Str(String::new())).to_string();
    if actual == expected {
        Ok(Flow::Jump(resolve_jump(env, script, target)?))
    } else {
        Ok(Flow::Next)
    }
}
