//! Label prescan and jump resolution
//!
//! The prescan locates every label before the first statement runs, so a
//! jump only ever needs one table lookup.

use tracing::debug;

use super::environment::{Environment, LabelResolution};
use super::types::{Script, Stmt};
use crate::interpreter::errors::RuntimeError;

/// Define every `Label` at its index, then declare `labels {}` names that
/// have no definition
pub fn prescan(env: &mut Environment, script: &Script) -> Result<(), RuntimeError> {
    for (index, stmt) in script.statements.iter().enumerate() {
        if let Stmt::Label { name } = stmt {
            debug!(label = %name, index, "Label located");
            env.define_label(name, index)?;
        }
    }

    for stmt in &script.statements {
        if let Stmt::LabelDecl { names } = stmt {
            for name in names {
                env.declare_label(name);
            }
        }
    }

    Ok(())
}

/// Statement index a jump to `target` lands on
///
/// Landing on the label definition itself skips to the statement after it.
pub fn resolve_jump(env: &Environment, script: &Script, target: &str) -> Result<usize, RuntimeError> {
    match env.resolve_label(target) {
        LabelResolution::Located(index) => {
            debug_assert!(index < script.len(), "label table points past the script");
            match script.get(index) {
                Some(Stmt::Label { .. }) => Ok(index + 1),
                _ => Ok(index),
            }
        }
        LabelResolution::DeclaredUnlocated => Err(RuntimeError::UnlocatedLabel {
            name: target.to_string(),
        }),
        LabelResolution::Undeclared => Err(RuntimeError::UndefinedLabel {
            name: target.to_string(),
        }),
    }
}
