//! Execution environment
//!
//! All mutable state of a run: variables, the label table, the program
//! counter, the exit flag and a one-slot output buffer. One environment
//! belongs to one conversation and is reset between conversations rather
//! than replaced.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::Val;
use super::DECLARED_INTENTS_VAR;
use crate::interpreter::errors::RuntimeError;

/// Entry in the label table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum LabelSlot {
    /// Named in `labels {}` but not located yet
    Declared,
    /// Statement index of the definition
    Located(usize),
}

/// Result of looking a label up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelResolution {
    Located(usize),
    DeclaredUnlocated,
    Undeclared,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    variables: HashMap<String, Val>,
    labels: HashMap<String, LabelSlot>,
    pc: usize,
    exit_requested: bool,
    pending_output: Option<String>,
}

/// Strip the `$` sigil so `$name` and `name` address the same variable
fn normalize(name: &str) -> &str {
    name.strip_prefix('$').unwrap_or(name)
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /* ===================== Variables ===================== */

    pub fn get(&self, name: &str) -> Option<&Val> {
        self.variables.get(normalize(name))
    }

    /// Value of `name`, or `default` when it was never set
    pub fn get_or(&self, name: &str, default: Val) -> Val {
        self.get(name).cloned().unwrap_or(default)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Val>) {
        self.variables.insert(normalize(name).to_string(), value.into());
    }

    pub fn variables(&self) -> &HashMap<String, Val> {
        &self.variables
    }

    pub fn set_declared_intents(&mut self, names: Vec<String>) {
        self.variables
            .insert(DECLARED_INTENTS_VAR.to_string(), Val::Intents(names));
    }

    /// Intent universe from the last `intents {}` statement (empty if none ran)
    pub fn declared_intents(&self) -> Vec<String> {
        match self.variables.get(DECLARED_INTENTS_VAR) {
            Some(Val::Intents(names)) => names.clone(),
            _ => Vec::new(),
        }
    }

    /* ===================== Labels ===================== */

    /// Mark a label as declared; a located label keeps its position
    pub fn declare_label(&mut self, name: &str) {
        self.labels
            .entry(name.to_string())
            .or_insert(LabelSlot::Declared);
    }

    /// Record where a label is defined
    ///
    /// Redefining at the same index is a no-op; a different index is an error.
    pub fn define_label(&mut self, name: &str, index: usize) -> Result<(), RuntimeError> {
        match self.labels.get(name) {
            Some(LabelSlot::Located(first)) if *first != index => {
                Err(RuntimeError::AmbiguousLabel {
                    name: name.to_string(),
                    first: *first,
                    second: index,
                })
            }
            _ => {
                self.labels.insert(name.to_string(), LabelSlot::Located(index));
                Ok(())
            }
        }
    }

    pub fn resolve_label(&self, name: &str) -> LabelResolution {
        match self.labels.get(name) {
            Some(LabelSlot::Located(index)) => LabelResolution::Located(*index),
            Some(LabelSlot::Declared) => LabelResolution::DeclaredUnlocated,
            None => LabelResolution::Undeclared,
        }
    }

    /* ===================== Control ===================== */

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn advance_to(&mut self, index: usize) {
        self.pc = index;
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn is_exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Overwrites anything not yet taken
    pub fn set_pending_output(&mut self, line: String) {
        self.pending_output = Some(line);
    }

    pub fn take_pending_output(&mut self) -> Option<String> {
        self.pending_output.take()
    }

    /// Clear variables, labels, counter and flags in place
    pub fn reset(&mut self) {
        self.variables.clear();
        self.labels.clear();
        self.pc = 0;
        self.exit_requested = false;
        self.pending_output = None;
    }
}
