//! Semantic validation for parsed scripts
//!
//! Checks that the grammar cannot express: jump targets that will never
//! resolve, labels defined twice, and intent comparisons that can never
//! match. Loading never runs these checks; `chatflow check` does.

use std::collections::{HashMap, HashSet};

use crate::interpreter::executor::types::{Script, Stmt};
use crate::interpreter::executor::INTENT_VAR;

/* ===================== Error Types ===================== */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `goto`/`if` target that is neither declared nor defined
    UndefinedLabel { name: String, line: usize },
    /// Label defined at more than one position
    DuplicateLabel {
        name: String,
        first_line: usize,
        second_line: usize,
    },
    /// Listed in `labels {}` but never defined; jumping there fails at run time
    DeclaredButNotDefined { name: String },
    /// `if $intent == "x"` where `x` is missing from a declared `intents {}` list
    UnknownIntent { intent: String, line: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::UndefinedLabel { name, line } => {
                write!(f, "line {}: jump to undefined label '{}'", line, name)
            }
            ValidationError::DuplicateLabel {
                name,
                first_line,
                second_line,
            } => write!(
                f,
                "line {}: label '{}' already defined on line {}",
                second_line, name, first_line
            ),
            ValidationError::DeclaredButNotDefined { name } => {
                write!(f, "label '{}' is declared but never defined", name)
            }
            ValidationError::UnknownIntent { intent, line } => {
                write!(f, "line {}: intent '{}' is not in the declared intents", line, intent)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/* ===================== Public API ===================== */

/// Validate a script, returning every problem found (empty when clean)
pub fn validate_script(script: &Script) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut defined: HashMap<&str, usize> = HashMap::new();
    let mut declared: Vec<&str> = Vec::new();
    let mut intents: Option<HashSet<&str>> = None;

    for (index, stmt) in script.statements.iter().enumerate() {
        let line = script.line_of(index).unwrap_or(0);
        match stmt {
            Stmt::Label { name } => {
                if let Some(&first_line) = defined.get(name.as_str()) {
                    errors.push(ValidationError::DuplicateLabel {
                        name: name.clone(),
                        first_line,
                        second_line: line,
                    });
                } else {
                    defined.insert(name, line);
                }
            }
            Stmt::LabelDecl { names } => declared.extend(names.iter().map(String::as_str)),
            Stmt::Intents { names } => {
                intents
                    .get_or_insert_with(HashSet::new)
                    .extend(names.iter().map(String::as_str));
            }
            _ => {}
        }
    }

    for (index, stmt) in script.statements.iter().enumerate() {
        let line = script.line_of(index).unwrap_or(0);
        let target = match stmt {
            Stmt::Goto { target } => target,
            Stmt::If {
                name,
                expected,
                target,
            } => {
                if let Some(intents) = &intents {
                    if name == INTENT_VAR && !intents.contains(expected.as_str()) {
                        errors.push(ValidationError::UnknownIntent {
                            intent: expected.clone(),
                            line,
                        });
                    }
                }
                target
            }
            _ => continue,
        };

        if !defined.contains_key(target.as_str()) && !declared.contains(&target.as_str()) {
            errors.push(ValidationError::UndefinedLabel {
                name: target.clone(),
                line,
            });
        }
    }

    for name in declared {
        if !defined.contains_key(name) {
            errors.push(ValidationError::DeclaredButNotDefined {
                name: name.to_string(),
            });
        }
    }

    errors
}
