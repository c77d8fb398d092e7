//! Abstract Syntax Tree node types

use serde::{Deserialize, Serialize};

use crate::interpreter::executor::INTENT_VAR;

/// Statement AST node
///
/// A script is flat: every statement sits at one index and that index is the
/// jump address for labels defined there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Stmt {
    /// `labels {a, b}` - names forward-declared before any label is scanned
    LabelDecl { names: Vec<String> },
    /// `name:`
    Label { name: String },
    /// `reply "Hi $name"`
    Reply { template: String },
    /// `set $name = "value"` or `set $name = $other`
    Set { name: String, value: SetValue },
    /// `get_intent $user_input`
    GetIntent { input: String },
    /// `if $name == "literal" then goto target`
    If {
        name: String,
        expected: String,
        target: String,
    },
    /// `goto target`
    Goto { target: String },
    Exit,
    /// `intents {"a", "b"}`
    Intents { names: Vec<String> },
    /// `pause_for_user_input`
    PauseForInput,
}

/// Right-hand side of a `set`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum SetValue {
    Literal(String),
    Variable(String),
}

/// A parsed script
///
/// Immutable once built. `lines[i]` is the source line of `statements[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Script {
    pub statements: Vec<Stmt>,
    pub lines: Vec<usize>,
}

impl Script {
    pub fn get(&self, index: usize) -> Option<&Stmt> {
        self.statements.get(index)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn line_of(&self, index: usize) -> Option<usize> {
        self.lines.get(index).copied()
    }

    /// Literals `$intent` is compared against, in script order, without repeats
    pub fn compared_intents(&self) -> Vec<String> {
        let mut intents: Vec<String> = Vec::new();
        for stmt in &self.statements {
            if let Stmt::If { name, expected, .. } = stmt {
                if name == INTENT_VAR && !intents.contains(expected) {
                    intents.push(expected.clone());
                }
            }
        }
        intents
    }
}
