//! Error types for loading and running scripts
//!
//! Load-time errors (`LexError`, `ParseError`) keep a script from ever being
//! built. `RuntimeError` is fatal to the current turn only; the environment
//! keeps whatever state the turn reached before failing.

use thiserror::Error;

use super::lexer::TokenKind;

/* ===================== Load Errors ===================== */

/// The tokenizer hit a character no token pattern accepts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at line {line}, column {column}")]
    UnexpectedChar { ch: char, line: usize, column: usize },

    /// A `"` with no closing quote before the end of its line
    #[error("unterminated string literal at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },
}

/// What the parser wanted to see at the failing position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    OneOf(Vec<TokenKind>),
    Statement,
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::OneOf(kinds) => {
                let names: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
                write!(f, "{}", names.join(" or "))
            }
            Expected::Statement => write!(f, "a statement"),
        }
    }
}

/// Expected-vs-found token mismatch. The parser stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error on line {line}, column {column}: expected {expected}, found {found}")]
pub struct ParseError {
    pub expected: Expected,
    pub found: TokenKind,
    pub line: usize,
    pub column: usize,
}

/// Anything that keeps `load` from producing a script
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/* ===================== Runtime Errors ===================== */

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Jump to a name that was never declared or defined
    #[error("undefined label '{name}'")]
    UndefinedLabel { name: String },

    /// Jump to a name from `labels {}` that has no definition in the script
    #[error("label '{name}' is declared but never defined")]
    UnlocatedLabel { name: String },

    /// Same label defined at two different positions
    #[error("label '{name}' is defined at statement {first} and again at statement {second}")]
    AmbiguousLabel {
        name: String,
        first: usize,
        second: usize,
    },

    /// `set` dereferenced a variable that was never set
    #[error("undefined variable '${name}'")]
    UndefinedVariable { name: String },

    /// An `AwaitingIntent` pause was resumed with no classification hook registered
    #[error("external function '{name}' is not registered")]
    UnregisteredExternalFunction { name: String },

    #[error("possible infinite loop: turn exceeded {limit} steps")]
    PossibleInfiniteLoop { limit: usize },
}
