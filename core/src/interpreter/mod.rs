pub mod errors;
pub mod executor;
pub mod lexer;
pub mod parser;

pub use errors::{LexError, LoadError, ParseError, RuntimeError};
pub use executor::{
    new_session, run_turn, step, Environment, ExecState, Interpreter, PauseReason, Script, Stmt,
    TurnOutcome, TurnStatus, Val,
};
pub use parser::semantic_validator::{validate_script, ValidationError};

use tracing::debug;

/// Tokenize and parse script text
///
/// Deterministic: the same text always yields an identical script.
pub fn load(source: &str) -> Result<Script, LoadError> {
    let tokens = lexer::tokenize(source)?;
    debug!(tokens = tokens.len(), "Tokenized script");
    let script = parser::parse(tokens)?;
    debug!(statements = script.len(), "Parsed script");
    Ok(script)
}
