pub mod classifier;
pub mod cli;
pub mod config;
pub mod interpreter;
pub mod session;

// Re-export main types
pub use classifier::{IntentClassifier, KeywordClassifier};
pub use config::Config;
pub use interpreter::{load, ExecState, Interpreter, PauseReason, RuntimeError, Script, TurnOutcome, TurnStatus};
pub use session::{Role, Session, TranscriptEntry};
