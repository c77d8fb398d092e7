//! Conversation sessions
//!
//! A `Session` drives one interpreter on behalf of one user: it writes the
//! user's message into the input variable, resolves `get_intent` pauses
//! through the registered classifier, and keeps a transcript of the exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info_span, warn};
use uuid::Uuid;

use crate::classifier::IntentClassifier;
use crate::config::{Config, SessionConfig};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::executor::{
    self, Environment, ExecState, Interpreter, PauseReason, Script, TurnOutcome, TurnStatus, Val,
    GET_INTENT_FN, INTENT_VAR,
};

/* ===================== Transcript ===================== */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/* ===================== Session ===================== */

pub struct Session {
    id: Uuid,
    interpreter: Interpreter,
    classifier: Option<Box<dyn IntentClassifier>>,
    transcript: Vec<TranscriptEntry>,
    config: SessionConfig,
    /// Candidates used when the script never runs an `intents {}` statement
    compared_intents: Vec<String>,
}

impl Session {
    /// Start a session over `script`, seeding the configured initial variables
    pub fn new(script: Arc<Script>, config: &Config) -> Result<Self, RuntimeError> {
        let mut env = Environment::new();
        for (name, value) in &config.session.initial_variables {
            env.set(name, value.as_str());
        }

        let compared_intents = script.compared_intents();
        let interpreter = Interpreter::new(script, env)?
            .with_max_steps(config.interpreter.max_steps_per_turn);

        let id = Uuid::new_v4();
        debug!(session_id = %id, "Session created");

        Ok(Self {
            id,
            interpreter,
            classifier: None,
            transcript: Vec::new(),
            config: config.session.clone(),
            compared_intents,
        })
    }

    /// Install the hook `get_intent` pauses are resolved through
    pub fn register_classifier(&mut self, classifier: impl IntentClassifier + 'static) {
        self.classifier = Some(Box::new(classifier));
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &ExecState {
        self.interpreter.state()
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn get_variable(&self, name: &str) -> Option<&Val> {
        self.interpreter.env().get(name)
    }

    pub fn set_variable(&mut self, name: &str, value: impl Into<Val>) {
        self.interpreter.env_mut().set(name, value);
    }

    /// Run one turn, answering a pending `get_intent` first
    ///
    /// Without a registered classifier a pending `get_intent` fails the turn
    /// with `UnregisteredExternalFunction` and the session stays paused, so
    /// registering one and calling again picks up where it stopped.
    pub fn run_turn(&mut self) -> Result<TurnOutcome, RuntimeError> {
        let _span = info_span!("session", id = %self.id).entered();

        if let Some(input) = self.interpreter.paused_intent_input().map(str::to_string) {
            self.resolve_intent(&input)?;
        }

        let outcome = executor::run_turn(&mut self.interpreter)?;
        for reply in &outcome.replies {
            self.record(Role::Bot, reply);
        }
        Ok(outcome)
    }

    /// Handle one user message
    ///
    /// Writes `input` to the input variable and runs turns until the script
    /// waits for the user again or exits. Replies from every turn are
    /// returned together.
    pub fn respond(&mut self, input: &str) -> Result<TurnOutcome, RuntimeError> {
        self.record(Role::User, input);
        self.interpreter
            .env_mut()
            .set(&self.config.input_variable, input);

        let mut outcome = self.run_turn()?;
        let mut replies = std::mem::take(&mut outcome.replies);
        let mut rounds = 0usize;

        while outcome.status == TurnStatus::Paused(PauseReason::AwaitingIntent) {
            rounds += 1;
            if rounds >= self.interpreter.max_steps() {
                let err = RuntimeError::PossibleInfiniteLoop {
                    limit: self.interpreter.max_steps(),
                };
                warn!(session_id = %self.id, "{}", err);
                return Err(err);
            }
            outcome = self.run_turn()?;
            replies.append(&mut outcome.replies);
        }

        outcome.replies = replies;
        Ok(outcome)
    }

    /// Start the conversation over, keeping the classifier and the id
    pub fn reset(&mut self) -> Result<(), RuntimeError> {
        self.interpreter.reset()?;
        for (name, value) in &self.config.initial_variables {
            self.interpreter.env_mut().set(name, value.as_str());
        }
        self.transcript.clear();
        Ok(())
    }

    fn resolve_intent(&mut self, input_var: &str) -> Result<(), RuntimeError> {
        let Some(classifier) = &self.classifier else {
            warn!("get_intent reached with no classifier registered");
            return Err(RuntimeError::UnregisteredExternalFunction {
                name: GET_INTENT_FN.to_string(),
            });
        };

        let env = self.interpreter.env();
        let input = env.get_or(input_var, Val::from("")).to_string();
        let mut candidates = env.declared_intents();
        if candidates.is_empty() {
            candidates = self.compared_intents.clone();
        }

        let mut intent = classifier.classify(&input, &candidates);
        if !candidates.is_empty()
            && intent != self.config.fallback_intent
            && !candidates.contains(&intent)
        {
            warn!(
                %intent,
                fallback = %self.config.fallback_intent,
                "Classifier answer is not a declared intent"
            );
            intent = self.config.fallback_intent.clone();
        }

        debug!(%input, %intent, "Intent resolved");
        self.interpreter.env_mut().set(INTENT_VAR, intent);
        Ok(())
    }

    fn record(&mut self, role: Role, message: &str) {
        self.transcript.push(TranscriptEntry {
            role,
            message: message.to_string(),
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::KeywordClassifier;
    use crate::interpreter::load;
    use maplit::hashmap;

    const SHOP: &str = r#"
intents {"query_price", "add_to_cart"}
start:
    reply "Welcome"
    get_intent $user_input
    if $intent == "query_price" then goto price
    reply "I don't understand"
    goto start
price:
    reply "The price is 10"
    exit
"#;

    fn session(source: &str) -> Session {
        let script = load(source).expect("Load script failed");
        Session::new(Arc::new(script), &Config::default()).expect("Session setup failed")
    }

    #[test]
    fn test_conversation_reaches_price() {
        let mut session = session(SHOP);
        session.register_classifier(KeywordClassifier::new("other"));

        let first = session.run_turn().unwrap();
        assert_eq!(first.replies, vec!["Welcome"]);
        assert_eq!(first.status, TurnStatus::Paused(PauseReason::AwaitingReply));

        let second = session.respond("what is the query price?").unwrap();
        assert_eq!(second.replies, vec!["The price is 10"]);
        assert_eq!(second.status, TurnStatus::Paused(PauseReason::AwaitingReply));
        assert_eq!(session.get_variable("intent"), Some(&Val::from("query_price")));

        let third = session.respond("bye").unwrap();
        assert!(third.replies.is_empty());
        assert!(third.is_exited());
        assert_eq!(session.state(), &ExecState::Exited);
    }

    #[test]
    fn test_unmatched_message_loops_back() {
        let mut session = session(SHOP);
        session.register_classifier(KeywordClassifier::new("other"));

        session.run_turn().unwrap();
        let outcome = session.respond("hello").unwrap();

        assert_eq!(outcome.replies, vec!["I don't understand"]);
        assert_eq!(session.get_variable("intent"), Some(&Val::from("other")));

        let again = session.respond("still lost").unwrap();
        assert_eq!(again.replies, vec!["Welcome"]);
    }

    #[test]
    fn test_get_intent_without_classifier_fails_and_can_retry() {
        let mut session = session("get_intent $user_input\nreply \"got $intent\"");

        let first = session.run_turn().unwrap();
        assert_eq!(first.status, TurnStatus::Paused(PauseReason::AwaitingIntent));

        assert_eq!(
            session.run_turn(),
            Err(RuntimeError::UnregisteredExternalFunction {
                name: "get_intent".to_string()
            })
        );
        assert_eq!(
            session.state(),
            &ExecState::Paused(PauseReason::AwaitingIntent)
        );

        session.register_classifier(|_: &str, _: &[String]| "greeting".to_string());
        let retried = session.run_turn().unwrap();
        assert_eq!(retried.replies, vec!["got greeting"]);
    }

    #[test]
    fn test_undeclared_answer_replaced_by_fallback() {
        let mut session = session("intents {\"yes\", \"no\"}\nget_intent $user_input\nreply \"$intent\"");
        session.register_classifier(|_: &str, _: &[String]| "maybe".to_string());

        let outcome = session.respond("perhaps").unwrap();
        assert_eq!(outcome.replies, vec!["other"]);
    }

    #[test]
    fn test_classifier_sees_input_and_candidates() {
        let mut session = session("intents {\"yes\", \"no\"}\nget_intent $user_input\nreply \"$intent\"");
        session.register_classifier(|input: &str, candidates: &[String]| {
            format!("{}:{}", input, candidates.join("|"))
        });

        // No declared intent matches, so the fallback wins
        let outcome = session.respond("ok").unwrap();
        assert_eq!(outcome.replies, vec!["other"]);

        let mut open = self::session("get_intent $user_input\nreply \"$intent\"");
        open.register_classifier(|input: &str, candidates: &[String]| {
            format!("{}:{}", input, candidates.len())
        });
        let outcome = open.respond("ok").unwrap();
        assert_eq!(outcome.replies, vec!["ok:0"]);
    }

    #[test]
    fn test_candidates_fall_back_to_if_comparisons() {
        let source = r#"
get_intent $user_input
if $intent == "yes" then goto y
if $intent == "no" then goto n
if $intent == "yes" then goto y
reply "unsure"
exit
y:
reply "great"
exit
n:
reply "pity"
exit
"#;
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);

        let mut session = session(source);
        session.register_classifier(move |input: &str, candidates: &[String]| {
            recorder.lock().unwrap().push(candidates.to_vec());
            KeywordClassifier::new("other").classify(input, candidates)
        });

        let outcome = session.respond("no thanks").unwrap();
        assert_eq!(outcome.replies, vec!["pity"]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![vec!["yes".to_string(), "no".to_string()]]
        );
    }

    #[test]
    fn test_initial_variables_survive_reset() {
        let mut config = Config::default();
        config.session.initial_variables = hashmap! {
            "bot_name".to_string() => "Helper".to_string(),
        };
        let script = load("reply \"I am $bot_name\"\nexit").unwrap();
        let mut session = Session::new(Arc::new(script), &config).unwrap();

        assert_eq!(session.run_turn().unwrap().replies, vec!["I am Helper"]);
        session.set_variable("bot_name", "Other");
        session.respond("hi").unwrap();
        assert_eq!(session.transcript().len(), 2);

        session.reset().unwrap();
        assert!(session.transcript().is_empty());
        assert_eq!(session.get_variable("bot_name"), Some(&Val::from("Helper")));
        assert_eq!(session.run_turn().unwrap().replies, vec!["I am Helper"]);
    }

    #[test]
    fn test_transcript_records_both_sides() {
        let mut session = session(SHOP);
        session.register_classifier(KeywordClassifier::new("other"));

        session.run_turn().unwrap();
        session.respond("query price").unwrap();

        let roles: Vec<Role> = session.transcript().iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::Bot, Role::User, Role::Bot]);
        assert_eq!(session.transcript()[1].message, "query price");
    }

    #[test]
    fn test_sessions_are_independent() {
        let script = Arc::new(load("set $x = \"1\"\nreply \"$x\"").unwrap());
        let mut a = Session::new(Arc::clone(&script), &Config::default()).unwrap();
        let b = Session::new(script, &Config::default()).unwrap();

        a.run_turn().unwrap();
        assert_eq!(a.get_variable("x"), Some(&Val::from("1")));
        assert_eq!(b.get_variable("x"), None);
        assert_ne!(a.id(), b.id());
    }
}
