//! Intent classification hook
//!
//! A `get_intent` statement pauses the interpreter; the session driver then
//! asks a classifier to pick an intent for the user's message and writes the
//! answer to `$intent` before resuming.

/// Maps a user message to one of the candidate intents
///
/// Implementations should return one of `candidates`, or the session's
/// fallback intent when none fits. Anything else is replaced by the fallback.
pub trait IntentClassifier {
    fn classify(&self, input: &str, candidates: &[String]) -> String;
}

impl<F> IntentClassifier for F
where
    F: Fn(&str, &[String]) -> String,
{
    fn classify(&self, input: &str, candidates: &[String]) -> String {
        self(input, candidates)
    }
}

/// Picks the first candidate whose name appears in the message
///
/// Matching is case-insensitive and treats `_` in an intent name as a space,
/// so `query_price` matches "what is the query price". Used by the CLI when no
/// real model is wired in.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    fallback: String,
}

impl KeywordClassifier {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, input: &str, candidates: &[String]) -> String {
        let input = input.to_lowercase();
        candidates
            .iter()
            .find(|candidate| {
                let candidate = candidate.to_lowercase();
                !candidate.is_empty()
                    && (input.contains(&candidate) || input.contains(&candidate.replace('_', " ")))
            })
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
