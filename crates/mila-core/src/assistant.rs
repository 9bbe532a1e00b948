//! Dialogue policy around the knowledge base: wake phrases, farewells,
//! fallback answers.

use crate::knowledge::KnowledgeBase;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Answer returned when no stored question clears the match threshold.
pub const FALLBACK_ANSWER: &str = "I'm not sure about that. Could you tell me more?";

pub const GREETING_RESPONSES: [&str; 3] = [
    "Hello! How can I assist you today?",
    "Hi there! What can I do for you?",
    "Greetings! How may I help you?",
];

/// A query containing any of these is a farewell, not a knowledge lookup.
pub const FAREWELL_PHRASES: [&str; 4] = ["goodbye", "bye", "see you", "good night"];

pub const FAREWELL_RESPONSES: [&str; 3] = [
    "Goodbye! Talk to you soon.",
    "See you later!",
    "Bye! Have a great day.",
];

/// The assistant's reply to one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub answer: String,
    /// The stored question the answer came from, when one matched.
    pub matched_question: Option<String>,
    pub farewell: bool,
}

/// Wake-phrase gating and reply selection. Responses from the fixed pools
/// rotate instead of being drawn at random, so behavior is reproducible.
pub struct Assistant {
    wake_phrases: Vec<String>,
    rotation: AtomicUsize,
}

impl Assistant {
    pub fn new(wake_phrases: impl IntoIterator<Item = String>) -> Self {
        let mut phrases: Vec<String> = wake_phrases
            .into_iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        // Longest first, so compound phrases strip whole rather than word by word.
        phrases.sort_by(|a, b| b.len().cmp(&a.len()));
        Self {
            wake_phrases: phrases,
            rotation: AtomicUsize::new(0),
        }
    }

    /// Extracts the query from a spoken text: requires some wake phrase to be
    /// present, removes every occurrence of each phrase, and tidies
    /// whitespace. `None` means the text was not addressed to the assistant.
    pub fn strip_wake_phrase(&self, text: &str) -> Option<String> {
        let lowered = text.to_lowercase();
        if !self
            .wake_phrases
            .iter()
            .any(|p| lowered.contains(p.as_str()))
        {
            return None;
        }
        let mut rest = lowered;
        for phrase in &self.wake_phrases {
            rest = rest.replace(phrase.as_str(), "");
        }
        Some(rest.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// Literal substring membership against [`FAREWELL_PHRASES`].
    pub fn is_farewell(query: &str) -> bool {
        FAREWELL_PHRASES.iter().any(|p| query.contains(p))
    }

    /// Next greeting from the rotating pool.
    pub fn greeting(&self) -> &'static str {
        self.pick(&GREETING_RESPONSES)
    }

    /// Answers a (wake-phrase-free) query: farewell check first, then the
    /// fuzzy match, then the fixed fallback.
    pub fn respond(&self, query: &str, knowledge: &KnowledgeBase) -> Reply {
        let query = query.trim().to_lowercase();
        if Self::is_farewell(&query) {
            return Reply {
                answer: self.pick(&FAREWELL_RESPONSES).to_string(),
                matched_question: None,
                farewell: true,
            };
        }
        match knowledge.best_match(&query) {
            Some((question, answer)) => Reply {
                answer: answer.to_string(),
                matched_question: Some(question.to_string()),
                farewell: false,
            },
            None => Reply {
                answer: FALLBACK_ANSWER.to_string(),
                matched_question: None,
                farewell: false,
            },
        }
    }

    fn pick<'a>(&self, pool: &[&'a str]) -> &'a str {
        pool[self.rotation.fetch_add(1, Ordering::Relaxed) % pool.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn assistant() -> Assistant {
        Assistant::new(
            ["hey mila", "okay mila", "mila"]
                .into_iter()
                .map(str::to_string),
        )
    }

    #[test]
    fn strips_compound_wake_phrase_whole() {
        let a = assistant();
        assert_eq!(
            a.strip_wake_phrase("Hey Mila what is your name"),
            Some("what is your name".to_string())
        );
    }

    #[test]
    fn strips_bare_name_anywhere() {
        let a = assistant();
        assert_eq!(
            a.strip_wake_phrase("what mila is your name"),
            Some("what is your name".to_string())
        );
    }

    #[test]
    fn wake_phrase_alone_yields_empty_query() {
        let a = assistant();
        assert_eq!(a.strip_wake_phrase("mila"), Some(String::new()));
    }

    #[test]
    fn text_without_wake_phrase_is_ignored() {
        let a = assistant();
        assert_eq!(a.strip_wake_phrase("what is your name"), None);
    }

    #[test]
    fn farewell_membership_is_literal() {
        assert!(Assistant::is_farewell("goodbye then"));
        assert!(Assistant::is_farewell("ok bye"));
        assert!(!Assistant::is_farewell("what is your name"));
    }

    #[test]
    fn respond_returns_stored_answer_on_match() {
        let dir = tempdir().unwrap();
        let mut kb = KnowledgeBase::open(dir.path().join("data.csv")).unwrap();
        kb.add("what is your name", "Mila").unwrap();

        let reply = assistant().respond("What is your name", &kb);
        assert_eq!(reply.answer, "Mila");
        assert_eq!(
            reply.matched_question.as_deref(),
            Some("what is your name")
        );
        assert!(!reply.farewell);
    }

    #[test]
    fn respond_falls_back_below_threshold() {
        let dir = tempdir().unwrap();
        let mut kb = KnowledgeBase::open(dir.path().join("data.csv")).unwrap();
        kb.add("what is your name", "Mila").unwrap();

        let reply = assistant().respond("name", &kb);
        assert_eq!(reply.answer, FALLBACK_ANSWER);
        assert_eq!(reply.matched_question, None);
    }

    #[test]
    fn respond_falls_back_on_empty_store() {
        let dir = tempdir().unwrap();
        let kb = KnowledgeBase::open(dir.path().join("data.csv")).unwrap();

        let reply = assistant().respond("anything at all", &kb);
        assert_eq!(reply.answer, FALLBACK_ANSWER);
    }

    #[test]
    fn respond_answers_farewells_from_the_pool() {
        let dir = tempdir().unwrap();
        let kb = KnowledgeBase::open(dir.path().join("data.csv")).unwrap();

        let reply = assistant().respond("goodbye mila friend", &kb);
        assert!(reply.farewell);
        assert!(FAREWELL_RESPONSES.contains(&reply.answer.as_str()));
    }

    #[test]
    fn responses_rotate_deterministically() {
        let a = assistant();
        let first = a.greeting();
        let second = a.greeting();
        let third = a.greeting();
        assert_eq!(
            [first, second, third],
            GREETING_RESPONSES
        );
        assert_eq!(a.greeting(), GREETING_RESPONSES[0]);
    }
}
