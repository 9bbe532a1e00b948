//! mila-core: the assistant's engineering core.
//!
//! Holds the pieces with independent logic: the CSV-persisted question→answer
//! knowledge base, the token-overlap matcher that selects the closest stored
//! question for a spoken query, and the dialogue policy (wake phrases,
//! farewells, fallback answers) wrapped around them. Voice collaborators and
//! the HTTP surface live in their own crates.

mod assistant;
mod config;
mod knowledge;
mod matcher;

pub use assistant::{
    Assistant, Reply, FALLBACK_ANSWER, FAREWELL_PHRASES, FAREWELL_RESPONSES, GREETING_RESPONSES,
};
pub use config::AppConfig;
pub use knowledge::{KnowledgeBase, KnowledgeError, QaRecord};
pub use matcher::{find_best_match, overlap_score, MATCH_THRESHOLD};
