//! CSV-backed question→answer store.
//!
//! The whole table is loaded into memory at startup and rewritten to disk on
//! every mutation. Entries are kept in a `BTreeMap`, so iteration order,
//! matcher tie-breaks, and persisted row order are all deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One row of the persisted table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
}

/// Failures while reading or rewriting the table. A missing file on load is
/// not an error; it yields an empty store.
#[derive(Debug)]
pub enum KnowledgeError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl fmt::Display for KnowledgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnowledgeError::Io(e) => write!(f, "knowledge table i/o error: {}", e),
            KnowledgeError::Csv(e) => write!(f, "knowledge table format error: {}", e),
            KnowledgeError::Json(e) => write!(f, "knowledge export error: {}", e),
        }
    }
}

impl std::error::Error for KnowledgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KnowledgeError::Io(e) => Some(e),
            KnowledgeError::Csv(e) => Some(e),
            KnowledgeError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for KnowledgeError {
    fn from(e: std::io::Error) -> Self {
        KnowledgeError::Io(e)
    }
}

impl From<csv::Error> for KnowledgeError {
    fn from(e: csv::Error) -> Self {
        KnowledgeError::Csv(e)
    }
}

impl From<serde_json::Error> for KnowledgeError {
    fn from(e: serde_json::Error) -> Self {
        KnowledgeError::Json(e)
    }
}

/// Question keys are lower-cased and trimmed before use.
fn normalize(question: &str) -> String {
    question.trim().to_lowercase()
}

/// In-memory question→answer mapping bound to its backing CSV file.
pub struct KnowledgeBase {
    entries: BTreeMap<String, String>,
    path: PathBuf,
}

impl KnowledgeBase {
    /// Loads the table at `path`. An absent file or a file with no data rows
    /// yields an empty store; any other read failure propagates.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeError> {
        let path = path.as_ref().to_path_buf();
        let mut entries = BTreeMap::new();
        match File::open(&path) {
            Ok(file) => {
                let mut reader = csv::Reader::from_reader(file);
                for row in reader.deserialize() {
                    let record: QaRecord = row?;
                    entries.insert(record.question, record.answer);
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no data table found, starting empty");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(Self { entries, path })
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the header-only table if the backing file does not exist yet.
    pub fn ensure_data_file(&self) -> Result<(), KnowledgeError> {
        if !self.path.exists() {
            self.save()?;
        }
        Ok(())
    }

    /// Rewrites the full table: header row `question,answer`, one row per
    /// entry, in key order. I/O failures propagate.
    pub fn save(&self) -> Result<(), KnowledgeError> {
        let mut writer = csv::Writer::from_writer(File::create(&self.path)?);
        writer.write_record(["question", "answer"])?;
        for (question, answer) in &self.entries {
            writer.write_record([question.as_str(), answer.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Inserts or overwrites an entry and persists the table. The question is
    /// lower-cased and trimmed, the answer trimmed. Empty strings are valid
    /// keys and values.
    pub fn add(&mut self, question: &str, answer: &str) -> Result<(), KnowledgeError> {
        self.entries
            .insert(normalize(question), answer.trim().to_string());
        self.save()
    }

    /// Removes the entry under the exact (already-normalized) key, persisting
    /// on removal. Returns whether a deletion occurred; an absent key is not
    /// an error and leaves the table untouched.
    pub fn remove(&mut self, question: &str) -> Result<bool, KnowledgeError> {
        if self.entries.remove(question).is_some() {
            self.save()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Exact-key lookup.
    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries.get(question).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(q, a)| (q.as_str(), a.as_str()))
    }

    /// The stored question closest to `query` by token overlap, with its
    /// answer, when the overlap clears the match threshold.
    pub fn best_match(&self, query: &str) -> Option<(&str, &str)> {
        crate::matcher::find_best_match(query, self.entries.keys().map(String::as_str))
            .and_then(|q| self.entries.get_key_value(q))
            .map(|(q, a)| (q.as_str(), a.as_str()))
    }

    /// Exports the table as tokenized training pairs (JSON array of
    /// `input_tokens`/`output_tokens` objects). Returns the pair count.
    pub fn export_token_data<P: AsRef<Path>>(&self, path: P) -> Result<usize, KnowledgeError> {
        let pairs: Vec<serde_json::Value> = self
            .entries
            .iter()
            .map(|(question, answer)| {
                serde_json::json!({
                    "input_tokens": question.split_whitespace().collect::<Vec<_>>(),
                    "output_tokens": answer.split_whitespace().collect::<Vec<_>>(),
                    "original_question": question,
                    "original_answer": answer,
                })
            })
            .collect();
        serde_json::to_writer_pretty(File::create(path)?, &pairs)?;
        Ok(pairs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_at(dir: &tempfile::TempDir) -> KnowledgeBase {
        KnowledgeBase::open(dir.path().join("data.csv")).unwrap()
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let kb = open_at(&dir);
        assert!(kb.is_empty());
    }

    #[test]
    fn empty_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "").unwrap();
        let kb = KnowledgeBase::open(&path).unwrap();
        assert!(kb.is_empty());
    }

    #[test]
    fn header_only_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "question,answer\n").unwrap();
        let kb = KnowledgeBase::open(&path).unwrap();
        assert!(kb.is_empty());
    }

    #[test]
    fn ensure_data_file_writes_the_header() {
        let dir = tempdir().unwrap();
        let kb = open_at(&dir);
        kb.ensure_data_file().unwrap();
        assert_eq!(
            std::fs::read_to_string(kb.path()).unwrap(),
            "question,answer\n"
        );
    }

    #[test]
    fn add_then_reload_persists_normalized_entry() {
        let dir = tempdir().unwrap();
        let mut kb = open_at(&dir);
        kb.add("  What Is Your Name  ", "  Mila  ").unwrap();

        let reloaded = open_at(&dir);
        assert_eq!(reloaded.get("what is your name"), Some("Mila"));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn add_overwrites_existing_key() {
        let dir = tempdir().unwrap();
        let mut kb = open_at(&dir);
        kb.add("what is your name", "Mila").unwrap();
        kb.add("What is your NAME", "Nila").unwrap();
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.get("what is your name"), Some("Nila"));
    }

    #[test]
    fn repeated_add_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut kb = open_at(&dir);
        for _ in 0..3 {
            kb.add("what is your name", "Mila").unwrap();
        }
        let bytes = std::fs::read(kb.path()).unwrap();
        kb.add("what is your name", "Mila").unwrap();
        assert_eq!(std::fs::read(kb.path()).unwrap(), bytes);
        assert_eq!(kb.len(), 1);
    }

    #[test]
    fn remove_absent_key_returns_false_and_leaves_store() {
        let dir = tempdir().unwrap();
        let mut kb = open_at(&dir);
        kb.add("what is your name", "Mila").unwrap();
        let before = std::fs::read(kb.path()).unwrap();

        assert!(!kb.remove("no such question").unwrap());
        assert_eq!(kb.len(), 1);
        assert_eq!(std::fs::read(kb.path()).unwrap(), before);
    }

    #[test]
    fn remove_present_key_persists() {
        let dir = tempdir().unwrap();
        let mut kb = open_at(&dir);
        kb.add("what is your name", "Mila").unwrap();
        assert!(kb.remove("what is your name").unwrap());

        let reloaded = open_at(&dir);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn save_load_round_trip_is_byte_identical() {
        let dir = tempdir().unwrap();
        let mut kb = open_at(&dir);
        kb.add("what is your name", "Mila").unwrap();
        kb.add("who made you", "A small team").unwrap();
        let before = std::fs::read(kb.path()).unwrap();

        let reloaded = open_at(&dir);
        reloaded.save().unwrap();
        assert_eq!(std::fs::read(reloaded.path()).unwrap(), before);
    }

    #[test]
    fn empty_question_is_a_valid_key() {
        let dir = tempdir().unwrap();
        let mut kb = open_at(&dir);
        kb.add("", "nothing asked").unwrap();

        let reloaded = open_at(&dir);
        assert_eq!(reloaded.get(""), Some("nothing asked"));
    }

    #[test]
    fn values_with_delimiters_round_trip() {
        let dir = tempdir().unwrap();
        let mut kb = open_at(&dir);
        kb.add("what, exactly", "it \"quotes\", commas,\nand newlines")
            .unwrap();

        let reloaded = open_at(&dir);
        assert_eq!(
            reloaded.get("what, exactly"),
            Some("it \"quotes\", commas,\nand newlines")
        );
    }

    #[test]
    fn best_match_exact_question_returns_answer() {
        let dir = tempdir().unwrap();
        let mut kb = open_at(&dir);
        kb.add("what is your name", "Mila").unwrap();
        assert_eq!(
            kb.best_match("what is your name"),
            Some(("what is your name", "Mila"))
        );
    }

    #[test]
    fn best_match_below_threshold_returns_none() {
        let dir = tempdir().unwrap();
        let mut kb = open_at(&dir);
        kb.add("what is your name", "Mila").unwrap();
        // {"name"} vs {"what","is","your","name"}: 1/4 = 0.25
        assert_eq!(kb.best_match("name"), None);
    }

    #[test]
    fn best_match_on_empty_store_returns_none() {
        let dir = tempdir().unwrap();
        let kb = open_at(&dir);
        assert_eq!(kb.best_match("anything at all"), None);
    }

    #[test]
    fn export_token_data_writes_pairs() {
        let dir = tempdir().unwrap();
        let mut kb = open_at(&dir);
        kb.add("what is your name", "Mila the assistant").unwrap();
        let out = dir.path().join("token_data.json");

        let count = kb.export_token_data(&out).unwrap();
        assert_eq!(count, 1);

        let exported: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(
            exported[0]["input_tokens"],
            serde_json::json!(["what", "is", "your", "name"])
        );
        assert_eq!(
            exported[0]["output_tokens"],
            serde_json::json!(["Mila", "the", "assistant"])
        );
        assert_eq!(exported[0]["original_answer"], "Mila the assistant");
    }
}
