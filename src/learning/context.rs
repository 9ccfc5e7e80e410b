//! Rolling conversation context and topic-transition patterns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Maximum number of recent questions kept
pub const CONTEXT_WINDOW: usize = 10;

/// Consecutive questions must share more than this many tokens
const MIN_SHARED_TOKENS: usize = 1;

/// Tokens used in a pattern signature
const SIGNATURE_TOKENS: usize = 3;

/// A recent question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextEntry {
    pub question: String,
    pub timestamp: DateTime<Utc>,
    pub tokens: Vec<String>,
    /// Filled in once the question has been classified
    #[serde(default)]
    pub subject: Option<String>,
}

/// A (previous question -> next question) transition sharing several tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionPattern {
    pub from: String,
    pub to: String,
    pub timestamp: DateTime<Utc>,
}

/// Sliding window of recent questions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextMemory {
    entries: Vec<ContextEntry>,
}

impl ContextMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries, keeping only the newest window
    pub fn from_entries(mut entries: Vec<ContextEntry>) -> Self {
        let excess = entries.len().saturating_sub(CONTEXT_WINDOW);
        entries.drain(..excess);
        Self { entries }
    }

    /// Append a question and return the transition it forms with the
    /// previous one, if the two share enough tokens.
    pub fn push(&mut self, question: &str, tokens: Vec<String>) -> Option<(String, QuestionPattern)> {
        self.entries.push(ContextEntry {
            question: question.to_string(),
            timestamp: Utc::now(),
            tokens,
            subject: None,
        });
        let excess = self.entries.len().saturating_sub(CONTEXT_WINDOW);
        self.entries.drain(..excess);
        self.latest_transition()
    }

    /// Tag the newest entry with its classified subject
    pub fn set_latest_subject(&mut self, subject: &str) {
        if let Some(entry) = self.entries.last_mut() {
            entry.subject = Some(subject.to_string());
        }
    }

    /// Subjects of the last `n` entries
    pub fn recent_subjects(&self, n: usize) -> Vec<&str> {
        self.last_n(n)
            .iter()
            .filter_map(|e| e.subject.as_deref())
            .collect()
    }

    /// How many of the last `n` entries were classified as `subject`
    pub fn recent_focus(&self, subject: &str, n: usize) -> usize {
        self.last_n(n)
            .iter()
            .filter(|e| e.subject.as_deref() == Some(subject))
            .count()
    }

    pub fn last_n(&self, n: usize) -> &[ContextEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn latest_transition(&self) -> Option<(String, QuestionPattern)> {
        let [prev, curr] = self.last_n(2) else {
            return None;
        };
        let prev_tokens: HashSet<&String> = prev.tokens.iter().collect();
        let curr_tokens: HashSet<&String> = curr.tokens.iter().collect();
        let mut common: Vec<&String> = prev_tokens.intersection(&curr_tokens).copied().collect();
        if common.len() <= MIN_SHARED_TOKENS {
            return None;
        }
        common.sort();
        let signature = common
            .iter()
            .take(SIGNATURE_TOKENS)
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join("-");
        debug!("Question pattern '{}' detected", signature);
        Some((
            signature,
            QuestionPattern {
                from: prev.question.clone(),
                to: curr.question.clone(),
                timestamp: Utc::now(),
            },
        ))
    }
}

/// Patterns grouped by signature
pub type QuestionPatterns = BTreeMap<String, Vec<QuestionPattern>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::tokenizer::tokenize;

    #[test]
    fn test_window_is_bounded() {
        let mut memory = ContextMemory::new();
        for i in 0..15 {
            memory.push(&format!("question number {}", i), vec![]);
        }
        assert_eq!(memory.len(), CONTEXT_WINDOW);
        assert_eq!(memory.entries()[0].question, "question number 5");
    }

    #[test]
    fn test_transition_requires_two_shared_tokens() {
        let mut memory = ContextMemory::new();
        let q1 = "how does gravity affect planets";
        let q2 = "does gravity affect the moon";
        assert!(memory.push(q1, tokenize(q1)).is_none());
        let (signature, pattern) = memory.push(q2, tokenize(q2)).unwrap();
        assert_eq!(signature, "affect-does-gravity");
        assert_eq!(pattern.from, q1);
        assert_eq!(pattern.to, q2);

        let q3 = "poetry of the romantic era";
        assert!(memory.push(q3, tokenize(q3)).is_none());
    }

    #[test]
    fn test_recent_subjects() {
        let mut memory = ContextMemory::new();
        memory.push("one", vec![]);
        memory.set_latest_subject("science");
        memory.push("two", vec![]);
        memory.set_latest_subject("history");
        memory.push("three", vec![]);
        assert_eq!(memory.recent_subjects(3), vec!["science", "history"]);
        assert_eq!(memory.recent_focus("science", 5), 1);
        assert_eq!(memory.recent_focus("science", 1), 0);
    }
}
