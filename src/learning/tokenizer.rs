//! Word tokenizer and global word-frequency table

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anything that is not a word character, whitespace, `?` or `!`
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s?!]").expect("valid regex"));

/// Tokens must be longer than this many characters
const MIN_TOKEN_LEN: usize = 2;

/// Normalize text into lowercase word tokens longer than two characters.
///
/// Pure: does not touch the frequency table. Use [`WordFrequencies::observe`]
/// when a question should count towards keyword familiarity.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");
    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// How often each token has been seen across all observed questions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordFrequencies(BTreeMap<String, u64>);

impl WordFrequencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `text` and count every token. Returns the tokens.
    pub fn observe(&mut self, text: &str) -> Vec<String> {
        let tokens = tokenize(text);
        for token in &tokens {
            *self.0.entry(token.clone()).or_insert(0) += 1;
        }
        tokens
    }

    pub fn get(&self, token: &str) -> u64 {
        self.0.get(token).copied().unwrap_or(0)
    }

    /// Overwrite the count for a token
    pub fn set(&mut self, token: impl Into<String>, count: u64) {
        self.0.insert(token.into(), count);
    }

    /// Sum of counts for the given tokens
    pub fn familiarity<'a>(&self, tokens: impl IntoIterator<Item = &'a String>) -> u64 {
        tokens.into_iter().map(|t| self.get(t)).sum()
    }

    /// Vocabulary size
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_normalizes() {
        let tokens = tokenize("What is the Speed-of-Light, really?");
        assert_eq!(tokens, vec!["what", "the", "speed", "light", "really?"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("a an to of").is_empty());
    }

    #[test]
    fn test_observe_counts() {
        let mut freq = WordFrequencies::new();
        freq.observe("gravity pulls gravity");
        freq.observe("Gravity");
        assert_eq!(freq.get("gravity"), 3);
        assert_eq!(freq.get("pulls"), 1);
        assert_eq!(freq.get("missing"), 0);
        assert_eq!(freq.len(), 2);
    }

    #[test]
    fn test_pure_tokenize_does_not_count() {
        let freq = WordFrequencies::new();
        let _ = tokenize("physics physics");
        assert_eq!(freq.get("physics"), 0);
    }
}
