//! Keyword extraction and dynamic keyword learning

use std::collections::BTreeSet;
use tracing::info;

use super::subjects::Subject;
use super::tokenizer::{tokenize, WordFrequencies};

/// Question words that carry no topical content
const QUESTION_WORDS: &[&str] = &[
    "what", "how", "why", "when", "where", "who", "which", "does", "can", "will", "would",
    "should", "could", "tell", "explain", "describe",
];

/// Dynamic set size that triggers a promotion scan
const DYNAMIC_SCAN_THRESHOLD: usize = 5;

/// A candidate needs a global frequency above this to be promoted
const PROMOTION_FREQUENCY: u64 = 3;

/// At most this many candidates are promoted per scan
const MAX_PROMOTIONS: usize = 3;

/// Content keywords of a question, recorded in the all-time keyword set
pub fn extract_keywords(question: &str, all_keywords: &mut BTreeSet<String>) -> Vec<String> {
    let keywords: Vec<String> = tokenize(question)
        .into_iter()
        .filter(|word| !QUESTION_WORDS.contains(&word.as_str()))
        .collect();
    all_keywords.extend(keywords.iter().cloned());
    keywords
}

/// Feed a question's tokens into a subject's candidate set and promote
/// frequent candidates into its permanent keywords.
///
/// Returns the promoted keywords.
pub fn learn_dynamic_keywords(
    tokens: &[String],
    subject: &mut Subject,
    frequencies: &WordFrequencies,
) -> Vec<String> {
    for token in tokens {
        if !subject.keywords.contains(token) {
            subject.dynamic_keywords.insert(token.clone());
        }
    }

    if subject.dynamic_keywords.len() <= DYNAMIC_SCAN_THRESHOLD {
        return Vec::new();
    }

    let promoted: Vec<String> = subject
        .dynamic_keywords
        .iter()
        .filter(|kw| frequencies.get(kw) > PROMOTION_FREQUENCY)
        .take(MAX_PROMOTIONS)
        .cloned()
        .collect();

    for keyword in &promoted {
        subject.dynamic_keywords.remove(keyword);
        subject.keywords.insert(keyword.clone());
    }

    if !promoted.is_empty() {
        info!("Promoted keywords for {}: {}", subject.name, promoted.join(", "));
    }
    promoted
}
