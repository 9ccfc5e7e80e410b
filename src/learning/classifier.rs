//! Subject classification
//!
//! Scores every registered subject against a question's tokens and picks the
//! best one. Ties go to the earliest registered subject.

use tracing::debug;

use super::context::ContextMemory;
use super::subjects::{Subject, SubjectRegistry};
use crate::types::GENERAL_SUBJECT;

const EXACT_MATCH_SCORE: f64 = 3.0;
const PARTIAL_MATCH_SCORE: f64 = 1.0;
const DYNAMIC_MATCH_SCORE: f64 = 2.0;
const EXPERTISE_WEIGHT: f64 = 0.1;
const CONTEXT_BOOST: f64 = 1.0;

/// Number of recent context entries that can boost a subject
const CONTEXT_LOOKBACK: usize = 3;

/// Score of a single subject for the given tokens
pub fn score_subject(subject: &Subject, tokens: &[String], recent_subjects: &[&str]) -> f64 {
    let mut score = 0.0;

    for token in tokens {
        if subject.keywords.contains(token) {
            score += EXACT_MATCH_SCORE;
        }
        for keyword in &subject.keywords {
            if keyword.contains(token.as_str()) || token.contains(keyword.as_str()) {
                score += PARTIAL_MATCH_SCORE;
            }
        }
        if subject.dynamic_keywords.contains(token) {
            score += DYNAMIC_MATCH_SCORE;
        }
    }

    score += subject.expertise as f64 * EXPERTISE_WEIGHT;

    if recent_subjects.contains(&subject.name.as_str()) {
        score += CONTEXT_BOOST;
    }

    score
}

/// Pick the best subject for the tokens, falling back to "general"
pub fn classify(registry: &SubjectRegistry, context: &ContextMemory, tokens: &[String]) -> String {
    let recent = context.recent_subjects(CONTEXT_LOOKBACK);

    let mut best: Option<(&str, f64)> = None;
    for subject in registry.iter() {
        let score = score_subject(subject, tokens, &recent);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((subject.name.as_str(), score));
        }
    }

    match best {
        Some((name, score)) if score > 0.0 => {
            debug!("Classified as {} (score {:.1})", name, score);
            name.to_string()
        }
        _ => GENERAL_SUBJECT.to_string(),
    }
}
