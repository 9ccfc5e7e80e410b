//! Confidence scoring
//!
//! Combines subject expertise, keyword familiarity, recent subject focus and
//! average feedback into a single percentage shown with every answer.

use super::LearningState;
use crate::types::ConfidenceFactors;

/// Neutral rating assumed when a subject has no feedback yet
const NEUTRAL_FEEDBACK: f64 = 3.0;

/// Context entries inspected for recent subject focus
const FOCUS_WINDOW: usize = 5;

const MIN_CONFIDENCE: f64 = 20.0;
const MAX_CONFIDENCE: f64 = 100.0;
const MAX_KEYWORD_BOOST: f64 = 20.0;

/// Snapshot the confidence inputs for a subject and keyword list
pub fn factors(state: &LearningState, subject: &str, keywords: &[String]) -> ConfidenceFactors {
    ConfidenceFactors {
        subject_expertise: state.subjects.expertise(subject),
        keyword_familiarity: state.word_frequencies.familiarity(keywords),
        recent_subject_focus: state.context.recent_focus(subject, FOCUS_WINDOW),
        average_feedback: state
            .subjects
            .get(subject)
            .and_then(|s| s.average_feedback())
            .unwrap_or(NEUTRAL_FEEDBACK),
    }
}

/// Overall confidence percentage in [20, 100]
pub fn overall(factors: &ConfidenceFactors) -> f64 {
    let base = (factors.subject_expertise as f64 * 5.0 + 50.0).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
    let keyword_boost = (factors.keyword_familiarity as f64 * 2.0).min(MAX_KEYWORD_BOOST);
    let context_boost = factors.recent_subject_focus as f64 * 5.0;
    let feedback_boost = (factors.average_feedback - NEUTRAL_FEEDBACK) * 10.0;

    (base + keyword_boost + context_boost + feedback_boost).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Confidence tier of an overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    VeryConfident,
    Knowledgeable,
    Learning,
    NewTopic,
}

impl ConfidenceTier {
    pub fn from_score(score: f64) -> Self {
        if score > 85.0 {
            ConfidenceTier::VeryConfident
        } else if score > 70.0 {
            ConfidenceTier::Knowledgeable
        } else if score > 50.0 {
            ConfidenceTier::Learning
        } else {
            ConfidenceTier::NewTopic
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ConfidenceTier::VeryConfident => "I'm very confident about this topic!",
            ConfidenceTier::Knowledgeable => "I have good knowledge of this area.",
            ConfidenceTier::Learning => "I'm learning more about this topic.",
            ConfidenceTier::NewTopic => "This is a newer topic for me.",
        }
    }
}
