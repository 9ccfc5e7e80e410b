//! Learning and retrieval core
//!
//! Everything the agent learns lives in one [`LearningState`] that is passed
//! explicitly to each component: tokenizer statistics, the subject registry,
//! conversation history, context memory, user preferences and knowledge-base
//! success patterns.

pub mod classifier;
pub mod confidence;
pub mod context;
pub mod feedback;
pub mod keywords;
pub mod similarity;
pub mod store;
pub mod subjects;
pub mod tokenizer;

use std::collections::BTreeSet;

pub use classifier::classify;
pub use confidence::ConfidenceTier;
pub use context::{ContextEntry, ContextMemory, QuestionPattern, QuestionPatterns};
pub use feedback::{FeedbackOutcome, StylePreference, UserPreferences};
pub use similarity::similarity;
pub use store::{CorrectionRecord, LearnOrigin, LearnedResponse, Upsert};
pub use subjects::{Subject, SubjectRegistry};
pub use tokenizer::{tokenize, WordFrequencies};

use crate::knowledge::SuccessPatterns;
use crate::types::{ConversationTurn, Rating};

/// History entries at least this similar count as similar questions
const SIMILAR_QUESTION_THRESHOLD: f64 = 0.3;

/// Conversation turns kept in memory
pub const MAX_HISTORY: usize = 100;

/// Transitions kept per question-pattern signature
pub const MAX_PATTERNS_PER_SIGNATURE: usize = 20;

/// Distinct question-pattern signatures kept
pub const MAX_PATTERN_SIGNATURES: usize = 500;

/// A previously answered question resembling the current one
#[derive(Debug, Clone)]
pub struct SimilarQuestion {
    pub question: String,
    pub response: String,
    pub similarity: f64,
    pub feedback: Option<Rating>,
    pub subject: String,
}

/// All mutable learning state
#[derive(Debug, Clone)]
pub struct LearningState {
    pub word_frequencies: WordFrequencies,
    pub subjects: SubjectRegistry,
    pub history: Vec<ConversationTurn>,
    pub context: ContextMemory,
    pub question_patterns: QuestionPatterns,
    pub preferences: UserPreferences,
    pub success_patterns: SuccessPatterns,
    pub all_keywords: BTreeSet<String>,
}

impl Default for LearningState {
    fn default() -> Self {
        Self::new()
    }
}

impl LearningState {
    /// Fresh state with the built-in subjects registered
    pub fn new() -> Self {
        Self {
            word_frequencies: WordFrequencies::new(),
            subjects: SubjectRegistry::seeded(),
            history: Vec::new(),
            context: ContextMemory::new(),
            question_patterns: QuestionPatterns::new(),
            preferences: UserPreferences::default(),
            success_patterns: SuccessPatterns::new(),
            all_keywords: BTreeSet::new(),
        }
    }

    /// The most recently answered question
    pub fn last_turn(&self) -> Option<&ConversationTurn> {
        self.history.last()
    }

    /// History entries similar to `question`, most similar first
    pub fn find_similar(&self, question: &str) -> Vec<SimilarQuestion> {
        let mut similar: Vec<SimilarQuestion> = self
            .history
            .iter()
            .filter_map(|turn| {
                let score = similarity(question, &turn.question);
                (score >= SIMILAR_QUESTION_THRESHOLD).then(|| SimilarQuestion {
                    question: turn.question.clone(),
                    response: turn.response.clone(),
                    similarity: score,
                    feedback: turn.feedback,
                    subject: turn.subject.clone(),
                })
            })
            .collect();
        similar.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        similar
    }

    /// Append a turn, dropping the oldest past [`MAX_HISTORY`]
    pub fn push_turn(&mut self, turn: ConversationTurn) {
        self.history.push(turn);
        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
    }

    /// Record a topic transition under its signature
    pub fn record_pattern(&mut self, signature: String, pattern: QuestionPattern) {
        if !self.question_patterns.contains_key(&signature)
            && self.question_patterns.len() >= MAX_PATTERN_SIGNATURES
        {
            // Evict the signature seen least recently
            let stalest = self
                .question_patterns
                .iter()
                .min_by_key(|(_, patterns)| patterns.last().map(|p| p.timestamp))
                .map(|(key, _)| key.clone());
            if let Some(key) = stalest {
                self.question_patterns.remove(&key);
            }
        }

        let patterns = self.question_patterns.entry(signature).or_default();
        patterns.push(pattern);
        if patterns.len() > MAX_PATTERNS_PER_SIGNATURE {
            patterns.remove(0);
        }
    }

    /// Learned responses across all subjects
    pub fn total_learned(&self) -> usize {
        self.subjects.iter().map(|s| s.learned.len()).sum()
    }

    /// Correction records across all subjects
    pub fn total_corrections(&self) -> usize {
        self.subjects.iter().map(|s| s.corrections.len()).sum()
    }

    /// Candidate keywords across all subjects
    pub fn total_dynamic_keywords(&self) -> usize {
        self.subjects.iter().map(|s| s.dynamic_keywords.len()).sum()
    }
}
