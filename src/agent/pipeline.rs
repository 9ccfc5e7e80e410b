//! Response generation pipeline
//!
//! A question is classified and learned from, then answered by the first
//! strategy that applies: a well-rated similar question, a learned response,
//! arithmetic, the knowledge base, and finally a contextual fallback.

use chrono::Utc;
use tracing::debug;

use super::formatter;
use crate::knowledge::{self, KnowledgeBase};
use crate::learning::{self, classify, confidence, keywords, store, LearningState};
use crate::math;
use crate::types::{ConfidenceFactors, ConversationTurn};

/// A similar question is reused above this similarity
const REUSE_SIMILARITY: f64 = 0.7;

/// Which strategy produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    SimilarQuestion,
    Learned,
    Math,
    Knowledge,
    Fallback,
}

impl Strategy {
    /// Answer came from something the agent learned
    pub fn is_learned(self) -> bool {
        matches!(self, Strategy::SimilarQuestion | Strategy::Learned)
    }
}

/// An answered question
#[derive(Debug, Clone)]
pub struct Answer {
    /// Formatted text shown to the user
    pub text: String,
    /// Unformatted response stored in history
    pub response: String,
    pub subject: String,
    pub keywords: Vec<String>,
    pub strategy: Strategy,
    pub confidence: ConfidenceFactors,
}

impl Answer {
    /// No local strategy applied; callers may escalate to a provider
    pub fn is_fallback(&self) -> bool {
        self.strategy == Strategy::Fallback
    }
}

/// Answer a question and record it in history
pub fn respond(state: &mut LearningState, kb: &KnowledgeBase, question: &str) -> Answer {
    let tokens = state.word_frequencies.observe(question);

    if let Some((signature, pattern)) = state.context.push(question, tokens.clone()) {
        state.record_pattern(signature, pattern);
    }

    let subject = classify(&state.subjects, &state.context, &tokens);
    state.context.set_latest_subject(&subject);

    let entry = state.subjects.get_or_create(&subject);
    keywords::learn_dynamic_keywords(&tokens, entry, &state.word_frequencies);
    entry.expertise += 1;

    let keywords = keywords::extract_keywords(question, &mut state.all_keywords);
    let similar = state.find_similar(question);

    let (response, strategy) = select_response(state, kb, question, &subject, &keywords, &similar);
    debug!("Answered '{}' via {:?} ({})", question, strategy, subject);

    let factors = confidence::factors(state, &subject, &keywords);
    state.push_turn(ConversationTurn {
        timestamp: Utc::now(),
        question: question.to_string(),
        subject: subject.clone(),
        keywords: keywords.clone(),
        response: response.clone(),
        feedback: None,
        similar_questions: similar.len(),
        confidence_factors: factors,
    });

    Answer {
        text: formatter::format_answer(&response, &subject, &factors, strategy.is_learned()),
        response,
        subject,
        keywords,
        strategy,
        confidence: factors,
    }
}

fn select_response(
    state: &mut LearningState,
    kb: &KnowledgeBase,
    question: &str,
    subject: &str,
    keywords: &[String],
    similar: &[learning::SimilarQuestion],
) -> (String, Strategy) {
    if let Some(best) = similar.first() {
        let well_rated = best.feedback.map_or(false, |rating| rating.is_positive());
        if best.similarity > REUSE_SIMILARITY && well_rated {
            return (
                format!("Based on a similar question I answered before: {}", best.response),
                Strategy::SimilarQuestion,
            );
        }
    }

    if let Some(learned) = state.subjects.get(subject).and_then(|s| store::search(s, question)) {
        return (learned.response.clone(), Strategy::Learned);
    }

    if subject == "mathematics" {
        if let Some(answer) = math::answer(question) {
            return (answer, Strategy::Math);
        }
    }

    if let Some(hit) = kb.search(subject, keywords, &state.success_patterns) {
        let mut response = format!("Regarding {}: {}", hit.display_key(), hit.value);
        if let Some(related) = kb.related(subject, &hit.key) {
            response.push_str(&format!("\n\nRelated information: {}", related));
        }
        knowledge::record_success(&mut state.success_patterns, subject, &hit.key, question, keywords);
        return (response, Strategy::Knowledge);
    }

    let templates = state
        .subjects
        .get(subject)
        .map(|s| s.templates.as_slice())
        .unwrap_or_default();
    (
        formatter::fallback_response(subject, templates, keywords, &mut rand::rng()),
        Strategy::Fallback,
    )
}
