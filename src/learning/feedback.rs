//! Feedback and reinforcement
//!
//! A rating on the most recent answer adjusts subject expertise, promotes good
//! answers into the learned store and template pool, records poor answers as
//! corrections, and tracks which answer styles the user prefers.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::store::{self, CorrectionRecord, LearnOrigin};
use super::LearningState;
use crate::error::{AgentError, AgentResult};
use crate::types::Rating;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").expect("valid regex"));
static PROPER_NOUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("valid regex"));

const EXPERTISE_REWARD: u32 = 2;
const EXPERTISE_PENALTY: u32 = 1;

/// Word counts that mark an answer as detailed or concise
const DETAILED_WORDS: usize = 50;
const CONCISE_WORDS: usize = 30;

/// Style counters for one subject
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylePreference {
    pub detailed: u32,
    pub concise: u32,
    pub examples: u32,
}

/// What the user has rated highly
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Per-subject answer style counters
    #[serde(default)]
    pub styles: BTreeMap<String, StylePreference>,
    /// Keywords of highly rated answers
    #[serde(default)]
    pub keywords: BTreeMap<String, u32>,
}

impl UserPreferences {
    /// Update style and keyword counters from a highly rated answer
    pub fn reinforce(&mut self, subject: &str, response: &str, keywords: &[String]) {
        let style = self.styles.entry(subject.to_string()).or_default();
        let words = response.split_whitespace().count();
        if words >= DETAILED_WORDS {
            style.detailed += 1;
        } else if words < CONCISE_WORDS {
            style.concise += 1;
        }
        if response.to_lowercase().contains("example") || response.contains(':') {
            style.examples += 1;
        }

        for keyword in keywords {
            *self.keywords.entry(keyword.clone()).or_insert(0) += 1;
        }
    }
}

/// Generalize an answer into a reusable template
pub fn derive_template(response: &str) -> String {
    let numbered = NUMBER.replace_all(response, "{number}");
    PROPER_NOUN.replace_all(&numbered, "{proper_noun}").into_owned()
}

/// Result of applying a rating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackOutcome {
    pub subject: String,
    pub rating: Rating,
}

impl FeedbackOutcome {
    /// User-facing acknowledgement for the rating
    pub fn acknowledgement(&self) -> String {
        let message = match self.rating.value() {
            5 => "Excellent! I'm learning that this type of response works really well.",
            4 => "Great! I'll remember this successful approach for similar questions.",
            3 => "Thanks for the feedback! I'll use this to improve my responses.",
            2 => "I'll work on improving responses like this. Thanks for the honest feedback.",
            _ => "I understand this wasn't helpful. I'm learning what to avoid for next time.",
        };
        format!("Thank you for rating my {} response! {}", self.subject, message)
    }
}

/// Apply a rating to the most recent conversation turn
pub fn apply(state: &mut LearningState, rating: Rating) -> AgentResult<FeedbackOutcome> {
    let turn = state.history.last_mut().ok_or(AgentError::NoRecentTurn)?;
    turn.feedback = Some(rating);
    let subject_name = turn.subject.clone();
    let question = turn.question.clone();
    let response = turn.response.clone();
    let keywords = turn.keywords.clone();

    let subject = state.subjects.get_or_create(&subject_name);
    subject.feedback.push(rating);

    if rating.is_positive() {
        subject.expertise += EXPERTISE_REWARD;
        store::upsert(subject, &question, &response, rating, LearnOrigin::Feedback, keywords.clone());

        let template = derive_template(&response);
        if !subject.templates.contains(&template) {
            debug!("New response template for {}", subject_name);
            subject.templates.push(template);
        }

        state.preferences.reinforce(&subject_name, &response, &keywords);
    } else if rating.is_negative() {
        subject.expertise = subject.expertise.saturating_sub(EXPERTISE_PENALTY);
        subject.corrections.push(CorrectionRecord {
            question,
            poor_response: response,
            rating,
            timestamp: Utc::now(),
            keywords,
        });
    }

    info!("Rated {} response {}/5", subject_name, rating);
    Ok(FeedbackOutcome {
        subject: subject_name,
        rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConfidenceFactors, ConversationTurn};

    fn turn(subject: &str, question: &str, response: &str) -> ConversationTurn {
        ConversationTurn {
            timestamp: Utc::now(),
            question: question.to_string(),
            subject: subject.to_string(),
            keywords: vec!["gravity".to_string()],
            response: response.to_string(),
            feedback: None,
            similar_questions: 0,
            confidence_factors: ConfidenceFactors {
                subject_expertise: 0,
                keyword_familiarity: 0,
                recent_subject_focus: 0,
                average_feedback: 3.0,
            },
        }
    }

    fn rating(value: u8) -> Rating {
        Rating::new(value).unwrap()
    }

    #[test]
    fn test_no_recent_turn() {
        let mut state = LearningState::new();
        assert!(matches!(apply(&mut state, rating(5)), Err(AgentError::NoRecentTurn)));
    }

    #[test]
    fn test_positive_rating_promotes() {
        let mut state = LearningState::new();
        state.history.push(turn("science", "what is gravity", "Regarding gravity: Force of 9 units"));
        let outcome = apply(&mut state, rating(5)).unwrap();

        assert_eq!(outcome.subject, "science");
        let science = state.subjects.get("science").unwrap();
        assert_eq!(science.expertise, 2);
        assert_eq!(science.learned.len(), 1);
        assert_eq!(science.learned[0].usage_count, 1);
        assert_eq!(science.learned[0].avg_feedback(), 5.0);
        assert_eq!(science.templates, vec!["{proper_noun} gravity: {proper_noun} of {number} units"]);
        assert_eq!(state.history[0].feedback, Some(rating(5)));
        assert_eq!(state.preferences.keywords.get("gravity"), Some(&1));
        let style = &state.preferences.styles["science"];
        assert_eq!(style.concise, 1);
        assert_eq!(style.examples, 1);
    }

    #[test]
    fn test_negative_rating_records_correction() {
        let mut state = LearningState::new();
        state.history.push(turn("history", "who built the pyramids", "Nobody knows"));
        apply(&mut state, rating(1)).unwrap();

        let history = state.subjects.get("history").unwrap();
        assert_eq!(history.expertise, 0);
        assert_eq!(history.corrections.len(), 1);
        assert_eq!(history.corrections[0].poor_response, "Nobody knows");
        assert!(history.learned.is_empty());
    }

    #[test]
    fn test_neutral_rating_only_records() {
        let mut state = LearningState::new();
        state.subjects.get_or_create("art").expertise = 4;
        state.history.push(turn("art", "who painted the mona lisa", "Leonardo"));
        apply(&mut state, rating(3)).unwrap();

        let art = state.subjects.get("art").unwrap();
        assert_eq!(art.expertise, 4);
        assert_eq!(art.feedback, vec![rating(3)]);
        assert!(art.learned.is_empty() && art.corrections.is_empty());
    }

    #[test]
    fn test_acknowledgement() {
        let outcome = FeedbackOutcome {
            subject: "science".into(),
            rating: rating(4),
        };
        assert_eq!(
            outcome.acknowledgement(),
            "Thank you for rating my science response! Great! I'll remember this successful approach for similar questions."
        );
    }

    #[test]
    fn test_detailed_style() {
        let mut prefs = UserPreferences::default();
        let long_answer = vec!["word"; 60].join(" ");
        prefs.reinforce("science", &long_answer, &[]);
        assert_eq!(prefs.styles["science"].detailed, 1);
        assert_eq!(prefs.styles["science"].concise, 0);
    }
}
