//! Learned-response store
//!
//! Per-subject (question, response) pairs retained because of positive
//! feedback, explicit teaching, or captured provider answers. Writes are
//! deduplicated by question similarity and update the existing entry in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::similarity::similarity;
use super::subjects::{Subject, SubjectRegistry};
use crate::types::Rating;

/// A learned entry must be at least this similar to be returned
const SEARCH_THRESHOLD: f64 = 0.4;

/// Writes closer than this update an existing entry
const DEDUP_THRESHOLD: f64 = 0.6;

/// Entries closer than this to a forget target are removed
const FORGET_THRESHOLD: f64 = 0.5;

/// A retained question/answer pair with its feedback statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedResponse {
    pub question: String,
    pub response: String,
    pub feedback_scores: Vec<Rating>,
    avg_feedback: f64,
    pub usage_count: u32,
    pub learned_date: DateTime<Utc>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub user_taught: bool,
}

impl LearnedResponse {
    pub fn new(
        question: impl Into<String>,
        response: impl Into<String>,
        rating: Rating,
        origin: LearnOrigin,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            question: question.into(),
            response: response.into(),
            feedback_scores: vec![rating],
            avg_feedback: rating.value() as f64,
            usage_count: origin.initial_usage(),
            learned_date: Utc::now(),
            keywords,
            user_taught: origin.is_user_taught(),
        }
    }

    /// Mean of `feedback_scores`
    pub fn avg_feedback(&self) -> f64 {
        self.avg_feedback
    }

    /// Record another rating and recompute the mean
    pub fn add_feedback(&mut self, rating: Rating) {
        self.feedback_scores.push(rating);
        self.recompute_average();
    }

    /// Recompute the mean from the score list (used after loading)
    pub fn recompute_average(&mut self) {
        self.avg_feedback = if self.feedback_scores.is_empty() {
            0.0
        } else {
            let total: u32 = self.feedback_scores.iter().map(|r| r.value() as u32).sum();
            total as f64 / self.feedback_scores.len() as f64
        };
    }
}

/// A poorly rated answer kept so it can be reviewed or forgotten
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionRecord {
    pub question: String,
    pub poor_response: String,
    pub rating: Rating,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Why an entry is being written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnOrigin {
    /// Promoted from a rating of 4 or 5
    Feedback,
    /// Explicit teach command
    Taught,
    /// Explicit remember command
    Remembered,
    /// Answer captured from the generative provider
    Captured,
}

impl LearnOrigin {
    fn initial_usage(self) -> u32 {
        match self {
            LearnOrigin::Feedback | LearnOrigin::Captured => 1,
            LearnOrigin::Taught | LearnOrigin::Remembered => 0,
        }
    }

    fn is_user_taught(self) -> bool {
        matches!(self, LearnOrigin::Taught | LearnOrigin::Remembered)
    }
}

/// Result of a learned-response write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

/// Best learned response for a question: similarity weighted by feedback
pub fn search<'a>(subject: &'a Subject, question: &str) -> Option<&'a LearnedResponse> {
    let mut best: Option<(&LearnedResponse, f64)> = None;
    for entry in &subject.learned {
        let sim = similarity(question, &entry.question);
        if sim <= SEARCH_THRESHOLD {
            continue;
        }
        let weighted = sim * (entry.avg_feedback() / 5.0);
        if weighted > best.map_or(0.0, |(_, score)| score) {
            best = Some((entry, weighted));
        }
    }
    if let Some((entry, score)) = best {
        debug!("Learned response hit for '{}' (score {:.2})", entry.question, score);
    }
    best.map(|(entry, _)| entry)
}

/// Insert a learned response, or update the first sufficiently similar one.
///
/// Updates append the rating and bump the usage count. User-taught writes
/// also replace the stored answer with the new one.
pub fn upsert(
    subject: &mut Subject,
    question: &str,
    response: &str,
    rating: Rating,
    origin: LearnOrigin,
    keywords: Vec<String>,
) -> Upsert {
    if let Some(existing) = subject
        .learned
        .iter_mut()
        .find(|entry| similarity(question, &entry.question) > DEDUP_THRESHOLD)
    {
        existing.add_feedback(rating);
        existing.usage_count += 1;
        if origin.is_user_taught() {
            existing.response = response.to_string();
            existing.user_taught = true;
        }
        debug!("Updated learned response '{}' in {}", existing.question, subject.name);
        return Upsert::Updated;
    }

    subject
        .learned
        .push(LearnedResponse::new(question, response, rating, origin, keywords));
    info!("Learned new response for '{}' in {}", question, subject.name);
    Upsert::Created
}

/// Remove every learned and correction entry similar to `topic`.
///
/// Returns the number of entries removed.
pub fn forget(registry: &mut SubjectRegistry, topic: &str) -> usize {
    let mut removed = 0;
    for subject in registry.iter_mut() {
        let before = subject.learned.len() + subject.corrections.len();
        subject
            .learned
            .retain(|entry| similarity(topic, &entry.question) <= FORGET_THRESHOLD);
        subject
            .corrections
            .retain(|record| similarity(topic, &record.question) <= FORGET_THRESHOLD);
        removed += before - (subject.learned.len() + subject.corrections.len());
    }
    if removed > 0 {
        info!("Forgot {} entries related to '{}'", removed, topic);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(value: u8) -> Rating {
        Rating::new(value).unwrap()
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        let mut subject = Subject::new("science");
        let first = upsert(&mut subject, "what is gravity", "A force", rating(5), LearnOrigin::Feedback, vec![]);
        let second = upsert(&mut subject, "what is gravity exactly", "A force", rating(3), LearnOrigin::Feedback, vec![]);
        assert_eq!(first, Upsert::Created);
        assert_eq!(second, Upsert::Updated);
        assert_eq!(subject.learned.len(), 1);
        let entry = &subject.learned[0];
        assert_eq!(entry.usage_count, 2);
        assert_eq!(entry.avg_feedback(), 4.0);
    }

    #[test]
    fn test_average_tracks_mean() {
        let mut entry = LearnedResponse::new("q", "r", rating(5), LearnOrigin::Taught, vec![]);
        assert_eq!(entry.usage_count, 0);
        assert!(entry.user_taught);
        for value in [1, 4, 2] {
            entry.add_feedback(rating(value));
            let mean = entry.feedback_scores.iter().map(|r| r.value() as f64).sum::<f64>()
                / entry.feedback_scores.len() as f64;
            assert_eq!(entry.avg_feedback(), mean);
        }
    }

    #[test]
    fn test_taught_update_replaces_answer() {
        let mut subject = Subject::new("geography");
        upsert(&mut subject, "capital of France", "Lyon", rating(5), LearnOrigin::Taught, vec![]);
        upsert(&mut subject, "capital of France", "Paris", rating(5), LearnOrigin::Taught, vec![]);
        assert_eq!(subject.learned.len(), 1);
        assert_eq!(subject.learned[0].response, "Paris");
    }

    #[test]
    fn test_search_requires_similarity() {
        let mut subject = Subject::new("geography");
        upsert(&mut subject, "capital of France", "Paris", rating(5), LearnOrigin::Taught, vec![]);
        assert_eq!(search(&subject, "what is the capital of France").map(|e| e.response.as_str()), Some("Paris"));
        assert!(search(&subject, "largest ocean on earth").is_none());
    }

    #[test]
    fn test_search_weights_by_feedback() {
        let mut subject = Subject::new("science");
        subject.learned.push(LearnedResponse::new("speed of light", "poor", rating(1), LearnOrigin::Feedback, vec![]));
        subject.learned.push(LearnedResponse::new("the speed of light", "good", rating(5), LearnOrigin::Feedback, vec![]));
        let hit = search(&subject, "speed of light").unwrap();
        assert_eq!(hit.response, "good");
    }

    #[test]
    fn test_forget_counts_removed_entries() {
        let mut registry = SubjectRegistry::seeded();
        let geography = registry.get_or_create("geography");
        upsert(geography, "capital of France is Paris", "Paris", rating(5), LearnOrigin::Taught, vec![]);
        upsert(geography, "largest desert", "Sahara", rating(5), LearnOrigin::Taught, vec![]);
        geography.corrections.push(CorrectionRecord {
            question: "capital of France".into(),
            poor_response: "Lyon".into(),
            rating: rating(1),
            timestamp: Utc::now(),
            keywords: vec![],
        });

        assert_eq!(forget(&mut registry, "capital of France"), 2);
        let geography = registry.get("geography").unwrap();
        assert_eq!(geography.learned.len(), 1);
        assert!(geography.corrections.is_empty());
        assert_eq!(forget(&mut registry, "capital of France"), 0);
    }
}
