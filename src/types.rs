//! Shared types used across modules
//!
//! This module contains types that are used by multiple modules
//! to avoid circular dependencies.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::error::AgentError;

/// Subject used when nothing scores above zero
pub const GENERAL_SUBJECT: &str = "general";

/// A user rating, guaranteed to be in 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, AgentError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AgentError::RatingOutOfRange(value.into()))
        }
    }

    /// Highest rating, given to taught and captured answers
    pub const fn top() -> Self {
        Self(Self::MAX)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 >= 4
    }

    pub fn is_negative(self) -> bool {
        self.0 <= 2
    }
}

impl TryFrom<u8> for Rating {
    type Error = AgentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

impl std::str::FromStr for Rating {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| AgentError::InvalidRating(trimmed.to_string()))?;
        u8::try_from(value)
            .map_err(|_| AgentError::RatingOutOfRange(value))
            .and_then(Rating::new)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inputs to the confidence score, captured per answer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub subject_expertise: u32,
    pub keyword_familiarity: u64,
    pub recent_subject_focus: usize,
    pub average_feedback: f64,
}

/// One answered question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub timestamp: DateTime<Utc>,
    pub question: String,
    pub subject: String,
    pub keywords: Vec<String>,
    pub response: String,
    #[serde(default)]
    pub feedback: Option<Rating>,
    #[serde(default)]
    pub similar_questions: usize,
    pub confidence_factors: ConfidenceFactors,
}

/// Title-case a subject label for display ("world_history" -> "World History")
pub fn title_case(label: &str) -> String {
    label
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(5).unwrap().value(), 5);
        assert!(Rating::new(4).unwrap().is_positive());
        assert!(Rating::new(2).unwrap().is_negative());
        let neutral = Rating::new(3).unwrap();
        assert!(!neutral.is_positive() && !neutral.is_negative());
    }

    #[test]
    fn test_rating_parse() {
        assert_eq!("4".parse::<Rating>().unwrap().value(), 4);
        assert!(matches!("four".parse::<Rating>(), Err(AgentError::InvalidRating(_))));
        assert!(matches!("4.5".parse::<Rating>(), Err(AgentError::InvalidRating(_))));
        assert!(matches!("-1".parse::<Rating>(), Err(AgentError::RatingOutOfRange(-1))));
        assert!(matches!("9".parse::<Rating>(), Err(AgentError::RatingOutOfRange(9))));
        assert!(matches!("300".parse::<Rating>(), Err(AgentError::RatingOutOfRange(300))));
    }

    #[test]
    fn test_rating_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Rating>("3").is_ok());
        assert!(serde_json::from_str::<Rating>("8").is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("mathematics"), "Mathematics");
        assert_eq!(title_case("speed_of_light"), "Speed Of Light");
        assert_eq!(title_case(""), "");
    }
}
