//! Subject registry
//!
//! Each subject owns its keyword sets, expertise level, feedback ratings,
//! learned responses, response templates and correction records. Subjects are
//! kept in registration order, which is also the classifier's tie-break order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::store::{CorrectionRecord, LearnedResponse};
use crate::types::Rating;

/// Seed keywords for the built-in subjects, in registration order
const SEED_KEYWORDS: &[(&str, &[&str])] = &[
    ("mathematics", &[
        "math", "calculate", "equation", "solve", "number", "algebra", "geometry", "calculus",
        "statistics", "probability", "arithmetic", "formula", "theorem", "plus", "minus",
        "times", "divided",
    ]),
    ("science", &[
        "science", "chemistry", "physics", "biology", "experiment", "theory", "molecule",
        "atom", "cell", "energy", "force", "gravity", "evolution", "dna", "periodic",
        "element", "compound",
    ]),
    ("history", &[
        "history", "historical", "war", "ancient", "civilization", "empire", "revolution",
        "century", "timeline", "culture", "dynasty", "medieval", "renaissance", "battle",
        "king", "queen",
    ]),
    ("geography", &[
        "geography", "country", "capital", "continent", "ocean", "mountain", "river",
        "climate", "population", "city", "nation", "region", "territory", "map", "location",
    ]),
    ("literature", &[
        "literature", "book", "author", "novel", "poem", "poetry", "story", "character",
        "plot", "theme", "writing", "shakespeare", "classic", "chapter", "verse",
    ]),
    ("technology", &[
        "technology", "computer", "software", "internet", "programming", "code",
        "algorithm", "data", "digital", "cyber", "innovation", "hardware", "app", "website",
    ]),
    ("health", &[
        "health", "medicine", "disease", "treatment", "doctor", "hospital", "symptom", "cure",
        "therapy", "nutrition", "exercise", "wellness", "medical", "healthy", "fitness",
    ]),
    ("sports", &[
        "sport", "game", "team", "player", "tournament", "championship", "football",
        "basketball", "soccer", "tennis", "olympic", "athletic", "competition", "match",
        "score",
    ]),
    ("art", &[
        "art", "painting", "sculpture", "artist", "museum", "gallery", "drawing", "creative",
        "design", "color", "masterpiece", "renaissance", "modern", "canvas", "brush",
    ]),
    ("music", &[
        "music", "song", "singer", "instrument", "melody", "rhythm", "composer", "orchestra",
        "band", "concert", "album", "genre", "classical", "note", "harmony",
    ]),
    ("philosophy", &[
        "philosophy", "philosopher", "ethics", "morality", "existence", "consciousness",
        "logic", "reason", "truth", "wisdom", "thought", "belief", "virtue", "justice",
    ]),
    ("economics", &[
        "economics", "economy", "market", "trade", "business", "finance", "money",
        "investment", "profit", "gdp", "inflation", "recession", "commerce", "stock", "bank",
    ]),
    ("psychology", &[
        "psychology", "behavior", "mind", "brain", "mental", "emotion", "personality",
        "cognitive", "therapy", "development", "learning", "memory", "stress", "anxiety",
    ]),
    ("language", &[
        "language", "grammar", "vocabulary", "translate", "pronunciation", "dialect",
        "linguistics", "communication", "speech", "writing", "meaning", "word", "sentence",
    ]),
];

/// A topical classification bucket and everything learned about it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    /// Permanent keywords (seeded or promoted)
    pub keywords: BTreeSet<String>,
    /// Candidate keywords waiting for promotion; disjoint from `keywords`
    pub dynamic_keywords: BTreeSet<String>,
    pub expertise: u32,
    pub feedback: Vec<Rating>,
    pub learned: Vec<LearnedResponse>,
    pub templates: Vec<String>,
    pub corrections: Vec<CorrectionRecord>,
}

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn seeded(name: &str, keywords: &[&str]) -> Self {
        let mut subject = Self::new(name);
        subject.keywords = keywords.iter().map(|k| k.to_string()).collect();
        subject
    }

    /// Mean feedback rating, if any ratings were given
    pub fn average_feedback(&self) -> Option<f64> {
        if self.feedback.is_empty() {
            return None;
        }
        let total: u32 = self.feedback.iter().map(|r| r.value() as u32).sum();
        Some(total as f64 / self.feedback.len() as f64)
    }
}

/// Ordered collection of subjects with get-or-create semantics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectRegistry {
    subjects: Vec<Subject>,
}

impl SubjectRegistry {
    /// Empty registry (no seed subjects)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the built-in subjects
    pub fn seeded() -> Self {
        let subjects = SEED_KEYWORDS
            .iter()
            .map(|(name, keywords)| Subject::seeded(name, keywords))
            .collect();
        Self { subjects }
    }

    pub fn get(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Subject> {
        self.subjects.iter_mut().find(|s| s.name == name)
    }

    /// Fetch a subject, registering an empty one on first use
    pub fn get_or_create(&mut self, name: &str) -> &mut Subject {
        let index = match self.subjects.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                tracing::debug!("Registering new subject '{}'", name);
                self.subjects.push(Subject::new(name));
                self.subjects.len() - 1
            }
        };
        &mut self.subjects[index]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Subjects in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Subject> {
        self.subjects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Expertise of a subject, 0 when unknown
    pub fn expertise(&self, name: &str) -> u32 {
        self.get(name).map(|s| s.expertise).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_order() {
        let registry = SubjectRegistry::seeded();
        let names: Vec<&str> = registry.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"mathematics"));
        assert_eq!(names.last(), Some(&"language"));
        assert!(registry.get("science").unwrap().keywords.contains("gravity"));
    }

    #[test]
    fn test_get_or_create_registers_once() {
        let mut registry = SubjectRegistry::seeded();
        let before = registry.len();
        registry.get_or_create("general").expertise += 1;
        registry.get_or_create("general").expertise += 1;
        assert_eq!(registry.len(), before + 1);
        assert_eq!(registry.expertise("general"), 2);
        assert!(registry.get("general").unwrap().keywords.is_empty());
    }

    #[test]
    fn test_average_feedback() {
        let mut subject = Subject::new("art");
        assert_eq!(subject.average_feedback(), None);
        subject.feedback.push(Rating::new(5).unwrap());
        subject.feedback.push(Rating::new(2).unwrap());
        assert_eq!(subject.average_feedback(), Some(3.5));
    }
}
