//! On-disk learning-state record
//!
//! The persisted shape keeps one map per concern (keyed by subject label)
//! rather than nesting everything under subjects, so individual tables can
//! be inspected or edited by hand.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::knowledge::SuccessPatterns;
use crate::learning::{
    ContextEntry, ContextMemory, CorrectionRecord, LearnedResponse, LearningState,
    QuestionPatterns, UserPreferences, WordFrequencies,
};
use crate::types::{ConversationTurn, Rating};

/// Conversation turns kept on disk
pub const MAX_PERSISTED_TURNS: usize = 100;

/// Context entries kept on disk
pub const MAX_PERSISTED_CONTEXT: usize = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(default)]
    pub word_frequencies: WordFrequencies,
    #[serde(default)]
    pub response_feedback: BTreeMap<String, Vec<Rating>>,
    #[serde(default)]
    pub subject_expertise: BTreeMap<String, u32>,
    #[serde(default)]
    pub question_patterns: QuestionPatterns,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub learned_responses: BTreeMap<String, Vec<LearnedResponse>>,
    #[serde(default)]
    pub context_memory: Vec<ContextEntry>,
    #[serde(default)]
    pub user_preferences: UserPreferences,
    #[serde(default)]
    pub dynamic_keywords: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub response_templates: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub correction_memory: BTreeMap<String, Vec<CorrectionRecord>>,
    #[serde(default)]
    pub all_keywords: BTreeSet<String>,
    /// Permanent keywords, including promoted ones
    #[serde(default)]
    pub subject_keywords: BTreeMap<String, BTreeSet<String>>,
    /// Subject registration order
    #[serde(default)]
    pub subject_order: Vec<String>,
    #[serde(default)]
    pub success_patterns: SuccessPatterns,
}

fn tail<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items[items.len().saturating_sub(n)..].to_vec()
}

fn non_empty<T: Clone>(map: &mut BTreeMap<String, Vec<T>>, subject: &str, items: &[T]) {
    if !items.is_empty() {
        map.insert(subject.to_string(), items.to_vec());
    }
}

impl StateRecord {
    /// Snapshot the learning state
    pub fn from_state(state: &LearningState) -> Self {
        let mut record = StateRecord {
            word_frequencies: state.word_frequencies.clone(),
            question_patterns: state.question_patterns.clone(),
            conversation_history: tail(&state.history, MAX_PERSISTED_TURNS),
            context_memory: tail(state.context.entries(), MAX_PERSISTED_CONTEXT),
            user_preferences: state.preferences.clone(),
            all_keywords: state.all_keywords.clone(),
            success_patterns: state.success_patterns.clone(),
            ..Default::default()
        };

        for subject in state.subjects.iter() {
            let name = subject.name.as_str();
            record.subject_order.push(name.to_string());
            record.subject_keywords.insert(name.to_string(), subject.keywords.clone());
            if subject.expertise > 0 {
                record.subject_expertise.insert(name.to_string(), subject.expertise);
            }
            if !subject.dynamic_keywords.is_empty() {
                record.dynamic_keywords.insert(name.to_string(), subject.dynamic_keywords.clone());
            }
            non_empty(&mut record.response_feedback, name, &subject.feedback);
            non_empty(&mut record.learned_responses, name, &subject.learned);
            non_empty(&mut record.response_templates, name, &subject.templates);
            non_empty(&mut record.correction_memory, name, &subject.corrections);
        }

        record
    }

    /// Rebuild the learning state, starting from the built-in subjects
    pub fn into_state(self) -> LearningState {
        let mut state = LearningState::new();

        let mut names = self.subject_order.clone();
        let tables = [
            self.subject_keywords.keys().collect::<Vec<_>>(),
            self.subject_expertise.keys().collect(),
            self.response_feedback.keys().collect(),
            self.learned_responses.keys().collect(),
            self.dynamic_keywords.keys().collect(),
            self.response_templates.keys().collect(),
            self.correction_memory.keys().collect(),
        ];
        for key in tables.into_iter().flatten() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }

        for name in &names {
            let subject = state.subjects.get_or_create(name);
            if let Some(keywords) = self.subject_keywords.get(name) {
                subject.keywords = keywords.clone();
            }
            if let Some(dynamic) = self.dynamic_keywords.get(name) {
                subject.dynamic_keywords = dynamic.difference(&subject.keywords).cloned().collect();
            }
            subject.expertise = self.subject_expertise.get(name).copied().unwrap_or(0);
            subject.feedback = self.response_feedback.get(name).cloned().unwrap_or_default();
            subject.learned = self.learned_responses.get(name).cloned().unwrap_or_default();
            for entry in &mut subject.learned {
                entry.recompute_average();
            }
            subject.templates = self.response_templates.get(name).cloned().unwrap_or_default();
            subject.corrections = self.correction_memory.get(name).cloned().unwrap_or_default();
        }

        state.word_frequencies = self.word_frequencies;
        state.question_patterns = self.question_patterns;
        state.history = self.conversation_history;
        state.context = ContextMemory::from_entries(self.context_memory);
        state.preferences = self.user_preferences;
        state.all_keywords = self.all_keywords;
        state.success_patterns = self.success_patterns;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::store::{upsert, LearnOrigin};

    #[test]
    fn test_state_survives_record() {
        let mut state = LearningState::new();
        state.word_frequencies.observe("gravity gravity");
        state.all_keywords.insert("gravity".into());
        let science = state.subjects.get_or_create("science");
        science.expertise = 7;
        science.keywords.insert("quasar".into());
        science.dynamic_keywords.insert("nebula".into());
        science.feedback.push(Rating::new(4).unwrap());
        upsert(science, "what is gravity", "A force", Rating::new(5).unwrap(), LearnOrigin::Taught, vec![]);
        state.subjects.get_or_create("cooking").expertise = 1;

        let json = serde_json::to_string(&StateRecord::from_state(&state)).unwrap();
        let restored = serde_json::from_str::<StateRecord>(&json).unwrap().into_state();

        let science = restored.subjects.get("science").unwrap();
        assert_eq!(science.expertise, 7);
        assert!(science.keywords.contains("quasar"));
        assert!(science.dynamic_keywords.contains("nebula"));
        assert_eq!(science.learned.len(), 1);
        assert_eq!(science.learned[0].avg_feedback(), 5.0);
        assert_eq!(restored.subjects.expertise("cooking"), 1);
        assert_eq!(restored.subjects.iter().last().map(|s| s.name.as_str()), Some("cooking"));
        assert_eq!(restored.word_frequencies.get("gravity"), 2);
        assert!(restored.all_keywords.contains("gravity"));
    }

    #[test]
    fn test_empty_record_gives_seeded_state() {
        let state: LearningState = serde_json::from_str::<StateRecord>("{}").unwrap().into_state();
        assert!(state.subjects.get("mathematics").unwrap().keywords.contains("calculate"));
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_dynamic_keywords_stay_disjoint() {
        let mut record = StateRecord::default();
        record.subject_keywords.insert("art".into(), ["canvas".to_string()].into());
        record.dynamic_keywords.insert("art".into(), ["canvas".to_string(), "fresco".to_string()].into());
        let state = record.into_state();
        let art = state.subjects.get("art").unwrap();
        assert!(art.keywords.is_disjoint(&art.dynamic_keywords));
        assert!(art.dynamic_keywords.contains("fresco"));
    }
}
