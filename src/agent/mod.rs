//! Agent module - the learning agent and its conversational front ends

pub mod background;
pub mod formatter;
pub mod interactive;
pub mod llm;
pub mod pipeline;
pub mod reports;
pub mod session;

use tracing::{debug, info};

use crate::error::{AgentError, AgentResult};
use crate::knowledge::KnowledgeBase;
use crate::learning::{self, classify, feedback, keywords, store, LearnOrigin, LearningState};
use crate::memory::{self, NoopStore, StateStore};
use crate::types::{Rating, GENERAL_SUBJECT};

pub use background::{BackgroundTrainer, TrainedAnswer};
pub use llm::{AnswerProvider, GenerativeClient};
pub use pipeline::{Answer, Strategy};
pub use session::{Reply, Session};

/// Expertise awarded for a taught fact
const TEACH_REWARD: u32 = 3;

/// Default number of answered questions between saves
pub const DEFAULT_SAVE_EVERY: usize = 3;

/// Learning agent: answers questions, takes feedback and lessons, and
/// persists what it learned.
pub struct LearningAgent {
    state: LearningState,
    knowledge: KnowledgeBase,
    store: Box<dyn StateStore>,
    save_every: usize,
}

impl LearningAgent {
    /// Create an agent backed by `store`, loading any saved state
    pub fn new(store: Box<dyn StateStore>, save_every: usize) -> Self {
        let state = memory::load_state(store.as_ref());
        info!(
            "Loaded learning state: {} turns, {} learned responses",
            state.history.len(),
            state.total_learned()
        );
        Self {
            state,
            knowledge: KnowledgeBase::seeded(),
            store,
            save_every: save_every.max(1),
        }
    }

    /// Agent that never persists
    pub fn in_memory() -> Self {
        Self::new(Box::new(NoopStore), DEFAULT_SAVE_EVERY)
    }

    pub fn state(&self) -> &LearningState {
        &self.state
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Answer a question, saving every few answered questions
    pub fn answer(&mut self, question: &str) -> Answer {
        let answer = pipeline::respond(&mut self.state, &self.knowledge, question);
        if self.state.history.len() % self.save_every == 0 {
            self.save();
        }
        answer
    }

    /// Rate the most recent answer
    pub fn rate(&mut self, rating: Rating) -> AgentResult<String> {
        let outcome = feedback::apply(&mut self.state, rating)?;
        self.save();
        Ok(outcome.acknowledgement())
    }

    /// Parse and apply a rating; nothing changes if it is invalid
    pub fn rate_str(&mut self, input: &str) -> AgentResult<String> {
        let rating: Rating = input.trim().parse()?;
        self.rate(rating)
    }

    /// Learn `information` as the answer for `topic`
    pub fn teach(&mut self, topic: &str, information: &str) -> AgentResult<String> {
        let (topic, information) = (topic.trim(), information.trim());
        if topic.is_empty() || information.is_empty() {
            return Err(AgentError::EmptyInput(
                "Please provide both a topic and the information you'd like to teach me!",
            ));
        }

        let tokens = self.state.word_frequencies.observe(topic);
        let subject_name = classify(&self.state.subjects, &self.state.context, &tokens);
        let topic_keywords = keywords::extract_keywords(topic, &mut self.state.all_keywords);

        let subject = self.state.subjects.get_or_create(&subject_name);
        let outcome = store::upsert(
            subject,
            topic,
            information,
            Rating::top(),
            LearnOrigin::Taught,
            topic_keywords,
        );
        subject.expertise += TEACH_REWARD;
        keywords::learn_dynamic_keywords(&tokens, subject, &self.state.word_frequencies);
        info!("Taught {} fact about '{}' ({:?})", subject_name, topic, outcome);

        self.save();
        Ok(format!(
            "Thank you for teaching me about {}! I've learned: {}\nI've categorized this under {} and will remember it for future questions.",
            topic, information, subject_name
        ))
    }

    /// Store a free-form fact under the general subject
    pub fn remember(&mut self, fact: &str) -> AgentResult<String> {
        let fact = fact.trim();
        if fact.is_empty() {
            return Err(AgentError::EmptyInput("Please provide something for me to remember!"));
        }

        let fact_keywords = keywords::extract_keywords(fact, &mut self.state.all_keywords);
        let subject = self.state.subjects.get_or_create(GENERAL_SUBJECT);
        store::upsert(subject, fact, fact, Rating::top(), LearnOrigin::Remembered, fact_keywords);

        self.save();
        Ok(format!("I've remembered: '{}'!", fact))
    }

    /// Remove learned responses and corrections about `topic`
    pub fn forget(&mut self, topic: &str) -> String {
        let topic = topic.trim();
        let removed = store::forget(&mut self.state.subjects, topic);
        self.save();

        if removed > 0 {
            format!("I've removed {} learned responses related to '{}'.", removed, topic)
        } else {
            format!("I couldn't find any learned responses related to '{}' to remove.", topic)
        }
    }

    /// Keep an externally produced answer as a learned response
    pub fn capture_answer(&mut self, question: &str, answer: &str) {
        let (question, answer) = (question.trim(), answer.trim());
        if question.is_empty() || answer.is_empty() {
            return;
        }

        let tokens = learning::tokenize(question);
        let subject_name = classify(&self.state.subjects, &self.state.context, &tokens);
        let question_keywords = keywords::extract_keywords(question, &mut self.state.all_keywords);
        let subject = self.state.subjects.get_or_create(&subject_name);
        let outcome = store::upsert(
            subject,
            question,
            answer,
            Rating::top(),
            LearnOrigin::Captured,
            question_keywords,
        );
        debug!("Captured answer for '{}' under {} ({:?})", question, subject_name, outcome);
        self.save();
    }

    /// Persist the learning state now
    pub fn save(&self) {
        memory::save_state(self.store.as_ref(), &self.state);
    }

    pub fn stats(&self) -> String {
        reports::stats(&self.state)
    }

    pub fn expertise(&self) -> String {
        reports::expertise(&self.state)
    }

    pub fn learned(&self) -> String {
        reports::learned(&self.state)
    }

    pub fn keywords(&self) -> String {
        reports::keywords(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teach_is_idempotent() {
        let mut agent = LearningAgent::in_memory();
        agent.teach("photosynthesis", "Plants turn light into sugar").unwrap();
        agent.teach("photosynthesis", "Plants turn light into sugar").unwrap();

        let matches: Vec<_> = agent
            .state()
            .subjects
            .iter()
            .flat_map(|s| s.learned.iter())
            .filter(|entry| entry.question == "photosynthesis")
            .collect();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].user_taught);
        assert_eq!(matches[0].avg_feedback(), 5.0);
    }

    #[test]
    fn test_teach_rewards_expertise() {
        let mut agent = LearningAgent::in_memory();
        let reply = agent.teach("gravity on mars", "About 3.7 m/s²").unwrap();
        assert!(reply.contains("I've categorized this under science"));
        assert_eq!(agent.state().subjects.expertise("science"), 3);
    }

    #[test]
    fn test_empty_teach_changes_nothing() {
        let mut agent = LearningAgent::in_memory();
        let err = agent.teach("  ", "something").unwrap_err();
        assert!(matches!(err, AgentError::EmptyInput(_)));
        assert_eq!(agent.state().total_learned(), 0);
        assert!(agent.state().word_frequencies.is_empty());
    }

    #[test]
    fn test_remember_fact() {
        let mut agent = LearningAgent::in_memory();
        assert_eq!(
            agent.remember("my cat is called Miso").unwrap(),
            "I've remembered: 'my cat is called Miso'!"
        );
        let general = agent.state().subjects.get(GENERAL_SUBJECT).unwrap();
        assert_eq!(general.learned.len(), 1);
        assert_eq!(general.learned[0].usage_count, 0);
        assert!(agent.remember("").is_err());
    }

    #[test]
    fn test_forget_reports_count() {
        let mut agent = LearningAgent::in_memory();
        agent.teach("capital of France", "Paris").unwrap();
        assert_eq!(
            agent.forget("capital of France"),
            "I've removed 1 learned responses related to 'capital of France'."
        );
        assert_eq!(
            agent.forget("capital of France"),
            "I couldn't find any learned responses related to 'capital of France' to remove."
        );
    }

    #[test]
    fn test_invalid_rating_leaves_state_untouched() {
        let mut agent = LearningAgent::in_memory();
        agent.answer("Explain gravity");
        let before = agent.state().subjects.expertise("science");

        assert!(matches!(agent.rate_str("7"), Err(AgentError::RatingOutOfRange(7))));
        assert!(matches!(agent.rate_str("great"), Err(AgentError::InvalidRating(_))));
        assert_eq!(agent.state().subjects.expertise("science"), before);
        assert!(agent.state().last_turn().unwrap().feedback.is_none());
    }

    #[test]
    fn test_rate_without_answer() {
        let mut agent = LearningAgent::in_memory();
        assert!(matches!(agent.rate_str("5"), Err(AgentError::NoRecentTurn)));
    }

    #[test]
    fn test_capture_answer_is_learned() {
        let mut agent = LearningAgent::in_memory();
        agent.capture_answer("who painted the mona lisa", "Leonardo da Vinci");
        let entry = agent
            .state()
            .subjects
            .iter()
            .flat_map(|s| s.learned.iter())
            .find(|entry| entry.question == "who painted the mona lisa")
            .unwrap();
        assert_eq!(entry.response, "Leonardo da Vinci");
        assert_eq!(entry.usage_count, 1);
        assert!(!entry.user_taught);

        agent.capture_answer("", "ignored");
        assert_eq!(agent.state().total_learned(), 1);
    }
}
