//! Conversational session
//!
//! Wraps a [`LearningAgent`] with the generative answer provider: fallback
//! answers are escalated to the provider, and answers from background
//! training are learned before the next question is read.

use std::sync::Arc;
use tracing::{info, warn};

use super::background::BackgroundTrainer;
use super::llm::AnswerProvider;
use super::LearningAgent;
use crate::config::LearningConfig;

/// What the user sees for one question
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    /// The provider answered instead of the local pipeline
    pub escalated: bool,
}

pub struct Session {
    agent: LearningAgent,
    provider: Arc<dyn AnswerProvider>,
    trainer: Option<BackgroundTrainer>,
    escalate_fallbacks: bool,
}

impl Session {
    pub fn new(agent: LearningAgent, provider: Arc<dyn AnswerProvider>, config: &LearningConfig) -> Self {
        let trainer = config
            .background_training
            .then(|| BackgroundTrainer::new(provider.clone()));
        Self {
            agent,
            provider,
            trainer,
            escalate_fallbacks: config.escalate_fallbacks,
        }
    }

    pub fn agent(&self) -> &LearningAgent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut LearningAgent {
        &mut self.agent
    }

    /// Learn any answers background training has produced so far
    pub fn absorb_background(&mut self) -> usize {
        let Some(trainer) = self.trainer.as_mut() else {
            return 0;
        };
        let answers = trainer.drain();
        for trained in &answers {
            self.agent.capture_answer(&trained.question, &trained.answer);
        }
        if !answers.is_empty() {
            info!("Learned {} answers from background training", answers.len());
        }
        answers.len()
    }

    /// Answer a question, escalating to the provider when nothing local fits
    pub async fn ask(&mut self, question: &str) -> Reply {
        self.absorb_background();

        let answer = self.agent.answer(question);
        let reply = if answer.is_fallback() && self.escalate_fallbacks {
            match self.provider.ask(question).await {
                Ok(text) => {
                    self.agent.capture_answer(question, &text);
                    Reply { text, escalated: true }
                }
                Err(e) => {
                    warn!("Answer provider failed: {}", e);
                    Reply {
                        text: e.to_string(),
                        escalated: true,
                    }
                }
            }
        } else {
            Reply {
                text: answer.text,
                escalated: false,
            }
        };

        if let Some(trainer) = self.trainer.as_mut() {
            trainer.spawn(question);
        }
        reply
    }

    /// Wait for background training to finish and learn its answers
    pub async fn settle(&mut self) -> usize {
        if let Some(trainer) = self.trainer.as_mut() {
            trainer.wait_idle().await;
        }
        self.absorb_background()
    }

    /// Stop background work and save
    pub fn shutdown(&mut self) {
        if let Some(trainer) = self.trainer.as_mut() {
            trainer.shutdown();
        }
        self.agent.save();
    }
}
