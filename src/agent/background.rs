//! Background training
//!
//! Every question can also be sent to the answer provider in the background.
//! Answers arrive on a queue that the session drains before reading the next
//! question, so the learning state only ever has one writer.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::llm::AnswerProvider;

/// A provider answer waiting to be learned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainedAnswer {
    pub question: String,
    pub answer: String,
}

/// Spawns provider requests and collects their answers
pub struct BackgroundTrainer {
    provider: Arc<dyn AnswerProvider>,
    tx: mpsc::UnboundedSender<TrainedAnswer>,
    rx: mpsc::UnboundedReceiver<TrainedAnswer>,
    task_handles: Vec<JoinHandle<()>>,
}

impl BackgroundTrainer {
    pub fn new(provider: Arc<dyn AnswerProvider>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            provider,
            tx,
            rx,
            task_handles: Vec::new(),
        }
    }

    /// Ask the provider about `question` without waiting for the answer
    pub fn spawn(&mut self, question: &str) {
        let provider = self.provider.clone();
        let tx = self.tx.clone();
        let question = question.to_string();

        self.task_handles.retain(|handle| !handle.is_finished());
        self.task_handles.push(tokio::spawn(async move {
            match provider.ask(&question).await {
                Ok(answer) => {
                    let _ = tx.send(TrainedAnswer { question, answer });
                }
                Err(e) => debug!("Background training for '{}' failed: {}", question, e),
            }
        }));
    }

    /// Answers that have arrived so far
    pub fn drain(&mut self) -> Vec<TrainedAnswer> {
        let mut answers = Vec::new();
        while let Ok(answer) = self.rx.try_recv() {
            answers.push(answer);
        }
        answers
    }

    /// Number of requests still running
    pub fn pending(&self) -> usize {
        self.task_handles.iter().filter(|handle| !handle.is_finished()).count()
    }

    /// Wait for every running request to finish
    pub async fn wait_idle(&mut self) {
        for handle in self.task_handles.drain(..) {
            let _ = handle.await;
        }
    }

    /// Abort every running request
    pub fn shutdown(&mut self) {
        debug!("Aborting {} background training tasks", self.task_handles.len());
        for handle in self.task_handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for BackgroundTrainer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
