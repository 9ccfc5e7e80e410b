//! Error types for the learning core and its collaborators
//!
//! Core operations return `Result<T, AgentError>`; the CLI and server layers
//! wrap these in `anyhow` with context.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// Feedback was given before any question was answered.
    #[error("No recent response to rate.")]
    NoRecentTurn,

    /// Rating was not an integer.
    #[error("Invalid rating. Use 'rate X' where X is 1-5.")]
    InvalidRating(String),

    /// Rating was an integer outside 1..=5.
    #[error("Please rate between 1-5.")]
    RatingOutOfRange(i64),

    /// Teach/remember called without content.
    #[error("{0}")]
    EmptyInput(&'static str),

    /// Missing credential or unusable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generative provider returned an error status or unusable body.
    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AgentError {
    /// Create a provider error with name and message.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

pub type AgentResult<T> = std::result::Result<T, AgentError>;
