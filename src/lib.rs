//! Liam - Learning Question-Answering Agent Library
//!
//! An agent that answers free-text questions and improves with use:
//! - Subject classification with dynamically learned keywords
//! - Learned responses from ratings, lessons and remembered facts
//! - A built-in knowledge base and an arithmetic evaluator
//! - Confidence scoring and contextual fallbacks
//! - Escalation to a generative answer provider
//! - JSON persistence of everything learned
//!
//! # Example
//!
//! ```ignore
//! use liam_agent::LearningAgent;
//!
//! let mut agent = LearningAgent::in_memory();
//! let answer = agent.answer("Calculate 2 + 2");
//! println!("{}", answer.text);
//! agent.rate_str("5")?;
//! ```

// Core modules (order matters for cross-module dependencies)
pub mod types;
pub mod error;
pub mod learning;
pub mod knowledge;
pub mod math;
pub mod memory;
pub mod agent;
pub mod config;
pub mod security;
pub mod server;
pub mod cli;

// Re-export commonly used types for convenience
pub use agent::{
    llm::{AnswerProvider, GenerativeClient},
    Answer,
    LearningAgent,
    Reply,
    Session,
    Strategy,
};

pub use error::{AgentError, AgentResult};

pub use learning::LearningState;

pub use memory::{JsonFileStore, StateStore};

pub use config::Config;

pub use security::{
    set_api_key,
    delete_api_key,
};

pub use server::{
    ServerState,
    start as start_server,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - Learning Question-Answering Agent", NAME, VERSION)
}
