//! Session escalation and background training against a mocked provider

use async_trait::async_trait;
use liam_agent::config::LearningConfig;
use liam_agent::{AgentError, AgentResult, AnswerProvider, LearningAgent, Session};
use mockall::mock;
use std::sync::Arc;

mock! {
    pub Provider {}

    #[async_trait]
    impl AnswerProvider for Provider {
        async fn ask(&self, prompt: &str) -> AgentResult<String>;
    }
}

fn learning_config(background_training: bool, escalate_fallbacks: bool) -> LearningConfig {
    LearningConfig {
        background_training,
        escalate_fallbacks,
        ..LearningConfig::default()
    }
}

#[tokio::test]
async fn test_fallback_escalates_and_is_captured() {
    let mut provider = MockProvider::new();
    provider
        .expect_ask()
        .withf(|prompt| prompt == "zzqx blorp")
        .times(1)
        .returning(|_| Ok("Blorp is a made-up word.".to_string()));

    let mut session = Session::new(
        LearningAgent::in_memory(),
        Arc::new(provider),
        &learning_config(false, true),
    );

    let reply = session.ask("zzqx blorp").await;
    assert!(reply.escalated);
    assert_eq!(reply.text, "Blorp is a made-up word.");
    assert_eq!(session.agent().state().total_learned(), 1);

    // Answered locally the second time
    let reply = session.ask("zzqx blorp").await;
    assert!(!reply.escalated);
    assert!(reply.text.contains("Blorp is a made-up word."));
}

#[tokio::test]
async fn test_provider_failure_is_reported_not_learned() {
    let mut provider = MockProvider::new();
    provider
        .expect_ask()
        .returning(|_| Err(AgentError::provider("mock", "service unavailable")));

    let mut session = Session::new(
        LearningAgent::in_memory(),
        Arc::new(provider),
        &learning_config(false, true),
    );

    let reply = session.ask("zzqx blorp").await;
    assert!(reply.escalated);
    assert_eq!(reply.text, "Provider error: mock: service unavailable");
    assert_eq!(session.agent().state().total_learned(), 0);
    assert_eq!(session.agent().state().history.len(), 1);
}

#[tokio::test]
async fn test_local_answers_are_not_escalated() {
    let mut provider = MockProvider::new();
    provider.expect_ask().times(0);

    let mut session = Session::new(
        LearningAgent::in_memory(),
        Arc::new(provider),
        &learning_config(false, true),
    );

    let reply = session.ask("Calculate 2 + 2").await;
    assert!(!reply.escalated);
    assert!(reply.text.starts_with("[Mathematics] The sum is 4.0"));
}

#[tokio::test]
async fn test_escalation_can_be_disabled() {
    let mut provider = MockProvider::new();
    provider.expect_ask().times(0);

    let mut session = Session::new(
        LearningAgent::in_memory(),
        Arc::new(provider),
        &learning_config(false, false),
    );

    let reply = session.ask("zzqx blorp").await;
    assert!(!reply.escalated);
    assert!(reply.text.starts_with("[General]"));
}

#[tokio::test]
async fn test_background_training_learns_answers() {
    let mut provider = MockProvider::new();
    provider
        .expect_ask()
        .times(1)
        .returning(|prompt| Ok(format!("Background answer for {}", prompt)));

    let mut session = Session::new(
        LearningAgent::in_memory(),
        Arc::new(provider),
        &learning_config(true, false),
    );

    let reply = session.ask("Explain gravity").await;
    assert!(!reply.escalated);
    assert_eq!(session.agent().state().total_learned(), 0);

    assert_eq!(session.settle().await, 1);
    let science = session.agent().state().subjects.get("science").unwrap();
    assert_eq!(science.learned.len(), 1);
    assert_eq!(science.learned[0].question, "Explain gravity");
    assert_eq!(science.learned[0].response, "Background answer for Explain gravity");

    session.shutdown();
}

#[tokio::test]
async fn test_one_shot_ask_settles_before_shutdown() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let mut provider = MockProvider::new();
    provider
        .expect_ask()
        .times(1)
        .returning(|_| Ok("Tides come from the moon's gravity.".to_string()));

    let store = liam_agent::JsonFileStore::new(path.clone());
    let mut session = Session::new(
        LearningAgent::new(Box::new(store), 3),
        Arc::new(provider),
        &learning_config(true, false),
    );

    session.ask("Explain gravity").await;
    session.settle().await;
    session.shutdown();

    let reloaded = LearningAgent::new(Box::new(liam_agent::JsonFileStore::new(path)), 3);
    let science = reloaded.state().subjects.get("science").unwrap();
    assert_eq!(science.learned.len(), 1);
    assert_eq!(science.learned[0].response, "Tides come from the moon's gravity.");
}

#[tokio::test]
async fn test_settle_without_background_training() {
    let mut provider = MockProvider::new();
    provider.expect_ask().times(0);

    let mut session = Session::new(
        LearningAgent::in_memory(),
        Arc::new(provider),
        &learning_config(false, false),
    );
    session.ask("Explain gravity").await;
    assert_eq!(session.settle().await, 0);
}
