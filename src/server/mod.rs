//! Web server module
//!
//! A small web front end: an HTML form at `/` that posts questions to
//! `/predict`, which answers them with the generative provider.

pub mod http;

use anyhow::{Context, Result};
use axum::{
    response::Html,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::agent::llm::{self, AnswerProvider};
use crate::config::Config;

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub provider: Arc<dyn AnswerProvider>,
}

impl ServerState {
    pub fn new(config: Config, provider: Arc<dyn AnswerProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}

/// Build the application router
pub fn router(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_page))
        .route("/predict", post(http::predict_handler))
        .route("/api/status", get(http::status_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server
pub async fn start(config: Config, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let provider = llm::provider_from_config(&config.provider);
    let model = config.provider.model.clone();
    let app = router(ServerState::new(config, provider));

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("     Liam Web Interface Starting");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("✓ Server binding to: {}", addr);
    println!("✓ Model: {}", model);
    println!();
    println!("🚀 Listening on http://{}", addr);
    println!();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Web server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve the question form
async fn index_page() -> Html<&'static str> {
    Html(r#"<!DOCTYPE html>
<html>
<head>
    <title>Liam AI Web UI</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body {
            font-family: 'Segoe UI', Arial, sans-serif;
            background: linear-gradient(120deg, #f8fafc 0%, #e0e7ef 100%);
            margin: 0;
            min-height: 100vh;
        }
        h1 {
            text-align: center;
            color: #2d3a4b;
            margin: 40px 0 30px;
        }
        #ai-form, #result {
            background: #fff;
            max-width: 420px;
            margin: 0 auto;
            border-radius: 16px;
            box-shadow: 0 4px 24px rgba(44, 62, 80, 0.08);
        }
        #ai-form {
            padding: 32px 28px 24px;
            display: flex;
            flex-direction: column;
            gap: 18px;
        }
        #user-input {
            padding: 12px 14px;
            border: 1px solid #cfd8dc;
            border-radius: 8px;
            font-size: 1.1em;
        }
        button {
            background: #3a8dde;
            color: #fff;
            border: none;
            border-radius: 8px;
            padding: 12px 0;
            font-size: 1.1em;
            font-weight: 600;
            cursor: pointer;
        }
        #result {
            margin-top: 32px;
            padding: 22px 20px;
            min-height: 40px;
            white-space: pre-line;
            word-break: break-word;
        }
    </style>
</head>
<body>
    <h1>Liam AI Web Interface</h1>
    <form id="ai-form">
        <input type="text" id="user-input" placeholder="Enter your input" required>
        <button type="submit">Submit</button>
    </form>
    <div id="result"></div>
    <script>
    document.getElementById('ai-form').onsubmit = async function(e) {
        e.preventDefault();
        const userInput = document.getElementById('user-input').value;
        const response = await fetch('/predict', {
            method: 'POST',
            headers: {'Content-Type': 'application/json'},
            body: JSON.stringify({input: userInput})
        });
        const data = await response.json();
        document.getElementById('result').innerText = data.message || data.error || JSON.stringify(data);
    }
    </script>
</body>
</html>"#)
}
