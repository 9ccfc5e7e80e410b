//! Configuration management
//!
//! Manages provider settings, learning behaviour, state-file location and
//! the web endpoint address.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generative-answer provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Learning behaviour
    #[serde(default)]
    pub learning: LearningConfig,
    /// Learning-state persistence
    #[serde(default)]
    pub store: StoreConfig,
    /// Web endpoint
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenAI-compatible base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable checked for the API key before the keyring
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "google/gemini-flash-1.5".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Ask the provider about every question in the background and learn its answers
    #[serde(default)]
    pub background_training: bool,
    /// Ask the provider when no local strategy produced an answer
    #[serde(default = "default_true")]
    pub escalate_fallbacks: bool,
    /// Persist state after every N answered questions
    #[serde(default = "default_save_every")]
    pub save_every: usize,
}

fn default_true() -> bool {
    true
}

fn default_save_every() -> usize {
    3
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            background_training: false,
            escalate_fallbacks: default_true(),
            save_every: default_save_every(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// State file; defaults to `learning_state.json` in the data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Resolved state-file path
    pub fn state_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("learning_state.json")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from file, writing defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            let config: Config = toml::from_str(&contents)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = config_path()?;
        let parent = config_path.parent()
            .context("Config path has no parent")?;

        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "liam", "liam")
        .context("Failed to get project directories")
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// Get the data directory path
pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Show current configuration
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("⚙️  Configuration ({})", config_path()?.display());
    println!("\n🤖 Provider:");
    println!("  Base URL:      {}", config.provider.base_url);
    println!("  Model:         {}", config.provider.model);
    println!("  API key env:   {}", config.provider.api_key_env);
    println!("  Max tokens:    {}", config.provider.max_tokens);
    println!(
        "  API key:       {}",
        if crate::security::has_api_key(&config.provider.api_key_env) { "Configured" } else { "Not configured" }
    );
    println!("\n🧠 Learning:");
    println!("  Background training:  {}", if config.learning.background_training { "Enabled" } else { "Disabled" });
    println!("  Escalate fallbacks:   {}", if config.learning.escalate_fallbacks { "Enabled" } else { "Disabled" });
    println!("  Save every:           {} questions", config.learning.save_every);
    println!("\n💾 State file: {}", config.store.state_path()?.display());
    println!("\n🌐 Server: {}:{}", config.server.host, config.server.port);

    Ok(())
}

/// Set API key
pub fn set_api_key(key: &str) -> Result<()> {
    crate::security::set_api_key(key)?;
    println!("API key stored securely.");
    Ok(())
}

/// Remove the stored API key
pub fn delete_api_key() -> Result<()> {
    crate::security::delete_api_key()?;
    println!("Stored API key removed.");
    Ok(())
}

/// Get default configuration as TOML string
pub fn default_config_toml() -> String {
    let config = Config::default();
    toml::to_string_pretty(&config).unwrap_or_else(|_| "# Default configuration\n".to_string())
}
