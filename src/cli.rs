//! CLI interface for liam

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::agent::{self, LearningAgent, Session};
use crate::config::Config;
use crate::memory::JsonFileStore;

#[derive(Parser)]
#[command(name = "liam")]
#[command(about = "A question-answering agent that learns from your feedback", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session (default when no command given)
    Chat,
    /// Answer a single question and exit
    Ask {
        /// The question to answer
        question: String,
    },
    /// Start the web interface
    Serve {
        /// Port to listen on (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind to (default: from config)
        #[arg(long)]
        host: Option<String>,
    },
    /// Show learning statistics
    Stats,
    /// Show expertise per subject
    Expertise,
    /// Show learned responses
    Learned,
    /// List every keyword seen so far
    Keywords,
    /// Configure the agent
    Config {
        /// Store the provider API key in the keyring
        #[arg(long, conflicts_with = "delete_api_key")]
        set_api_key: Option<String>,
        /// Remove the stored provider API key
        #[arg(long)]
        delete_api_key: bool,
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Print the default configuration file
        #[arg(long)]
        defaults: bool,
    },
}

/// Build the learning agent on the configured state file
fn load_agent(config: &Config) -> Result<LearningAgent> {
    let store = JsonFileStore::from_config(&config.store).context("Failed to locate state file")?;
    Ok(LearningAgent::new(Box::new(store), config.learning.save_every))
}

/// Build a session with the configured provider
fn load_session(config: &Config) -> Result<Session> {
    let agent = load_agent(config)?;
    let provider = agent::llm::provider_from_config(&config.provider);
    Ok(Session::new(agent, provider, &config.learning))
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        None | Some(Commands::Chat) => {
            agent::interactive::run(load_session(&config)?).await?;
        }
        Some(Commands::Ask { question }) => {
            let mut session = load_session(&config)?;
            let reply = session.ask(&question).await;
            println!("{}", reply.text);
            session.settle().await;
            session.shutdown();
        }
        Some(Commands::Serve { port, host }) => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            crate::server::start(config, &host, port).await?;
        }
        Some(Commands::Stats) => println!("{}", load_agent(&config)?.stats()),
        Some(Commands::Expertise) => println!("{}", load_agent(&config)?.expertise()),
        Some(Commands::Learned) => println!("{}", load_agent(&config)?.learned()),
        Some(Commands::Keywords) => println!("{}", load_agent(&config)?.keywords()),
        Some(Commands::Config { set_api_key, delete_api_key, show, defaults }) => {
            if let Some(key) = set_api_key {
                crate::config::set_api_key(&key)?;
            } else if delete_api_key {
                crate::config::delete_api_key()?;
            } else if show {
                crate::config::show_config()?;
            } else if defaults {
                print!("{}", crate::config::default_config_toml());
            } else {
                println!("Configuration options:");
                println!("  --set-api-key KEY   Store the provider API key in the keyring");
                println!("  --delete-api-key    Remove the stored provider API key");
                println!("  --show              Show current configuration");
                println!("  --defaults          Print the default configuration file");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["liam", "serve", "--port", "8000"]).unwrap();
        match cli.command {
            Some(Commands::Serve { port, host }) => {
                assert_eq!(port, Some(8000));
                assert!(host.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_config_flags() {
        let cli = Cli::try_parse_from(["liam", "config", "--delete-api-key"]).unwrap();
        match cli.command {
            Some(Commands::Config { set_api_key, delete_api_key, show, defaults }) => {
                assert!(set_api_key.is_none());
                assert!(delete_api_key);
                assert!(!show && !defaults);
            }
            _ => panic!("expected config"),
        }

        assert!(Cli::try_parse_from(["liam", "config", "--set-api-key", "k", "--delete-api-key"]).is_err());
    }

    #[test]
    fn test_no_command_is_chat() {
        let cli = Cli::try_parse_from(["liam"]).unwrap();
        assert!(cli.command.is_none());
    }
}
