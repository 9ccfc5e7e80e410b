//! Interactive chat loop
//!
//! Reads commands with rustyline, dispatches them to the session and prints
//! the agent's replies.

use anyhow::{Context, Result};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;

use super::session::Session;

pub const AGENT_NAME: &str = "Liam";

/// Words completed at the prompt
const COMMANDS: &[&str] = &[
    "quit", "stats", "expertise", "learned", "keywords", "teach ", "forget ", "rate ",
    "remember this: ",
];

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Stats,
    Expertise,
    Learned,
    Keywords,
    Teach { topic: String, information: String },
    Forget(String),
    Rate(String),
    Remember(String),
    Ask(String),
}

/// Strip a case-insensitive command prefix
fn strip_prefix_ci<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &input[prefix.len()..])
}

/// Split `teach` arguments into topic and information.
///
/// `topic | information` and `topic: information` allow multi-word topics;
/// otherwise the first word is the topic.
fn split_lesson(rest: &str) -> (String, String) {
    let rest = rest.trim();
    let (topic, information) = if let Some((topic, info)) = rest.split_once(" | ") {
        (topic, info)
    } else if let Some((topic, info)) = rest.split_once(':') {
        (topic, info)
    } else {
        rest.split_once(char::is_whitespace).unwrap_or((rest, ""))
    };
    (topic.trim().to_string(), information.trim().to_string())
}

impl Command {
    pub fn parse(input: &str) -> Command {
        let input = input.trim();
        match input.to_lowercase().as_str() {
            "quit" | "exit" => return Command::Quit,
            "stats" => return Command::Stats,
            "expertise" => return Command::Expertise,
            "learned" => return Command::Learned,
            "keywords" => return Command::Keywords,
            _ => {}
        }

        if let Some(rest) = strip_prefix_ci(input, "teach ") {
            let (topic, information) = split_lesson(rest);
            Command::Teach { topic, information }
        } else if let Some(rest) = strip_prefix_ci(input, "forget ") {
            Command::Forget(rest.trim().to_string())
        } else if let Some(rest) = strip_prefix_ci(input, "rate ") {
            Command::Rate(rest.trim().to_string())
        } else if let Some(rest) = strip_prefix_ci(input, "remember this:") {
            Command::Remember(rest.trim().to_string())
        } else {
            Command::Ask(input.to_string())
        }
    }
}

/// Prompt helper completing command words
struct CommandHelper;

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let partial = line[..pos].to_lowercase();
        let matches = COMMANDS
            .iter()
            .filter(|c| !partial.is_empty() && c.starts_with(&partial))
            .map(|c| Pair {
                display: c.to_string(),
                replacement: c[partial.len()..].to_string(),
            })
            .collect();
        Ok((pos, matches))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if line.is_empty() || pos < line.len() {
            return None;
        }
        let lower = line.to_lowercase();
        COMMANDS
            .iter()
            .find(|c| c.starts_with(&lower) && c.len() > lower.len())
            .map(|c| c[lower.len()..].to_string())
    }
}

impl Highlighter for CommandHelper {}
impl Validator for CommandHelper {}
impl Helper for CommandHelper {}

fn print_banner() {
    println!("{}", "=".repeat(80));
    println!("🤖 Welcome to {}! I'm an AI that learns from our conversations.", AGENT_NAME);
    println!("🧠 I remember previous questions, learn from your feedback, and improve over time!");
    println!("📚 Subjects I know: Math, Science, History, Geography, Technology, Health, and more!");
    println!("\n💬 Available Commands:");
    println!("  • 'quit' - Exit the chat");
    println!("  • 'stats' - Show detailed statistics and learning metrics");
    println!("  • 'expertise' - Show my current knowledge levels");
    println!("  • 'learned' - Show my learned responses");
    println!("  • 'teach [topic] [information]' - Teach me something new");
    println!("  • 'forget [topic]' - Remove incorrect information");
    println!("  • 'rate X' - Rate my last response (1-5)");
    println!("  • 'remember this: [fact]' - Remember a fact for later recall");
    println!("  • 'keywords' - Show all stored keywords");
    println!("\n⭐ Rate my answers to help me learn what works best!");
    println!("{}", "=".repeat(80));
}

/// Run one command; returns false when the session should end
pub async fn dispatch(session: &mut Session, command: Command) -> bool {
    match command {
        Command::Quit => {
            println!("\n👋 {}: Thank you for helping me learn! I'll remember our conversation.", AGENT_NAME);
            return false;
        }
        Command::Stats => println!("\n📊 {}: {}", AGENT_NAME, session.agent().stats()),
        Command::Expertise => println!("\n🧠 {}: {}", AGENT_NAME, session.agent().expertise()),
        Command::Learned => println!("\n🎓 {}: {}", AGENT_NAME, session.agent().learned()),
        Command::Keywords => println!("\n🔑 {}: {}", AGENT_NAME, session.agent().keywords()),
        Command::Teach { topic, information } => {
            match session.agent_mut().teach(&topic, &information) {
                Ok(reply) => println!("\n👨‍🏫 {}: {}", AGENT_NAME, reply),
                Err(_) => println!("\n❌ {}: Please use format: teach [topic] [information]", AGENT_NAME),
            }
        }
        Command::Forget(topic) => println!("\n🗑️ {}: {}", AGENT_NAME, session.agent_mut().forget(&topic)),
        Command::Rate(value) => match session.agent_mut().rate_str(&value) {
            Ok(reply) => println!("\n✅ {}: {}", AGENT_NAME, reply),
            Err(e) => println!("\n❌ {}: {}", AGENT_NAME, e),
        },
        Command::Remember(fact) => match session.agent_mut().remember(&fact) {
            Ok(reply) => println!("\n💾 {}: {}", AGENT_NAME, reply),
            Err(e) => println!("\n❌ {}: {}", AGENT_NAME, e),
        },
        Command::Ask(question) => {
            let reply = session.ask(&question).await;
            println!("\n🤖 {}: {}", AGENT_NAME, reply.text);
            if reply.escalated {
                println!("\n💭 How was my answer? Type 'rate X' (1-5) to help me learn!");
            }
        }
    }
    true
}

/// Run the interactive chat until quit or end of input
pub async fn run(mut session: Session) -> Result<()> {
    print_banner();

    let config = rustyline::Config::builder()
        .completion_type(rustyline::CompletionType::List)
        .edit_mode(rustyline::EditMode::Emacs)
        .auto_add_history(true)
        .build();
    let mut rl = rustyline::Editor::<CommandHelper, rustyline::history::DefaultHistory>::with_config(config)
        .context("Failed to initialize line editor")?;
    rl.set_helper(Some(CommandHelper));

    loop {
        match rl.readline("\n🤔 Ask me anything (or use a command): ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if !dispatch(&mut session, Command::parse(input)).await {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\n👋 {}: Thank you for helping me learn! I'll remember our conversation.", AGENT_NAME);
                break;
            }
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }

    session.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("  STATS "), Command::Stats);
        assert_eq!(Command::parse("keywords"), Command::Keywords);
        assert_eq!(Command::parse("rate 5"), Command::Rate("5".into()));
        assert_eq!(Command::parse("forget capital of France"), Command::Forget("capital of France".into()));
        assert_eq!(
            Command::parse("Remember this: my cat is Miso"),
            Command::Remember("my cat is Miso".into())
        );
        assert_eq!(Command::parse("What is gravity?"), Command::Ask("What is gravity?".into()));
    }

    #[test]
    fn test_parse_teach_forms() {
        assert_eq!(
            Command::parse("teach photosynthesis Plants make sugar from light"),
            Command::Teach {
                topic: "photosynthesis".into(),
                information: "Plants make sugar from light".into()
            }
        );
        assert_eq!(
            Command::parse("teach capital of France | Paris"),
            Command::Teach {
                topic: "capital of France".into(),
                information: "Paris".into()
            }
        );
        assert_eq!(
            Command::parse("teach speed of sound: 343 m/s in air"),
            Command::Teach {
                topic: "speed of sound".into(),
                information: "343 m/s in air".into()
            }
        );
        assert_eq!(
            Command::parse("teach lonely"),
            Command::Teach {
                topic: "lonely".into(),
                information: String::new()
            }
        );
    }

    #[test]
    fn test_prefix_is_case_insensitive() {
        assert_eq!(strip_prefix_ci("TEACH x y", "teach "), Some("x y"));
        assert_eq!(strip_prefix_ci("te", "teach "), None);
        assert_eq!(strip_prefix_ci("ratex", "rate "), None);
    }
}
