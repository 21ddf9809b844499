use async_trait::async_trait;
use chrono::Local;
use rand::seq::IndexedRandom;

use super::service::{Assistant, AssistantError};

const HELLO_REPLY: &str = "Hello! I'm your chat assistant. How can I help you today?";
const HI_REPLY: &str = "Hi there! What can I do for you?";
const HELP_REPLY: &str = "I can help you with:\n- Chat room navigation\n- General questions\n- Basic assistance\nJust let me know what you need!";

pub const GENERIC_REPLIES: [&str; 4] = [
    "I'm here to help! What would you like to know?",
    "How can I assist you today?",
    "Feel free to ask me anything!",
    "I'm listening! What's on your mind?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Hello,
    Hi,
    Help,
    Time,
}

impl Keyword {
    // Checked in this order, first match wins
    const ALL: [Keyword; 4] = [Keyword::Hello, Keyword::Hi, Keyword::Help, Keyword::Time];

    fn word(self) -> &'static str {
        match self {
            Keyword::Hello => "hello",
            Keyword::Hi => "hi",
            Keyword::Help => "help",
            Keyword::Time => "time",
        }
    }
}

/// Scripted replies used whenever no remote assistant answers in time
#[derive(Debug, Default, Clone)]
pub struct CannedResponder;

impl CannedResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn respond(&self, prompt: &str) -> String {
        let lowered = prompt.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();

        let keyword = Keyword::ALL
            .into_iter()
            .find(|keyword| words.contains(&keyword.word()));

        match keyword {
            Some(Keyword::Hello) => HELLO_REPLY.to_string(),
            Some(Keyword::Hi) => HI_REPLY.to_string(),
            Some(Keyword::Help) => HELP_REPLY.to_string(),
            Some(Keyword::Time) => {
                format!("The current time is {}", Local::now().format("%H:%M"))
            }
            None => GENERIC_REPLIES
                .choose(&mut rand::rng())
                .copied()
                .unwrap_or(GENERIC_REPLIES[0])
                .to_string(),
        }
    }
}

#[async_trait]
impl Assistant for CannedResponder {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        Ok(self.respond(prompt))
    }

    fn name(&self) -> &'static str {
        "CannedResponder"
    }
}
