//! Chat with the assistant agent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{api::ApiError, handoff::navigation_url};

pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error.";

pub const SUGGESTIONS: [&str; 4] = [
    "How is my heart rate?",
    "What's on my calendar today?",
    "Turn on the lamp",
    "Take me to the nearest pharmacy",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCommand {
    pub message: String,
}

impl AgentCommand {
    /// `None` for blank input, which the chat ignores.
    pub fn from_input(input: &str) -> Option<Self> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }

        Some(Self {
            message: message.to_owned(),
        })
    }
}

/// What `/api/agent_command` answered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum AgentReply {
    Navigate { destination: String, display_text: String },
    Response(String),
    Unknown(Value),
}

impl From<Value> for AgentReply {
    fn from(value: Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_owned);

        if value.get("action").and_then(Value::as_str) == Some("navigate") {
            if let Some(destination) = text("destination") {
                let display_text = text("displayText")
                    .unwrap_or_else(|| format!("Okay, calculating a route to {destination}..."));
                return AgentReply::Navigate {
                    destination,
                    display_text,
                };
            }
        }

        match text("response") {
            Some(response) if !response.is_empty() => AgentReply::Response(response),
            _ => AgentReply::Unknown(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

/// What the page should do after a reply has been put in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    Nothing,
    RefreshSidebar,
    /// Open the location page after the handoff delay.
    Redirect(String),
}

#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    awaiting_reply: bool,
}

impl ChatLog {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while the typing indicator is shown.
    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Records the user's message and returns the command to send, if any.
    pub fn submit(&mut self, input: &str) -> Option<AgentCommand> {
        let command = AgentCommand::from_input(input)?;
        self.push(Sender::User, command.message.clone());
        self.awaiting_reply = true;
        Some(command)
    }

    pub fn receive(&mut self, reply: Result<AgentReply, ApiError>) -> FollowUp {
        self.awaiting_reply = false;

        match reply {
            Ok(AgentReply::Navigate {
                destination,
                display_text,
            }) => {
                self.push(Sender::Assistant, display_text);
                FollowUp::Redirect(navigation_url(&destination))
            }
            Ok(AgentReply::Response(text)) => {
                self.push(Sender::Assistant, text);
                FollowUp::RefreshSidebar
            }
            Ok(AgentReply::Unknown(value)) => {
                tracing::error!("Received an unknown response format from the server: {value}");
                self.push(Sender::Assistant, FALLBACK_REPLY.to_owned());
                FollowUp::Nothing
            }
            Err(err) => {
                tracing::error!("Agent command failed: {err}");
                self.push(Sender::Assistant, FALLBACK_REPLY.to_owned());
                FollowUp::Nothing
            }
        }
    }

    fn push(&mut self, sender: Sender, text: String) {
        self.messages.push(ChatMessage { sender, text });
    }
}
