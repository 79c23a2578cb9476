use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Label of the option that hands the conversation over to task execution
pub const EXECUTE_LABEL: &str = "Execute";

/// A suggested reply the user can pick, taken from one `<option>` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAction {
    /// Display text, kept short by the agent (40 chars or less)
    pub label: String,
    /// Where to go when the action is pressed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl MessageAction {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: None,
        }
    }

    pub fn is_execute(&self) -> bool {
        self.label == EXECUTE_LABEL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageStatus {
    InProgress,
    Completed,
    Failed,
}

/// A chat message as it is handed to storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_streaming: bool,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub actions: Vec<MessageAction>,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// A completed message with the given author and text
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author: author.into(),
            title: None,
            text: text.into(),
            is_streaming: false,
            metadata: Map::new(),
            actions: Vec::new(),
            status: MessageStatus::Completed,
            created_at: Utc::now(),
        }
    }

    /// An empty message that is about to be streamed into
    pub fn streaming(author: impl Into<String>, title: Option<String>) -> Self {
        Self {
            title,
            is_streaming: true,
            status: MessageStatus::InProgress,
            ..Self::new(author, "")
        }
    }
}

/// Render messages as `name: text` lines for use in a prompt
pub fn format_transcript(
    messages: &[Message],
    user_id: &str,
    user_name: &str,
    agent_name: &str,
) -> String {
    messages
        .iter()
        .map(|message| {
            let name = if message.author == user_id {
                user_name
            } else {
                agent_name
            };
            format!("{}: {}", name, message.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
