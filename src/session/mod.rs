//! Drives one chat turn: streams visible text to the client while collecting
//! the options block, then produces the message record for storage.

use crate::options::OptionsFormat;
use crate::streaming::TagStreamProcessor;
use crate::types::{Message, MessageAction, MessageStatus};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use thiserror::Error;
use tracing::{debug, error, info};


/// Sentinel telling the client that the reply is complete
pub const END_OF_MESSAGE: &str = "<end>";

/// Events produced by the agent while it answers
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A chunk of reply text
    Text(String),
    /// A tool invocation the client may render
    ToolCall(serde_json::Value),
    /// The fully assembled reply text
    Message(String),
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Connection closed")]
    Closed,
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum TurnError {
    #[error("Turn cancelled before the reply was complete")]
    Cancelled,
    #[error("Agent stream failed: {error}")]
    Agent {
        error: String,
        /// The message marked as failed, for storing
        message: Box<Message>,
    },
    #[error("Failed to encode actions: {0}")]
    Json(#[from] serde_json::Error),
}

/// Transport the visible text is forwarded to
#[async_trait]
pub trait ChunkSink: Send + Sync {
    /// Forward text to the client
    async fn send_text(&self, text: &str) -> Result<(), SinkError>;

    /// Check if the client still wants the reply
    fn should_continue(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Completed message with the options block removed and actions attached
    pub message: Message,
    /// Whether the user was offered to execute the task
    pub requests_execution: bool,
}

/// One assistant reply streamed to a client
pub struct ChatTurn {
    format: OptionsFormat,
    message: Message,
}

impl ChatTurn {
    pub fn new(format: OptionsFormat, author: impl Into<String>, title: Option<String>) -> Self {
        Self {
            format,
            message: Message::streaming(author, title),
        }
    }

    /// The in-progress record, e.g. for storing before the stream starts
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Consume the agent's events until the stream ends.
    ///
    /// Send failures are logged and otherwise ignored so the message can
    /// still be completed. When the sink stops wanting output the turn is
    /// abandoned together with anything held back. An error from the agent
    /// ends the turn with the message marked as failed.
    pub async fn run<S, E>(
        self,
        events: S,
        sink: &dyn ChunkSink,
    ) -> Result<TurnOutcome, TurnError>
    where
        S: Stream<Item = Result<StreamEvent, E>>,
        E: Display,
    {
        let format = self.format;
        let mut message = self.message;
        let mut processor = TagStreamProcessor::new(format.markers().open.clone());
        let mut visible = String::new();
        let mut final_text = None;

        let mut events = std::pin::pin!(events);
        while let Some(event) = events.next().await {
            if !sink.should_continue() {
                info!("Chat turn for message {} cancelled", message.id);
                return Err(TurnError::Cancelled);
            }

            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    error!("Agent stream for message {} failed: {}", message.id, e);
                    forward(sink, END_OF_MESSAGE).await;

                    message.text = visible.trim().to_string();
                    message.status = MessageStatus::Failed;
                    message.is_streaming = false;
                    return Err(TurnError::Agent {
                        error: e.to_string(),
                        message: Box::new(message),
                    });
                }
            };

            match event {
                StreamEvent::Text(chunk) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    if let Some(text) = processor.process(&chunk) {
                        visible.push_str(&text);
                        forward(sink, &text).await;
                    }
                }
                StreamEvent::ToolCall(payload) => {
                    forward(sink, &format!("<tool_call>{payload}</tool_call>")).await;
                }
                StreamEvent::Message(text) => {
                    final_text = Some(format.trim(&text));
                }
            }
        }

        let outcome = processor.finish();
        if let Some(flushed) = outcome.flushed {
            visible.push_str(&flushed);
            forward(sink, &flushed).await;
        }

        let actions = outcome
            .block
            .map(|block| format.parse(&block))
            .unwrap_or_default();
        if !actions.is_empty() {
            let json = serde_json::to_string(&actions)?;
            forward(sink, &format!("<actions>{json}</actions>")).await;
        }
        forward(sink, END_OF_MESSAGE).await;

        debug!(
            "Chat turn for message {} finished with {} action(s)",
            message.id,
            actions.len()
        );

        message.text = final_text.unwrap_or_else(|| visible.trim().to_string());
        message.actions = actions;
        message.status = MessageStatus::Completed;
        message.is_streaming = false;

        let requests_execution = message.actions.iter().any(MessageAction::is_execute);
        Ok(TurnOutcome {
            message,
            requests_execution,
        })
    }
}

async fn forward(sink: &dyn ChunkSink, text: &str) {
    if let Err(e) = sink.send_text(text).await {
        // The client may be gone already; the turn still completes
        debug!("Failed to forward text to client: {}", e);
    }
}
