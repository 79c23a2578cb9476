//! Streaming support for chat replies that end in an `<options>` block
//!
//! - [`streaming`] hides the block from the token stream as it arrives
//! - [`options`] turns the collected block into [`types::MessageAction`]s
//! - [`session`] drives one chat turn against a client transport

pub mod config;
pub mod logging;
pub mod options;
pub mod session;
pub mod streaming;
pub mod types;

pub use options::{get_options_block, parse_options_block, trim_options_block, OptionsFormat};
pub use session::{ChatTurn, ChunkSink, StreamEvent, TurnOutcome};
pub use streaming::TagStreamProcessor;
pub use types::{Message, MessageAction, MessageStatus};
