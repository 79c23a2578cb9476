mod cli;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chat_stream::config::load_config;
use chat_stream::logging::setup_logging;
use chat_stream::session::SinkError;
use chat_stream::{ChatTurn, ChunkSink, OptionsFormat, StreamEvent};
use clap::Parser;
use cli::{Args, Command};
use std::convert::Infallible;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Writes streamed text straight to stdout
struct StdoutSink;

#[async_trait]
impl ChunkSink for StdoutSink {
    async fn send_text(&self, text: &str) -> Result<(), SinkError> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }
}

fn read_reply(file: &Path) -> Result<String> {
    std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read reply from {}", file.display()))
}

/// Split a reply into chunks of `chunk_size` chars, followed by the full text
fn replay_events(text: &str, chunk_size: usize) -> Vec<StreamEvent> {
    let chars: Vec<char> = text.chars().collect();
    let mut events: Vec<StreamEvent> = chars
        .chunks(chunk_size.max(1))
        .map(|chunk| StreamEvent::Text(chunk.iter().collect()))
        .collect();
    events.push(StreamEvent::Message(text.to_string()));
    events
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let format = OptionsFormat::new(config.markers.clone()).context("Invalid option markers")?;

    match args.command {
        Command::Replay {
            file,
            chunk_size,
            author,
        } => {
            let text = read_reply(&file)?;
            let events = replay_events(&text, chunk_size.unwrap_or(config.chunk_size));

            // A replayed file cannot fail midway
            let events = events.into_iter().map(Ok::<_, Infallible>);
            let outcome = ChatTurn::new(format, author, None)
                .run(futures::stream::iter(events), &StdoutSink)
                .await?;

            println!();
            println!("{}", serde_json::to_string_pretty(&outcome.message)?);
        }
        Command::Actions { file } => {
            let text = read_reply(&file)?;
            let actions = format.parse(&format.extract(&text));
            println!("{}", serde_json::to_string_pretty(&actions)?);
        }
    }

    Ok(())
}
