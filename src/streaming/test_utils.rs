//! Common test utilities for the streaming processor

use super::{StreamOutcome, TagStreamProcessor};

/// Helper function to split text into small chunks for testing tag handling
pub fn chunk_str(s: &str, chunk_size: usize) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut chunks = Vec::new();

    for chunk in chars.chunks(chunk_size) {
        chunks.push(chunk.iter().collect::<String>());
    }

    chunks
}

/// Everything a processor produced for one stream
#[derive(Debug, Default)]
pub struct Collected {
    /// Each non-empty emission, in order
    pub emitted: Vec<String>,
    pub outcome: StreamOutcome,
}

impl Collected {
    /// All emissions joined, as the user would see them
    pub fn visible(&self) -> String {
        self.emitted.concat()
    }

    /// Emissions, flush and block joined back together
    pub fn reconstructed(&self) -> String {
        let mut text = self.visible();
        if let Some(flushed) = &self.outcome.flushed {
            text.push_str(flushed);
        }
        if let Some(block) = &self.outcome.block {
            text.push_str(block);
        }
        text
    }
}

/// Run the given chunks through a fresh processor watching `marker`
pub fn run_chunks<S: AsRef<str>>(chunks: &[S], marker: &str) -> Collected {
    let mut processor = TagStreamProcessor::new(marker);
    let mut emitted = Vec::new();

    for chunk in chunks {
        if let Some(text) = processor.process(chunk.as_ref()) {
            emitted.push(text);
        }
    }

    Collected {
        emitted,
        outcome: processor.finish(),
    }
}

/// Split `text` into chunks of `chunk_size` chars and run them
pub fn run_chunked_text(text: &str, chunk_size: usize, marker: &str) -> Collected {
    run_chunks(&chunk_str(text, chunk_size), marker)
}
