//! Chunk-by-chunk state machine that holds back a marker and everything after it

use super::matcher::{continue_partial_match, ends_in_partial_match};
use tracing::trace;

/// Where the processor stands relative to the watched marker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParserState {
    /// No pending match, text flows through
    #[default]
    Scanning,
    /// Tail of earlier output that is a proper prefix of the marker
    PartialMatch(String),
    /// The marker was seen; everything from it onwards is collected here
    InBlock(String),
}

/// Result of feeding one chunk to [`classify`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Text safe to show to the user right away
    pub emit: Option<String>,
    /// State to use for the next chunk
    pub next: ParserState,
}

impl Transition {
    fn new(emit: &str, next: ParserState) -> Self {
        Self {
            emit: (!emit.is_empty()).then(|| emit.to_string()),
            next,
        }
    }
}

/// Decide what to show for `chunk` and how the state moves on.
///
/// Once the marker has been seen the block is never closed again; the rest of
/// the stream is collected until the caller finishes the stream.
pub fn classify(state: ParserState, chunk: &str, marker: &str) -> Transition {
    match state {
        ParserState::InBlock(mut block) => {
            block.push_str(chunk);
            Transition::new("", ParserState::InBlock(block))
        }
        ParserState::PartialMatch(buffer) => continue_buffered(buffer, chunk, marker),
        ParserState::Scanning => scan(chunk, marker),
    }
}

/// Rules for text seen while no match is pending
fn scan(text: &str, marker: &str) -> Transition {
    // An empty marker never matches
    if marker.is_empty() {
        return Transition::new(text, ParserState::Scanning);
    }

    // Some models deliver the whole marker in one chunk
    if let Some(idx) = text.find(marker) {
        return Transition::new(&text[..idx], ParserState::InBlock(text[idx..].to_string()));
    }

    if let Some(prefix) = ends_in_partial_match(text, marker) {
        let visible = &text[..text.len() - prefix.len()];
        return Transition::new(visible, ParserState::PartialMatch(prefix.to_string()));
    }

    Transition::new(text, ParserState::Scanning)
}

fn continue_buffered(buffer: String, chunk: &str, marker: &str) -> Transition {
    let Some(extension) = continue_partial_match(&buffer, chunk, marker) else {
        debug_assert!(
            false,
            "partial buffer {buffer:?} is not a prefix of marker {marker:?}"
        );
        return scan(&format!("{buffer}{chunk}"), marker);
    };

    if buffer.len() + extension.len() == marker.len() {
        // Marker complete, the rest of the chunk opens the block
        let block = format!("{marker}{}", &chunk[extension.len()..]);
        return Transition::new("", ParserState::InBlock(block));
    }

    if extension.len() == chunk.len() {
        return Transition::new("", ParserState::PartialMatch(buffer + extension));
    }

    // False alarm. The combined text may still hold the marker or end in a
    // new partial prefix, so it goes through the scanning rules again.
    scan(&format!("{buffer}{chunk}"), marker)
}

/// What is left once the stream has ended
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Held back text that never became the marker, to be shown as is
    pub flushed: Option<String>,
    /// Collected block text, starting with the marker
    pub block: Option<String>,
}

/// Hides everything from a marker onwards in a stream of text chunks
///
/// Text before the marker is passed back from [`TagStreamProcessor::process`]
/// as soon as it is known not to be part of the marker. Only the shortest
/// possible tail is held back when a chunk ends in what could be the start of
/// the marker.
#[derive(Debug, Clone)]
pub struct TagStreamProcessor {
    marker: String,
    state: ParserState,
}

impl TagStreamProcessor {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            state: ParserState::Scanning,
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Feed the next chunk, returning the text to forward to the user (if any)
    pub fn process(&mut self, chunk: &str) -> Option<String> {
        let state = std::mem::take(&mut self.state);
        let Transition { emit, next } = classify(state, chunk, &self.marker);

        if next != ParserState::Scanning {
            trace!("Stream state after {:?}: {:?}", chunk, next);
        }
        self.state = next;
        emit
    }

    /// End the stream, releasing any held back text and the collected block
    pub fn finish(self) -> StreamOutcome {
        match self.state {
            ParserState::Scanning => StreamOutcome::default(),
            ParserState::PartialMatch(buffer) => StreamOutcome {
                flushed: Some(buffer),
                block: None,
            },
            ParserState::InBlock(block) => StreamOutcome {
                flushed: None,
                block: Some(block),
            },
        }
    }
}
