//! Streaming processor for hiding an inline tag block from LLM text chunks

mod matcher;
mod tag_processor;

#[cfg(test)]
pub(crate) mod test_utils;

pub use matcher::{continue_partial_match, ends_in_partial_match};
pub use tag_processor::{classify, ParserState, StreamOutcome, TagStreamProcessor, Transition};
