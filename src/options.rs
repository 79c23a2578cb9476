//! Parsing of the `<options>` block an agent appends to its reply
//!
//! The agent is prompted to end a reply with
//!
//! ```text
//! <options>
//! <option>Option 1</option>
//! <option>Option 2</option>
//! </options>
//! ```
//!
//! The block is hidden from the streamed text and turned into
//! [`MessageAction`]s once the reply is complete.

use crate::types::MessageAction;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::warn;

/// The literal tags delimiting the block and its entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsMarkers {
    pub open: String,
    pub close: String,
    pub item_open: String,
    pub item_close: String,
}

impl Default for OptionsMarkers {
    fn default() -> Self {
        Self {
            open: "<options>".to_string(),
            close: "</options>".to_string(),
            item_open: "<option>".to_string(),
            item_close: "</option>".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Options block does not start with {0:?}")]
    MissingOpenTag(String),
    #[error("Options block does not end with {0:?}")]
    MissingCloseTag(String),
    #[error("Option marker {0:?} must not be empty")]
    EmptyMarker(&'static str),
    #[error("Invalid option pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Extracts, parses and strips options blocks for one set of markers
#[derive(Debug, Clone)]
pub struct OptionsFormat {
    markers: OptionsMarkers,
    item_pattern: Regex,
}

impl OptionsFormat {
    pub fn new(markers: OptionsMarkers) -> Result<Self, OptionsError> {
        for (name, marker) in [
            ("open", &markers.open),
            ("close", &markers.close),
            ("item_open", &markers.item_open),
            ("item_close", &markers.item_close),
        ] {
            if marker.is_empty() {
                return Err(OptionsError::EmptyMarker(name));
            }
        }

        let item_pattern = Regex::new(&format!(
            "(?s){}(.*?){}",
            regex::escape(&markers.item_open),
            regex::escape(&markers.item_close)
        ))?;

        Ok(Self {
            markers,
            item_pattern,
        })
    }

    /// Shared format for the default `<options>` markers
    pub fn default_format() -> &'static OptionsFormat {
        static DEFAULT: OnceLock<OptionsFormat> = OnceLock::new();
        DEFAULT.get_or_init(|| {
            OptionsFormat::new(OptionsMarkers::default())
                .expect("default option markers form a valid pattern")
        })
    }

    pub fn markers(&self) -> &OptionsMarkers {
        &self.markers
    }

    /// Parse a complete block into actions, reporting format errors
    pub fn try_parse(&self, block: &str) -> Result<Vec<MessageAction>, OptionsError> {
        if block.is_empty() {
            return Ok(Vec::new());
        }

        let block = block.trim();
        let open = self.markers.open.as_str();
        let close = self.markers.close.as_str();

        let after_open = block
            .strip_prefix(open)
            .ok_or_else(|| OptionsError::MissingOpenTag(open.to_string()))?;
        if !block.ends_with(close) {
            return Err(OptionsError::MissingCloseTag(close.to_string()));
        }

        // Everything up to the last close tag
        let content = after_open
            .rfind(close)
            .map_or("", |end| &after_open[..end])
            .trim();

        Ok(self
            .item_pattern
            .captures_iter(content)
            .filter_map(|captures| captures.get(1))
            .map(|label| MessageAction::new(label.as_str().trim()))
            .collect())
    }

    /// Parse a complete block into actions; a malformed block yields none
    pub fn parse(&self, block: &str) -> Vec<MessageAction> {
        match self.try_parse(block) {
            Ok(actions) => actions,
            Err(e) => {
                warn!("Invalid options block ({}): {:?}", e, block);
                Vec::new()
            }
        }
    }

    /// Remove the first options block from `message` and trim the rest.
    /// Messages without a complete block are only trimmed.
    pub fn trim(&self, message: &str) -> String {
        match self.block_span(message) {
            Some((start, end)) => {
                let mut trimmed = String::with_capacity(message.len() - (end - start));
                trimmed.push_str(&message[..start]);
                trimmed.push_str(&message[end..]);
                trimmed.trim().to_string()
            }
            None => message.trim().to_string(),
        }
    }

    /// The first options block in `message`, tags included, or an empty string
    pub fn extract(&self, message: &str) -> String {
        self.block_span(message)
            .map(|(start, end)| message[start..end].to_string())
            .unwrap_or_default()
    }

    /// Byte range from the first open tag through the first close tag after it
    fn block_span(&self, message: &str) -> Option<(usize, usize)> {
        let open = self.markers.open.as_str();
        let close = self.markers.close.as_str();

        let start = message.find(open)?;
        let search_from = start + open.len();
        let close_at = search_from + message[search_from..].find(close)?;
        Some((start, close_at + close.len()))
    }
}

/// Parse a block using the default markers
pub fn parse_options_block(block: &str) -> Vec<MessageAction> {
    OptionsFormat::default_format().parse(block)
}

/// Strip the options block from a message using the default markers
pub fn trim_options_block(message: &str) -> String {
    OptionsFormat::default_format().trim(message)
}

/// Extract the options block from a message using the default markers
pub fn get_options_block(message: &str) -> String {
    OptionsFormat::default_format().extract(message)
}
