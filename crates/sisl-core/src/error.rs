//! Error types for SISL codec operations.
//!
//! Each variant's message starts with the diagnostic prefix the CLI promises
//! on stderr (`sisl-parse:`, `sisl-tag:`, ...), so errors can be surfaced
//! verbatim.

use thiserror::Error;

/// Errors that can occur while converting between JSON, SISL and XML.
#[derive(Error, Debug)]
pub enum SislError {
    /// The input was not valid JSON, or a JSON value has no document
    /// counterpart (e.g. an integer outside the 64-bit signed range).
    #[error("json-parse: {0}")]
    JsonParse(String),

    /// Malformed SISL text. Positions are 1-based.
    #[error("sisl-parse: {message} at line {line}, column {column}")]
    SislParse {
        message: String,
        line: usize,
        column: usize,
    },

    /// A value's tag is unknown, or its payload does not match the tag.
    #[error("sisl-tag: {0}")]
    SislTag(String),

    /// A `!list` body key does not match `_N`, or an index appears twice.
    #[error("sisl-list-index: {0}")]
    SislListIndex(String),

    /// Malformed XML input.
    #[error("xml-parse: {0}")]
    XmlParse(String),

    /// Typed XML that violates the `<root>` / `type` attribute shape.
    #[error("xml-typed: {0}")]
    XmlTyped(String),

    /// A single value's minimal wrapped encoding exceeds the split limit.
    #[error("fragment-too-large: minimum fragment length {required} exceeds max length {max}")]
    FragmentTooLarge { required: usize, max: usize },

    /// A structural error during encoding (e.g. a non-object top level).
    #[error("encode: {0}")]
    Encode(String),
}

impl SislError {
    pub(crate) fn parse_at(message: impl Into<String>, line: usize, column: usize) -> Self {
        SislError::SislParse {
            message: message.into(),
            line,
            column,
        }
    }
}

impl From<serde_json::Error> for SislError {
    fn from(err: serde_json::Error) -> Self {
        SislError::JsonParse(err.to_string())
    }
}

/// Convenience alias used throughout sisl-core.
pub type Result<T> = std::result::Result<T, SislError>;
