//! Response body parse errors.

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Failure to read a multi-status document or response body.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Syntax error reported by the XML reader.
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("document ends inside <{element}>")]
    Unclosed { element: String },

    #[error("document has no root element")]
    NoRoot,

    #[error("unknown entity &{0};")]
    UnknownEntity(String),

    #[error("invalid text encoding: {0}")]
    Encoding(String),

    /// Body is neither a multi-status document nor JSON.
    #[error("unsupported body: {0}")]
    UnsupportedBody(String),
}

impl From<std::str::Utf8Error> for ParseError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<quick_xml::encoding::EncodingError> for ParseError {
    fn from(err: quick_xml::encoding::EncodingError) -> Self {
        Self::Encoding(err.to_string())
    }
}
