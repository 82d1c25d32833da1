//! Error types for the request parser and the response writer.

use std::io;
use thiserror::Error;

use crate::http::writer::WriterState;

/// Errors raised while turning raw bytes into a [`Request`](crate::http::request::Request).
///
/// "Need more data" is never reported through this type: parse routines
/// signal it by consuming zero bytes.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request-line: {0}")]
    MalformedStartLine(String),

    #[error("invalid method: {0}")]
    InvalidMethod(String),

    #[error("unsupported http version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    #[error("invalid header syntax: {0}")]
    InvalidHeaderSyntax(String),

    #[error("incomplete request")]
    IncompleteRequest,

    #[error("body length {actual} is greater than content-length {declared}")]
    BodyLengthMismatch { declared: usize, actual: usize },

    #[error("malformed content-length: {0}")]
    BadContentLength(String),

    #[error("request head exceeds the limit of {max_size} bytes")]
    HeadTooLarge { max_size: usize },

    #[error("trying to parse data in a done state")]
    AlreadyDone,

    #[error("error reading request: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_start_line<S: ToString>(line: S) -> Self {
        Self::MalformedStartLine(line.to_string())
    }

    pub fn invalid_header_syntax<S: ToString>(line: S) -> Self {
        Self::InvalidHeaderSyntax(line.to_string())
    }
}

/// Errors raised by [`ResponseWriter`](crate::http::writer::ResponseWriter).
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot {operation} in state {state:?}")]
    StateViolation {
        operation: &'static str,
        state: WriterState,
    },

    #[error("error writing response: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}
