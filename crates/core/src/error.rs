//! Error types for the message tokenizer.
//!
//! The [`Scanner`](crate::Scanner) itself never returns errors: a missing
//! byte is an ordinary `false`, and a broken cursor invariant is a panic.
//! Errors only appear once scanner results are assembled into protocol
//! elements and one of them turns out to be malformed.

use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Reading the message to tokenize failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A message element did not have the expected shape. `line` is the
    /// 1-based line the scanner was on when the problem was found.
    #[error("parse error on line {line}: {kind}")]
    Parse { kind: ParseErrorKind, line: usize },
}

impl ScanError {
    pub(crate) fn parse(kind: ParseErrorKind, line: usize) -> Self {
        ScanError::Parse { kind, line }
    }

    /// Moves a parse error found in a standalone value onto the message line
    /// the value came from.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            ScanError::Parse { kind, .. } => ScanError::Parse { kind, line },
            other => other,
        }
    }

    /// The parse failure kind, if this is a parse error.
    pub fn kind(&self) -> Option<&ParseErrorKind> {
        match self {
            ScanError::Parse { kind, .. } => Some(kind),
            ScanError::Io(_) => None,
        }
    }
}

/// Specific kind of parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input was empty.
    EmptyMessage,
    /// Request line did not have the `Method URI Version` shape.
    InvalidRequestLine,
    /// Status line did not have the `Version Code Reason` shape.
    InvalidStatusLine,
    /// A header line had no colon.
    InvalidHeader,
    /// A continuation line appeared while folding was disabled.
    FoldedHeader,
    /// More header lines than the configured maximum.
    TooManyHeaders(usize),
    /// The header block ran to the end of the buffer without a blank line.
    MissingTerminator,
    /// Request-URI was neither an absolute URI nor an absolute path.
    InvalidUri,
    /// `Range` value was not an `npt=` range.
    InvalidRange,
    /// A token that should have been text was not valid UTF-8.
    NotUtf8,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "empty message"),
            Self::InvalidRequestLine => write!(f, "invalid request line"),
            Self::InvalidStatusLine => write!(f, "invalid status line"),
            Self::InvalidHeader => write!(f, "invalid header"),
            Self::FoldedHeader => write!(f, "folded header continuation not allowed"),
            Self::TooManyHeaders(max) => write!(f, "more than {max} headers"),
            Self::MissingTerminator => write!(f, "header block not terminated by a blank line"),
            Self::InvalidUri => write!(f, "invalid request URI"),
            Self::InvalidRange => write!(f, "invalid npt range"),
            Self::NotUtf8 => write!(f, "token is not valid UTF-8"),
        }
    }
}

/// Convenience alias for `Result<T, ScanError>`.
pub type Result<T> = std::result::Result<T, ScanError>;
