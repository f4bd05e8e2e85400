//! Error types for decoding and parsing hosts files.

use std::fmt;
use std::io;
use std::net::AddrParseError;

use thiserror::Error;

use crate::domain::DomainError;

/// Why a single line could not be decoded into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The line is blank or holds only a comment.
    #[error("line is empty")]
    EmptyLine,

    /// The line has an address but no hostnames.
    #[error("no hostnames")]
    NoHosts,

    #[error(transparent)]
    Addr(#[from] AddrParseError),

    #[error("name at index {index}: {source}")]
    Name {
        index: usize,
        #[source]
        source: DomainError,
    },
}

/// A record error tagged with the 1-based line it occurred on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {source}")]
pub struct LineError {
    pub line: usize,
    #[source]
    pub source: RecordError,
}

/// Errors returned by the streaming parser.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The underlying reader failed.
    #[error("reading line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    /// A line did not fit into the parser's line limit.
    #[error("reading line {line}: line is longer than {max} bytes")]
    TooLong { line: usize, max: usize },

    /// One or more lines could not be decoded.
    #[error("parsing: {}", Joined(.0))]
    Lines(Vec<LineError>),
}

impl ParseError {
    /// Per-line decode errors, empty for read failures.
    pub fn line_errors(&self) -> &[LineError] {
        match self {
            ParseError::Lines(errs) => errs,
            _ => &[],
        }
    }

    /// Whether the stream itself failed, as opposed to its content.
    pub fn is_read_error(&self) -> bool {
        !matches!(self, ParseError::Lines(_))
    }
}

struct Joined<'a>(&'a [LineError]);

impl fmt::Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}
