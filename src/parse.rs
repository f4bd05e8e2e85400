//! Streaming hosts file parser.
//!
//! Lines are read one at a time, decoded into [`Record`]s and handed to a
//! [`Set`]. Invalid lines are either collected into the returned error or,
//! with [`Parser::parse_handled`], passed to the sink's
//! [`HandleSet::handle_invalid`].

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use tracing::trace;

use crate::error::{LineError, ParseError};
use crate::record::Record;

/// Default line limit, the usual buffered-scanner token size.
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Receives successfully decoded records.
pub trait Set {
    fn add(&mut self, rec: Record);
}

impl<F: FnMut(Record)> Set for F {
    fn add(&mut self, rec: Record) {
        self(rec)
    }
}

/// A [`Set`] that also wants to see the lines that failed to decode.
pub trait HandleSet: Set {
    /// Called with the input name, the raw line and its error.
    fn handle_invalid(&mut self, source: Option<&str>, line: &[u8], err: LineError);
}

/// A byte stream to parse, optionally named after where it came from.
#[derive(Debug)]
pub struct Input<R> {
    pub name: Option<String>,
    pub reader: R,
}

impl<R: Read> Input<R> {
    pub fn new(reader: R) -> Self {
        Self { name: None, reader }
    }

    pub fn named(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: Some(name.into()),
            reader,
        }
    }
}

impl Input<File> {
    /// Open a file, naming the input after its path.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::named(path.display().to_string(), file))
    }
}

/// Line-by-line hosts file parser.
#[derive(Debug, Clone, Copy)]
pub struct Parser {
    max_line_len: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the longest accepted line in bytes, excluding the newline.
    pub fn max_line_len(mut self, max: usize) -> Self {
        self.max_line_len = max;
        self
    }

    /// Parse `input` into `sink`, collecting every invalid line.
    ///
    /// Returns [`ParseError::Lines`] if any line failed to decode; all valid
    /// lines have been added to the sink regardless.
    pub fn parse<R, S>(&self, input: Input<R>, sink: &mut S) -> Result<(), ParseError>
    where
        R: Read,
        S: Set + ?Sized,
    {
        let mut errs = Vec::new();
        self.scan(input, sink, |_, _, _, err| errs.push(err))?;
        if errs.is_empty() {
            Ok(())
        } else {
            Err(ParseError::Lines(errs))
        }
    }

    /// Parse `input` into `sink`, routing invalid lines to
    /// [`HandleSet::handle_invalid`].
    ///
    /// Only read failures are returned.
    pub fn parse_handled<R, S>(&self, input: Input<R>, sink: &mut S) -> Result<(), ParseError>
    where
        R: Read,
        S: HandleSet + ?Sized,
    {
        self.scan(input, sink, |sink, source, line, err| {
            sink.handle_invalid(source, line, err)
        })
    }

    fn scan<R, S, F>(&self, input: Input<R>, sink: &mut S, mut invalid: F) -> Result<(), ParseError>
    where
        R: Read,
        S: Set + ?Sized,
        F: FnMut(&mut S, Option<&str>, &[u8], LineError),
    {
        let Input { name, reader } = input;
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut line_no = 0;
        let mut added = 0usize;

        loop {
            line_no += 1;
            buf.clear();
            // One byte past the limit so an over-long line is detectable.
            let limit = (self.max_line_len as u64).saturating_add(1);
            let n = (&mut reader)
                .take(limit)
                .read_until(b'\n', &mut buf)
                .map_err(|source| ParseError::Read {
                    line: line_no,
                    source,
                })?;
            if n == 0 {
                break;
            }

            let line = match buf.strip_suffix(b"\n") {
                Some(line) => line,
                None if buf.len() > self.max_line_len => {
                    return Err(ParseError::TooLong {
                        line: line_no,
                        max: self.max_line_len,
                    });
                }
                None => &buf[..],
            };
            let line = line.strip_suffix(b"\r").unwrap_or(line);

            let mut rec = Record::default();
            match rec.decode(line) {
                Ok(()) => {
                    rec.source = name.clone();
                    sink.add(rec);
                    added += 1;
                }
                Err(source) => {
                    let err = LineError {
                        line: line_no,
                        source,
                    };
                    invalid(&mut *sink, name.as_deref(), line, err);
                }
            }
        }

        trace!(
            source = name.as_deref().unwrap_or("<unnamed>"),
            lines = line_no - 1,
            added,
            "parsed hosts input"
        );
        Ok(())
    }
}

/// Parse `input` into `sink` with the default [`Parser`].
pub fn parse<R, S>(input: Input<R>, sink: &mut S) -> Result<(), ParseError>
where
    R: Read,
    S: Set + ?Sized,
{
    Parser::default().parse(input, sink)
}
