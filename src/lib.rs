//! Hostsfile - hosts file parsing and a bidirectional name/address index.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod parse;
mod punycode;
pub mod record;
pub mod storage;

pub use error::{LineError, ParseError, RecordError};
pub use parse::{parse, HandleSet, Input, Parser, Set};
pub use record::Record;
pub use storage::{DefaultStorage, Storage};
