//! Bidirectional hostname/address index built from hosts files.

use std::collections::HashMap;
use std::io::Read;
use std::net::IpAddr;

use tracing::debug;

use crate::error::{LineError, ParseError};
use crate::parse::{HandleSet, Input, Parser, Set};
use crate::record::Record;

/// Lookups in both directions over parsed hosts files.
pub trait Storage {
    /// Names declared for `addr`, in the order they were read.
    fn by_addr(&self, addr: IpAddr) -> &[String];

    /// Addresses declared for `name`, in the order they were read.
    fn by_name(&self, name: &str) -> &[IpAddr];
}

/// Hash map backed [`Storage`].
///
/// Built once from a set of inputs and read-only afterwards. Names are keyed
/// by their literal text and nothing is deduplicated: a name listed twice for
/// the same address shows up twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultStorage {
    names: HashMap<String, Vec<IpAddr>>,
    addrs: HashMap<IpAddr, Vec<String>>,
}

impl DefaultStorage {
    /// Build an index from `inputs` with the default [`Parser`].
    ///
    /// Lines that fail to decode are skipped; only read failures are
    /// returned.
    pub fn new<R, I>(inputs: I) -> Result<Self, ParseError>
    where
        R: Read,
        I: IntoIterator<Item = Input<R>>,
    {
        Self::with_parser(Parser::default(), inputs)
    }

    /// Like [`DefaultStorage::new`] with an explicit parser.
    pub fn with_parser<R, I>(parser: Parser, inputs: I) -> Result<Self, ParseError>
    where
        R: Read,
        I: IntoIterator<Item = Input<R>>,
    {
        let mut storage = Self::default();
        for input in inputs {
            parser.parse_handled(input, &mut storage)?;
        }
        debug!(
            names = storage.names.len(),
            addrs = storage.addrs.len(),
            "built hosts index"
        );
        Ok(storage)
    }

    /// Call `f` for every address and its names until it returns `false`.
    ///
    /// Iteration order is unspecified.
    pub fn range_addrs<F>(&self, mut f: F)
    where
        F: FnMut(&IpAddr, &[String]) -> bool,
    {
        for (addr, names) in &self.addrs {
            if !f(addr, names) {
                return;
            }
        }
    }

    /// Call `f` for every name and its addresses until it returns `false`.
    ///
    /// Iteration order is unspecified.
    pub fn range_names<F>(&self, mut f: F)
    where
        F: FnMut(&str, &[IpAddr]) -> bool,
    {
        for (name, addrs) in &self.names {
            if !f(name, addrs) {
                return;
            }
        }
    }

    /// Number of distinct names.
    pub fn len_names(&self) -> usize {
        self.names.len()
    }

    /// Number of distinct addresses.
    pub fn len_addrs(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }
}

impl Storage for DefaultStorage {
    fn by_addr(&self, addr: IpAddr) -> &[String] {
        self.addrs.get(&addr).map(Vec::as_slice).unwrap_or_default()
    }

    fn by_name(&self, name: &str) -> &[IpAddr] {
        self.names.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}

impl Set for DefaultStorage {
    fn add(&mut self, rec: Record) {
        let Record { addr, names, .. } = rec;
        for name in &names {
            self.names.entry(name.clone()).or_default().push(addr);
        }
        self.addrs.entry(addr).or_default().extend(names);
    }
}

impl HandleSet for DefaultStorage {
    fn handle_invalid(&mut self, source: Option<&str>, _line: &[u8], err: LineError) {
        debug!(
            source = source.unwrap_or("<unnamed>"),
            line = err.line,
            error = %err.source,
            "skipping invalid hosts line"
        );
    }
}
