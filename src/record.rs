//! A single hosts file entry and its line codec.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::domain;
use crate::error::RecordError;

/// One hosts file entry: an address and the names that resolve to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub addr: IpAddr,
    /// Scope zone of a link-local IPv6 address, as in `fe80::1%lo0`.
    pub zone: Option<String>,
    /// Name of the input the record was read from, if it has one.
    pub source: Option<String>,
    pub names: Vec<String>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            zone: None,
            source: None,
            names: Vec::new(),
        }
    }
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn trim_blanks(mut s: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = s {
        if !is_blank(*first) {
            break;
        }
        s = rest;
    }
    while let [rest @ .., last] = s {
        if !is_blank(*last) {
            break;
        }
        s = rest;
    }
    s
}

/// Parse an address, allowing a non-empty `%zone` suffix on IPv6.
fn parse_addr(text: &str) -> Result<(IpAddr, Option<String>), RecordError> {
    if let Some((ip, zone)) = text.split_once('%') {
        if let (false, Ok(ip)) = (zone.is_empty(), ip.parse::<Ipv6Addr>()) {
            return Ok((IpAddr::V6(ip), Some(zone.to_string())));
        }
    }
    Ok((text.parse::<IpAddr>()?, None))
}

impl Record {
    /// Decode one line (without its newline) into this record.
    ///
    /// On a bad hostname `names` is still populated up to and including the
    /// offending name, so callers can report what was read.
    pub fn decode(&mut self, line: &[u8]) -> Result<(), RecordError> {
        let line = match line.iter().position(|&b| b == b'#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        let line = trim_blanks(line);

        let (addr, hosts) = match line.iter().position(|&b| is_blank(b)) {
            Some(pos) => (&line[..pos], trim_blanks(&line[pos..])),
            None => (line, &line[line.len()..]),
        };
        if addr.is_empty() {
            return Err(RecordError::EmptyLine);
        }
        if hosts.is_empty() {
            return Err(RecordError::NoHosts);
        }

        let (addr, zone) = parse_addr(&String::from_utf8_lossy(addr))?;
        self.addr = addr;
        self.zone = zone;

        let fields: Vec<&[u8]> = hosts
            .split(|&b| is_blank(b))
            .filter(|f| !f.is_empty())
            .collect();
        self.names = vec![String::new(); fields.len()];
        for (index, field) in fields.into_iter().enumerate() {
            let name = String::from_utf8_lossy(field).into_owned();
            let res = domain::validate_hostname(&name);
            self.names[index] = name;
            if let Err(source) = res {
                return Err(RecordError::Name { index, source });
            }
        }
        Ok(())
    }

    /// Encode as a hosts file line, without a trailing newline.
    pub fn encode(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr)?;
        if let Some(zone) = &self.zone {
            write!(f, "%{zone}")?;
        }
        for name in &self.names {
            write!(f, " {name}")?;
        }
        Ok(())
    }
}

impl FromStr for Record {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rec = Record::default();
        rec.decode(s.as_bytes())?;
        Ok(rec)
    }
}
