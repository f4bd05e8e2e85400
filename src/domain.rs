//! Hostname validation.
//!
//! Names are checked in their ASCII form: labels with non-ASCII characters
//! are Punycode-encoded first, everything else is validated as written.

use thiserror::Error;

use crate::punycode;

/// Maximum length of a domain name in its ASCII form.
pub const MAX_NAME_LEN: usize = 253;

/// Maximum length of a single label.
pub const MAX_LABEL_LEN: usize = 63;

/// An invalid hostname.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bad hostname {name:?}: {kind}")]
pub struct DomainError {
    pub name: String,
    pub kind: DomainErrorKind,
}

/// What exactly is wrong with a hostname.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainErrorKind {
    #[error("empty hostname")]
    Empty,

    #[error("hostname is too long: {len}, max {}", MAX_NAME_LEN)]
    TooLong { len: usize },

    #[error("empty label")]
    EmptyLabel,

    #[error("label {label:?} is too long: {len}, max {}", MAX_LABEL_LEN)]
    LabelTooLong { label: String, len: usize },

    #[error("label {label:?}: illegal char {ch:?}")]
    BadRune { label: String, ch: char },

    #[error("label {label:?} cannot start/end with hyphen")]
    BadHyphen { label: String },

    #[error("top-level label {label:?} is all digits")]
    NumericTld { label: String },
}

/// Validate hostname format.
pub fn validate_hostname(name: &str) -> Result<(), DomainError> {
    check(name).map_err(|kind| DomainError {
        name: name.to_string(),
        kind,
    })
}

fn check(name: &str) -> Result<(), DomainErrorKind> {
    let ascii = to_ascii(name)?;
    if ascii.is_empty() {
        return Err(DomainErrorKind::Empty);
    }
    if ascii.len() > MAX_NAME_LEN {
        return Err(DomainErrorKind::TooLong { len: ascii.len() });
    }

    let labels: Vec<&str> = ascii.split('.').collect();
    for label in &labels {
        validate_label(label)?;
    }

    // split always yields at least one item
    let tld = labels[labels.len() - 1];
    if tld.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainErrorKind::NumericTld {
            label: tld.to_string(),
        });
    }
    Ok(())
}

fn validate_label(label: &str) -> Result<(), DomainErrorKind> {
    if label.is_empty() {
        return Err(DomainErrorKind::EmptyLabel);
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(DomainErrorKind::LabelTooLong {
            label: label.to_string(),
            len: label.len(),
        });
    }
    for c in label.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(DomainErrorKind::BadRune {
                label: label.to_string(),
                ch: c,
            });
        }
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(DomainErrorKind::BadHyphen {
            label: label.to_string(),
        });
    }
    Ok(())
}

/// Convert every internationalised label to its `xn--` form.
fn to_ascii(name: &str) -> Result<String, DomainErrorKind> {
    if name.is_ascii() {
        return Ok(name.to_string());
    }

    // Encoding never shortens a label, so check lengths before encoding.
    let chars = name.chars().count();
    if chars > MAX_NAME_LEN {
        return Err(DomainErrorKind::TooLong { len: chars });
    }

    let mut out = String::with_capacity(name.len() + 8);
    for (i, label) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        if label.is_ascii() {
            out.push_str(label);
            continue;
        }
        let chars = label.chars().count();
        if chars > MAX_LABEL_LEN {
            return Err(DomainErrorKind::LabelTooLong {
                label: label.to_string(),
                len: chars,
            });
        }
        if let Some(ch) = label
            .chars()
            .find(|c| !c.is_ascii() && !c.is_alphanumeric())
        {
            return Err(DomainErrorKind::BadRune {
                label: label.to_string(),
                ch,
            });
        }
        out.push_str(punycode::ACE_PREFIX);
        punycode::encode(&label.to_lowercase(), &mut out);
    }
    Ok(out)
}
