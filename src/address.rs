//! Address intake: coercion, stable deduplication and scheme defaulting.

use crate::constants::DEFAULT_SCHEME_PREFIX;
use crate::error::{Result, TitleError};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

/// A caller-supplied web address.
///
/// Identity is the raw string exactly as supplied; the fetchable form only
/// differs by a default scheme prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    raw: String,
}

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The address with `http://` prepended when it carries no http(s) scheme.
    pub fn to_url(&self) -> String {
        with_default_scheme(&self.raw)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

pub fn has_http_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn with_default_scheme(s: &str) -> String {
    if has_http_scheme(s) {
        s.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{s}")
    }
}

/// Raw input as handed over by a listener: one scalar or a list that may
/// contain nulls.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAddresses {
    One(Option<String>),
    Many(Vec<Option<String>>),
}

impl RawAddresses {
    pub fn into_vec(self) -> Vec<Option<String>> {
        match self {
            RawAddresses::One(one) => vec![one],
            RawAddresses::Many(many) => many,
        }
    }
}

impl From<&str> for RawAddresses {
    fn from(s: &str) -> Self {
        RawAddresses::One(Some(s.to_string()))
    }
}

impl From<String> for RawAddresses {
    fn from(s: String) -> Self {
        RawAddresses::One(Some(s))
    }
}

impl From<Vec<String>> for RawAddresses {
    fn from(v: Vec<String>) -> Self {
        RawAddresses::Many(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<&str>> for RawAddresses {
    fn from(v: Vec<&str>) -> Self {
        RawAddresses::Many(v.into_iter().map(|s| Some(s.to_string())).collect())
    }
}

impl From<Vec<Option<String>>> for RawAddresses {
    fn from(v: Vec<Option<String>>) -> Self {
        RawAddresses::Many(v)
    }
}

impl From<Vec<Option<&str>>> for RawAddresses {
    fn from(v: Vec<Option<&str>>) -> Self {
        RawAddresses::Many(v.into_iter().map(|s| s.map(str::to_string)).collect())
    }
}

/// Drops nulls and blank entries, removes duplicate raw strings keeping the
/// first occurrence, and fails with `EmptyBatch` when nothing is left.
pub fn normalize(raw: impl Into<RawAddresses>) -> Result<Vec<Address>> {
    let mut seen = HashSet::new();
    let addresses: Vec<Address> = raw
        .into()
        .into_vec()
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .filter(|s| seen.insert(s.clone()))
        .map(Address::new)
        .collect();

    if addresses.is_empty() {
        return Err(TitleError::EmptyBatch);
    }
    Ok(addresses)
}
