use crate::address::Address;
use std::fmt;

/// Why an address did not yield a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoResponseReason {
    StatusCode(u16),
    NoTitleFound,
    Timeout,
    InvalidAddress,
    TooManyRedirects,
}

impl NoResponseReason {
    /// Low-cardinality label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            NoResponseReason::StatusCode(_) => "status_code",
            NoResponseReason::NoTitleFound => "no_title",
            NoResponseReason::Timeout => "timeout",
            NoResponseReason::InvalidAddress => "invalid_address",
            NoResponseReason::TooManyRedirects => "too_many_redirects",
        }
    }
}

impl fmt::Display for NoResponseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoResponseReason::StatusCode(code) => write!(f, "Status Code: {code}"),
            NoResponseReason::NoTitleFound => f.write_str("No Title Found"),
            NoResponseReason::Timeout => f.write_str("Timeout"),
            NoResponseReason::InvalidAddress => f.write_str("Invalid URL"),
            NoResponseReason::TooManyRedirects => f.write_str("Too Many Redirects"),
        }
    }
}

/// Terminal classification of one address's fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Title(String),
    NoResponse(NoResponseReason),
}

impl FetchOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Title(_) => "title",
            FetchOutcome::NoResponse(reason) => reason.label(),
        }
    }

    pub fn is_title(&self) -> bool {
        matches!(self, FetchOutcome::Title(_))
    }
}

impl From<NoResponseReason> for FetchOutcome {
    fn from(reason: NoResponseReason) -> Self {
        FetchOutcome::NoResponse(reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub address: Address,
    pub outcome: FetchOutcome,
}

impl BatchEntry {
    /// `<address> - "<title>"` or `<address> - NO RESPONSE (<reason>)`, always
    /// keyed by the address as the caller supplied it.
    pub fn render(&self) -> String {
        match &self.outcome {
            FetchOutcome::Title(title) => format!("{} - \"{}\"", self.address, title),
            FetchOutcome::NoResponse(reason) => {
                format!("{} - NO RESPONSE ({})", self.address, reason)
            }
        }
    }
}

/// One request's resolved addresses, in deduplicated input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    entries: Vec<BatchEntry>,
}

impl Batch {
    pub fn new(entries: Vec<BatchEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rendered_lines(&self) -> Vec<String> {
        self.entries.iter().map(BatchEntry::render).collect()
    }

    pub fn title_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_title()).count()
    }
}
