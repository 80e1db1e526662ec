use crate::address::{normalize, Address, RawAddresses};
use crate::app::fetch_title_use_case::TitleFetcher;
use crate::app::ports::HttpClientPort;
use crate::config::Config;
use crate::error::{Result, TitleError};
use crate::metrics::BatchMetrics;
use crate::types::{Batch, BatchEntry, FetchOutcome};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// How many fetches of one batch may be in flight at once.
///
/// `Bounded(1)` is the sequential strategy; the limit only changes timing,
/// never the content or order of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyLimit {
    Unbounded,
    Bounded(NonZeroUsize),
}

impl ConcurrencyLimit {
    pub fn sequential() -> Self {
        ConcurrencyLimit::Bounded(NonZeroUsize::MIN)
    }

    /// `None` for a zero limit.
    pub fn bounded(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(ConcurrencyLimit::Bounded)
    }

    fn permits(&self) -> Option<usize> {
        match self {
            ConcurrencyLimit::Unbounded => None,
            ConcurrencyLimit::Bounded(n) => Some(n.get()),
        }
    }
}

impl Default for ConcurrencyLimit {
    fn default() -> Self {
        ConcurrencyLimit::Bounded(
            NonZeroUsize::new(crate::constants::DEFAULT_CONCURRENCY).unwrap_or(NonZeroUsize::MIN),
        )
    }
}

impl fmt::Display for ConcurrencyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyLimit::Unbounded => f.write_str("unbounded"),
            ConcurrencyLimit::Bounded(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for ConcurrencyLimit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unbounded" | "unlimited" => Ok(ConcurrencyLimit::Unbounded),
            "sequential" => Ok(ConcurrencyLimit::sequential()),
            other => other
                .parse::<usize>()
                .ok()
                .and_then(ConcurrencyLimit::bounded)
                .ok_or_else(|| {
                    format!("invalid concurrency limit '{s}': expected 'unbounded', 'sequential' or a positive integer")
                }),
        }
    }
}

impl<'de> Deserialize<'de> for ConcurrencyLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(usize),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Count(n) => ConcurrencyLimit::bounded(n)
                .ok_or_else(|| serde::de::Error::custom("concurrency limit must be positive")),
            Repr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Orchestrator over a type-erased transport, shared by the listener and the CLI.
pub type SharedOrchestrator = Arc<BatchOrchestrator<dyn HttpClientPort>>;

/// Fans a batch out to the title fetcher and fans results back in by index.
pub struct BatchOrchestrator<H: HttpClientPort + ?Sized + 'static> {
    pub fetcher: TitleFetcher<H>,
    pub limit: ConcurrencyLimit,
}

impl<H: HttpClientPort + ?Sized + 'static> BatchOrchestrator<H> {
    pub fn new(fetcher: TitleFetcher<H>, limit: ConcurrencyLimit) -> Self {
        Self { fetcher, limit }
    }

    pub fn from_config(config: &Config, http: Arc<H>) -> Self {
        let fetcher = TitleFetcher::new(http, config.request_timeout, config.max_redirects);
        Self::new(fetcher, config.concurrency)
    }

    /// Normalizes raw listener input and runs it as one batch.
    pub async fn handle_batch(&self, raw: impl Into<RawAddresses>) -> Result<Batch> {
        let addresses = normalize(raw).map_err(|e| {
            BatchMetrics::record_empty_rejected();
            e
        })?;
        self.run(addresses).await
    }

    /// Resolves every address and returns them in input order.
    ///
    /// Fails only on an empty input or when the task machinery itself breaks;
    /// per-address failures are outcomes inside the batch.
    pub async fn run(&self, addresses: Vec<Address>) -> Result<Batch> {
        if addresses.is_empty() {
            return Err(TitleError::EmptyBatch);
        }

        let batch_id = Uuid::new_v4();
        let span = info_span!("batch", %batch_id, size = addresses.len(), limit = %self.limit);
        self.run_indexed(addresses).instrument(span).await
    }

    async fn run_indexed(&self, addresses: Vec<Address>) -> Result<Batch> {
        let started = Instant::now();
        let semaphore = self.limit.permits().map(|n| Arc::new(Semaphore::new(n)));

        // Dropping the set aborts outstanding fetches, so an early return or a
        // dropped caller never leaves work running.
        let mut tasks = JoinSet::new();
        for (index, address) in addresses.iter().cloned().enumerate() {
            let fetcher = self.fetcher.clone();
            let semaphore = semaphore.clone();
            tasks.spawn(
                async move {
                    let _permit = match semaphore {
                        Some(sem) => Some(sem.acquire_owned().await.map_err(|_| {
                            TitleError::Worker("concurrency semaphore closed".to_string())
                        })?),
                        None => None,
                    };
                    let outcome = fetcher.fetch(&address).await;
                    Ok::<_, TitleError>((index, outcome))
                }
                .in_current_span(),
            );
        }

        let mut slots: Vec<Option<FetchOutcome>> = vec![None; addresses.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, outcome) = joined.map_err(|e| TitleError::Worker(e.to_string()))??;
            slots[index] = Some(outcome);
        }

        let entries = addresses
            .into_iter()
            .zip(slots)
            .enumerate()
            .map(|(index, (address, slot))| {
                slot.map(|outcome| BatchEntry { address, outcome })
                    .ok_or_else(|| TitleError::Worker(format!("slot {index} never resolved")))
            })
            .collect::<Result<Vec<_>>>()?;

        let batch = Batch::new(entries);
        let elapsed = started.elapsed().as_secs_f64();
        BatchMetrics::record_completed(batch.len(), elapsed);
        info!(titles = batch.title_count(), elapsed_ms = (elapsed * 1000.0) as u64, "Batch complete");
        Ok(batch)
    }
}
