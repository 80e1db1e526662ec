pub mod address;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod server;
pub mod types;

// Application use cases and the ports they depend on
pub mod app;
// Adapters implementing those ports
pub mod infra;

pub use address::{normalize, Address, RawAddresses};
pub use app::batch_use_case::{BatchOrchestrator, ConcurrencyLimit, SharedOrchestrator};
pub use app::fetch_title_use_case::TitleFetcher;
pub use error::{Result, TitleError};
pub use types::{Batch, BatchEntry, FetchOutcome, NoResponseReason};
