use thiserror::Error;

#[derive(Error, Debug)]
pub enum TitleError {
    #[error("No addresses provided")]
    EmptyBatch,

    #[error("Batch worker failed: {0}")]
    Worker(String),

    #[error("Server error: {0}")]
    Server(#[from] hyper::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TitleError {
    /// Client-side faults are reported as 400s, everything else as 500s.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TitleError::EmptyBatch)
    }
}

pub type Result<T> = std::result::Result<T, TitleError>;
