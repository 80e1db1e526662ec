use crate::app::batch_use_case::ConcurrencyLimit;
use crate::constants::{
    CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE, DEFAULT_MAX_REDIRECTS, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_MS,
};
use crate::error::{Result, TitleError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub request_timeout: Duration,
    pub max_redirects: u32,
    pub concurrency: ConcurrencyLimit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            concurrency: ConcurrencyLimit::default(),
        }
    }
}

/// Optional `config.toml` contents; every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub request_timeout_ms: Option<u64>,
    pub max_redirects: Option<u32>,
    pub concurrency: Option<ConcurrencyLimit>,
}

impl Config {
    /// Defaults, then the TOML file (if any), then `.env` and the process environment.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Config::default();
        if let Some(path) = config_file_path() {
            config.apply_file(FileConfig::load(&path)?);
        }
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Zero `port` or `request_timeout_ms` keeps the current setting, as in `apply_env`.
    pub fn apply_file(&mut self, file: FileConfig) {
        if let Some(port) = file.port.filter(|p| non_zero("port", *p as u64)) {
            self.port = port;
        }
        if let Some(ms) = file.request_timeout_ms.filter(|ms| non_zero("request_timeout_ms", *ms)) {
            self.request_timeout = Duration::from_millis(ms);
        }
        if let Some(max) = file.max_redirects {
            self.max_redirects = max;
        }
        if let Some(limit) = file.concurrency {
            self.concurrency = limit;
        }
    }

    /// Unparsable or zero values keep the current setting and log a warning.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = parse_env::<u16>(&lookup, "PORT").filter(|p| *p > 0) {
            self.port = port;
        }
        if let Some(ms) = parse_env::<u64>(&lookup, "REQUEST_TIMEOUT").filter(|ms| *ms > 0) {
            self.request_timeout = Duration::from_millis(ms);
        }
        if let Some(max) = parse_env::<u32>(&lookup, "MAX_REDIRECTS") {
            self.max_redirects = max;
        }
        if let Some(limit) = parse_env::<ConcurrencyLimit>(&lookup, "CONCURRENCY_LIMIT") {
            self.concurrency = limit;
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TitleError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }
}

/// An explicitly named file must exist; the default one is optional.
fn config_file_path() -> Option<PathBuf> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(p) if !p.trim().is_empty() => Some(PathBuf::from(p)),
        _ => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

fn non_zero(key: &str, value: u64) -> bool {
    if value == 0 {
        warn!("Ignoring {}=0 in config file, keeping default", key);
    }
    value > 0
}

fn parse_env<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring invalid {}='{}', keeping default", key, raw);
            None
        }
    }
}
