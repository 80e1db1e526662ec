/// Default values shared by the config loader, the CLI and the fetch pipeline.

// Listener
pub const DEFAULT_PORT: u16 = 5000;
pub const TITLE_ROUTE: &str = "/I/want/title";
pub const ADDRESS_QUERY_KEY: &str = "address";

// Fetching
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Browser-like identifier sent with every fetch; some hosts refuse bare clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// Logging
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_NAME: &str = "title_fetcher.log";

// Config
pub const CONFIG_PATH_ENV: &str = "TITLES_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
