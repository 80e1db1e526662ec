use async_trait::async_trait;

/// Network transport used by the title fetcher.
///
/// Implementations issue a single GET without following redirects; every
/// transport fault (DNS, connect, malformed URL) is reported as `Err`.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<Box<dyn HttpResponsePort>, String>;
}

/// Response head with a lazily read body, so non-200 responses never pull
/// their payload.
#[async_trait]
pub trait HttpResponsePort: Send {
    fn status(&self) -> u16;

    fn location(&self) -> Option<String>;

    async fn text(self: Box<Self>) -> Result<String, String>;
}
