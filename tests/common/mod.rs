#![allow(dead_code)]

use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use title_fetcher::app::ports::{HttpClientPort, HttpResponsePort};
use title_fetcher::{BatchOrchestrator, ConcurrencyLimit, SharedOrchestrator, TitleFetcher};

#[derive(Clone, Debug)]
pub enum Reply {
    Page(String),
    Status(u16),
    Redirect(String),
    DnsFailure,
}

struct ScriptedResponse {
    status: u16,
    location: Option<String>,
    body: String,
}

#[async_trait]
impl HttpResponsePort for ScriptedResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn location(&self) -> Option<String> {
        self.location.clone()
    }

    async fn text(self: Box<Self>) -> Result<String, String> {
        Ok(self.body)
    }
}

/// In-process transport keyed by full URL. Unknown URLs fail like a DNS lookup.
#[derive(Default)]
pub struct ScriptedHttp {
    replies: HashMap<String, (Reply, Duration)>,
    jitter_ms: u64,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, url: &str, reply: Reply) -> Self {
        self.replies.insert(url.to_string(), (reply, Duration::ZERO));
        self
    }

    pub fn reply_after(mut self, url: &str, reply: Reply, delay: Duration) -> Self {
        self.replies.insert(url.to_string(), (reply, delay));
        self
    }

    /// Adds up to `ms` of random latency to every request.
    pub fn with_jitter(mut self, ms: u64) -> Self {
        self.jitter_ms = ms;
        self
    }
}

#[async_trait]
impl HttpClientPort for ScriptedHttp {
    async fn get(&self, url: &str) -> Result<Box<dyn HttpResponsePort>, String> {
        let (reply, delay) = self
            .replies
            .get(url)
            .cloned()
            .unwrap_or((Reply::DnsFailure, Duration::ZERO));
        let jitter = if self.jitter_ms > 0 {
            Duration::from_millis(rand::thread_rng().gen_range(0..=self.jitter_ms))
        } else {
            Duration::ZERO
        };
        tokio::time::sleep(delay + jitter).await;

        let (status, location, body) = match reply {
            Reply::Page(html) => (200, None, html),
            Reply::Status(code) => (code, None, String::new()),
            Reply::Redirect(to) => (302, Some(to), String::new()),
            Reply::DnsFailure => return Err(format!("failed to lookup address information: {url}")),
        };
        Ok(Box::new(ScriptedResponse { status, location, body }))
    }
}

/// Transport whose worker dies mid-request, standing in for a batch-wide fault.
pub struct PanickingHttp;

#[async_trait]
impl HttpClientPort for PanickingHttp {
    async fn get(&self, _url: &str) -> Result<Box<dyn HttpResponsePort>, String> {
        panic!("transport blew up");
    }
}

pub fn page(title: &str) -> Reply {
    Reply::Page(format!("<html><head><title>{title}</title></head><body></body></html>"))
}

pub fn orchestrator(http: ScriptedHttp, limit: ConcurrencyLimit, timeout: Duration) -> SharedOrchestrator {
    let http: Arc<dyn HttpClientPort> = Arc::new(http);
    Arc::new(BatchOrchestrator::new(TitleFetcher::new(http, timeout, 5), limit))
}

pub fn panicking_orchestrator() -> SharedOrchestrator {
    let http: Arc<dyn HttpClientPort> = Arc::new(PanickingHttp);
    Arc::new(BatchOrchestrator::new(
        TitleFetcher::new(http, Duration::from_secs(2), 5),
        ConcurrencyLimit::default(),
    ))
}
