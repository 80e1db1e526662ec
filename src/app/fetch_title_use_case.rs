use crate::address::{with_default_scheme, Address};
use crate::app::ports::HttpClientPort;
use crate::metrics::FetchMetrics;
use crate::types::{FetchOutcome, NoResponseReason};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<title(?:\s[^>]*)?>(.*?)</title\s*>").expect("title pattern is valid")
});

/// First `<title>` span of a document, trimmed; `None` when absent or blank.
pub fn extract_title(html: &str) -> Option<String> {
    let text = TITLE_RE.captures(html)?.get(1)?.as_str().trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Resolves one address to one `FetchOutcome`.
///
/// Never fails: transport faults, bad statuses, redirect loops and the
/// deadline all fold into a `NoResponse` variant.
pub struct TitleFetcher<H: HttpClientPort + ?Sized> {
    pub http: Arc<H>,
    pub timeout: Duration,
    pub max_redirects: u32,
}

impl<H: HttpClientPort + ?Sized> Clone for TitleFetcher<H> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            timeout: self.timeout,
            max_redirects: self.max_redirects,
        }
    }
}

impl<H: HttpClientPort + ?Sized> TitleFetcher<H> {
    pub fn new(http: Arc<H>, timeout: Duration, max_redirects: u32) -> Self {
        Self { http, timeout, max_redirects }
    }

    pub async fn fetch(&self, address: &Address) -> FetchOutcome {
        let started = Instant::now();
        // One deadline for the whole redirect chain; dropping the inner future
        // aborts whatever hop is in flight.
        let outcome = match tokio::time::timeout(self.timeout, self.follow_chain(address)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(address = %address, timeout_ms = self.timeout.as_millis() as u64, "Fetch timed out");
                NoResponseReason::Timeout.into()
            }
        };
        debug!(address = %address, outcome = outcome.label(), "Fetch resolved");
        FetchMetrics::record_outcome(&outcome, started.elapsed().as_secs_f64());
        outcome
    }

    async fn follow_chain(&self, address: &Address) -> FetchOutcome {
        let mut url = address.to_url();
        let mut redirects_left = self.max_redirects;

        loop {
            let resp = match self.http.get(&url).await {
                Ok(resp) => resp,
                Err(e) => {
                    debug!(url = %url, error = %e, "Transport fault");
                    return NoResponseReason::InvalidAddress.into();
                }
            };
            let status = resp.status();

            if (300..400).contains(&status) {
                if let Some(location) = resp.location() {
                    if redirects_left == 0 {
                        debug!(address = %address, max = self.max_redirects, "Redirect budget exhausted");
                        return NoResponseReason::TooManyRedirects.into();
                    }
                    redirects_left -= 1;
                    let next = resolve_location(&url, &location);
                    debug!(from = %url, to = %next, status, "Following redirect");
                    FetchMetrics::record_redirect();
                    url = next;
                    continue;
                }
            }

            if status != 200 {
                return NoResponseReason::StatusCode(status).into();
            }

            return match resp.text().await {
                Ok(body) => match extract_title(&body) {
                    Some(title) => FetchOutcome::Title(title),
                    None => NoResponseReason::NoTitleFound.into(),
                },
                Err(e) => {
                    debug!(url = %url, error = %e, "Body read failed");
                    NoResponseReason::InvalidAddress.into()
                }
            };
        }
    }
}

/// Resolves a `Location` header against the URL that produced it.
fn resolve_location(current: &str, location: &str) -> String {
    match url::Url::parse(current).and_then(|base| base.join(location)) {
        Ok(joined) => joined.to_string(),
        Err(_) => with_default_scheme(location),
    }
}
