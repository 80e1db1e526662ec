use crate::app::ports::{HttpClientPort, HttpResponsePort};
use crate::constants::USER_AGENT;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;

/// reqwest transport. Redirects are left to the title fetcher so its hop
/// budget and deadline govern the whole chain.
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

struct ReqwestResponse(reqwest::Response);

#[async_trait]
impl HttpResponsePort for ReqwestResponse {
    fn status(&self) -> u16 {
        self.0.status().as_u16()
    }

    fn location(&self) -> Option<String> {
        self.0
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }

    async fn text(self: Box<Self>) -> std::result::Result<String, String> {
        self.0.text().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, url: &str) -> std::result::Result<Box<dyn HttpResponsePort>, String> {
        let resp = self.client.get(url).send().await.map_err(|e| e.to_string())?;
        Ok(Box::new(ReqwestResponse(resp)))
    }
}
