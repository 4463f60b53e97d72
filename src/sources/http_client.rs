use crate::config::HttpConfig;
use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Shared HTTP client for provider fetches and message delivery.
///
/// Exactly one attempt per request: callers decide what a failure means.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { inner })
    }

    /// GET a URL and return the body, failing on any non-2xx status.
    pub async fn get_text(&self, url: &url::Url) -> Result<String, reqwest::Error> {
        debug!("GET {}", redact(url));
        self.inner
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    /// POST a JSON body; the response is returned whatever its status.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &url::Url,
        body: &T,
    ) -> Result<reqwest::Response, reqwest::Error> {
        // path carries the bot token
        debug!("POST {}", url.host_str().unwrap_or_default());
        self.inner.post(url.clone()).json(body).send().await
    }
}

/// URL with credential-bearing query parameters masked, for logging.
pub fn redact(url: &url::Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let masked = matches!(k.as_ref(), "apikey" | "token");
            (k.into_owned(), if masked { "***".to_string() } else { v.into_owned() })
        })
        .collect();
    if pairs.is_empty() {
        return shown.to_string();
    }
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}
