use crate::config::UpstreamConfig;
use crate::error::QuoteError;
use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::debug;
use url::Url;

const ACCEPT_VALUE: &str = "application/json,text/plain,*/*";

/// Upstream error bodies are cut to this many characters before logging.
const BODY_SNIPPET_CHARS: usize = 400;

pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { inner })
    }

    /// Single GET, no retry. The request future is cancel-safe: dropping it
    /// aborts the in-flight call.
    pub async fn get_text(&self, url: Url) -> Result<String, QuoteError> {
        debug!("GET {}", url);

        let resp = self
            .inner
            .get(url)
            .header(ACCEPT, ACCEPT_VALUE)
            .send()
            .await
            .map_err(|e| QuoteError::UpstreamUnavailable(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| QuoteError::UpstreamUnavailable(format!("reading body: {e}")))?;

        if !status.is_success() {
            return Err(QuoteError::UpstreamError {
                status: status.as_u16(),
                body: snippet(&text),
            });
        }

        Ok(text)
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(BODY_SNIPPET_CHARS).collect()
}
