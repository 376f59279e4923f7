pub mod http_client;
pub mod payload;

use crate::config::UpstreamConfig;
use crate::error::QuoteError;
use crate::models::NormalizedSymbol;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::{error, info, warn};
use url::Url;

use self::http_client::HttpClient;
use self::payload::ChartMeta;

/// Chart window requested from upstream. Fixed, not caller-controllable.
pub const CHART_RANGE: &str = "1d";
pub const CHART_INTERVAL: &str = "5m";

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable upstream abstraction.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self, symbol: &NormalizedSymbol) -> Result<ChartMeta, QuoteError>;
}

// ── Yahoo chart endpoint ──────────────────────────────────────────────────────

pub struct YahooChartSource {
    client: HttpClient,
    base_url: Url,
}

impl YahooChartSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid upstream base_url {:?}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Upstream base_url {:?} cannot carry a path", config.base_url);
        }

        Ok(Self {
            client: HttpClient::new(config)?,
            base_url,
        })
    }

    /// e.g. RELIANCE.NS → {base}/RELIANCE.NS?range=1d&interval=5m
    fn chart_url(&self, symbol: &NormalizedSymbol) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(symbol.as_str());
        }
        url.query_pairs_mut()
            .append_pair("range", CHART_RANGE)
            .append_pair("interval", CHART_INTERVAL);
        url
    }
}

#[async_trait]
impl QuoteSource for YahooChartSource {
    async fn fetch(&self, symbol: &NormalizedSymbol) -> Result<ChartMeta, QuoteError> {
        let url = self.chart_url(symbol);

        let outcome = match self.client.get_text(url).await {
            Ok(body) => ChartMeta::from_body(symbol.as_str(), &body),
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(_) => info!(%symbol, outcome = "ok", "upstream chart fetched"),
            Err(e @ QuoteError::NotFound(_)) => {
                warn!(%symbol, outcome = e.class(), "no meta in upstream response")
            }
            Err(e) => error!(%symbol, outcome = e.class(), error = %e, "upstream fetch failed"),
        }

        outcome
    }
}
