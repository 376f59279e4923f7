//! Per-request quote pipeline: normalize → fetch → derive.
//!
//! Stateless. The only shared piece is the upstream source (and its pooled
//! HTTP client); every call builds its own symbol and quote.

pub mod derive;
pub mod normalize;

use crate::error::QuoteError;
use crate::models::{Quote, QuoteRequest};
use crate::upstream::QuoteSource;
use std::sync::Arc;
use tracing::{debug, info};

use self::derive::derive;
use self::normalize::normalize;

#[derive(Clone)]
pub struct QuoteService {
    source: Arc<dyn QuoteSource>,
}

impl QuoteService {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    pub async fn quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        let symbol = normalize(&request.symbol).inspect_err(|_| {
            debug!("Rejected blank symbol {:?}", request.symbol);
        })?;
        info!(%symbol, "quote request");

        let meta = self.source.fetch(&symbol).await?;
        let quote = derive(&symbol, meta);

        info!(
            symbol = %quote.symbol,
            price = ?quote.price,
            change_pct = ?quote.change_percent,
            "quote derived"
        );
        Ok(quote)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingSource;
    use super::*;
    use crate::upstream::payload::ChartMeta;

    fn service(source: &Arc<RecordingSource>) -> QuoteService {
        QuoteService::new(Arc::clone(source) as Arc<dyn QuoteSource>)
    }

    #[tokio::test]
    async fn blank_symbol_never_reaches_upstream() {
        let source = Arc::new(RecordingSource::ok(ChartMeta::default()));
        let svc = service(&source);

        for raw in ["", "   ", "\t\n"] {
            let err = svc.quote(&QuoteRequest::new(raw)).await.unwrap_err();
            assert_eq!(err, QuoteError::InvalidInput);
        }
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn fetches_normalized_symbol_once() {
        let source = Arc::new(RecordingSource::ok(ChartMeta {
            regular_market_price: Some(2500.0),
            previous_close: Some(2480.0),
            ..Default::default()
        }));
        let svc = service(&source);

        let quote = svc.quote(&QuoteRequest::new(" reliance ")).await.unwrap();
        assert_eq!(source.calls(), vec!["RELIANCE.NS".to_string()]);
        assert_eq!(quote.symbol, "RELIANCE.NS");
        assert_eq!(quote.change, Some(20.0));
    }

    #[tokio::test]
    async fn upstream_errors_propagate_unchanged() {
        let source = Arc::new(RecordingSource::failing(QuoteError::NotFound("ZZZ.NS".into())));
        let svc = service(&source);

        let err = svc.quote(&QuoteRequest::new("zzz")).await.unwrap_err();
        assert_eq!(err, QuoteError::NotFound("ZZZ.NS".into()));
        assert_eq!(source.calls().len(), 1);
    }
}
