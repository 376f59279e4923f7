//! Chart metadata → [`Quote`].
//!
//! All fallback rules live here. The one ordering that matters: `change` and
//! `changePercent` are computed from price/previousClose whenever both exist,
//! and only fall back to upstream's raw fields otherwise, so the four values
//! always agree arithmetically.

use crate::models::{NormalizedSymbol, Quote};
use crate::upstream::payload::ChartMeta;
use chrono::{DateTime, SecondsFormat, Utc};

pub const DEFAULT_CURRENCY: &str = "INR";

pub fn derive(symbol: &NormalizedSymbol, meta: ChartMeta) -> Quote {
    let price = meta.regular_market_price;
    let previous_close = meta.previous_close.or(meta.chart_previous_close);

    let change = match (price, previous_close) {
        (Some(p), Some(pc)) => finite(p - pc),
        _ => None,
    }
    .or(meta.regular_market_change);

    let change_percent = match (change, previous_close) {
        (Some(c), Some(pc)) if pc != 0.0 => finite(c / pc * 100.0),
        _ => None,
    }
    .or(meta.regular_market_change_percent);

    Quote {
        symbol: meta.symbol.unwrap_or_else(|| symbol.to_string()),
        price,
        previous_close,
        change,
        change_percent,
        currency: meta.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        market_time: meta.regular_market_time.and_then(epoch_secs_to_iso),
        exchange_name: meta.exchange_name,
        short_name: meta.short_name,
        long_name: meta.long_name,
    }
}

fn finite(n: f64) -> Option<f64> {
    n.is_finite().then_some(n)
}

/// 1704067200 → "2024-01-01T00:00:00.000Z". Sub-millisecond precision is truncated.
fn epoch_secs_to_iso(secs: f64) -> Option<String> {
    let millis = (secs * 1000.0).trunc();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
}
