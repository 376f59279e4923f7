//! Chart endpoint payload: `chart.result[0].meta`.
//!
//! Every field is optional and type-tolerant. A field holding an unexpected
//! JSON type (a string where a number belongs, a nested object, ...) reads as
//! absent rather than failing the whole payload.
//!
//! The exception is a number serde_json cannot represent as `f64` (e.g.
//! `1e400`): the body is rejected during JSON parsing, before any field is
//! read, and the whole payload is `UpstreamMalformed`.

use crate::error::QuoteError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const META_POINTER: &str = "/chart/result/0/meta";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default, deserialize_with = "scalar_string")]
    pub symbol: Option<String>,

    #[serde(default, deserialize_with = "finite_number")]
    pub regular_market_price: Option<f64>,
    #[serde(default, deserialize_with = "finite_number")]
    pub previous_close: Option<f64>,
    #[serde(default, deserialize_with = "finite_number")]
    pub chart_previous_close: Option<f64>,
    #[serde(default, deserialize_with = "finite_number")]
    pub regular_market_change: Option<f64>,
    #[serde(default, deserialize_with = "finite_number")]
    pub regular_market_change_percent: Option<f64>,
    /// Epoch seconds.
    #[serde(default, deserialize_with = "finite_number")]
    pub regular_market_time: Option<f64>,

    #[serde(default, deserialize_with = "plain_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "plain_string")]
    pub exchange_name: Option<String>,
    #[serde(default, deserialize_with = "plain_string")]
    pub short_name: Option<String>,
    #[serde(default, deserialize_with = "plain_string")]
    pub long_name: Option<String>,
}

impl ChartMeta {
    /// Parse a raw upstream body.
    ///
    /// Fails with `UpstreamMalformed` when the body is not JSON, and with
    /// `NotFound` when it is JSON but carries no metadata object.
    pub fn from_body(symbol: &str, body: &str) -> Result<Self, QuoteError> {
        let payload: Value =
            serde_json::from_str(body).map_err(|e| QuoteError::UpstreamMalformed(e.to_string()))?;

        match payload.pointer(META_POINTER) {
            Some(meta @ Value::Object(_)) => serde_json::from_value(meta.clone())
                .map_err(|e| QuoteError::UpstreamMalformed(e.to_string())),
            _ => Err(QuoteError::NotFound(symbol.to_string())),
        }
    }
}

// ── Lenient field readers ─────────────────────────────────────────────────────

fn finite_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(v.as_f64().filter(|n| n.is_finite()))
}

fn plain_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Strings pass through, numbers and booleans are stringified.
fn scalar_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(Some(s)),
        v @ (Value::Number(_) | Value::Bool(_)) => Ok(Some(v.to_string())),
        _ => Ok(None),
    }
}
