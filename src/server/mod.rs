//! Inbound HTTP surface.
//!
//! `POST /` or `POST /quote` with `{ "symbol": "..." }`. `OPTIONS` answers
//! browser preflights, every other verb gets a JSON 405. All responses carry
//! permissive CORS headers.

use crate::config::ServerConfig;
use crate::error::QuoteError;
use crate::models::{Quote, QuoteRequest};
use crate::pipeline::QuoteService;
use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN};
use axum::http::{HeaderValue, StatusCode};
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

pub fn router(service: QuoteService) -> Router {
    Router::new()
        .route("/", quote_route())
        .route("/quote", quote_route())
        .route("/health", get(health))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

fn quote_route() -> MethodRouter<QuoteService> {
    post(quote).options(preflight).fallback(method_not_allowed)
}

pub async fn serve(config: &ServerConfig, service: QuoteService) -> Result<()> {
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn quote(State(service): State<QuoteService>, body: Bytes) -> Result<Json<Quote>, QuoteError> {
    let request = QuoteRequest::from_body(&body);
    service.quote(&request).await.map(Json)
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> QuoteError {
    QuoteError::MethodNotAllowed
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::RecordingSource;
    use crate::upstream::payload::ChartMeta;
    use crate::upstream::QuoteSource;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use axum::response::Response;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(source: &Arc<RecordingSource>) -> Router {
        router(QuoteService::new(Arc::clone(source) as Arc<dyn QuoteSource>))
    }

    fn reliance_meta() -> ChartMeta {
        ChartMeta {
            regular_market_price: Some(2500.0),
            previous_close: Some(2480.0),
            regular_market_change: Some(1.0),
            exchange_name: Some("NSI".into()),
            long_name: Some("Reliance Industries Limited".into()),
            regular_market_time: Some(1_704_067_200.0),
            ..Default::default()
        }
    }

    async fn send(app: Router, method: Method, uri: &str, body: &str) -> Response {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.oneshot(req).await.unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn assert_cors(resp: &Response) {
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_HEADERS], ALLOWED_HEADERS);
    }

    #[tokio::test]
    async fn post_returns_derived_quote() {
        let source = Arc::new(RecordingSource::ok(reliance_meta()));

        for uri in ["/", "/quote"] {
            let resp = send(app(&source), Method::POST, uri, r#"{"symbol":"reliance"}"#).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_cors(&resp);

            let body = json_body(resp).await;
            assert_eq!(body["symbol"], "RELIANCE.NS");
            assert_eq!(body["price"], 2500.0);
            assert_eq!(body["previousClose"], 2480.0);
            assert_eq!(body["change"], 20.0);
            assert!((body["changePercent"].as_f64().unwrap() - 0.8065).abs() < 1e-4);
            assert_eq!(body["currency"], "INR");
            assert_eq!(body["marketTime"], "2024-01-01T00:00:00.000Z");
            assert_eq!(body["exchangeName"], "NSI");
            assert!(body["shortName"].is_null());
        }
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn blank_or_missing_symbol_is_400_without_upstream_call() {
        let source = Arc::new(RecordingSource::ok(reliance_meta()));

        for body in [r#"{"symbol":"   "}"#, r#"{}"#, "not json", ""] {
            let resp = send(app(&source), Method::POST, "/", body).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body:?}");
            assert_cors(&resp);
            assert_eq!(json_body(resp).await, json!({ "error": "symbol is required" }));
        }
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn options_is_empty_preflight() {
        let source = Arc::new(RecordingSource::ok(reliance_meta()));

        let resp = send(app(&source), Method::OPTIONS, "/", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(&resp);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn other_methods_are_405_json() {
        let source = Arc::new(RecordingSource::ok(reliance_meta()));

        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
            let resp = send(app(&source), method.clone(), "/", r#"{"symbol":"tcs"}"#).await;
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
            assert_cors(&resp);
            assert_eq!(json_body(resp).await, json!({ "error": "Method not allowed" }));
        }
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn upstream_failures_map_to_minimal_errors() {
        let cases = [
            (
                QuoteError::UpstreamUnavailable("dns error: no such host".into()),
                StatusCode::BAD_GATEWAY,
                "Upstream request failed",
            ),
            (
                QuoteError::UpstreamError { status: 429, body: "Too Many Requests".into() },
                StatusCode::BAD_GATEWAY,
                "Failed to fetch quote",
            ),
            (
                QuoteError::UpstreamMalformed("expected value at line 1".into()),
                StatusCode::BAD_GATEWAY,
                "Invalid upstream response",
            ),
            (
                QuoteError::NotFound("XYZ.NS".into()),
                StatusCode::NOT_FOUND,
                "No data found",
            ),
        ];

        for (err, status, message) in cases {
            let source = Arc::new(RecordingSource::failing(err));
            let resp = send(app(&source), Method::POST, "/", r#"{"symbol":"xyz"}"#).await;
            assert_eq!(resp.status(), status);
            assert_cors(&resp);

            let body = json_body(resp).await;
            assert_eq!(body, json!({ "error": message }));
        }
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let source = Arc::new(RecordingSource::ok(ChartMeta::default()));
        let resp = send(app(&source), Method::GET, "/health", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await, json!({ "status": "ok" }));
    }
}
