//! Log subscriber setup and the per-request span used by the trace layer.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response},
};
use tracing::{field, info_span, Span};

const DEFAULT_FILTER: &str = "recipegen=debug,axum=info,tower_http=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter and
/// `LOG_FORMAT=json` switches to one JSON object per line.
pub fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref()) {
        LogFormat::Json => builder.with_target(false).json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Which front end a path belongs to.
fn surface(path: &str) -> &'static str {
    if path.starts_with("/api/") {
        "api"
    } else {
        "page"
    }
}

pub fn make_span(req: &Request<Body>) -> Span {
    let path = req.uri().path();
    info_span!(
        "http_request",
        method = %req.method(),
        surface = surface(path),
        path,
        status = field::Empty,
    )
}

pub fn on_response(res: &Response<Body>, latency: Duration, span: &Span) {
    let status = res.status();
    span.record("status", field::display(status));
    let latency_ms = latency.as_millis() as u64;
    if status.is_server_error() {
        tracing::error!(%status, latency_ms, "request failed");
    } else {
        tracing::info!(%status, latency_ms, "request served");
    }
}
