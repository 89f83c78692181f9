use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

use crate::context::AppContext;
use crate::handlers::{health, metrics};

/// Build the exporter's router with request tracing applied.
pub fn create_router(context: Arc<AppContext>) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|req: &axum::http::Request<_>| {
            tracing::info_span!("http_request", method = %req.method(), uri = %req.uri())
        })
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new().level(Level::INFO).latency_unit(LatencyUnit::Millis),
        );

    Router::new()
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .layer(trace)
        .with_state(context)
}
