use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tillstat_domain::FetchErrorPolicy;
use tillstat_infra::observability::TEXT_CONTENT_TYPE;
use tracing::error;

use crate::context::AppContext;
use crate::utils::logging::log_scrape_outcome;

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// Scrape Square and return the exposition
///
/// Runs one collection per request. When the collection fails, the response
/// depends on the configured policy: `serve_stale` answers 200 with the last
/// good gauge values, `fail` answers 503.
pub async fn metrics(State(context): State<Arc<AppContext>>) -> Response {
    let started = Instant::now();
    let outcome = context.scrape_service.collect().await;
    let elapsed = started.elapsed();

    match outcome {
        Ok(snapshot) => {
            context.metrics.apply_snapshot(&snapshot, elapsed);
            log_scrape_outcome(elapsed, None);
        }
        Err(err) => {
            context.metrics.record_failure(&err, elapsed);
            log_scrape_outcome(elapsed, Some(&err));

            if context.on_fetch_error == FetchErrorPolicy::Fail {
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    [(header::CONTENT_TYPE, PLAIN_TEXT)],
                    format!("scrape failed ({}): {err}\n", err.label()),
                )
                    .into_response();
            }
        }
    }

    match context.metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)], body).into_response(),
        Err(err) => {
            error!(error = %err, "failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, PLAIN_TEXT)],
                format!("{err}\n"),
            )
                .into_response()
        }
    }
}
