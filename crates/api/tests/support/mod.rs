#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use prometheus_parse::{Scrape, Value};
use tillstat_api::{create_router, AppContext};
use tillstat_core::{Clock, ScrapeService, TransactionSource};
use tillstat_domain::{
    FetchErrorPolicy, Result as DomainResult, TillstatError, Transaction, Window,
};
use tillstat_infra::ExporterMetrics;
use tower::ServiceExt;

/// Instant every test scrape runs at.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

#[derive(Clone)]
enum Script {
    Records { payments: Vec<Transaction>, refunds: Vec<Transaction> },
    Fail(TillstatError),
}

/// Transaction source whose next answer the test controls.
#[derive(Clone)]
pub struct ScriptedSource {
    script: Arc<Mutex<Script>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(payments: Vec<Transaction>, refunds: Vec<Transaction>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script::Records { payments, refunds })),
            calls: Arc::default(),
        }
    }

    pub fn failing(error: TillstatError) -> Self {
        Self { script: Arc::new(Mutex::new(Script::Fail(error))), calls: Arc::default() }
    }

    /// Make every following fetch fail with `error`.
    pub fn fail_with(&self, error: TillstatError) {
        *self.script.lock().unwrap() = Script::Fail(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self, refunds: bool) -> DomainResult<Vec<Transaction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.script.lock().unwrap() {
            Script::Records { payments, refunds: r } => {
                Ok(if refunds { r.clone() } else { payments.clone() })
            }
            Script::Fail(error) => Err(error.clone()),
        }
    }
}

#[async_trait]
impl TransactionSource for ScriptedSource {
    async fn fetch_payments(&self, _window: &Window) -> DomainResult<Vec<Transaction>> {
        self.answer(false)
    }

    async fn fetch_refunds(&self, _window: &Window) -> DomainResult<Vec<Transaction>> {
        self.answer(true)
    }
}

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        now()
    }
}

/// Router backed by `source` with a pinned clock and a fresh registry.
pub fn router(source: ScriptedSource, policy: FetchErrorPolicy) -> Router {
    let service = ScrapeService::new(Arc::new(source), 24).with_clock(Arc::new(FixedClock));
    let metrics = ExporterMetrics::new().unwrap();
    create_router(Arc::new(AppContext::from_parts(service, metrics, policy)))
}

/// Send a GET request through the router.
pub async fn get(router: &Router, uri: &str) -> (Response<Body>, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    (Response::from_parts(parts, Body::empty()), String::from_utf8(bytes.to_vec()).unwrap())
}

/// Parse an exposition and key every sample by series (name plus labels).
///
/// Panics on malformed text, untyped samples or duplicate series.
pub fn samples(text: &str) -> HashMap<String, f64> {
    let scrape = Scrape::parse(text.lines().map(|line| Ok(line.to_owned())))
        .expect("exposition parses");

    let mut series = HashMap::new();
    for sample in scrape.samples {
        let value = match sample.value {
            Value::Gauge(value) | Value::Counter(value) => value,
            other => panic!("{} has no gauge or counter TYPE line: {other:?}", sample.metric),
        };

        let mut labels: Vec<_> = sample.labels.iter().collect();
        labels.sort();
        let key = if labels.is_empty() {
            sample.metric.clone()
        } else {
            let rendered: Vec<_> = labels.iter().map(|(k, v)| format!("{k}=\"{v}\"")).collect();
            format!("{}{{{}}}", sample.metric, rendered.join(","))
        };

        assert!(series.insert(key.clone(), value).is_none(), "duplicate series {key}");
    }
    series
}
