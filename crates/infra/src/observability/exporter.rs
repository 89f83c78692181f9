use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use prometheus::{Encoder, Gauge, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use tillstat_domain::constants::{
    METRIC_LAST_SUCCESS_TIMESTAMP, METRIC_PAYMENTS_AVG_VALUE, METRIC_PAYMENTS_COUNT,
    METRIC_PAYMENTS_VALUE, METRIC_REFUNDS_COUNT, METRIC_REFUNDS_VALUE, METRIC_SCRAPE_DURATION,
    METRIC_SCRAPE_ERRORS, METRIC_SCRAPE_SUCCESS,
};
use tillstat_domain::{Aggregate, Result, ScrapeSnapshot, TillstatError};
use tracing::debug;

use crate::errors::InfraError;

/// Content type of the Prometheus text exposition format.
pub const TEXT_CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Gauge set published on `/metrics`.
///
/// Holds the five transaction gauges plus the exporter's own scrape
/// health metrics. All of them are registered at construction, so every
/// gauge appears in the output with value `0` before the first scrape.
///
/// Updates and rendering share one lock, so a rendered exposition always
/// shows the gauges of a single scrape.
#[derive(Clone)]
pub struct ExporterMetrics {
    registry: Registry,
    publish: Arc<Mutex<()>>,
    payments_count: IntGauge,
    payments_value: IntGauge,
    payments_avg_value: Gauge,
    refunds_count: IntGauge,
    refunds_value: IntGauge,
    scrape_success: IntGauge,
    scrape_duration: Gauge,
    last_success: Gauge,
    scrape_errors: IntCounterVec,
}

impl ExporterMetrics {
    /// Create the gauges and register them in a fresh registry.
    ///
    /// # Errors
    /// Returns `TillstatError::Metrics` if a metric cannot be created or
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let payments_count = int_gauge(
            &registry,
            METRIC_PAYMENTS_COUNT,
            "Number of payments in the look-back window",
        )?;
        let payments_value = int_gauge(
            &registry,
            METRIC_PAYMENTS_VALUE,
            "Total value of payments in the look-back window (in minor currency units)",
        )?;
        let payments_avg_value = gauge(
            &registry,
            METRIC_PAYMENTS_AVG_VALUE,
            "Average payment value in the look-back window (in minor currency units)",
        )?;
        let refunds_count = int_gauge(
            &registry,
            METRIC_REFUNDS_COUNT,
            "Number of refunds in the look-back window",
        )?;
        let refunds_value = int_gauge(
            &registry,
            METRIC_REFUNDS_VALUE,
            "Total value of refunds in the look-back window (in minor currency units)",
        )?;

        let scrape_success = int_gauge(
            &registry,
            METRIC_SCRAPE_SUCCESS,
            "Whether the last scrape of the Square API succeeded (1) or failed (0)",
        )?;
        let scrape_duration = gauge(
            &registry,
            METRIC_SCRAPE_DURATION,
            "Duration of the last scrape of the Square API in seconds",
        )?;
        let last_success = gauge(
            &registry,
            METRIC_LAST_SUCCESS_TIMESTAMP,
            "Unix time of the last successful scrape",
        )?;

        let scrape_errors = IntCounterVec::new(
            Opts::new(METRIC_SCRAPE_ERRORS, "Failed scrapes of the Square API by error kind"),
            &["kind"],
        )
        .map_err(metrics_error)?;
        registry.register(Box::new(scrape_errors.clone())).map_err(metrics_error)?;

        Ok(Self {
            registry,
            publish: Arc::new(Mutex::new(())),
            payments_count,
            payments_value,
            payments_avg_value,
            refunds_count,
            refunds_value,
            scrape_success,
            scrape_duration,
            last_success,
            scrape_errors,
        })
    }

    /// Publish a successful scrape.
    pub fn apply_snapshot(&self, snapshot: &ScrapeSnapshot, elapsed: Duration) {
        let _guard = self.lock();
        set_aggregate(&self.payments_count, &self.payments_value, &snapshot.payments);
        self.payments_avg_value.set(snapshot.payments.avg_value);
        set_aggregate(&self.refunds_count, &self.refunds_value, &snapshot.refunds);

        self.scrape_success.set(1);
        self.scrape_duration.set(elapsed.as_secs_f64());
        self.last_success.set(snapshot.window.end.timestamp_millis() as f64 / 1000.0);

        debug!(
            payments = snapshot.payments.count,
            refunds = snapshot.refunds.count,
            elapsed_ms = elapsed.as_millis() as u64,
            "gauges updated"
        );
    }

    /// Record a failed scrape.
    ///
    /// The transaction gauges keep their previous values.
    pub fn record_failure(&self, error: &TillstatError, elapsed: Duration) {
        let _guard = self.lock();
        self.scrape_errors.with_label_values(&[error.label()]).inc();
        self.scrape_success.set(0);
        self.scrape_duration.set(elapsed.as_secs_f64());
    }

    /// Serialize every registered metric in the text exposition format.
    ///
    /// # Errors
    /// Returns `TillstatError::Metrics` if encoding fails.
    pub fn render(&self) -> Result<String> {
        let families = {
            let _guard = self.lock();
            self.registry.gather()
        };

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer).map_err(metrics_error)?;
        String::from_utf8(buffer)
            .map_err(|err| TillstatError::Metrics(format!("exposition is not UTF-8: {err}")))
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.publish.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn set_aggregate(count: &IntGauge, value: &IntGauge, aggregate: &Aggregate) {
    count.set(i64::try_from(aggregate.count).unwrap_or(i64::MAX));
    value.set(aggregate.total_value);
}

fn int_gauge(registry: &Registry, name: &str, help: &str) -> Result<IntGauge> {
    let gauge = IntGauge::new(name, help).map_err(metrics_error)?;
    registry.register(Box::new(gauge.clone())).map_err(metrics_error)?;
    Ok(gauge)
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<Gauge> {
    let gauge = Gauge::new(name, help).map_err(metrics_error)?;
    registry.register(Box::new(gauge.clone())).map_err(metrics_error)?;
    Ok(gauge)
}

fn metrics_error(err: prometheus::Error) -> TillstatError {
    InfraError::from(err).into()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};
    use prometheus_parse::{Scrape, Value};
    use tillstat_domain::Window;

    use super::*;

    /// Samples of the exposition keyed by series (name plus labels).
    fn parse(text: &str) -> HashMap<String, f64> {
        let scrape =
            Scrape::parse(text.lines().map(|line| Ok(line.to_owned()))).expect("exposition parses");

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
                let rendered: Vec<_> =
                    labels.iter().map(|(k, v)| format!("{k}=\"{v}\"")).collect();
                format!("{}{{{}}}", sample.metric, rendered.join(","))
            };

            assert!(series.insert(key.clone(), value).is_none(), "duplicate series {key}");
        }
        series
    }

    fn snapshot(payments: Aggregate, refunds: Aggregate) -> ScrapeSnapshot {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        ScrapeSnapshot {
            window: Window::trailing(now, 24).unwrap(),
            payments,
            refunds,
            currency: Some("USD".into()),
        }
    }

    #[test]
    fn gauges_are_present_before_first_scrape() {
        let metrics = ExporterMetrics::new().unwrap();
        let samples = parse(&metrics.render().unwrap());

        for name in [
            METRIC_PAYMENTS_COUNT,
            METRIC_PAYMENTS_VALUE,
            METRIC_PAYMENTS_AVG_VALUE,
            METRIC_REFUNDS_COUNT,
            METRIC_REFUNDS_VALUE,
        ] {
            assert_eq!(samples.get(name), Some(&0.0), "{name} missing or non-zero");
        }
    }

    #[test]
    fn snapshot_round_trips_through_exposition() {
        let metrics = ExporterMetrics::new().unwrap();
        metrics.apply_snapshot(
            &snapshot(Aggregate::from_totals(3, 6000), Aggregate::zero()),
            Duration::from_millis(250),
        );

        let samples = parse(&metrics.render().unwrap());
        assert_eq!(samples[METRIC_PAYMENTS_COUNT], 3.0);
        assert_eq!(samples[METRIC_PAYMENTS_VALUE], 6000.0);
        assert_eq!(samples[METRIC_PAYMENTS_AVG_VALUE], 2000.0);
        assert_eq!(samples[METRIC_REFUNDS_COUNT], 0.0);
        assert_eq!(samples[METRIC_REFUNDS_VALUE], 0.0);
        assert_eq!(samples[METRIC_SCRAPE_SUCCESS], 1.0);
        assert_eq!(samples[METRIC_SCRAPE_DURATION], 0.25);
        assert_eq!(samples[METRIC_LAST_SUCCESS_TIMESTAMP], 1_718_452_800.0);
    }

    #[test]
    fn failure_keeps_previous_values() {
        let metrics = ExporterMetrics::new().unwrap();
        metrics.apply_snapshot(
            &snapshot(Aggregate::from_totals(2, 900), Aggregate::from_totals(1, 100)),
            Duration::from_millis(10),
        );

        let error = TillstatError::Auth("HTTP 401 Unauthorized".into());
        metrics.record_failure(&error, Duration::from_millis(20));
        metrics.record_failure(&error, Duration::from_millis(30));

        let samples = parse(&metrics.render().unwrap());
        assert_eq!(samples[METRIC_PAYMENTS_COUNT], 2.0);
        assert_eq!(samples[METRIC_PAYMENTS_VALUE], 900.0);
        assert_eq!(samples[METRIC_REFUNDS_COUNT], 1.0);
        assert_eq!(samples[METRIC_SCRAPE_SUCCESS], 0.0);
        assert_eq!(samples[&format!("{METRIC_SCRAPE_ERRORS}{{kind=\"auth\"}}")], 2.0);
    }

    #[test]
    fn registries_are_independent() {
        let first = ExporterMetrics::new().unwrap();
        let second = ExporterMetrics::new().unwrap();

        first.apply_snapshot(
            &snapshot(Aggregate::from_totals(1, 500), Aggregate::zero()),
            Duration::ZERO,
        );

        let samples = parse(&second.render().unwrap());
        assert_eq!(samples[METRIC_PAYMENTS_COUNT], 0.0);
    }

    #[test]
    fn transaction_metrics_are_documented_gauges() {
        let metrics = ExporterMetrics::new().unwrap();
        let text = metrics.render().unwrap();
        let scrape = Scrape::parse(text.lines().map(|line| Ok(line.to_owned()))).unwrap();

        for name in [
            METRIC_PAYMENTS_COUNT,
            METRIC_PAYMENTS_VALUE,
            METRIC_PAYMENTS_AVG_VALUE,
            METRIC_REFUNDS_COUNT,
            METRIC_REFUNDS_VALUE,
        ] {
            let sample = scrape
                .samples
                .iter()
                .find(|sample| sample.metric == name)
                .unwrap_or_else(|| panic!("{name} missing"));
            assert!(matches!(sample.value, Value::Gauge(_)), "{name} is not a gauge");
            assert!(scrape.docs.contains_key(name), "{name} has no HELP line");
        }
        assert_eq!(TEXT_CONTENT_TYPE, "text/plain; version=0.0.4");
    }

    #[test]
    fn render_never_mixes_snapshots() {
        let metrics = ExporterMetrics::new().unwrap();
        let writers: Vec<_> = (1..=4u64)
            .map(|n| {
                let metrics = metrics.clone();
                std::thread::spawn(move || {
                    let totals = Aggregate::from_totals(n, n as i64 * 100);
                    for _ in 0..200 {
                        metrics.apply_snapshot(&snapshot(totals, totals), Duration::ZERO);
                    }
                })
            })
            .collect();

        for _ in 0..200 {
            let samples = parse(&metrics.render().unwrap());
            assert_eq!(samples[METRIC_PAYMENTS_COUNT], samples[METRIC_REFUNDS_COUNT]);
            assert_eq!(samples[METRIC_PAYMENTS_VALUE], samples[METRIC_REFUNDS_VALUE]);
        }

        for writer in writers {
            writer.join().unwrap();
        }
    }
}
