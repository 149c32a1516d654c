//! Observability infrastructure for the rightsizing service
//!
//! Provides:
//! - Prometheus metrics (outcomes per reason, price lookups, batch latency, potential savings)
//! - Structured JSON logging with tracing

use crate::models::{BatchOutcome, Outcome};
use crate::recommender::BatchSummary;
use prometheus::{
    register_gauge, register_histogram, register_int_counter_vec, Gauge, Histogram, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Histogram buckets for batch latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<RecommenderMetricsInner> = OnceLock::new();

struct RecommenderMetricsInner {
    outcomes_total: IntCounterVec,
    price_lookups_total: IntCounterVec,
    batch_latency_seconds: Histogram,
    potential_monthly_savings_usd: Gauge,
}

impl RecommenderMetricsInner {
    fn new() -> Self {
        Self {
            outcomes_total: register_int_counter_vec!(
                "rightsize_outcomes_total",
                "Sizing outcomes by result (recommended or reason code)",
                &["reason"]
            )
            .expect("Failed to register outcomes_total"),

            price_lookups_total: register_int_counter_vec!(
                "rightsize_price_lookups_total",
                "Price lookups served by the API, by result",
                &["result"]
            )
            .expect("Failed to register price_lookups_total"),

            batch_latency_seconds: register_histogram!(
                "rightsize_batch_latency_seconds",
                "Time spent sizing a batch of instances",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register batch_latency_seconds"),

            potential_monthly_savings_usd: register_gauge!(
                "rightsize_potential_monthly_savings_usd",
                "Monthly savings of the most recent batch, weighted by instance count"
            )
            .expect("Failed to register potential_monthly_savings_usd"),
        }
    }
}

/// Recommender metrics for Prometheus exposition
///
/// A lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct RecommenderMetrics {
    _private: (),
}

impl Default for RecommenderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommenderMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(RecommenderMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &RecommenderMetricsInner {
        GLOBAL_METRICS.get_or_init(RecommenderMetricsInner::new)
    }

    pub fn record_outcome(&self, outcome: &Outcome) {
        self.inner()
            .outcomes_total
            .with_label_values(&[outcome.metric_label()])
            .inc();
    }

    /// Record a batch: per-item outcomes, latency and the savings gauge
    pub fn record_batch(&self, outcomes: &[BatchOutcome], summary: &BatchSummary, duration_secs: f64) {
        for item in outcomes {
            self.record_outcome(&item.outcome);
        }
        self.inner().batch_latency_seconds.observe(duration_secs);
        self.inner()
            .potential_monthly_savings_usd
            .set(summary.total_monthly_savings);
    }

    pub fn record_price_lookup(&self, found: bool) {
        let result = if found { "hit" } else { "miss" };
        self.inner()
            .price_lookups_total
            .with_label_values(&[result])
            .inc();
    }

    pub fn outcome_count(&self, label: &str) -> u64 {
        self.inner().outcomes_total.with_label_values(&[label]).get()
    }
}

/// Structured logger for recommendation events
#[derive(Clone)]
pub struct StructuredLogger {
    source: String,
}

impl StructuredLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Log the outcome for a single instance
    pub fn log_recommendation(&self, item: &BatchOutcome, region: &str) {
        match &item.outcome {
            Outcome::Recommended {
                recommendation,
                note,
            } => {
                info!(
                    event = "recommendation_generated",
                    source = %self.source,
                    region = %region,
                    name = %item.name,
                    service = %item.service,
                    instance_type = %item.instance_type,
                    recommended_type = %recommendation.recommended_type,
                    predicted_utilization = recommendation.predicted_utilization,
                    monthly_savings = recommendation.monthly_savings,
                    note = note.label(),
                    "Generated scale-down recommendation"
                );
            }
            Outcome::NoRecommendation { reason } => {
                debug!(
                    event = "recommendation_skipped",
                    source = %self.source,
                    region = %region,
                    name = %item.name,
                    service = %item.service,
                    instance_type = %item.instance_type,
                    reason = %reason,
                    "No recommendation for instance"
                );
            }
        }
    }

    pub fn log_batch(&self, summary: &BatchSummary, region: &str, duration_secs: f64) {
        info!(
            event = "batch_completed",
            source = %self.source,
            region = %region,
            total = summary.total,
            recommended = summary.recommended,
            total_monthly_savings = summary.total_monthly_savings,
            duration_secs = duration_secs,
            "Batch sizing completed"
        );
    }

    pub fn log_startup(&self, version: &str, listen_addr: &str, price_entries: usize) {
        info!(
            event = "service_started",
            source = %self.source,
            version = %version,
            listen_addr = %listen_addr,
            price_entries = price_entries,
            "Rightsizing service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            source = %self.source,
            reason = %reason,
            "Rightsizing service shutting down"
        );
    }

    pub fn log_price_file(&self, path: &str, loaded: Result<usize, &str>) {
        match loaded {
            Ok(entries) => info!(
                event = "price_file_loaded",
                source = %self.source,
                path = %path,
                entries = entries,
                "Loaded price overrides"
            ),
            Err(error) => warn!(
                event = "price_file_failed",
                source = %self.source,
                path = %path,
                error = %error,
                "Failed to load price overrides, using built-in prices"
            ),
        }
    }
}
