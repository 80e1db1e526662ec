//! Fetch Phase Metrics
//!
//! Per-address outcomes, redirect hops and end-to-end fetch latency.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};
use crate::types::FetchOutcome;

pub struct FetchMetrics;

impl FetchMetrics {
    /// Record the terminal outcome of one address
    pub fn record_outcome(outcome: &FetchOutcome, duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "fetch", "outcomes"), "outcome" => outcome.label())
            .increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "fetch", "duration_seconds"))
            .record(duration_secs);
    }

    pub fn record_redirect() {
        ::metrics::counter!(phase_metric!(counter, "fetch", "redirects_followed")).increment(1);
    }
}

impl PhaseMetrics for FetchMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "fetch", "outcomes"));
        let _ = counter!(phase_metric!(counter, "fetch", "redirects_followed"));
        let _ = histogram!(phase_metric!(histogram, "fetch", "duration_seconds"));
    }

    fn phase_name() -> &'static str {
        "fetch"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "fetch", "outcomes"),
                metric_type: MetricType::Counter,
                help: "Total number of resolved fetches by outcome",
                labels: vec!["outcome"],
            },
            MetricDoc {
                name: phase_metric!(counter, "fetch", "redirects_followed"),
                metric_type: MetricType::Counter,
                help: "Total number of redirect hops followed",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "fetch", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "End-to-end duration of a single fetch, redirects included",
                labels: vec![],
            },
        ]
    }
}
