//! Batch Phase Metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct BatchMetrics;

impl BatchMetrics {
    pub fn record_completed(size: usize, duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "batch", "batches")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "batch", "size")).record(size as f64);
        ::metrics::histogram!(phase_metric!(histogram, "batch", "duration_seconds"))
            .record(duration_secs);
    }

    /// A request whose addresses were all blank, null or missing
    pub fn record_empty_rejected() {
        ::metrics::counter!(phase_metric!(counter, "batch", "empty_rejected")).increment(1);
    }
}

impl PhaseMetrics for BatchMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "batch", "batches"));
        let _ = counter!(phase_metric!(counter, "batch", "empty_rejected"));
        let _ = histogram!(phase_metric!(histogram, "batch", "size"));
        let _ = histogram!(phase_metric!(histogram, "batch", "duration_seconds"));
    }

    fn phase_name() -> &'static str {
        "batch"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "batch", "batches"),
                metric_type: MetricType::Counter,
                help: "Total number of completed batches",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "batch", "empty_rejected"),
                metric_type: MetricType::Counter,
                help: "Total number of requests rejected for having no usable addresses",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "batch", "size"),
                metric_type: MetricType::Histogram,
                help: "Number of deduplicated addresses per batch",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "batch", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Wall-clock duration of a batch in seconds",
                labels: vec![],
            },
        ]
    }
}
