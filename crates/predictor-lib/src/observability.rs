//! Observability infrastructure for the charging predictor
//!
//! Provides:
//! - Prometheus metrics (prediction latency and counts, validation and
//!   internal errors, risk tiers, model availability)
//! - Structured JSON logging with tracing

use crate::models::{ModelStatus, PredictionKind, PredictionSource, RiskLevel};
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Histogram buckets for prediction latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictorMetricsInner> = OnceLock::new();

struct PredictorMetricsInner {
    prediction_latency_seconds: HistogramVec,
    predictions_total: IntCounterVec,
    validation_errors_total: IntCounterVec,
    internal_errors_total: IntCounterVec,
    fault_risk_total: IntCounterVec,
    model_loaded: IntGaugeVec,
}

impl PredictorMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram_vec!(
                "ev_predictor_prediction_latency_seconds",
                "Time spent validating and computing a prediction",
                &["kind", "source"],
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "ev_predictor_predictions_total",
                "Total number of successful predictions",
                &["kind", "source"]
            )
            .expect("Failed to register predictions_total"),

            validation_errors_total: register_int_counter_vec!(
                "ev_predictor_validation_errors_total",
                "Total number of rejected prediction requests",
                &["kind", "class"]
            )
            .expect("Failed to register validation_errors_total"),

            internal_errors_total: register_int_counter_vec!(
                "ev_predictor_internal_errors_total",
                "Total number of predictions that failed unexpectedly",
                &["kind"]
            )
            .expect("Failed to register internal_errors_total"),

            fault_risk_total: register_int_counter_vec!(
                "ev_predictor_fault_risk_total",
                "Fault predictions by risk tier",
                &["level"]
            )
            .expect("Failed to register fault_risk_total"),

            model_loaded: register_int_gauge_vec!(
                "ev_predictor_model_loaded",
                "Whether a trained model is loaded (1) or the heuristic is used (0)",
                &["model"]
            )
            .expect("Failed to register model_loaded"),
        }
    }
}

/// Predictor metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct PredictorMetrics {
    _private: (),
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictorMetricsInner {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new)
    }

    /// Record a successful prediction and its latency
    pub fn observe_prediction(
        &self,
        kind: PredictionKind,
        source: PredictionSource,
        duration_secs: f64,
    ) {
        let labels = [kind.as_str(), source.as_str()];
        self.inner()
            .prediction_latency_seconds
            .with_label_values(&labels)
            .observe(duration_secs);
        self.inner().predictions_total.with_label_values(&labels).inc();
    }

    pub fn inc_validation_errors(&self, kind: PredictionKind, class: &str) {
        self.inner()
            .validation_errors_total
            .with_label_values(&[kind.as_str(), class])
            .inc();
    }

    pub fn inc_internal_errors(&self, kind: PredictionKind) {
        self.inner()
            .internal_errors_total
            .with_label_values(&[kind.as_str()])
            .inc();
    }

    pub fn inc_fault_risk(&self, level: RiskLevel) {
        self.inner()
            .fault_risk_total
            .with_label_values(&[level.as_str()])
            .inc();
    }

    /// Publish which trained models are loaded
    pub fn set_model_status(&self, status: ModelStatus) {
        self.inner()
            .model_loaded
            .with_label_values(&[PredictionKind::Duration.as_str()])
            .set(status.duration_model_loaded as i64);
        self.inner()
            .model_loaded
            .with_label_values(&[PredictionKind::Fault.as_str()])
            .set(status.fault_model_loaded as i64);
    }
}

/// Structured logger for predictor events
///
/// Provides consistent JSON-formatted logging for predictions,
/// rejected requests, model loading and lifecycle events.
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_duration_prediction(
        &self,
        source: PredictionSource,
        charge_amount: f64,
        duration_minutes: f64,
        estimated_cost: f64,
    ) {
        info!(
            event = "duration_predicted",
            instance = %self.instance,
            source = source.as_str(),
            charge_amount_kwh = charge_amount,
            duration_minutes = duration_minutes,
            estimated_cost = estimated_cost,
            "Predicted charging duration"
        );
    }

    pub fn log_fault_prediction(
        &self,
        source: PredictionSource,
        fault_probability_pct: f64,
        risk_level: RiskLevel,
        will_fault: bool,
    ) {
        let level = risk_level.as_str();
        if risk_level == RiskLevel::High {
            warn!(
                event = "fault_predicted",
                instance = %self.instance,
                source = source.as_str(),
                fault_probability_pct = fault_probability_pct,
                risk_level = level,
                will_fault = will_fault,
                "High fault risk predicted"
            );
        } else {
            info!(
                event = "fault_predicted",
                instance = %self.instance,
                source = source.as_str(),
                fault_probability_pct = fault_probability_pct,
                risk_level = level,
                will_fault = will_fault,
                "Predicted pile fault risk"
            );
        }
    }

    pub fn log_validation_rejected(&self, kind: PredictionKind, class: &str, details: &str) {
        info!(
            event = "validation_rejected",
            instance = %self.instance,
            kind = kind.as_str(),
            class = %class,
            details = %details,
            "Rejected invalid prediction request"
        );
    }

    pub fn log_prediction_failed(&self, kind: PredictionKind, source: PredictionSource, error: &anyhow::Error) {
        error!(
            event = "prediction_failed",
            instance = %self.instance,
            kind = kind.as_str(),
            source = source.as_str(),
            error = %format!("{:#}", error),
            "Prediction failed"
        );
    }

    pub fn log_model_loaded(&self, model: &str, path: &str, size_bytes: usize, checksum: &str) {
        info!(
            event = "model_loaded",
            instance = %self.instance,
            model = %model,
            path = %path,
            size_bytes = size_bytes,
            checksum = %checksum,
            "Trained model loaded"
        );
    }

    pub fn log_model_missing(&self, model: &str, path: &str) {
        warn!(
            event = "model_missing",
            instance = %self.instance,
            model = %model,
            path = %path,
            "Trained model not found, heuristic fallback will be used"
        );
    }

    pub fn log_startup(&self, version: &str, status: ModelStatus) {
        info!(
            event = "service_started",
            instance = %self.instance,
            service_version = %version,
            duration_model_loaded = status.duration_model_loaded,
            fault_model_loaded = status.fault_model_loaded,
            "Charging predictor started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Charging predictor shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predictor_metrics_creation() {
        let metrics = PredictorMetrics::new();

        metrics.observe_prediction(PredictionKind::Duration, PredictionSource::Heuristic, 0.0001);
        metrics.inc_validation_errors(PredictionKind::Fault, "MISSING_FIELDS");
        metrics.inc_internal_errors(PredictionKind::Duration);
        metrics.inc_fault_risk(RiskLevel::High);
        metrics.set_model_status(ModelStatus {
            duration_model_loaded: true,
            fault_model_loaded: false,
        });

        let families = prometheus::gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "ev_predictor_predictions_total"));
        assert!(families
            .iter()
            .any(|f| f.get_name() == "ev_predictor_model_loaded"));
    }

    #[test]
    fn test_structured_logger_events() {
        let logger = StructuredLogger::new("test-instance");
        logger.log_model_missing("fault", "/models/fault_prediction_model.onnx");
        logger.log_fault_prediction(PredictionSource::Heuristic, 69.0, RiskLevel::High, true);
        logger.log_shutdown("test complete");
    }
}
