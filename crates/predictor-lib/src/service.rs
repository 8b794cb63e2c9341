//! Prediction orchestration
//!
//! Each request runs validate → strategy → post-processing → result. Invalid
//! input is rejected before any model or heuristic runs, and strategy
//! failures surface as internal errors without retries.

use crate::error::{PredictionError, ValidationError};
use crate::models::{
    DurationResult, FaultResult, ModelStatus, PredictionKind, PredictionSource,
};
use crate::observability::{PredictorMetrics, StructuredLogger};
use crate::predictor::{
    DurationPredictor, FaultPredictor, ModelRegistry, OutputConfig, OutputFormatter,
};
use crate::validation::{validate_duration, validate_fault};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

/// Stateless prediction service shared by all requests
pub struct PredictionService {
    duration: Arc<dyn DurationPredictor>,
    fault: Arc<dyn FaultPredictor>,
    formatter: OutputFormatter,
    metrics: PredictorMetrics,
    logger: StructuredLogger,
}

impl PredictionService {
    /// Select strategies from the models loaded at startup
    pub fn new(registry: &ModelRegistry, config: OutputConfig, logger: StructuredLogger) -> Self {
        Self::with_strategies(
            registry.duration_predictor(),
            registry.fault_predictor(),
            config,
            logger,
        )
    }

    pub fn with_strategies(
        duration: Arc<dyn DurationPredictor>,
        fault: Arc<dyn FaultPredictor>,
        config: OutputConfig,
        logger: StructuredLogger,
    ) -> Self {
        let service = Self {
            duration,
            fault,
            formatter: OutputFormatter::with_config(config),
            metrics: PredictorMetrics::new(),
            logger,
        };
        service.metrics.set_model_status(service.model_status());
        service
    }

    /// Which prediction kinds are served by a trained model
    pub fn model_status(&self) -> ModelStatus {
        ModelStatus {
            duration_model_loaded: self.duration.source() == PredictionSource::Model,
            fault_model_loaded: self.fault.source() == PredictionSource::Model,
        }
    }

    /// Predict charging duration, energy and cost for a raw request
    pub fn predict_duration(
        &self,
        input: &Map<String, Value>,
    ) -> Result<DurationResult, PredictionError> {
        let kind = PredictionKind::Duration;
        let start = Instant::now();

        let request = validate_duration(input).map_err(|e| self.rejected(kind, e))?;

        let source = self.duration.source();
        let result = self
            .duration
            .predict_hours(&request)
            .and_then(|hours| self.formatter.format_duration(&request, hours, source))
            .map_err(|e| self.failed(kind, source, e))?;

        self.metrics
            .observe_prediction(kind, source, start.elapsed().as_secs_f64());
        self.logger.log_duration_prediction(
            source,
            result.charge_amount,
            result.duration_minutes,
            result.estimated_cost,
        );

        Ok(result)
    }

    /// Predict pile fault probability, risk tier and maintenance advice
    pub fn predict_fault(&self, input: &Map<String, Value>) -> Result<FaultResult, PredictionError> {
        let kind = PredictionKind::Fault;
        let start = Instant::now();

        let request = validate_fault(input).map_err(|e| self.rejected(kind, e))?;

        let source = self.fault.source();
        let result = self
            .fault
            .fault_probability(&request)
            .and_then(|probability| self.formatter.format_fault(&request, probability, source))
            .map_err(|e| self.failed(kind, source, e))?;

        self.metrics
            .observe_prediction(kind, source, start.elapsed().as_secs_f64());
        self.metrics.inc_fault_risk(result.risk_level);
        self.logger.log_fault_prediction(
            source,
            result.fault_probability,
            result.risk_level,
            result.will_fault,
        );

        Ok(result)
    }

    fn rejected(&self, kind: PredictionKind, error: ValidationError) -> PredictionError {
        let class = error.kind().as_str();
        self.metrics.inc_validation_errors(kind, class);
        self.logger
            .log_validation_rejected(kind, class, &error.to_string());
        PredictionError::Validation(error)
    }

    fn failed(
        &self,
        kind: PredictionKind,
        source: PredictionSource,
        error: anyhow::Error,
    ) -> PredictionError {
        self.metrics.inc_internal_errors(kind);
        self.logger.log_prediction_failed(kind, source, &error);
        PredictionError::Internal(error)
    }
}
