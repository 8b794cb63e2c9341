//! Prediction strategies
//!
//! Each prediction kind has one contract and two interchangeable
//! implementations: a trained ONNX model and a closed-form heuristic. The
//! [`ModelRegistry`] records which trained models were loaded at startup and
//! hands out the matching strategy; callers never check for a missing model
//! themselves.

mod fallback;
mod inference;
mod output;

pub use fallback::{
    FaultRiskBreakdown, HeuristicDurationPredictor, HeuristicFaultPredictor,
    CHARGING_INEFFICIENCY_FACTOR,
};
pub use inference::{
    OnnxDurationModel, OnnxFaultModel, OnnxModel, DURATION_FEATURES, FAULT_FEATURES,
};
pub use output::{round_to, OutputConfig, OutputFormatter, DEFAULT_UNIT_PRICE};

use crate::models::{DurationRequest, FaultRequest, ModelStatus, PredictionSource};
use anyhow::Result;
use std::fmt;
use std::sync::Arc;

/// Charging duration strategy
pub trait DurationPredictor: Send + Sync {
    /// Predicted charging time in hours
    fn predict_hours(&self, request: &DurationRequest) -> Result<f64>;

    fn source(&self) -> PredictionSource;
}

/// Pile fault strategy
pub trait FaultPredictor: Send + Sync {
    /// Probability that the pile faults, nominally in [0, 1]
    fn fault_probability(&self, request: &FaultRequest) -> Result<f64>;

    fn source(&self) -> PredictionSource;
}

/// Trained models loaded once at startup
///
/// Immutable after construction and shared by every request.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    duration_model: Option<Arc<dyn DurationPredictor>>,
    fault_model: Option<Arc<dyn FaultPredictor>>,
}

impl ModelRegistry {
    pub fn new(
        duration_model: Option<Arc<dyn DurationPredictor>>,
        fault_model: Option<Arc<dyn FaultPredictor>>,
    ) -> Self {
        Self {
            duration_model,
            fault_model,
        }
    }

    /// Registry with no trained models, every prediction uses the heuristics
    pub fn without_models() -> Self {
        Self::default()
    }

    pub fn has_duration_model(&self) -> bool {
        self.duration_model.is_some()
    }

    pub fn has_fault_model(&self) -> bool {
        self.fault_model.is_some()
    }

    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            duration_model_loaded: self.has_duration_model(),
            fault_model_loaded: self.has_fault_model(),
        }
    }

    /// Trained duration model when loaded, heuristic otherwise
    pub fn duration_predictor(&self) -> Arc<dyn DurationPredictor> {
        match &self.duration_model {
            Some(model) => Arc::clone(model),
            None => Arc::new(HeuristicDurationPredictor),
        }
    }

    /// Trained fault model when loaded, heuristic otherwise
    pub fn fault_predictor(&self) -> Arc<dyn FaultPredictor> {
        match &self.fault_model {
            Some(model) => Arc::clone(model),
            None => Arc::new(HeuristicFaultPredictor),
        }
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("duration_model", &self.has_duration_model())
            .field("fault_model", &self.has_fault_model())
            .finish()
    }
}
