//! ONNX inference using tract
//!
//! Trained models are exported to ONNX offline and loaded here once at
//! startup. Classifiers must be exported without a ZipMap node so that
//! class probabilities come back as a plain float tensor.

use super::{DurationPredictor, FaultPredictor};
use crate::models::{DurationRequest, FaultRequest, PredictionSource};
use anyhow::{Context, Result};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Inputs expected by the duration regressor
pub const DURATION_FEATURES: usize = 5;

/// Inputs expected by the fault classifier
pub const FAULT_FEATURES: usize = 7;

/// Maximum inference latency before warning
const MAX_INFERENCE_MS: u128 = 5;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// An optimized, runnable ONNX graph with a `[1, N]` float input
pub struct OnnxModel {
    plan: TractModel,
    num_features: usize,
}

impl OnnxModel {
    /// Parse and optimize an ONNX model from bytes
    pub fn from_bytes(model_bytes: &[u8], num_features: usize) -> Result<Self> {
        let plan = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, num_features]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;

        Ok(Self { plan, num_features })
    }

    /// Run the model and return every float output, flattened
    pub fn run(&self, features: &[f32]) -> Result<Vec<Vec<f32>>> {
        if features.len() != self.num_features {
            anyhow::bail!(
                "Model expects {} features, got {}",
                self.num_features,
                features.len()
            );
        }

        let start = Instant::now();
        let input: Tensor =
            tract_ndarray::Array2::from_shape_vec((1, self.num_features), features.to_vec())
                .context("Failed to build input tensor")?
                .into();

        let result = self.plan.run(tvec!(input.into()))?;

        let outputs: Vec<Vec<f32>> = result
            .iter()
            .filter_map(|value| {
                value
                    .to_array_view::<f32>()
                    .ok()
                    .map(|view| view.iter().copied().collect())
            })
            .collect();

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        Ok(outputs)
    }
}

/// Regressor returning charging hours as its first float output
pub struct OnnxDurationModel {
    model: OnnxModel,
}

impl OnnxDurationModel {
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            model: OnnxModel::from_bytes(model_bytes, DURATION_FEATURES)?,
        })
    }
}

impl DurationPredictor for OnnxDurationModel {
    fn predict_hours(&self, request: &DurationRequest) -> Result<f64> {
        let outputs = self.model.run(&request.to_features())?;
        let hours = outputs
            .iter()
            .find_map(|values| values.first().copied())
            .context("Duration model produced no float output")?;
        Ok(hours as f64)
    }

    fn source(&self) -> PredictionSource {
        PredictionSource::Model
    }
}

/// Binary classifier returning class probabilities
pub struct OnnxFaultModel {
    model: OnnxModel,
}

impl OnnxFaultModel {
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            model: OnnxModel::from_bytes(model_bytes, FAULT_FEATURES)?,
        })
    }
}

/// Class-1 probability from a probability tensor of one or two values
fn positive_class_probability(values: &[f32]) -> Option<f32> {
    match values {
        [] => None,
        [single] => Some(*single),
        [_, positive, ..] => Some(*positive),
    }
}

impl FaultPredictor for OnnxFaultModel {
    fn fault_probability(&self, request: &FaultRequest) -> Result<f64> {
        let outputs = self.model.run(&request.to_features())?;
        let probability = outputs
            .iter()
            .find_map(|values| positive_class_probability(values))
            .context("Fault model produced no probability output")?;
        Ok(probability as f64)
    }

    fn source(&self) -> PredictionSource {
        PredictionSource::Model
    }
}
