//! Prediction library for EV charging infrastructure
//!
//! This crate provides the core functionality for:
//! - Input validation for duration and fault requests
//! - Model-backed prediction with heuristic fallback
//! - Fault risk classification and maintenance advice
//! - Model artifact loading
//! - Health checks and observability

pub mod error;
pub mod health;
pub mod model_store;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod risk;
pub mod service;
pub mod validation;

pub use error::{ModelLoadError, PredictionError, ValidationError, ValidationKind};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use model_store::{ModelStore, ModelStoreConfig};
pub use models::*;
pub use observability::{PredictorMetrics, StructuredLogger};
pub use predictor::{ModelRegistry, OutputConfig};
pub use service::PredictionService;
