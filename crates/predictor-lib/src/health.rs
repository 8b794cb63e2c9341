//! Liveness and readiness state for the charging predictor
//!
//! Models are loaded once and never change while serving, so component
//! health is a snapshot of the [`ModelStatus`] taken at startup. A missing
//! model leaves the service answering on its heuristic and is reported as
//! degraded.

use crate::models::ModelStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Health of one prediction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Served by a trained model
    Healthy,
    /// Served by the heuristic fallback
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

impl ComponentHealth {
    fn from_loaded(loaded: bool) -> Self {
        let (status, message) = if loaded {
            (ComponentStatus::Healthy, None)
        } else {
            (ComponentStatus::Degraded, Some(FALLBACK_MESSAGE.to_string()))
        };
        Self {
            status,
            message,
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Body of `/healthz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: BTreeMap<String, ComponentHealth>,
}

/// Body of `/readyz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Component names for health tracking
pub mod components {
    pub const DURATION_MODEL: &str = "duration_model";
    pub const FAULT_MODEL: &str = "fault_model";
}

const FALLBACK_MESSAGE: &str = "No trained model loaded, serving heuristic fallback";

#[derive(Debug, Default)]
struct HealthState {
    components: BTreeMap<String, ComponentHealth>,
    ready: bool,
}

/// Shared health state, cloned into the HTTP handlers
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    state: Arc<RwLock<HealthState>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record each model as healthy when loaded, degraded on the fallback
    pub async fn record_model_status(&self, status: ModelStatus) {
        let mut state = self.state.write().await;
        for (name, loaded) in [
            (components::DURATION_MODEL, status.duration_model_loaded),
            (components::FAULT_MODEL, status.fault_model_loaded),
        ] {
            state
                .components
                .insert(name.to_string(), ComponentHealth::from_loaded(loaded));
        }
    }

    /// Mark startup as finished
    pub async fn set_ready(&self, ready: bool) {
        self.state.write().await.ready = ready;
    }

    pub async fn health(&self) -> HealthResponse {
        let state = self.state.read().await;
        let status = if state
            .components
            .values()
            .any(|c| c.status == ComponentStatus::Degraded)
        {
            ComponentStatus::Degraded
        } else {
            ComponentStatus::Healthy
        };

        HealthResponse {
            status,
            components: state.components.clone(),
        }
    }

    pub async fn readiness(&self) -> ReadinessResponse {
        if self.state.read().await.ready {
            ReadinessResponse {
                ready: true,
                reason: None,
            }
        } else {
            ReadinessResponse {
                ready: false,
                reason: Some("Service not yet initialized".to_string()),
            }
        }
    }
}
