//! Core data models for the charging predictor

use serde::{Deserialize, Serialize};

/// Default ambient temperature when a duration request omits it
pub const DEFAULT_TEMPERATURE_CELSIUS: f64 = 25.0;

/// Validated input for a charging duration prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationRequest {
    /// Battery capacity in kWh
    pub battery_capacity: f64,
    /// Current state of charge, percent
    pub current_soc: f64,
    /// Target state of charge, percent
    pub target_soc: f64,
    /// Charging pile power in kW
    pub charge_power: f64,
    /// Ambient temperature in °C
    pub temperature: f64,
}

impl DurationRequest {
    /// Energy to deliver in kWh
    pub fn charge_amount(&self) -> f64 {
        self.battery_capacity * (self.target_soc - self.current_soc) / 100.0
    }

    /// Model input order: capacity, current soc, target soc, power, temperature
    pub fn to_features(&self) -> [f32; 5] {
        [
            self.battery_capacity as f32,
            self.current_soc as f32,
            self.target_soc as f32,
            self.charge_power as f32,
            self.temperature as f32,
        ]
    }
}

/// Charging duration prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationResult {
    pub duration_minutes: f64,
    pub duration_hours: f64,
    pub charge_amount: f64,
    pub estimated_cost: f64,
    pub source: PredictionSource,
}

/// Validated input for a pile fault prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultRequest {
    pub total_charge_count: u64,
    /// Lifetime delivered energy in kWh
    pub total_charge_amount: f64,
    pub days_since_last_maintenance: u64,
    /// Health score, 0-100
    pub health_score: f64,
    pub avg_daily_usage: f64,
    /// Voltage fluctuation in V
    pub voltage_fluctuation: f64,
    pub fault_history_count: u64,
}

impl FaultRequest {
    /// Model input order matches the training feature columns
    pub fn to_features(&self) -> [f32; 7] {
        [
            self.total_charge_count as f32,
            self.total_charge_amount as f32,
            self.days_since_last_maintenance as f32,
            self.health_score as f32,
            self.avg_daily_usage as f32,
            self.voltage_fluctuation as f32,
            self.fault_history_count as f32,
        ]
    }
}

/// Pile fault prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultResult {
    /// Fault probability as a percentage, 0-100
    pub fault_probability: f64,
    pub will_fault: bool,
    pub risk_level: RiskLevel,
    pub risk_text: String,
    pub suggestion: String,
    pub suggestions: Vec<String>,
    pub source: PredictionSource,
}

/// Discrete fault risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which strategy produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    /// Trained model loaded at startup
    Model,
    /// Closed-form fallback formula
    Heuristic,
}

impl PredictionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionSource::Model => "model",
            PredictionSource::Heuristic => "heuristic",
        }
    }
}

/// Prediction kind, used for metric and log labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionKind {
    Duration,
    Fault,
}

impl PredictionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionKind::Duration => "duration",
            PredictionKind::Fault => "fault",
        }
    }
}

/// Which trained models are loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub duration_model_loaded: bool,
    pub fault_model_loaded: bool,
}

/// Language for risk labels and maintenance suggestions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}
