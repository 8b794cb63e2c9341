//! Heuristic predictors used when no trained model is loaded
//!
//! Both formulas are deterministic closed forms over validated inputs.

use super::{DurationPredictor, FaultPredictor};
use crate::models::{DurationRequest, FaultRequest, PredictionSource};
use anyhow::Result;

/// Multiplier on ideal charge time to account for charging losses
pub const CHARGING_INEFFICIENCY_FACTOR: f64 = 1.2;

const HEALTH_WEIGHT: f64 = 0.4;
const MAINTENANCE_WEIGHT: f64 = 0.3;
const USAGE_WEIGHT: f64 = 0.2;
const HISTORY_WEIGHT: f64 = 0.1;

/// Days without maintenance at which that risk saturates
const MAINTENANCE_SATURATION_DAYS: f64 = 180.0;
/// Lifetime sessions at which usage risk saturates
const USAGE_SATURATION_COUNT: f64 = 2000.0;
/// Past faults at which history risk saturates
const HISTORY_SATURATION_COUNT: f64 = 10.0;

/// Duration from energy needed over pile power, scaled for losses
pub struct HeuristicDurationPredictor;

impl DurationPredictor for HeuristicDurationPredictor {
    fn predict_hours(&self, request: &DurationRequest) -> Result<f64> {
        Ok(request.charge_amount() / request.charge_power * CHARGING_INEFFICIENCY_FACTOR)
    }

    fn source(&self) -> PredictionSource {
        PredictionSource::Heuristic
    }
}

/// Normalized risk components of the heuristic fault score, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultRiskBreakdown {
    pub health_risk: f64,
    pub maintenance_risk: f64,
    pub usage_risk: f64,
    pub history_risk: f64,
}

impl FaultRiskBreakdown {
    pub fn from_request(request: &FaultRequest) -> Self {
        Self {
            health_risk: ((100.0 - request.health_score) / 100.0).clamp(0.0, 1.0),
            maintenance_risk: (request.days_since_last_maintenance as f64
                / MAINTENANCE_SATURATION_DAYS)
                .min(1.0),
            usage_risk: (request.total_charge_count as f64 / USAGE_SATURATION_COUNT).min(1.0),
            history_risk: (request.fault_history_count as f64 / HISTORY_SATURATION_COUNT).min(1.0),
        }
    }

    /// Weighted sum of the components, weights add up to 1
    pub fn probability(&self) -> f64 {
        self.health_risk * HEALTH_WEIGHT
            + self.maintenance_risk * MAINTENANCE_WEIGHT
            + self.usage_risk * USAGE_WEIGHT
            + self.history_risk * HISTORY_WEIGHT
    }
}

/// Weighted combination of health, maintenance, usage and history risk
pub struct HeuristicFaultPredictor;

impl FaultPredictor for HeuristicFaultPredictor {
    fn fault_probability(&self, request: &FaultRequest) -> Result<f64> {
        Ok(FaultRiskBreakdown::from_request(request).probability())
    }

    fn source(&self) -> PredictionSource {
        PredictionSource::Heuristic
    }
}
