//! Prediction output formatting and post-processing
//!
//! Turns a raw strategy value (hours, or a class probability) into the
//! response shape shared by the model and heuristic paths: rounding, cost
//! derivation, risk tiering and maintenance advice.

use crate::models::{
    DurationRequest, DurationResult, FaultRequest, FaultResult, Locale, PredictionSource,
};
use crate::risk::{risk_text, MaintenanceAdvisor, RiskClassifier};
use anyhow::Result;

/// Electricity price per kWh used for cost estimates
pub const DEFAULT_UNIT_PRICE: f64 = 0.8;

/// Probability above which a pile is expected to fault
const WILL_FAULT_PROBABILITY: f64 = 0.5;

/// Decimal places a probability is snapped to before any threshold check
const PROBABILITY_DECIMALS: i32 = 10;

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Currency units per kWh
    pub unit_price: f64,
    /// Language for risk labels and suggestions
    pub locale: Locale,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            unit_price: DEFAULT_UNIT_PRICE,
            locale: Locale::default(),
        }
    }
}

/// Formats raw strategy outputs into prediction results
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    config: OutputConfig,
    classifier: RiskClassifier,
    advisor: MaintenanceAdvisor,
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self::with_config(OutputConfig::default())
    }

    pub fn with_config(config: OutputConfig) -> Self {
        Self {
            config,
            classifier: RiskClassifier::default(),
            advisor: MaintenanceAdvisor::new(),
        }
    }

    /// Format a predicted duration in hours
    pub fn format_duration(
        &self,
        request: &DurationRequest,
        hours: f64,
        source: PredictionSource,
    ) -> Result<DurationResult> {
        if !hours.is_finite() || hours <= 0.0 {
            anyhow::bail!("Predicted duration must be a positive number of hours, got {}", hours);
        }

        let charge_amount = request.charge_amount();
        let duration_minutes = round_to(hours * 60.0, 2);
        if duration_minutes <= 0.0 {
            anyhow::bail!(
                "Predicted duration of {} hours rounds to zero minutes",
                hours
            );
        }

        Ok(DurationResult {
            duration_minutes,
            duration_hours: round_to(duration_minutes / 60.0, 4),
            charge_amount: round_to(charge_amount, 2),
            estimated_cost: round_to(charge_amount * self.config.unit_price, 2),
            source,
        })
    }

    /// Format a raw fault probability in [0, 1]
    ///
    /// Values outside the unit interval are clamped; non-finite values are
    /// rejected. The probability is snapped to ten decimals before the
    /// threshold checks, so the tier and advice agree with the reported
    /// percentage at exact boundaries.
    pub fn format_fault(
        &self,
        request: &FaultRequest,
        probability: f64,
        source: PredictionSource,
    ) -> Result<FaultResult> {
        if !probability.is_finite() {
            anyhow::bail!("Predicted fault probability is not a number: {}", probability);
        }
        let probability = round_to(probability.clamp(0.0, 1.0), PROBABILITY_DECIMALS);

        let risk_level = self.classifier.classify(probability);
        let (suggestion, suggestions) =
            self.advisor
                .suggestions(probability, request, self.config.locale);

        Ok(FaultResult {
            fault_probability: round_to(probability * 100.0, 2),
            will_fault: probability > WILL_FAULT_PROBABILITY,
            risk_level,
            risk_text: risk_text(risk_level, self.config.locale).to_string(),
            suggestion,
            suggestions,
            source,
        })
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;

    fn duration_request() -> DurationRequest {
        DurationRequest {
            battery_capacity: 60.0,
            current_soc: 20.0,
            target_soc: 80.0,
            charge_power: 60.0,
            temperature: 25.0,
        }
    }

    fn fault_request() -> FaultRequest {
        FaultRequest {
            total_charge_count: 1600,
            total_charge_amount: 80000.0,
            days_since_last_maintenance: 150,
            health_score: 35.0,
            avg_daily_usage: 5.0,
            voltage_fluctuation: 10.0,
            fault_history_count: 2,
        }
    }

    #[test]
    fn test_duration_rounding_and_cost() {
        let formatter = OutputFormatter::new();
        let result = formatter
            .format_duration(&duration_request(), 0.72, PredictionSource::Heuristic)
            .unwrap();

        assert_eq!(result.duration_minutes, 43.2);
        assert_eq!(result.duration_hours, 0.72);
        assert_eq!(result.charge_amount, 36.0);
        assert_eq!(result.estimated_cost, 28.8);
        assert_eq!(result.source, PredictionSource::Heuristic);
    }

    #[test]
    fn test_cost_uses_configured_price() {
        let formatter = OutputFormatter::with_config(OutputConfig {
            unit_price: 1.5,
            locale: Locale::En,
        });
        let result = formatter
            .format_duration(&duration_request(), 1.0, PredictionSource::Model)
            .unwrap();
        assert_eq!(result.estimated_cost, 54.0);
        assert_eq!(result.duration_minutes, 60.0);
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let formatter = OutputFormatter::new();
        for hours in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(formatter
                .format_duration(&duration_request(), hours, PredictionSource::Model)
                .is_err());
        }
    }

    #[test]
    fn test_fault_formatting() {
        let formatter = OutputFormatter::new();
        let result = formatter
            .format_fault(&fault_request(), 0.69, PredictionSource::Heuristic)
            .unwrap();

        assert_eq!(result.fault_probability, 69.0);
        assert!(result.will_fault);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.risk_text, "High risk");
        assert_eq!(result.suggestion, result.suggestions[0]);
    }

    #[test]
    fn test_will_fault_is_strict() {
        let formatter = OutputFormatter::new();
        let result = formatter
            .format_fault(&fault_request(), 0.5, PredictionSource::Model)
            .unwrap();
        assert!(!result.will_fault);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_probability_clamped() {
        let formatter = OutputFormatter::new();
        let high = formatter
            .format_fault(&fault_request(), 1.3, PredictionSource::Model)
            .unwrap();
        assert_eq!(high.fault_probability, 100.0);

        let low = formatter
            .format_fault(&fault_request(), -0.2, PredictionSource::Model)
            .unwrap();
        assert_eq!(low.fault_probability, 0.0);
        assert_eq!(low.risk_level, RiskLevel::Low);

        assert!(formatter
            .format_fault(&fault_request(), f64::NAN, PredictionSource::Model)
            .is_err());
    }

    #[test]
    fn test_tiny_duration_rejected_after_rounding() {
        let formatter = OutputFormatter::new();
        let request = DurationRequest {
            battery_capacity: 1.0,
            current_soc: 0.0,
            target_soc: 0.001,
            charge_power: 400.0,
            temperature: 25.0,
        };
        let hours = request.charge_amount() / request.charge_power * 1.2;
        assert!(hours > 0.0);

        let err = formatter
            .format_duration(&request, hours, PredictionSource::Heuristic)
            .unwrap_err();
        assert!(err.to_string().contains("rounds to zero minutes"));
    }

    #[test]
    fn test_float_noise_snaps_to_boundary() {
        let formatter = OutputFormatter::new();
        let cases = [
            (0.30000000000000004, RiskLevel::Medium, false),
            (0.29999999999999993, RiskLevel::Medium, false),
            (0.5000000000000001, RiskLevel::Medium, false),
            (0.5999999999999999, RiskLevel::High, true),
            (0.6000000000000001, RiskLevel::High, true),
        ];
        for (probability, level, will_fault) in cases {
            let result = formatter
                .format_fault(&fault_request(), probability, PredictionSource::Heuristic)
                .unwrap();
            assert_eq!(result.risk_level, level, "probability {}", probability);
            assert_eq!(result.will_fault, will_fault, "probability {}", probability);
        }

        let result = formatter
            .format_fault(&fault_request(), 0.7000000000000001, PredictionSource::Heuristic)
            .unwrap();
        assert_eq!(
            result.suggestion,
            "Elevated fault risk: schedule maintenance within 3 days"
        );
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(43.199999999, 2), 43.2);
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(-1.005, 0), -1.0);
    }
}
