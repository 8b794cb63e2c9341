//! Prediction commands

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::client::{ApiClient, DurationPrediction, FaultPrediction, DURATION_PATH, FAULT_PATH};
use crate::output::{
    color_risk, format_minutes, format_percent, print_fields, print_json, FieldRow, OutputFormat,
};

/// Charging session to estimate
#[derive(Debug, Clone, Args, Serialize)]
pub struct DurationArgs {
    /// Battery capacity in kWh
    #[arg(long)]
    pub battery_capacity: f64,

    /// Current state of charge in percent
    #[arg(long)]
    pub current_soc: f64,

    /// Target state of charge in percent
    #[arg(long)]
    pub target_soc: f64,

    /// Pile output power in kW
    #[arg(long)]
    pub charge_power: f64,

    /// Ambient temperature in °C (service default 25)
    #[arg(long, allow_hyphen_values = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Pile usage history to assess
#[derive(Debug, Clone, Args, Serialize)]
pub struct FaultArgs {
    /// Lifetime number of charging sessions
    #[arg(long)]
    pub total_charge_count: u64,

    /// Lifetime energy delivered in kWh
    #[arg(long)]
    pub total_charge_amount: f64,

    /// Days since the last maintenance
    #[arg(long)]
    pub days_since_last_maintenance: u64,

    /// Health score from 0 to 100
    #[arg(long)]
    pub health_score: f64,

    /// Average daily usage in hours
    #[arg(long)]
    pub avg_daily_usage: f64,

    /// Voltage fluctuation
    #[arg(long)]
    pub voltage_fluctuation: f64,

    /// Number of past faults
    #[arg(long)]
    pub fault_history_count: u64,
}

/// Estimate charging duration, energy and cost
pub async fn predict_duration(
    client: &ApiClient,
    args: &DurationArgs,
    format: OutputFormat,
) -> Result<()> {
    let prediction: DurationPrediction = client.post(DURATION_PATH, args).await?;

    match format {
        OutputFormat::Json => print_json(&prediction)?,
        OutputFormat::Table => print_fields(vec![
            FieldRow::new(
                "Duration",
                format!(
                    "{:.2} min ({})",
                    prediction.duration_minutes,
                    format_minutes(prediction.duration_minutes)
                ),
            ),
            FieldRow::new("Hours", format!("{:.4}", prediction.duration_hours)),
            FieldRow::new("Charge amount", format!("{:.2} kWh", prediction.charge_amount)),
            FieldRow::new("Estimated cost", format!("{:.2}", prediction.estimated_cost)),
            FieldRow::new("Source", prediction.source),
        ]),
    }

    Ok(())
}

/// Assess pile fault risk and print maintenance advice
pub async fn predict_fault(client: &ApiClient, args: &FaultArgs, format: OutputFormat) -> Result<()> {
    let prediction: FaultPrediction = client.post(FAULT_PATH, args).await?;

    match format {
        OutputFormat::Json => print_json(&prediction)?,
        OutputFormat::Table => {
            print_fields(vec![
                FieldRow::new(
                    "Fault probability",
                    format_percent(prediction.fault_probability),
                ),
                FieldRow::new("Will fault", if prediction.will_fault { "yes" } else { "no" }),
                FieldRow::new(
                    "Risk",
                    color_risk(&prediction.risk_level, &prediction.risk_text),
                ),
                FieldRow::new("Source", prediction.source.clone()),
            ]);

            println!("\nSuggestions:");
            for (i, suggestion) in prediction.suggestions.iter().enumerate() {
                println!("  {}. {}", i + 1, suggestion);
            }
        }
    }

    Ok(())
}
