//! Service health command

use anyhow::Result;
use serde_json::json;

use crate::client::{ApiClient, ClientError, ModelStatus, HEALTH_PATH};
use crate::output::{color_loaded, print_fields, print_json, print_warning, FieldRow, OutputFormat};

/// Show which predictions are served by trained models
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let status = match client.get::<ModelStatus>(HEALTH_PATH).await {
        Ok(status) => status,
        Err(e) => match e.downcast_ref::<ClientError>() {
            Some(ClientError::Unavailable { .. }) => {
                report_unavailable(client, &e.to_string(), format)?;
                return Ok(());
            }
            _ => return Err(e),
        },
    };

    match format {
        OutputFormat::Json => print_json(&json!({
            "available": true,
            "duration_model_loaded": status.duration_model_loaded,
            "fault_model_loaded": status.fault_model_loaded,
        }))?,
        OutputFormat::Table => print_fields(vec![
            FieldRow::new("Service", client.base_url().as_str()),
            FieldRow::new("Duration model", color_loaded(status.duration_model_loaded)),
            FieldRow::new("Fault model", color_loaded(status.fault_model_loaded)),
        ]),
    }

    Ok(())
}

fn report_unavailable(client: &ApiClient, reason: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "available": false,
            "url": client.base_url().as_str(),
            "reason": reason,
        })),
        OutputFormat::Table => {
            print_warning(&format!("Service unavailable: {}", reason));
            Ok(())
        }
    }
}
