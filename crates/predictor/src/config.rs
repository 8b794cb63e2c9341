//! Service configuration

use anyhow::{Context, Result};
use predictor_lib::{Locale, ModelStoreConfig, OutputConfig};
use serde::Deserialize;
use std::path::PathBuf;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Instance name attached to every log event
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// API server port for predictions, health and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Directory holding trained ONNX models
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    #[serde(default = "default_duration_model_file")]
    pub duration_model_file: String,

    #[serde(default = "default_fault_model_file")]
    pub fault_model_file: String,

    /// Pinned SHA-256 of the duration model
    #[serde(default)]
    pub duration_model_sha256: Option<String>,

    /// Pinned SHA-256 of the fault model
    #[serde(default)]
    pub fault_model_sha256: Option<String>,

    #[serde(default = "default_max_model_size")]
    pub max_model_size_bytes: u64,

    /// Electricity price per kWh for cost estimates
    #[serde(default = "default_unit_price")]
    pub unit_price: f64,

    /// Language of risk labels and suggestions
    #[serde(default)]
    pub locale: Locale,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    5000
}

fn default_model_dir() -> PathBuf {
    ModelStoreConfig::default().model_dir
}

fn default_duration_model_file() -> String {
    ModelStoreConfig::default().duration_model_file
}

fn default_fault_model_file() -> String {
    ModelStoreConfig::default().fault_model_file
}

fn default_max_model_size() -> u64 {
    ModelStoreConfig::default().max_model_size_bytes
}

fn default_unit_price() -> f64 {
    OutputConfig::default().unit_price
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            bind_address: default_bind_address(),
            api_port: default_api_port(),
            model_dir: default_model_dir(),
            duration_model_file: default_duration_model_file(),
            fault_model_file: default_fault_model_file(),
            duration_model_sha256: None,
            fault_model_sha256: None,
            max_model_size_bytes: default_max_model_size(),
            unit_price: default_unit_price(),
            locale: Locale::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from an optional `predictor.*` file and the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("predictor").required(false))
            .add_source(config::Environment::with_prefix("PREDICTOR").try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            anyhow::bail!("unit_price must be a non-negative number, got {}", self.unit_price);
        }
        Ok(())
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.api_port)
    }

    pub fn model_store_config(&self) -> ModelStoreConfig {
        ModelStoreConfig {
            model_dir: self.model_dir.clone(),
            duration_model_file: self.duration_model_file.clone(),
            fault_model_file: self.fault_model_file.clone(),
            duration_model_sha256: self.duration_model_sha256.clone(),
            fault_model_sha256: self.fault_model_sha256.clone(),
            max_model_size_bytes: self.max_model_size_bytes,
        }
    }

    pub fn output_config(&self) -> OutputConfig {
        OutputConfig {
            unit_price: self.unit_price,
            locale: self.locale,
        }
    }
}
