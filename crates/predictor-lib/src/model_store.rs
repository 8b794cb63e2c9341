//! Model artifact loading
//!
//! Reads trained ONNX models from disk once at startup, validating size and
//! optional SHA-256 checksums before handing them to tract. A missing file
//! means the heuristic is used for that prediction kind; a file that is
//! present but unusable aborts startup.

use crate::error::ModelLoadError;
use crate::models::PredictionKind;
use crate::observability::StructuredLogger;
use crate::predictor::{
    DurationPredictor, FaultPredictor, ModelRegistry, OnnxDurationModel, OnnxFaultModel,
};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration for model artifact loading
#[derive(Debug, Clone)]
pub struct ModelStoreConfig {
    /// Directory holding model files
    pub model_dir: PathBuf,
    pub duration_model_file: String,
    pub fault_model_file: String,
    /// Expected hex SHA-256 of the duration model, if pinned
    pub duration_model_sha256: Option<String>,
    /// Expected hex SHA-256 of the fault model, if pinned
    pub fault_model_sha256: Option<String>,
    /// Maximum model size in bytes
    pub max_model_size_bytes: u64,
}

impl Default for ModelStoreConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            duration_model_file: "charge_duration_model.onnx".to_string(),
            fault_model_file: "fault_prediction_model.onnx".to_string(),
            duration_model_sha256: None,
            fault_model_sha256: None,
            max_model_size_bytes: 64 * 1024 * 1024,
        }
    }
}

/// A model file read and verified from disk
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Loads trained models into a [`ModelRegistry`]
pub struct ModelStore {
    config: ModelStoreConfig,
    logger: StructuredLogger,
}

impl ModelStore {
    pub fn new(config: ModelStoreConfig, logger: StructuredLogger) -> Self {
        Self { config, logger }
    }

    pub fn duration_model_path(&self) -> PathBuf {
        self.config.model_dir.join(&self.config.duration_model_file)
    }

    pub fn fault_model_path(&self) -> PathBuf {
        self.config.model_dir.join(&self.config.fault_model_file)
    }

    /// Load every configured model that exists on disk
    pub fn load_registry(&self) -> Result<ModelRegistry, ModelLoadError> {
        let duration_model = match self.read_artifact(
            PredictionKind::Duration,
            &self.duration_model_path(),
            self.config.duration_model_sha256.as_deref(),
        )? {
            Some(artifact) => {
                let model = OnnxDurationModel::from_bytes(&artifact.bytes)
                    .map_err(|source| invalid(&artifact.path, source))?;
                Some(Arc::new(model) as Arc<dyn DurationPredictor>)
            }
            None => None,
        };

        let fault_model = match self.read_artifact(
            PredictionKind::Fault,
            &self.fault_model_path(),
            self.config.fault_model_sha256.as_deref(),
        )? {
            Some(artifact) => {
                let model = OnnxFaultModel::from_bytes(&artifact.bytes)
                    .map_err(|source| invalid(&artifact.path, source))?;
                Some(Arc::new(model) as Arc<dyn FaultPredictor>)
            }
            None => None,
        };

        Ok(ModelRegistry::new(duration_model, fault_model))
    }

    /// Read a model file, `None` when it does not exist
    pub fn read_artifact(
        &self,
        kind: PredictionKind,
        path: &Path,
        expected_checksum: Option<&str>,
    ) -> Result<Option<ModelArtifact>, ModelLoadError> {
        let display = path.display().to_string();

        if !path.exists() {
            self.logger.log_model_missing(kind.as_str(), &display);
            return Ok(None);
        }

        let size = std::fs::metadata(path)
            .map_err(|source| ModelLoadError::Io {
                path: display.clone(),
                source,
            })?
            .len();
        if size > self.config.max_model_size_bytes {
            return Err(ModelLoadError::TooLarge {
                path: display,
                size,
                max: self.config.max_model_size_bytes,
            });
        }

        let bytes = std::fs::read(path).map_err(|source| ModelLoadError::Io {
            path: display.clone(),
            source,
        })?;

        let checksum = compute_checksum(&bytes);
        if let Some(expected) = expected_checksum {
            if !expected.trim().eq_ignore_ascii_case(&checksum) {
                return Err(ModelLoadError::ChecksumMismatch {
                    path: display,
                    expected: expected.trim().to_string(),
                    actual: checksum,
                });
            }
        }

        self.logger
            .log_model_loaded(kind.as_str(), &display, bytes.len(), &checksum);

        Ok(Some(ModelArtifact {
            path: path.to_path_buf(),
            bytes,
        }))
    }
}

fn invalid(path: &Path, source: anyhow::Error) -> ModelLoadError {
    ModelLoadError::Invalid {
        path: path.display().to_string(),
        source,
    }
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
