//! Error types for validation and prediction

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Direction of a bound check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    GreaterThan,
    AtLeast,
    AtMost,
}

impl Comparison {
    pub fn holds(&self, value: f64, limit: f64) -> bool {
        match self {
            Comparison::GreaterThan => value > limit,
            Comparison::AtLeast => value >= limit,
            Comparison::AtMost => value <= limit,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Comparison::GreaterThan => ">",
            Comparison::AtLeast => ">=",
            Comparison::AtMost => "<=",
        }
    }
}

/// A bound a field value must satisfy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constraint {
    pub comparison: Comparison,
    pub limit: f64,
    /// Set when the limit is another field's value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reference {
            Some(field) => write!(f, "{} {} ({})", self.comparison.symbol(), field, self.limit),
            None => write!(f, "{} {}", self.comparison.symbol(), self.limit),
        }
    }
}

/// Class of the first violated input constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationKind {
    MissingFields,
    TypeError,
    OutOfRange,
}

impl ValidationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationKind::MissingFields => "MISSING_FIELDS",
            ValidationKind::TypeError => "TYPE_ERROR",
            ValidationKind::OutOfRange => "OUT_OF_RANGE",
        }
    }
}

/// Rejected prediction input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("field '{field}' has an invalid format: expected a number, got {value}")]
    TypeError { field: String, value: String },

    #[error("field '{field}' is out of range: must be {constraint}, got {value}")]
    OutOfRange {
        field: String,
        value: f64,
        constraint: Constraint,
    },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationKind {
        match self {
            ValidationError::MissingFields { .. } => ValidationKind::MissingFields,
            ValidationError::TypeError { .. } => ValidationKind::TypeError,
            ValidationError::OutOfRange { .. } => ValidationKind::OutOfRange,
        }
    }
}

/// Failure of a prediction request
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("prediction failed: {0:#}")]
    Internal(#[source] anyhow::Error),
}

impl PredictionError {
    /// Stable error class reported to callers
    pub fn code(&self) -> &'static str {
        match self {
            PredictionError::Validation(_) => "VALIDATION_ERROR",
            PredictionError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Problems with a model artifact found at startup
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("model file {path} is {size} bytes, exceeding the {max} byte limit")]
    TooLarge { path: String, size: u64, max: u64 },

    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("failed to load ONNX model {path}: {source:#}")]
    Invalid {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_all() {
        let err = ValidationError::MissingFields {
            fields: vec!["battery_capacity".into(), "charge_power".into()],
        };
        assert_eq!(
            err.to_string(),
            "missing required fields: battery_capacity, charge_power"
        );
        assert_eq!(err.kind(), ValidationKind::MissingFields);
    }

    #[test]
    fn test_cross_field_constraint_display() {
        let err = ValidationError::OutOfRange {
            field: "target_soc".into(),
            value: 80.0,
            constraint: Constraint {
                comparison: Comparison::GreaterThan,
                limit: 80.0,
                reference: Some("current_soc".into()),
            },
        };
        assert_eq!(
            err.to_string(),
            "field 'target_soc' is out of range: must be > current_soc (80), got 80"
        );
    }

    #[test]
    fn test_error_codes() {
        let validation: PredictionError = ValidationError::TypeError {
            field: "health_score".into(),
            value: "\"abc\"".into(),
        }
        .into();
        assert_eq!(validation.code(), "VALIDATION_ERROR");

        let internal = PredictionError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(internal.code(), "INTERNAL_ERROR");
    }
}
