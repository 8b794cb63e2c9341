//! Input validation for prediction requests
//!
//! Turns a raw JSON object into an ordered numeric feature vector, checking
//! presence, numeric coercion, per-field bounds and cross-field rules in
//! that order. Nothing here touches a model or a heuristic.

use crate::error::{Comparison, Constraint, ValidationError};
use crate::models::{DurationRequest, FaultRequest, DEFAULT_TEMPERATURE_CELSIUS};
use serde_json::{Map, Value};

/// Longest raw value echoed back in a type error
const MAX_ECHOED_VALUE_LEN: usize = 64;

/// Numeric type a field must coerce to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Number,
    /// Whole number, fractional values are a format error
    Integer,
}

/// A single bound on a field value
#[derive(Debug, Clone, Copy)]
pub struct Bound {
    pub comparison: Comparison,
    pub limit: f64,
}

const fn bound(comparison: Comparison, limit: f64) -> Bound {
    Bound { comparison, limit }
}

/// Schema entry for one input field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Alternative keys accepted when `name` is absent
    pub aliases: &'static [&'static str],
    pub field_type: FieldType,
    /// Value used when the field is absent; `None` makes the field required
    pub default: Option<f64>,
    pub bounds: &'static [Bound],
}

/// `field` must compare against the value of `other`
#[derive(Debug, Clone, Copy)]
pub struct CrossFieldRule {
    pub field: &'static str,
    pub comparison: Comparison,
    pub other: &'static str,
}

/// Ordered set of fields plus cross-field rules
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    pub fields: &'static [FieldSpec],
    pub cross_field: &'static [CrossFieldRule],
}

pub const DURATION_SCHEMA: FieldSchema = FieldSchema {
    fields: &[
        FieldSpec {
            name: "battery_capacity",
            aliases: &[],
            field_type: FieldType::Number,
            default: None,
            bounds: &[
                bound(Comparison::GreaterThan, 0.0),
                bound(Comparison::AtMost, 200.0),
            ],
        },
        FieldSpec {
            name: "current_soc",
            aliases: &[],
            field_type: FieldType::Number,
            default: None,
            bounds: &[
                bound(Comparison::AtLeast, 0.0),
                bound(Comparison::AtMost, 100.0),
            ],
        },
        FieldSpec {
            name: "target_soc",
            aliases: &[],
            field_type: FieldType::Number,
            default: None,
            bounds: &[
                bound(Comparison::AtLeast, 0.0),
                bound(Comparison::AtMost, 100.0),
            ],
        },
        FieldSpec {
            name: "charge_power",
            aliases: &["pile_power"],
            field_type: FieldType::Number,
            default: None,
            bounds: &[
                bound(Comparison::GreaterThan, 0.0),
                bound(Comparison::AtMost, 400.0),
            ],
        },
        FieldSpec {
            name: "temperature",
            aliases: &[],
            field_type: FieldType::Number,
            default: Some(DEFAULT_TEMPERATURE_CELSIUS),
            bounds: &[],
        },
    ],
    cross_field: &[CrossFieldRule {
        field: "target_soc",
        comparison: Comparison::GreaterThan,
        other: "current_soc",
    }],
};

const NON_NEGATIVE: &[Bound] = &[bound(Comparison::AtLeast, 0.0)];

pub const FAULT_SCHEMA: FieldSchema = FieldSchema {
    fields: &[
        FieldSpec {
            name: "total_charge_count",
            aliases: &[],
            field_type: FieldType::Integer,
            default: None,
            bounds: NON_NEGATIVE,
        },
        FieldSpec {
            name: "total_charge_amount",
            aliases: &[],
            field_type: FieldType::Number,
            default: None,
            bounds: NON_NEGATIVE,
        },
        FieldSpec {
            name: "days_since_last_maintenance",
            aliases: &[],
            field_type: FieldType::Integer,
            default: None,
            bounds: NON_NEGATIVE,
        },
        FieldSpec {
            name: "health_score",
            aliases: &[],
            field_type: FieldType::Number,
            default: None,
            bounds: &[
                bound(Comparison::AtLeast, 0.0),
                bound(Comparison::AtMost, 100.0),
            ],
        },
        FieldSpec {
            name: "avg_daily_usage",
            aliases: &[],
            field_type: FieldType::Number,
            default: None,
            bounds: NON_NEGATIVE,
        },
        FieldSpec {
            name: "voltage_fluctuation",
            aliases: &[],
            field_type: FieldType::Number,
            default: None,
            bounds: NON_NEGATIVE,
        },
        FieldSpec {
            name: "fault_history_count",
            aliases: &[],
            field_type: FieldType::Integer,
            default: None,
            bounds: NON_NEGATIVE,
        },
    ],
    cross_field: &[],
};

/// Validated values in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    names: Vec<&'static str>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.values[idx])
    }
}

impl FieldSchema {
    /// Validate a raw request object against this schema
    pub fn validate(&self, input: &Map<String, Value>) -> Result<FeatureVector, ValidationError> {
        let raw: Vec<Option<&Value>> = self.fields.iter().map(|spec| lookup(input, spec)).collect();

        let missing: Vec<String> = self
            .fields
            .iter()
            .zip(&raw)
            .filter(|(spec, value)| value.is_none() && spec.default.is_none())
            .map(|(spec, _)| spec.name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { fields: missing });
        }

        let mut values = Vec::with_capacity(self.fields.len());
        for (spec, value) in self.fields.iter().zip(&raw) {
            let coerced = match value {
                Some(value) => coerce(value, spec.field_type).ok_or_else(|| {
                    ValidationError::TypeError {
                        field: spec.name.to_string(),
                        value: echo(value),
                    }
                })?,
                None => spec.default.unwrap_or_default(),
            };
            values.push(coerced);
        }

        for (spec, value) in self.fields.iter().zip(&values) {
            if let Some(b) = spec.bounds.iter().find(|b| !b.comparison.holds(*value, b.limit)) {
                return Err(ValidationError::OutOfRange {
                    field: spec.name.to_string(),
                    value: *value,
                    constraint: Constraint {
                        comparison: b.comparison,
                        limit: b.limit,
                        reference: None,
                    },
                });
            }
        }

        let features = FeatureVector {
            names: self.fields.iter().map(|spec| spec.name).collect(),
            values,
        };

        for rule in self.cross_field {
            let (Some(value), Some(other)) = (features.get(rule.field), features.get(rule.other))
            else {
                continue;
            };
            if !rule.comparison.holds(value, other) {
                return Err(ValidationError::OutOfRange {
                    field: rule.field.to_string(),
                    value,
                    constraint: Constraint {
                        comparison: rule.comparison,
                        limit: other,
                        reference: Some(rule.other.to_string()),
                    },
                });
            }
        }

        Ok(features)
    }
}

/// Validate a raw duration request
pub fn validate_duration(input: &Map<String, Value>) -> Result<DurationRequest, ValidationError> {
    let f = DURATION_SCHEMA.validate(input)?;
    let v = f.values();
    Ok(DurationRequest {
        battery_capacity: v[0],
        current_soc: v[1],
        target_soc: v[2],
        charge_power: v[3],
        temperature: v[4],
    })
}

/// Validate a raw fault request
pub fn validate_fault(input: &Map<String, Value>) -> Result<FaultRequest, ValidationError> {
    let f = FAULT_SCHEMA.validate(input)?;
    let v = f.values();
    Ok(FaultRequest {
        total_charge_count: v[0] as u64,
        total_charge_amount: v[1],
        days_since_last_maintenance: v[2] as u64,
        health_score: v[3],
        avg_daily_usage: v[4],
        voltage_fluctuation: v[5],
        fault_history_count: v[6] as u64,
    })
}

/// Treat the request body as an object, anything else is a format error
pub fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or_else(|| ValidationError::TypeError {
        field: "body".to_string(),
        value: echo(body),
    })
}

fn lookup<'a>(input: &'a Map<String, Value>, spec: &FieldSpec) -> Option<&'a Value> {
    std::iter::once(spec.name)
        .chain(spec.aliases.iter().copied())
        .filter_map(|key| input.get(key))
        .find(|value| !value.is_null())
}

fn coerce(value: &Value, field_type: FieldType) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if !number.is_finite() {
        return None;
    }
    match field_type {
        FieldType::Integer if number.fract() != 0.0 => None,
        _ => Some(number),
    }
}

fn echo(value: &Value) -> String {
    let mut text = value.to_string();
    if text.len() > MAX_ECHOED_VALUE_LEN {
        let mut cut = MAX_ECHOED_VALUE_LEN;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}
