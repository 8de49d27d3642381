//! Host-facing characteristic values and numeric coercion

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Largest integer an `f64` represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Loosely typed value as the host exchanges it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CharacteristicValue {
    /// Interpret free-form input (CLI arguments, config overrides).
    ///
    /// `true`/`false` become booleans, anything that parses as a number becomes
    /// numeric, everything else stays text and is left for the characteristic
    /// to accept or reject.
    pub fn parse_host_input(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::Int(n);
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Float(n),
            _ => Self::Text(input.to_string()),
        }
    }

    /// Integral numbers become `Int`, everything else `Float`
    pub fn from_number(n: f64) -> Self {
        if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
            Self::Int(n as i64)
        } else {
            Self::Float(n)
        }
    }

    /// Strict numeric coercion; booleans and non-numeric text are rejected
    pub fn as_number(&self) -> Result<f64> {
        match self {
            Self::Int(n) => Ok(*n as f64),
            Self::Float(n) if n.is_finite() => Ok(*n),
            Self::Float(n) => Err(BridgeError::malformed(format!("{n} is not a finite number"))),
            Self::Text(s) => parse_numeric_text(s),
            Self::Bool(b) => Err(BridgeError::malformed(format!(
                "expected a number, got boolean {b}"
            ))),
        }
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CharacteristicValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(value: f64) -> Self {
        Self::from_number(value)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

fn parse_numeric_text(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && !trimmed.is_empty() => Ok(n),
        _ => Err(BridgeError::malformed(format!("{text:?} is not numeric"))),
    }
}

/// Numeric coercion of a raw remote field (number or numeric string)
pub(crate) fn coerce_number(value: &Value, field: &str) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| BridgeError::malformed(format!("field '{field}': {n} out of range"))),
        Value::String(s) => parse_numeric_text(s)
            .map_err(|_| BridgeError::malformed(format!("field '{field}': {s:?} is not numeric"))),
        other => Err(BridgeError::malformed(format!(
            "field '{field}': expected number or numeric string, got {other}"
        ))),
    }
}

/// JSON payload number, integral values encoded as integers
pub(crate) fn number_payload(n: f64) -> Value {
    match CharacteristicValue::from_number(n) {
        CharacteristicValue::Int(i) => Value::from(i),
        _ => Value::from(n),
    }
}
