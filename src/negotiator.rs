//! Capability negotiation
//!
//! Decides once, at accessory setup, whether a characteristic applies to a
//! device and which bounds the host may present for it.

use crate::characteristic::{Bounds, BoundsRule, Characteristic, Format};
use crate::device::Capabilities;
use crate::error::{BridgeError, Result};
use serde_json::Value;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct CapabilityNegotiator {
    characteristic: &'static dyn Characteristic,
}

impl CapabilityNegotiator {
    pub fn new(characteristic: &'static dyn Characteristic) -> Self {
        Self { characteristic }
    }

    /// True only when every required field is present and non-null
    pub fn is_supported(&self, capabilities: &Capabilities) -> bool {
        let missing = capabilities.missing_fields(self.characteristic.required_fields());
        if !missing.is_empty() {
            debug!(
                "{} not supported, missing capability fields {:?}",
                self.characteristic.kind(),
                missing
            );
        }
        missing.is_empty()
    }

    /// Legal value range and format derived from capability data.
    ///
    /// Callers run [`is_supported`](Self::is_supported) first; a missing or
    /// non-integer maximum here means the capability data changed underneath
    /// and is reported as an error instead of falling back to a default.
    pub fn negotiate_bounds(&self, capabilities: &Capabilities) -> Result<Bounds> {
        let bounds = match self.characteristic.bounds_rule() {
            BoundsRule::IntegerUpTo { max_field } => Bounds {
                min: 0,
                max: integer_field(capabilities, max_field)?,
                format: Format::Int,
                unit: None,
            },
            BoundsRule::Boolean => Bounds {
                min: 0,
                max: 1,
                format: Format::Bool,
                unit: None,
            },
        };
        info!(
            "{} bounds negotiated: min={} max={} format={:?}",
            self.characteristic.kind(),
            bounds.min,
            bounds.max,
            bounds.format
        );
        Ok(bounds)
    }
}

fn integer_field(capabilities: &Capabilities, field: &str) -> Result<i64> {
    let raw = capabilities.get(field).ok_or_else(|| {
        BridgeError::invalid_capabilities(format!("maximum field '{field}' is missing"))
    })?;
    let max = match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    };
    match max {
        Some(max) if max >= 0 => Ok(max),
        _ => Err(BridgeError::invalid_capabilities(format!(
            "maximum field '{field}' is not a non-negative integer: {raw}"
        ))),
    }
}

/// `4.0` counts as 4; fractional or out-of-range values do not
fn integral(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64).then_some(n as i64)
}
