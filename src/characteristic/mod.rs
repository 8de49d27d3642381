//! Characteristic kinds and their value transforms
//!
//! A [`Characteristic`] declares which capability fields it needs, how its
//! bounds derive from capability data, and how values move between the
//! remote device state and the host. Adapters are generic over this trait, so
//! adding a kind means adding one implementation here.

pub mod on;
pub mod rotation_speed;
pub mod value;

pub use on::On;
pub use rotation_speed::RotationSpeed;
pub use value::CharacteristicValue;

use crate::client::RemoteCommand;
use crate::device::DeviceState;
use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a host-facing characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacteristicKind {
    On,
    RotationSpeed,
}

impl CharacteristicKind {
    pub const ALL: [CharacteristicKind; 2] = [CharacteristicKind::On, CharacteristicKind::RotationSpeed];

    /// Host-facing title
    pub fn title(&self) -> &'static str {
        match self {
            CharacteristicKind::On => "Characteristic.On",
            CharacteristicKind::RotationSpeed => "Characteristic.RotationSpeed",
        }
    }

    /// Transform rules for this kind
    pub fn characteristic(&self) -> &'static dyn Characteristic {
        match self {
            CharacteristicKind::On => &On,
            CharacteristicKind::RotationSpeed => &RotationSpeed,
        }
    }
}

impl fmt::Display for CharacteristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for CharacteristicKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim_start_matches("Characteristic.")
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "on" => Ok(CharacteristicKind::On),
            "rotationspeed" | "speed" => Ok(CharacteristicKind::RotationSpeed),
            _ => Err(BridgeError::config(format!("Unknown characteristic: {s}"))),
        }
    }
}

/// Value format presented to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Bool,
    Int,
}

/// Negotiated property metadata for one characteristic on one device
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
    pub format: Format,
    /// Physical unit; `None` for unitless levels
    pub unit: Option<&'static str>,
}

/// How bounds are derived from capability data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsRule {
    /// Integer from 0 up to the value of a capability field
    IntegerUpTo { max_field: &'static str },
    /// Plain on/off
    Boolean,
}

/// Per-kind transform rules
pub trait Characteristic: Send + Sync + fmt::Debug {
    fn kind(&self) -> CharacteristicKind;

    /// Capability fields that must be present for the device to expose this kind
    fn required_fields(&self) -> &'static [&'static str];

    fn bounds_rule(&self) -> BoundsRule;

    /// Extract the host value from a remote state snapshot.
    ///
    /// `Ok(None)` means the state did not carry the field at all.
    fn to_host_value(&self, state: &DeviceState) -> Result<Option<CharacteristicValue>>;

    /// Canonical host value for a write, as the device will report it back.
    ///
    /// Fails for input the device cannot accept, such as non-numeric text
    /// for a speed level.
    fn normalize(&self, value: &CharacteristicValue) -> Result<CharacteristicValue>;

    /// Encode a host value as the command the device expects
    fn to_remote_command(&self, value: &CharacteristicValue) -> Result<RemoteCommand>;
}
