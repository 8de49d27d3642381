//! Fan rotation speed as a bounded speed level

use super::value::{coerce_number, number_payload};
use super::{BoundsRule, Characteristic, CharacteristicKind, CharacteristicValue};
use crate::client::RemoteCommand;
use crate::device::DeviceState;
use crate::error::Result;
use serde_json::json;

/// Capability field holding the highest speed level the device accepts
pub const SPEED_LEVEL_FIELD: &str = "speed_level";
/// Capability and state field holding the current speed, usually as text
pub const SPEED_FIELD: &str = "speed";
/// Remote command that sets the fan speed
pub const SPEED_COMMAND: &str = "windSpeedSet";

#[derive(Debug, Clone, Copy, Default)]
pub struct RotationSpeed;

impl Characteristic for RotationSpeed {
    fn kind(&self) -> CharacteristicKind {
        CharacteristicKind::RotationSpeed
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &[SPEED_LEVEL_FIELD, SPEED_FIELD]
    }

    fn bounds_rule(&self) -> BoundsRule {
        BoundsRule::IntegerUpTo {
            max_field: SPEED_LEVEL_FIELD,
        }
    }

    fn to_host_value(&self, state: &DeviceState) -> Result<Option<CharacteristicValue>> {
        state
            .get(SPEED_FIELD)
            .map(|raw| coerce_number(raw, SPEED_FIELD).map(CharacteristicValue::from_number))
            .transpose()
    }

    fn normalize(&self, value: &CharacteristicValue) -> Result<CharacteristicValue> {
        value.as_number().map(CharacteristicValue::from_number)
    }

    fn to_remote_command(&self, value: &CharacteristicValue) -> Result<RemoteCommand> {
        let speed = value.as_number()?;
        Ok(RemoteCommand::new(
            SPEED_COMMAND,
            json!({ "value": number_payload(speed) }),
        ))
    }
}
