//! Power state

use super::{BoundsRule, Characteristic, CharacteristicKind, CharacteristicValue};
use crate::client::RemoteCommand;
use crate::device::DeviceState;
use crate::error::{BridgeError, Result};
use serde_json::{json, Value};

pub const STATE_FIELD: &str = "state";
pub const POWER_COMMAND: &str = "turnOnOff";

#[derive(Debug, Clone, Copy, Default)]
pub struct On;

impl Characteristic for On {
    fn kind(&self) -> CharacteristicKind {
        CharacteristicKind::On
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &[STATE_FIELD]
    }

    fn bounds_rule(&self) -> BoundsRule {
        BoundsRule::Boolean
    }

    fn to_host_value(&self, state: &DeviceState) -> Result<Option<CharacteristicValue>> {
        let Some(raw) = state.get(STATE_FIELD) else {
            return Ok(None);
        };
        let on = match raw {
            Value::Bool(b) => *b,
            Value::String(s) if s.eq_ignore_ascii_case("true") => true,
            Value::String(s) if s.eq_ignore_ascii_case("false") => false,
            Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
            other => {
                return Err(BridgeError::malformed(format!(
                    "field '{STATE_FIELD}': expected boolean, got {other}"
                )))
            }
        };
        Ok(Some(CharacteristicValue::Bool(on)))
    }

    fn normalize(&self, value: &CharacteristicValue) -> Result<CharacteristicValue> {
        power_state(value).map(CharacteristicValue::Bool)
    }

    fn to_remote_command(&self, value: &CharacteristicValue) -> Result<RemoteCommand> {
        let on = power_state(value)?;
        Ok(RemoteCommand::new(POWER_COMMAND, json!({ "value": u8::from(on) })))
    }
}

fn power_state(value: &CharacteristicValue) -> Result<bool> {
    match value {
        CharacteristicValue::Bool(b) => Ok(*b),
        CharacteristicValue::Int(0) => Ok(false),
        CharacteristicValue::Int(1) => Ok(true),
        CharacteristicValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(BridgeError::malformed(format!("{s:?} is not a power state"))),
        },
        other => Err(BridgeError::malformed(format!("{other} is not a power state"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_variants() {
        for (raw, expected) in [
            (json!(true), true),
            (json!("false"), false),
            (json!("TRUE"), true),
            (json!(1), true),
            (json!(0), false),
        ] {
            let state = DeviceState::new().with_field(STATE_FIELD, raw);
            assert_eq!(
                On.to_host_value(&state).unwrap(),
                Some(CharacteristicValue::Bool(expected))
            );
        }
    }

    #[test]
    fn test_power_command() {
        let command = On.to_remote_command(&CharacteristicValue::Bool(true)).unwrap();
        assert_eq!(command.command_name, POWER_COMMAND);
        assert_eq!(command.payload, json!({ "value": 1 }));

        let command = On.to_remote_command(&CharacteristicValue::Int(0)).unwrap();
        assert_eq!(command.payload, json!({ "value": 0 }));

        assert!(On.to_remote_command(&CharacteristicValue::Int(5)).is_err());
        assert!(On.to_remote_command(&CharacteristicValue::Text("maybe".into())).is_err());
    }

    #[test]
    fn test_normalize_to_bool() {
        assert_eq!(
            On.normalize(&CharacteristicValue::Int(1)).unwrap(),
            CharacteristicValue::Bool(true)
        );
        assert_eq!(
            On.normalize(&CharacteristicValue::Text("FALSE".into())).unwrap(),
            CharacteristicValue::Bool(false)
        );
    }
}
