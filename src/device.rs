//! Device identity, capability data and remote state snapshots

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Static capability data reported for a device.
///
/// Field names are device specific (`speed_level`, `speed`, `state`, ...).
/// A field holding JSON `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(HashMap<String, Value>);

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_field<K: Into<String>>(mut self, field: K, value: Value) -> Self {
        self.0.insert(field.into(), value);
        self
    }

    /// Raw field value, `None` when missing or null
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Fields from `required` that are absent
    pub fn missing_fields<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|field| !self.has_field(field))
            .collect()
    }
}

impl From<HashMap<String, Value>> for Capabilities {
    fn from(fields: HashMap<String, Value>) -> Self {
        Self(fields)
    }
}

/// One physical device as known to the host integration layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Opaque, stable remote identifier (Tuya `devId`)
    pub device_id: String,
    /// Display name
    pub name: String,
    /// Remote device type (`fan`, `switch`, ...)
    #[serde(default)]
    pub dev_type: Option<String>,
    /// Static capability data
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl DeviceDescriptor {
    pub fn new<I: Into<String>, N: Into<String>>(
        device_id: I,
        name: N,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            name: name.into(),
            dev_type: None,
            capabilities,
        }
    }

    pub fn with_dev_type<S: Into<String>>(mut self, dev_type: S) -> Self {
        self.dev_type = Some(dev_type.into());
        self
    }
}

/// Snapshot of device state returned by a remote fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceState(HashMap<String, Value>);

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field<K: Into<String>>(mut self, field: K, value: Value) -> Self {
        self.0.insert(field.into(), value);
        self
    }

    /// Field value, `None` when missing or null
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }
}

impl From<HashMap<String, Value>> for DeviceState {
    fn from(fields: HashMap<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_fields_count_as_missing() {
        let caps = Capabilities::new()
            .with_field("speed_level", json!(4))
            .with_field("speed", Value::Null);

        assert!(caps.has_field("speed_level"));
        assert!(!caps.has_field("speed"));
        assert_eq!(caps.missing_fields(&["speed_level", "speed"]), vec!["speed"]);
    }

    #[test]
    fn test_descriptor_deserializes_from_config_shape() {
        let descriptor: DeviceDescriptor = serde_json::from_value(json!({
            "device_id": "bf1234",
            "name": "Bedroom fan",
            "capabilities": { "speed_level": 3, "speed": "1" }
        }))
        .unwrap();

        assert_eq!(descriptor.device_id, "bf1234");
        assert_eq!(descriptor.dev_type, None);
        assert_eq!(descriptor.capabilities.get("speed_level"), Some(&json!(3)));
    }
}
