//! Remote device API boundary
//!
//! Adapters only ever see [`RemoteDeviceClient`]. The Tuya Web transport lives
//! in [`http_client`]; [`timeout`] caps how long any implementation may take.

pub mod http_client;
pub mod timeout;

pub use http_client::TuyaWebClient;
pub use timeout::TimeoutClient;

use crate::device::DeviceState;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Characteristic-specific encoding of a desired state change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCommand {
    /// Remote command name (e.g. `windSpeedSet`)
    pub command_name: String,
    /// Command payload, usually `{ "value": ... }`
    pub payload: Value,
}

impl RemoteCommand {
    pub fn new<S: Into<String>>(command_name: S, payload: Value) -> Self {
        Self {
            command_name: command_name.into(),
            payload,
        }
    }
}

/// Acknowledgement of an applied command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Remote result code
    pub code: String,
}

impl Ack {
    pub fn success() -> Self {
        Self {
            code: "SUCCESS".to_string(),
        }
    }
}

/// Asynchronous, fallible access to remote device state
#[async_trait]
pub trait RemoteDeviceClient: Send + Sync {
    /// Fetch the current state of a device
    async fn fetch_state(&self, device_id: &str) -> Result<DeviceState>;

    /// Ask the device to apply a command
    async fn apply_state(&self, device_id: &str, command: &RemoteCommand) -> Result<Ack>;
}
