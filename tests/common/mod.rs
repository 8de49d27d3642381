//! Common test utilities

#![allow(dead_code)]

pub mod test_fixtures;
pub mod tuya_mock;

use async_trait::async_trait;
use mockall::mock;
use tuya_hap_bridge::client::{Ack, RemoteCommand, RemoteDeviceClient};
use tuya_hap_bridge::{DeviceState, Result};

mock! {
    pub Remote {}

    #[async_trait]
    impl RemoteDeviceClient for Remote {
        async fn fetch_state(&self, device_id: &str) -> Result<DeviceState>;
        async fn apply_state(&self, device_id: &str, command: &RemoteCommand) -> Result<Ack>;
    }
}
