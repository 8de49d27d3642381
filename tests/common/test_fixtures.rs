//! Test fixtures and utilities for consistent test setup

#![allow(dead_code)]

use rstest::*;
use serde_json::json;
use std::sync::Arc;
use tuya_hap_bridge::{
    Capabilities, CharacteristicAdapter, CharacteristicKind, DeviceDescriptor, DeviceState,
    RemoteDeviceClient, StateCache,
};

/// Common test device ids
pub struct TestDeviceIds;

impl TestDeviceIds {
    pub const BEDROOM_FAN: &'static str = "bf8c1a2d3e4f5a6b7c8d";
    pub const DESK_PLUG: &'static str = "bf0a9b8c7d6e5f4a3b2c";
}

/// A fan reporting four speed levels and a power state
#[fixture]
pub fn bedroom_fan() -> DeviceDescriptor {
    DeviceDescriptor::new(
        TestDeviceIds::BEDROOM_FAN,
        "Bedroom Fan",
        Capabilities::new()
            .with_field("speed_level", json!(4))
            .with_field("speed", json!("1"))
            .with_field("state", json!(true)),
    )
    .with_dev_type("fan")
}

/// State snapshot as returned by a QueryDevice call
pub fn fan_state(speed: &str) -> DeviceState {
    DeviceState::new()
        .with_field("speed", json!(speed))
        .with_field("state", json!(true))
        .with_field("online", json!(true))
}

/// Adapter for `kind` on `device` with a fresh cache
pub fn adapter_for<C: RemoteDeviceClient + 'static>(
    kind: CharacteristicKind,
    device: DeviceDescriptor,
    client: C,
) -> (CharacteristicAdapter, Arc<StateCache>) {
    let cache = Arc::new(StateCache::new(device.device_id.clone()));
    let adapter =
        CharacteristicAdapter::new(kind, Arc::new(device), Arc::clone(&cache), Arc::new(client))
            .expect("fixture device supports the characteristic");
    (adapter, cache)
}
