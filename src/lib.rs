//! Tuya Web characteristic bridge
//!
//! Presents remote Tuya Web device properties as host characteristics with a
//! fast get/set surface. Reads are served from a per-device cache while it is
//! valid and fetched from the remote API otherwise; writes go to the device
//! first and are committed to the cache only once acknowledged. Any remote
//! failure invalidates the device's cache.
//!
//! # Layout
//!
//! - [`negotiator`] decides which characteristics a device supports and their bounds
//! - [`cache`] holds last-known values per device
//! - [`adapter`] answers host reads and writes for one characteristic
//! - [`accessory`] groups the adapters of one device around a shared cache
//! - [`client`] is the remote API boundary, with a Tuya Web implementation

pub mod accessory;
pub mod adapter;
pub mod cache;
pub mod characteristic;
pub mod client;
pub mod config;
pub mod device;
pub mod error;
pub mod logging;
pub mod negotiator;

// Test support modules - available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

// Re-export main types for convenience
pub use accessory::Accessory;
pub use adapter::CharacteristicAdapter;
pub use cache::StateCache;
pub use characteristic::{Bounds, CharacteristicKind, CharacteristicValue, Format};
pub use client::{RemoteCommand, RemoteDeviceClient};
pub use config::BridgeConfig;
pub use device::{Capabilities, DeviceDescriptor, DeviceState};
pub use error::{BridgeError, Result};
