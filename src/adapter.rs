//! Characteristic synchronization adapter
//!
//! Serves host reads from the device cache when it holds a valid value and
//! falls back to the remote API otherwise. Writes round-trip through the
//! remote API before the cache is committed. Any remote failure invalidates
//! the whole device cache so the next read re-verifies against the device.
//!
//! Reads and writes on one adapter are serialized: the in-flight lock is held
//! across the remote call, so a read issued while a write is pending observes
//! the write's committed value rather than the entry it replaces.

use crate::cache::StateCache;
use crate::characteristic::{Bounds, Characteristic, CharacteristicKind, CharacteristicValue};
use crate::client::RemoteDeviceClient;
use crate::device::{DeviceDescriptor, DeviceState};
use crate::error::{BridgeError, Result};
use crate::negotiator::CapabilityNegotiator;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, trace};

/// Phase a single host request passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    CacheHit,
    RemoteFetch,
    RemoteWrite,
    Failed,
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestPhase::CacheHit => "cache-hit",
            RequestPhase::RemoteFetch => "remote-fetch",
            RequestPhase::RemoteWrite => "remote-write",
            RequestPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Answers host get/set requests for one characteristic on one device
pub struct CharacteristicAdapter {
    characteristic: &'static dyn Characteristic,
    device: Arc<DeviceDescriptor>,
    cache: Arc<StateCache>,
    client: Arc<dyn RemoteDeviceClient>,
    bounds: Bounds,
    in_flight: Mutex<()>,
}

impl CharacteristicAdapter {
    /// Build an adapter, negotiating bounds from the device's capability data.
    ///
    /// Fails with [`BridgeError::UnsupportedCharacteristic`] when the device
    /// lacks a required field; such a characteristic must not be exposed.
    pub fn new(
        kind: CharacteristicKind,
        device: Arc<DeviceDescriptor>,
        cache: Arc<StateCache>,
        client: Arc<dyn RemoteDeviceClient>,
    ) -> Result<Self> {
        let characteristic = kind.characteristic();
        let negotiator = CapabilityNegotiator::new(characteristic);
        if !negotiator.is_supported(&device.capabilities) {
            return Err(BridgeError::UnsupportedCharacteristic {
                characteristic: kind.to_string(),
                device_id: device.device_id.clone(),
                missing: device
                    .capabilities
                    .missing_fields(characteristic.required_fields())
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            });
        }
        let bounds = negotiator.negotiate_bounds(&device.capabilities)?;

        Ok(Self {
            characteristic,
            device,
            cache,
            client,
            bounds,
            in_flight: Mutex::new(()),
        })
    }

    pub fn kind(&self) -> CharacteristicKind {
        self.characteristic.kind()
    }

    /// Negotiated property metadata for the host
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn device_id(&self) -> &str {
        &self.device.device_id
    }

    /// Current value for the host.
    ///
    /// `Ok(None)` means the device answered without the field this
    /// characteristic reads; nothing is cached and the host gets no update.
    pub async fn read(&self) -> Result<Option<CharacteristicValue>> {
        let _guard = self.in_flight.lock().await;
        let kind = self.kind();

        if let Some(value) = self.cache.get(kind) {
            trace!("[GET] {} {} {}: {value}", self.device.name, kind, RequestPhase::CacheHit);
            return Ok(Some(value));
        }

        debug!("[GET] {} {} {}", self.device.name, kind, RequestPhase::RemoteFetch);
        let state = match self.client.fetch_state(self.device_id()).await {
            Ok(state) => state,
            Err(e) => {
                error!("[GET] {} {} {}: {e}", self.device.name, kind, RequestPhase::Failed);
                self.cache.invalidate_all();
                return Err(e);
            }
        };

        self.commit_state(&state)
    }

    /// Apply a host value to the device, committing the cache on success.
    ///
    /// The cache receives the normalized value (e.g. `Int(2)` for text `" 2 "`)
    /// so cached and fetched reads agree. Values are not checked against
    /// [`bounds`](Self::bounds); the host enforces the range it was given.
    pub async fn write(&self, value: CharacteristicValue) -> Result<()> {
        // Coercion failures never reach the device and leave the cache alone
        let value = self.characteristic.normalize(&value)?;
        let command = self.characteristic.to_remote_command(&value)?;

        let _guard = self.in_flight.lock().await;
        let kind = self.kind();
        debug!(
            "[SET] {} {} {}: {value} as {} {}",
            self.device.name,
            kind,
            RequestPhase::RemoteWrite,
            command.command_name,
            command.payload
        );

        match self.client.apply_state(self.device_id(), &command).await {
            Ok(_) => {
                self.cache.set(kind, value);
                Ok(())
            }
            Err(e) => {
                error!("[SET] {} {} {}: {e}", self.device.name, kind, RequestPhase::Failed);
                self.cache.invalidate_all();
                Err(e)
            }
        }
    }

    /// Push an externally obtained state snapshot (e.g. from a device poll)
    /// into the cache. Returns the value when the snapshot carried the field.
    pub async fn update_from_state(&self, state: &DeviceState) -> Result<Option<CharacteristicValue>> {
        let _guard = self.in_flight.lock().await;
        self.commit_state(state)
    }

    fn commit_state(&self, state: &DeviceState) -> Result<Option<CharacteristicValue>> {
        let kind = self.kind();
        match self.characteristic.to_host_value(state) {
            Ok(Some(value)) => {
                debug!("[GET] {} {}: {value}", self.device.name, kind);
                self.cache.set(kind, value.clone());
                Ok(Some(value))
            }
            Ok(None) => {
                debug!("[GET] {} {}: field missing from device state", self.device.name, kind);
                Ok(None)
            }
            Err(e) => {
                error!("[GET] {} {}: {e}", self.device.name, kind);
                self.cache.invalidate(kind);
                Err(e)
            }
        }
    }
}

impl fmt::Debug for CharacteristicAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharacteristicAdapter")
            .field("kind", &self.kind())
            .field("device_id", &self.device.device_id)
            .field("bounds", &self.bounds)
            .finish()
    }
}
