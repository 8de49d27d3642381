//! One device and the characteristics it exposes
//!
//! The accessory owns the device's [`StateCache`] and builds an adapter for
//! every characteristic kind the capability data supports. Unsupported kinds
//! are skipped at setup and never exposed to the host.

use crate::adapter::CharacteristicAdapter;
use crate::cache::StateCache;
use crate::characteristic::{Bounds, CharacteristicKind};
use crate::client::RemoteDeviceClient;
use crate::device::{DeviceDescriptor, DeviceState};
use crate::error::Result;
use crate::negotiator::CapabilityNegotiator;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Accessory {
    device: Arc<DeviceDescriptor>,
    cache: Arc<StateCache>,
    adapters: BTreeMap<CharacteristicKind, CharacteristicAdapter>,
}

impl Accessory {
    /// Set up adapters for every supported characteristic kind.
    ///
    /// Errors only when capability data passes the support check but cannot
    /// produce bounds.
    pub fn new(device: DeviceDescriptor, client: Arc<dyn RemoteDeviceClient>) -> Result<Self> {
        let device = Arc::new(device);
        let cache = Arc::new(StateCache::new(device.device_id.clone()));
        let mut adapters = BTreeMap::new();

        for kind in CharacteristicKind::ALL {
            let negotiator = CapabilityNegotiator::new(kind.characteristic());
            if !negotiator.is_supported(&device.capabilities) {
                debug!("{}: skipping {kind}", device.name);
                continue;
            }
            let adapter = CharacteristicAdapter::new(
                kind,
                Arc::clone(&device),
                Arc::clone(&cache),
                Arc::clone(&client),
            )?;
            adapters.insert(kind, adapter);
        }

        info!(
            "{} ({}): exposing {:?}",
            device.name,
            device.device_id,
            adapters.keys().collect::<Vec<_>>()
        );

        Ok(Self {
            device,
            cache,
            adapters,
        })
    }

    pub fn device(&self) -> &DeviceDescriptor {
        &self.device
    }

    pub fn cache(&self) -> &Arc<StateCache> {
        &self.cache
    }

    pub fn adapter(&self, kind: CharacteristicKind) -> Option<&CharacteristicAdapter> {
        self.adapters.get(&kind)
    }

    /// Exposed kinds with their negotiated bounds
    pub fn characteristics(&self) -> impl Iterator<Item = (CharacteristicKind, &Bounds)> {
        self.adapters
            .iter()
            .map(|(kind, adapter)| (*kind, adapter.bounds()))
    }

    /// Feed a polled device snapshot to every exposed characteristic.
    ///
    /// Returns how many cache entries were refreshed. A characteristic whose
    /// field is malformed is invalidated and skipped; the others still update.
    pub async fn apply_remote_state(&self, state: &DeviceState) -> usize {
        let mut updated = 0;
        for adapter in self.adapters.values() {
            match adapter.update_from_state(state).await {
                Ok(Some(_)) => updated += 1,
                Ok(None) => {}
                Err(e) => warn!("{}: ignoring {} update: {e}", self.device.name, adapter.kind()),
            }
        }
        updated
    }

    /// Force every characteristic to re-verify against the device
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}
