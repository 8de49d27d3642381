//! Deadline enforcement for remote calls

use super::{Ack, RemoteCommand, RemoteDeviceClient};
use crate::device::DeviceState;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// Wraps a client so no call outlives `limit`.
///
/// An elapsed call resolves to [`BridgeError::Timeout`], which callers treat
/// like any other remote failure.
pub struct TimeoutClient<C> {
    inner: C,
    limit: Duration,
}

impl<C: RemoteDeviceClient> TimeoutClient<C> {
    pub fn new(inner: C, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<C: RemoteDeviceClient> RemoteDeviceClient for TimeoutClient<C> {
    async fn fetch_state(&self, device_id: &str) -> Result<DeviceState> {
        match timeout(self.limit, self.inner.fetch_state(device_id)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("fetch_state for {device_id} exceeded {:?}", self.limit);
                Err(BridgeError::timeout(format!(
                    "fetch_state for {device_id} after {:?}",
                    self.limit
                )))
            }
        }
    }

    async fn apply_state(&self, device_id: &str, command: &RemoteCommand) -> Result<Ack> {
        match timeout(self.limit, self.inner.apply_state(device_id, command)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "apply_state {} for {device_id} exceeded {:?}",
                    command.command_name, self.limit
                );
                Err(BridgeError::timeout(format!(
                    "apply_state {} for {device_id} after {:?}",
                    command.command_name, self.limit
                )))
            }
        }
    }
}
