//! Mock implementations for testing
//!
//! This module provides a scriptable remote client for testing adapters
//! without a Tuya account.

use crate::client::{Ack, RemoteCommand, RemoteDeviceClient};
use crate::device::DeviceState;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Mock remote client with call counting and switchable failures
#[derive(Default)]
pub struct MockDeviceClient {
    state: Mutex<DeviceState>,
    fetch_error: Mutex<Option<String>>,
    apply_error: Mutex<Option<String>>,
    delay: Option<Duration>,
    fetch_calls: AtomicUsize,
    apply_calls: AtomicUsize,
    applied: Mutex<Vec<(String, RemoteCommand)>>,
}

impl MockDeviceClient {
    /// Create new mock client returning an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the state returned by fetches
    pub fn with_state(self, state: DeviceState) -> Self {
        self.set_state(state);
        self
    }

    /// Delay every call, for timeout tests
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_state(&self, state: DeviceState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Make subsequent fetches fail with `message`
    pub fn fail_fetch<S: Into<String>>(&self, message: S) {
        *self.fetch_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }

    /// Make subsequent applies fail with `message`
    pub fn fail_apply<S: Into<String>>(&self, message: S) {
        *self.apply_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }

    /// Clear all scripted failures
    pub fn recover(&self) {
        *self.fetch_error.lock().unwrap_or_else(|e| e.into_inner()) = None;
        *self.apply_error.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn apply_calls(&self) -> usize {
        self.apply_calls.load(Ordering::SeqCst)
    }

    /// Every command received, in order
    pub fn applied(&self) -> Vec<(String, RemoteCommand)> {
        self.applied.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RemoteDeviceClient for MockDeviceClient {
    async fn fetch_state(&self, _device_id: &str) -> Result<DeviceState> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        let failure = self.fetch_error.lock().unwrap_or_else(|e| e.into_inner()).clone();
        match failure {
            Some(message) => Err(BridgeError::remote_fetch(message)),
            None => Ok(self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()),
        }
    }

    async fn apply_state(&self, device_id: &str, command: &RemoteCommand) -> Result<Ack> {
        self.apply_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        let failure = self.apply_error.lock().unwrap_or_else(|e| e.into_inner()).clone();
        if let Some(message) = failure {
            return Err(BridgeError::remote_write(message));
        }
        self.applied
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((device_id.to_string(), command.clone()));
        Ok(Ack::success())
    }
}
