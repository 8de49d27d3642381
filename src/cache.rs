//! Per-device cache of last-known characteristic values
//!
//! Validity is failure driven: an entry stays valid until it is overwritten or
//! explicitly invalidated. There is no expiry. Invalidated entries keep their
//! stale value for diagnostics but are never handed out by [`StateCache::get`].

use crate::characteristic::{CharacteristicKind, CharacteristicValue};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{trace, warn};

/// Last-known value of one characteristic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntry {
    pub value: CharacteristicValue,
    pub valid: bool,
    /// When the value was last set
    pub updated_at: DateTime<Utc>,
}

/// Cache owned by one accessory and shared by its adapters
#[derive(Debug)]
pub struct StateCache {
    device_id: String,
    entries: RwLock<HashMap<CharacteristicKind, CacheEntry>>,
}

impl StateCache {
    pub fn new<S: Into<String>>(device_id: S) -> Self {
        Self {
            device_id: device_id.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Valid value for `kind`, if any
    pub fn get(&self, kind: CharacteristicKind) -> Option<CharacteristicValue> {
        self.read_entries()
            .get(&kind)
            .filter(|entry| entry.valid)
            .map(|entry| entry.value.clone())
    }

    /// Store `value` and mark it valid
    pub fn set(&self, kind: CharacteristicKind, value: CharacteristicValue) {
        trace!("cache set {} {kind} = {value}", self.device_id);
        self.write_entries().insert(
            kind,
            CacheEntry {
                value,
                valid: true,
                updated_at: Utc::now(),
            },
        );
    }

    pub fn invalidate(&self, kind: CharacteristicKind) {
        if let Some(entry) = self.write_entries().get_mut(&kind) {
            entry.valid = false;
        }
    }

    /// Mark every entry of this device invalid
    pub fn invalidate_all(&self) {
        trace!("cache invalidate_all {}", self.device_id);
        for entry in self.write_entries().values_mut() {
            entry.valid = false;
        }
    }

    /// Raw entry including stale values; diagnostics only
    pub fn peek(&self, kind: CharacteristicKind) -> Option<CacheEntry> {
        self.read_entries().get(&kind).cloned()
    }

    /// All entries, sorted by kind
    pub fn snapshot(&self) -> Vec<(CharacteristicKind, CacheEntry)> {
        let mut entries: Vec<_> = self
            .read_entries()
            .iter()
            .map(|(kind, entry)| (*kind, entry.clone()))
            .collect();
        entries.sort_by_key(|(kind, _)| *kind);
        entries
    }

    // Entries are replaced whole; a poisoned lock still guards consistent data.
    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<CharacteristicKind, CacheEntry>> {
        self.entries.read().unwrap_or_else(|poisoned| {
            warn!("State cache lock poisoned for {}, recovering", self.device_id);
            poisoned.into_inner()
        })
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<CharacteristicKind, CacheEntry>> {
        self.entries.write().unwrap_or_else(|poisoned| {
            warn!("State cache lock poisoned for {}, recovering", self.device_id);
            poisoned.into_inner()
        })
    }
}
