//! The handle registry.
//!
//! Every object handed across the bridge lives here, keyed by a handle that
//! is never reused within a process. Looking up a released or mistyped
//! handle is an error, not undefined behavior.

use crate::config::{self, BridgeConfig};
use crate::error::BridgeError;
use crate::handle::{HandleKind, HuskHandle, NULL_HANDLE};
use crate::map::StringMap;
use crate::stream::StreamState;
use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// A registered object.
pub(crate) enum Entry {
    /// Locked per stream so reads on one stream do not block the registry.
    Stream(Arc<Mutex<StreamState>>),
    Map(Arc<StringMap>),
    List(Arc<Vec<String>>),
    Error(BridgeError),
}

impl Entry {
    pub(crate) fn kind(&self) -> HandleKind {
        match self {
            Entry::Stream(_) => HandleKind::Stream,
            Entry::Map(_) => HandleKind::Map,
            Entry::List(_) => HandleKind::List,
            Entry::Error(_) => HandleKind::Error,
        }
    }
}

/// Owner of every live object.
pub(crate) struct Registry {
    entries: FxHashMap<HuskHandle, Entry>,
    next: HuskHandle,
    /// Live entries that count against `limit` (everything but errors).
    counted: usize,
    limit: usize,
}

impl Registry {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            next: NULL_HANDLE + 1,
            counted: 0,
            limit,
        }
    }

    pub(crate) fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    pub(crate) fn insert(&mut self, entry: Entry) -> Result<HuskHandle, BridgeError> {
        let counts = entry.kind() != HandleKind::Error;
        if counts && self.counted >= self.limit {
            return Err(BridgeError::HandleLimit { limit: self.limit });
        }

        let handle = self.next;
        self.next += 1;
        self.entries.insert(handle, entry);
        if counts {
            self.counted += 1;
        }
        Ok(handle)
    }

    pub(crate) fn get(&self, handle: HuskHandle, kind: HandleKind) -> Result<&Entry, BridgeError> {
        self.entries
            .get(&handle)
            .filter(|entry| entry.kind() == kind)
            .ok_or_else(|| BridgeError::invalid(handle, kind))
    }

    pub(crate) fn remove(&mut self, handle: HuskHandle, kind: HandleKind) -> Result<Entry, BridgeError> {
        self.get(handle, kind)?;
        let entry = self
            .entries
            .remove(&handle)
            .ok_or_else(|| BridgeError::invalid(handle, kind))?;
        if kind != HandleKind::Error {
            self.counted -= 1;
        }
        Ok(entry)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

lazy_static! {
    static ref REGISTRY: Mutex<Registry> = {
        let config = BridgeConfig::from_env();
        config::configure_reads(&config);
        Mutex::new(Registry::new(config.handle_limit))
    };
}

/// Run `f` with the process-wide registry locked.
pub(crate) fn with_registry<T>(f: impl FnOnce(&mut Registry) -> T) -> T {
    let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut registry)
}

pub(crate) fn insert(entry: Entry) -> Result<HuskHandle, BridgeError> {
    let kind = entry.kind();
    let handle = with_registry(|reg| reg.insert(entry))?;
    tracing::debug!(%kind, handle, "registered handle");
    Ok(handle)
}

/// Remove an entry. The entry is dropped after the registry lock is
/// released, since dropping a stream may run arbitrary source code.
pub(crate) fn release(handle: HuskHandle, kind: HandleKind) -> Result<(), BridgeError> {
    let entry = with_registry(|reg| reg.remove(handle, kind))?;
    drop(entry);
    tracing::debug!(%kind, handle, "released handle");
    Ok(())
}

/// Number of live handles of every kind.
pub fn live_handles() -> usize {
    with_registry(|reg| reg.len())
}
