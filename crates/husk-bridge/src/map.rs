//! The map accessor bridge.
//!
//! A registered map is frozen: the bridge only ever reads it, so any number
//! of callers may look it up at once. Keys keep their insertion order and
//! are compared byte for byte.

use crate::error::BridgeError;
use crate::handle::{HandleKind, HuskHandle, MapHandle};
use crate::registry::{self, Entry};
use crate::strings::{c_str_arg, into_c_string};
use indexmap::IndexMap;
use libc::{c_char, c_uint};
use std::ptr;
use std::sync::Arc;

/// An insertion-ordered map of strings.
pub type StringMap = IndexMap<String, String>;

/// Register a map, returning its handle. Keys and values must not contain
/// NUL bytes, since they are handed out as C strings.
pub fn register_map(map: StringMap) -> Result<MapHandle, BridgeError> {
    for (key, value) in &map {
        if key.contains('\0') {
            return Err(BridgeError::InteriorNul {
                what: format!("map key {:?}", key),
            });
        }
        if value.contains('\0') {
            return Err(BridgeError::InteriorNul {
                what: format!("value of map key {:?}", key),
            });
        }
    }
    registry::insert(Entry::Map(Arc::new(map))).map(MapHandle::from_raw)
}

/// Register key/value pairs in iteration order. Later duplicates replace the
/// value but keep the key's first position.
pub fn register_pairs<I, K, V>(pairs: I) -> Result<MapHandle, BridgeError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    register_map(
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    )
}

fn lookup(map: MapHandle) -> Result<Arc<StringMap>, BridgeError> {
    registry::with_registry(|reg| match reg.get(map.raw(), HandleKind::Map)? {
        Entry::Map(inner) => Ok(Arc::clone(inner)),
        _ => Err(BridgeError::invalid(map.raw(), HandleKind::Map)),
    })
}

/// The key at `index` in insertion order, or `None` past the end.
pub fn get_key_at(map: MapHandle, index: usize) -> Result<Option<String>, BridgeError> {
    let inner = lookup(map)?;
    Ok(inner.get_index(index).map(|(key, _)| key.clone()))
}

/// The value stored under `key`, or `None` if absent.
pub fn get_value_for(map: MapHandle, key: &[u8]) -> Result<Option<String>, BridgeError> {
    let inner = lookup(map)?;
    // Keys are valid UTF-8, so a key that is not cannot match.
    let value = std::str::from_utf8(key)
        .ok()
        .and_then(|key| inner.get(key))
        .cloned();
    Ok(value)
}

pub fn map_len(map: MapHandle) -> Result<usize, BridgeError> {
    Ok(lookup(map)?.len())
}

pub fn release_map(map: MapHandle) -> Result<(), BridgeError> {
    registry::release(map.raw(), HandleKind::Map)
}

/// Get the key at `index` in insertion order.
///
/// Returns a caller-owned string, or null if `index` is out of range or the
/// handle is not live.
#[no_mangle]
pub extern "C" fn husk_map_key_at(map: HuskHandle, index: c_uint) -> *mut c_char {
    let map = MapHandle::from_raw(map);
    match get_key_at(map, index as usize) {
        Ok(Some(key)) => into_c_string(&key),
        Ok(None) => ptr::null_mut(),
        Err(err) => {
            tracing::warn!(%map, %err, "key lookup failed");
            ptr::null_mut()
        }
    }
}

/// Get the value for `key`. The key stays owned by the caller.
///
/// Returns a caller-owned string, or null if the key is absent or the handle
/// is not live.
#[no_mangle]
pub extern "C" fn husk_map_value_for(map: HuskHandle, key: *const c_char) -> *mut c_char {
    let map = MapHandle::from_raw(map);
    let key = match unsafe { c_str_arg(key) } {
        Some(key) => key,
        None => return ptr::null_mut(),
    };

    match get_value_for(map, key) {
        Ok(Some(value)) => into_c_string(&value),
        Ok(None) => ptr::null_mut(),
        Err(err) => {
            tracing::warn!(%map, %err, "value lookup failed");
            ptr::null_mut()
        }
    }
}

/// Number of entries in a map; zero if the handle is not live.
#[no_mangle]
pub extern "C" fn husk_map_len(map: HuskHandle) -> c_uint {
    map_len(MapHandle::from_raw(map))
        .map(|len| c_uint::try_from(len).unwrap_or(c_uint::MAX))
        .unwrap_or(0)
}

/// Release a map handle. Returns false if it was not live.
#[no_mangle]
pub extern "C" fn husk_map_release(map: HuskHandle) -> bool {
    release_map(MapHandle::from_raw(map)).is_ok()
}
