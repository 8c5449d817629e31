//! String lists, as produced by field splitting.

use crate::error::BridgeError;
use crate::handle::{HandleKind, HuskHandle, ListHandle};
use crate::registry::{self, Entry};
use crate::strings::into_c_string;
use libc::{c_char, c_uint};
use std::ptr;
use std::sync::Arc;

pub fn register_list<I, S>(items: I) -> Result<ListHandle, BridgeError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let items: Vec<String> = items.into_iter().map(Into::into).collect();
    if let Some(pos) = items.iter().position(|item| item.contains('\0')) {
        return Err(BridgeError::InteriorNul {
            what: format!("list item {}", pos),
        });
    }
    registry::insert(Entry::List(Arc::new(items))).map(ListHandle::from_raw)
}

fn lookup(list: ListHandle) -> Result<Arc<Vec<String>>, BridgeError> {
    registry::with_registry(|reg| match reg.get(list.raw(), HandleKind::List)? {
        Entry::List(items) => Ok(Arc::clone(items)),
        _ => Err(BridgeError::invalid(list.raw(), HandleKind::List)),
    })
}

pub fn get_item_at(list: ListHandle, index: usize) -> Result<Option<String>, BridgeError> {
    Ok(lookup(list)?.get(index).cloned())
}

pub fn list_len(list: ListHandle) -> Result<usize, BridgeError> {
    Ok(lookup(list)?.len())
}

pub fn release_list(list: ListHandle) -> Result<(), BridgeError> {
    registry::release(list.raw(), HandleKind::List)
}

/// Get a caller-owned copy of the item at `index`, or null past the end.
#[no_mangle]
pub extern "C" fn husk_list_item_at(list: HuskHandle, index: c_uint) -> *mut c_char {
    match get_item_at(ListHandle::from_raw(list), index as usize) {
        Ok(Some(item)) => into_c_string(&item),
        Ok(None) => ptr::null_mut(),
        Err(err) => {
            tracing::warn!(list, %err, "list lookup failed");
            ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "C" fn husk_list_len(list: HuskHandle) -> c_uint {
    list_len(ListHandle::from_raw(list))
        .map(|len| c_uint::try_from(len).unwrap_or(c_uint::MAX))
        .unwrap_or(0)
}

#[no_mangle]
pub extern "C" fn husk_list_release(list: HuskHandle) -> bool {
    release_list(ListHandle::from_raw(list)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings::take_c_string;

    #[test]
    fn test_items_by_index() {
        let list = register_list(["echo", "hello world", ""]).unwrap();
        assert_eq!(husk_list_len(list.raw()), 3);
        assert_eq!(take_c_string(husk_list_item_at(list.raw(), 1)).unwrap(), "hello world");
        assert_eq!(take_c_string(husk_list_item_at(list.raw(), 2)).unwrap(), "");
        assert!(husk_list_item_at(list.raw(), 3).is_null());
        assert!(husk_list_release(list.raw()));
        assert!(husk_list_item_at(list.raw(), 0).is_null());
    }

    #[test]
    fn test_nul_item_rejected() {
        assert!(matches!(
            register_list(vec!["ok".to_string(), "bad\0".to_string()]),
            Err(BridgeError::InteriorNul { .. })
        ));
    }
}
