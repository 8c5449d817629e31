//! Error objects.
//!
//! Every failure handed across the bridge is an error handle. The receiver
//! classifies it with [`husk_error_kind`], may ask for its message, and must
//! release it exactly once. Stale or unknown handles classify as `unknown`.

use crate::error::BridgeError;
use crate::handle::{ErrorHandle, HandleKind, HuskHandle, NULL_HANDLE};
use crate::registry::{self, Entry};
use crate::strings::{c_str_arg, into_c_string};
use husk_abi::ErrorKind;
use libc::{c_char, c_int};
use std::ptr;

/// Register an error. Error handles are exempt from the handle limit, so
/// this cannot fail.
pub fn register_error(err: BridgeError) -> ErrorHandle {
    let kind = err.kind();
    let handle = registry::with_registry(|reg| reg.insert(Entry::Error(err)))
        .unwrap_or(NULL_HANDLE);
    tracing::debug!(handle, %kind, "registered error");
    ErrorHandle::from_raw(handle)
}

fn with_error<T>(err: ErrorHandle, f: impl FnOnce(&BridgeError) -> T) -> Option<T> {
    registry::with_registry(|reg| match reg.get(err.raw(), HandleKind::Error) {
        Ok(Entry::Error(error)) => Some(f(error)),
        _ => None,
    })
}

/// Classify an error handle.
pub fn error_kind(err: ErrorHandle) -> ErrorKind {
    if err.is_null() {
        return ErrorKind::Unknown;
    }
    with_error(err, BridgeError::kind).unwrap_or_else(|| {
        tracing::warn!(%err, "classifying an error handle that is not live");
        ErrorKind::Unknown
    })
}

pub fn error_message(err: ErrorHandle) -> Option<String> {
    with_error(err, |error| error.to_string())
}

pub fn is_end_of_stream(err: ErrorHandle) -> bool {
    with_error(err, BridgeError::is_end_of_stream).unwrap_or(false)
}

pub fn release_error(err: ErrorHandle) -> Result<(), BridgeError> {
    registry::release(err.raw(), HandleKind::Error)
}

/// Get the error kind code for an error handle.
#[no_mangle]
pub extern "C" fn husk_error_kind(err: HuskHandle) -> c_int {
    error_kind(ErrorHandle::from_raw(err)).code()
}

/// Get the error message. The returned string is owned by the caller and
/// must be freed with [`husk_string_free`](crate::husk_string_free). Null if
/// the handle is not live; NUL bytes in a live message come out as `\0`.
#[no_mangle]
pub extern "C" fn husk_error_message(err: HuskHandle) -> *mut c_char {
    match error_message(ErrorHandle::from_raw(err)) {
        Some(message) => into_c_string(&message.replace('\0', "\\0")),
        None => ptr::null_mut(),
    }
}

/// Check whether an error marks the end of a stream rather than a failure.
#[no_mangle]
pub extern "C" fn husk_error_is_end_of_stream(err: HuskHandle) -> bool {
    is_end_of_stream(ErrorHandle::from_raw(err))
}

/// Register an error raised on the calling side, so it can travel through
/// the same handle machinery. `kind` is an error code from the constant
/// table; anything else is recorded as `unknown`.
#[no_mangle]
pub extern "C" fn husk_error_new(kind: c_int, message: *const c_char) -> HuskHandle {
    let message = unsafe { c_str_arg(message) }
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default();
    register_error(BridgeError::Foreign {
        kind: ErrorKind::from_code(kind),
        message,
    })
    .raw()
}

/// Release an error handle. Returns false if it was not live.
#[no_mangle]
pub extern "C" fn husk_error_release(err: HuskHandle) -> bool {
    release_error(ErrorHandle::from_raw(err)).is_ok()
}
