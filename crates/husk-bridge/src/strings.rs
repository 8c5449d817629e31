//! Caller-owned C strings.
//!
//! Strings returned across the bridge are `malloc`ed copies, so the receiver
//! may free them with either `free()` or [`husk_string_free`]. They never
//! point into bridge-owned storage.

use libc::c_char;
use std::ffi::CStr;
use std::ptr;

/// Copy `s` into a fresh NUL-terminated allocation. Returns null if the
/// allocation fails or `s` contains a NUL byte.
pub(crate) fn into_c_string(s: &str) -> *mut c_char {
    let bytes = s.as_bytes();
    if bytes.contains(&0) {
        return ptr::null_mut();
    }

    unsafe {
        let data = libc::malloc(bytes.len() + 1) as *mut u8;
        if data.is_null() {
            return ptr::null_mut();
        }
        ptr::copy_nonoverlapping(bytes.as_ptr(), data, bytes.len());
        *data.add(bytes.len()) = 0; // null terminator
        data as *mut c_char
    }
}

/// Borrow the bytes of a C string argument for the duration of a call.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for `'a`.
pub(crate) unsafe fn c_str_arg<'a>(ptr: *const c_char) -> Option<&'a [u8]> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) }.to_bytes())
    }
}

/// Take ownership of a string returned by the bridge, freeing the C copy.
pub(crate) fn take_c_string(ptr: *mut c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let owned = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
    husk_string_free(ptr);
    Some(owned)
}

/// Free a string returned by the bridge. Null is ignored.
#[no_mangle]
pub extern "C" fn husk_string_free(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe { libc::free(s as *mut libc::c_void) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_is_independent() {
        let source = String::from("/usr/bin");
        let copy = into_c_string(&source);
        drop(source);
        assert_eq!(take_c_string(copy).unwrap(), "/usr/bin");
    }

    #[test]
    fn test_empty_string() {
        let copy = into_c_string("");
        assert!(!copy.is_null());
        assert_eq!(take_c_string(copy).unwrap(), "");
    }

    #[test]
    fn test_interior_nul_is_refused() {
        assert!(into_c_string("a\0b").is_null());
    }

    #[test]
    fn test_null_handling() {
        husk_string_free(ptr::null_mut());
        assert!(take_c_string(ptr::null_mut()).is_none());
        assert!(unsafe { c_str_arg(ptr::null()) }.is_none());
    }
}
