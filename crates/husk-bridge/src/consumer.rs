//! The consuming side of the bridge.
//!
//! These adapters only go through the C entry points, the same way foreign
//! code does, and release every string and error handle they receive.

use crate::error_handle::{
    husk_error_is_end_of_stream, husk_error_kind, husk_error_message, husk_error_release,
};
use crate::handle::{HuskHandle, ListHandle, MapHandle, StreamHandle};
use crate::list::husk_list_item_at;
use crate::map::{husk_map_key_at, husk_map_value_for, StringMap};
use crate::stream::husk_read_byte;
use crate::strings::take_c_string;
use husk_abi::ErrorKind;
use libc::c_uint;
use std::io::{self, Read};

/// What ended a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEnd {
    pub kind: ErrorKind,
    pub message: String,
    pub end_of_stream: bool,
}

/// Resolve an error handle into an owned description and release it.
pub fn resolve_error(err: HuskHandle) -> StreamEnd {
    let end = StreamEnd {
        kind: ErrorKind::from_code(husk_error_kind(err)),
        message: take_c_string(husk_error_message(err)).unwrap_or_default(),
        end_of_stream: husk_error_is_end_of_stream(err),
    };
    husk_error_release(err);
    end
}

/// [`Read`] over a bridged stream.
///
/// End of stream reads as `Ok(0)`; any other failure becomes an
/// [`io::Error`] carrying the error kind and message. The stream handle is
/// borrowed, not released.
pub struct BridgeReader {
    stream: StreamHandle,
    units: u64,
    end: Option<StreamEnd>,
}

impl BridgeReader {
    pub fn new(stream: StreamHandle) -> Self {
        Self {
            stream,
            units: 0,
            end: None,
        }
    }

    /// Units consumed from the underlying source so far.
    pub fn units(&self) -> u64 {
        self.units
    }

    /// How the stream ended, once it has.
    pub fn end(&self) -> Option<&StreamEnd> {
        self.end.as_ref()
    }

    fn end_to_result(end: &StreamEnd) -> io::Result<usize> {
        if end.end_of_stream {
            Ok(0)
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{}: {}", end.kind, end.message),
            ))
        }
    }
}

impl Read for BridgeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(end) = &self.end {
            return Self::end_to_result(end);
        }

        let mut filled = 0;
        while filled < buf.len() {
            let read = husk_read_byte(self.stream.raw());
            self.units += u64::from(read.bytes_read);
            if !read.is_ok {
                let end = resolve_error(read.err_obj);
                tracing::debug!(stream = %self.stream, kind = %end.kind, "stream ended");
                self.end = Some(end);
                break;
            }
            buf[filled] = read.byte;
            filled += 1;
        }

        match (&self.end, filled) {
            // Report the bytes we have; the failure surfaces on the next call.
            (_, n) if n > 0 => Ok(n),
            (Some(end), _) => Self::end_to_result(end),
            (None, _) => Ok(0),
        }
    }
}

/// Rebuild a map by walking its keys with `husk_map_key_at` until null.
pub fn collect_map(map: MapHandle) -> StringMap {
    let mut result = StringMap::new();
    let mut index: c_uint = 0;

    loop {
        let key_ptr = husk_map_key_at(map.raw(), index);
        if key_ptr.is_null() {
            break;
        }

        let value = take_c_string(husk_map_value_for(map.raw(), key_ptr));
        let key = take_c_string(key_ptr);
        if let (Some(key), Some(value)) = (key, value) {
            result.insert(key, value);
        }
        index += 1;
    }

    result
}

/// Rebuild a list by walking its items until null.
pub fn collect_list(list: ListHandle) -> Vec<String> {
    let mut items = Vec::new();
    let mut index: c_uint = 0;

    loop {
        let item = husk_list_item_at(list.raw(), index);
        if item.is_null() {
            break;
        }
        if let Some(item) = take_c_string(item) {
            items.push(item);
        }
        index += 1;
    }

    items
}
