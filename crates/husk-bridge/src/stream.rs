//! The stream reader bridge.
//!
//! The consuming side pulls one logical byte per call with
//! [`husk_read_byte`]. Success and failure share one record shape; end of
//! input is a failure whose error handle reports `io` as its kind and answers
//! true to [`husk_error_is_end_of_stream`](crate::husk_error_is_end_of_stream).
//!
//! Streams are single-pass. Once a read fails, every later read fails and
//! consumes nothing: a stream that ran dry keeps reporting end of stream,
//! any other failure is followed by [`BridgeError::StreamFinished`].

use crate::config;
use crate::error::BridgeError;
use crate::error_handle::register_error;
use crate::handle::{HandleKind, HuskHandle, StreamHandle, NULL_HANDLE};
use crate::registry::{self, Entry};
use crate::source::{ByteRead, ByteSource, ReaderSource};
use std::any::Any;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

/// The by-value record returned from [`husk_read_byte`].
///
/// C layout: `{ bool isOk; uint8_t byte; uint8_t bytesRead; uintptr_t errObj; }`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuskRustRead {
    pub is_ok: bool,
    /// Meaningful only when `is_ok`.
    pub byte: u8,
    /// Underlying units consumed, also on failure.
    pub bytes_read: u8,
    /// Non-null exactly when `!is_ok`. Owned by the caller.
    pub err_obj: HuskHandle,
}

/// How a stream stopped producing bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finish {
    EndOfStream,
    Failed,
}

/// A registered source plus its bookkeeping.
pub(crate) struct StreamState {
    source: Box<dyn ByteSource + Send>,
    finished: Option<Finish>,
    consumed: u64,
}

/// Register a byte source, returning its handle.
pub fn register_source<S>(source: S) -> Result<StreamHandle, BridgeError>
where
    S: ByteSource + Send + 'static,
{
    let state = StreamState {
        source: Box::new(source),
        finished: None,
        consumed: 0,
    };
    registry::insert(Entry::Stream(Arc::new(Mutex::new(state)))).map(StreamHandle::from_raw)
}

/// Register any reader as a pass-through byte stream.
pub fn register_reader<R>(reader: R) -> Result<StreamHandle, BridgeError>
where
    R: Read + Send + 'static,
{
    register_source(ReaderSource::new(reader))
}

fn lookup(stream: StreamHandle) -> Result<Arc<Mutex<StreamState>>, BridgeError> {
    registry::with_registry(|reg| match reg.get(stream.raw(), HandleKind::Stream)? {
        Entry::Stream(state) => Ok(Arc::clone(state)),
        _ => Err(BridgeError::invalid(stream.raw(), HandleKind::Stream)),
    })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Pull the next logical byte from a stream.
pub fn read_one_byte(stream: StreamHandle) -> ByteRead {
    let state = match lookup(stream) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!(%stream, "read from a stream that is not live");
            return ByteRead::failed(0, err);
        }
    };

    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    match state.finished {
        Some(Finish::EndOfStream) => return ByteRead::failed(0, BridgeError::EndOfStream),
        Some(Finish::Failed) => return ByteRead::failed(0, BridgeError::StreamFinished),
        None => {}
    }

    let read = panic::catch_unwind(AssertUnwindSafe(|| state.source.read_byte()))
        .unwrap_or_else(|payload| ByteRead::failed(0, BridgeError::Panic(panic_message(payload))));

    state.consumed += read.units as u64;
    if let Err(err) = &read.result {
        state.finished = Some(if err.is_end_of_stream() {
            Finish::EndOfStream
        } else {
            Finish::Failed
        });
    }

    if config::trace_reads() {
        match &read.result {
            Ok(byte) => tracing::trace!(%stream, byte, units = read.units, "read byte"),
            Err(err) => tracing::trace!(%stream, units = read.units, %err, "read failed"),
        }
    }

    read
}

/// Total units consumed from a stream so far.
pub fn stream_position(stream: StreamHandle) -> Result<u64, BridgeError> {
    let state = lookup(stream)?;
    let state = state.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(state.consumed)
}

/// Release a stream, dropping its source.
pub fn release_stream(stream: StreamHandle) -> Result<(), BridgeError> {
    registry::release(stream.raw(), HandleKind::Stream)
}

impl HuskRustRead {
    fn from_read(read: ByteRead) -> Self {
        let bytes_read = u8::try_from(read.units).unwrap_or(u8::MAX);
        match read.result {
            Ok(byte) => Self {
                is_ok: true,
                byte,
                bytes_read,
                err_obj: NULL_HANDLE,
            },
            Err(err) => Self {
                is_ok: false,
                byte: 0,
                bytes_read,
                err_obj: register_error(err).raw(),
            },
        }
    }
}

/// Read one byte from `stream`.
///
/// On failure `err_obj` is a fresh error handle that the caller must pass to
/// [`husk_error_release`](crate::husk_error_release) exactly once.
#[no_mangle]
pub extern "C" fn husk_read_byte(stream: HuskHandle) -> HuskRustRead {
    HuskRustRead::from_read(read_one_byte(StreamHandle::from_raw(stream)))
}

/// Release a stream handle. Returns false if it was not live.
#[no_mangle]
pub extern "C" fn husk_stream_release(stream: HuskHandle) -> bool {
    release_stream(StreamHandle::from_raw(stream)).is_ok()
}
