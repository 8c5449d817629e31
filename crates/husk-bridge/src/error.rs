//! Bridge error definitions.

use crate::handle::{HandleKind, HuskHandle};
use husk_abi::ErrorKind;
use thiserror::Error;

/// A failure inside the bridge or in a source it reads from.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The byte source has no more input.
    #[error("end of stream")]
    EndOfStream,

    /// A read was attempted after the stream already failed.
    #[error("stream already finished")]
    StreamFinished,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot decode {bytes:02x?}: {reason}")]
    Decode { bytes: Vec<u8>, reason: &'static str },

    #[error("{expected} handle {handle} is not live")]
    InvalidHandle {
        handle: HuskHandle,
        expected: HandleKind,
    },

    #[error("handle limit of {limit} reached")]
    HandleLimit { limit: usize },

    #[error("{what} contains an interior NUL byte")]
    InteriorNul { what: String },

    #[error("byte source panicked: {0}")]
    Panic(String),

    /// An error created by the other side of the bridge.
    #[error("{message}")]
    Foreign { kind: ErrorKind, message: String },
}

impl BridgeError {
    /// The taxonomy entry this error is reported as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::EndOfStream
            | BridgeError::StreamFinished
            | BridgeError::Io(_)
            | BridgeError::Decode { .. } => ErrorKind::Io,
            BridgeError::Foreign { kind, .. } => *kind,
            BridgeError::InvalidHandle { .. }
            | BridgeError::HandleLimit { .. }
            | BridgeError::InteriorNul { .. }
            | BridgeError::Panic(_) => ErrorKind::Unknown,
        }
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, BridgeError::EndOfStream)
    }

    pub(crate) fn invalid(handle: HuskHandle, expected: HandleKind) -> Self {
        BridgeError::InvalidHandle { handle, expected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_source_failures_are_io() {
        assert_eq!(BridgeError::EndOfStream.kind(), ErrorKind::Io);
        assert_eq!(BridgeError::StreamFinished.kind(), ErrorKind::Io);
        let err: BridgeError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe").into();
        assert_eq!(err.kind(), ErrorKind::Io);
        let decode = BridgeError::Decode {
            bytes: vec![0xc3],
            reason: "truncated sequence",
        };
        assert_eq!(decode.kind(), ErrorKind::Io);
        assert_eq!(decode.to_string(), "cannot decode [c3]: truncated sequence");
    }

    #[test]
    fn test_protocol_violations_are_unknown() {
        let err = BridgeError::invalid(42, HandleKind::Map);
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.to_string(), "map handle 42 is not live");
        assert_eq!(BridgeError::Panic("boom".into()).kind(), ErrorKind::Unknown);
    }

    #[test]
    fn test_foreign_kind_is_kept() {
        let err = BridgeError::Foreign {
            kind: ErrorKind::UnsetParameter,
            message: "HOME: unbound variable".into(),
        };
        assert_eq!(err.kind(), ErrorKind::UnsetParameter);
        assert!(!err.is_end_of_stream());
        assert!(BridgeError::EndOfStream.is_end_of_stream());
    }
}
