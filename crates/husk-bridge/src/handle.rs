//! Opaque handles.
//!
//! A handle is a registry key, never an address. The consuming side may copy
//! it around freely, but the object behind it only lives until the matching
//! `*_release` call.

use std::fmt;

/// The C representation of every handle (`uintptr_t`). Zero is never a live
/// handle.
pub type HuskHandle = usize;

/// The null handle.
pub const NULL_HANDLE: HuskHandle = 0;

/// What a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Stream,
    Map,
    List,
    Error,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandleKind::Stream => "stream",
            HandleKind::Map => "map",
            HandleKind::List => "list",
            HandleKind::Error => "error",
        })
    }
}

macro_rules! typed_handle {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        pub struct $name(HuskHandle);

        impl $name {
            pub const KIND: HandleKind = HandleKind::$kind;

            /// Wrap a raw handle received over the C ABI.
            pub fn from_raw(raw: HuskHandle) -> Self {
                Self(raw)
            }

            /// The raw value to hand across the C ABI.
            pub fn raw(self) -> HuskHandle {
                self.0
            }

            pub fn is_null(self) -> bool {
                self.0 == NULL_HANDLE
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", Self::KIND, self.0)
            }
        }
    };
}

typed_handle!(
    /// A readable byte source.
    StreamHandle => Stream
);
typed_handle!(
    /// An insertion-ordered string map.
    MapHandle => Map
);
typed_handle!(
    /// An indexed list of strings.
    ListHandle => List
);
typed_handle!(
    /// A failure surfaced across the bridge.
    ErrorHandle => Error
);
