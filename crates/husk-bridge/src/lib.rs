//! # Husk Bridge
//!
//! The C ABI boundary between the husk orchestration side and the parsing
//! side. It exposes three things over opaque handles:
//!
//! - byte streams, read one logical byte per call ([`husk_read_byte`]);
//! - insertion-ordered string maps ([`husk_map_key_at`],
//!   [`husk_map_value_for`]) and string lists;
//! - error objects classified by the shared taxonomy in [`husk_abi`].
//!
//! Handles are registry keys, not addresses. Every handle kind has a release
//! function, and every string returned across the boundary is a fresh
//! allocation the caller frees with [`husk_string_free`].
//!
//! ## Example
//!
//! ```
//! use husk_bridge::{register_pairs, get_key_at, get_value_for, release_map};
//!
//! let map = register_pairs([("PATH", "/usr/bin"), ("HOME", "/home/u")]).unwrap();
//! assert_eq!(get_key_at(map, 1).unwrap().as_deref(), Some("HOME"));
//! assert_eq!(get_value_for(map, b"SHELL").unwrap(), None);
//! release_map(map).unwrap();
//! ```

#![allow(clippy::not_unsafe_ptr_arg_deref)]

mod config;
mod consumer;
mod env;
mod error;
mod error_handle;
mod handle;
mod list;
mod map;
mod registry;
mod source;
mod stream;
mod strings;

pub use config::{configure, BridgeConfig, BridgeConfigBuilder, DEFAULT_HANDLE_LIMIT};
pub use consumer::{collect_list, collect_map, resolve_error, BridgeReader, StreamEnd};
pub use env::{env_map, register_env};
pub use error::BridgeError;
pub use error_handle::*;
pub use handle::{
    ErrorHandle, HandleKind, HuskHandle, ListHandle, MapHandle, StreamHandle, NULL_HANDLE,
};
pub use list::*;
pub use map::*;
pub use registry::live_handles;
pub use source::{ByteRead, ByteSource, Latin1Source, ReaderSource};
pub use stream::*;
pub use strings::husk_string_free;
