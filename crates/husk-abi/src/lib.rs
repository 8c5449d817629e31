//! # Husk ABI
//!
//! The shared vocabulary of the husk bridge: the process-wide constant table,
//! the flat error taxonomy, the result-shape modes and the shell dialects.
//!
//! Both sides of the bridge read these values by symbolic name. The numbers
//! behind the names are assigned once, the first time the table is touched,
//! and never change afterwards.
//!
//! ## Example
//!
//! ```
//! use husk_abi::{constants, Constant, ErrorKind};
//!
//! let io = constants().value(Constant::ErrorIo);
//! assert_eq!(ErrorKind::from_code(io), ErrorKind::Io);
//! assert_eq!(ErrorKind::from_code(-1), ErrorKind::Unknown);
//! ```

#![allow(clippy::not_unsafe_ptr_arg_deref)]

mod constants;
mod error;
mod error_kind;
mod lang;
mod modes;

pub use constants::{
    constants, husk_constant_value, husk_constants, Constant, ConstantGroup, ConstantTable,
    HuskConstants,
};
pub use error::AbiError;
pub use error_kind::ErrorKind;
pub use lang::{LangMode, LangVariant};
pub use modes::{ResultMode, ReturnTag};
