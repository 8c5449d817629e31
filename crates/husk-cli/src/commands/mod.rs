//! CLI commands.

pub mod constants;
pub mod dialect;
pub mod env;
pub mod info;
pub mod read;
