//! Errors raised while interpreting shared constants.

use crate::error_kind::ErrorKind;
use libc::c_int;
use thiserror::Error;

/// An error decoding a value that should belong to the shared table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AbiError {
    #[error("unknown constant `{0}`")]
    UnknownConstant(String),

    #[error("unknown language variant `{0}`")]
    UnknownLangName(String),

    #[error("invalid language variant code {0}")]
    UnknownLangCode(c_int),

    #[error("`auto` must be resolved before it can be used as a concrete dialect")]
    UnresolvedLang,
}

impl AbiError {
    /// The taxonomy entry this error is reported as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AbiError::UnknownConstant(_) => ErrorKind::Unknown,
            AbiError::UnknownLangName(_)
            | AbiError::UnknownLangCode(_)
            | AbiError::UnresolvedLang => ErrorKind::Lang,
        }
    }
}
