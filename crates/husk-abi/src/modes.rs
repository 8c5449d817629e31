//! Result-shape tags.
//!
//! Orchestration calls hand back a `(handle, tag)` pair. The tag says either
//! what shape of value the handle holds, or which error kind it is.

use crate::constants::{constants, Constant, ConstantGroup};
use crate::error_kind::ErrorKind;
use libc::c_int;

/// The shape of a successful result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResultMode {
    /// Shell expansion produced a single string.
    ExpandString,
    /// Field splitting produced a list of strings.
    FieldsStrings,
    /// Quoting produced a string.
    QuoteString,
    /// Parsing produced a file.
    ParserFile,
}

impl ResultMode {
    pub const ALL: [ResultMode; 4] = [
        ResultMode::ExpandString,
        ResultMode::FieldsStrings,
        ResultMode::QuoteString,
        ResultMode::ParserFile,
    ];

    pub fn constant(self) -> Constant {
        match self {
            ResultMode::ExpandString => Constant::ShellExpandString,
            ResultMode::FieldsStrings => Constant::ShellFieldsStrings,
            ResultMode::QuoteString => Constant::SyntaxQuoteString,
            ResultMode::ParserFile => Constant::SyntaxParserFile,
        }
    }

    pub fn code(self) -> c_int {
        constants().value(self.constant())
    }

    pub fn from_code(code: c_int) -> Option<ResultMode> {
        let table = constants();
        let constant = table
            .constant_for(ConstantGroup::Shell, code)
            .or_else(|| table.constant_for(ConstantGroup::Syntax, code))?;
        Self::ALL.iter().copied().find(|m| m.constant() == constant)
    }
}

/// A decoded return tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTag {
    Success(ResultMode),
    Failure(ErrorKind),
}

impl ReturnTag {
    /// Decode a tag. Anything that is not a success tag is an error kind,
    /// with unrecognized codes landing on [`ErrorKind::Unknown`].
    pub fn decode(code: c_int) -> ReturnTag {
        match ResultMode::from_code(code) {
            Some(mode) => ReturnTag::Success(mode),
            None => ReturnTag::Failure(ErrorKind::from_code(code)),
        }
    }

    pub fn into_result(self) -> Result<ResultMode, ErrorKind> {
        match self {
            ReturnTag::Success(mode) => Ok(mode),
            ReturnTag::Failure(kind) => Err(kind),
        }
    }
}
