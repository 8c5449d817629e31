//! The flat error taxonomy.

use crate::constants::{constants, Constant, ConstantGroup};
use libc::c_int;
use std::fmt;

/// Every failure that crosses the bridge is classified as exactly one of
/// these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Reading from a byte source failed or reached its end.
    Io,
    /// A command substitution was found where none is allowed.
    UnexpectedCommand,
    /// A parameter was used without being set.
    UnsetParameter,
    /// A command exited with a non-zero status.
    ExitStatus,
    /// The requested language dialect could not be resolved.
    Lang,
    /// The input is not valid shell syntax.
    Parse,
    /// A string cannot be quoted in the requested dialect.
    Quote,
    /// Anything that does not fit the kinds above.
    Unknown,
}

impl ErrorKind {
    /// All kinds, in table order.
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::Io,
        ErrorKind::UnexpectedCommand,
        ErrorKind::UnsetParameter,
        ErrorKind::ExitStatus,
        ErrorKind::Lang,
        ErrorKind::Parse,
        ErrorKind::Quote,
        ErrorKind::Unknown,
    ];

    /// The table constant backing this kind.
    pub fn constant(self) -> Constant {
        match self {
            ErrorKind::Io => Constant::ErrorIo,
            ErrorKind::UnexpectedCommand => Constant::ErrorUnexpectedCommand,
            ErrorKind::UnsetParameter => Constant::ErrorUnsetParameter,
            ErrorKind::ExitStatus => Constant::ErrorExitStatus,
            ErrorKind::Lang => Constant::ErrorLang,
            ErrorKind::Parse => Constant::ErrorParse,
            ErrorKind::Quote => Constant::ErrorQuote,
            ErrorKind::Unknown => Constant::ErrorUnknown,
        }
    }

    /// The numeric code, read from the shared table.
    pub fn code(self) -> c_int {
        constants().value(self.constant())
    }

    /// Classify a numeric code. Codes that are not error kinds map to
    /// [`ErrorKind::Unknown`].
    pub fn from_code(code: c_int) -> ErrorKind {
        constants()
            .constant_for(ConstantGroup::Error, code)
            .and_then(ErrorKind::from_constant)
            .unwrap_or(ErrorKind::Unknown)
    }

    fn from_constant(constant: Constant) -> Option<ErrorKind> {
        Self::ALL.iter().copied().find(|k| k.constant() == constant)
    }

    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Io => "io",
            ErrorKind::UnexpectedCommand => "unexpected-command",
            ErrorKind::UnsetParameter => "unset-parameter",
            ErrorKind::ExitStatus => "exit-status",
            ErrorKind::Lang => "lang",
            ErrorKind::Parse => "parse",
            ErrorKind::Quote => "quote",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for kind in ErrorKind::ALL {
            assert_eq!(ErrorKind::from_code(kind.code()), kind);
        }
    }

    #[test]
    fn test_foreign_codes_are_unknown() {
        // Table values are distinct, so a dialect code is never an error kind.
        let lang_bash = constants().value(Constant::LangBash);
        assert_eq!(ErrorKind::from_code(lang_bash), ErrorKind::Unknown);

        assert_eq!(ErrorKind::from_code(-7), ErrorKind::Unknown);
        assert_eq!(ErrorKind::from_code(c_int::MAX), ErrorKind::Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::UnsetParameter.to_string(), "unset-parameter");
        assert_eq!(ErrorKind::Io.to_string(), "io");
    }
}
