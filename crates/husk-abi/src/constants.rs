//! The process-wide constant table.
//!
//! Every value crossing the bridge as a bare integer (error kinds, result
//! tags, dialect selectors) is one of the constants declared here. The table
//! is built once behind a `lazy_static` guard and is read-only afterwards, so
//! it can be shared freely between threads.

use crate::error::AbiError;
use lazy_static::lazy_static;
use libc::{c_char, c_int};
use std::ffi::CStr;

/// Which family a constant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstantGroup {
    /// Error kinds (`HUSK_ERROR_*`).
    Error,
    /// Shell expansion result shapes (`HUSK_SHELL_*`).
    Shell,
    /// Syntax result shapes (`HUSK_SYNTAX_*`).
    Syntax,
    /// Language dialects (`HUSK_LANG_*`).
    Lang,
}

macro_rules! define_constants {
    ($($variant:ident => $name:literal, $field:ident, $group:ident;)*) => {
        /// A named constant shared by both sides of the bridge.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum Constant {
            $($variant,)*
        }

        const COUNT: usize = [$($name),*].len();

        impl Constant {
            /// Every constant, in table order.
            pub const ALL: [Constant; COUNT] = [$(Constant::$variant,)*];

            /// The C-side name, e.g. `HUSK_ERROR_IO`.
            pub fn name(self) -> &'static str {
                match self {
                    $(Constant::$variant => $name,)*
                }
            }

            /// The family this constant belongs to.
            pub fn group(self) -> ConstantGroup {
                match self {
                    $(Constant::$variant => ConstantGroup::$group,)*
                }
            }
        }

        /// C view of the constant table, one field per constant.
        #[repr(C)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct HuskConstants {
            $(pub $field: c_int,)*
        }

        impl HuskConstants {
            fn from_table(table: &ConstantTable) -> Self {
                Self {
                    $($field: table.value(Constant::$variant),)*
                }
            }
        }
    };
}

define_constants! {
    ErrorIo => "HUSK_ERROR_IO", error_io, Error;
    ErrorUnexpectedCommand => "HUSK_ERROR_UNEXPECTED_COMMAND", error_unexpected_command, Error;
    ErrorUnsetParameter => "HUSK_ERROR_UNSET_PARAMETER", error_unset_parameter, Error;
    ErrorExitStatus => "HUSK_ERROR_EXIT_STATUS", error_exit_status, Error;
    ErrorLang => "HUSK_ERROR_LANG", error_lang, Error;
    ErrorParse => "HUSK_ERROR_PARSE", error_parse, Error;
    ErrorQuote => "HUSK_ERROR_QUOTE", error_quote, Error;
    ErrorUnknown => "HUSK_ERROR_UNKNOWN", error_unknown, Error;

    ShellExpandString => "HUSK_SHELL_EXPAND_STRING", shell_expand_string, Shell;
    ShellFieldsStrings => "HUSK_SHELL_FIELDS_STRINGS", shell_fields_strings, Shell;
    SyntaxQuoteString => "HUSK_SYNTAX_QUOTE_STRING", syntax_quote_string, Syntax;
    SyntaxParserFile => "HUSK_SYNTAX_PARSER_FILE", syntax_parser_file, Syntax;

    LangBash => "HUSK_LANG_BASH", lang_bash, Lang;
    LangPosix => "HUSK_LANG_POSIX", lang_posix, Lang;
    LangMksh => "HUSK_LANG_MKSH", lang_mksh, Lang;
    LangBats => "HUSK_LANG_BATS", lang_bats, Lang;
    LangAuto => "HUSK_LANG_AUTO", lang_auto, Lang;
}

impl Constant {
    /// Find a constant by its C-side name.
    pub fn from_name(name: &str) -> Option<Constant> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }
}

/// The immutable table mapping every [`Constant`] to its integer value.
#[derive(Debug)]
pub struct ConstantTable {
    values: [c_int; COUNT],
}

impl ConstantTable {
    /// Assign values sequentially in declaration order.
    fn assign() -> Self {
        let mut values = [0; COUNT];
        for (index, value) in values.iter_mut().enumerate() {
            *value = index as c_int;
        }
        Self { values }
    }

    /// The value of a constant.
    pub fn value(&self, constant: Constant) -> c_int {
        self.values[constant as usize]
    }

    /// The value of a constant given its C-side name.
    pub fn lookup(&self, name: &str) -> Result<c_int, AbiError> {
        Constant::from_name(name)
            .map(|constant| self.value(constant))
            .ok_or_else(|| AbiError::UnknownConstant(name.to_string()))
    }

    /// Reverse lookup restricted to one group.
    ///
    /// Values are only unique across the whole table by accident of
    /// assignment, so callers always say which family they expect.
    pub fn constant_for(&self, group: ConstantGroup, value: c_int) -> Option<Constant> {
        Constant::ALL
            .iter()
            .copied()
            .find(|c| c.group() == group && self.value(*c) == value)
    }

    /// Iterate over `(constant, value)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Constant, c_int)> + '_ {
        Constant::ALL.iter().map(move |c| (*c, self.value(*c)))
    }
}

lazy_static! {
    static ref TABLE: ConstantTable = ConstantTable::assign();
    static ref C_TABLE: HuskConstants = HuskConstants::from_table(&TABLE);
}

/// The process-wide constant table.
pub fn constants() -> &'static ConstantTable {
    &TABLE
}

/// Get a pointer to the C view of the constant table.
///
/// The table lives for the rest of the process and must not be freed.
#[no_mangle]
pub extern "C" fn husk_constants() -> *const HuskConstants {
    &*C_TABLE as *const HuskConstants
}

/// Look a constant up by its C-side name, writing the value to `out`.
/// Returns false (and leaves `out` untouched) if the name is unknown.
#[no_mangle]
pub extern "C" fn husk_constant_value(name: *const c_char, out: *mut c_int) -> bool {
    if name.is_null() || out.is_null() {
        return false;
    }

    let name = match unsafe { CStr::from_ptr(name) }.to_str() {
        Ok(s) => s,
        Err(_) => return false,
    };

    match constants().lookup(name) {
        Ok(value) => {
            unsafe { *out = value };
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_values_are_distinct() {
        let table = constants();
        let mut seen: Vec<c_int> = table.iter().map(|(_, v)| v).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), Constant::ALL.len());
    }

    #[test]
    fn test_table_is_stable_across_reads() {
        let first: Vec<_> = constants().iter().collect();
        let second: Vec<_> = constants().iter().collect();
        assert_eq!(first, second);
        assert!(std::ptr::eq(constants(), constants()));
    }

    #[test]
    fn test_group_sizes() {
        let count = |group| Constant::ALL.iter().filter(|c| c.group() == group).count();
        assert_eq!(count(ConstantGroup::Error), 8);
        assert_eq!(count(ConstantGroup::Shell), 2);
        assert_eq!(count(ConstantGroup::Syntax), 2);
        assert_eq!(count(ConstantGroup::Lang), 5);
    }

    #[test]
    fn test_lookup_by_name() {
        let table = constants();
        assert_eq!(
            table.lookup("HUSK_LANG_MKSH").unwrap(),
            table.value(Constant::LangMksh)
        );
        assert!(matches!(
            table.lookup("HUSK_LANG_ZSH"),
            Err(AbiError::UnknownConstant(_))
        ));
    }

    #[test]
    fn test_reverse_lookup_respects_group() {
        let table = constants();
        let parse = table.value(Constant::ErrorParse);
        assert_eq!(
            table.constant_for(ConstantGroup::Error, parse),
            Some(Constant::ErrorParse)
        );
        assert_eq!(table.constant_for(ConstantGroup::Lang, parse), None);
    }

    #[test]
    fn test_c_table_matches_rust_table() {
        let c_table = unsafe { &*husk_constants() };
        let table = constants();
        assert_eq!(c_table.error_io, table.value(Constant::ErrorIo));
        assert_eq!(c_table.error_unknown, table.value(Constant::ErrorUnknown));
        assert_eq!(
            c_table.syntax_parser_file,
            table.value(Constant::SyntaxParserFile)
        );
        assert_eq!(c_table.lang_auto, table.value(Constant::LangAuto));
    }

    #[test]
    fn test_c_lookup() {
        let name = CString::new("HUSK_ERROR_QUOTE").unwrap();
        let mut out: c_int = -1;
        assert!(husk_constant_value(name.as_ptr(), &mut out));
        assert_eq!(out, constants().value(Constant::ErrorQuote));

        let bogus = CString::new("HUSK_NOPE").unwrap();
        let mut untouched: c_int = -1;
        assert!(!husk_constant_value(bogus.as_ptr(), &mut untouched));
        assert_eq!(untouched, -1);
        assert!(!husk_constant_value(std::ptr::null(), &mut untouched));
    }
}
