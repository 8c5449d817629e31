//! Shell language dialects.
//!
//! A dialect request is a [`LangMode`]: either a concrete [`LangVariant`] or
//! `Auto`, which defers the choice until a file name or shebang is known.
//! `Auto` is resolved once, up front, and dialect-specific code only ever
//! sees a [`LangVariant`].

use crate::constants::{constants, Constant, ConstantGroup};
use crate::error::AbiError;
use libc::c_int;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A concrete shell language dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LangVariant {
    /// GNU Bash.
    Bash,
    /// POSIX shell.
    Posix,
    /// MirBSD Korn shell.
    Mksh,
    /// Bash Automated Testing System, a small extension of Bash.
    Bats,
}

impl LangVariant {
    pub const ALL: [LangVariant; 4] = [
        LangVariant::Bash,
        LangVariant::Posix,
        LangVariant::Mksh,
        LangVariant::Bats,
    ];

    pub fn constant(self) -> Constant {
        match self {
            LangVariant::Bash => Constant::LangBash,
            LangVariant::Posix => Constant::LangPosix,
            LangVariant::Mksh => Constant::LangMksh,
            LangVariant::Bats => Constant::LangBats,
        }
    }

    pub fn code(self) -> c_int {
        constants().value(self.constant())
    }

    pub fn name(self) -> &'static str {
        match self {
            LangVariant::Bash => "bash",
            LangVariant::Posix => "posix",
            LangVariant::Mksh => "mksh",
            LangVariant::Bats => "bats",
        }
    }

    /// Guess a dialect from a file path and the first bytes of its contents.
    ///
    /// The extension wins when it is specific (`.bash`, `.mksh`, `.bats`);
    /// otherwise the shebang line decides.
    pub fn detect(path: Option<&Path>, head: &[u8]) -> Option<LangVariant> {
        let by_extension = path
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext {
                "bash" => Some(LangVariant::Bash),
                "mksh" => Some(LangVariant::Mksh),
                "bats" => Some(LangVariant::Bats),
                _ => None,
            });

        by_extension.or_else(|| Self::from_shebang(head))
    }

    fn from_shebang(head: &[u8]) -> Option<LangVariant> {
        let rest = head.strip_prefix(b"#!")?;
        let line_end = rest.iter().position(|b| *b == b'\n').unwrap_or(rest.len());
        let line = std::str::from_utf8(&rest[..line_end]).ok()?;

        let mut words = line.split_whitespace();
        let mut program = words.next()?.rsplit('/').next()?;
        if program == "env" {
            program = words.find(|w| !w.starts_with('-'))?;
        }

        match program {
            "sh" | "dash" | "ash" => Some(LangVariant::Posix),
            "bash" => Some(LangVariant::Bash),
            "mksh" | "ksh" => Some(LangVariant::Mksh),
            "bats" => Some(LangVariant::Bats),
            _ => None,
        }
    }
}

impl fmt::Display for LangVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A requested dialect, possibly still unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LangMode {
    /// Decide later from the input.
    Auto,
    /// Use this dialect.
    Variant(LangVariant),
}

impl LangMode {
    /// Decode a dialect selector received as an integer.
    pub fn from_code(code: c_int) -> Result<LangMode, AbiError> {
        match constants().constant_for(ConstantGroup::Lang, code) {
            Some(Constant::LangAuto) => Ok(LangMode::Auto),
            Some(constant) => LangVariant::ALL
                .iter()
                .copied()
                .find(|v| v.constant() == constant)
                .map(LangMode::Variant)
                .ok_or(AbiError::UnknownLangCode(code)),
            None => Err(AbiError::UnknownLangCode(code)),
        }
    }

    pub fn code(self) -> c_int {
        match self {
            LangMode::Auto => constants().value(Constant::LangAuto),
            LangMode::Variant(variant) => variant.code(),
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, LangMode::Auto)
    }

    /// The concrete dialect, failing if this is still `Auto`.
    pub fn variant(self) -> Result<LangVariant, AbiError> {
        match self {
            LangMode::Auto => Err(AbiError::UnresolvedLang),
            LangMode::Variant(variant) => Ok(variant),
        }
    }

    /// Resolve to a concrete dialect. `Auto` falls back to Bash when
    /// neither the path nor the contents say otherwise.
    pub fn resolve(self, path: Option<&Path>, head: &[u8]) -> LangVariant {
        match self {
            LangMode::Auto => LangVariant::detect(path, head).unwrap_or(LangVariant::Bash),
            LangMode::Variant(variant) => variant,
        }
    }
}

impl From<LangVariant> for LangMode {
    fn from(variant: LangVariant) -> Self {
        LangMode::Variant(variant)
    }
}

impl FromStr for LangMode {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(LangMode::Variant(LangVariant::Bash)),
            "posix" | "sh" => Ok(LangMode::Variant(LangVariant::Posix)),
            "mksh" => Ok(LangMode::Variant(LangVariant::Mksh)),
            "bats" => Ok(LangMode::Variant(LangVariant::Bats)),
            "auto" => Ok(LangMode::Auto),
            other => Err(AbiError::UnknownLangName(other.to_string())),
        }
    }
}

impl fmt::Display for LangMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LangMode::Auto => f.write_str("auto"),
            LangMode::Variant(variant) => variant.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_code_round_trip() {
        for variant in LangVariant::ALL {
            assert_eq!(
                LangMode::from_code(variant.code()).unwrap(),
                LangMode::Variant(variant)
            );
        }
        assert_eq!(
            LangMode::from_code(LangMode::Auto.code()).unwrap(),
            LangMode::Auto
        );
    }

    #[test]
    fn test_invalid_code_is_lang_error() {
        let parse = constants().value(Constant::ErrorParse);
        let err = LangMode::from_code(parse).unwrap_err();
        assert_eq!(err, AbiError::UnknownLangCode(parse));
        assert_eq!(err.kind(), ErrorKind::Lang);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("sh".parse::<LangMode>().unwrap(), LangVariant::Posix.into());
        assert_eq!("auto".parse::<LangMode>().unwrap(), LangMode::Auto);
        assert!(matches!(
            "zsh".parse::<LangMode>(),
            Err(AbiError::UnknownLangName(name)) if name == "zsh"
        ));
    }

    #[test]
    fn test_auto_never_leaks_as_variant() {
        assert_eq!(LangMode::Auto.variant(), Err(AbiError::UnresolvedLang));
        assert_eq!(
            LangMode::Variant(LangVariant::Mksh).variant(),
            Ok(LangVariant::Mksh)
        );
    }

    #[test]
    fn test_resolve_by_extension() {
        let path = Path::new("tests/setup.bats");
        assert_eq!(
            LangMode::Auto.resolve(Some(path), b"#!/bin/sh\n"),
            LangVariant::Bats
        );
    }

    #[test]
    fn test_resolve_by_shebang() {
        let script = Path::new("install.sh");
        assert_eq!(
            LangMode::Auto.resolve(Some(script), b"#!/bin/sh\nset -e\n"),
            LangVariant::Posix
        );
        assert_eq!(
            LangMode::Auto.resolve(None, b"#!/usr/bin/env -S mksh\n"),
            LangVariant::Mksh
        );
        assert_eq!(
            LangMode::Auto.resolve(None, b"#!/usr/bin/env bash"),
            LangVariant::Bash
        );
    }

    #[test]
    fn test_resolve_defaults_to_bash() {
        assert_eq!(LangMode::Auto.resolve(None, b"echo hi\n"), LangVariant::Bash);
        assert_eq!(
            LangMode::Auto.resolve(None, b"#!/usr/bin/python3\n"),
            LangVariant::Bash
        );
    }

    #[test]
    fn test_explicit_variant_ignores_input() {
        let mode = LangMode::Variant(LangVariant::Posix);
        assert_eq!(
            mode.resolve(Some(Path::new("a.bash")), b"#!/bin/bash\n"),
            LangVariant::Posix
        );
    }
}
