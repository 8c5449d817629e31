//! Dialect command - parse and resolve a language dialect.

use husk_abi::{LangMode, LangVariant};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How much of a script is inspected when resolving `auto`.
const HEAD_LEN: u64 = 256;

fn read_head(path: &Path) -> miette::Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| miette::miette!("Failed to open file: {}", e))?;
    let mut head = Vec::new();
    file.take(HEAD_LEN)
        .read_to_end(&mut head)
        .map_err(|e| miette::miette!("Failed to read file: {}", e))?;
    Ok(head)
}

fn resolve(name: &str, file: Option<&Path>) -> miette::Result<(LangMode, LangVariant)> {
    let mode = name
        .parse::<LangMode>()
        .map_err(|e| miette::miette!("{} ({} error)", e, e.kind()))?;

    let head = match file {
        Some(path) if mode.is_auto() => read_head(path)?,
        _ => Vec::new(),
    };

    Ok((mode, mode.resolve(file, &head)))
}

pub fn run(name: &str, file: Option<&Path>) -> miette::Result<()> {
    let (mode, variant) = resolve(name, file)?;

    println!("requested: {} (code {})", mode, mode.code());
    println!("resolved:  {} (code {})", variant, variant.code());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fixed_dialect() {
        let (mode, variant) = resolve("sh", None).unwrap();
        assert_eq!(mode, LangMode::Variant(LangVariant::Posix));
        assert_eq!(variant, LangVariant::Posix);
    }

    #[test]
    fn test_auto_from_file() {
        let mut file = tempfile::Builder::new().suffix(".sh").tempfile().unwrap();
        file.write_all(b"#!/bin/mksh\nprint hi\n").unwrap();
        let (mode, variant) = resolve("auto", Some(file.path())).unwrap();
        assert!(mode.is_auto());
        assert_eq!(variant, LangVariant::Mksh);
    }

    #[test]
    fn test_auto_without_file_is_bash() {
        assert_eq!(resolve("auto", None).unwrap().1, LangVariant::Bash);
    }

    #[test]
    fn test_unknown_name() {
        let err = resolve("fish", None).unwrap_err();
        assert!(err.to_string().contains("lang error"));
    }
}
