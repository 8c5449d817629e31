//! Constants command - dump the shared constant table.

use husk_abi::{constants, Constant, ConstantGroup};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ConstantRow {
    name: &'static str,
    constant: Constant,
    group: ConstantGroup,
    value: i32,
}

fn rows() -> Vec<ConstantRow> {
    constants()
        .iter()
        .map(|(constant, value)| ConstantRow {
            name: constant.name(),
            constant,
            group: constant.group(),
            value,
        })
        .collect()
}

fn render(rows: &[ConstantRow]) -> String {
    let mut out = String::new();
    let mut group = None;
    for row in rows {
        if group != Some(row.group) {
            if group.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("{:?}\n", row.group));
            group = Some(row.group);
        }
        out.push_str(&format!("  {:32} {}\n", row.name, row.value));
    }
    out
}

pub fn run(json: bool) -> miette::Result<()> {
    let rows = rows();

    if json {
        let text = serde_json::to_string_pretty(&rows)
            .map_err(|e| miette::miette!("Failed to serialize constants: {}", e))?;
        println!("{}", text);
    } else {
        print!("{}", render(&rows));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_constant_listed() {
        let rows = rows();
        assert_eq!(rows.len(), Constant::ALL.len());
        assert_eq!(rows[0].name, "HUSK_ERROR_IO");
    }

    #[test]
    fn test_render_groups() {
        let text = render(&rows());
        assert!(text.starts_with("Error\n"));
        assert!(text.contains("\nLang\n"));
        assert!(text.contains("HUSK_LANG_AUTO"));
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(rows()).unwrap();
        let first = &value[0];
        assert_eq!(first["name"], "HUSK_ERROR_IO");
        assert_eq!(first["constant"], "ErrorIo");
        assert_eq!(first["group"], "Error");
    }
}
