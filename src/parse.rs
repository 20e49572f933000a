//! Tab-separated inventory parsing.

use crate::error::{Error, Result};
use crate::types::ItemStack;

pub const REQUIRED_COLUMNS: [&str; 4] = ["Type", "Count", "Volume", "Value"];

/// Sample hangar used when no inventory is supplied.
pub const DEMO_INVENTORY: &str = "Type\tCount\tVolume\tValue
Rook\t16\t10000\t3720706652
Vulture\t8\t15000\t3695534158
Bustard\t1\t20000\t221087431
Impel\t16\t20000\t3128286353
Mastodon\t8\t20000\t1552349380
Skiff\t8\t3750\t2311869261
Rapier\t12\t10000\t2472076540
Cerberus\t1\t10000\t204051104
Sacrilege\t25\t10000\t5501283304
Broadsword\t5\t10000\t1361108440
Devoter\t4\t10000\t1139692111
Onyx\t10\t10000\t3310685004
Phobos\t4\t10000\t1040900556
Heretic\t2\t5000\t117449602
Basilisk\t32\t10000\t7656753835";

/// Parses a header row plus one stack per line. Columns may appear in any
/// order; extra columns and blank lines are ignored.
pub fn parse_inventory(input: &str) -> Result<Vec<ItemStack>> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Err(Error::MalformedInput("input is empty".to_string()));
    };
    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();

    let mut positions = [0usize; 4];
    let mut missing = Vec::new();
    for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
        match columns.iter().position(|c| c == name) {
            Some(pos) => positions[slot] = pos,
            None => missing.push(*name),
        }
    }
    if !missing.is_empty() {
        return Err(Error::MalformedInput(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }
    let [type_col, count_col, volume_col, value_col] = positions;

    lines
        .map(|(line_no, line)| {
            let cells: Vec<&str> = line.split('\t').map(str::trim).collect();
            let cell = |col: usize, name: &str| {
                cells.get(col).copied().ok_or_else(|| {
                    Error::MalformedInput(format!("line {line_no}: missing {name} value"))
                })
            };
            let item_type = cell(type_col, "Type")?;
            if item_type.is_empty() {
                return Err(Error::MalformedInput(format!("line {line_no}: empty Type")));
            }
            Ok(ItemStack {
                item_type: item_type.to_string(),
                count: parse_count(cell(count_col, "Count")?, line_no)?,
                unit_volume: parse_amount(cell(volume_col, "Volume")?, "Volume", line_no)?,
                unit_value: parse_amount(cell(value_col, "Value")?, "Value", line_no)?,
            })
        })
        .collect()
}

fn parse_count(s: &str, line_no: usize) -> Result<u64> {
    if let Ok(n) = s.parse::<u64>() {
        return Ok(n);
    }
    match s.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n < u64::MAX as f64 => {
            Ok(n as u64)
        }
        _ => Err(Error::MalformedInput(format!(
            "line {line_no}: invalid Count '{s}', expected a non-negative whole number"
        ))),
    }
}

fn parse_amount(s: &str, name: &str, line_no: usize) -> Result<f64> {
    match s.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(Error::MalformedInput(format!(
            "line {line_no}: invalid {name} '{s}', expected a non-negative number"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_demo() {
        let stacks = parse_inventory(DEMO_INVENTORY).unwrap();
        assert_eq!(stacks.len(), 15);
        assert_eq!(stacks[0], ItemStack::new("Rook", 16, 10_000.0, 3_720_706_652.0));
        assert_eq!(stacks[14].item_type, "Basilisk");
        assert_eq!(stacks[14].count, 32);
    }

    #[test]
    fn test_columns_any_order_and_extras() {
        let input = "Value\tNote\tType\tVolume\tCount\r\n5\tx\tSkiff\t3750\t8\r\n\n";
        let stacks = parse_inventory(input).unwrap();
        assert_eq!(stacks, vec![ItemStack::new("Skiff", 8, 3_750.0, 5.0)]);
    }

    #[test]
    fn test_missing_columns() {
        let err = parse_inventory("Type\tCount\nRook\t16").unwrap_err();
        assert_eq!(
            err,
            Error::MalformedInput("missing required columns: Volume, Value".to_string())
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_inventory("  \n"), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_non_numeric_cells() {
        let err = parse_inventory("Type\tCount\tVolume\tValue\nRook\tmany\t10000\t1").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(err.to_string().contains("Count"));

        let err = parse_inventory("Type\tCount\tVolume\tValue\nRook\t1\t10000\t-5").unwrap_err();
        assert!(err.to_string().contains("Value"));
    }

    #[test]
    fn test_short_row() {
        let err = parse_inventory("Type\tCount\tVolume\tValue\nRook\t1").unwrap_err();
        assert!(err.to_string().contains("missing Volume"));
    }

    #[test]
    fn test_integral_float_count() {
        let stacks = parse_inventory("Type\tCount\tVolume\tValue\nOnyx\t10.0\t10000\t1.5").unwrap();
        assert_eq!(stacks[0].count, 10);
        assert_eq!(stacks[0].unit_value, 1.5);
        assert!(parse_inventory("Type\tCount\tVolume\tValue\nOnyx\t1.5\t10000\t1").is_err());
    }

    #[test]
    fn test_count_out_of_range() {
        for count in ["1e20", "18446744073709551616", "18446744073709551615.0"] {
            let input = format!("Type\tCount\tVolume\tValue\nOnyx\t{count}\t10000\t1");
            let err = parse_inventory(&input).unwrap_err();
            assert!(err.to_string().contains("invalid Count"), "{count}: {err}");
        }
        // the largest plain integer still parses exactly
        let input = "Type\tCount\tVolume\tValue\nOnyx\t18446744073709551615\t10000\t1";
        assert_eq!(parse_inventory(input).unwrap()[0].count, u64::MAX);
    }
}
