use crate::types::{PackageSummary, Solution};

const GAUGE_WIDTH: usize = 40;
const HEADERS: [&str; 4] = ["Type", "Count", "Volume", "Value"];

/// Renders one package as a bordered table followed by a fill gauge.
pub fn render_package(index: usize, package: &PackageSummary, volume_limit: f64) -> String {
    let rows: Vec<[String; 4]> = package
        .items
        .iter()
        .map(|line| {
            [
                line.item_type.clone(),
                group_thousands(line.count as f64),
                group_thousands(line.total_volume),
                group_thousands(line.total_value),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format!("Package {}:\n", index + 1));
    let border = border_line(&widths);
    out.push_str(&border);
    out.push_str(&table_row(&HEADERS.map(String::from), &widths));
    out.push_str(&border);
    for row in &rows {
        out.push_str(&table_row(row, &widths));
    }
    out.push_str(&border);
    out.push_str(&format!(
        "  Total volume: {} m3  Total value: {} ISK\n",
        group_thousands(package.total_volume),
        group_thousands(package.total_value)
    ));
    out.push_str(&format!(
        "  {}\n",
        render_gauge(package.fill_percent(volume_limit))
    ));
    out
}

pub fn render_summary(solution: &Solution) -> String {
    let count = solution.package_count();
    format!(
        "Summary: {} package{} used (at least {} needed), {} m3, {} ISK, {:.1}% unused capacity\n",
        count,
        if count == 1 { "" } else { "s" },
        solution.estimated_packages(),
        group_thousands(solution.total_volume()),
        group_thousands(solution.total_value()),
        solution.total_waste_percent(),
    )
}

fn border_line(widths: &[usize; 4]) -> String {
    let mut line = String::from("+");
    for &w in widths {
        line.push_str(&"-".repeat(w + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn table_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let mut line = String::from("|");
    for (i, (cell, &w)) in cells.iter().zip(widths).enumerate() {
        // names left-aligned, numbers right-aligned
        if i == 0 {
            line.push_str(&format!(" {cell:<w$} |"));
        } else {
            line.push_str(&format!(" {cell:>w$} |"));
        }
    }
    line.push('\n');
    line
}

fn render_gauge(percent: f64) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * GAUGE_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:.1}%",
        "#".repeat(filled),
        " ".repeat(GAUGE_WIDTH - filled),
        percent
    )
}

/// Formats a number rounded to an integer with `,` between thousands.
pub fn group_thousands(n: f64) -> String {
    let rounded = n.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
