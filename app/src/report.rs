// In app/src/report.rs

use core_types::ResultSet;

const HEADERS: [&str; 7] = [
    "Signal Date",
    "Symbol",
    "Buy At",
    "Sell At",
    "%Move",
    "Close",
    "Proximity%",
];

/// Renders the ranked signals as a fixed-width text table.
pub fn render_table(results: &ResultSet) -> String {
    let records = match results {
        ResultSet::Empty => return "No V20 signals found.".to_string(),
        ResultSet::Signals(records) => records,
    };

    let rows: Vec<[String; 7]> = records
        .iter()
        .map(|r| {
            [
                r.signal_date.to_string(),
                r.symbol.0.clone(),
                format!("{:.2}", r.buy_at),
                format!("{:.2}", r.sell_at),
                format!("{:.2}", r.percent_move),
                format!("{:.2}", r.latest_close),
                format!("{:.2}", r.proximity_percent),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            // Date and symbol read left to right, numbers line up on the right.
            if i < 2 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
