use std::fmt::Write;

use super::model::{STREAM_COLUMNS, ViewModel};

/// Plain-text rendering used by the `show` subcommand
pub fn format_view(view: &ViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "RTSP streams ({})", view.streams.len());
    if view.streams.is_empty() {
        out.push_str("  (no streams configured)\n");
    } else {
        let rows: Vec<[String; 7]> = view.streams.iter().map(|r| r.cells()).collect();
        let mut widths = STREAM_COLUMNS.map(|c| c.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header = STREAM_COLUMNS.map(str::to_string);
        write_row(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(&mut out, &rule, &widths);
        for row in &rows {
            write_row(&mut out, row, &widths);
        }
    }

    out.push('\n');
    let _ = writeln!(out, "Ignored plates ({})", view.plates.len());
    if view.plates.is_empty() {
        out.push_str("  (no ignored plates)\n");
    }
    for row in &view.plates {
        let _ = writeln!(out, "  {:>3}. {}", row.index + 1, row.plate);
    }

    out
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    let _ = writeln!(out, "  {}", line.join("  ").trim_end());
}
