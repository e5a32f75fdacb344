//! Renders records as a bordered text table.
//!
//! The header comes from the first record's columns. A record missing one of
//! them shows an empty cell.

use crate::persistence::Record;

pub const EMPTY_RESULT: &str = "(no data)";

pub fn render_records(records: &[Record]) -> String {
    let Some(first) = records.first() else {
        return EMPTY_RESULT.to_string();
    };

    let header: Vec<String> = first.columns().cloned().collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            header
                .iter()
                .map(|column| {
                    record
                        .get(column)
                        .map(|value| value.to_string())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(index, column)| {
            rows.iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut lines = vec![border.clone(), render_line(&header, &widths), border.clone()];
    lines.extend(rows.iter().map(|row| render_line(row, &widths)));
    lines.push(border);

    lines.join("\n")
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let cells: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let padding = width - cell.chars().count();
            format!(" {}{} ", cell, " ".repeat(padding))
        })
        .collect();

    format!("|{}|", cells.join("|"))
}
