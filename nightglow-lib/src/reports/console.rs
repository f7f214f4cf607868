use super::columns::{CONSOLE_COLUMNS, Cell, ColumnDef};
use crate::Result;
use crate::metrics::MetricRow;
use core::fmt::Write;
use owo_colors::OwoColorize;

/// Width of the rule drawn above and below the table.
fn table_width() -> usize {
    CONSOLE_COLUMNS.iter().map(|c| c.width + 1).sum::<usize>() - 1
}

fn write_rule<W: Write>(writer: &mut W, use_colors: bool) -> Result<()> {
    let rule = "=".repeat(table_width());
    if use_colors {
        writeln!(writer, "{}", rule.dimmed())?;
    } else {
        writeln!(writer, "{rule}")?;
    }
    Ok(())
}

/// Write the rule and column headings that open the table.
pub fn write_header<W: Write>(writer: &mut W, use_colors: bool) -> Result<()> {
    write_rule(writer, use_colors)?;

    let line = join(CONSOLE_COLUMNS.iter().map(|c| (c, c.header.to_string())));
    if use_colors {
        writeln!(writer, "{}", line.bold())?;
    } else {
        writeln!(writer, "{line}")?;
    }

    write_rule(writer, use_colors)
}

/// Write one country's line.
pub fn write_row<W: Write>(writer: &mut W, row: &MetricRow, use_colors: bool) -> Result<()> {
    let mut line = String::new();
    for (index, column) in CONSOLE_COLUMNS.iter().enumerate() {
        if index > 0 {
            line.push(' ');
        }

        let text = pad(column, column.console_text(row), index + 1 == CONSOLE_COLUMNS.len());
        let absent = matches!((column.extractor)(row), Cell::Ratio(None));
        if use_colors && absent {
            write!(line, "{}", text.yellow())?;
        } else {
            line.push_str(&text);
        }
    }

    writeln!(writer, "{line}")?;
    Ok(())
}

/// Write the rule that closes the table.
pub fn write_footer<W: Write>(writer: &mut W, use_colors: bool) -> Result<()> {
    write_rule(writer, use_colors)
}

fn pad(column: &ColumnDef, text: String, last: bool) -> String {
    if last {
        text
    } else {
        format!("{text:<width$}", width = column.width)
    }
}

fn join<'a>(cells: impl Iterator<Item = (&'a ColumnDef, String)>) -> String {
    let cells: Vec<_> = cells.collect();
    let count = cells.len();
    cells
        .into_iter()
        .enumerate()
        .map(|(index, (column, text))| pad(column, text, index + 1 == count))
        .collect::<Vec<_>>()
        .join(" ")
}
