use super::columns::CSV_COLUMNS;
use crate::Result;
use crate::metrics::MetricRow;
use std::io::Write;

/// Write all rows as CSV, header first. The header is written even when there are no rows.
pub fn generate<W: Write>(rows: &[MetricRow], writer: W) -> Result<()> {
    let mut out = ::csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    out.write_record(CSV_COLUMNS.iter().map(|c| c.header))?;
    for row in rows {
        out.write_record(CSV_COLUMNS.iter().map(|c| c.csv_text(row)))?;
    }

    out.flush()?;
    Ok(())
}
