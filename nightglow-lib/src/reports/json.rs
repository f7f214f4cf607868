use crate::Result;
use crate::metrics::MetricRow;
use core::fmt::Write;
use serde_json::json;

/// Write all rows as a JSON document. Absent ratios are `null`.
pub fn generate<W: Write>(rows: &[MetricRow], writer: &mut W) -> Result<()> {
    let output = json!({
        "results": rows,
    });

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}
