//! Console, CSV and JSON reports
//!
//! The console table is streamed: the header goes out before the first country is
//! processed and each row is printed as soon as its country completes. CSV and JSON
//! exports are written once, after every country has been handled.
//!
//! Column layouts are declared in static tables (`columns.rs`) pairing a heading with
//! an extractor over [`MetricRow`](crate::metrics::MetricRow). Ratios that could not be
//! computed render as `N/A` in the console and in CSV, and as `null` in JSON.

mod columns;
mod console;
mod csv;
mod json;

pub use columns::NOT_AVAILABLE;
pub use console::{write_footer as write_console_footer, write_header as write_console_header, write_row as write_console_row};
pub use csv::generate as generate_csv;
pub use json::generate as generate_json;
