//! Loading of the per-country targets file
//!
//! The targets file is a JSON object mapping each country to its capital and the city
//! compared against it. The file as a whole is parsed up front (a malformed file stops
//! the run), while each country's entry is only interpreted when that country is
//! processed, so one bad entry costs only that country.

mod target;
mod targets_file;

pub use target::Target;
pub use targets_file::{DEFAULT_TARGETS_FILE, SAMPLE_TARGETS_JSON, TargetEntry, TargetsFile};
