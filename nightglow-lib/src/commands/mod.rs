//! Command-line interface and orchestration for nightglow
//!
//! This module implements the CLI commands and ties the other modules together:
//! argument parsing, settings and targets loading, the per-country pipeline and
//! report output.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **analyze**: Verify Earth Engine access, then for each country in file order
//!   extract capital, city and national statistics, combine them into a row, print
//!   it, and finally write the CSV (and optional JSON) export
//! - **init**: Write a default `nightglow.toml` and a sample `targets.json`
//! - **validate**: Load settings and targets and check every entry locally
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. All output goes through the [`Host`] trait so the
//! commands can be exercised with in-memory buffers.
//!
//! Errors loading settings, targets or credentials, or reaching Earth Engine at all,
//! abort the command. Errors within one country are reported and that country is
//! skipped.

mod analyze;
mod common;
mod host;
mod init;
mod progress_reporter;
mod run;
mod validate;

pub use analyze::{AnalyzeArgs, DEFAULT_CSV_FILE, analyze, process_targets};
pub use common::{ColorMode, LogLevel, load_env_file};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
