//! Tool settings
//!
//! Settings are read from a TOML file (`nightglow.toml` by default). Every key is
//! optional and falls back to the values in the embedded `default_config.toml`.

#[expect(clippy::module_inception, reason = "the settings type lives in its own file like the rest of the crate")]
mod config;
mod datasets;

pub use config::{Config, DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_TOML};
pub use datasets::{Boundaries, Dataset, Datasets};
