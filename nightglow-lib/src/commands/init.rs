use super::Host;
use crate::Result;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::targets::{DEFAULT_TARGETS_FILE, SAMPLE_TARGETS_JSON};
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::{IntoAppError, app_err};
use std::fs;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Directory to write `nightglow.toml` and `targets.json` into
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: Utf8PathBuf,
}

/// Write a default settings file and a sample targets file.
///
/// # Errors
///
/// Returns an error if either file already exists or cannot be written
pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    let config_path = args.dir.join(DEFAULT_CONFIG_FILE);
    let targets_path = args.dir.join(DEFAULT_TARGETS_FILE);

    for path in [&config_path, &targets_path] {
        if path.exists() {
            return Err(app_err!("refusing to overwrite existing file '{path}'"));
        }
    }

    Config::save_default(&config_path)?;
    fs::write(&targets_path, SAMPLE_TARGETS_JSON).into_app_err_with(|| format!("writing sample targets to {targets_path}"))?;

    let _ = writeln!(host.output(), "Generated default configuration file: {config_path}");
    let _ = writeln!(host.output(), "Generated sample targets file: {targets_path}");
    Ok(())
}
