use super::Host;
use crate::Result;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::regions::Region;
use crate::targets::{DEFAULT_TARGETS_FILE, Target, TargetsFile};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ohno::app_err;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the targets file
    #[arg(long, short = 't', value_name = "PATH", default_value = DEFAULT_TARGETS_FILE)]
    pub targets: Utf8PathBuf,

    /// Path to configuration file (default is `nightglow.toml` when present)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

/// Check that the search areas of a target can be built with the effective radii.
fn check_target(target: &Target, config: &Config) -> Result<()> {
    let _ = Region::around(target.capital, target.capital_radius_km, config.default_radius_km)?;
    let _ = Region::around(target.city, target.radius_km, config.default_radius_km)?;
    let _ = Region::country(&target.country)?;
    Ok(())
}

/// Load settings and targets and interpret every entry, without contacting Earth Engine.
///
/// Returns the number of valid targets and a description of each invalid one.
fn validate_inner(targets_path: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<(usize, Vec<String>)> {
    let config = Config::load(config_path)?;
    let targets = TargetsFile::load(targets_path)?;

    let mut valid = 0;
    let mut problems = Vec::new();
    for entry in targets.entries() {
        match entry.parse().and_then(|target| check_target(&target, &config)) {
            Ok(()) => valid += 1,
            Err(e) => problems.push(format!("{}: {e}", entry.country)),
        }
    }

    Ok((valid, problems))
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    match validate_inner(&args.targets, args.config.as_deref()) {
        Ok((valid, problems)) if problems.is_empty() => {
            let _ = writeln!(host.output(), "Configuration is valid");
            match &args.config {
                Some(path) => {
                    let _ = writeln!(host.output(), "Config file: {path}");
                }
                None => {
                    let _ = writeln!(host.output(), "Using {DEFAULT_CONFIG_FILE} or built-in defaults");
                }
            }
            let _ = writeln!(host.output(), "Targets file: {} ({valid} target(s))", args.targets);
            Ok(())
        }
        Ok((_, problems)) => {
            let _ = writeln!(host.error(), "❌ {} invalid target(s) in {}:", problems.len(), args.targets);
            for problem in &problems {
                let _ = writeln!(host.error(), "  {problem}");
            }
            host.exit(1);
            Err(app_err!("{} invalid target(s)", problems.len()))
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}
