use super::common::{ColorMode, LogLevel, init_logging};
use super::{Host, ProgressReporter};
use crate::Result;
use crate::config::Config;
use crate::earth_engine::{EarthEngineClient, GeoService};
use crate::metrics::{Extractor, MetricRow, Progress};
use crate::reports::{generate_csv, generate_json, write_console_footer, write_console_header, write_console_row};
use crate::targets::{DEFAULT_TARGETS_FILE, TargetEntry, TargetsFile};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use std::fs;
use std::io::{BufWriter, Write, stderr, stdout};

/// CSV file written when `--csv` is not given
pub const DEFAULT_CSV_FILE: &str = "light_analysis_results.csv";

/// Environment variable consulted when neither `--project` nor `PROJECT_ID` is set
const FALLBACK_PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Path to the targets file
    #[arg(long, short = 't', value_name = "PATH", default_value = DEFAULT_TARGETS_FILE)]
    pub targets: Utf8PathBuf,

    /// Path to configuration file (default is `nightglow.toml` when present)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Google Cloud project registered for Earth Engine (falls back to `GOOGLE_CLOUD_PROJECT`)
    #[arg(long, value_name = "ID", env = "PROJECT_ID")]
    pub project: Option<String>,

    /// OAuth access token, e.g. from `gcloud auth print-access-token`
    #[arg(long, value_name = "TOKEN", env = "EE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Earth Engine API endpoint, overriding the configuration file
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Write results to this CSV file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CSV_FILE, help_heading = "Report Output")]
    pub csv: Utf8PathBuf,

    /// Also write results to this JSON file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Run the full pipeline: load inputs, query Earth Engine for each country, report.
///
/// # Errors
///
/// Returns an error if the settings, targets or credentials are unusable, if Earth Engine
/// rejects the project, or if a report file cannot be written. Failures within a single
/// country are reported and skipped.
pub async fn analyze<H: Host>(host: &mut H, args: &AnalyzeArgs) -> Result<()> {
    init_logging(args.log_level);

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(url) = &args.api_url {
        config.api_url.clone_from(url);
        config.validate()?;
    }

    let targets = TargetsFile::load(&args.targets)?;

    let project = args
        .project
        .clone()
        .or_else(|| std::env::var(FALLBACK_PROJECT_ENV).ok())
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| app_err!("no Earth Engine project configured; pass --project or set PROJECT_ID"))?;
    let access_token = args
        .access_token
        .as_deref()
        .ok_or_else(|| app_err!("no access token available; pass --access-token or set EE_ACCESS_TOKEN"))?;

    let client = EarthEngineClient::new(&project, access_token, &config)?;
    client.verify().await?;

    let delay = if args.log_level == LogLevel::None {
        Duration::from_millis(300)
    } else {
        Duration::from_secs(365 * 24 * 60 * 60)
    };
    let progress = ProgressReporter::new(delay, args.color.use_colors(&stderr()));
    let use_colors = args.color.use_colors(&stdout());

    let _ = writeln!(host.output(), "--- Processing {} target(s) ({} data) ---\n", targets.len(), config.year);
    let rows = process_targets(host, &client, &config, &targets, &progress, use_colors).await;
    progress.done();

    write_reports(host, &rows, &args.csv, args.json.as_deref())
}

/// Process every target in file order, streaming console rows to the host.
///
/// A country whose entry is malformed or whose remote calls fail is reported on the
/// host's error stream and left out; the others are unaffected.
pub async fn process_targets<H: Host, S: GeoService>(
    host: &mut H,
    service: &S,
    config: &Config,
    targets: &TargetsFile,
    progress: &dyn Progress,
    use_colors: bool,
) -> Vec<MetricRow> {
    let mut extractor = Extractor::new(service, config, progress);
    let mut rows = Vec::with_capacity(targets.len());
    let mut failed = Vec::new();

    progress.set_phase("Analyzing");
    emit(host, progress, |out| write_console_header(out, use_colors));

    for entry in targets.entries() {
        log::info!("analyzing {}", entry.country);
        progress.set_step(&entry.country);

        match analyze_target(&mut extractor, entry).await {
            Ok(row) => {
                emit(host, progress, |out| write_console_row(out, &row, use_colors));
                rows.push(row);
            }
            Err(e) => {
                log::error!("skipping {}: {e:#}", entry.country);
                failed.push((entry.country.as_str(), e));
            }
        }
    }

    emit(host, progress, |out| write_console_footer(out, use_colors));

    if !failed.is_empty() {
        progress.suspend(&mut || {
            let mut err = host.error();
            let _ = writeln!(err, "\nUnable to analyze {} country(ies)", failed.len());
            for (country, e) in &failed {
                let _ = writeln!(err, "  {country}: {e}");
            }
        });
    }

    rows
}

async fn analyze_target<S: GeoService>(extractor: &mut Extractor<'_, S>, entry: &TargetEntry) -> Result<MetricRow> {
    let target = entry.parse()?;

    let capital_label = target
        .capital_name
        .clone()
        .unwrap_or_else(|| format!("capital of {}", target.country));
    let capital = extractor.region_stats(&capital_label, target.capital, target.capital_radius_km).await?;
    let city = extractor.region_stats(&target.city_name, target.city, target.radius_km).await?;
    let national = extractor.national_stats(&target.country).await?;

    Ok(MetricRow::combine(&target, city, capital, &national))
}

/// Render console text and hand it to the host with the progress indicator out of the way.
fn emit<H: Host>(host: &mut H, progress: &dyn Progress, render: impl FnOnce(&mut String) -> Result<()>) {
    let mut text = String::new();
    if let Err(e) = render(&mut text) {
        log::warn!("could not format console output: {e}");
        return;
    }

    progress.suspend(&mut || {
        let _ = write!(host.output(), "{text}");
    });
}

fn write_reports<H: Host>(host: &mut H, rows: &[MetricRow], csv_path: &Utf8Path, json_path: Option<&Utf8Path>) -> Result<()> {
    let file = fs::File::create(csv_path).into_app_err_with(|| format!("creating CSV file '{csv_path}'"))?;
    generate_csv(rows, BufWriter::new(file)).into_app_err_with(|| format!("writing CSV file '{csv_path}'"))?;
    let _ = writeln!(host.output(), "\nResults saved to {csv_path}");

    if let Some(json_path) = json_path {
        let mut text = String::new();
        generate_json(rows, &mut text)?;
        fs::write(json_path, text).into_app_err_with(|| format!("writing JSON file '{json_path}'"))?;
        let _ = writeln!(host.output(), "Results saved to {json_path}");
    }

    Ok(())
}
