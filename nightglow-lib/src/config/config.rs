use super::Datasets;
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Datelike, Utc};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File name looked up in the working directory when no configuration path is given
pub const DEFAULT_CONFIG_FILE: &str = "nightglow.toml";

/// First year with VIIRS monthly composites.
const FIRST_VIIRS_YEAR: i32 = 2012;

/// First year any of the population or land-cover products cover.
const FIRST_GRID_YEAR: i32 = 2000;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Year of the VIIRS composites averaged into the annual radiance image
    #[serde(default = "default_year")]
    pub year: i32,

    /// Year of the population grid
    #[serde(default = "default_population_year")]
    pub population_year: i32,

    /// Year of the land-cover classification
    #[serde(default = "default_landcover_year")]
    pub landcover_year: i32,

    /// Search radius (km) used when a target does not override it
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,

    /// Dilation (m) applied to built-up pixels for the metro population count
    #[serde(default = "default_metro_buffer_m")]
    pub metro_buffer_m: f64,

    /// Land-cover class that counts as built-up
    #[serde(default = "default_built_up_class")]
    pub built_up_class: u32,

    #[serde(default = "default_light_scale_m")]
    pub light_scale_m: f64,

    #[serde(default = "default_fine_scale_m")]
    pub population_scale_m: f64,

    #[serde(default = "default_fine_scale_m")]
    pub area_scale_m: f64,

    /// Scale (m) of the country-wide mean radiance reduction
    #[serde(default = "default_national_scale_m")]
    pub national_scale_m: f64,

    #[serde(default = "default_max_pixels")]
    pub max_pixels: f64,

    /// Client-side timeout for a single remote request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Base URL of the Earth Engine REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub datasets: Datasets,
}

const fn default_year() -> i32 {
    2023
}

const fn default_population_year() -> i32 {
    2020
}

const fn default_landcover_year() -> i32 {
    2021
}

const fn default_radius_km() -> f64 {
    100.0
}

const fn default_metro_buffer_m() -> f64 {
    2000.0
}

const fn default_built_up_class() -> u32 {
    50
}

const fn default_light_scale_m() -> f64 {
    500.0
}

const fn default_fine_scale_m() -> f64 {
    100.0
}

const fn default_national_scale_m() -> f64 {
    5000.0
}

const fn default_max_pixels() -> f64 {
    1e10
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(10 * 60)
}

fn default_api_url() -> String {
    "https://earthengine.googleapis.com".to_string()
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `nightglow.toml` in the working directory is used when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or fails validation
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading nightglow configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = Utf8PathBuf::from(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!("no {DEFAULT_CONFIG_FILE} found, using default settings");
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading nightglow configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        log::debug!("loaded settings from '{final_path}'");
        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a year is out of range, a scale or radius is not positive, or the API URL is malformed
    pub fn validate(&self) -> Result<()> {
        let current_year = Utc::now().year();

        check_year("year", self.year, FIRST_VIIRS_YEAR, current_year)?;
        check_year("population_year", self.population_year, FIRST_GRID_YEAR, current_year)?;
        check_year("landcover_year", self.landcover_year, FIRST_GRID_YEAR, current_year)?;

        check_positive("default_radius_km", self.default_radius_km)?;
        check_positive("light_scale_m", self.light_scale_m)?;
        check_positive("population_scale_m", self.population_scale_m)?;
        check_positive("area_scale_m", self.area_scale_m)?;
        check_positive("national_scale_m", self.national_scale_m)?;
        check_positive("max_pixels", self.max_pixels)?;

        if !self.metro_buffer_m.is_finite() || self.metro_buffer_m < 0.0 {
            return Err(app_err!("metro_buffer_m must be zero or positive, got {}", self.metro_buffer_m));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        let url = Url::parse(&self.api_url).into_app_err_with(|| format!("parsing api_url '{}'", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(app_err!("api_url must use http or https, got '{}'", self.api_url));
        }

        let empty = self.datasets.empty_fields();
        if !empty.is_empty() {
            return Err(app_err!("dataset settings must not be empty: {}", empty.join(", ")));
        }

        Ok(())
    }
}

fn check_year(name: &str, value: i32, first: i32, last: i32) -> Result<()> {
    if (first..=last).contains(&value) {
        Ok(())
    } else {
        Err(app_err!("{name} must be between {first} and {last}, got {value}"))
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(app_err!("{name} must be a positive number, got {value}"))
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
