use crate::Result;
use crate::regions::Coordinate;
use ohno::{IntoAppError, app_err};
use serde::Deserialize;

/// One country's entry in the targets file.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub country: String,
    pub capital_name: Option<String>,
    pub capital: Coordinate,
    pub city_name: String,
    pub city: Coordinate,

    /// Search radius (km) around the city, when overriding the default
    pub radius_km: Option<f64>,

    /// Search radius (km) around the capital, when overriding the default
    pub capital_radius_km: Option<f64>,
}

/// Field layout of an entry as written in the targets file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
    #[serde(rename = "Capital")]
    capital: Coordinate,

    #[serde(rename = "Capital_Name", default)]
    capital_name: Option<String>,

    #[serde(rename = "City_Name")]
    city_name: String,

    #[serde(rename = "City")]
    city: Coordinate,

    #[serde(rename = "Radius", default)]
    radius_km: Option<f64>,

    #[serde(rename = "Cap_Radius", default)]
    capital_radius_km: Option<f64>,
}

impl Target {
    /// Interpret the JSON value stored under `country`.
    ///
    /// # Errors
    ///
    /// Returns an error for missing or unknown fields, malformed coordinates, a blank city
    /// name, or a radius override that is not a positive number
    pub fn from_json(country: &str, value: &serde_json::Value) -> Result<Self> {
        let raw = RawTarget::deserialize(value).into_app_err_with(|| format!("invalid entry for '{country}'"))?;

        let city_name = raw.city_name.trim();
        if city_name.is_empty() {
            return Err(app_err!("invalid entry for '{country}': City_Name must not be empty"));
        }

        check_radius(country, "Radius", raw.radius_km)?;
        check_radius(country, "Cap_Radius", raw.capital_radius_km)?;

        Ok(Self {
            country: country.to_string(),
            capital_name: raw.capital_name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            capital: raw.capital,
            city_name: city_name.to_string(),
            city: raw.city,
            radius_km: raw.radius_km,
            capital_radius_km: raw.capital_radius_km,
        })
    }
}

fn check_radius(country: &str, field: &str, radius_km: Option<f64>) -> Result<()> {
    match radius_km {
        Some(r) if !r.is_finite() || r <= 0.0 => Err(app_err!(
            "invalid entry for '{country}': {field} must be a positive number of kilometers, got {r}"
        )),
        _ => Ok(()),
    }
}
