use super::{NationalStats, RegionStats};
use crate::targets::Target;
use serde::Serialize;

/// One country's line in the report.
///
/// Every derived field is computed from the raw fields of the same row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub country: String,
    pub city_name: String,
    pub capital_name: Option<String>,
    pub city: RegionStats,
    pub capital: RegionStats,
    pub national_sol: f64,
    pub distance_km: f64,

    /// City sum of lights as a percentage of the capital's
    pub pct_of_capital: Option<f64>,

    /// City sum of lights as a percentage of the normalized national sum of lights
    pub pct_of_national: Option<f64>,

    /// City sum of lights per metro resident
    pub light_per_capita: Option<f64>,
}

impl MetricRow {
    /// Combine the raw statistics gathered for `target` into a row.
    #[must_use]
    pub fn combine(target: &Target, city: RegionStats, capital: RegionStats, national: &NationalStats) -> Self {
        Self {
            country: target.country.clone(),
            city_name: target.city_name.clone(),
            capital_name: target.capital_name.clone(),
            city,
            capital,
            national_sol: national.normalized_sol,
            distance_km: target.capital.distance_km(&target.city),
            pct_of_capital: ratio(city.sol, capital.sol).map(|r| r * 100.0),
            pct_of_national: ratio(city.sol, national.normalized_sol).map(|r| r * 100.0),
            light_per_capita: ratio(city.sol, city.pop_metro),
        }
    }
}

/// `numerator / denominator`, or `None` when the denominator is not a positive finite number.
#[must_use]
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator.is_finite() && denominator > 0.0).then(|| numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::Coordinate;

    fn target() -> Target {
        Target {
            country: "Testland".to_string(),
            capital_name: Some("Capitol".to_string()),
            capital: Coordinate::new(0.0, 0.0).unwrap(),
            city_name: "Metropolis".to_string(),
            city: Coordinate::new(1.0, 1.0).unwrap(),
            radius_km: Some(50.0),
            capital_radius_km: None,
        }
    }

    fn stats(sol: f64, pop: f64) -> RegionStats {
        RegionStats {
            sol,
            pop_strict: pop,
            pop_metro: pop,
            built_up_km2: 12.5,
        }
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(1.0, 4.0), Some(0.25));
        assert_eq!(ratio(1.0, 0.0), None);
        assert_eq!(ratio(1.0, -2.0), None);
        assert_eq!(ratio(1.0, f64::NAN), None);
        assert_eq!(ratio(1.0, f64::INFINITY), None);
        assert_eq!(ratio(0.0, 3.0), Some(0.0));
    }

    #[test]
    fn test_combine() {
        let national = NationalStats::new(1.0, 250_000.0 * 400.0);
        let row = MetricRow::combine(&target(), stats(100.0, 1000.0), stats(400.0, 5000.0), &national);

        assert_eq!(row.country, "Testland");
        assert_eq!(row.city_name, "Metropolis");
        assert_eq!(row.capital_name.as_deref(), Some("Capitol"));
        assert_eq!(row.pct_of_capital, Some(25.0));
        assert_eq!(row.pct_of_national, Some(25.0));
        assert_eq!(row.light_per_capita, Some(0.1));
        assert!((row.national_sol - 400.0).abs() < 1e-9);
        assert!((row.distance_km - 157.249).abs() < 0.01);
    }

    #[test]
    fn test_capital_without_light() {
        let row = MetricRow::combine(&target(), stats(100.0, 1000.0), stats(0.0, 5000.0), &NationalStats::new(1.0, 1.0e9));
        assert_eq!(row.pct_of_capital, None);
        assert!(row.pct_of_national.is_some());
    }

    #[test]
    fn test_zero_population_keeps_row() {
        let row = MetricRow::combine(&target(), stats(100.0, 0.0), stats(10.0, 5000.0), &NationalStats::new(1.0, 1.0e9));
        assert_eq!(row.light_per_capita, None);
        assert_eq!(row.pct_of_capital, Some(1000.0));
    }

    #[test]
    fn test_dark_country() {
        let row = MetricRow::combine(&target(), stats(100.0, 1000.0), stats(10.0, 5000.0), &NationalStats::new(0.0, 1.0e9));
        assert_eq!(row.pct_of_national, None);
    }
}
