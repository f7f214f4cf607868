use super::Coordinate;
use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::app_err;

/// Spatial filter for a remote reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// Disc of `radius_km` around `center`
    Disc { center: Coordinate, radius_km: f64 },

    /// National boundary looked up by country name
    Country { name: String },
}

impl Region {
    /// A disc around `center`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not a positive finite number
    pub fn disc(center: Coordinate, radius_km: f64) -> Result<Self> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(app_err!("search radius must be a positive number of kilometers, got {radius_km}"));
        }

        Ok(Self::Disc { center, radius_km })
    }

    /// A disc around `center` using `radius_km` when given, `default_radius_km` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the effective radius is not a positive finite number
    pub fn around(center: Coordinate, radius_km: Option<f64>, default_radius_km: f64) -> Result<Self> {
        Self::disc(center, radius_km.unwrap_or(default_radius_km))
    }

    /// The national boundary of `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank
    pub fn country(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(app_err!("country name must not be empty"));
        }

        Ok(Self::Country { name: name.to_string() })
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Disc { center, radius_km } => write!(f, "{radius_km} km around {center}"),
            Self::Country { name } => write!(f, "{name} (national boundary)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Coordinate {
        Coordinate::new(0.0, 0.0).unwrap()
    }

    #[test]
    fn test_disc_accepts_positive_radius() {
        let region = Region::disc(origin(), 50.0).unwrap();
        assert_eq!(region, Region::Disc { center: origin(), radius_km: 50.0 });
    }

    #[test]
    fn test_disc_rejects_bad_radius() {
        assert!(Region::disc(origin(), 0.0).is_err());
        assert!(Region::disc(origin(), -10.0).is_err());
        assert!(Region::disc(origin(), f64::NAN).is_err());
        assert!(Region::disc(origin(), f64::INFINITY).is_err());
    }

    #[test]
    fn test_around_prefers_override() {
        let region = Region::around(origin(), Some(25.0), 100.0).unwrap();
        assert_eq!(region, Region::Disc { center: origin(), radius_km: 25.0 });
    }

    #[test]
    fn test_around_falls_back_to_default() {
        let region = Region::around(origin(), None, 100.0).unwrap();
        assert_eq!(region, Region::Disc { center: origin(), radius_km: 100.0 });
    }

    #[test]
    fn test_around_rejects_bad_override() {
        assert!(Region::around(origin(), Some(0.0), 100.0).is_err());
    }

    #[test]
    fn test_country_trims_name() {
        let region = Region::country("  Nigeria ").unwrap();
        assert_eq!(region, Region::Country { name: "Nigeria".to_string() });
    }

    #[test]
    fn test_country_rejects_blank() {
        assert!(Region::country("   ").is_err());
    }

    #[test]
    fn test_display() {
        let disc = Region::disc(origin(), 50.0).unwrap();
        assert_eq!(disc.to_string(), "50 km around (0.0000, 0.0000)");
        assert_eq!(Region::country("Chile").unwrap().to_string(), "Chile (national boundary)");
    }
}
