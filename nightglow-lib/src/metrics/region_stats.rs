use serde::Serialize;

/// Area of one 500 m × 500 m reference pixel, in m².
pub const REFERENCE_PIXEL_AREA_M2: f64 = 250_000.0;

/// Raw scalars reduced over one disc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RegionStats {
    /// Sum of lights over built-up pixels
    pub sol: f64,

    /// Population living on built-up pixels
    pub pop_strict: f64,

    /// Population within the buffered built-up footprint
    pub pop_metro: f64,

    /// Built-up area in km²
    pub built_up_km2: f64,
}

/// Raw scalars reduced over a national boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NationalStats {
    pub mean_radiance: f64,
    pub area_m2: f64,
    pub normalized_sol: f64,
}

impl NationalStats {
    #[must_use]
    pub fn new(mean_radiance: f64, area_m2: f64) -> Self {
        Self {
            mean_radiance,
            area_m2,
            normalized_sol: normalized_national_sol(mean_radiance, area_m2),
        }
    }
}

/// Scale a mean radiance up to a sum of lights expressed in reference pixels.
///
/// Independent of the scale the mean was computed at, which keeps national figures
/// comparable with sums taken at the 500 m light resolution.
#[must_use]
pub fn normalized_national_sol(mean_radiance: f64, area_m2: f64) -> f64 {
    mean_radiance * (area_m2 / REFERENCE_PIXEL_AREA_M2)
}
