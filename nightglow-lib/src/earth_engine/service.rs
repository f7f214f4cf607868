use crate::Result;
use crate::regions::Region;
use core::future::Future;
use strum::Display;

/// Raster layer a reduction runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Layer {
    /// Annual mean of the monthly nighttime radiance composites
    Radiance,

    /// Gridded population counts
    Population,

    /// Area of each pixel in square meters
    PixelArea,
}

/// Aggregation applied over the region's pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Reducer {
    Sum,
    Mean,
}

/// Pixels a reduction is restricted to, beyond the region itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mask {
    /// Every pixel in the region
    None,

    /// Built-up land-cover pixels only
    BuiltUp,

    /// Built-up pixels and anything within `meters` of them
    BuiltUpBuffered { meters: f64 },
}

/// A single zonal-statistics request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionRequest {
    pub layer: Layer,
    pub reducer: Reducer,
    pub region: Region,
    pub mask: Mask,

    /// Nominal pixel size (m) the reduction is computed at
    pub scale_m: f64,
}

/// A service able to reduce raster layers over regions.
///
/// Implemented by [`EarthEngineClient`](super::EarthEngineClient) for real runs and by
/// stubs in tests.
pub trait GeoService {
    /// Reduce a layer over a region.
    ///
    /// Returns `None` when the region holds no qualifying pixels.
    fn reduce(&self, request: &ReductionRequest) -> impl Future<Output = Result<Option<f64>>> + Send;

    /// Area of a region's geometry in square meters.
    fn area(&self, region: &Region) -> impl Future<Output = Result<f64>> + Send;
}
