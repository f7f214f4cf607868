//! Metric extraction and combination
//!
//! The [`Extractor`] turns places into raw scalars by issuing zonal-statistics
//! requests through a [`GeoService`](crate::earth_engine::GeoService):
//! [`RegionStats`] for the disc around a city or capital, [`NationalStats`] for a
//! whole country. [`MetricRow::combine`] then derives the comparative ratios.
//!
//! Missing remote values count as zero. Ratios whose denominator is zero, negative
//! or not finite are `None` and the row is kept.

mod extractor;
mod metric_row;
mod progress;
mod region_stats;

pub use extractor::Extractor;
pub use metric_row::{MetricRow, ratio};
pub use progress::{NoProgress, Progress};
pub use region_stats::{NationalStats, REFERENCE_PIXEL_AREA_M2, RegionStats, normalized_national_sol};
