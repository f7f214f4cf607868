//! Remote reduction service
//!
//! Zonal statistics are computed by Google Earth Engine, never locally. This module
//! describes the reductions the extractor needs ([`ReductionRequest`]), the seam it
//! talks through ([`GeoService`]), and the REST client implementing that seam.
//!
//! # Implementation Model
//!
//! A request names a raster [`Layer`], a [`Reducer`], a [`Region`](crate::regions::Region),
//! an optional built-up [`Mask`] and a scale. The [`ExpressionBuilder`] lowers it into
//! an Earth Engine expression graph (nested `functionInvocationValue` nodes), which
//! the [`EarthEngineClient`] posts to `value:compute`. The reply is a single scalar,
//! or `null` when the region holds no qualifying pixels.

mod client;
mod expression;
mod service;

pub use client::EarthEngineClient;
pub use expression::ExpressionBuilder;
pub use service::{GeoService, Layer, Mask, ReductionRequest, Reducer};
