#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for nightglow
//!
//! This library consolidates all functionality for the nightglow tool, which compares
//! the nighttime-light output of cities against their national capitals and countries
//! using zonal statistics computed remotely by Google Earth Engine.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`config`]: Tool settings (years, scales, dataset ids)
//! - [`targets`]: Loading of the per-country targets file
//! - [`regions`]: Coordinates and query regions
//! - [`earth_engine`]: Remote reduction service and its REST client
//! - [`metrics`]: Metric extraction and combination
//! - [`reports`]: Console, CSV and JSON output

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod commands;
pub mod config;
pub mod earth_engine;
pub mod metrics;
pub mod regions;
pub mod reports;
pub mod targets;

pub use crate::commands::{Host, load_env_file, run};
