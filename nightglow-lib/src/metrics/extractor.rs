use super::{NationalStats, Progress, RegionStats};
use crate::Result;
use crate::config::Config;
use crate::earth_engine::{GeoService, Layer, Mask, ReductionRequest, Reducer};
use crate::regions::{Coordinate, Region};
use core::fmt::{Debug, Formatter};
use ohno::{IntoAppError, app_err};
use std::collections::HashMap;

const M2_PER_KM2: f64 = 1_000_000.0;

/// Memoization key for disc statistics: (lat, lon, radius) bit patterns plus the year.
type StatsKey = (u64, u64, u64, i32);

/// Issues the zonal-statistics requests behind each row.
///
/// Disc statistics are cached for the lifetime of the extractor, so a place that is
/// requested twice (a city that is also another target's capital) is only reduced once.
pub struct Extractor<'a, S> {
    service: &'a S,
    config: &'a Config,
    progress: &'a dyn Progress,
    cache: HashMap<StatsKey, RegionStats>,
}

impl<S> Debug for Extractor<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Extractor")
            .field("service", &"<service>")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl<'a, S: GeoService> Extractor<'a, S> {
    pub fn new(service: &'a S, config: &'a Config, progress: &'a dyn Progress) -> Self {
        Self {
            service,
            config,
            progress,
            cache: HashMap::new(),
        }
    }

    /// Light, population and built-up area within `radius_km` of `center`.
    ///
    /// Without a radius the configured default applies. A reduction that finds no
    /// qualifying pixels counts as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is invalid or a remote reduction fails
    pub async fn region_stats(&mut self, label: &str, center: Coordinate, radius_km: Option<f64>) -> Result<RegionStats> {
        let region =
            Region::around(center, radius_km, self.config.default_radius_km).into_app_err_with(|| format!("building the search area for {label}"))?;
        let Region::Disc { radius_km, .. } = region else {
            return Err(app_err!("search area for {label} is not a disc"));
        };

        let key = (center.lat().to_bits(), center.lon().to_bits(), radius_km.to_bits(), self.config.year);
        if let Some(stats) = self.cache.get(&key) {
            log::debug!("reusing statistics for {label} at {center}");
            return Ok(*stats);
        }

        self.progress.set_step(&format!("{label}: lights"));
        let sol = self
            .reduce(Layer::Radiance, &region, Mask::BuiltUp, self.config.light_scale_m)
            .await
            .into_app_err_with(|| format!("computing sum of lights for {label}"))?;

        self.progress.set_step(&format!("{label}: population"));
        let pop_strict = self
            .reduce(Layer::Population, &region, Mask::BuiltUp, self.config.population_scale_m)
            .await
            .into_app_err_with(|| format!("computing built-up population for {label}"))?;

        let metro = Mask::BuiltUpBuffered {
            meters: self.config.metro_buffer_m,
        };
        let pop_metro = self
            .reduce(Layer::Population, &region, metro, self.config.population_scale_m)
            .await
            .into_app_err_with(|| format!("computing metro population for {label}"))?;

        self.progress.set_step(&format!("{label}: built-up area"));
        let area_m2 = self
            .reduce(Layer::PixelArea, &region, Mask::BuiltUp, self.config.area_scale_m)
            .await
            .into_app_err_with(|| format!("computing built-up area for {label}"))?;

        let stats = RegionStats {
            sol,
            pop_strict,
            pop_metro,
            built_up_km2: area_m2 / M2_PER_KM2,
        };

        log::debug!("{label}: {stats:?}");
        let _ = self.cache.insert(key, stats);
        Ok(stats)
    }

    /// Mean radiance, area and normalized sum of lights for a whole country.
    ///
    /// # Errors
    ///
    /// Returns an error if the country name is blank, matches no boundary, or a remote call fails
    pub async fn national_stats(&self, country: &str) -> Result<NationalStats> {
        let region = Region::country(country)?;

        self.progress.set_step(&format!("{country}: national area"));
        let area_m2 = self
            .service
            .area(&region)
            .await
            .into_app_err_with(|| format!("computing national area for {country}"))?;

        // An unknown name selects no features, which Earth Engine answers with an empty geometry
        if !area_m2.is_finite() || area_m2 <= 0.0 {
            return Err(app_err!(
                "no national boundary named '{country}' in {}",
                self.config.datasets.boundaries.collection
            ));
        }

        self.progress.set_step(&format!("{country}: national lights"));
        let mean_radiance = self
            .service
            .reduce(&ReductionRequest {
                layer: Layer::Radiance,
                reducer: Reducer::Mean,
                region: region.clone(),
                mask: Mask::None,
                scale_m: self.config.national_scale_m,
            })
            .await
            .into_app_err_with(|| format!("computing national radiance for {country}"))?
            .unwrap_or(0.0);

        let stats = NationalStats::new(mean_radiance, area_m2);
        log::debug!("{country}: {stats:?}");
        Ok(stats)
    }

    async fn reduce(&self, layer: Layer, region: &Region, mask: Mask, scale_m: f64) -> Result<f64> {
        let request = ReductionRequest {
            layer,
            reducer: Reducer::Sum,
            region: region.clone(),
            mask,
            scale_m,
        };

        Ok(self.service.reduce(&request).await?.unwrap_or(0.0))
    }
}
