use serde::{Deserialize, Serialize};

/// An Earth Engine image collection and the band read from it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    pub collection: String,
    pub band: String,
}

impl Dataset {
    fn new(collection: &str, band: &str) -> Self {
        Self {
            collection: collection.to_string(),
            band: band.to_string(),
        }
    }
}

/// The feature collection holding national boundary polygons.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Boundaries {
    pub collection: String,

    /// Feature property matched against the country name
    pub name_property: String,
}

impl Default for Boundaries {
    fn default() -> Self {
        Self {
            collection: "USDOS/LSIB_SIMPLE/2017".to_string(),
            name_property: "country_na".to_string(),
        }
    }
}

/// Public datasets queried by the metric extractor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Datasets {
    /// Nighttime radiance composites
    #[serde(default = "default_radiance")]
    pub radiance: Dataset,

    /// Gridded population counts
    #[serde(default = "default_population")]
    pub population: Dataset,

    /// Land-cover classification
    #[serde(default = "default_landcover")]
    pub landcover: Dataset,

    /// National boundaries
    #[serde(default)]
    pub boundaries: Boundaries,
}

fn default_radiance() -> Dataset {
    Dataset::new("NOAA/VIIRS/DNB/MONTHLY_V1/VCMCFG", "avg_rad")
}

fn default_population() -> Dataset {
    Dataset::new("WorldPop/GP/100m/pop", "population")
}

fn default_landcover() -> Dataset {
    Dataset::new("ESA/WorldCover/v200", "Map")
}

impl Default for Datasets {
    fn default() -> Self {
        Self {
            radiance: default_radiance(),
            population: default_population(),
            landcover: default_landcover(),
            boundaries: Boundaries::default(),
        }
    }
}

impl Datasets {
    /// Names of any collection ids or bands left empty.
    pub(crate) fn empty_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("datasets.radiance.collection", &self.radiance.collection),
            ("datasets.radiance.band", &self.radiance.band),
            ("datasets.population.collection", &self.population.collection),
            ("datasets.population.band", &self.population.band),
            ("datasets.landcover.collection", &self.landcover.collection),
            ("datasets.landcover.band", &self.landcover.band),
            ("datasets.boundaries.collection", &self.boundaries.collection),
            ("datasets.boundaries.name_property", &self.boundaries.name_property),
        ];

        fields
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}
