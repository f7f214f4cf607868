//! Lowering of reduction requests into Earth Engine expression graphs.

use super::{Layer, Mask, ReductionRequest, Reducer};
use crate::config::{Config, Datasets};
use crate::regions::Region;
use serde_json::{Value, json};

/// Name of the band produced by `Image.pixelArea`.
const PIXEL_AREA_BAND: &str = "area";

/// Builds `value:compute` request bodies for the configured datasets and years.
#[derive(Debug, Clone)]
pub struct ExpressionBuilder {
    datasets: Datasets,
    year: i32,
    population_year: i32,
    landcover_year: i32,
    built_up_class: u32,
    max_pixels: f64,
}

impl ExpressionBuilder {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            datasets: config.datasets.clone(),
            year: config.year,
            population_year: config.population_year,
            landcover_year: config.landcover_year,
            built_up_class: config.built_up_class,
            max_pixels: config.max_pixels,
        }
    }

    /// Request body computing one reduction and extracting its scalar.
    #[must_use]
    pub fn reduction(&self, request: &ReductionRequest) -> Value {
        let geometry = self.geometry(&request.region);
        let (image, band) = self.layer(request.layer);

        let image = match request.mask {
            Mask::None => image,
            Mask::BuiltUp => update_mask(image, self.built_up(&geometry)),
            Mask::BuiltUpBuffered { meters } => update_mask(image, dilate(self.built_up(&geometry), meters)),
        };

        let reducer = match request.reducer {
            Reducer::Sum => invoke("Reducer.sum", json!({})),
            Reducer::Mean => invoke("Reducer.mean", json!({})),
        };

        let stats = invoke(
            "Image.reduceRegion",
            json!({
                "image": image,
                "reducer": reducer,
                "geometry": geometry,
                "scale": constant(request.scale_m),
                "maxPixels": constant(self.max_pixels),
            }),
        );

        graph(invoke(
            "Dictionary.get",
            json!({
                "dictionary": stats,
                "key": constant(band),
            }),
        ))
    }

    /// Request body computing the area (m²) of a region's geometry.
    #[must_use]
    pub fn area(&self, region: &Region) -> Value {
        graph(invoke(
            "Geometry.area",
            json!({
                "geometry": self.geometry(region),
            }),
        ))
    }

    fn geometry(&self, region: &Region) -> Value {
        match region {
            Region::Disc { center, radius_km } => invoke(
                "Geometry.buffer",
                json!({
                    "geometry": invoke(
                        "GeometryConstructors.Point",
                        json!({ "coordinates": constant(json!([center.lon(), center.lat()])) }),
                    ),
                    "distance": constant(radius_km * 1000.0),
                }),
            ),
            Region::Country { name } => {
                let boundaries = &self.datasets.boundaries;
                invoke(
                    "Collection.geometry",
                    json!({
                        "collection": filter(
                            invoke("Collection.loadTable", json!({ "tableId": constant(boundaries.collection.as_str()) })),
                            invoke(
                                "Filter.equals",
                                json!({
                                    "leftField": constant(boundaries.name_property.as_str()),
                                    "rightValue": constant(name.as_str()),
                                }),
                            ),
                        ),
                    }),
                )
            }
        }
    }

    /// The image for a layer and the band name its reduction is keyed by.
    fn layer(&self, layer: Layer) -> (Value, &str) {
        match layer {
            Layer::Radiance => {
                let dataset = &self.datasets.radiance;
                let composites = filter(load_collection(&dataset.collection), date_range_filter(self.year));
                let annual = invoke("reduce.mean", json!({ "collection": composites }));
                (select(annual, &dataset.band), dataset.band.as_str())
            }
            Layer::Population => {
                let dataset = &self.datasets.population;
                let grids = filter(
                    load_collection(&dataset.collection),
                    invoke(
                        "Filter.equals",
                        json!({
                            "leftField": constant("year"),
                            "rightValue": constant(self.population_year),
                        }),
                    ),
                );
                let mosaic = invoke("ImageCollection.mosaic", json!({ "collection": grids }));
                (select(mosaic, &dataset.band), dataset.band.as_str())
            }
            Layer::PixelArea => (invoke("Image.pixelArea", json!({})), PIXEL_AREA_BAND),
        }
    }

    /// A 0/1 image marking built-up land cover, clipped to `geometry`.
    fn built_up(&self, geometry: &Value) -> Value {
        let dataset = &self.datasets.landcover;
        let classification = invoke(
            "Collection.first",
            json!({
                "collection": filter(load_collection(&dataset.collection), date_range_filter(self.landcover_year)),
            }),
        );

        let is_built_up = invoke(
            "Image.eq",
            json!({
                "image1": select(classification, &dataset.band),
                "image2": invoke("Image.constant", json!({ "value": constant(self.built_up_class) })),
            }),
        );

        invoke(
            "Image.clip",
            json!({
                "input": is_built_up,
                "geometry": geometry,
            }),
        )
    }
}

fn graph(root: Value) -> Value {
    json!({
        "expression": {
            "result": "0",
            "values": { "0": root },
        }
    })
}

fn invoke(function_name: &str, arguments: Value) -> Value {
    json!({
        "functionInvocationValue": {
            "functionName": function_name,
            "arguments": arguments,
        }
    })
}

fn constant(value: impl Into<Value>) -> Value {
    json!({ "constantValue": value.into() })
}

fn load_collection(id: &str) -> Value {
    invoke("ImageCollection.load", json!({ "id": constant(id) }))
}

fn filter(collection: Value, filter: Value) -> Value {
    invoke(
        "Collection.filter",
        json!({
            "collection": collection,
            "filter": filter,
        }),
    )
}

/// Matches images whose start time falls inside `year`.
fn date_range_filter(year: i32) -> Value {
    invoke(
        "Filter.dateRangeContains",
        json!({
            "leftValue": invoke(
                "DateRange",
                json!({
                    "start": constant(format!("{year}-01-01")),
                    "end": constant(format!("{year}-12-31")),
                }),
            ),
            "rightField": constant("system:time_start"),
        }),
    )
}

fn select(image: Value, band: &str) -> Value {
    invoke(
        "Image.select",
        json!({
            "input": image,
            "bandSelectors": constant(json!([band])),
        }),
    )
}

fn update_mask(image: Value, mask: Value) -> Value {
    invoke(
        "Image.updateMask",
        json!({
            "image": image,
            "mask": mask,
        }),
    )
}

fn dilate(mask: Value, meters: f64) -> Value {
    invoke(
        "Image.focal_max",
        json!({
            "image": mask,
            "radius": constant(meters),
            "kernelType": constant("circle"),
            "units": constant("meters"),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::Coordinate;

    fn builder() -> ExpressionBuilder {
        ExpressionBuilder::from_config(&Config::default())
    }

    fn disc() -> Region {
        Region::disc(Coordinate::new(6.5, 3.25).unwrap(), 50.0).unwrap()
    }

    fn root(body: &Value) -> &Value {
        &body["expression"]["values"]["0"]["functionInvocationValue"]
    }

    /// Collect every function name in the graph, depth first.
    fn function_names(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(name)) = map.get("functionName") {
                    out.push(name.clone());
                }
                for v in map.values() {
                    function_names(v, out);
                }
            }
            Value::Array(items) => {
                for v in items {
                    function_names(v, out);
                }
            }
            _ => {}
        }
    }

    fn names(body: &Value) -> Vec<String> {
        let mut out = Vec::new();
        function_names(body, &mut out);
        out
    }

    #[test]
    fn test_graph_shape() {
        let body = builder().area(&disc());
        assert_eq!(body["expression"]["result"], "0");
        assert_eq!(root(&body)["functionName"], "Geometry.area");
    }

    #[test]
    fn test_disc_geometry_is_buffered_point() {
        let body = builder().area(&disc());
        let buffer = &root(&body)["arguments"]["geometry"]["functionInvocationValue"];
        assert_eq!(buffer["functionName"], "Geometry.buffer");
        assert_eq!(buffer["arguments"]["distance"]["constantValue"], json!(50_000.0));

        let point = &buffer["arguments"]["geometry"]["functionInvocationValue"];
        assert_eq!(point["functionName"], "GeometryConstructors.Point");
        // Earth Engine points are [lon, lat]
        assert_eq!(point["arguments"]["coordinates"]["constantValue"], json!([3.25, 6.5]));
    }

    #[test]
    fn test_country_geometry_filters_boundaries() {
        let body = builder().area(&Region::country("Nigeria").unwrap());
        let text = body.to_string();
        assert!(text.contains("USDOS/LSIB_SIMPLE/2017"));
        assert!(text.contains("\"country_na\""));
        assert!(text.contains("\"Nigeria\""));
        assert_eq!(
            names(&body),
            vec!["Geometry.area", "Collection.geometry", "Collection.filter", "Collection.loadTable", "Filter.equals"]
        );
    }

    #[test]
    fn test_strict_light_sum() {
        let request = ReductionRequest {
            layer: Layer::Radiance,
            reducer: Reducer::Sum,
            region: disc(),
            mask: Mask::BuiltUp,
            scale_m: 500.0,
        };

        let body = builder().reduction(&request);
        let get = root(&body);
        assert_eq!(get["functionName"], "Dictionary.get");
        assert_eq!(get["arguments"]["key"]["constantValue"], "avg_rad");

        let reduce = &get["arguments"]["dictionary"]["functionInvocationValue"];
        assert_eq!(reduce["functionName"], "Image.reduceRegion");
        assert_eq!(reduce["arguments"]["scale"]["constantValue"], json!(500.0));
        assert_eq!(reduce["arguments"]["maxPixels"]["constantValue"], json!(1e10));
        assert_eq!(reduce["arguments"]["reducer"]["functionInvocationValue"]["functionName"], "Reducer.sum");

        let all = names(&body);
        assert!(all.contains(&"Image.updateMask".to_string()));
        assert!(all.contains(&"Image.eq".to_string()));
        assert!(all.contains(&"reduce.mean".to_string()));
        assert!(!all.contains(&"Image.focal_max".to_string()));

        let text = body.to_string();
        assert!(text.contains("NOAA/VIIRS/DNB/MONTHLY_V1/VCMCFG"));
        assert!(text.contains("2023-01-01"));
        assert!(text.contains("ESA/WorldCover/v200"));
        assert!(text.contains("2021-01-01"));
    }

    #[test]
    fn test_metro_population_dilates_mask() {
        let request = ReductionRequest {
            layer: Layer::Population,
            reducer: Reducer::Sum,
            region: disc(),
            mask: Mask::BuiltUpBuffered { meters: 2000.0 },
            scale_m: 100.0,
        };

        let body = builder().reduction(&request);
        assert_eq!(root(&body)["arguments"]["key"]["constantValue"], "population");

        let text = body.to_string();
        assert!(text.contains("Image.focal_max"));
        assert!(text.contains("\"circle\""));
        assert!(text.contains("WorldPop/GP/100m/pop"));
        assert!(names(&body).contains(&"ImageCollection.mosaic".to_string()));
    }

    #[test]
    fn test_pixel_area_key() {
        let request = ReductionRequest {
            layer: Layer::PixelArea,
            reducer: Reducer::Sum,
            region: disc(),
            mask: Mask::BuiltUp,
            scale_m: 100.0,
        };

        let body = builder().reduction(&request);
        assert_eq!(root(&body)["arguments"]["key"]["constantValue"], "area");
        assert!(names(&body).contains(&"Image.pixelArea".to_string()));
    }

    #[test]
    fn test_unmasked_national_mean() {
        let request = ReductionRequest {
            layer: Layer::Radiance,
            reducer: Reducer::Mean,
            region: Region::country("Chile").unwrap(),
            mask: Mask::None,
            scale_m: 5000.0,
        };

        let body = builder().reduction(&request);
        let all = names(&body);
        assert!(all.contains(&"Reducer.mean".to_string()));
        assert!(!all.contains(&"Image.updateMask".to_string()));
        assert!(!all.contains(&"Image.eq".to_string()));
    }

    #[test]
    fn test_configured_years_are_used() {
        let config = Config {
            year: 2019,
            population_year: 2015,
            landcover_year: 2020,
            ..Config::default()
        };
        let request = ReductionRequest {
            layer: Layer::Population,
            reducer: Reducer::Sum,
            region: disc(),
            mask: Mask::BuiltUp,
            scale_m: 100.0,
        };

        let body = ExpressionBuilder::from_config(&config).reduction(&request);
        let text = body.to_string();
        assert!(text.contains("\"rightValue\":{\"constantValue\":2015}"));
        assert!(text.contains("2020-01-01"));
    }
}
