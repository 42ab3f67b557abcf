//! Tectonic plate geometry
//!
//! Plates and plate boundaries are read from a GeoJSON FeatureCollection:
//! - `Polygon` / `MultiPolygon` features are plates, named by `properties.name`
//! - `LineString` / `MultiLineString` features are boundaries, with an
//!   optional `properties.kind` (e.g. "convergent")
//!
//! [`PlateCache`] loads the catalog once per process and is shared by the
//! processor. There is no eviction.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use geojson::{Feature, GeoJson, Value};

use crate::error::StressError;
use crate::geo::{distance_to_line_string_km, point_in_polygon};
use crate::types::{GeoPoint, TectonicContext};

/// Rings of `(lon, lat)` vertices; the first ring is the outer boundary
type Rings = Vec<Vec<(f64, f64)>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Plate {
    pub name: String,
    polygons: Vec<Rings>,
}

impl Plate {
    /// Inside an outer ring and outside all of that polygon's holes
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.polygons.iter().any(|rings| {
            let mut rings = rings.iter();
            let Some(outer) = rings.next() else {
                return false;
            };
            point_in_polygon(point.latitude, point.longitude, outer)
                && !rings.any(|hole| point_in_polygon(point.latitude, point.longitude, hole))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlateBoundary {
    pub name: String,
    pub kind: Option<String>,
    lines: Vec<Vec<(f64, f64)>>,
}

impl PlateBoundary {
    pub fn distance_km(&self, point: GeoPoint) -> Option<f64> {
        self.lines
            .iter()
            .filter_map(|line| distance_to_line_string_km(point.latitude, point.longitude, line))
            .reduce(f64::min)
    }
}

/// Parsed plate polygons and boundary lines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlateCatalog {
    plates: Vec<Plate>,
    boundaries: Vec<PlateBoundary>,
}

impl PlateCatalog {
    pub fn from_geojson(raw: &str) -> Result<Self, StressError> {
        let geojson: GeoJson = raw
            .parse()
            .map_err(|e: geojson::Error| StressError::ParseError(format!("plate GeoJSON: {e}")))?;

        let features = match geojson {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(StressError::ParseError(
                    "plate GeoJSON must be a Feature or FeatureCollection".to_string(),
                ))
            }
        };

        let mut catalog = PlateCatalog::default();
        for (index, feature) in features.iter().enumerate() {
            catalog.add_feature(index, feature);
        }

        log::debug!(
            "Plate catalog: {} plates, {} boundaries",
            catalog.plates.len(),
            catalog.boundaries.len()
        );
        Ok(catalog)
    }

    fn add_feature(&mut self, index: usize, feature: &Feature) {
        let Some(geometry) = feature.geometry.as_ref() else {
            return;
        };
        let name = string_property(feature, "name").unwrap_or_else(|| format!("feature-{index}"));

        match &geometry.value {
            Value::Polygon(rings) => self.plates.push(Plate {
                name,
                polygons: vec![to_rings(rings)],
            }),
            Value::MultiPolygon(polygons) => self.plates.push(Plate {
                name,
                polygons: polygons.iter().map(|p| to_rings(p)).collect(),
            }),
            Value::LineString(line) => self.boundaries.push(PlateBoundary {
                name,
                kind: string_property(feature, "kind"),
                lines: vec![to_vertices(line)],
            }),
            Value::MultiLineString(lines) => self.boundaries.push(PlateBoundary {
                name,
                kind: string_property(feature, "kind"),
                lines: lines.iter().map(|l| to_vertices(l)).collect(),
            }),
            _ => log::debug!("Skipping unsupported plate geometry in feature {index}"),
        }
    }

    pub fn plates(&self) -> &[Plate] {
        &self.plates
    }

    pub fn boundaries(&self) -> &[PlateBoundary] {
        &self.boundaries
    }

    /// First plate whose polygon contains `point`
    pub fn plate_at(&self, point: GeoPoint) -> Option<&Plate> {
        self.plates.iter().find(|plate| plate.contains(point))
    }

    /// Closest boundary and its approximate distance
    pub fn nearest_boundary(&self, point: GeoPoint) -> Option<(&PlateBoundary, f64)> {
        self.boundaries
            .iter()
            .filter_map(|b| b.distance_km(point).map(|d| (b, d)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn tectonic_context(&self, point: GeoPoint) -> TectonicContext {
        let nearest = self.nearest_boundary(point);
        TectonicContext {
            plate: self.plate_at(point).map(|p| p.name.clone()),
            nearest_boundary: nearest.map(|(b, _)| b.name.clone()),
            boundary_distance_km: nearest.map(|(_, d)| d),
        }
    }
}

fn string_property(feature: &Feature, key: &str) -> Option<String> {
    feature
        .property(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn to_vertices(positions: &[Vec<f64>]) -> Vec<(f64, f64)> {
    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| (p[0], p[1]))
        .collect()
}

fn to_rings(rings: &[Vec<Vec<f64>>]) -> Rings {
    rings.iter().map(|ring| to_vertices(ring)).collect()
}

enum PlateSource {
    File(PathBuf),
    Inline(String),
}

/// Load-once plate catalog
pub struct PlateCache {
    source: PlateSource,
    catalog: OnceLock<PlateCatalog>,
}

impl PlateCache {
    /// Cache backed by a GeoJSON file, read on first use
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            source: PlateSource::File(path.as_ref().to_path_buf()),
            catalog: OnceLock::new(),
        }
    }

    /// Cache backed by an in-memory GeoJSON document
    pub fn from_geojson_str(raw: impl Into<String>) -> Self {
        Self {
            source: PlateSource::Inline(raw.into()),
            catalog: OnceLock::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.get().is_some()
    }

    /// The catalog, loading it on first call
    ///
    /// A failed load is not cached; the next call retries.
    pub fn get_or_load(&self) -> Result<&PlateCatalog, StressError> {
        if let Some(catalog) = self.catalog.get() {
            return Ok(catalog);
        }

        let catalog = match &self.source {
            PlateSource::File(path) => {
                log::info!("Loading plate geometry from {}", path.display());
                PlateCatalog::from_geojson(&fs::read_to_string(path)?)?
            }
            PlateSource::Inline(raw) => PlateCatalog::from_geojson(raw)?,
        };
        Ok(self.catalog.get_or_init(|| catalog))
    }

    pub fn tectonic_context(&self, point: GeoPoint) -> Result<TectonicContext, StressError> {
        Ok(self.get_or_load()?.tectonic_context(point))
    }
}
