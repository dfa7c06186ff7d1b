use crate::common::{DomainError, DomainResult};
use crate::domains::fleet::ports::GeofenceSource;
use geojson::{GeoJson, Geometry, Value};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Reads geofences from GeoJSON files below a base directory.
///
/// Base precedence: explicit argument -> GEOFENCE_DATA_DIR -> current directory.
pub struct FilesystemGeofenceSource {
    base: PathBuf,
}

impl FilesystemGeofenceSource {
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.unwrap_or_else(|| match env::var("GEOFENCE_DATA_DIR") {
            Ok(v) => PathBuf::from(v),
            Err(_) => PathBuf::from("."),
        });
        Self { base }
    }
}

impl GeofenceSource for FilesystemGeofenceSource {
    /// `name` is resolved against the base directory; absolute paths are used as is.
    fn load_geofence(&self, name: &str) -> DomainResult<Vec<Vec<f64>>> {
        let path = self.base.join(name);
        let content = fs::read_to_string(&path)
            .map_err(|e| DomainError::InfrastructureError(format!("{}: {}", path.display(), e)))?;
        parse_geofence_geojson(&content)
    }
}

/// Exterior ring of the first polygon in a GeoJSON document as `[lat, lon]` pairs.
///
/// GeoJSON positions are `[lon, lat]`; they are swapped on the way out.
pub fn parse_geofence_geojson(content: &str) -> DomainResult<Vec<Vec<f64>>> {
    let geojson: GeoJson = content
        .parse()
        .map_err(|e| DomainError::InfrastructureError(format!("invalid GeoJSON: {}", e)))?;

    let ring = match &geojson {
        GeoJson::Geometry(geometry) => exterior_ring(geometry),
        GeoJson::Feature(feature) => feature.geometry.as_ref().and_then(exterior_ring),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .find_map(exterior_ring),
    }
    .ok_or_else(|| DomainError::Validation {
        reason: "GeoJSON document contains no polygon".to_string(),
    })?;

    ring.iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok(vec![*lat, *lon]),
            _ => Err(DomainError::Validation {
                reason: "GeoJSON position needs longitude and latitude".to_string(),
            }),
        })
        .collect()
}

fn exterior_ring(geometry: &Geometry) -> Option<&Vec<Vec<f64>>> {
    match &geometry.value {
        Value::Polygon(rings) => rings.first(),
        Value::MultiPolygon(polygons) => polygons.first().and_then(|rings| rings.first()),
        _ => None,
    }
}
