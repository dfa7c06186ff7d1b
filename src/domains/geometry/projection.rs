//! Spherical Web-Mercator (EPSG:3857) transforms between geographic and planar
//! coordinates. All offset and spacing distances in this crate are expressed in
//! this planar frame.

use super::types::{GeoPoint, PlanarPoint};
use crate::common::{GeometryError, GeometryResult};
use std::f64::consts::FRAC_PI_4;

/// WGS84 semi-major axis used by the spherical Mercator.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude at which the projected plane becomes square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

pub fn project(point: &GeoPoint) -> GeometryResult<PlanarPoint> {
    if !point.is_finite() {
        return Err(GeometryError::NonFiniteCoordinate { lat: point.lat, lon: point.lon });
    }
    if point.lat.abs() > MAX_LATITUDE || point.lon.abs() > 180.0 {
        return Err(GeometryError::OutOfProjectionRange { lat: point.lat, lon: point.lon });
    }

    let x = EARTH_RADIUS_M * point.lon.to_radians();
    let y = EARTH_RADIUS_M * (FRAC_PI_4 + point.lat.to_radians() / 2.0).tan().ln();
    Ok(PlanarPoint::new(x, y))
}

pub fn unproject(point: PlanarPoint) -> GeoPoint {
    let lon = (point.x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (point.y / EARTH_RADIUS_M).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
    GeoPoint::new(lat, lon)
}

pub fn project_all<'a, I>(points: I) -> GeometryResult<Vec<PlanarPoint>>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    points.into_iter().map(project).collect()
}
