use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Geographic position in degrees with an optional altitude in meters.
///
/// Serialized as `[lat, lon]` or `[lat, lon, alt]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<f64>", try_from = "Vec<f64>")]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub alt: Option<f64>,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon, alt: None }
    }

    pub fn with_altitude(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt: Some(alt) }
    }

    /// Same horizontal position, altitude replaced.
    pub fn at_altitude(self, alt: f64) -> Self {
        Self { alt: Some(alt), ..self }
    }

    /// Horizontal position only.
    pub fn horizontal(self) -> Self {
        Self { alt: None, ..self }
    }

    pub fn same_position(&self, other: &GeoPoint) -> bool {
        self.lat == other.lat && self.lon == other.lon
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl From<GeoPoint> for Vec<f64> {
    fn from(p: GeoPoint) -> Self {
        match p.alt {
            Some(alt) => vec![p.lat, p.lon, alt],
            None => vec![p.lat, p.lon],
        }
    }
}

impl TryFrom<Vec<f64>> for GeoPoint {
    type Error = String;

    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        match v.as_slice() {
            [lat, lon] => Ok(GeoPoint::new(*lat, *lon)),
            [lat, lon, alt] => Ok(GeoPoint::with_altitude(*lat, *lon, *alt)),
            other => Err(format!("expected [lat, lon] or [lat, lon, alt], got {} values", other.len())),
        }
    }
}

/// Point in the projected (Web-Mercator) plane, meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: PlanarPoint) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product.
    pub fn cross(self, other: PlanarPoint) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: PlanarPoint) -> f64 {
        (self - other).norm()
    }

    /// Left-hand perpendicular.
    pub fn perp(self) -> PlanarPoint {
        PlanarPoint::new(-self.y, self.x)
    }
}

impl Add for PlanarPoint {
    type Output = PlanarPoint;
    fn add(self, rhs: PlanarPoint) -> PlanarPoint {
        PlanarPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PlanarPoint {
    type Output = PlanarPoint;
    fn sub(self, rhs: PlanarPoint) -> PlanarPoint {
        PlanarPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for PlanarPoint {
    type Output = PlanarPoint;
    fn mul(self, rhs: f64) -> PlanarPoint {
        PlanarPoint::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for PlanarPoint {
    type Output = PlanarPoint;
    fn neg(self) -> PlanarPoint {
        PlanarPoint::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_point_serializes_as_array() {
        let p = GeoPoint::with_altitude(1.5, 2.5, 500.0);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[1.5,2.5,500.0]");
        assert_eq!(serde_json::to_string(&p.horizontal()).unwrap(), "[1.5,2.5]");
    }

    #[test]
    fn geo_point_rejects_wrong_arity() {
        assert!(serde_json::from_str::<GeoPoint>("[1.0]").is_err());
        assert!(serde_json::from_str::<GeoPoint>("[1.0, 2.0, 3.0, 4.0]").is_err());
        let p: GeoPoint = serde_json::from_str("[1.0, 2.0]").unwrap();
        assert_eq!(p, GeoPoint::new(1.0, 2.0));
    }
}
