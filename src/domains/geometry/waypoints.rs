use super::polygon::{closed_edges, Polygon};
use super::projection::{project, unproject};
use super::types::{GeoPoint, PlanarPoint};
use crate::common::{GeometryError, GeometryResult};

/// Absorbs projection round-off so an exact multiple of the spacing is not
/// floored one short.
const COUNT_TOLERANCE: f64 = 1e-9;

/// Projected ring with cumulative arc lengths for linear referencing.
struct PlanarRing {
    points: Vec<PlanarPoint>,
    // cumulative[i] = arc length at points[i]; one extra entry for the closing vertex
    cumulative: Vec<f64>,
}

impl PlanarRing {
    fn from_polygon(polygon: &Polygon) -> GeometryResult<Self> {
        let points = polygon.projected()?;
        let mut cumulative = Vec::with_capacity(points.len() + 1);
        let mut total = 0.0;
        cumulative.push(total);
        for (a, b) in closed_edges(&points) {
            total += a.distance(b);
            cumulative.push(total);
        }
        Ok(Self { points, cumulative })
    }

    fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn edge(&self, i: usize) -> (PlanarPoint, PlanarPoint) {
        (self.points[i], self.points[(i + 1) % self.points.len()])
    }

    /// Arc length of the ring point closest to `p`.
    fn locate(&self, p: PlanarPoint) -> f64 {
        let mut best = (f64::INFINITY, 0.0);
        for i in 0..self.points.len() {
            let (a, b) = self.edge(i);
            let ab = b - a;
            let len_sq = ab.dot(ab);
            let t = if len_sq == 0.0 { 0.0 } else { ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0) };
            let closest = a + ab * t;
            let dist = p.distance(closest);
            if dist < best.0 {
                best = (dist, self.cumulative[i] + t * len_sq.sqrt());
            }
        }
        best.1
    }

    /// Point at arc length `distance`, wrapping around the ring.
    fn interpolate(&self, distance: f64) -> PlanarPoint {
        let length = self.length();
        if length == 0.0 {
            return self.points[0];
        }
        let d = distance.rem_euclid(length);
        let i = match self.cumulative.partition_point(|&c| c <= d) {
            0 => 0,
            k => (k - 1).min(self.points.len() - 1),
        };
        let (a, b) = self.edge(i);
        let edge_len = self.cumulative[i + 1] - self.cumulative[i];
        if edge_len == 0.0 {
            return a;
        }
        a + (b - a) * ((d - self.cumulative[i]) / edge_len)
    }
}

/// Evenly spaced patrol waypoints along the perimeter of `polygon`.
///
/// Emits `floor(perimeter / spacing)` points, the first one at the perimeter
/// point closest to `from`, continuing in ring order and wrapping past the
/// closing vertex. Every waypoint carries `altitude`.
pub fn generate_waypoints(
    polygon: &Polygon,
    from: &GeoPoint,
    spacing: f64,
    altitude: f64,
) -> GeometryResult<Vec<GeoPoint>> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(GeometryError::InvalidSpacing { spacing });
    }

    let ring = PlanarRing::from_polygon(polygon)?;
    let count = (ring.length() / spacing + COUNT_TOLERANCE).floor() as usize;
    if count == 0 {
        return Ok(Vec::new());
    }

    let start = ring.locate(project(from)?);
    Ok((0..count)
        .map(|i| unproject(ring.interpolate(start + i as f64 * spacing)).at_altitude(altitude))
        .collect())
}

/// `count` points spread evenly over the whole perimeter, starting at the first vertex.
pub fn spread_points(polygon: &Polygon, count: usize, altitude: f64) -> GeometryResult<Vec<GeoPoint>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let ring = PlanarRing::from_polygon(polygon)?;
    let step = ring.length() / count as f64;
    Ok((0..count)
        .map(|i| unproject(ring.interpolate(i as f64 * step)).at_altitude(altitude))
        .collect())
}
