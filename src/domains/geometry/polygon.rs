use super::projection::{project, project_all, unproject};
use super::types::{GeoPoint, PlanarPoint};
use crate::common::{GeometryError, GeometryResult};
use serde::Serialize;

/// Below this length a bisector is treated as vanishing (straight vertex).
const BISECTOR_EPSILON: f64 = 1e-12;

/// Area below this fraction of the squared perimeter counts as collinear.
const AREA_EPSILON: f64 = 1e-12;

/// Closed polygon ring in geographic coordinates.
///
/// The stored ring always repeats its first vertex at the end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Polygon {
    ring: Vec<GeoPoint>,
}

impl Polygon {
    /// Builds a polygon from an ordered vertex list, closing the ring if needed.
    ///
    /// Every vertex must be projectable and at least three of them must be
    /// distinct. Self-intersection is not checked.
    pub fn new(points: Vec<GeoPoint>) -> GeometryResult<Self> {
        for p in &points {
            project(p)?;
        }

        let mut ring: Vec<GeoPoint> = points.into_iter().map(GeoPoint::horizontal).collect();
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last()) {
            if !first.same_position(last) {
                ring.push(first);
            }
        }

        let count = distinct_vertex_count(&ring);
        if count < 3 {
            return Err(GeometryError::TooFewVertices { count });
        }
        Ok(Self { ring })
    }

    /// Closed ring, first vertex repeated at the end.
    pub fn ring(&self) -> &[GeoPoint] {
        &self.ring
    }

    /// Vertices without the closing repeat.
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.ring[..self.ring.len() - 1]
    }

    pub fn vertex_count(&self) -> usize {
        self.ring.len() - 1
    }

    pub fn is_closed(&self) -> bool {
        match (self.ring.first(), self.ring.last()) {
            (Some(first), Some(last)) => first.same_position(last),
            _ => false,
        }
    }

    /// Open ring in the planar frame.
    pub fn projected(&self) -> GeometryResult<Vec<PlanarPoint>> {
        project_all(self.vertices())
    }

    /// Planar perimeter in meters.
    pub fn perimeter(&self) -> GeometryResult<f64> {
        let pts = self.projected()?;
        Ok(closed_edges(&pts).map(|(a, b)| a.distance(b)).sum())
    }

    /// Even-odd test in the planar frame. Points on the boundary may go either way.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        let (Ok(pts), Ok(p)) = (self.projected(), project(point)) else {
            return false;
        };

        planar_contains(&pts, p)
    }
}

/// Builds a polygon from an ordered vertex list.
pub fn build_polygon(points: Vec<GeoPoint>) -> GeometryResult<Polygon> {
    Polygon::new(points)
}

/// Insets `polygon` by `distance` meters using the angle-bisector method.
///
/// Each vertex moves along the bisector of its two edges by
/// `distance / sin(θ/2)`, θ being the angle between the edges. Vertices with a
/// zero-length adjacent edge are dropped rather than offset, so the result can
/// have fewer vertices than the input.
///
/// Fails with `InsetTooLarge` when the offset vertices cross over: an edge
/// reverses its direction or a vertex ends up outside `polygon`.
pub fn shrink_polygon(polygon: &Polygon, distance: f64) -> GeometryResult<Polygon> {
    let pts = polygon.projected()?;
    let area = signed_area(&pts);
    let perimeter: f64 = closed_edges(&pts).map(|(a, b)| a.distance(b)).sum();
    if area.abs() <= AREA_EPSILON * perimeter * perimeter {
        return Err(GeometryError::ZeroArea);
    }
    let orientation = area.signum();

    let n = pts.len();
    let mut shrunk: Vec<(usize, PlanarPoint)> = Vec::with_capacity(n);
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let cur = pts[i];
        let next = pts[(i + 1) % n];

        let v1 = prev - cur;
        let v2 = next - cur;
        let (len1, len2) = (v1.norm(), v2.norm());
        if len1 == 0.0 || len2 == 0.0 {
            continue;
        }
        let u1 = v1 * (1.0 / len1);
        let u2 = v2 * (1.0 / len2);

        let sum = u1 + u2;
        let offset = if sum.norm() < BISECTOR_EPSILON {
            // straight vertex: the bisector is the inward edge normal
            u2.perp() * (orientation * distance)
        } else {
            let mut bisector = sum * (1.0 / sum.norm());
            // reflex vertex: the bisector of the edge vectors points outward
            if (cur - prev).cross(next - cur) * orientation < 0.0 {
                bisector = -bisector;
            }
            let theta = u1.dot(u2).clamp(-1.0, 1.0).acos();
            bisector * (distance / (theta / 2.0).sin())
        };
        shrunk.push((i, cur + offset));
    }

    if shrunk.len() >= 3 {
        let m = shrunk.len();
        for k in 0..m {
            let (from, a) = shrunk[k];
            let (to, b) = shrunk[(k + 1) % m];
            if (b - a).dot(pts[to] - pts[from]) <= 0.0 || !planar_contains(&pts, a) {
                return Err(GeometryError::InsetTooLarge { distance });
            }
        }
    }

    Polygon::new(shrunk.into_iter().map(|(_, p)| unproject(p)).collect())
}

/// Shoelace area of an open ring; positive when counter-clockwise.
pub(crate) fn signed_area(pts: &[PlanarPoint]) -> f64 {
    closed_edges(pts).map(|(a, b)| a.cross(b)).sum::<f64>() / 2.0
}

/// Even-odd ray casting against an open planar ring.
fn planar_contains(pts: &[PlanarPoint], p: PlanarPoint) -> bool {
    let mut inside = false;
    for (a, b) in closed_edges(pts) {
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
    }
    inside
}

/// Edges of an open ring including the closing edge.
pub(crate) fn closed_edges(pts: &[PlanarPoint]) -> impl Iterator<Item = (PlanarPoint, PlanarPoint)> + '_ {
    let n = pts.len();
    (0..n).map(move |i| (pts[i], pts[(i + 1) % n]))
}

fn distinct_vertex_count(ring: &[GeoPoint]) -> usize {
    let mut distinct: Vec<&GeoPoint> = Vec::new();
    for p in ring {
        if !distinct.iter().any(|d| d.same_position(p)) {
            distinct.push(p);
        }
    }
    distinct.len()
}
