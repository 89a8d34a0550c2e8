//! Footprint polygons.
//!
//! A [`Polygon`] is an ordered loop of 2-D points used for ground plans,
//! module footprints and parcels. The last point connects back to the
//! first; no explicit closing point is stored.

use nalgebra::{Point2, Vector2};
use rand::Rng;

use super::intersect::rotate_deg;

/// An ordered 2-D point loop with a derived bounding box.
#[derive(Debug, Clone)]
pub struct Polygon {
    points: Vec<Point2<f64>>,
    min: Point2<f64>,
    max: Point2<f64>,
}

impl Polygon {
    /// Create a polygon from an ordered point loop.
    ///
    /// # Panics
    /// Panics if fewer than 3 points are given.
    pub fn new(points: Vec<Point2<f64>>) -> Self {
        assert!(points.len() >= 3, "polygon needs at least 3 points");
        let mut min = points[0];
        let mut max = points[0];
        for p in &points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Self { points, min, max }
    }

    /// Axis-aligned rectangle with corners `(0, 0)` and `(length, width)`.
    pub fn rectangle(length: f64, width: f64) -> Self {
        Self::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(length, 0.0),
            Point2::new(length, width),
            Point2::new(0.0, width),
        ])
    }

    /// The ordered point loop.
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Number of points in the loop.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polygon has no points. Always false for a constructed
    /// polygon; present for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Minimum corner of the bounding box.
    pub fn min(&self) -> Point2<f64> {
        self.min
    }

    /// Maximum corner of the bounding box.
    pub fn max(&self) -> Point2<f64> {
        self.max
    }

    /// Width and height of the bounding box.
    pub fn dimensions(&self) -> Vector2<f64> {
        self.max - self.min
    }

    /// The edge from point `i` to point `i + 1` (wrapping), as a pair.
    pub fn edge(&self, i: usize) -> (Point2<f64>, Point2<f64>) {
        let next = if i + 1 == self.points.len() { 0 } else { i + 1 };
        (self.points[i], self.points[next])
    }

    /// Planar UVs for each point, offset to the bounding-box minimum and
    /// scaled by `scale`. With `flip` the u coordinate is mirrored so a
    /// face built with reversed winding keeps an unmirrored texture.
    pub fn uvs(&self, scale: f64, flip: bool) -> Vec<Point2<f64>> {
        self.points
            .iter()
            .map(|p| {
                let u = if flip { self.max.x - p.x } else { p.x - self.min.x };
                let v = p.y - self.min.y;
                Point2::new(u * scale, v * scale)
            })
            .collect()
    }

    /// Generate a randomized polygon: a random rectangle deformed by 0-1
    /// pre-nudges, 0-3 extrusions and 0-1 post-nudges.
    ///
    /// The generated loop is not checked for self-intersection; downstream
    /// triangulation can fail on a degenerate result. This mirrors the
    /// behavior the dungeon generators are tuned against.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let length = rng.gen_range(5.0..15.0);
        let width = rng.gen_range(5.0..15.0);
        let mut points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(length, 0.0),
            Point2::new(length, width),
            Point2::new(0.0, width),
        ];

        for _ in 0..rng.gen_range(0..2) {
            nudge(rng, &mut points);
        }

        let mut forbidden_split_points: Vec<Point2<f64>> = Vec::new();
        for _ in 0..rng.gen_range(0..4) {
            extrude(rng, &mut points, &mut forbidden_split_points);
        }

        for _ in 0..rng.gen_range(0..2) {
            nudge(rng, &mut points);
        }

        Self::new(points)
    }
}

const MAX_NUDGE: f64 = 2.5;
const MIN_EXTRUDE: f64 = 5.0;
const MAX_EXTRUDE: f64 = 10.0;

/// Perturb one random vertex along x, y or both.
fn nudge<R: Rng + ?Sized>(rng: &mut R, points: &mut [Point2<f64>]) {
    let index = rng.gen_range(0..points.len());
    let mut point = points[index];

    let direction: f64 = rng.gen();
    if direction < 0.33 {
        point.x += rng.gen_range(-MAX_NUDGE..MAX_NUDGE);
    } else if direction < 0.66 {
        point.y += rng.gen_range(-MAX_NUDGE..MAX_NUDGE);
    } else {
        point.x += rng.gen_range(-MAX_NUDGE..MAX_NUDGE);
        point.y += rng.gen_range(-MAX_NUDGE..MAX_NUDGE);
    }

    points[index] = point;
}

/// Split a random edge and push its first half outward, inserting an
/// L-shaped notch of 3 new points. The split point joins the forbidden set
/// so the same spot is never extruded twice.
fn extrude<R: Rng + ?Sized>(
    rng: &mut R,
    points: &mut Vec<Point2<f64>>,
    forbidden: &mut Vec<Point2<f64>>,
) {
    let mut index = rng.gen_range(0..points.len());
    while forbidden.contains(&points[index]) {
        index = rng.gen_range(0..points.len());
    }

    let next_index = if index == points.len() - 1 { 0 } else { index + 1 };
    let start = points[index];
    let edge = points[next_index] - start;

    let split_ratio = rng.gen_range(0.35..0.65);
    let split_point = start + split_ratio * edge;

    let extrude_length = rng.gen_range(MIN_EXTRUDE..MAX_EXTRUDE);
    let outward = rotate_deg(edge, -90.0).normalize() * extrude_length;

    points.insert(index + 1, start + outward);
    points.insert(index + 2, split_point + outward);
    points.insert(index + 3, split_point);
    forbidden.push(split_point);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rectangle_bounds() {
        let poly = Polygon::rectangle(4.0, 3.0);
        assert_eq!(poly.len(), 4);
        assert_eq!(poly.min(), Point2::new(0.0, 0.0));
        assert_eq!(poly.max(), Point2::new(4.0, 3.0));
        assert_eq!(poly.dimensions(), Vector2::new(4.0, 3.0));
    }

    #[test]
    fn test_edge_wraps() {
        let poly = Polygon::rectangle(4.0, 3.0);
        let (a, b) = poly.edge(3);
        assert_eq!(a, Point2::new(0.0, 3.0));
        assert_eq!(b, Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_uvs_offset_and_scale() {
        let poly = Polygon::new(vec![
            Point2::new(1.0, 1.0),
            Point2::new(3.0, 1.0),
            Point2::new(3.0, 2.0),
            Point2::new(1.0, 2.0),
        ]);
        let uvs = poly.uvs(0.5, false);
        assert_eq!(uvs[0], Point2::new(0.0, 0.0));
        assert_eq!(uvs[2], Point2::new(1.0, 0.5));
    }

    #[test]
    fn test_uvs_flip_mirrors_u() {
        let poly = Polygon::rectangle(2.0, 2.0);
        let uvs = poly.uvs(1.0, true);
        // First point (0,0): flipped u = max.x - 0 = 2
        assert_eq!(uvs[0], Point2::new(2.0, 0.0));
        assert_eq!(uvs[1], Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_random_point_count() {
        // Each extrusion inserts exactly 3 points onto the base rectangle.
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let poly = Polygon::random(&mut rng);
            let extra = poly.len() - 4;
            assert_eq!(extra % 3, 0, "unexpected point count {}", poly.len());
            assert!(extra / 3 <= 3);
        }
    }

    #[test]
    fn test_random_deterministic() {
        let a = Polygon::random(&mut StdRng::seed_from_u64(42));
        let b = Polygon::random(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.points(), b.points());
    }
}
