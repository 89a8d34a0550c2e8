//! Small planar predicates shared by the polygon generator, the builders
//! and the assembler's collision test.

use nalgebra::{Point2, Vector2};

/// Rotate a 2-D vector counterclockwise by an angle in degrees.
pub fn rotate_deg(v: Vector2<f64>, degrees: f64) -> Vector2<f64> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vector2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Signed angle in degrees from `from` to `to`, positive when `to` is
/// counterclockwise of `from`. Result is in `(-180, 180]`.
pub fn signed_angle_deg(from: Vector2<f64>, to: Vector2<f64>) -> f64 {
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.x * to.x + from.y * to.y;
    cross.atan2(dot).to_degrees()
}

/// Unit forward vector of a compass-style heading in degrees
/// (`0` faces `+z`/`+y`, `90` faces `+x`).
pub fn forward_vector(heading_deg: f64) -> Vector2<f64> {
    let (sin, cos) = heading_deg.to_radians().sin_cos();
    Vector2::new(sin, cos)
}

/// Orientation of the ordered triple (p, q, r): positive for
/// counterclockwise, negative for clockwise, zero for collinear.
fn orientation(p: Point2<f64>, q: Point2<f64>, r: Point2<f64>) -> f64 {
    (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
}

/// Whether `q` lies on the segment `p`-`r`, assuming the three points are
/// collinear.
fn on_segment(p: Point2<f64>, q: Point2<f64>, r: Point2<f64>) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Test whether the closed segments `p1`-`q1` and `p2`-`q2` intersect.
///
/// Touching endpoints and collinear overlap both count as intersections.
/// The test is symmetric in its two segments.
pub fn segments_intersect(
    p1: Point2<f64>,
    q1: Point2<f64>,
    p2: Point2<f64>,
    q2: Point2<f64>,
) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        return true;
    }

    // Collinear cases
    (o1 == 0.0 && on_segment(p1, p2, q1))
        || (o2 == 0.0 && on_segment(p1, q2, q1))
        || (o3 == 0.0 && on_segment(p2, p1, q2))
        || (o4 == 0.0 && on_segment(p2, q1, q2))
}
