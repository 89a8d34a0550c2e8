//! Polygon triangulation by ear clipping.

use nalgebra::Point2;

use crate::error::{GenError, Result};

use super::polygon::Polygon;

/// Triangulate a simple polygon into index triples.
///
/// The returned triangles are wound so that a face built in the ground
/// plane (2-D `y` mapped to world `z`) points up; with `flip` the winding
/// is reversed for downward faces such as ceilings.
///
/// # Errors
/// Returns [`GenError::Triangulation`] when no ear can be clipped, which
/// happens on degenerate or self-intersecting loops.
pub fn triangulate(polygon: &Polygon, flip: bool) -> Result<Vec<[usize; 3]>> {
    let points = polygon.points();
    let n = points.len();

    // Work in counterclockwise order regardless of the input winding.
    let mut indices: Vec<usize> = if signed_area(points) >= 0.0 {
        (0..n).collect()
    } else {
        (0..n).rev().collect()
    };

    let mut triangles = Vec::with_capacity(n - 2);
    while indices.len() > 3 {
        let ear = find_ear(points, &indices).ok_or_else(|| GenError::Triangulation {
            reason: format!("no ear found with {} vertices remaining", indices.len()),
        })?;

        let prev = indices[(ear + indices.len() - 1) % indices.len()];
        let curr = indices[ear];
        let next = indices[(ear + 1) % indices.len()];
        triangles.push(wind([prev, curr, next], flip));
        indices.remove(ear);
    }
    triangles.push(wind([indices[0], indices[1], indices[2]], flip));

    Ok(triangles)
}

/// An upward face in the ground plane needs clockwise 2-D winding; the ear
/// clipper produces counterclockwise triples.
fn wind(tri: [usize; 3], flip: bool) -> [usize; 3] {
    if flip {
        tri
    } else {
        [tri[0], tri[2], tri[1]]
    }
}

fn signed_area(points: &[Point2<f64>]) -> f64 {
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

fn cross(o: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Index into `indices` of a clippable ear, or None.
fn find_ear(points: &[Point2<f64>], indices: &[usize]) -> Option<usize> {
    let m = indices.len();
    for i in 0..m {
        let prev = points[indices[(i + m - 1) % m]];
        let curr = points[indices[i]];
        let next = points[indices[(i + 1) % m]];

        // Reflex or collinear corners cannot be ears.
        if cross(prev, curr, next) <= 1e-12 {
            continue;
        }

        let mut contains_other = false;
        for &j in indices {
            if j == indices[(i + m - 1) % m] || j == indices[i] || j == indices[(i + 1) % m] {
                continue;
            }
            if point_in_triangle(points[j], prev, curr, next) {
                contains_other = true;
                break;
            }
        }
        if !contains_other {
            return Some(i);
        }
    }
    None
}

fn point_in_triangle(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_of(points: &[Point2<f64>], tris: &[[usize; 3]]) -> f64 {
        tris.iter()
            .map(|t| cross(points[t[0]], points[t[1]], points[t[2]]).abs() / 2.0)
            .sum()
    }

    #[test]
    fn test_rectangle() {
        let poly = Polygon::rectangle(4.0, 2.0);
        let tris = triangulate(&poly, false).unwrap();
        assert_eq!(tris.len(), 2);
        assert!((area_of(poly.points(), &tris) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_l_shape() {
        let poly = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 4.0),
            Point2::new(0.0, 4.0),
        ]);
        let tris = triangulate(&poly, false).unwrap();
        assert_eq!(tris.len(), 4);
        assert!((area_of(poly.points(), &tris) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_flip_reverses_winding() {
        let poly = Polygon::rectangle(2.0, 2.0);
        let up = triangulate(&poly, false).unwrap();
        let down = triangulate(&poly, true).unwrap();
        for (u, d) in up.iter().zip(down.iter()) {
            let pts = poly.points();
            let cu = cross(pts[u[0]], pts[u[1]], pts[u[2]]);
            let cd = cross(pts[d[0]], pts[d[1]], pts[d[2]]);
            assert!(cu * cd < 0.0, "windings should be opposite");
        }
    }

    #[test]
    fn test_clockwise_input() {
        // Same rectangle, reversed loop. Triangulation normalizes winding.
        let poly = Polygon::new(vec![
            Point2::new(0.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 0.0),
        ]);
        let tris = triangulate(&poly, false).unwrap();
        assert_eq!(tris.len(), 2);
        let pts = poly.points();
        for t in &tris {
            // Upward faces are clockwise in 2-D.
            assert!(cross(pts[t[0]], pts[t[1]], pts[t[2]]) < 0.0);
        }
    }
}
