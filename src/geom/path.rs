//! Road paths.
//!
//! A [`Path`] is an ordered sequence of oriented cross-sections
//! ([`PathLine`]) describing a ribbon: each cross-section has a center, a
//! heading towards the next cross-section, and a width from which its left
//! and right edge points are derived.

use nalgebra::{Point3, Vector3};
use rand::Rng;

/// One cross-section of a path. Elevation is constant across the line.
#[derive(Debug, Clone, Copy)]
pub struct PathLine {
    center: Point3<f64>,
    angle_deg: f64,
    width: f64,
}

impl PathLine {
    /// Create a cross-section from its center, compass heading in degrees
    /// and width.
    pub fn new(center: Point3<f64>, angle_deg: f64, width: f64) -> Self {
        Self { center, angle_deg, width }
    }

    /// Center point of the cross-section.
    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    /// Compass heading in degrees towards the next cross-section.
    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    /// Width of the path at this cross-section.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Leftmost point of the cross-section.
    pub fn left(&self) -> Point3<f64> {
        self.position(0.0)
    }

    /// Rightmost point of the cross-section.
    pub fn right(&self) -> Point3<f64> {
        self.position(1.0)
    }

    /// A point on the cross-section, from the far left (`0.0`) to the far
    /// right (`1.0`).
    pub fn position(&self, relative: f64) -> Point3<f64> {
        let relative_width = -(self.width / 2.0) + self.width * relative;
        let side = (self.angle_deg + 90.0).to_radians();
        self.center + Vector3::new(relative_width * side.sin(), 0.0, relative_width * side.cos())
    }
}

/// Bounds for [`Path::random_walk`].
#[derive(Debug, Clone)]
pub struct RoadParams {
    /// Number of segments to walk.
    pub segments: usize,
    /// Width of the first cross-section.
    pub start_width: f64,
    /// Lower clamp for the width.
    pub min_width: f64,
    /// Upper clamp for the width.
    pub max_width: f64,
    /// Per-segment bound on the width change.
    pub max_width_change: f64,
    /// Per-segment bound on the change of the width change.
    pub max_width_change_delta: f64,
    /// Distance between successive cross-section centers.
    pub segment_length: f64,
    /// Magnitude bound for the cumulative turn angle, in degrees.
    pub max_turn_angle: f64,
    /// Per-segment bound on the turn-angle change, in degrees.
    pub max_turn_angle_delta: f64,
    /// Per-segment bound on the steepness change.
    pub max_steepness_change: f64,
}

impl Default for RoadParams {
    fn default() -> Self {
        Self {
            segments: 1000,
            start_width: 10.0,
            min_width: 5.0,
            max_width: 30.0,
            max_width_change: 0.4,
            max_width_change_delta: 0.04,
            segment_length: 1.0,
            max_turn_angle: 5.0,
            max_turn_angle_delta: 0.5,
            max_steepness_change: 0.01,
        }
    }
}

/// An ordered sequence of cross-sections.
#[derive(Debug, Clone)]
pub struct Path {
    lines: Vec<PathLine>,
}

impl Path {
    /// Create a path from its cross-sections.
    pub fn new(lines: Vec<PathLine>) -> Self {
        Self { lines }
    }

    /// The cross-sections in order.
    pub fn lines(&self) -> &[PathLine] {
        &self.lines
    }

    /// Number of cross-sections.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the path has no cross-sections.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Generate a path by a discrete random walk.
    ///
    /// Per segment the width follows a bounded random walk (the width
    /// change itself drifts, both clamped), the turn angle drifts with a
    /// range that narrows as the cumulative turn approaches
    /// `max_turn_angle` (preventing runaway spiraling), and an independent
    /// steepness accumulator drifts the elevation. The heading integrates
    /// the turn angle and each new center is placed `segment_length` ahead.
    pub fn random_walk<R: Rng + ?Sized>(rng: &mut R, params: &RoadParams) -> Self {
        let mut lines = Vec::with_capacity(params.segments + 1);
        let mut last_point = Point3::new(0.0, 0.0, 0.0);
        let mut width = params.start_width;
        let mut width_change = 0.0_f64;
        let mut angle = 0.0_f64;
        let mut turn_angle = 0.0_f64;
        let mut steepness = 0.0_f64;
        lines.push(PathLine::new(last_point, angle, width));

        for _ in 0..params.segments {
            // Width
            width_change += rng.gen_range(-params.max_width_change_delta..params.max_width_change_delta);
            width_change = width_change.clamp(-params.max_width_change, params.max_width_change);
            width = (width + width_change).clamp(params.min_width, params.max_width);

            // Turn angle. The delta range narrows towards the side the walk
            // already leans to, so the cumulative turn levels off instead of
            // spiraling.
            let d = params.max_turn_angle_delta;
            let turn_delta = if turn_angle > 0.0 {
                rng.gen_range(-d..=d * (1.0 - turn_angle / params.max_turn_angle))
            } else if turn_angle < 0.0 {
                rng.gen_range(-d * (1.0 + turn_angle / params.max_turn_angle)..=d)
            } else {
                rng.gen_range(-d..=d)
            };
            turn_angle = (turn_angle + turn_delta).clamp(-params.max_turn_angle, params.max_turn_angle);
            angle += turn_angle;

            // Steepness
            steepness += rng.gen_range(-params.max_steepness_change..params.max_steepness_change);

            let rad = angle.to_radians();
            let next_point = Point3::new(
                last_point.x + params.segment_length * rad.sin(),
                last_point.y + steepness,
                last_point.z + params.segment_length * rad.cos(),
            );
            lines.push(PathLine::new(next_point, angle, width));
            last_point = next_point;
        }

        Self::new(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pathline_edges() {
        // Heading +z: left offset points -x, right offset points +x.
        let line = PathLine::new(Point3::new(0.0, 0.0, 0.0), 0.0, 4.0);
        let left = line.left();
        let right = line.right();
        assert!((left.x + 2.0).abs() < 1e-9, "left = {:?}", left);
        assert!((right.x - 2.0).abs() < 1e-9, "right = {:?}", right);
        assert!(left.z.abs() < 1e-9 && right.z.abs() < 1e-9);
    }

    #[test]
    fn test_pathline_center_position() {
        let line = PathLine::new(Point3::new(1.0, 2.0, 3.0), 77.0, 6.0);
        let mid = line.position(0.5);
        assert!((mid - line.center()).norm() < 1e-9);
    }

    #[test]
    fn test_random_walk_width_bounds() {
        let params = RoadParams { segments: 500, ..RoadParams::default() };
        let path = Path::random_walk(&mut StdRng::seed_from_u64(3), &params);
        assert_eq!(path.len(), params.segments + 1);

        for pair in path.lines().windows(2) {
            let delta = (pair[1].width() - pair[0].width()).abs();
            assert!(delta <= params.max_width_change + 1e-9, "width jump {}", delta);
        }
        for line in path.lines() {
            assert!(line.width() >= params.min_width - 1e-9);
            assert!(line.width() <= params.max_width + 1e-9);
        }
    }

    #[test]
    fn test_random_walk_turn_bound() {
        // The per-segment heading change is the cumulative turn angle,
        // which must stay within the configured magnitude.
        let params = RoadParams { segments: 500, ..RoadParams::default() };
        let path = Path::random_walk(&mut StdRng::seed_from_u64(11), &params);

        for pair in path.lines().windows(2) {
            let turn = pair[1].angle_deg() - pair[0].angle_deg();
            assert!(turn.abs() <= params.max_turn_angle + 1e-9, "turn {}", turn);
        }
    }

    #[test]
    fn test_random_walk_turn_clamp_is_symmetric() {
        // A delta bound above the turn bound overshoots in a single step.
        // An overshoot must clamp to the near bound on either side, never
        // snap across to the opposite one.
        let params = RoadParams {
            segments: 300,
            max_turn_angle: 1.0,
            max_turn_angle_delta: 2.0,
            ..RoadParams::default()
        };
        let path = Path::random_walk(&mut StdRng::seed_from_u64(4), &params);

        let mut saturated_left = false;
        let mut saturated_right = false;
        for pair in path.lines().windows(2) {
            let turn = pair[1].angle_deg() - pair[0].angle_deg();
            assert!(turn.abs() <= params.max_turn_angle + 1e-9, "turn {}", turn);
            if turn <= -params.max_turn_angle + 1e-6 {
                saturated_left = true;
            }
            if turn >= params.max_turn_angle - 1e-6 {
                saturated_right = true;
            }
        }
        assert!(saturated_left, "clamp never engaged on the left bound");
        assert!(saturated_right, "clamp never engaged on the right bound");
    }

    #[test]
    fn test_random_walk_segment_length() {
        let params = RoadParams { segments: 50, ..RoadParams::default() };
        let path = Path::random_walk(&mut StdRng::seed_from_u64(5), &params);

        for pair in path.lines().windows(2) {
            let a = pair[0].center();
            let b = pair[1].center();
            let planar = ((b.x - a.x).powi(2) + (b.z - a.z).powi(2)).sqrt();
            assert!((planar - params.segment_length).abs() < 1e-9);
        }
    }
}
