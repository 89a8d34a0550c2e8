//! 2-D geometry: footprint polygons, road paths, and the small predicates
//! the builders and the assembler share.
//!
//! # Conventions
//!
//! Footprints live in the ground plane: a 2-D point `(x, y)` corresponds to
//! world `(x, altitude, y)` with the world y-axis pointing up. Headings are
//! compass-style degrees: `0` faces `+z`, `90` faces `+x`, so the forward
//! vector of a heading `a` is `(sin a, cos a)`.

mod intersect;
mod path;
mod polygon;
mod triangulate;

pub use intersect::{forward_vector, rotate_deg, segments_intersect, signed_angle_deg};
pub use path::{Path, PathLine, RoadParams};
pub use polygon::Polygon;
pub use triangulate::triangulate;
