//! Error types for warren.
//!
//! Contract violations (programmer errors in how the building APIs are
//! called) surface as [`GenError`] variants and abort the generation run.
//! Recoverable generation conditions -- a module colliding with the dungeon,
//! a generator resampling its exit points -- are ordinary control flow and
//! never appear here.

use thiserror::Error;

/// Result type alias using [`GenError`].
pub type Result<T> = std::result::Result<T, GenError>;

/// Errors that can occur while building geometry or assembling a dungeon.
#[derive(Error, Debug)]
pub enum GenError {
    /// A triangle or primitive was targeted at a submesh that was never
    /// allocated with `add_submesh`.
    #[error("submesh index {submesh} out of range (mesh has {count} submeshes)")]
    SubmeshOutOfRange {
        /// The offending submesh index.
        submesh: usize,
        /// Number of submeshes allocated so far.
        count: usize,
    },

    /// A segmented cylinder needs one radius per ring boundary, i.e.
    /// `radii.len() == heights.len() + 1`.
    #[error("segmented cylinder needs {} radii for {heights} segments, got {radii}", .heights + 1)]
    SegmentedCylinderArity {
        /// Number of radii supplied.
        radii: usize,
        /// Number of segment heights supplied.
        heights: usize,
    },

    /// An exit point index does not exist on the module it was invoked on.
    #[error("exit point {index} out of range (module has {count} exit points)")]
    ExitPointOutOfRange {
        /// The offending exit point index.
        index: usize,
        /// Number of exit points on the module.
        count: usize,
    },

    /// An exit point was already consumed by a gate and cannot be opened
    /// again.
    #[error("exit point {index} has already been opened")]
    ExitPointConsumed {
        /// The offending exit point index.
        index: usize,
    },

    /// A triangle referenced a vertex that was removed before commit.
    #[error("triangle in submesh {submesh} references a removed vertex")]
    DanglingVertex {
        /// Submesh the triangle belongs to.
        submesh: usize,
    },

    /// Polygon triangulation failed, typically on a degenerate or
    /// self-intersecting loop.
    #[error("polygon triangulation failed: {reason}")]
    Triangulation {
        /// Description of the failure.
        reason: String,
    },

    /// An assembly configuration value that cannot be worked with, such
    /// as an empty or zero-weight module table.
    #[error("invalid dungeon configuration: {reason}")]
    InvalidConfig {
        /// Description of the rejected value.
        reason: String,
    },

    /// A path ribbon needs at least two cross-sections.
    #[error("path has {lines} cross-sections, need at least 2")]
    PathTooShort {
        /// Number of cross-sections supplied.
        lines: usize,
    },

    /// File I/O error while exporting geometry.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
