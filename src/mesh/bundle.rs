//! Committed geometry bundles.

use nalgebra::{Point2, Point3};

use super::model::Material;

/// Triangle indices and material of one committed submesh.
///
/// Indices come in triples and reference the shared vertex buffer of the
/// owning [`MeshData`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubmeshData {
    /// Flattened triangle index list (3 entries per triangle).
    pub indices: Vec<u32>,
    /// Material applied to this submesh.
    pub material: Material,
}

/// A committed geometry bundle: the output of
/// [`MeshBuilder::apply`](super::MeshBuilder::apply).
///
/// Vertex ids are dense buffer offsets assigned at commit; the three
/// per-vertex channels are parallel arrays. Triangles are partitioned per
/// submesh while vertices are shared across submeshes.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    positions: Vec<Point3<f64>>,
    uv: Vec<Point2<f64>>,
    uv2: Vec<Point2<f64>>,
    submeshes: Vec<SubmeshData>,
}

impl MeshData {
    pub(crate) fn new(
        positions: Vec<Point3<f64>>,
        uv: Vec<Point2<f64>>,
        uv2: Vec<Point2<f64>>,
        submeshes: Vec<SubmeshData>,
    ) -> Self {
        Self { positions, uv, uv2, submeshes }
    }

    /// Vertex positions, indexed by dense vertex id.
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Primary UV channel, parallel to [`positions`](Self::positions).
    pub fn uv(&self) -> &[Point2<f64>] {
        &self.uv
    }

    /// Secondary UV channel, parallel to [`positions`](Self::positions).
    pub fn uv2(&self) -> &[Point2<f64>] {
        &self.uv2
    }

    /// Per-submesh triangle lists and materials.
    pub fn submeshes(&self) -> &[SubmeshData] {
        &self.submeshes
    }

    /// Number of committed vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of committed triangles across all submeshes.
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.indices.len() / 3).sum()
    }

    /// Derive an axis-aligned collision volume from the committed
    /// positions. Returns `None` for an empty bundle.
    pub fn collider(&self) -> Option<Aabb> {
        let first = *self.positions.first()?;
        let mut aabb = Aabb { min: first, max: first };
        for p in &self.positions[1..] {
            aabb.min.x = aabb.min.x.min(p.x);
            aabb.min.y = aabb.min.y.min(p.y);
            aabb.min.z = aabb.min.z.min(p.z);
            aabb.max.x = aabb.max.x.max(p.x);
            aabb.max.y = aabb.max.y.max(p.y);
            aabb.max.z = aabb.max.z.max(p.z);
        }
        Some(aabb)
    }
}

/// An axis-aligned bounding box derived from committed geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}
