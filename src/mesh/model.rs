//! Value types and handles for the mesh buffers.

use std::fmt::{self, Debug};

use nalgebra::{Point2, Point3};

/// A lightweight material reference.
///
/// Material resolution (shaders, textures, lighting) belongs to the host
/// renderer; the mesh layer only partitions triangles by material name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Material(String);

impl Material {
    /// Create a material reference from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The material name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Material({})", self.0)
    }
}

/// A stable handle to a vertex in a [`MeshBuilder`](super::MeshBuilder).
///
/// Valid for the life of the builder (until the vertex is removed),
/// independent of the dense id assigned at commit.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexKey(u32);

impl VertexKey {
    #[inline]
    pub(crate) fn new(slot: usize) -> Self {
        Self(slot as u32)
    }

    /// The underlying buffer slot.
    #[inline]
    pub fn slot(self) -> usize {
        self.0 as usize
    }
}

impl Debug for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v({})", self.0)
    }
}

/// A stable handle to a triangle in one submesh of a
/// [`MeshBuilder`](super::MeshBuilder).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TriangleKey {
    submesh: u32,
    slot: u32,
}

impl TriangleKey {
    #[inline]
    pub(crate) fn new(submesh: usize, slot: usize) -> Self {
        Self { submesh: submesh as u32, slot: slot as u32 }
    }

    /// The submesh the triangle belongs to.
    #[inline]
    pub fn submesh(self) -> usize {
        self.submesh as usize
    }

    /// The slot within the submesh's triangle list.
    #[inline]
    pub fn slot(self) -> usize {
        self.slot as usize
    }
}

impl Debug for TriangleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t({}:{})", self.submesh, self.slot)
    }
}

/// Position and UV data of a single vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    /// World-space position.
    pub position: Point3<f64>,
    /// Primary UV channel.
    pub uv: Point2<f64>,
    /// Secondary UV channel.
    pub uv2: Point2<f64>,
}

impl MeshVertex {
    /// Create a vertex with a zeroed secondary UV channel.
    pub fn new(position: Point3<f64>, uv: Point2<f64>) -> Self {
        Self { position, uv, uv2: Point2::new(0.0, 0.0) }
    }
}

/// A single triangle: three vertex references and the owning submesh.
///
/// Winding is significant: front faces are clockwise as seen from outside.
#[derive(Debug, Clone, Copy)]
pub struct MeshTriangle {
    /// Index of the owning submesh.
    pub submesh: usize,
    /// The three vertices, in winding order.
    pub vertices: [VertexKey; 3],
}

/// A quad: 4 vertices ordered around the face and its 2 triangles.
///
/// Returned by every quad-building operation and required later for
/// hole carving. Vertex order defines the plane's local frame: `v1 -> v2`
/// is the height axis, `v1 -> v4` the length axis.
#[derive(Debug, Clone, Copy)]
pub struct MeshPlane {
    /// The corner vertices `v1..v4`, ordered around the quad.
    pub vertices: [VertexKey; 4],
    /// The triangles `v1-v3-v2` and `v1-v4-v3`.
    pub triangles: [TriangleKey; 2],
}

/// An arbitrary bag of vertices and triangles making up a compound shape
/// (circle, sphere, cylinder, polygon fill, ribbon) on one submesh.
#[derive(Debug, Clone)]
pub struct MeshElement {
    /// The submesh the element was built on.
    pub submesh: usize,
    /// All vertices of the element.
    pub vertices: Vec<VertexKey>,
    /// All triangles of the element.
    pub triangles: Vec<TriangleKey>,
}

/// Handles to every part of a built room: floor, ceiling and one wall
/// plane per ground-plan edge, plus the submesh indices they live on.
#[derive(Debug, Clone)]
pub struct MeshRoom {
    /// The floor polygon fill at altitude 0.
    pub floor: MeshElement,
    /// The ceiling polygon fill (flipped winding) at the room height.
    pub ceiling: MeshElement,
    /// One wall quad per ground-plan edge, in perimeter order.
    pub walls: Vec<MeshPlane>,
    /// Submesh index of the floor.
    pub floor_submesh: usize,
    /// Submesh index of the ceiling.
    pub ceiling_submesh: usize,
    /// Submesh index of the walls.
    pub wall_submesh: usize,
}
