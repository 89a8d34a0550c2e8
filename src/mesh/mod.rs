//! Mesh buffers and the primitive-building engine.
//!
//! # Overview
//!
//! The central type is [`MeshBuilder`], a stateful accumulator of shared
//! vertices and per-submesh triangle lists. Primitive operations (planes,
//! circles, spheres, cylinders, polygon fills, rooms, road ribbons) append
//! to the buffers and return lightweight handles; [`MeshBuilder::apply`]
//! commits the accumulated data into a flat [`MeshData`] bundle with dense
//! vertex ids.
//!
//! # Handles
//!
//! Vertices and triangles are addressed by [`VertexKey`] and
//! [`TriangleKey`], which stay stable for the life of the builder. Dense
//! integer ids exist only in the committed bundle: they are buffer offsets
//! assigned at commit time, not identities.
//!
//! ```
//! use warren::mesh::{Material, MeshBuilder};
//! use nalgebra::{Point2, Point3};
//!
//! let mut builder = MeshBuilder::new();
//! let submesh = builder.add_submesh(Material::new("stone"));
//! builder
//!     .build_circle(submesh, Point3::new(0.0, 0.0, 0.0), 2.0, 16, false)
//!     .unwrap();
//! let data = builder.apply().unwrap();
//! assert_eq!(data.submeshes().len(), 1);
//! ```

mod builder;
mod bundle;
mod model;

pub use builder::MeshBuilder;
pub use bundle::{Aabb, MeshData, SubmeshData};
pub use model::{
    Material, MeshElement, MeshPlane, MeshRoom, MeshTriangle, MeshVertex, TriangleKey, VertexKey,
};
