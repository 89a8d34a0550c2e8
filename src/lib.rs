//! # Warren
//!
//! Procedural level geometry: a mesh-building engine plus a dungeon
//! assembler that grows connected layouts from room, corridor and hall
//! modules.
//!
//! ## Features
//!
//! - **Mesh builder**: submesh-partitioned vertex/triangle buffers with
//!   stable handles, committed to index buffers on demand
//! - **Primitives**: planes, circles, spheres, (segmented) cylinders,
//!   polygon fills, walled rooms and road ribbons
//! - **Hole carving**: rectangular openings cut out of existing wall quads
//! - **Dungeon assembly**: a seeded, stepwise state machine that stitches
//!   modules together at exit points with collision rejection
//! - **OBJ export**: write any committed geometry as Wavefront OBJ
//!
//! ## Quick Start
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use warren::prelude::*;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut assembler = DungeonAssembler::new(DungeonConfig::default());
//! assembler.run(&mut rng).unwrap();
//!
//! let layout = assembler.into_layout();
//! println!("modules: {}", layout.modules.len());
//! println!("gates:   {}", layout.gates.len());
//! ```
//!
//! ## Building Geometry Directly
//!
//! ```
//! use nalgebra::Point3;
//! use warren::prelude::*;
//!
//! let mut builder = MeshBuilder::new();
//! let submesh = builder.add_submesh(Material::new("stone"));
//! builder
//!     .build_circle(submesh, Point3::new(0.0, 0.0, 0.0), 2.0, 32, false)
//!     .unwrap();
//! let mesh = builder.apply().unwrap();
//! assert_eq!(mesh.triangle_count(), 32);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dungeon;
pub mod error;
pub mod geom;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use warren::prelude::*;
/// ```
pub mod prelude {
    pub use crate::dungeon::{
        AssemblerState, DungeonAssembler, DungeonConfig, DungeonLayout, DungeonModule, ExitRef,
        Gate, ModuleId, ModuleKind,
    };
    pub use crate::error::{GenError, Result};
    pub use crate::geom::{Path, Polygon, RoadParams};
    pub use crate::mesh::{Material, MeshBuilder, MeshData};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
