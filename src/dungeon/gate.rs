//! Gate pieces bridging two connected modules.

use crate::error::Result;
use crate::mesh::{MeshBuilder, MeshData};
use nalgebra::Point2;

use super::config::DungeonConfig;
use super::module::{ExitPoint, ExitRef, ModuleTransform};

/// One side of a gate: an exit point resolved against its module's world
/// placement.
#[derive(Clone, Copy)]
pub struct GateSide<'a> {
    /// Registry reference to the exit point.
    pub exit_ref: ExitRef,
    /// The exit point itself.
    pub exit: &'a ExitPoint,
    /// The owning module's placement.
    pub transform: &'a ModuleTransform,
}

/// A short passage volume filling the standoff gap between two opened
/// exit points.
///
/// The gate mesh is committed at construction; unlike modules it never
/// changes afterwards.
#[derive(Debug)]
pub struct Gate {
    exits: [ExitRef; 2],
    mesh: MeshData,
}

impl Gate {
    /// Build the passage between two facing exit points. `near` is the
    /// exit already part of the dungeon, `far` the one on the module just
    /// placed; both must have been opened already.
    pub fn build(config: &DungeonConfig, near: GateSide<'_>, far: GateSide<'_>) -> Result<Self> {
        let hw = config.connection_width / 2.0;
        let h = config.connection_height;

        let bl1 = far.exit.offset_position(far.transform, -hw, 0.0);
        let br1 = far.exit.offset_position(far.transform, hw, 0.0);
        let tl1 = far.exit.offset_position(far.transform, -hw, h);
        let tr1 = far.exit.offset_position(far.transform, hw, h);
        let bl2 = near.exit.offset_position(near.transform, -hw, 0.0);
        let br2 = near.exit.offset_position(near.transform, hw, 0.0);
        let tl2 = near.exit.offset_position(near.transform, -hw, h);
        let tr2 = near.exit.offset_position(near.transform, hw, h);

        let zero = Point2::new(0.0, 0.0);
        let one = Point2::new(1.0, 1.0);

        let mut builder = MeshBuilder::new();
        let submesh = builder.add_submesh(config.gate_material.clone());
        // The two exits face each other, so the near side's left is the
        // far side's right.
        builder.build_plane(submesh, bl1, br1, bl2, br2, zero, one)?; // floor
        builder.build_plane(submesh, bl1, br2, tr2, tl1, zero, one)?; // right wall
        builder.build_plane(submesh, bl2, br1, tr1, tl2, zero, one)?; // left wall
        builder.build_plane(submesh, tr1, tl1, tr2, tl2, zero, one)?; // ceiling

        Ok(Self { exits: [near.exit_ref, far.exit_ref], mesh: builder.apply()? })
    }

    /// The two connected exit points, dungeon-side first.
    pub fn exits(&self) -> [ExitRef; 2] {
        self.exits
    }

    /// The committed passage mesh.
    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }
}
