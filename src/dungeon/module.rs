//! Dungeon modules and their connection topology.
//!
//! A [`DungeonModule`] is a bounded shape (room, corridor or hall) with a
//! 2-D footprint, a height and a list of [`ExitPoint`]s where other
//! modules may attach. Modules own their exit points; everything else
//! refers to an exit point through an [`ExitRef`] resolved against the
//! assembler's module registry.

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{GenError, Result};
use crate::geom::{forward_vector, segments_intersect, Polygon};
use crate::mesh::{MeshBuilder, MeshData, MeshPlane};

use super::config::DungeonConfig;
use super::generators::ModuleKind;

/// Identifier of a placed module within a dungeon's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(pub usize);

/// A reference to one exit point of a placed module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitRef {
    /// The owning module.
    pub module: ModuleId,
    /// Index of the exit point within the module.
    pub exit: usize,
}

/// Rigid placement of a module: a translation plus a yaw about the world
/// up-axis, in compass degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleTransform {
    /// World position of the module origin.
    pub position: Vector3<f64>,
    /// Rotation about the up-axis in compass degrees.
    pub yaw_deg: f64,
}

impl Default for ModuleTransform {
    fn default() -> Self {
        Self { position: Vector3::zeros(), yaw_deg: 0.0 }
    }
}

impl ModuleTransform {
    /// Map a module-local point to world space.
    pub fn transform_point(&self, local: Point3<f64>) -> Point3<f64> {
        let (sin, cos) = self.yaw_deg.to_radians().sin_cos();
        Point3::new(
            local.x * cos + local.z * sin,
            local.y,
            -local.x * sin + local.z * cos,
        ) + self.position
    }

    /// Translate the module.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.position += offset;
    }

    /// Rotate the module about a world-space pivot on the up-axis.
    pub fn rotate_around(&mut self, pivot: Point3<f64>, angle_deg: f64) {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let rel = Point3::from(self.position) - pivot;
        let rotated = Vector3::new(rel.x * cos + rel.z * sin, rel.y, -rel.x * sin + rel.z * cos);
        self.position = (pivot + rotated).coords;
        self.yaw_deg += angle_deg;
    }
}

/// A marked position and outward direction on a module wall where another
/// module may be attached.
///
/// Exit points are always level: their direction never tilts up or down.
#[derive(Debug, Clone)]
pub struct ExitPoint {
    local_position: Point3<f64>,
    local_direction_deg: f64,
    wall: MeshPlane,
    wall_length: f64,
    relative_wall_position: f64,
    consumed: bool,
}

impl ExitPoint {
    /// Create an exit point from its module-local placement.
    ///
    /// `relative_wall_position` is the ratio (0 = wall start, 1 = wall
    /// end, in the wall's own vertex order) at which the point sits on
    /// `wall`.
    pub fn new(
        local_position: Point3<f64>,
        local_direction_deg: f64,
        wall: MeshPlane,
        wall_length: f64,
        relative_wall_position: f64,
    ) -> Self {
        Self {
            local_position,
            local_direction_deg,
            wall,
            wall_length,
            relative_wall_position,
            consumed: false,
        }
    }

    /// Height of the exit point above the module origin.
    pub fn local_height(&self) -> f64 {
        self.local_position.y
    }

    /// The wall plane the exit point sits on.
    pub fn wall(&self) -> &MeshPlane {
        &self.wall
    }

    /// Whether a gate has consumed this exit point.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// World position under the owning module's transform.
    pub fn world_position(&self, transform: &ModuleTransform) -> Point3<f64> {
        transform.transform_point(self.local_position)
    }

    /// Outward world direction in compass degrees.
    pub fn world_direction(&self, transform: &ModuleTransform) -> f64 {
        transform.yaw_deg + self.local_direction_deg
    }

    /// A point `distance` ahead of the exit point along its direction.
    pub fn forward_position(&self, transform: &ModuleTransform, distance: f64) -> Point3<f64> {
        let dir = forward_vector(self.world_direction(transform));
        self.world_position(transform) + Vector3::new(distance * dir.x, 0.0, distance * dir.y)
    }

    /// A point offset sideways along the exit point's wall and lifted by
    /// `height`.
    pub fn offset_position(
        &self,
        transform: &ModuleTransform,
        distance: f64,
        height: f64,
    ) -> Point3<f64> {
        let dir = forward_vector(self.world_direction(transform) + 90.0);
        self.world_position(transform)
            + Vector3::new(distance * dir.x, height, distance * dir.y)
    }
}

/// A room, corridor or hall: footprint, height, exit points and the mesh
/// buffers that realize it.
#[derive(Debug)]
pub struct DungeonModule {
    kind: ModuleKind,
    footprint: Polygon,
    height: f64,
    exits: Vec<ExitPoint>,
    builder: MeshBuilder,
    wall_submesh: usize,
    transform: ModuleTransform,
}

impl DungeonModule {
    /// Assemble a module from its generated parts. The builder keeps
    /// owning the module's mesh buffers so doorways can be carved later.
    pub fn new(
        kind: ModuleKind,
        footprint: Polygon,
        height: f64,
        exits: Vec<ExitPoint>,
        builder: MeshBuilder,
        wall_submesh: usize,
    ) -> Self {
        Self {
            kind,
            footprint,
            height,
            exits,
            builder,
            wall_submesh,
            transform: ModuleTransform::default(),
        }
    }

    /// The module's type tag.
    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    /// The local-space footprint polygon.
    pub fn footprint(&self) -> &Polygon {
        &self.footprint
    }

    /// Height of the module above its origin.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The module's exit points.
    pub fn exits(&self) -> &[ExitPoint] {
        &self.exits
    }

    /// The module's world placement.
    pub fn transform(&self) -> &ModuleTransform {
        &self.transform
    }

    /// Mutable access to the world placement. Only the assembler moves
    /// modules, and only before they are committed to the dungeon.
    pub fn transform_mut(&mut self) -> &mut ModuleTransform {
        &mut self.transform
    }

    /// A footprint point mapped to the world ground plane.
    pub fn world_footprint_point(&self, index: usize) -> Point2<f64> {
        let p = self.footprint.points()[index];
        let world = self.transform.transform_point(Point3::new(p.x, 0.0, p.y));
        Point2::new(world.x, world.z)
    }

    /// Commit the module's current mesh buffers.
    pub fn mesh(&self) -> Result<MeshData> {
        self.builder.apply()
    }

    /// Carve the doorway for an exit point into its wall.
    ///
    /// # Errors
    /// [`GenError::ExitPointOutOfRange`] if `index` does not name an exit
    /// point of this module, [`GenError::ExitPointConsumed`] if it was
    /// already opened. Both are programming errors in the assembly flow.
    pub fn open_exit(&mut self, index: usize, config: &DungeonConfig) -> Result<()> {
        let count = self.exits.len();
        let exit = self
            .exits
            .get_mut(index)
            .ok_or(GenError::ExitPointOutOfRange { index, count })?;
        if exit.consumed {
            return Err(GenError::ExitPointConsumed { index });
        }
        exit.consumed = true;

        let hole_center = Point2::new(
            exit.relative_wall_position * exit.wall_length,
            exit.local_height() + config.connection_height / 2.0,
        );
        let hole_dims = Point2::new(config.connection_width, config.connection_height);
        let wall = exit.wall;
        log::debug!("opening exit {index} at {hole_center:?}");
        self.builder
            .carve_hole_in_plane(self.wall_submesh, &wall, hole_center, hole_dims)
    }

    /// Test whether this module's footprint collides with another's.
    ///
    /// Modules whose vertical extents do not overlap cannot collide;
    /// otherwise every footprint edge pair is tested for 2-D segment
    /// intersection. Symmetric in its two modules.
    pub fn collides_with(&self, other: &DungeonModule) -> bool {
        if self.transform.position.y > other.transform.position.y + other.height
            || other.transform.position.y > self.transform.position.y + self.height
        {
            return false;
        }

        for i in 0..other.footprint.len() {
            let a1 = other.world_footprint_point(i);
            let a2 = other.world_footprint_point((i + 1) % other.footprint.len());
            for j in 0..self.footprint.len() {
                let b1 = self.world_footprint_point(j);
                let b2 = self.world_footprint_point((j + 1) % self.footprint.len());
                if segments_intersect(a1, a2, b1, b2) {
                    return true;
                }
            }
        }
        false
    }
}
