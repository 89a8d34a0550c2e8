//! Module generators: one self-contained builder per module type.
//!
//! Each generator draws its dimensions from the supplied RNG, builds the
//! module's mesh and places its exit points. The resulting
//! [`DungeonModule`] is in local space; the assembler moves it into
//! place afterwards.

use nalgebra::{Point2, Point3, Vector2};
use rand::Rng;

use crate::error::{GenError, Result};
use crate::geom::{signed_angle_deg, Polygon};
use crate::mesh::{MeshBuilder, MeshRoom};

use super::config::DungeonConfig;
use super::module::{DungeonModule, ExitPoint};

const MIN_ROOM_HEIGHT: f64 = 2.5;
const MAX_ROOM_HEIGHT: f64 = 4.0;

const MIN_CORRIDOR_LENGTH: f64 = 5.0;
const MAX_CORRIDOR_LENGTH: f64 = 20.0;
const MIN_CORRIDOR_WIDTH: f64 = 1.5;
const MAX_CORRIDOR_WIDTH: f64 = 3.0;
const MIN_CORRIDOR_HEIGHT: f64 = 2.5;
const MAX_CORRIDOR_HEIGHT: f64 = 3.0;
const ELEVATION_CHANGE_CHANCE: f64 = 0.5;
const MIN_ELEVATION_CHANGE_PER_METER: f64 = 0.1;
const MAX_ELEVATION_CHANGE_PER_METER: f64 = 0.5;
// Distance between an exit wall and where the slope starts.
const MIN_ELEVATION_CHANGE_MARGIN: f64 = 0.5;
const MAX_ELEVATION_CHANGE_MARGIN: f64 = 2.0;

const MIN_HALL_SIZE: f64 = 20.0;
const MAX_HALL_SIZE: f64 = 40.0;
const MIN_HALL_HEIGHT: f64 = 4.0;
const MAX_HALL_HEIGHT: f64 = 8.0;

/// The closed set of module shapes the generators can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// An irregular polygonal room of moderate size.
    Room,
    /// A narrow rectangular connector with exactly two exits, possibly
    /// sloped.
    Corridor,
    /// A large rectangular room with a high ceiling.
    Hall,
}

/// Generate a random module of the given kind.
pub fn generate_module<R: Rng + ?Sized>(
    kind: ModuleKind,
    config: &DungeonConfig,
    rng: &mut R,
) -> Result<DungeonModule> {
    match kind {
        ModuleKind::Room => generate_room(config, rng),
        ModuleKind::Corridor => generate_corridor(config, rng),
        ModuleKind::Hall => generate_hall(config, rng),
    }
}

/// A room over a random polygonal ground plan.
///
/// A random ground plan may self-intersect and defeat the ear clipper; a
/// plan that fails to triangulate is discarded and redrawn, like the
/// exit-point sampler rerolls until a wall qualifies. Triangulation stays
/// a hard error only for caller-supplied polygons in `build_polygon`.
pub fn generate_room<R: Rng + ?Sized>(
    config: &DungeonConfig,
    rng: &mut R,
) -> Result<DungeonModule> {
    loop {
        let ground_plan = Polygon::random(rng);
        let height = rng.gen_range(MIN_ROOM_HEIGHT..MAX_ROOM_HEIGHT);
        match build_walled_module(ModuleKind::Room, ground_plan, height, config, rng) {
            Err(GenError::Triangulation { .. }) => continue,
            result => return result,
        }
    }
}

/// A hall: a big rectangular room.
pub fn generate_hall<R: Rng + ?Sized>(
    config: &DungeonConfig,
    rng: &mut R,
) -> Result<DungeonModule> {
    let length = rng.gen_range(MIN_HALL_SIZE..MAX_HALL_SIZE);
    let width = rng.gen_range(MIN_HALL_SIZE..MAX_HALL_SIZE);
    let height = rng.gen_range(MIN_HALL_HEIGHT..MAX_HALL_HEIGHT);
    let ground_plan = Polygon::rectangle(length, width);
    build_walled_module(ModuleKind::Hall, ground_plan, height, config, rng)
}

fn build_walled_module<R: Rng + ?Sized>(
    kind: ModuleKind,
    ground_plan: Polygon,
    height: f64,
    config: &DungeonConfig,
    rng: &mut R,
) -> Result<DungeonModule> {
    let mut builder = MeshBuilder::new();
    let room = builder.build_room(
        &ground_plan,
        height,
        config.floor_material.clone(),
        config.wall_material.clone(),
        config.ceiling_material.clone(),
        config.floor_texture_scale,
        config.wall_texture_scale,
    )?;
    let exits = random_exit_points(&builder, &room, config, rng);
    let wall_submesh = room.wall_submesh;
    Ok(DungeonModule::new(kind, ground_plan, height, exits, builder, wall_submesh))
}

/// A straight corridor with exits on both short ends. Half of all
/// corridors slope upwards between the two exit margins, shifting the far
/// exit to the raised floor level.
pub fn generate_corridor<R: Rng + ?Sized>(
    config: &DungeonConfig,
    rng: &mut R,
) -> Result<DungeonModule> {
    let length = rng.gen_range(MIN_CORRIDOR_LENGTH..MAX_CORRIDOR_LENGTH);
    let width = rng.gen_range(MIN_CORRIDOR_WIDTH..MAX_CORRIDOR_WIDTH);
    let height = rng.gen_range(MIN_CORRIDOR_HEIGHT..MAX_CORRIDOR_HEIGHT);
    let sloped = rng.gen::<f64>() < ELEVATION_CHANGE_CHANCE;
    let elevation_per_meter =
        rng.gen_range(MIN_ELEVATION_CHANGE_PER_METER..MAX_ELEVATION_CHANGE_PER_METER);
    let margin = rng.gen_range(MIN_ELEVATION_CHANGE_MARGIN..MAX_ELEVATION_CHANGE_MARGIN);

    let mut builder = MeshBuilder::new();
    let ground_plan = Polygon::rectangle(length, width);

    let elevation = if sloped { elevation_per_meter * (length - 2.0 * margin) } else { 0.0 };
    let module_height = height + elevation;

    let b1 = Point3::new(0.0, 0.0, 0.0);
    let b2 = Point3::new(length, 0.0, 0.0);
    let b3 = Point3::new(length, 0.0, width);
    let b4 = Point3::new(0.0, 0.0, width);
    let t1 = Point3::new(0.0, module_height, 0.0);
    let t2 = Point3::new(length, module_height, 0.0);
    let t3 = Point3::new(length, module_height, width);
    let t4 = Point3::new(0.0, module_height, width);

    let zero = Point2::new(0.0, 0.0);
    let ws = config.wall_texture_scale;
    let fs = config.floor_texture_scale;

    let wall_submesh = builder.add_submesh(config.wall_material.clone());
    builder.build_plane(
        wall_submesh,
        b1,
        t1,
        t2,
        b2,
        zero,
        Point2::new(length * ws, module_height * ws),
    )?;
    let exit_wall_1 = builder.build_plane(
        wall_submesh,
        b2,
        t2,
        t3,
        b3,
        zero,
        Point2::new(width * ws, module_height * ws),
    )?;
    builder.build_plane(
        wall_submesh,
        b3,
        t3,
        t4,
        b4,
        zero,
        Point2::new(length * ws, module_height * ws),
    )?;
    let exit_wall_2 = builder.build_plane(
        wall_submesh,
        b4,
        t4,
        t1,
        b1,
        zero,
        Point2::new(width * ws, module_height * ws),
    )?;

    let ceiling_submesh = builder.add_submesh(config.ceiling_material.clone());
    builder.build_plane(
        ceiling_submesh,
        t1,
        t4,
        t3,
        t2,
        zero,
        Point2::new(length * fs, width * fs),
    )?;

    let floor_submesh = builder.add_submesh(config.floor_material.clone());
    if !sloped {
        builder.build_plane(
            floor_submesh,
            b1,
            b2,
            b3,
            b4,
            zero,
            Point2::new(width * fs, length * fs),
        )?;
    } else {
        // Flat landing, slope, flat landing.
        let e1 = Point3::new(margin, 0.0, 0.0);
        let e2 = Point3::new(length - margin, elevation, 0.0);
        let e3 = Point3::new(length - margin, elevation, width);
        let e4 = Point3::new(margin, 0.0, width);
        let f2 = Point3::new(length, elevation, 0.0);
        let f3 = Point3::new(length, elevation, width);

        builder.build_plane(
            floor_submesh,
            b1,
            e1,
            e4,
            b4,
            zero,
            Point2::new(width * fs, margin * fs),
        )?;
        builder.build_plane(
            floor_submesh,
            e1,
            e2,
            e3,
            e4,
            Point2::new(0.0, margin * fs),
            Point2::new(width * fs, (length - margin) * fs),
        )?;
        builder.build_plane(
            floor_submesh,
            e2,
            f2,
            f3,
            e3,
            Point2::new(0.0, (length - margin) * fs),
            Point2::new(width * fs, length * fs),
        )?;
    }

    // The far exit sits on the raised floor when the corridor slopes.
    let exit_1_pos = Point3::new(length, elevation, width / 2.0);
    let exit_1 = ExitPoint::new(exit_1_pos, 90.0, exit_wall_1, width, 0.5);
    let exit_2_pos = Point3::new(0.0, 0.0, width / 2.0);
    let exit_2 = ExitPoint::new(exit_2_pos, 270.0, exit_wall_2, width, 0.5);

    Ok(DungeonModule::new(
        ModuleKind::Corridor,
        ground_plan,
        module_height,
        vec![exit_1, exit_2],
        builder,
        wall_submesh,
    ))
}

/// Draw exit points for a walled room: every wall long enough gets one
/// with a per-wall chance, rerolling until at least one wall qualifies.
pub fn random_exit_points<R: Rng + ?Sized>(
    builder: &MeshBuilder,
    room: &MeshRoom,
    config: &DungeonConfig,
    rng: &mut R,
) -> Vec<ExitPoint> {
    let mut exits = Vec::new();
    while exits.is_empty() {
        for wall in &room.walls {
            let start = builder.vertex(wall.vertices[0]).position;
            let end = builder.vertex(wall.vertices[3]).position;
            let point = Vector2::new(start.x, start.z);
            let wall_vector = Vector2::new(end.x - start.x, end.z - start.z);
            let wall_length = wall_vector.norm();

            if wall_length <= config.min_wall_length_for_exit_point {
                continue;
            }
            if rng.gen::<f64>() > config.exit_point_chance_per_wall {
                continue;
            }

            let split_ratio = rng.gen_range(0.35..0.65);
            let pos_2d = point + split_ratio * wall_vector;
            let position = Point3::new(pos_2d.x, 0.0, pos_2d.y);
            let direction =
                90.0 + signed_angle_deg(wall_vector.normalize(), Vector2::new(0.0, 1.0));

            exits.push(ExitPoint::new(position, direction, *wall, wall_length, split_ratio));
        }
    }
    exits
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_room_has_exit_points() {
        let config = DungeonConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let room = generate_room(&config, &mut rng).unwrap();
        assert!(!room.exits().is_empty());
        assert!(room.height() >= MIN_ROOM_HEIGHT && room.height() < MAX_ROOM_HEIGHT);
        assert!(room.mesh().unwrap().triangle_count() > 0);
    }

    #[test]
    fn test_room_generation_survives_self_intersecting_plans() {
        // A small fraction of random ground plans self-intersect; the
        // generator redraws those, so a long streak of rooms never fails.
        let config = DungeonConfig::default();
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..200 {
            let room = generate_room(&config, &mut rng).unwrap();
            assert!(room.mesh().unwrap().triangle_count() > 0);
        }
    }

    #[test]
    fn test_corridor_has_two_opposite_exits() {
        let config = DungeonConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let corridor = generate_corridor(&config, &mut rng).unwrap();
        let exits = corridor.exits();
        assert_eq!(exits.len(), 2);
        let transform = corridor.transform();
        assert!((exits[0].world_direction(transform) - 90.0).abs() < 1e-9);
        assert!((exits[1].world_direction(transform) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_hall_footprint_is_rectangular() {
        let config = DungeonConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let hall = generate_hall(&config, &mut rng).unwrap();
        assert_eq!(hall.footprint().len(), 4);
        let dims = hall.footprint().dimensions();
        assert!(dims.x >= MIN_HALL_SIZE && dims.x < MAX_HALL_SIZE);
        assert!(dims.y >= MIN_HALL_SIZE && dims.y < MAX_HALL_SIZE);
    }

    #[test]
    fn test_exit_directions_point_outward() {
        // On a rectangle walked counter-clockwise in the ground plane the
        // wall from (0,0) to (L,0) faces south (180 degrees).
        let config = DungeonConfig {
            exit_point_chance_per_wall: 1.0,
            ..DungeonConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut builder = MeshBuilder::new();
        let plan = Polygon::rectangle(10.0, 10.0);
        let room = builder
            .build_room(
                &plan,
                3.0,
                config.floor_material.clone(),
                config.wall_material.clone(),
                config.ceiling_material.clone(),
                config.floor_texture_scale,
                config.wall_texture_scale,
            )
            .unwrap();
        let exits = random_exit_points(&builder, &room, &config, &mut rng);
        assert_eq!(exits.len(), 4);
        let transform = super::super::ModuleTransform::default();
        let mut directions: Vec<f64> = exits
            .iter()
            .map(|e| e.world_direction(&transform).rem_euclid(360.0))
            .collect();
        directions.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (dir, expected) in directions.iter().zip([0.0, 90.0, 180.0, 270.0]) {
            assert!((dir - expected).abs() < 1e-6, "{directions:?}");
        }
    }
}
