//! Assembly configuration.
//!
//! All tuning constants of the dungeon growth are carried by an explicit
//! [`DungeonConfig`] value handed to the generators and the assembler;
//! there is no process-wide registry.

use crate::mesh::Material;

use super::generators::ModuleKind;

/// Configuration for module generation and dungeon assembly.
#[derive(Debug, Clone)]
pub struct DungeonConfig {
    /// Gap between two connected exit points, left for the gate piece.
    pub connection_length: f64,
    /// Width of the carved doorway and the gate volume.
    pub connection_width: f64,
    /// Height of the carved doorway and the gate volume.
    pub connection_height: f64,

    /// Chance per qualifying wall that a module generator places an exit
    /// point on it.
    pub exit_point_chance_per_wall: f64,
    /// Walls shorter than this never get an exit point.
    pub min_wall_length_for_exit_point: f64,

    /// Consecutive colliding placements tolerated before the assembly
    /// terminates gracefully.
    pub max_failed_attempts: u32,
    /// Hard cap on the number of placed modules.
    pub max_modules: usize,

    /// UV scale for floors and ceilings.
    pub floor_texture_scale: f64,
    /// UV scale for walls.
    pub wall_texture_scale: f64,

    /// Static integer population weights for drawing the next module type.
    pub module_weights: Vec<(ModuleKind, u32)>,

    /// Material applied to floors.
    pub floor_material: Material,
    /// Material applied to walls.
    pub wall_material: Material,
    /// Material applied to ceilings.
    pub ceiling_material: Material,
    /// Material applied to gate volumes.
    pub gate_material: Material,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            connection_length: 0.2,
            connection_width: 1.2,
            connection_height: 2.0,
            exit_point_chance_per_wall: 0.35,
            min_wall_length_for_exit_point: 2.5,
            max_failed_attempts: 40,
            max_modules: 50,
            floor_texture_scale: 0.1,
            wall_texture_scale: 0.2,
            module_weights: vec![
                (ModuleKind::Room, 100),
                (ModuleKind::Corridor, 100),
                (ModuleKind::Hall, 25),
            ],
            floor_material: Material::new("floor"),
            wall_material: Material::new("wall"),
            ceiling_material: Material::new("ceiling"),
            gate_material: Material::new("gate"),
        }
    }
}
