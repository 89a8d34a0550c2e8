//! Procedural dungeon assembly.
//!
//! Modules (rooms, corridors, halls) are generated in local space with
//! exit points on their walls, then stitched together by the
//! [`DungeonAssembler`]: candidates are aligned and rotated onto an open
//! exit of the growing dungeon, rejected on footprint collision, and
//! committed with carved doorways and a [`Gate`] piece spanning the gap.
//!
//! All randomness flows through an explicitly seeded RNG handed to the
//! generators and the assembler, so equal seeds reproduce equal dungeons.

mod assembler;
mod config;
mod gate;
pub mod generators;
mod module;

pub use assembler::{AssemblerState, DungeonAssembler, DungeonLayout};
pub use config::DungeonConfig;
pub use gate::{Gate, GateSide};
pub use generators::{generate_module, ModuleKind};
pub use module::{DungeonModule, ExitPoint, ExitRef, ModuleId, ModuleTransform};
