//! The dungeon assembly state machine.
//!
//! A [`DungeonAssembler`] grows a dungeon one module at a time: draw a
//! module type, generate it, pick an exit point on it and an unconnected
//! exit point of the dungeon, move and rotate the module so the two exits
//! face each other across the standoff gap, then either commit it (and
//! carve the doorways and build a gate) or discard it if its footprint
//! collides with a placed module.
//!
//! The machine is driven by [`step`](DungeonAssembler::step) so hosts can
//! observe or animate the assembly; [`run`](DungeonAssembler::run) drives
//! it to completion.

use nalgebra::Point3;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{GenError, Result};

use super::config::DungeonConfig;
use super::gate::{Gate, GateSide};
use super::generators::{self, ModuleKind};
use super::module::{DungeonModule, ExitRef, ModuleId};

/// Observable phase of the assembly, reported after every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// Nothing placed yet.
    Start,
    /// About to generate the next candidate module.
    AddModule,
    /// Candidate generated, exit points not yet chosen.
    ChooseExitPoints,
    /// Exits chosen, candidate not yet aligned.
    AlignModule,
    /// Candidate translated onto the target, not yet rotated.
    RotateModule,
    /// Candidate placed without collision, about to be committed.
    ApplyModule,
    /// Candidate collided and is about to be discarded.
    DestroyModule,
    /// Committed module's doorways and gate are about to be built.
    BuildConnection,
    /// Growth has ended; final bookkeeping.
    Finalize,
    /// Assembly complete.
    Done,
}

/// Internal machine state, carrying the in-flight candidate through the
/// placement phases.
enum Step {
    Start,
    AddModule,
    ChooseExitPoints {
        module: DungeonModule,
    },
    AlignModule {
        module: DungeonModule,
        module_exit: usize,
        target: ExitRef,
    },
    RotateModule {
        module: DungeonModule,
        module_exit: usize,
        target: ExitRef,
    },
    ApplyModule {
        module: DungeonModule,
        module_exit: usize,
        target: ExitRef,
    },
    DestroyModule,
    BuildConnection {
        module_exit: ExitRef,
        target: ExitRef,
    },
    Finalize,
    Done,
}

impl Step {
    fn state(&self) -> AssemblerState {
        match self {
            Step::Start => AssemblerState::Start,
            Step::AddModule => AssemblerState::AddModule,
            Step::ChooseExitPoints { .. } => AssemblerState::ChooseExitPoints,
            Step::AlignModule { .. } => AssemblerState::AlignModule,
            Step::RotateModule { .. } => AssemblerState::RotateModule,
            Step::ApplyModule { .. } => AssemblerState::ApplyModule,
            Step::DestroyModule => AssemblerState::DestroyModule,
            Step::BuildConnection { .. } => AssemblerState::BuildConnection,
            Step::Finalize => AssemblerState::Finalize,
            Step::Done => AssemblerState::Done,
        }
    }
}

/// The finished dungeon: every committed module plus the gates bridging
/// them.
#[derive(Debug)]
pub struct DungeonLayout {
    /// All placed modules, root first, indexed by [`ModuleId`].
    pub modules: Vec<DungeonModule>,
    /// All gates, in construction order.
    pub gates: Vec<Gate>,
}

/// Grows a dungeon from a root room by attaching modules at exit points.
pub struct DungeonAssembler {
    config: DungeonConfig,
    step: Step,
    modules: Vec<DungeonModule>,
    gates: Vec<Gate>,
    open_exits: Vec<ExitRef>,
    failed_attempts: u32,
    next_kind: ModuleKind,
}

impl DungeonAssembler {
    /// Create an assembler that has placed nothing yet.
    pub fn new(config: DungeonConfig) -> Self {
        Self {
            config,
            step: Step::Start,
            modules: Vec::new(),
            gates: Vec::new(),
            open_exits: Vec::new(),
            failed_attempts: 0,
            next_kind: ModuleKind::Room,
        }
    }

    /// The phase the machine is currently in.
    pub fn state(&self) -> AssemblerState {
        self.step.state()
    }

    /// Modules committed so far, indexed by [`ModuleId`].
    pub fn modules(&self) -> &[DungeonModule] {
        &self.modules
    }

    /// Gates built so far.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Exit points not yet consumed by a gate.
    pub fn open_exits(&self) -> &[ExitRef] {
        &self.open_exits
    }

    /// Consecutive candidate placements discarded since the last commit.
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Drive the machine to completion.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        while self.state() != AssemblerState::Done {
            self.step(rng)?;
        }
        Ok(())
    }

    /// Perform one transition and report the phase the machine moved to.
    /// Stepping a finished machine is a no-op that reports
    /// [`AssemblerState::Done`].
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<AssemblerState> {
        let step = std::mem::replace(&mut self.step, Step::Done);
        self.step = match step {
            Step::Start => {
                let root = generators::generate_room(&self.config, rng)?;
                self.commit_module(root);
                self.next_kind = self.draw_module_kind(rng)?;
                log::info!("placed root room, {} open exits", self.open_exits.len());
                self.grow_or_finalize()
            }

            Step::AddModule => {
                let module = generators::generate_module(self.next_kind, &self.config, rng)?;
                log::debug!("generated candidate {:?}", module.kind());
                Step::ChooseExitPoints { module }
            }

            Step::ChooseExitPoints { module } => {
                let module_exit = rng.gen_range(0..module.exits().len());
                let target = self.open_exits[rng.gen_range(0..self.open_exits.len())];
                Step::AlignModule { module, module_exit, target }
            }

            Step::AlignModule { mut module, module_exit, target } => {
                let standoff = self.standoff_point(target);
                let exit_world =
                    module.exits()[module_exit].world_position(module.transform());
                module.transform_mut().translate(standoff - exit_world);
                Step::RotateModule { module, module_exit, target }
            }

            Step::RotateModule { mut module, module_exit, target } => {
                let target_module = &self.modules[target.module.0];
                let target_direction =
                    target_module.exits()[target.exit].world_direction(target_module.transform());
                let module_direction =
                    module.exits()[module_exit].world_direction(module.transform());
                // Facing exits differ by 180 degrees.
                let rotation = 180.0 - (module_direction - target_direction);
                let pivot = self.standoff_point(target);
                module.transform_mut().rotate_around(pivot, rotation);

                if self.modules.iter().any(|placed| module.collides_with(placed)) {
                    Step::DestroyModule
                } else {
                    Step::ApplyModule { module, module_exit, target }
                }
            }

            Step::ApplyModule { module, module_exit, target } => {
                let id = ModuleId(self.modules.len());
                self.commit_module(module);
                let module_exit = ExitRef { module: id, exit: module_exit };
                self.open_exits.retain(|&r| r != module_exit && r != target);
                self.failed_attempts = 0;
                self.next_kind = self.draw_module_kind(rng)?;
                Step::BuildConnection { module_exit, target }
            }

            Step::BuildConnection { module_exit, target } => {
                self.modules[module_exit.module.0]
                    .open_exit(module_exit.exit, &self.config)?;
                self.modules[target.module.0].open_exit(target.exit, &self.config)?;

                let gate = Gate::build(
                    &self.config,
                    self.gate_side(target),
                    self.gate_side(module_exit),
                )?;
                self.gates.push(gate);
                log::debug!(
                    "connected module {} exit {} to module {} exit {}",
                    module_exit.module.0,
                    module_exit.exit,
                    target.module.0,
                    target.exit
                );
                self.grow_or_finalize()
            }

            Step::DestroyModule => {
                self.failed_attempts += 1;
                log::debug!("candidate collided ({} failed attempts)", self.failed_attempts);
                if self.failed_attempts > self.config.max_failed_attempts {
                    Step::Finalize
                } else {
                    Step::AddModule
                }
            }

            Step::Finalize => {
                log::info!(
                    "dungeon finished: {} modules, {} gates, {} open exits left",
                    self.modules.len(),
                    self.gates.len(),
                    self.open_exits.len()
                );
                Step::Done
            }

            Step::Done => Step::Done,
        };
        Ok(self.state())
    }

    /// Consume the assembler and hand out the finished layout.
    pub fn into_layout(self) -> DungeonLayout {
        DungeonLayout { modules: self.modules, gates: self.gates }
    }

    /// Register a module and all its exit points as open.
    fn commit_module(&mut self, module: DungeonModule) {
        let id = ModuleId(self.modules.len());
        self.open_exits
            .extend((0..module.exits().len()).map(|exit| ExitRef { module: id, exit }));
        self.modules.push(module);
    }

    fn grow_or_finalize(&self) -> Step {
        if self.open_exits.is_empty() || self.modules.len() >= self.config.max_modules {
            Step::Finalize
        } else {
            Step::AddModule
        }
    }

    /// The point the gap's width ahead of an open exit, where the new
    /// module's exit must end up.
    fn standoff_point(&self, target: ExitRef) -> Point3<f64> {
        let module = &self.modules[target.module.0];
        module.exits()[target.exit].forward_position(module.transform(), self.config.connection_length)
    }

    fn gate_side(&self, exit_ref: ExitRef) -> GateSide<'_> {
        let module = &self.modules[exit_ref.module.0];
        GateSide {
            exit_ref,
            exit: &module.exits()[exit_ref.exit],
            transform: module.transform(),
        }
    }

    fn draw_module_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ModuleKind> {
        let dist = WeightedIndex::new(self.config.module_weights.iter().map(|(_, w)| *w))
            .map_err(|e| GenError::InvalidConfig { reason: e.to_string() })?;
        Ok(self.config.module_weights[dist.sample(rng)].0)
    }
}
