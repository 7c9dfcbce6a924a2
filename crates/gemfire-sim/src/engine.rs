//! Simulation engine — the core of the emitter runtime.
//!
//! `SimulationEngine` owns the hecs ECS world, processes host commands,
//! samples the input frame, runs all systems, and produces `FrameSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use gemfire_core::commands::{InputFrame, SimCommand};
use gemfire_core::config::Tuning;
use gemfire_core::enums::GamePhase;
use gemfire_core::events::SimEvent;
use gemfire_core::state::FrameSnapshot;
use gemfire_core::types::SimTime;

use crate::emitter::{Emitter, FireContext};
use crate::radar::Radar;
use crate::scheduler::Scheduler;
use crate::systems;
use crate::systems::contacts::CollisionEvent;
use crate::systems::resolve::ResolveContext;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Emitter tuning and bullet-type catalogue.
    pub tuning: Tuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tuning: Tuning::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    tuning: Tuning,
    emitter: Emitter,
    radar: Radar,
    scheduler: Scheduler,
    input: InputFrame,
    command_queue: VecDeque<SimCommand>,
    collision_queue: Vec<CollisionEvent>,
    despawn_buffer: Vec<Entity>,
    expired_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let emitter = Emitter::new(&config.tuning);
        let radar = Radar::new(emitter.radar_region());
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tuning: config.tuning,
            emitter,
            radar,
            scheduler: Scheduler::new(),
            input: InputFrame::default(),
            command_queue: VecDeque::new(),
            collision_queue: Vec::new(),
            despawn_buffer: Vec::new(),
            expired_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue a host command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Set the input frame sampled by subsequent ticks. Held buttons stay
    /// held until the next call.
    pub fn set_input(&mut self, input: InputFrame) {
        self.input = input;
    }

    /// Queue a collision reported by an external physics layer. Consumed
    /// with the detected contacts of the next active tick.
    pub fn queue_collision(&mut self, event: CollisionEvent) {
        self.collision_queue.push(event);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> FrameSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.emitter,
            &self.tuning.bullet_types,
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get the emitter (cooldown, energy, pool).
    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Get the tuning the engine was built with.
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Deferred resolutions still waiting to fire.
    pub fn pending_deferred(&self) -> usize {
        self.scheduler.len()
    }

    /// Scatter enemies around the caster inside its detection region.
    pub fn spawn_range_targets(&mut self, count: usize) -> Vec<Entity> {
        let region = self.emitter.radar_region();
        world_setup::spawn_range_targets(
            &mut self.world,
            &mut self.rng,
            count,
            region.center,
            region.radius,
        )
    }

    /// Mutable world access for tests that stage entities directly.
    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub(crate) fn emitter_mut(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single host command.
    fn handle_command(&mut self, command: SimCommand) {
        match command {
            SimCommand::StartSession => {
                if self.phase == GamePhase::Setup {
                    self.select_bullet_type(0);
                    self.phase = GamePhase::Active;
                    info!(
                        bullet_types = self.tuning.bullet_types.len(),
                        "session started"
                    );
                }
            }
            SimCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            SimCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            SimCommand::SelectBulletType { index } => {
                self.select_bullet_type(index);
            }
            SimCommand::CycleBulletType => {
                let count = self.tuning.bullet_types.len();
                if count > 0 {
                    self.select_bullet_type((self.emitter.bullet_index() + 1) % count);
                }
            }
            SimCommand::MoveCaster { position } => {
                self.emitter.set_caster_position(position);
                self.radar.set_region(self.emitter.radar_region());
            }
            SimCommand::SpawnTarget {
                position,
                health,
                radius,
            } => {
                let entity = world_setup::spawn_target(&mut self.world, position, health, radius);
                debug!(?entity, ?position, health, "target spawned");
            }
            SimCommand::SpawnKillZone { min, max } => {
                world_setup::spawn_kill_zone(&mut self.world, min, max);
            }
        }
    }

    fn select_bullet_type(&mut self, index: usize) {
        let selected = self.emitter.select(
            index,
            &self.tuning.bullet_types,
            &mut self.world,
            &mut self.events,
        );
        if selected {
            self.radar.set_region(self.emitter.radar_region());
        } else {
            warn!(
                index,
                available = self.tuning.bullet_types.len(),
                "bullet type index out of range"
            );
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let dt = self.time.dt();
        let now = self.time.elapsed_secs;

        // 1. Emitter: cooldown, energy, feedback, firing
        let mut fire = FireContext {
            world: &mut self.world,
            rng: &mut self.rng,
            catalogue: &self.tuning.bullet_types,
            events: &mut self.events,
        };
        self.emitter.tick(dt, &self.input, &mut fire);
        self.radar.set_region(self.emitter.radar_region());

        // 2. Guided flight and sub-projectile homing
        systems::flight::run(
            &mut self.world,
            &self.radar,
            dt,
            &mut self.events,
            &mut self.expired_buffer,
        );
        systems::minis::run(
            &mut self.world,
            &self.radar,
            dt,
            &mut self.events,
            &mut self.expired_buffer,
        );

        // 3. Deferred kill-zone resolutions, then expired life spans
        let mut ctx = ResolveContext {
            world: &mut self.world,
            pool: self.emitter.pool_mut(),
            scheduler: &mut self.scheduler,
            rng: &mut self.rng,
            events: &mut self.events,
            despawn_buffer: &mut self.despawn_buffer,
            now,
        };
        systems::resolve::run_deferred(&mut ctx);
        systems::resolve::run_expired(&mut ctx, &mut self.expired_buffer);

        // 4. Movement integration
        systems::movement::run(&mut *ctx.world, dt);

        // 5. Contact detection and collision resolution
        systems::contacts::run(&*ctx.world, &self.radar.region(), &mut self.collision_queue);
        systems::resolve::run_collisions(&mut ctx, &mut self.collision_queue);

        // 6. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }
}
