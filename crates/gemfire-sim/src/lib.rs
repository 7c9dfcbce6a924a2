//! Simulation engine for GEMFIRE.
//!
//! Owns the hecs ECS world, runs the emitter, projectile, and resolution
//! systems at a fixed tick rate, and produces `FrameSnapshot`s for the host.

pub mod emitter;
pub mod engine;
pub mod feedback;
pub mod pool;
pub mod projectile;
pub mod radar;
pub mod scheduler;
pub mod systems;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use gemfire_core as core;

use gemfire_core::types::EntityId;

/// Snapshot/event identifier for an ECS entity.
pub fn entity_id(entity: hecs::Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

#[cfg(test)]
mod tests;
