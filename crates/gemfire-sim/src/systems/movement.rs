//! Kinematic integration system.
//!
//! Updates Position from Velocity each tick for active entities:
//! position += velocity * dt. Pooled (idle) instances stay put.

use hecs::World;

use gemfire_core::components::Lifecycle;
use gemfire_core::enums::ProjectilePhase;
use gemfire_core::types::{Position, Velocity};

pub fn run(world: &mut World, dt: f64) {
    for (_entity, (pos, vel, life)) in
        world.query_mut::<(&mut Position, &Velocity, &Lifecycle)>()
    {
        if life.phase == ProjectilePhase::Flying && !life.released {
            pos.0 += vel.0 * dt;
        }
    }
}
