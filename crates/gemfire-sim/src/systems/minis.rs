//! Guided sub-projectiles: randomized life span and immediate radar homing.

use hecs::{Entity, World};

use gemfire_core::components::{Lifecycle, MiniGuided, TrailState};
use gemfire_core::constants::{LOCK_ON_SPEED_FACTOR, TIMER_EPSILON};
use gemfire_core::enums::{CategoryMask, ProjectilePhase};
use gemfire_core::events::SimEvent;
use gemfire_core::types::{step_towards, Position, Velocity};

use crate::radar::{self, Radar};
use crate::systems::flight::set_trail;

/// Steer active sub-projectiles for one tick. Expired ones are pushed to
/// `expired` for resolution.
pub fn run(
    world: &mut World,
    radar: &Radar,
    dt: f64,
    events: &mut Vec<SimEvent>,
    expired: &mut Vec<Entity>,
) {
    let candidates = radar.candidates(world, CategoryMask::ENEMY);

    for (entity, (pos, vel, mini, life, trail)) in world.query_mut::<(
        &mut Position,
        &mut Velocity,
        &mut MiniGuided,
        &Lifecycle,
        &mut TrailState,
    )>() {
        if life.phase != ProjectilePhase::Flying || life.released {
            continue;
        }

        mini.life_secs -= dt;
        if mini.life_secs <= TIMER_EPSILON {
            mini.life_secs = 0.0;
            expired.push(entity);
            continue;
        }

        match radar::nearest(candidates.iter().copied(), pos.0) {
            Some((_, target)) => {
                mini.target = Some(target);
                mini.found_target = true;
                vel.0 = glam::DVec2::ZERO;
                pos.0 = step_towards(pos.0, target, LOCK_ON_SPEED_FACTOR * mini.speed * dt);
            }
            None => {
                mini.target = None;
                mini.found_target = false;
                vel.0 = mini.direction * mini.speed;
            }
        }
        set_trail(entity, trail, mini.found_target, events);
    }
}
