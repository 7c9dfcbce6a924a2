//! Guided flight: straight tracking phase, radar homing, and life span.
//!
//! Direct and spread projectiles keep their launch velocity and need no
//! steering; only entities carrying `Guidance` are visited here.

use hecs::{Entity, World};

use gemfire_core::components::{Guidance, Lifecycle, Projectile, TrailState};
use gemfire_core::constants::{LOCK_ON_SPEED_FACTOR, TIMER_EPSILON};
use gemfire_core::enums::{CategoryMask, ProjectilePhase, TrailKind};
use gemfire_core::events::SimEvent;
use gemfire_core::types::{step_towards, Position, Velocity};

use crate::entity_id;
use crate::radar::{self, Radar};

/// Steer guided projectiles for one tick. Projectiles whose life span ran
/// out are pushed to `expired` for resolution.
pub fn run(
    world: &mut World,
    radar: &Radar,
    dt: f64,
    events: &mut Vec<SimEvent>,
    expired: &mut Vec<Entity>,
) {
    let candidates = radar.candidates(world, CategoryMask::ENEMY);

    for (entity, (pos, vel, guidance, life, trail, projectile)) in world.query_mut::<(
        &mut Position,
        &mut Velocity,
        &mut Guidance,
        &Lifecycle,
        &mut TrailState,
        &Projectile,
    )>() {
        if life.phase != ProjectilePhase::Flying || life.released {
            continue;
        }

        guidance.life_secs -= dt;
        if guidance.life_secs <= TIMER_EPSILON {
            guidance.life_secs = 0.0;
            expired.push(entity);
            continue;
        }

        if guidance.tracking_secs > TIMER_EPSILON {
            guidance.tracking_secs = (guidance.tracking_secs - dt).max(0.0);
            vel.0 = guidance.direction * projectile.speed;
            continue;
        }

        let locked = match radar::nearest(candidates.iter().copied(), pos.0) {
            Some((_, target)) => {
                vel.0 = glam::DVec2::ZERO;
                pos.0 = step_towards(pos.0, target, LOCK_ON_SPEED_FACTOR * projectile.speed * dt);
                if let Some(direction) = (target - pos.0).try_normalize() {
                    guidance.direction = direction;
                }
                true
            }
            None => {
                vel.0 = guidance.direction * projectile.speed;
                false
            }
        };

        if guidance.locked != locked {
            guidance.locked = locked;
            set_trail(entity, trail, locked, events);
        }
    }
}

/// Switch a trail on or off, reporting only actual changes.
pub(crate) fn set_trail(
    entity: Entity,
    trail: &mut TrailState,
    on: bool,
    events: &mut Vec<SimEvent>,
) {
    let on = on && trail.kind != TrailKind::None;
    if trail.on != on {
        trail.on = on;
        events.push(SimEvent::TrailChanged {
            projectile: entity_id(entity),
            on,
        });
    }
}
