//! Entity spawn factories for setting up the simulation world.
//!
//! Creates enemy targets and kill zones with appropriate component bundles.

use glam::DVec2;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use gemfire_core::components::{KillZone, Target};
use gemfire_core::enums::TargetCategory;
use gemfire_core::types::{Position, Rect};

/// Default health of targets scattered by `spawn_range_targets`.
const RANGE_TARGET_HEALTH: f64 = 3.0;
/// Default collision radius of range targets.
const RANGE_TARGET_RADIUS: f64 = 0.5;

/// Spawn an enemy target.
pub fn spawn_target(world: &mut World, position: DVec2, health: f64, radius: f64) -> Entity {
    world.spawn((
        Position(position),
        Target {
            category: TargetCategory::Enemy,
            health,
            radius: radius.max(0.0),
        },
    ))
}

/// Spawn a rectangular kill zone spanning the two corners.
pub fn spawn_kill_zone(world: &mut World, a: DVec2, b: DVec2) -> Entity {
    let area = Rect::from_corners(a, b);
    world.spawn((Position((area.min + area.max) * 0.5), KillZone { area }))
}

/// Scatter `count` enemy targets uniformly inside the disc of `radius`
/// around `center`.
pub fn spawn_range_targets(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    count: usize,
    center: DVec2,
    radius: f64,
) -> Vec<Entity> {
    (0..count)
        .map(|_| {
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let distance = radius.max(0.0) * rng.gen::<f64>().sqrt();
            let position = center + DVec2::from_angle(angle) * distance;
            spawn_target(world, position, RANGE_TARGET_HEALTH, RANGE_TARGET_RADIUS)
        })
        .collect()
}
