//! Contact detection: a minimal stand-in for the physics layer's trigger
//! callbacks.
//!
//! Produces `CollisionEvent`s from circle overlap against enemies, exit
//! from the range boundary, and entry into kill zones. A host with its own
//! physics can skip this system and queue events directly on the engine.

use glam::DVec2;
use hecs::{Entity, World};

use gemfire_core::components::{KillZone, Lifecycle, MiniGuided, Projectile, Target};
use gemfire_core::constants::PROJECTILE_RADIUS;
use gemfire_core::enums::{ContactKind, ProjectilePhase, TargetCategory};
use gemfire_core::types::{Circle, Position};

/// A trigger callback, queued and consumed once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// The projectile or sub-projectile involved.
    pub projectile: Entity,
    /// The other collider, when it is an entity.
    pub other: Option<Entity>,
    pub category: TargetCategory,
    pub kind: ContactKind,
}

/// Detect contacts for every flying projectile and sub-projectile.
/// `range` is the boundary projectiles must stay inside.
pub fn run(world: &World, range: &Circle, queue: &mut Vec<CollisionEvent>) {
    let enemies: Vec<(Entity, DVec2, f64)> = {
        let mut query = world.query::<(&Position, &Target)>();
        query
            .iter()
            .filter(|(_, (_, t))| t.category == TargetCategory::Enemy && t.health > 0.0)
            .map(|(e, (p, t))| (e, p.0, t.radius))
            .collect()
    };
    let zones: Vec<(Entity, KillZone)> = {
        let mut query = world.query::<&KillZone>();
        query.iter().map(|(e, z)| (e, *z)).collect()
    };

    let mut projectiles = world.query::<(&Position, &Lifecycle, &Projectile)>();
    for (entity, (pos, life, _)) in projectiles.iter() {
        if !is_flying(life) {
            continue;
        }
        if let Some(enemy) = overlapping_enemy(&enemies, pos.0) {
            queue.push(CollisionEvent {
                projectile: entity,
                other: Some(enemy),
                category: TargetCategory::Enemy,
                kind: ContactKind::Enter,
            });
        }
        if !range.contains(pos.0) {
            queue.push(CollisionEvent {
                projectile: entity,
                other: None,
                category: TargetCategory::RangeLimit,
                kind: ContactKind::Exit,
            });
        }
        push_zone_entry(&zones, entity, pos.0, life, queue);
    }

    let mut minis = world.query::<(&Position, &Lifecycle, &MiniGuided)>();
    for (entity, (pos, life, _)) in minis.iter() {
        if !is_flying(life) {
            continue;
        }
        if let Some(enemy) = overlapping_enemy(&enemies, pos.0) {
            queue.push(CollisionEvent {
                projectile: entity,
                other: Some(enemy),
                category: TargetCategory::Enemy,
                kind: ContactKind::Enter,
            });
        }
        push_zone_entry(&zones, entity, pos.0, life, queue);
    }
}

fn is_flying(life: &Lifecycle) -> bool {
    life.phase == ProjectilePhase::Flying && !life.released
}

/// Closest enemy whose collider overlaps a projectile at `point`.
fn overlapping_enemy(enemies: &[(Entity, DVec2, f64)], point: DVec2) -> Option<Entity> {
    enemies
        .iter()
        .filter(|(_, p, r)| {
            let reach = r + PROJECTILE_RADIUS;
            p.distance_squared(point) <= reach * reach
        })
        .min_by(|(_, a, _), (_, b, _)| {
            a.distance_squared(point)
                .total_cmp(&b.distance_squared(point))
        })
        .map(|(e, _, _)| *e)
}

fn push_zone_entry(
    zones: &[(Entity, KillZone)],
    entity: Entity,
    point: DVec2,
    life: &Lifecycle,
    queue: &mut Vec<CollisionEvent>,
) {
    if life.doomed {
        return;
    }
    if let Some((zone, _)) = zones.iter().find(|(_, z)| z.area.contains(point)) {
        queue.push(CollisionEvent {
            projectile: entity,
            other: Some(*zone),
            category: TargetCategory::DestroyZone,
            kind: ContactKind::Enter,
        });
    }
}
