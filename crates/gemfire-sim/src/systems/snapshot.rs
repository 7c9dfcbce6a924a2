//! Snapshot system: queries the ECS world and builds a complete FrameSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use gemfire_core::components::*;
use gemfire_core::config::BulletType;
use gemfire_core::enums::*;
use gemfire_core::events::SimEvent;
use gemfire_core::state::*;
use gemfire_core::types::{Position, SimTime, Velocity};

use crate::emitter::Emitter;
use crate::entity_id;

/// Build a complete FrameSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    emitter: &Emitter,
    catalogue: &[BulletType],
    events: Vec<SimEvent>,
) -> FrameSnapshot {
    FrameSnapshot {
        time: *time,
        phase,
        emitter: build_emitter(emitter, catalogue),
        projectiles: build_projectiles(world),
        minis: build_minis(world),
        targets: build_targets(world),
        events,
    }
}

fn build_emitter(emitter: &Emitter, catalogue: &[BulletType]) -> EmitterView {
    EmitterView {
        bullet_type: emitter.bullet_index(),
        bullet_name: catalogue
            .get(emitter.bullet_index())
            .map(|b| b.name.clone())
            .unwrap_or_default(),
        caster_position: emitter.caster().position,
        cooldown_secs: emitter.cooldown_secs(),
        energy: emitter.energy(),
        max_energy: emitter.max_energy(),
        detection_radius: emitter.detection_radius(),
        pool_free: emitter.pool().free_len(),
        pool_size: emitter.pool().len(),
        feedback_running: emitter.feedback().is_running(),
    }
}

/// Flying projectiles only; pooled instances at rest are not visible.
fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(
            &Position,
            &Velocity,
            &Projectile,
            &Lifecycle,
            &TrailState,
            Option<&Guidance>,
        )>()
        .iter()
        .filter(|(_, (_, _, _, life, _, _))| {
            !life.released && life.phase == ProjectilePhase::Flying
        })
        .map(|(entity, (pos, vel, projectile, _, trail, guidance))| ProjectileView {
            id: entity_id(entity),
            bullet_type: projectile.bullet_type,
            pattern: projectile.pattern,
            position: pos.0,
            velocity: vel.0,
            alt: projectile.alt,
            trail_on: trail.on,
            locked: guidance.is_some_and(|g| g.locked),
        })
        .collect();

    projectiles.sort_by_key(|p| p.id);
    projectiles
}

fn build_minis(world: &World) -> Vec<MiniView> {
    let mut minis: Vec<MiniView> = world
        .query::<(&Position, &MiniGuided, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, _, life))| !life.released && life.phase == ProjectilePhase::Flying)
        .map(|(entity, (pos, mini, _))| MiniView {
            id: entity_id(entity),
            position: pos.0,
            found_target: mini.found_target,
            life_secs: mini.life_secs,
        })
        .collect();

    minis.sort_by_key(|m| m.id);
    minis
}

fn build_targets(world: &World) -> Vec<TargetView> {
    let mut targets: Vec<TargetView> = world
        .query::<(&Position, &Target)>()
        .iter()
        .map(|(entity, (pos, target))| TargetView {
            id: entity_id(entity),
            category: target.category,
            position: pos.0,
            health: target.health,
        })
        .collect();

    targets.sort_by_key(|t| t.id);
    targets
}
