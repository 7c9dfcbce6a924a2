//! Resolution: the `Flying -> Resolving -> Idle | Destroyed` transition.
//!
//! Consumes the collision queue, expired life spans, and due deferred
//! callbacks. The `released` flag guards every entry point so a projectile
//! resolves at most once per activation cycle, whatever order the triggers
//! arrive in.

use glam::DVec2;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use gemfire_core::components::{Lifecycle, MiniGuided, Projectile, Target, TrailState};
use gemfire_core::config::MiniBurst;
use gemfire_core::constants::*;
use gemfire_core::enums::*;
use gemfire_core::events::SimEvent;
use gemfire_core::types::{Position, Velocity};

use crate::entity_id;
use crate::pool::ProjectilePool;
use crate::projectile::{SubPool, SubPoolMember};
use crate::scheduler::{Deferred, Scheduler};
use crate::systems::contacts::CollisionEvent;

/// Everything resolution touches.
pub struct ResolveContext<'a> {
    pub world: &'a mut World,
    pub pool: &'a mut ProjectilePool,
    pub scheduler: &'a mut Scheduler,
    pub rng: &'a mut ChaCha8Rng,
    pub events: &'a mut Vec<SimEvent>,
    pub despawn_buffer: &'a mut Vec<Entity>,
    /// Simulation clock (seconds).
    pub now: f64,
}

/// Drain the collision queue.
pub fn run_collisions(ctx: &mut ResolveContext, queue: &mut Vec<CollisionEvent>) {
    for event in queue.drain(..) {
        match (event.category, event.kind) {
            (TargetCategory::Enemy, ContactKind::Enter) => {
                resolve(ctx, event.projectile, ResolveCause::Hit, event.other);
            }
            (TargetCategory::RangeLimit, ContactKind::Exit) => {
                resolve(ctx, event.projectile, ResolveCause::OutOfRange, None);
            }
            (TargetCategory::DestroyZone, ContactKind::Enter) => {
                schedule_kill(ctx, event.projectile);
            }
            _ => trace!(?event, "contact ignored"),
        }
    }
}

/// Resolve projectiles whose life span ran out.
pub fn run_expired(ctx: &mut ResolveContext, expired: &mut Vec<Entity>) {
    for entity in expired.drain(..) {
        resolve(ctx, entity, ResolveCause::Expired, None);
    }
}

/// Fire deferred callbacks due by `ctx.now`.
pub fn run_deferred(ctx: &mut ResolveContext) {
    while let Some(action) = ctx.scheduler.pop_due(ctx.now) {
        match action {
            Deferred::ResolveProjectile {
                entity,
                cycle,
                cause,
            } => {
                let current = ctx
                    .world
                    .get::<&Lifecycle>(entity)
                    .map(|life| life.cycle == cycle && !life.released)
                    .unwrap_or(false);
                if current {
                    resolve(ctx, entity, cause, None);
                } else {
                    trace!(?entity, cycle, "stale deferred resolution dropped");
                }
            }
        }
    }
}

/// Start the kill-zone grace period for a projectile, once per cycle.
fn schedule_kill(ctx: &mut ResolveContext, entity: Entity) {
    let cycle = {
        let Ok(mut life) = ctx.world.get::<&mut Lifecycle>(entity) else {
            return;
        };
        if life.released || life.phase != ProjectilePhase::Flying || life.doomed {
            return;
        }
        life.doomed = true;
        life.cycle
    };
    ctx.scheduler.schedule(
        ctx.now,
        KILL_ZONE_GRACE_SECS,
        Deferred::ResolveProjectile {
            entity,
            cycle,
            cause: ResolveCause::KillZone,
        },
    );
}

/// Resolve a projectile or sub-projectile. Returns false, doing nothing, if
/// it is not currently flying (already released, pooled, or gone).
pub fn resolve(
    ctx: &mut ResolveContext,
    entity: Entity,
    cause: ResolveCause,
    struck: Option<Entity>,
) -> bool {
    {
        let Ok(mut life) = ctx.world.get::<&mut Lifecycle>(entity) else {
            return false;
        };
        if life.released || life.phase != ProjectilePhase::Flying {
            return false;
        }
        life.phase = ProjectilePhase::Resolving;
    }

    let position = ctx
        .world
        .get::<&Position>(entity)
        .map(|p| p.0)
        .unwrap_or_default();

    let projectile = ctx.world.get::<&Projectile>(entity).map(|p| (*p).clone());
    if let Ok(projectile) = projectile {
        resolve_projectile(ctx, entity, &projectile, position, cause, struck);
    } else {
        let mini = ctx.world.get::<&MiniGuided>(entity).map(|m| (*m).clone());
        if let Ok(mini) = mini {
            resolve_mini(ctx, entity, &mini, position, cause, struck);
        }
    }

    trace!(?entity, ?cause, "resolved");
    ctx.events.push(SimEvent::ProjectileResolved {
        projectile: entity_id(entity),
        cause,
        position,
    });
    true
}

fn resolve_projectile(
    ctx: &mut ResolveContext,
    entity: Entity,
    projectile: &Projectile,
    position: DVec2,
    cause: ResolveCause,
    struck: Option<Entity>,
) {
    apply_effects(
        ctx,
        position,
        projectile.strength,
        projectile.effect_radius,
        cause,
        struck,
    );

    if let Some(burst) = projectile.burst {
        spawn_burst(ctx, entity, projectile, position, &burst);
    }

    if projectile.pooled && ctx.pool.release(ctx.world, entity) {
        return;
    }
    // Not pooled, or its pool was cleared: destroy outright.
    destroy(ctx, entity);
}

fn resolve_mini(
    ctx: &mut ResolveContext,
    entity: Entity,
    mini: &MiniGuided,
    position: DVec2,
    cause: ResolveCause,
    struck: Option<Entity>,
) {
    apply_effects(ctx, position, mini.strength, mini.effect_radius, cause, struck);

    let parent_alive = ctx
        .world
        .get::<&SubPoolMember>(entity)
        .map(|m| m.parent)
        .is_ok_and(|parent| ctx.world.contains(parent));
    if parent_alive {
        deactivate(ctx.world, entity);
    } else {
        destroy(ctx, entity);
    }
}

/// Damage and feedback at the resolution point. A direct hit damages the
/// struck target; area projectiles also damage every other enemy in their
/// effect radius.
fn apply_effects(
    ctx: &mut ResolveContext,
    position: DVec2,
    strength: f64,
    effect_radius: f64,
    cause: ResolveCause,
    struck: Option<Entity>,
) {
    let direct = match (cause, struck) {
        (ResolveCause::Hit, Some(target)) => Some(target),
        _ => None,
    };
    if let Some(target) = direct {
        apply_damage(ctx, target, strength);
    }

    let (effect, sound) = if effect_radius > 0.0 {
        area_damage(ctx, position, effect_radius, strength, direct);
        (EffectKind::Explosion, Some(SOUND_EXPLODE))
    } else if direct.is_some() {
        (EffectKind::Impact, Some(SOUND_HIT))
    } else {
        (EffectKind::Fizzle, None)
    };

    ctx.events.push(SimEvent::SpawnEffect { effect, position });
    if let Some(name) = sound {
        ctx.events.push(SimEvent::PlaySound {
            name: name.into(),
            position,
        });
    }
}

/// Damage enemies within `radius` of `center`, skipping `exclude`.
fn area_damage(
    ctx: &mut ResolveContext,
    center: DVec2,
    radius: f64,
    amount: f64,
    exclude: Option<Entity>,
) {
    let struck: Vec<Entity> = {
        let mut query = ctx.world.query::<(&Position, &Target)>();
        query
            .iter()
            .filter(|(entity, (pos, target))| {
                Some(*entity) != exclude
                    && target.category == TargetCategory::Enemy
                    && target.health > 0.0
                    && pos.distance_sq_to(center) <= radius * radius
            })
            .map(|(entity, _)| entity)
            .collect()
    };
    for target in struck {
        apply_damage(ctx, target, amount);
    }
}

fn apply_damage(ctx: &mut ResolveContext, entity: Entity, amount: f64) {
    let remaining = {
        let Ok(mut target) = ctx.world.get::<&mut Target>(entity) else {
            return;
        };
        if target.category != TargetCategory::Enemy || target.health <= 0.0 {
            return;
        }
        target.health -= amount;
        target.health
    };

    let id = entity_id(entity);
    ctx.events.push(SimEvent::Damage {
        target: id,
        amount,
        remaining: remaining.max(0.0),
    });
    if remaining <= 0.0 {
        ctx.events.push(SimEvent::TargetDestroyed { target: id });
        ctx.despawn_buffer.push(entity);
    }
}

/// Release `burst.count` sub-projectiles at random offsets around `origin`.
/// Pooled parents recycle them through their own sub-pool.
fn spawn_burst(
    ctx: &mut ResolveContext,
    parent: Entity,
    projectile: &Projectile,
    origin: DVec2,
    burst: &MiniBurst,
) {
    let has_sub_pool = ctx.world.get::<&SubPool>(parent).is_ok();

    for _ in 0..burst.count {
        let offset = DVec2::new(
            ctx.rng.gen_range(-MINI_SPAWN_OFFSET..=MINI_SPAWN_OFFSET),
            ctx.rng.gen_range(-MINI_SPAWN_OFFSET..=MINI_SPAWN_OFFSET),
        );
        let direction = DVec2::from_angle(ctx.rng.gen_range(0.0..std::f64::consts::TAU));
        let life_secs = ctx.rng.gen_range(
            burst.life_secs * MINI_LIFE_MIN_FACTOR..=burst.life_secs * MINI_LIFE_MAX_FACTOR,
        );
        let mini = MiniGuided {
            strength: burst.strength,
            speed: burst.speed,
            life_secs,
            effect_radius: burst.effect_radius,
            target: None,
            found_target: false,
            direction,
        };
        let position = origin + offset;

        if has_sub_pool {
            acquire_mini(ctx.world, parent, mini, position, projectile.trail);
        } else {
            spawn_mini(ctx.world, mini, position, projectile.trail);
        }
    }

    ctx.events.push(SimEvent::SubProjectilesSpawned {
        parent: entity_id(parent),
        count: burst.count,
    });
}

fn spawn_mini(world: &mut World, mini: MiniGuided, position: DVec2, trail: TrailKind) -> Entity {
    let velocity = mini.direction * mini.speed;
    world.spawn((
        Position(position),
        Velocity(velocity),
        mini,
        Lifecycle {
            phase: ProjectilePhase::Flying,
            released: false,
            cycle: 0,
            doomed: false,
        },
        TrailState {
            kind: trail,
            on: false,
        },
    ))
}

/// Reuse an inactive member of `parent`'s sub-pool, or grow it.
fn acquire_mini(
    world: &mut World,
    parent: Entity,
    mini: MiniGuided,
    position: DVec2,
    trail: TrailKind,
) -> Entity {
    let members = world
        .get::<&SubPool>(parent)
        .map(|sub| sub.members.clone())
        .unwrap_or_default();

    for member in members {
        let Ok((pos, vel, slot, life, trail_state)) = world.query_one_mut::<(
            &mut Position,
            &mut Velocity,
            &mut MiniGuided,
            &mut Lifecycle,
            &mut TrailState,
        )>(member) else {
            continue;
        };
        if !life.released || life.phase != ProjectilePhase::Idle {
            continue;
        }
        pos.0 = position;
        vel.0 = mini.direction * mini.speed;
        *slot = mini;
        *trail_state = TrailState {
            kind: trail,
            on: false,
        };
        life.phase = ProjectilePhase::Flying;
        life.released = false;
        life.doomed = false;
        life.cycle = life.cycle.wrapping_add(1);
        return member;
    }

    let entity = spawn_mini(world, mini, position, trail);
    let _ = world.insert_one(entity, SubPoolMember { parent });
    if let Ok(mut sub) = world.get::<&mut SubPool>(parent) {
        sub.members.push(entity);
    }
    entity
}

/// Return a sub-projectile to its parent's sub-pool.
fn deactivate(world: &mut World, entity: Entity) {
    if let Ok((life, vel, trail)) =
        world.query_one_mut::<(&mut Lifecycle, &mut Velocity, &mut TrailState)>(entity)
    {
        life.released = true;
        life.phase = ProjectilePhase::Idle;
        life.doomed = false;
        vel.0 = DVec2::ZERO;
        trail.on = false;
    }
}

/// Mark released and queue for despawn at the end of the tick.
fn destroy(ctx: &mut ResolveContext, entity: Entity) {
    if let Ok(mut life) = ctx.world.get::<&mut Lifecycle>(entity) {
        life.released = true;
    }
    ctx.despawn_buffer.push(entity);
}
