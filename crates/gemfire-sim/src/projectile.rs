//! Projectile construction: shot parameters, launch velocity, spawn and re-arm.
//!
//! Used by the emitter (non-pooled shots) and the pool (pooled shots), so a
//! fresh instance and a recycled one leave the factory in the same state.

use glam::DVec2;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use gemfire_core::components::{Guidance, Lifecycle, Projectile, TrailState};
use gemfire_core::config::BulletType;
use gemfire_core::enums::{ProjectilePhase, ShootPattern, TrailKind};
use gemfire_core::types::{Position, Velocity};

/// Sub-projectile pool owned by a pooled guided projectile.
#[derive(Debug, Clone, Default)]
pub struct SubPool {
    pub members: Vec<Entity>,
}

/// Marks a sub-projectile as belonging to a parent's `SubPool`.
#[derive(Debug, Clone, Copy)]
pub struct SubPoolMember {
    pub parent: Entity,
}

/// Everything needed to arm one projectile.
#[derive(Debug, Clone)]
pub struct Shot {
    pub projectile: Projectile,
    pub origin: DVec2,
    pub velocity: DVec2,
    pub guidance: Option<Guidance>,
}

impl Shot {
    /// Build a shot of `bullet` from `origin` toward `aim`, in primary or
    /// alternate mode. Alternate parameters replace the primary ones.
    pub fn aimed(
        bullet_index: usize,
        bullet: &BulletType,
        alt: bool,
        speed_bonus: f64,
        origin: DVec2,
        aim: DVec2,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let alt_fire = if alt { bullet.alt.as_ref() } else { None };
        let (strength, base_speed, spread, burst) = match alt_fire {
            Some(a) => (a.strength, a.speed, a.spread, a.burst),
            None => (bullet.strength, bullet.speed, bullet.spread, None),
        };
        let speed = base_speed + speed_bonus;

        let velocity = launch_velocity(bullet.pattern, origin, aim, speed, spread, rng);
        let guidance = match (bullet.pattern, bullet.guided) {
            (ShootPattern::Guided, Some(g)) => Some(Guidance {
                tracking_secs: g.tracking_secs,
                life_secs: g.life_secs,
                direction: aim_direction(origin, aim),
                locked: false,
            }),
            _ => None,
        };

        Self {
            projectile: Projectile {
                bullet_type: bullet_index,
                pattern: bullet.pattern,
                strength,
                speed,
                trail: bullet.trail,
                alt: alt_fire.is_some(),
                pooled: bullet.pooled,
                effect_radius: bullet.effect_radius,
                burst,
            },
            origin,
            velocity,
            guidance,
        }
    }

    /// Trail state at launch: guided shots light their trail only on lock-on.
    fn trail(&self) -> TrailState {
        let kind = self.projectile.trail;
        TrailState {
            kind,
            on: kind != TrailKind::None && self.projectile.pattern != ShootPattern::Guided,
        }
    }
}

/// Unit direction from `origin` to `aim`; facing +x when they coincide.
pub fn aim_direction(origin: DVec2, aim: DVec2) -> DVec2 {
    (aim - origin).try_normalize().unwrap_or(DVec2::X)
}

/// Initial velocity for a pattern.
///
/// Spread shots perturb the aim point uniformly within `[-spread, spread]`
/// on both axes before the direction is taken.
pub fn launch_velocity(
    pattern: ShootPattern,
    origin: DVec2,
    aim: DVec2,
    speed: f64,
    spread: f64,
    rng: &mut ChaCha8Rng,
) -> DVec2 {
    let aim = match pattern {
        ShootPattern::Spread if spread > 0.0 => {
            aim + DVec2::new(
                rng.gen_range(-spread..=spread),
                rng.gen_range(-spread..=spread),
            )
        }
        _ => aim,
    };
    aim_direction(origin, aim) * speed
}

/// Spawn a new projectile already in the `Flying` phase.
pub fn spawn(world: &mut World, shot: &Shot) -> Entity {
    let entity = world.spawn((
        Position(shot.origin),
        Velocity(shot.velocity),
        shot.projectile.clone(),
        Lifecycle {
            phase: ProjectilePhase::Flying,
            released: false,
            cycle: 0,
            doomed: false,
        },
        shot.trail(),
    ));

    if let Some(guidance) = shot.guidance {
        let _ = world.insert_one(entity, guidance);
        if shot.projectile.pooled {
            let _ = world.insert_one(entity, SubPool::default());
        }
    }
    entity
}

/// Re-arm an inactive pooled projectile with a new shot.
///
/// Returns false (leaving the entity untouched) if the entity is gone or
/// still active. The `pooled` flag is fixed at construction and kept.
pub fn rearm(world: &mut World, entity: Entity, shot: &Shot) -> bool {
    {
        let Ok((pos, vel, projectile, life, trail)) = world.query_one_mut::<(
            &mut Position,
            &mut Velocity,
            &mut Projectile,
            &mut Lifecycle,
            &mut TrailState,
        )>(entity) else {
            return false;
        };

        if !life.released || life.phase != ProjectilePhase::Idle {
            return false;
        }

        let pooled = projectile.pooled;
        *projectile = shot.projectile.clone();
        projectile.pooled = pooled;

        pos.0 = shot.origin;
        vel.0 = shot.velocity;
        *trail = shot.trail();
        life.phase = ProjectilePhase::Flying;
        life.released = false;
        life.doomed = false;
        life.cycle = life.cycle.wrapping_add(1);
    }

    if let Some(guidance) = shot.guidance {
        let _ = world.insert_one(entity, guidance);
    }
    true
}
