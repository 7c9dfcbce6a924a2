//! Emitter: the caster's gem. Fire cadence, energy, and bullet-type selection.
//!
//! Each tick the cooldown is decremented before any shot is resolved, so
//! the effective rate of fire matches the configured cooldown exactly.

use glam::DVec2;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use gemfire_core::commands::InputFrame;
use gemfire_core::config::{BulletType, Tuning};
use gemfire_core::constants::{
    SOUND_ALT_SHOOT, SOUND_NO_ENERGY, SOUND_SHOOT, SOUND_SWITCH, TIMER_EPSILON,
};
use gemfire_core::events::SimEvent;
use gemfire_core::types::Circle;

use crate::entity_id;
use crate::feedback::RejectFeedback;
use crate::pool::ProjectilePool;
use crate::projectile::{self, Shot};

/// The character holding the gem.
#[derive(Debug, Clone, Copy)]
pub struct Caster {
    /// Muzzle position; also the center of the detection region.
    pub position: DVec2,
    pub speed_bonus: f64,
    pub rate_of_fire_bonus: f64,
    /// Base detection range.
    pub range: f64,
}

/// Services the emitter needs while firing.
pub struct FireContext<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut ChaCha8Rng,
    pub catalogue: &'a [BulletType],
    pub events: &'a mut Vec<SimEvent>,
}

#[derive(Debug)]
pub struct Emitter {
    caster: Caster,
    bullet_index: usize,
    /// Seconds until the next shot is allowed. Never negative.
    cooldown_secs: f64,
    /// Alternate fire resource, kept within [0, max_energy].
    energy: f64,
    max_energy: f64,
    regen_rate: f64,
    /// Caster range plus the selected type's range.
    detection_radius: f64,
    feedback: RejectFeedback,
    pool: ProjectilePool,
}

impl Emitter {
    pub fn new(tuning: &Tuning) -> Self {
        let caster = Caster {
            position: DVec2::ZERO,
            speed_bonus: tuning.caster.speed_bonus,
            rate_of_fire_bonus: tuning.caster.rate_of_fire_bonus,
            range: tuning.caster.range,
        };
        Self {
            caster,
            bullet_index: 0,
            cooldown_secs: 0.0,
            energy: tuning.starting_energy.clamp(0.0, tuning.max_energy),
            max_energy: tuning.max_energy,
            regen_rate: tuning.energy_regen_rate,
            detection_radius: caster.range,
            feedback: RejectFeedback::default(),
            pool: ProjectilePool::new(tuning.pool_allocation_hint),
        }
    }

    pub fn caster(&self) -> &Caster {
        &self.caster
    }

    pub fn set_caster_position(&mut self, position: DVec2) {
        self.caster.position = position;
    }

    pub fn bullet_index(&self) -> usize {
        self.bullet_index
    }

    pub fn cooldown_secs(&self) -> f64 {
        self.cooldown_secs
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn max_energy(&self) -> f64 {
        self.max_energy
    }

    pub fn detection_radius(&self) -> f64 {
        self.detection_radius
    }

    pub fn feedback(&self) -> &RejectFeedback {
        &self.feedback
    }

    pub fn pool(&self) -> &ProjectilePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut ProjectilePool {
        &mut self.pool
    }

    /// Detection region of the radar and range boundary of projectiles.
    pub fn radar_region(&self) -> Circle {
        Circle::new(self.caster.position, self.detection_radius)
    }

    /// Select bullet type `index`.
    ///
    /// Resets the cooldown to the type's rate of fire, resizes the detection
    /// region, and clears the pool (destroying in-flight pooled projectiles
    /// of the previous type). Returns false if `index` is out of range.
    pub fn select(
        &mut self,
        index: usize,
        catalogue: &[BulletType],
        world: &mut World,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        let Some(bullet) = catalogue.get(index) else {
            return false;
        };

        self.bullet_index = index;
        self.cooldown_secs = bullet.rate_of_fire.max(0.0);
        self.detection_radius = self.caster.range + bullet.range;
        let destroyed = self.pool.reset(world, index);

        debug!(
            index,
            name = %bullet.name,
            detection_radius = self.detection_radius,
            destroyed,
            "bullet type selected"
        );
        events.push(SimEvent::PoolCleared { destroyed });
        events.push(SimEvent::BulletTypeChanged {
            index,
            detection_radius: self.detection_radius,
        });
        events.push(SimEvent::SpriteSwap {
            bullet_type: index,
            name: bullet.name.clone(),
        });
        events.push(SimEvent::PlaySound {
            name: SOUND_SWITCH.into(),
            position: self.caster.position,
        });
        true
    }

    /// Advance one tick with the sampled input.
    pub fn tick(&mut self, dt: f64, input: &InputFrame, ctx: &mut FireContext) {
        let remaining = self.cooldown_secs - dt;
        self.cooldown_secs = if remaining <= TIMER_EPSILON { 0.0 } else { remaining };

        let catalogue = ctx.catalogue;
        let Some(bullet) = catalogue.get(self.bullet_index) else {
            return;
        };

        if bullet.supports_alt() {
            self.energy = (self.energy + self.regen_rate * dt).min(self.max_energy);
        }

        if let Some(visible) = self.feedback.advance(dt, input.alt_fire) {
            ctx.events.push(SimEvent::EnergyGaugeFlash { visible });
        }

        if input.alt_fire {
            if let Some(alt) = &bullet.alt {
                if self.energy < alt.cost {
                    if self.feedback.trigger() {
                        debug!(energy = self.energy, cost = alt.cost, "alternate fire rejected");
                        ctx.events.push(SimEvent::AltFireRejected {
                            energy: self.energy,
                            cost: alt.cost,
                        });
                        ctx.events.push(SimEvent::PlaySound {
                            name: SOUND_NO_ENERGY.into(),
                            position: self.caster.position,
                        });
                    }
                } else if self.cooldown_secs <= 0.0 {
                    self.energy = (self.energy - alt.cost).clamp(0.0, self.max_energy);
                    self.fire(bullet, true, input.aim, ctx);
                    return;
                }
            }
        }

        if input.fire && self.cooldown_secs <= 0.0 {
            self.fire(bullet, false, input.aim, ctx);
        }
    }

    fn fire(
        &mut self,
        bullet: &BulletType,
        alt: bool,
        aim: DVec2,
        ctx: &mut FireContext,
    ) -> Entity {
        let shot = Shot::aimed(
            self.bullet_index,
            bullet,
            alt,
            self.caster.speed_bonus,
            self.caster.position,
            aim,
            ctx.rng,
        );
        let entity = if bullet.pooled {
            self.pool.acquire(ctx.world, &shot)
        } else {
            projectile::spawn(ctx.world, &shot)
        };

        let rate = match (&bullet.alt, shot.projectile.alt) {
            (Some(a), true) => a.rate_of_fire,
            _ => bullet.rate_of_fire,
        };
        self.cooldown_secs = (rate - self.caster.rate_of_fire_bonus).max(0.0);

        trace!(?entity, alt = shot.projectile.alt, "shot fired");
        ctx.events.push(SimEvent::ShotFired {
            projectile: entity_id(entity),
            bullet_type: self.bullet_index,
            alt: shot.projectile.alt,
        });
        ctx.events.push(SimEvent::PlaySound {
            name: if shot.projectile.alt {
                SOUND_ALT_SHOOT
            } else {
                SOUND_SHOOT
            }
            .into(),
            position: self.caster.position,
        });
        entity
    }

    #[cfg(test)]
    pub(crate) fn set_energy(&mut self, energy: f64) {
        self.energy = energy;
    }

    #[cfg(test)]
    pub(crate) fn set_cooldown(&mut self, secs: f64) {
        self.cooldown_secs = secs;
    }
}
