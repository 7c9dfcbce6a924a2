//! Projectile pool: recycles projectile entities of the selected bullet type.
//!
//! The pool holds one bullet type at a time. Selecting another type clears
//! it, destroying every instance it owns (in-flight ones included) together
//! with their sub-projectile pools.

use hecs::{Entity, World};
use tracing::{debug, trace};

use gemfire_core::components::{Lifecycle, TrailState};
use gemfire_core::enums::ProjectilePhase;
use gemfire_core::types::Velocity;

use crate::projectile::{self, Shot, SubPool};

#[derive(Debug)]
pub struct ProjectilePool {
    /// Bullet type the pool currently serves.
    bullet_type: Option<usize>,
    /// Every instance owned by the pool, active or not.
    members: Vec<Entity>,
    /// Inactive instances ready for reuse.
    free: Vec<Entity>,
    /// Capacity reserved up front. Not a cap: the pool grows past it on demand.
    allocation_hint: usize,
}

impl ProjectilePool {
    pub fn new(allocation_hint: usize) -> Self {
        Self {
            bullet_type: None,
            members: Vec::with_capacity(allocation_hint),
            free: Vec::with_capacity(allocation_hint),
            allocation_hint,
        }
    }

    /// Bullet type the pool currently serves.
    pub fn bullet_type(&self) -> Option<usize> {
        self.bullet_type
    }

    /// Total instances owned.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Instances currently inactive.
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }

    /// Clear the pool and start serving `bullet_type`. Returns the number of
    /// instances destroyed.
    pub fn reset(&mut self, world: &mut World, bullet_type: usize) -> usize {
        let destroyed = self.clear(world);
        self.bullet_type = Some(bullet_type);
        self.members.reserve(self.allocation_hint);
        destroyed
    }

    /// Hand out an inactive instance re-armed with `shot`, or construct a new
    /// one when none is free. Never fails.
    pub fn acquire(&mut self, world: &mut World, shot: &Shot) -> Entity {
        while let Some(entity) = self.free.pop() {
            if projectile::rearm(world, entity, shot) {
                trace!(?entity, "reused pooled projectile");
                return entity;
            }
            // Despawned behind the pool's back; forget it.
            self.members.retain(|&e| e != entity);
        }

        let entity = projectile::spawn(world, shot);
        self.members.push(entity);
        if self.members.len() > self.allocation_hint {
            debug!(
                size = self.members.len(),
                hint = self.allocation_hint,
                "projectile pool grew past its allocation hint"
            );
        }
        entity
    }

    /// Deactivate an instance and return it to the free list.
    ///
    /// Returns false without touching anything if the entity is not a member
    /// or was already released, so a second release is a no-op.
    pub fn release(&mut self, world: &mut World, entity: Entity) -> bool {
        if !self.contains(entity) {
            return false;
        }
        let Ok((life, vel, trail)) =
            world.query_one_mut::<(&mut Lifecycle, &mut Velocity, &mut TrailState)>(entity)
        else {
            return false;
        };
        if life.released {
            return false;
        }

        life.released = true;
        life.phase = ProjectilePhase::Idle;
        life.doomed = false;
        vel.0 = glam::DVec2::ZERO;
        trail.on = false;
        self.free.push(entity);
        true
    }

    /// Deactivate and destroy every instance, including the sub-projectiles
    /// in their sub-pools. Returns the number of instances destroyed.
    pub fn clear(&mut self, world: &mut World) -> usize {
        let destroyed = self.members.len();
        for entity in self.members.drain(..) {
            let minis = world
                .get::<&SubPool>(entity)
                .map(|sub| sub.members.clone())
                .unwrap_or_default();
            for mini in minis {
                let _ = world.despawn(mini);
            }
            if let Ok(mut life) = world.get::<&mut Lifecycle>(entity) {
                life.released = true;
                life.phase = ProjectilePhase::Idle;
            }
            let _ = world.despawn(entity);
        }
        self.free.clear();

        if destroyed > 0 {
            debug!(destroyed, bullet_type = ?self.bullet_type, "projectile pool cleared");
        }
        destroyed
    }
}
