//! Events emitted by the simulation for the renderer, audio, and UI.
//!
//! Collaborator requests are fire-and-forget: the simulation never waits
//! for an acknowledgment.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// Play a named sound at a world position.
    PlaySound { name: String, position: DVec2 },
    /// Instantiate a one-shot visual effect.
    SpawnEffect { effect: EffectKind, position: DVec2 },
    /// Turn a projectile's trail on or off.
    TrailChanged { projectile: EntityId, on: bool },
    /// Swap the caster's gem sprite.
    SpriteSwap { bullet_type: usize, name: String },
    /// The active bullet type changed.
    BulletTypeChanged { index: usize, detection_radius: f64 },
    /// A projectile was launched.
    ShotFired {
        projectile: EntityId,
        bullet_type: usize,
        alt: bool,
    },
    /// Alternate fire refused for lack of energy.
    AltFireRejected { energy: f64, cost: f64 },
    /// Energy gauge blink during the rejection feedback.
    EnergyGaugeFlash { visible: bool },
    /// Damage applied to a target.
    Damage {
        target: EntityId,
        amount: f64,
        remaining: f64,
    },
    /// A target's health reached zero.
    TargetDestroyed { target: EntityId },
    /// A projectile or sub-projectile left the `Flying` phase.
    ProjectileResolved {
        projectile: EntityId,
        cause: ResolveCause,
        position: DVec2,
    },
    /// A guided alternate shot released its sub-projectiles.
    SubProjectilesSpawned { parent: EntityId, count: u32 },
    /// The pool was cleared.
    PoolCleared { destroyed: usize },
}
