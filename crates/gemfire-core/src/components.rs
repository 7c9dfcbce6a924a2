//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::MiniBurst;
use crate::enums::*;
use crate::types::Rect;

/// Shot parameters stamped onto a projectile when it is armed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Index into the bullet-type catalogue.
    pub bullet_type: usize,
    pub pattern: ShootPattern,
    /// Damage dealt on hit (or per target for area damage).
    pub strength: f64,
    /// Nominal travel speed including the caster bonus.
    pub speed: f64,
    pub trail: TrailKind,
    /// Fired in alternate mode.
    pub alt: bool,
    /// Returned to a pool on resolution instead of being destroyed.
    /// Fixed at construction.
    pub pooled: bool,
    /// Area damage radius (0 = direct damage only).
    pub effect_radius: f64,
    /// Sub-projectiles released on resolution (guided alternate shots).
    pub burst: Option<MiniBurst>,
}

/// Activation state shared by projectiles and sub-projectiles.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Lifecycle {
    pub phase: ProjectilePhase,
    /// Set once per activation cycle when the entity is released or destroyed.
    pub released: bool,
    /// Activation generation. Incremented on every acquire so deferred
    /// callbacks scheduled in an earlier cycle can be recognised as stale.
    pub cycle: u32,
    /// A kill-zone resolution is already scheduled for this cycle.
    pub doomed: bool,
}

/// Homing state of a guided projectile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Guidance {
    /// Straight-flight time remaining before radar homing starts.
    pub tracking_secs: f64,
    /// Life span remaining; the projectile resolves when it reaches zero.
    pub life_secs: f64,
    /// Last known direction of travel (unit vector).
    pub direction: DVec2,
    /// Currently locked onto a radar contact.
    pub locked: bool,
}

/// Sub-projectile released by a guided alternate shot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiniGuided {
    pub strength: f64,
    pub speed: f64,
    /// Life span remaining.
    pub life_secs: f64,
    pub effect_radius: f64,
    /// Position of the contact currently homed on.
    pub target: Option<DVec2>,
    pub found_target: bool,
    /// Direction of straight flight when no contact is found.
    pub direction: DVec2,
}

/// Render-side trail state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TrailState {
    pub kind: TrailKind,
    pub on: bool,
}

/// Something a projectile can collide with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Target {
    pub category: TargetCategory,
    pub health: f64,
    /// Collision radius.
    pub radius: f64,
}

/// Rectangular kill zone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KillZone {
    pub area: Rect,
}

