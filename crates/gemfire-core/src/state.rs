//! Frame snapshot: the complete visible state handed to the host each tick.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{EntityId, SimTime};

/// Complete simulation state after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub emitter: EmitterView,
    pub projectiles: Vec<ProjectileView>,
    pub minis: Vec<MiniView>,
    pub targets: Vec<TargetView>,
    pub events: Vec<SimEvent>,
}

/// Emitter gauges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmitterView {
    pub bullet_type: usize,
    pub bullet_name: String,
    pub caster_position: DVec2,
    pub cooldown_secs: f64,
    pub energy: f64,
    pub max_energy: f64,
    pub detection_radius: f64,
    /// Pool instances currently inactive.
    pub pool_free: usize,
    /// Pool instances in total.
    pub pool_size: usize,
    /// Rejection feedback currently playing or latched.
    pub feedback_running: bool,
}

/// An active projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub bullet_type: usize,
    pub pattern: ShootPattern,
    pub position: DVec2,
    pub velocity: DVec2,
    pub alt: bool,
    pub trail_on: bool,
    pub locked: bool,
}

/// An active guided sub-projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiniView {
    pub id: EntityId,
    pub position: DVec2,
    pub found_target: bool,
    pub life_secs: f64,
}

/// A world target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    pub id: EntityId,
    pub category: TargetCategory,
    pub position: DVec2,
    pub health: f64,
}
