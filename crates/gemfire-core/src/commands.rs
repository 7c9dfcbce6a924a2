//! Inputs sent from the host to the simulation.
//!
//! `InputFrame` is polled once per tick; `SimCommand`s are queued and
//! processed at the next tick boundary.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Discrete input signals sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    pub fire: bool,
    pub alt_fire: bool,
    /// World-space aim point.
    pub aim: DVec2,
}

/// All possible host actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    // --- Session control ---
    /// Start the session with the first bullet type selected.
    StartSession,
    Pause,
    Resume,

    // --- Emitter ---
    /// Select a bullet type by catalogue index.
    SelectBulletType { index: usize },
    /// Select the next bullet type, wrapping around.
    CycleBulletType,
    /// Move the caster (and its muzzle and detection region).
    MoveCaster { position: DVec2 },

    // --- World setup ---
    /// Spawn an enemy.
    SpawnTarget {
        position: DVec2,
        health: f64,
        radius: f64,
    },
    /// Spawn a rectangular kill zone.
    SpawnKillZone { min: DVec2, max: DVec2 },
}
