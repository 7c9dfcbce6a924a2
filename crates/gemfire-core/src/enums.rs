//! Enumeration types used throughout the simulation.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Flight pattern of a bullet type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShootPattern {
    /// Straight line toward the aim point.
    #[default]
    Direct,
    /// Straight line toward a randomly perturbed aim point.
    Spread,
    /// Straight flight, then homing onto the nearest radar contact.
    Guided,
}

/// Trail effect attached to a projectile sprite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailKind {
    #[default]
    None,
    Trail,
    Echo,
}

/// Collision category of a world entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetCategory {
    /// Damageable enemy.
    Enemy,
    /// Maximum range boundary around the caster.
    RangeLimit,
    /// Region that destroys projectiles after a short grace period.
    DestroyZone,
}

/// Projectile lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectilePhase {
    /// Pooled and inactive: not simulated, not visible.
    #[default]
    Idle,
    /// Active and simulating its flight pattern.
    Flying,
    /// Collision or expiry detected; effects being applied.
    Resolving,
}

/// Trigger callback flavour reported by the physics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    Enter,
    Exit,
}

/// Why a projectile left the `Flying` phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveCause {
    /// Struck a valid target.
    Hit,
    /// Left the maximum range boundary.
    OutOfRange,
    /// Grace period after entering a kill zone elapsed.
    KillZone,
    /// Life span ran out (guided projectiles and sub-projectiles).
    Expired,
}

/// One-shot visual effect requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Direct hit spark.
    Impact,
    /// Area-of-effect blast.
    Explosion,
    /// Projectile dissipated without hitting anything.
    Fizzle,
}

/// Top-level session state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Setup,
    Active,
    Paused,
}

/// Set of `TargetCategory` values used to filter queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryMask(u8);

impl CategoryMask {
    pub const NONE: Self = Self(0);
    pub const ENEMY: Self = Self(1 << 0);
    pub const RANGE_LIMIT: Self = Self(1 << 1);
    pub const DESTROY_ZONE: Self = Self(1 << 2);
    pub const ALL: Self = Self(0b111);

    pub fn of(category: TargetCategory) -> Self {
        match category {
            TargetCategory::Enemy => Self::ENEMY,
            TargetCategory::RangeLimit => Self::RANGE_LIMIT,
            TargetCategory::DestroyZone => Self::DESTROY_ZONE,
        }
    }

    pub fn contains(self, category: TargetCategory) -> bool {
        self.0 & Self::of(category).0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for CategoryMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<TargetCategory> for CategoryMask {
    fn from(category: TargetCategory) -> Self {
        Self::of(category)
    }
}
