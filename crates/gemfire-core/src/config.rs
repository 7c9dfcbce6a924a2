//! Tuning data: emitter parameters and the bullet-type catalogue.
//!
//! Everything here deserializes from JSON with per-field defaults, so a
//! tuning file only needs to mention the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{ShootPattern, TrailKind};
use crate::error::ConfigError;

/// Complete tuning for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub max_energy: f64,
    pub starting_energy: f64,
    /// Energy regained per second while the selected type has an alternate fire.
    pub energy_regen_rate: f64,
    pub caster: CasterTuning,
    /// Initial capacity reserved by the projectile pool.
    pub pool_allocation_hint: usize,
    pub bullet_types: Vec<BulletType>,
}

/// Bonuses the caster applies on top of every bullet type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasterTuning {
    /// Added to every projectile's travel speed.
    pub speed_bonus: f64,
    /// Subtracted from every cooldown.
    pub rate_of_fire_bonus: f64,
    /// Base detection range, extended by the bullet type's range.
    pub range: f64,
}

/// One selectable bullet type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletType {
    pub name: String,
    pub pattern: ShootPattern,
    pub strength: f64,
    pub speed: f64,
    /// Extra detection range granted while this type is selected.
    pub range: f64,
    /// Cooldown between shots (seconds).
    pub rate_of_fire: f64,
    /// Half-width of the aim perturbation on each axis (spread pattern).
    pub spread: f64,
    pub trail: TrailKind,
    /// Recycle projectiles through the pool instead of destroying them.
    pub pooled: bool,
    /// Area damage radius on resolution (0 = direct damage only).
    pub effect_radius: f64,
    /// Required for the guided pattern.
    pub guided: Option<GuidedParams>,
    /// Alternate fire; `None` disables alternate fire and energy regen.
    pub alt: Option<AltFire>,
}

/// Timers of a guided projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuidedParams {
    /// Straight flight before radar homing starts (seconds).
    pub tracking_secs: f64,
    /// Life span (seconds).
    pub life_secs: f64,
}

/// Alternate fire parameters, substituted for the primary ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AltFire {
    pub cost: f64,
    pub strength: f64,
    pub speed: f64,
    pub spread: f64,
    pub rate_of_fire: f64,
    /// Sub-projectiles released when the shot resolves.
    pub burst: Option<MiniBurst>,
}

/// Sub-projectile burst released by a guided alternate shot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MiniBurst {
    pub count: u32,
    pub strength: f64,
    pub speed: f64,
    /// Nominal life span; each instance is randomized around it.
    pub life_secs: f64,
    pub effect_radius: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_energy: DEFAULT_MAX_ENERGY,
            starting_energy: DEFAULT_MAX_ENERGY,
            energy_regen_rate: DEFAULT_ENERGY_REGEN,
            caster: CasterTuning::default(),
            pool_allocation_hint: POOL_ALLOCATION_HINT,
            bullet_types: default_catalogue(),
        }
    }
}

impl Default for CasterTuning {
    fn default() -> Self {
        Self {
            speed_bonus: 0.0,
            rate_of_fire_bonus: 0.0,
            range: DEFAULT_CASTER_RANGE,
        }
    }
}

impl Default for BulletType {
    fn default() -> Self {
        Self {
            name: "Default".into(),
            pattern: ShootPattern::Direct,
            strength: 1.0,
            speed: 12.0,
            range: 8.0,
            rate_of_fire: 0.25,
            spread: 0.0,
            trail: TrailKind::None,
            pooled: true,
            effect_radius: 0.0,
            guided: None,
            alt: None,
        }
    }
}

impl Default for AltFire {
    fn default() -> Self {
        Self {
            cost: 2.0,
            strength: 1.0,
            speed: 12.0,
            spread: 0.0,
            rate_of_fire: 0.25,
            burst: None,
        }
    }
}

/// The three gems available out of the box: a straight shot, a scatter
/// shot with a chained alternate, and a seeker whose alternate bursts into
/// guided sub-projectiles.
pub fn default_catalogue() -> Vec<BulletType> {
    vec![
        BulletType::default(),
        BulletType {
            name: "Scatter".into(),
            pattern: ShootPattern::Spread,
            strength: 0.6,
            speed: 10.0,
            range: 6.0,
            rate_of_fire: 0.35,
            spread: 1.5,
            trail: TrailKind::Echo,
            alt: Some(AltFire {
                cost: 2.0,
                strength: 0.6,
                speed: 16.0,
                spread: 0.4,
                rate_of_fire: 0.1,
                burst: None,
            }),
            ..BulletType::default()
        },
        BulletType {
            name: "Seeker".into(),
            pattern: ShootPattern::Guided,
            strength: 1.5,
            speed: 6.0,
            range: 10.0,
            rate_of_fire: 0.6,
            trail: TrailKind::Trail,
            effect_radius: 1.5,
            guided: Some(GuidedParams {
                tracking_secs: 0.3,
                life_secs: 2.5,
            }),
            alt: Some(AltFire {
                cost: 4.0,
                strength: 2.0,
                speed: 6.0,
                spread: 0.0,
                rate_of_fire: 0.8,
                burst: Some(MiniBurst {
                    count: 5,
                    strength: 0.5,
                    speed: 5.0,
                    life_secs: 1.0,
                    effect_radius: 1.0,
                }),
            }),
            ..BulletType::default()
        },
    ]
}

impl Tuning {
    /// Parse and validate tuning from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse, and validate tuning from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check every value the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bullet_types.is_empty() {
            return Err(invalid("bullet type catalogue is empty"));
        }
        non_negative("max_energy", self.max_energy)?;
        non_negative("energy_regen_rate", self.energy_regen_rate)?;
        if !(0.0..=self.max_energy).contains(&self.starting_energy) {
            return Err(invalid(format!(
                "starting_energy {} outside [0, {}]",
                self.starting_energy, self.max_energy
            )));
        }
        non_negative("caster.range", self.caster.range)?;
        non_negative("caster.rate_of_fire_bonus", self.caster.rate_of_fire_bonus)?;

        for bullet in &self.bullet_types {
            bullet.validate()?;
        }
        Ok(())
    }
}

impl BulletType {
    fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.name;
        for (field, value) in [
            ("strength", self.strength),
            ("speed", self.speed),
            ("range", self.range),
            ("rate_of_fire", self.rate_of_fire),
            ("spread", self.spread),
            ("effect_radius", self.effect_radius),
        ] {
            non_negative(&format!("{name}.{field}"), value)?;
        }

        match (self.pattern, self.guided) {
            (ShootPattern::Guided, None) => {
                return Err(invalid(format!("{name}: guided pattern needs guided timers")));
            }
            (_, Some(g)) => {
                non_negative(&format!("{name}.guided.tracking_secs"), g.tracking_secs)?;
                non_negative(&format!("{name}.guided.life_secs"), g.life_secs)?;
            }
            _ => {}
        }

        if let Some(alt) = &self.alt {
            for (field, value) in [
                ("cost", alt.cost),
                ("strength", alt.strength),
                ("speed", alt.speed),
                ("spread", alt.spread),
                ("rate_of_fire", alt.rate_of_fire),
            ] {
                non_negative(&format!("{name}.alt.{field}"), value)?;
            }
            if let Some(burst) = &alt.burst {
                if self.pattern != ShootPattern::Guided {
                    return Err(invalid(format!(
                        "{name}: sub-projectile bursts need the guided pattern"
                    )));
                }
                non_negative(&format!("{name}.alt.burst.speed"), burst.speed)?;
                non_negative(&format!("{name}.alt.burst.life_secs"), burst.life_secs)?;
                non_negative(&format!("{name}.alt.burst.strength"), burst.strength)?;
                non_negative(
                    &format!("{name}.alt.burst.effect_radius"),
                    burst.effect_radius,
                )?;
            }
        }
        Ok(())
    }

    /// Whether this type can fire in alternate mode (and regenerates energy).
    pub fn supports_alt(&self) -> bool {
        self.alt.is_some()
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be a finite non-negative number, got {value}")))
    }
}
