//! Simulation constants and tuning defaults.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Tolerance for countdown timers reaching zero.
/// A timer of exactly N * DT expires on tick N despite float accumulation.
pub const TIMER_EPSILON: f64 = 1e-9;

// --- Emitter defaults ---

/// Maximum energy for alternate fire.
pub const DEFAULT_MAX_ENERGY: f64 = 10.0;

/// Energy regenerated per second while the selected type supports alternate fire.
pub const DEFAULT_ENERGY_REGEN: f64 = 1.0;

/// Base detection range of the caster (added to the bullet type's range).
pub const DEFAULT_CASTER_RANGE: f64 = 4.0;

/// Initial pool capacity reserved when a bullet type is selected.
pub const POOL_ALLOCATION_HINT: usize = 20;

// --- Projectile ---

/// Collision radius of a projectile (world units).
pub const PROJECTILE_RADIUS: f64 = 0.25;

/// Speed multiplier applied while a guided projectile is locked on.
pub const LOCK_ON_SPEED_FACTOR: f64 = 2.0;

/// Delay between entering a kill zone and being destroyed (seconds).
pub const KILL_ZONE_GRACE_SECS: f64 = 0.1;

// --- Guided sub-projectiles ---

/// Lower bound of the randomized life span, as a factor of the nominal value.
pub const MINI_LIFE_MIN_FACTOR: f64 = 0.5;

/// Upper bound of the randomized life span, as a factor of the nominal value.
pub const MINI_LIFE_MAX_FACTOR: f64 = 2.0;

/// Maximum offset on each axis between the burst point and a spawned sub-projectile.
pub const MINI_SPAWN_OFFSET: f64 = 0.5;

// --- Rejection feedback ---

/// Number of gauge blinks played when alternate fire is rejected.
pub const FEEDBACK_BLINKS: u32 = 3;

/// Duration of one blink half-cycle (seconds).
pub const FEEDBACK_BLINK_SECS: f64 = 0.1;

// --- Audio cue names ---

pub const SOUND_SHOOT: &str = "shoot";
pub const SOUND_ALT_SHOOT: &str = "alt_shoot";
pub const SOUND_NO_ENERGY: &str = "no_energy";
pub const SOUND_HIT: &str = "hit";
pub const SOUND_EXPLODE: &str = "explode";
pub const SOUND_SWITCH: &str = "switch_gem";
