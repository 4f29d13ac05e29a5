//! Block Barrage - an auto-firing block shooter
//!
//! Core modules:
//! - `sim`: Simulation core (spawning, burst fire, collisions, progression)
//! - `tuning`: Data-driven game balance
//! - `error`: Errors raised at the simulation boundary
//!
//! Rendering, input devices and HUD live outside this crate. They drive a
//! [`sim::GameState`] through `step`, the player setters and the upgrade
//! selection API, and read everything else through the observers.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use sim::GameState;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Largest delta a single step will simulate (seconds)
    pub const MAX_STEP_DT: f32 = 0.033;

    /// Default playfield dimensions
    pub const DEFAULT_WIDTH: f32 = 480.0;
    pub const DEFAULT_HEIGHT: f32 = 720.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 16.0;
    /// Rest position sits this far above the bottom edge
    pub const PLAYER_REST_OFFSET: f32 = 64.0;
    pub const PLAYER_SPEED: f32 = 320.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    pub const PROJECTILE_DAMAGE: u32 = 1;
    pub const PROJECTILE_SPEED: f32 = 360.0;
    pub const VOLLEY_SIZE: u32 = 1;
    pub const PIERCE: i32 = 0;
    /// Random spread applied to each shot (± radians)
    pub const AIM_SPREAD: f32 = 0.075;
    /// Projectiles are culled this far outside the playfield
    pub const CULL_MARGIN_X: f32 = 20.0;
    pub const CULL_MARGIN_Y: f32 = 40.0;

    /// Burst fire defaults (seconds)
    pub const BURST_INTERVAL: f32 = 0.12;
    pub const BURST_DURATION: f32 = 1.0;
    /// Rest between volleys. Upgrades never touch this.
    pub const VOLLEY_REST: f32 = 1.0;
    pub const MIN_BURST_INTERVAL: f32 = 0.05;

    /// Enemy descent (pixels/s)
    pub const DESCENT_SPEED: f32 = 24.0;
    pub const MIN_DESCENT_SPEED: f32 = 12.0;
    /// Run ends when a block's bottom edge reaches this far above the floor
    pub const LOSS_MARGIN: f32 = 30.0;

    /// Wave layout
    pub const WAVE_COLUMNS: u32 = 6;
    pub const WAVE_PADDING: f32 = 8.0;
    pub const BLOCK_GUTTER: f32 = 6.0;
    pub const COLUMN_SPAWN_CHANCE: f64 = 0.75;

    /// Spawn cadence (seconds)
    pub const SPAWN_BASE: f32 = 3.2;
    pub const SPAWN_FLOOR: f32 = 1.2;
    pub const SPAWN_STEP_PER_LEVEL: f32 = 0.1;
    pub const FIRST_SPAWN_DELAY: f32 = 0.5;

    /// Scoring and progression
    pub const KILL_SCORE_MULTIPLIER: u64 = 5;
    pub const FIRST_THRESHOLD: u64 = 200;
    pub const UPGRADE_CHOICES: usize = 3;
}

/// Clamp that tolerates an empty range by collapsing onto its midpoint.
///
/// `f32::clamp` panics when `lo > hi`, which happens whenever the playfield
/// is smaller than the player's diameter.
#[inline]
pub fn clamp_or_center(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) * 0.5
    } else if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}
