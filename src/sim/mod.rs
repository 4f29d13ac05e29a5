//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform code:
//! - One owned `GameState` per run, no globals
//! - Seeded RNG only
//! - Stable iteration order (storage order decides ties)

pub mod burst;
pub mod collision;
pub mod descent;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod upgrades;

pub use burst::{BurstFire, aim_angle, nearest_block};
pub use collision::{HitOutcome, first_hit, overlaps};
pub use progression::Progression;
pub use spawner::{spawn_wave, try_spawn_wave};
pub use state::{
    Block, GameEvent, GameState, Player, Playfield, Projectile, SimParams, Snapshot,
    MAX_PENDING_EVENTS,
};
pub use tick::{sanitize_dt, step};
pub use upgrades::{CATALOG, Upgrade, UpgradeId, UpgradeOffer};
