//! Game state and core simulation types
//!
//! Everything a run owns lives in [`GameState`]. Components receive it by
//! mutable reference once per step; nothing is global.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::burst::BurstFire;
use super::progression::Progression;
use super::spawner;
use super::upgrades::{self, UpgradeId, UpgradeOffer};
use crate::clamp_or_center;
use crate::consts::*;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Maximum number of undrained events kept between frames
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Playfield dimensions in pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    /// Y coordinate a block's bottom edge must not reach
    #[inline]
    pub fn loss_line(&self) -> f32 {
        self.height - LOSS_MARGIN
    }

    /// Whether a projectile at `pos` is still worth simulating
    #[inline]
    pub fn in_cull_bounds(&self, pos: Vec2) -> bool {
        pos.x >= -CULL_MARGIN_X
            && pos.x <= self.width + CULL_MARGIN_X
            && pos.y >= -CULL_MARGIN_Y
            && pos.y <= self.height + CULL_MARGIN_Y
    }
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
}

impl Player {
    pub fn new(radius: f32, field: &Playfield) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            radius,
        };
        player.rest(field);
        player
    }

    /// Move to the default position near the bottom centre
    pub fn rest(&mut self, field: &Playfield) {
        self.pos = Vec2::new(field.width / 2.0, field.height - PLAYER_REST_OFFSET);
        self.clamp_to(field);
    }

    /// Keep the whole avatar inside the playfield
    pub fn clamp_to(&mut self, field: &Playfield) {
        let r = self.radius;
        self.pos.x = clamp_or_center(self.pos.x, r, field.width - r);
        self.pos.y = clamp_or_center(self.pos.y, r, field.height - r);
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Damage dealt per hit (copied from params when fired)
    pub damage: u32,
    /// Extra hits left; the projectile is spent once this drops below zero
    pub pierce: i32,
}

impl Projectile {
    /// Returns true if the projectile has used up its hits
    #[inline]
    pub fn is_spent(&self) -> bool {
        self.pierce < 0
    }
}

/// An enemy block (axis-aligned square)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Top-left corner
    pub pos: Vec2,
    /// Side length
    pub size: f32,
    pub hp: i32,
    pub max_hp: u32,
}

impl Block {
    pub fn new(pos: Vec2, size: f32, max_hp: u32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            pos,
            size,
            hp: max_hp as i32,
            max_hp,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }

    /// Remaining health in [0, 1], for tinting
    pub fn health_ratio(&self) -> f32 {
        (self.hp.max(0) as f32 / self.max_hp as f32).min(1.0)
    }

    /// Apply damage; returns true if the block is destroyed
    pub fn take_damage(&mut self, damage: u32) -> bool {
        let damage = i32::try_from(damage).unwrap_or(i32::MAX);
        self.hp = self.hp.saturating_sub(damage);
        self.hp <= 0
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0
    }
}

/// Tunable simulation parameters (changed by upgrades, restored on reset)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    pub projectile_damage: u32,
    pub projectile_speed: f32,
    /// Projectiles emitted per shot
    pub ball_count: u32,
    pub pierce: i32,
    /// Seconds between shots within a volley
    pub burst_interval: f32,
    /// Nominal length of a volley (seconds)
    pub burst_duration: f32,
    /// Block fall speed (pixels/s)
    pub descent_speed: f32,
    /// Spawn period before the per-level reduction
    pub spawn_base: f32,
}

impl SimParams {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            projectile_damage: tuning.projectile_damage,
            projectile_speed: tuning.projectile_speed,
            ball_count: tuning.volley_size,
            pierce: tuning.pierce,
            burst_interval: tuning.burst_interval,
            burst_duration: tuning.burst_duration,
            descent_speed: tuning.descent_speed,
            spawn_base: tuning.spawn_base,
        }
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}

/// Things that happened during simulation, for HUD/audio adapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveSpawned { wave: u32, blocks: usize },
    VolleyFired { projectiles: u32 },
    BlockHit { pos: Vec2, damage: u32, hp_left: i32 },
    BlockDestroyed { pos: Vec2, max_hp: u32, reward: u64 },
    LevelUp { level: u32 },
    UpgradeOffered { options: [UpgradeId; UPGRADE_CHOICES] },
    UpgradeApplied { id: UpgradeId },
    GameOver { score: u64 },
}

/// Serializable view of a run for HUD and debugging
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub score: u64,
    pub level: u32,
    pub wave: u32,
    pub paused: bool,
    pub game_over: bool,
    pub pending_upgrades: u32,
    pub player: Player,
    pub blocks: Vec<Block>,
    pub projectiles: Vec<Projectile>,
}

/// Complete state of a run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance the run was created with (reset target)
    pub tuning: Tuning,
    pub playfield: Playfield,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub blocks: Vec<Block>,
    pub params: SimParams,
    pub burst: BurstFire,
    /// Seconds until the next wave
    pub spawn_cooldown: f32,
    pub progression: Progression,
    /// Spawn cycles since reset (the reset wave is wave 1)
    pub wave: u32,
    pub paused: bool,
    pub game_over: bool,
    /// Simulated seconds since reset
    pub time_secs: f32,
    pub(crate) upgrade_offer: Option<UpgradeOffer>,
    pub(crate) events: VecDeque<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a run on the default playfield with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, DEFAULT_WIDTH, DEFAULT_HEIGHT, Tuning::default())
    }

    /// Create a run with explicit playfield size and tuning
    ///
    /// Fails with [`SimError::InvalidTuning`] if the tuning does not validate.
    pub fn with_tuning(
        seed: u64,
        width: f32,
        height: f32,
        tuning: Tuning,
    ) -> Result<Self, SimError> {
        tuning.validate()?;
        Ok(Self::build(seed, width, height, tuning))
    }

    fn build(seed: u64, width: f32, height: f32, tuning: Tuning) -> Self {
        let playfield = Playfield::new(width, height);
        let mut state = Self {
            seed,
            player: Player::new(tuning.player_radius, &playfield),
            params: SimParams::from_tuning(&tuning),
            progression: Progression::new(tuning.first_threshold),
            spawn_cooldown: tuning.first_spawn_delay,
            tuning,
            playfield,
            projectiles: Vec::new(),
            blocks: Vec::new(),
            burst: BurstFire::default(),
            wave: 0,
            paused: false,
            game_over: false,
            time_secs: 0.0,
            upgrade_offer: None,
            events: VecDeque::new(),
            rng: Pcg32::seed_from_u64(seed),
        };

        state.reset();
        state
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        super::tick::step(self, dt);
    }

    /// Restore the run to its initial state and spawn the first wave
    pub fn reset(&mut self) {
        self.projectiles.clear();
        self.blocks.clear();
        self.params = SimParams::from_tuning(&self.tuning);
        self.burst = BurstFire::default();
        self.spawn_cooldown = self.tuning.first_spawn_delay;
        self.progression = Progression::new(self.tuning.first_threshold);
        self.wave = 0;
        self.paused = false;
        self.game_over = false;
        self.time_secs = 0.0;
        self.upgrade_offer = None;
        self.events.clear();
        self.player.radius = self.tuning.player_radius;
        self.player.rest(&self.playfield);

        spawner::spawn_wave(self);
        log::info!("Run reset (seed {})", self.seed);
    }

    /// Place the player directly (pointer input); re-clamped to the playfield
    pub fn choose_player_position(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.player.pos = Vec2::new(x, y);
        self.player.clamp_to(&self.playfield);
    }

    /// Move the player along `direction` (keyboard/joystick input)
    ///
    /// The direction is normalized; a zero vector means no movement.
    pub fn steer_player(&mut self, direction: Vec2, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let dir = direction.normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        self.player.pos += dir * self.tuning.player_speed * dt;
        self.player.clamp_to(&self.playfield);
    }

    /// Resize the playfield; only the player is repositioned
    pub fn set_playfield_size(&mut self, width: f32, height: f32) {
        self.playfield = Playfield::new(width, height);
        self.player.rest(&self.playfield);
        log::debug!(
            "Playfield resized to {}x{}",
            self.playfield.width,
            self.playfield.height
        );
    }

    /// Pause or resume the run
    ///
    /// Resuming with upgrades still owed opens the next selection instead.
    /// An open selection can only be closed through [`Self::apply_upgrade`].
    pub fn set_paused(&mut self, paused: bool) {
        if self.game_over || self.upgrade_offer.is_some() {
            return;
        }
        if paused {
            self.paused = true;
        } else if self.progression.pending_upgrades > 0 {
            upgrades::open_selection(self);
        } else {
            self.paused = false;
        }
    }

    /// Answer the open upgrade selection
    pub fn apply_upgrade(&mut self, id: UpgradeId) -> Result<(), SimError> {
        upgrades::apply_upgrade(self, id)
    }

    /// The three options currently on offer, if a selection is open
    pub fn upgrade_offer(&self) -> Option<&UpgradeOffer> {
        self.upgrade_offer.as_ref()
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn score(&self) -> u64 {
        self.progression.score
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn pending_upgrades(&self) -> u32 {
        self.progression.pending_upgrades
    }

    pub fn thresholds(&self) -> &[u64] {
        &self.progression.thresholds
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score(),
            level: self.level(),
            wave: self.wave,
            paused: self.paused,
            game_over: self.game_over,
            pending_upgrades: self.pending_upgrades(),
            player: self.player.clone(),
            blocks: self.blocks.clone(),
            projectiles: self.projectiles.clone(),
        }
    }
}
