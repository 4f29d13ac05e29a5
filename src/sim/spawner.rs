//! Wave spawner
//!
//! Every `spawn_cooldown` seconds a new row of blocks appears above the top
//! edge. The period shortens with level down to a fixed floor.

use glam::Vec2;
use rand::Rng;

use super::state::{Block, GameEvent, GameState};
use crate::consts::*;

/// Column geometry for a wave across `width`: (cell width, block side)
///
/// Returns `None` when the playfield is too narrow to fit any block.
pub fn column_layout(width: f32) -> Option<(f32, f32)> {
    let available = width - WAVE_PADDING * 2.0;
    let cell = available / WAVE_COLUMNS as f32;
    let side = cell - BLOCK_GUTTER;
    if side.is_finite() && side > 0.0 {
        Some((cell, side))
    } else {
        None
    }
}

/// Seconds between waves at the given level
pub fn spawn_period(spawn_base: f32, level: u32) -> f32 {
    (spawn_base - level as f32 * SPAWN_STEP_PER_LEVEL).max(SPAWN_FLOOR)
}

/// Hit points for a new block, uniform over `[level, 2 * level)`
pub fn roll_hp(rng: &mut impl Rng, level: u32) -> u32 {
    let level = level.max(1);
    rng.random_range(level..level.saturating_mul(2))
}

/// Per-column spawn probability, forced into `[0, 1]` (NaN spawns nothing)
pub fn spawn_chance(chance: f64) -> f64 {
    if chance.is_nan() {
        0.0
    } else {
        chance.clamp(0.0, 1.0)
    }
}

/// Count down and spawn a wave when the timer runs out
pub fn try_spawn_wave(state: &mut GameState, dt: f32) {
    state.spawn_cooldown -= dt;
    if state.spawn_cooldown <= 0.0 {
        spawn_wave(state);
        state.spawn_cooldown = spawn_period(state.params.spawn_base, state.progression.level);
    }
}

/// Generate one wave of blocks above the visible area
pub fn spawn_wave(state: &mut GameState) {
    let level = state.progression.level;
    let chance = spawn_chance(state.tuning.column_spawn_chance);
    let mut spawned = 0;

    if let Some((cell, side)) = column_layout(state.playfield.width) {
        for col in 0..WAVE_COLUMNS {
            if !state.rng.random_bool(chance) {
                continue;
            }
            let hp = roll_hp(&mut state.rng, level);
            let x = WAVE_PADDING + col as f32 * cell + BLOCK_GUTTER / 2.0;
            let y = -side - BLOCK_GUTTER;
            state.blocks.push(Block::new(Vec2::new(x, y), side, hp));
            spawned += 1;
        }
    }

    state.wave += 1;
    log::info!(
        "Wave {}: {} blocks at level {}",
        state.wave,
        spawned,
        level
    );
    state.push_event(GameEvent::WaveSpawned {
        wave: state.wave,
        blocks: spawned,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_period() {
        assert!((spawn_period(SPAWN_BASE, 1) - 3.1).abs() < 1e-5);
        assert!((spawn_period(SPAWN_BASE, 10) - 2.2).abs() < 1e-5);
        assert_eq!(spawn_period(SPAWN_BASE, 25), SPAWN_FLOOR);
        assert_eq!(spawn_period(SPAWN_BASE, 500), SPAWN_FLOOR);
    }

    #[test]
    fn test_roll_hp_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        for level in 1..12 {
            for _ in 0..50 {
                let hp = roll_hp(&mut rng, level);
                assert!(hp >= level && hp < level * 2);
            }
        }
        // Level 1 always gives single-hit blocks
        assert_eq!(roll_hp(&mut rng, 1), 1);
    }

    #[test]
    fn test_wave_layout_fits_and_is_disjoint() {
        let mut state = GameState::new(3);
        state.blocks.clear();
        state.tuning.column_spawn_chance = 1.0;
        spawn_wave(&mut state);

        let width = state.playfield.width;
        assert_eq!(state.blocks.len(), WAVE_COLUMNS as usize);
        let mut ranges: Vec<(f32, f32)> = state
            .blocks
            .iter()
            .map(|b| (b.pos.x, b.pos.x + b.size))
            .collect();
        ranges.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (lo, hi) in &ranges {
            assert!(*lo >= 0.0 && *hi <= width);
        }
        for pair in ranges.windows(2) {
            assert!(pair[0].1 < pair[1].0);
        }
        // Fully above the visible area
        assert!(state.blocks.iter().all(|b| b.bottom() < 0.0));
    }

    #[test]
    fn test_wave_counter_increments_even_when_empty() {
        let mut state = GameState::new(3);
        state.tuning.column_spawn_chance = 0.0;
        state.blocks.clear();
        let wave = state.wave;
        spawn_wave(&mut state);
        assert!(state.blocks.is_empty());
        assert_eq!(state.wave, wave + 1);
    }

    #[test]
    fn test_out_of_range_chance_is_clamped() {
        assert_eq!(spawn_chance(1.5), 1.0);
        assert_eq!(spawn_chance(-0.2), 0.0);
        assert_eq!(spawn_chance(f64::NAN), 0.0);
        assert_eq!(spawn_chance(0.75), 0.75);

        // Edited after construction: waves still spawn without panicking
        let mut state = GameState::new(3);
        state.blocks.clear();
        state.tuning.column_spawn_chance = 1.5;
        spawn_wave(&mut state);
        assert_eq!(state.blocks.len(), WAVE_COLUMNS as usize);

        state.blocks.clear();
        state.tuning.column_spawn_chance = f64::NAN;
        spawn_wave(&mut state);
        assert!(state.blocks.is_empty());
    }

    #[test]
    fn test_narrow_playfield_spawns_nothing() {
        let mut state = GameState::with_tuning(3, 40.0, 600.0, Tuning::default()).unwrap();
        state.blocks.clear();
        spawn_wave(&mut state);
        assert!(state.blocks.is_empty());
        assert_eq!(column_layout(40.0), None);
    }

    #[test]
    fn test_countdown_resets_by_level() {
        let mut state = GameState::new(8);
        state.spawn_cooldown = 0.005;
        state.progression.level = 4;
        let wave = state.wave;
        try_spawn_wave(&mut state, 0.01);
        assert_eq!(state.wave, wave + 1);
        assert!((state.spawn_cooldown - 2.8).abs() < 1e-5);

        // Not yet due
        try_spawn_wave(&mut state, 0.01);
        assert_eq!(state.wave, wave + 1);
    }
}
