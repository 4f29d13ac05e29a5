//! Simulation step
//!
//! Advances a run by one frame: spawner, burst fire, projectiles, descent,
//! then progression. Steps are atomic and never overlap.

use super::state::{GameEvent, GameState};
use super::{burst, collision, descent, spawner, upgrades};
use crate::consts::MAX_STEP_DT;

/// Clamp a frame delta into `[0, MAX_STEP_DT]`; non-finite deltas become 0
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_STEP_DT)
    } else {
        0.0
    }
}

/// Advance the game state by `dt` seconds
pub fn step(state: &mut GameState, dt: f32) {
    // Don't step if paused or game over
    if state.paused || state.game_over {
        return;
    }

    let dt = sanitize_dt(dt);
    state.time_secs += dt;

    spawner::try_spawn_wave(state, dt);
    burst::fire_burst(state, dt);
    collision::resolve_projectiles(state, dt);
    descent::advance_blocks(state, dt);

    // Score from this step still counts toward levels after a loss, but no
    // selection opens on a finished run
    let gained = state.progression.update();
    if gained > 0 {
        let level = state.progression.level;
        log::info!("Level {} reached (+{} upgrades owed)", level, gained);
        state.push_event(GameEvent::LevelUp { level });
        if !state.paused && !state.game_over {
            upgrades::open_selection(state);
        }
    }
}
