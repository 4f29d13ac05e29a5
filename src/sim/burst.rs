//! Burst fire controller
//!
//! The player fires automatically in volleys: a run of evenly spaced shots,
//! then a fixed rest. Each shot emits `ball_count` projectiles aimed at the
//! nearest block.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Block, GameEvent, GameState, Projectile};
use crate::consts::*;

/// Volley state machine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BurstFire {
    /// Seconds until the controller may act again
    pub cooldown: f32,
    /// Shots left in the current volley
    pub shots_remaining: u32,
    /// Countdown to the next shot within the volley
    pub timer: f32,
}

impl BurstFire {
    /// Advance the controller; returns true when a shot should be fired
    pub fn update(&mut self, dt: f32, interval: f32, duration: f32) -> bool {
        if self.cooldown > 0.0 {
            self.cooldown -= dt;
            return false;
        }

        if self.shots_remaining == 0 {
            self.shots_remaining = shots_per_volley(duration, interval);
            self.timer = 0.0;
            self.cooldown = VOLLEY_REST;
            log::debug!("Volley armed: {} shots", self.shots_remaining);
        }

        self.timer -= dt;
        if self.timer <= 0.0 && self.shots_remaining > 0 {
            self.timer = interval;
            self.shots_remaining -= 1;
            return true;
        }
        false
    }
}

/// Number of shots in one volley (always at least one)
pub fn shots_per_volley(duration: f32, interval: f32) -> u32 {
    if interval <= 0.0 || !interval.is_finite() {
        return 1;
    }
    let shots = (duration / interval).floor();
    if shots.is_finite() && shots >= 1.0 {
        shots as u32
    } else {
        1
    }
}

/// Block whose centre is closest to `from`; the first one wins ties
pub fn nearest_block(blocks: &[Block], from: Vec2) -> Option<&Block> {
    let mut best: Option<(&Block, f32)> = None;
    for block in blocks {
        let dist = block.center().distance(from);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((block, dist)),
        }
    }
    best.map(|(block, _)| block)
}

/// Firing angle from `from` toward the nearest block, or straight up
pub fn aim_angle(blocks: &[Block], from: Vec2) -> f32 {
    match nearest_block(blocks, from) {
        Some(block) => {
            let to = block.center() - from;
            to.y.atan2(to.x)
        }
        None => -std::f32::consts::FRAC_PI_2,
    }
}

/// Run the burst controller for one step, spawning projectiles as needed
pub fn fire_burst(state: &mut GameState, dt: f32) {
    let params = &state.params;
    if !state
        .burst
        .update(dt, params.burst_interval, params.burst_duration)
    {
        return;
    }

    let count = state.params.ball_count;
    for _ in 0..count {
        spawn_projectile(state);
    }
    state.push_event(GameEvent::VolleyFired { projectiles: count });
}

/// Emit one projectile from the player toward the nearest block
pub fn spawn_projectile(state: &mut GameState) {
    let origin = state.player.pos;
    let base = aim_angle(&state.blocks, origin);
    let angle = base + state.rng.random_range(-AIM_SPREAD..AIM_SPREAD);
    let vel = Vec2::new(angle.cos(), angle.sin()) * state.params.projectile_speed;

    state.projectiles.push(Projectile {
        pos: origin,
        vel,
        radius: state.tuning.projectile_radius,
        damage: state.params.projectile_damage,
        pierce: state.params.pierce,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.01;

    #[test]
    fn test_shots_per_volley() {
        assert_eq!(shots_per_volley(1.0, 0.12), 8);
        assert_eq!(shots_per_volley(1.0, 0.05), 20);
        assert_eq!(shots_per_volley(0.1, 0.5), 1);
        assert_eq!(shots_per_volley(1.0, 0.0), 1);
    }

    #[test]
    fn test_first_shot_fires_on_arming() {
        let mut burst = BurstFire::default();
        assert!(burst.update(DT, 0.12, 1.0));
        assert_eq!(burst.shots_remaining, 7);
        assert_eq!(burst.cooldown, VOLLEY_REST);
        assert_eq!(burst.timer, 0.12);
    }

    #[test]
    fn test_rest_blocks_shots() {
        let mut burst = BurstFire::default();
        assert!(burst.update(DT, 0.12, 1.0));
        // Roughly one second of steps with no shots
        let mut fired = 0;
        for _ in 0..99 {
            if burst.update(DT, 0.12, 1.0) {
                fired += 1;
            }
        }
        assert_eq!(fired, 0);
        assert_eq!(burst.shots_remaining, 7);
    }

    #[test]
    fn test_volley_drains_then_rearms() {
        let mut burst = BurstFire::default();
        let mut fired = 0;
        // 3 seconds is enough for the first shot, the rest, the remaining
        // seven shots and the next arming
        for _ in 0..300 {
            if burst.update(DT, 0.12, 1.0) {
                fired += 1;
            }
        }
        assert!(fired >= 9, "fired {fired}");
    }

    #[test]
    fn test_nearest_block_ties_first_wins() {
        let from = Vec2::new(100.0, 100.0);
        let left = Block::new(Vec2::new(40.0, 40.0), 20.0, 1);
        let right = Block::new(Vec2::new(140.0, 40.0), 20.0, 1);
        let blocks = vec![left.clone(), right.clone()];
        let nearest = nearest_block(&blocks, from).unwrap();
        assert_eq!(nearest.pos, left.pos);

        let blocks = vec![right.clone(), left];
        let nearest = nearest_block(&blocks, from).unwrap();
        assert_eq!(nearest.pos, right.pos);
    }

    #[test]
    fn test_aim_straight_up_without_blocks() {
        let angle = aim_angle(&[], Vec2::new(50.0, 50.0));
        assert!((angle + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_aim_at_block() {
        // Block directly to the right of the player
        let blocks = vec![Block::new(Vec2::new(190.0, 90.0), 20.0, 1)];
        let angle = aim_angle(&blocks, Vec2::new(100.0, 100.0));
        assert!(angle.abs() < 1e-6);
    }

    #[test]
    fn test_fire_burst_snapshots_params() {
        let mut state = GameState::new(42);
        state.blocks.clear();
        state.params.ball_count = 3;
        state.params.projectile_damage = 4;
        state.params.pierce = 2;

        fire_burst(&mut state, DT);
        assert_eq!(state.projectiles.len(), 3);
        for p in &state.projectiles {
            assert_eq!(p.damage, 4);
            assert_eq!(p.pierce, 2);
            assert_eq!(p.pos, state.player.pos);
            assert!((p.vel.length() - state.params.projectile_speed).abs() < 1e-2);
            // Straight up, within the spread
            let angle = p.vel.y.atan2(p.vel.x);
            assert!((angle + std::f32::consts::FRAC_PI_2).abs() <= AIM_SPREAD + 1e-5);
        }

        // Later changes do not touch projectiles already in flight
        state.params.projectile_damage = 9;
        assert!(state.projectiles.iter().all(|p| p.damage == 4));
    }
}
