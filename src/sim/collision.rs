//! Projectile motion, collision and damage
//!
//! Projectiles are tested as squares (centre ± radius) against block squares.
//! A projectile damages at most one block per step: the first overlapping
//! block in storage order, not the nearest one.

use glam::Vec2;

use super::state::{Block, GameEvent, GameState, Projectile};
use crate::consts::KILL_SCORE_MULTIPLIER;

/// Result of a projectile striking a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Block survived; score is the damage dealt
    Damaged { score: u64 },
    /// Block destroyed; score is `max_hp * 5`
    Destroyed { score: u64 },
}

impl HitOutcome {
    pub fn score(&self) -> u64 {
        match *self {
            HitOutcome::Damaged { score } | HitOutcome::Destroyed { score } => score,
        }
    }
}

/// Strict axis-aligned overlap between a projectile's bounding square and a block
#[inline]
pub fn overlaps(pos: Vec2, radius: f32, block: &Block) -> bool {
    pos.x + radius > block.pos.x
        && pos.x - radius < block.pos.x + block.size
        && pos.y + radius > block.pos.y
        && pos.y - radius < block.pos.y + block.size
}

/// Index of the first block overlapping the projectile, in storage order
pub fn first_hit(projectile: &Projectile, blocks: &[Block]) -> Option<usize> {
    blocks
        .iter()
        .position(|block| overlaps(projectile.pos, projectile.radius, block))
}

/// Apply one hit: damage the block and spend one pierce charge
pub fn apply_hit(projectile: &mut Projectile, block: &mut Block) -> HitOutcome {
    let destroyed = block.take_damage(projectile.damage);
    projectile.pierce -= 1;
    if destroyed {
        HitOutcome::Destroyed {
            score: block.max_hp as u64 * KILL_SCORE_MULTIPLIER,
        }
    } else {
        HitOutcome::Damaged {
            score: projectile.damage as u64,
        }
    }
}

/// Advance every projectile and resolve hits for this step
pub fn resolve_projectiles(state: &mut GameState, dt: f32) {
    let mut projectiles = std::mem::take(&mut state.projectiles);
    let mut events = Vec::new();
    let playfield = state.playfield;

    projectiles.retain_mut(|projectile| {
        projectile.pos += projectile.vel * dt;

        if let Some(index) = first_hit(projectile, &state.blocks) {
            let outcome = apply_hit(projectile, &mut state.blocks[index]);
            state.progression.add_score(outcome.score());

            match outcome {
                HitOutcome::Destroyed { score } => {
                    let block = state.blocks.remove(index);
                    log::debug!("Block destroyed (max hp {}), +{}", block.max_hp, score);
                    events.push(GameEvent::BlockDestroyed {
                        pos: block.pos,
                        max_hp: block.max_hp,
                        reward: score,
                    });
                }
                HitOutcome::Damaged { .. } => {
                    let block = &state.blocks[index];
                    events.push(GameEvent::BlockHit {
                        pos: block.pos,
                        damage: projectile.damage,
                        hp_left: block.hp,
                    });
                }
            }

            if projectile.is_spent() {
                return false;
            }
        }

        playfield.in_cull_bounds(projectile.pos)
    });

    state.projectiles = projectiles;
    for event in events {
        state.push_event(event);
    }
}
