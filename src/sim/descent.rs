//! Enemy descent and the loss line

use super::state::{Block, GameEvent, GameState, Playfield};

/// True if any block's bottom edge has reached the loss line
pub fn reached_loss_line(blocks: &[Block], playfield: &Playfield) -> bool {
    let line = playfield.loss_line();
    blocks.iter().any(|b| b.bottom() >= line)
}

/// Move every block down and end the run if one got too low
pub fn advance_blocks(state: &mut GameState, dt: f32) {
    let dy = state.params.descent_speed * dt;
    for block in &mut state.blocks {
        block.pos.y += dy;
    }

    if reached_loss_line(&state.blocks, &state.playfield) {
        state.game_over = true;
        log::info!(
            "Game over at wave {} with score {}",
            state.wave,
            state.progression.score
        );
        state.push_event(GameEvent::GameOver {
            score: state.progression.score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_blocks_descend() {
        let mut state = GameState::new(2);
        state.blocks.clear();
        state.blocks.push(Block::new(Vec2::new(10.0, 0.0), 20.0, 1));
        state.params.descent_speed = 50.0;
        advance_blocks(&mut state, 0.02);
        assert!((state.blocks[0].pos.y - 1.0).abs() < 1e-6);
        assert!(!state.game_over);
    }

    #[test]
    fn test_loss_line_is_inclusive() {
        let field = Playfield::new(400.0, 600.0);
        let below = Block::new(Vec2::new(0.0, 549.0), 20.0, 1);
        let touching = Block::new(Vec2::new(0.0, 550.0), 20.0, 1);
        assert!(!reached_loss_line(&[below], &field));
        assert!(reached_loss_line(&[touching], &field));
    }
}
