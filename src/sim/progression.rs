//! Score, level and the threshold ladder
//!
//! Levels are earned at geometrically growing score thresholds (200, 400,
//! 800, ...). The ladder only ever grows, and always keeps one threshold
//! ahead of the current score.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    /// Cumulative score (never decreases)
    pub score: u64,
    /// Current level, starting at 1
    pub level: u32,
    /// Strictly increasing level-up thresholds
    pub thresholds: Vec<u64>,
    /// Level-ups not yet turned into an upgrade choice
    pub pending_upgrades: u32,
}

impl Progression {
    pub fn new(first_threshold: u64) -> Self {
        Self {
            score: 0,
            level: 1,
            thresholds: vec![first_threshold.max(1)],
            pending_upgrades: 0,
        }
    }

    pub fn add_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
    }

    /// Threshold the score is working toward
    pub fn next_threshold(&self) -> u64 {
        self.thresholds.last().copied().unwrap_or(u64::MAX)
    }

    /// Level implied by the current score and ladder
    pub fn level_for_score(&self) -> u32 {
        let passed = self.thresholds.partition_point(|&t| t <= self.score);
        1 + passed as u32
    }

    /// Extend the ladder past the score and recompute the level
    ///
    /// Returns the number of levels gained; they are added to
    /// `pending_upgrades`.
    pub fn update(&mut self) -> u32 {
        while let Some(&last) = self.thresholds.last() {
            if self.score < last || last == u64::MAX {
                break;
            }
            self.thresholds.push(last.saturating_mul(2));
        }

        let level = self.level_for_score();
        if level <= self.level {
            return 0;
        }
        let gained = level - self.level;
        self.level = level;
        self.pending_upgrades += gained;
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_ladder() {
        let p = Progression::new(200);
        assert_eq!(p.level, 1);
        assert_eq!(p.thresholds, vec![200]);
        assert_eq!(p.next_threshold(), 200);
    }

    #[test]
    fn test_single_level_up() {
        let mut p = Progression::new(200);
        p.add_score(199);
        assert_eq!(p.update(), 0);
        assert_eq!(p.level, 1);

        p.add_score(1);
        assert_eq!(p.update(), 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.pending_upgrades, 1);
        assert_eq!(p.thresholds, vec![200, 400]);
    }

    #[test]
    fn test_multi_level_jump() {
        let mut p = Progression::new(200);
        p.add_score(850);
        assert_eq!(p.update(), 3);
        assert_eq!(p.level, 4);
        assert_eq!(p.pending_upgrades, 3);
        assert_eq!(p.thresholds, vec![200, 400, 800, 1600]);
        assert!(p.next_threshold() > p.score);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut p = Progression::new(200);
        p.add_score(450);
        assert_eq!(p.update(), 2);
        assert_eq!(p.update(), 0);
        assert_eq!(p.pending_upgrades, 2);
        assert_eq!(p.thresholds.len(), 3);
    }

    #[test]
    fn test_score_saturates() {
        let mut p = Progression::new(200);
        p.add_score(u64::MAX);
        p.add_score(10);
        assert_eq!(p.score, u64::MAX);
        // Ladder growth terminates at the top of the range
        p.update();
        assert_eq!(p.next_threshold(), u64::MAX);
    }
}
