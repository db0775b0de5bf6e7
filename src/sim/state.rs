//! Score, level and phase
//!
//! Replaced wholesale on restart.

use serde::{Deserialize, Serialize};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Player was hit; waiting for restart
    GameOver,
}

/// Progress of the current round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    /// Starts at 1; increases on every full clear of the collectibles
    pub level: u32,
    pub phase: GamePhase,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            phase: GamePhase::Playing,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Award one collection worth `points_per_item` times the current level.
    /// Returns the points added.
    pub fn award(&mut self, points_per_item: u64) -> u64 {
        debug_assert!(self.is_playing(), "score changed outside Playing");
        let points = points_per_item.saturating_mul(u64::from(self.level.max(1)));
        self.score = self.score.saturating_add(points);
        points
    }

    /// Advance to the next level
    pub fn level_up(&mut self) {
        debug_assert!(self.is_playing(), "level changed outside Playing");
        debug_assert!(self.level >= 1, "level dropped below 1");
        self.level = self.level.max(1).saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_award_uses_current_level() {
        let mut state = GameState::new();
        assert_eq!(state.award(10), 10);
        state.level_up();
        assert_eq!(state.award(10), 20);
        assert_eq!(state.score, 30);
    }

    #[test]
    fn test_award_saturates() {
        let mut state = GameState::new();
        state.score = u64::MAX - 5;
        state.award(10);
        assert_eq!(state.score, u64::MAX);
    }
}
