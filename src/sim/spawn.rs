//! Spawn policy
//!
//! Where new hazards drop and where collectibles respawn. Hazards always drop
//! over the half of the field the player is not in; the collectible row is the
//! same every level.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{COLLECTIBLE_BOUNCE_MAX, COLLECTIBLE_BOUNCE_MIN};
use crate::settings::Settings;

/// Position and initial velocity for a new hazard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardDrop {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Seeded spawn decisions
#[derive(Debug, Clone)]
pub struct SpawnPolicy {
    rng: Pcg32,
    field_width: f32,
    hazard_spawn_y: f32,
    hazard_max_vx: i32,
    hazard_drop_vy: f32,
    collectible_count: usize,
    collectible_offset_x: f32,
    collectible_spacing: f32,
    collectible_spawn_y: f32,
}

impl SpawnPolicy {
    pub fn new(settings: &Settings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            field_width: settings.field_width,
            hazard_spawn_y: settings.hazard_spawn_y,
            hazard_max_vx: settings.hazard_max_vx,
            hazard_drop_vy: settings.hazard_drop_vy,
            collectible_count: settings.collectible_count,
            collectible_offset_x: settings.collectible_offset_x,
            collectible_spacing: settings.collectible_spacing,
            collectible_spawn_y: settings.collectible_spawn_y,
        }
    }

    /// Pick a drop point on the far side of the field from `player_x`
    pub fn drop_hazard(&mut self, player_x: f32) -> HazardDrop {
        let mid = (self.field_width / 2.0).round() as i32;
        let width = self.field_width.round() as i32;
        let x = if player_x < self.field_width / 2.0 {
            self.rng.random_range(mid..=width)
        } else {
            self.rng.random_range(0..=mid)
        };
        let vx = self
            .rng
            .random_range(-self.hazard_max_vx..=self.hazard_max_vx);

        HazardDrop {
            pos: Vec2::new(x as f32, self.hazard_spawn_y),
            vel: Vec2::new(vx as f32, self.hazard_drop_vy),
        }
    }

    /// Spawn point of the `index`-th collectible
    pub fn collectible_spawn(&self, index: usize) -> Vec2 {
        Vec2::new(
            self.collectible_offset_x + self.collectible_spacing * index as f32,
            self.collectible_spawn_y,
        )
    }

    /// The full collectible row, left to right
    pub fn collectible_layout(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.collectible_count).map(|i| self.collectible_spawn(i))
    }

    /// Respawn point for a collectible that was first placed at `home`
    pub fn collectible_respawn(&self, home: Vec2) -> Vec2 {
        Vec2::new(home.x, self.collectible_spawn_y)
    }

    /// Vertical restitution for a freshly created collectible
    pub fn collectible_bounce(&mut self) -> f32 {
        self.rng
            .random_range(COLLECTIBLE_BOUNCE_MIN..=COLLECTIBLE_BOUNCE_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_player_left_drops_right() {
        let mut policy = SpawnPolicy::new(&Settings::with_seed(1));
        for _ in 0..500 {
            let drop = policy.drop_hazard(100.0);
            assert!((400.0..=800.0).contains(&drop.pos.x), "x = {}", drop.pos.x);
            assert_eq!(drop.pos.y, 16.0);
            assert!((-200.0..=200.0).contains(&drop.vel.x));
            assert_eq!(drop.vel.y, 20.0);
        }
    }

    #[test]
    fn test_player_right_drops_left() {
        let mut policy = SpawnPolicy::new(&Settings::with_seed(2));
        for _ in 0..500 {
            let drop = policy.drop_hazard(700.0);
            assert!((0.0..=400.0).contains(&drop.pos.x), "x = {}", drop.pos.x);
        }
    }

    #[test]
    fn test_midpoint_counts_as_right_half() {
        let mut policy = SpawnPolicy::new(&Settings::with_seed(3));
        for _ in 0..200 {
            assert!(policy.drop_hazard(400.0).pos.x <= 400.0);
        }
    }

    #[test]
    fn test_same_seed_same_drops() {
        let mut a = SpawnPolicy::new(&Settings::with_seed(42));
        let mut b = SpawnPolicy::new(&Settings::with_seed(42));
        for x in [10.0, 500.0, 399.0, 401.0] {
            assert_eq!(a.drop_hazard(x), b.drop_hazard(x));
        }
    }

    #[test]
    fn test_collectible_layout_is_fixed_grid() {
        let policy = SpawnPolicy::new(&Settings::default());
        let layout: Vec<_> = policy.collectible_layout().collect();
        assert_eq!(layout.len(), 12);
        assert_eq!(layout[0], Vec2::new(12.0, 0.0));
        assert_eq!(layout[1], Vec2::new(82.0, 0.0));
        assert_eq!(layout[11], Vec2::new(782.0, 0.0));
        assert_eq!(
            policy.collectible_respawn(Vec2::new(82.0, 530.0)),
            Vec2::new(82.0, 0.0)
        );
    }

    #[test]
    fn test_collectible_bounce_range() {
        let mut policy = SpawnPolicy::new(&Settings::default());
        for _ in 0..100 {
            let bounce = policy.collectible_bounce();
            assert!((0.4..=0.8).contains(&bounce));
        }
    }

    proptest! {
        #[test]
        fn prop_hazard_never_drops_on_players_half(seed in any::<u64>(), player_x in 0.0f32..800.0) {
            let mut policy = SpawnPolicy::new(&Settings::with_seed(seed));
            let drop = policy.drop_hazard(player_x);
            if player_x < 400.0 {
                prop_assert!(drop.pos.x >= 400.0 && drop.pos.x <= 800.0);
            } else {
                prop_assert!(drop.pos.x >= 0.0 && drop.pos.x <= 400.0);
            }
            prop_assert!(drop.vel.x.abs() <= 200.0);
        }
    }
}
