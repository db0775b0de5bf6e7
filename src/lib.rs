//! Star Catcher - a single-screen platform arcade game
//!
//! Core modules:
//! - `sim`: Rules engine (entities, collision rules, game state, spawning)
//! - `bridge`: Commands pushed to the presentation layer
//! - `arcade`: Headless arcade physics standing in for the host engine
//! - `settings`: Data-driven game tuning

pub mod arcade;
pub mod bridge;
pub mod error;
pub mod settings;
pub mod sim;

pub use bridge::{Command, Presenter, RestartPrompt};
pub use error::{SettingsError, SimError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Play-field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Downward acceleration applied by the arcade integrator (pixels/s²)
    pub const GRAVITY: f32 = 300.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 450.0;
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const PLAYER_RUN_SPEED: f32 = 160.0;
    pub const PLAYER_JUMP_SPEED: f32 = 330.0;
    pub const PLAYER_BOUNCE: f32 = 0.2;

    /// Collectible (star) layout: a fixed row across the top of the field
    pub const COLLECTIBLE_COUNT: usize = 12;
    pub const COLLECTIBLE_OFFSET_X: f32 = 12.0;
    pub const COLLECTIBLE_SPACING: f32 = 70.0;
    pub const COLLECTIBLE_SPAWN_Y: f32 = 0.0;
    pub const COLLECTIBLE_WIDTH: f32 = 24.0;
    pub const COLLECTIBLE_HEIGHT: f32 = 22.0;
    pub const COLLECTIBLE_BOUNCE_MIN: f32 = 0.4;
    pub const COLLECTIBLE_BOUNCE_MAX: f32 = 0.8;

    /// Hazard (bomb) defaults
    pub const HAZARD_SPAWN_Y: f32 = 16.0;
    pub const HAZARD_MAX_VX: i32 = 200;
    pub const HAZARD_DROP_VY: f32 = 20.0;
    pub const HAZARD_SIZE: f32 = 14.0;
    pub const HAZARD_BOUNCE: f32 = 1.0;

    /// Points per collectible, multiplied by the current level
    pub const POINTS_PER_ITEM: u64 = 10;

    /// Platform size (the ground is this scaled by 2)
    pub const PLATFORM_WIDTH: f32 = 400.0;
    pub const PLATFORM_HEIGHT: f32 = 32.0;

    /// Platform layout as (center x, center y, scale)
    pub const PLATFORM_LAYOUT: [(f32, f32, f32); 4] = [
        (400.0, 568.0, 2.0), // ground
        (600.0, 400.0, 1.0),
        (50.0, 250.0, 1.0),
        (750.0, 220.0, 1.0),
    ];
}

/// Axis-aligned overlap test for two boxes given by center and full size
#[inline]
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    let delta = (a_pos - b_pos).abs();
    let reach = (a_size + b_size) * 0.5;
    delta.x < reach.x && delta.y < reach.y
}

/// Penetration of box `a` into box `b` along each axis (negative when apart)
#[inline]
pub fn aabb_penetration(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> Vec2 {
    (a_size + b_size) * 0.5 - (a_pos - b_pos).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap() {
        let size = Vec2::new(10.0, 10.0);
        assert!(aabb_overlap(Vec2::ZERO, size, Vec2::new(9.0, 0.0), size));
        assert!(!aabb_overlap(Vec2::ZERO, size, Vec2::new(10.0, 0.0), size));
        assert!(!aabb_overlap(Vec2::ZERO, size, Vec2::new(0.0, 11.0), size));
    }

    #[test]
    fn test_aabb_penetration() {
        let size = Vec2::new(10.0, 10.0);
        let pen = aabb_penetration(Vec2::ZERO, size, Vec2::new(8.0, 3.0), size);
        assert!((pen.x - 2.0).abs() < 1e-6);
        assert!((pen.y - 7.0).abs() < 1e-6);
    }
}
