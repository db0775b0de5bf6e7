//! Game tuning
//!
//! Every number the rules engine and the arcade integrator care about lives
//! here. Defaults reproduce the reference layout; a JSON file may override any
//! subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Game tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the spawn RNG
    pub seed: u64,

    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    pub gravity: f32,

    // === Player ===
    pub player_start: (f32, f32),
    pub player_run_speed: f32,
    pub player_jump_speed: f32,

    // === Collectibles ===
    /// Pool capacity; also the size of the layout row
    pub collectible_count: usize,
    pub collectible_offset_x: f32,
    pub collectible_spacing: f32,
    pub collectible_spawn_y: f32,

    // === Hazards ===
    pub hazard_spawn_y: f32,
    /// Horizontal drop speed is drawn from `[-hazard_max_vx, hazard_max_vx]`
    pub hazard_max_vx: i32,
    pub hazard_drop_vy: f32,

    // === Scoring ===
    pub points_per_item: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,

            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            gravity: GRAVITY,

            player_start: (PLAYER_START_X, PLAYER_START_Y),
            player_run_speed: PLAYER_RUN_SPEED,
            player_jump_speed: PLAYER_JUMP_SPEED,

            collectible_count: COLLECTIBLE_COUNT,
            collectible_offset_x: COLLECTIBLE_OFFSET_X,
            collectible_spacing: COLLECTIBLE_SPACING,
            collectible_spawn_y: COLLECTIBLE_SPAWN_Y,

            hazard_spawn_y: HAZARD_SPAWN_Y,
            hazard_max_vx: HAZARD_MAX_VX,
            hazard_drop_vy: HAZARD_DROP_VY,

            points_per_item: POINTS_PER_ITEM,
        }
    }
}

impl Settings {
    /// Default tuning with a specific RNG seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject values the rules engine cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.field_width > 0.0) {
            return Err(invalid("field_width", "must be positive"));
        }
        if !(self.field_height > 0.0) {
            return Err(invalid("field_height", "must be positive"));
        }
        if self.collectible_count == 0 {
            return Err(invalid("collectible_count", "must be at least 1"));
        }
        if self.hazard_max_vx < 0 {
            return Err(invalid("hazard_max_vx", "must not be negative"));
        }
        if self.points_per_item == 0 {
            return Err(invalid("points_per_item", "must be at least 1"));
        }
        let last_x = self.collectible_offset_x
            + self.collectible_spacing * (self.collectible_count - 1) as f32;
        if self.collectible_offset_x < 0.0 || last_x > self.field_width {
            return Err(invalid(
                "collectible_spacing",
                format!("layout row ends at x={last_x}, outside the field"),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.collectible_count, 12);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "points_per_item": 5 }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.points_per_item, 5);
        assert_eq!(settings.field_width, FIELD_WIDTH);
    }

    #[test]
    fn test_rejects_empty_pool() {
        let err = Settings::from_json(r#"{ "collectible_count": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "collectible_count",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_layout_off_field() {
        let err = Settings::from_json(r#"{ "collectible_spacing": 100.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = Settings::from_json("{ seed: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("star_catcher_settings_{}.json", std::process::id()));
        let settings = Settings::with_seed(99);
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
