//! Demo scene configuration
//!
//! Loaded from a TOML or RON file given on the command line; every field
//! has a default so a partial file is enough.

use serde::{Deserialize, Serialize};
use sprite_collision::config::{CollisionSettings, Config};
use sprite_collision::error::{CollisionError, Result};

/// Scene layout and simulation length
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Arena width
    pub width: f64,

    /// Arena height
    pub height: f64,

    /// Number of moving sprites
    pub sprite_count: usize,

    /// Sprite edge length
    pub sprite_size: f64,

    /// Highest initial speed per step
    pub max_speed: f64,

    /// Number of steps to simulate
    pub frames: u32,

    /// Seed for the scene layout
    pub seed: u64,

    /// Collision core settings
    pub collision: CollisionSettings,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            sprite_count: 60,
            sprite_size: 16.0,
            max_speed: 12.0,
            frames: 600,
            seed: 42,
            collision: CollisionSettings::default(),
        }
    }
}

impl SceneSettings {
    /// Reject layouts that cannot hold a single sprite and negative speeds
    pub fn validate(&self) -> Result<()> {
        if !(self.sprite_size.is_finite() && self.sprite_size > 0.0) {
            return Err(CollisionError::invalid(format!(
                "sprite_size must be positive, got {}",
                self.sprite_size
            )));
        }
        let min_extent = 2.0 * self.sprite_size;
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= min_extent
            || self.height <= min_extent
        {
            return Err(CollisionError::invalid(format!(
                "arena {}x{} must exceed twice the sprite size ({min_extent}) on both sides",
                self.width, self.height
            )));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(CollisionError::invalid(format!(
                "max_speed must be zero or positive, got {}",
                self.max_speed
            )));
        }
        Ok(())
    }
}

impl Config for SceneSettings {}
