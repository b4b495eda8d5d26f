//! Configuration system
//!
//! Settings are plain serde structs. Anything implementing [`Config`] can be
//! loaded from or saved to a TOML or RON file chosen by extension.

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::{Real, PARALLEL_TOLERANCE};
use crate::spatial::QuadtreeConfig;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_str_with_format(&contents, path)
    }

    /// Parse configuration text, picking the format from `path`'s extension
    fn from_str_with_format(contents: &str, path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Broad-phase index settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadtreeSettings {
    /// Build and use the quadtree. Off by default; callers opt in.
    pub enabled: bool,
    /// Entries a node holds before it splits
    pub max_objects: usize,
    /// Deepest level a node may split to
    pub max_levels: u32,
}

impl Default for QuadtreeSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_objects: 4,
            max_levels: 4,
        }
    }
}

impl From<QuadtreeSettings> for QuadtreeConfig {
    fn from(settings: QuadtreeSettings) -> Self {
        QuadtreeConfig {
            max_objects: settings.max_objects,
            max_levels: settings.max_levels,
        }
    }
}

/// Tunneling-prevention settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultisampleOptions {
    /// Subsample along the frame's motion when swept boxes overlap
    pub enabled: bool,
    /// Smallest fraction of a frame between two samples.
    /// Bounds the sample count at `1 / min_timestep`.
    pub min_timestep: Real,
}

impl Default for MultisampleOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            min_timestep: 0.015,
        }
    }
}

/// Narrow-phase settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatOptions {
    /// Tolerance used when discarding parallel candidate axes
    pub parallel_tolerance: Real,
}

impl Default for SatOptions {
    fn default() -> Self {
        Self {
            parallel_tolerance: PARALLEL_TOLERANCE,
        }
    }
}

/// Collision core settings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    /// Broad-phase index
    pub quadtree: QuadtreeSettings,
    /// Swept multisampling
    pub multisample: MultisampleOptions,
    /// SAT narrow phase
    pub sat: SatOptions,
}

impl Config for CollisionSettings {}
