//! # World Configuration
//!
//! Tunables for streaming, depth and terrain shape. Loaded once at startup
//! from an external TOML file; anything missing falls back to the
//! production preset.
//!
//! ```toml
//! render_distance = 4
//! chunks_above_surface = 1
//! max_depth_levels = 50
//! blocks_per_level = 4
//! block_size = 1.0
//! max_rebuilds_per_update = 8
//! surface_base = 4
//! surface_amplitude = 4
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};
use crate::terrain::TerrainParams;

/// World manager configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldManagerConfig {
    /// Horizontal streaming radius in chunks (cylindrical).
    pub render_distance: i32,
    /// Chunk layers kept above the highest possible surface chunk.
    pub chunks_above_surface: i32,
    /// Depth levels down to the bedrock floor.
    pub max_depth_levels: u32,
    /// Blocks per depth level.
    pub blocks_per_level: u32,
    /// Block edge length in metres.
    pub block_size: f32,
    /// Rebuild cap used by `WorldManager::frame_budget`.
    pub max_rebuilds_per_update: usize,
    /// Mean surface height (block Y).
    pub surface_base: i32,
    /// Maximum surface deviation in blocks.
    pub surface_amplitude: i32,
}

impl Default for WorldManagerConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl WorldManagerConfig {
    /// Settings for the shipping game.
    #[must_use]
    pub fn production() -> Self {
        Self {
            render_distance: 4,
            chunks_above_surface: 1,
            max_depth_levels: 50,
            blocks_per_level: 4,
            block_size: 1.0,
            max_rebuilds_per_update: 8,
            surface_base: 4,
            surface_amplitude: 4,
        }
    }

    /// Small world for tests: radius 1, 32 blocks deep.
    #[must_use]
    pub fn test() -> Self {
        Self {
            render_distance: 1,
            chunks_above_surface: 1,
            max_depth_levels: 8,
            blocks_per_level: 4,
            block_size: 1.0,
            max_rebuilds_per_update: 64,
            surface_base: 4,
            surface_amplitude: 4,
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` for malformed TOML or unknown keys, and
    /// `InvalidConfig` if validation fails.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigIo` if the file cannot be read, otherwise as
    /// [`WorldManagerConfig::from_toml_str`].
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> WorldResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if serialization fails.
    pub fn to_toml_string(&self) -> WorldResult<String> {
        toml::to_string_pretty(self).map_err(|e| WorldError::InvalidConfig(e.to_string()))
    }

    /// Checks that the values describe a world that can be built.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> WorldResult<()> {
        let invalid = |msg: &str| Err(WorldError::InvalidConfig(msg.to_owned()));

        if self.render_distance < 0 {
            return invalid("render_distance must be >= 0");
        }
        if self.chunks_above_surface < 0 {
            return invalid("chunks_above_surface must be >= 0");
        }
        if self.max_depth_levels == 0 {
            return invalid("max_depth_levels must be > 0");
        }
        if self.blocks_per_level == 0 {
            return invalid("blocks_per_level must be > 0");
        }
        if i32::try_from(u64::from(self.max_depth_levels) * u64::from(self.blocks_per_level)).is_err() {
            return invalid("max_depth_levels * blocks_per_level overflows");
        }
        if !(self.block_size.is_finite() && self.block_size > 0.0) {
            return invalid("block_size must be a positive finite number");
        }
        if self.surface_amplitude < 0 {
            return invalid("surface_amplitude must be >= 0");
        }
        if self.surface_base - self.surface_amplitude <= -self.max_depth_blocks() {
            return invalid("surface can reach the bedrock floor");
        }
        Ok(())
    }

    /// Depth of the bedrock floor in blocks.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn max_depth_blocks(&self) -> i32 {
        (self.max_depth_levels.saturating_mul(self.blocks_per_level)) as i32
    }

    /// Terrain parameters derived from this configuration.
    #[must_use]
    pub fn terrain_params(&self) -> TerrainParams {
        TerrainParams {
            max_depth_levels: self.max_depth_levels,
            blocks_per_level: self.blocks_per_level,
            surface_base: self.surface_base,
            surface_amplitude: self.surface_amplitude,
            ..TerrainParams::default()
        }
    }
}
