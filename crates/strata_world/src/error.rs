//! # World Error Types
//!
//! Errors at the edges of the world core: configuration loading and chunk key
//! parsing. Block queries and edits never fail; they resolve to air / no-op.

use thiserror::Error;

/// Errors that can occur while configuring or addressing the world.
#[derive(Error, Debug)]
pub enum WorldError {
    /// Configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file is not valid TOML for `WorldManagerConfig`.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds values the world cannot run with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A composite chunk key was not of the form `x,y,z`.
    #[error("invalid chunk key {key:?}: expected \"x,y,z\"")]
    InvalidChunkKey {
        /// The rejected key text.
        key: String,
    },
}

/// Result type for world configuration and addressing.
pub type WorldResult<T> = Result<T, WorldError>;
