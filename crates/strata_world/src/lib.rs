//! # STRATA World
//!
//! Voxel world core for a depth-bounded mining game.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same chunk bytes
//! 2. **Chunked**: World is stored and meshed in 16³ chunks
//! 3. **Streamable**: Chunks are generated/discarded around the player
//! 4. **Budgeted**: Generation and meshing are capped per update call
//!
//! ## Core Components
//!
//! - `noise` / `rng`: value noise, fbm and a seeded xoshiro128** generator
//! - `block` / `ore`: static block registry and depth-gated ore table
//! - `chunk` / `mesh`: dense chunk storage and culled-face meshing
//! - `terrain`: column terrain and ore placement
//! - `WorldManager`: streaming, dirty tracking and block queries
//! - `features`: teleport pads and protected zones
//!
//! ## Example
//!
//! ```rust
//! use strata_world::{BlockType, WorldManager, WorldManagerConfig, WorldSeed};
//!
//! let mut world = WorldManager::new(WorldSeed::new(42), WorldManagerConfig::test());
//!
//! // Stream in everything around the origin.
//! while !world.update(0.0, 0.0, 0.0, Some(4)) {}
//!
//! // Bedrock floor is always there.
//! let floor = -world.config().max_depth_blocks();
//! assert_eq!(world.get_block(0, floor, 0), BlockType::Bedrock);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod block;
pub mod chunk;
pub mod config;
pub mod error;
pub mod features;
pub mod mesh;
pub mod noise;
pub mod ore;
pub mod rng;
pub mod terrain;
pub mod world_manager;

pub use block::{BlockDef, BlockType, Emissive, Hardness, Tier, BLOCK_TYPE_COUNT};
pub use chunk::{local_of, world_to_block, Chunk, ChunkCoord, CHUNK_SIZE, CHUNK_VOLUME};
pub use config::WorldManagerConfig;
pub use error::{WorldError, WorldResult};
pub use features::{place_teleport_pad, ProtectedZone};
pub use mesh::{BlockSource, ChunkMesh, ChunkVertex, EmptySpace};
pub use noise::{fbm2d, noise2d, noise3d, WorldSeed};
pub use ore::{ore_for_block, OreDef, ORE_TABLE};
pub use rng::SeededRng;
pub use terrain::{TerrainGenerator, TerrainParams};
pub use world_manager::{ChunkState, MeshEvent, UpdateBudget, WorldManager, WorldStats};
