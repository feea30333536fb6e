//! # Terrain Generation
//!
//! Column-based terrain with depth-gated ores.
//!
//! ## Column Layout (top to bottom)
//!
//! ```text
//!   air          by > surface
//!   grass        by == surface
//!   dirt         surface - subsoil_depth <= by < surface
//!   stone / ore  down to the floor
//!   bedrock      by <= -max_depth_blocks
//! ```
//!
//! Every block is a pure function of `(seed, bx, by, bz)`: a chunk comes out
//! byte-identical regardless of which chunks were generated before it.

use crate::block::BlockType;
use crate::chunk::{Chunk, ChunkCoord, CHUNK_SIZE_I32};
use crate::noise::{fbm2d, noise3d, WorldSeed};
use crate::ore::{self, OreDef, ORE_TABLE};

/// Seed lane spacing between ore tiers.
pub const ORE_SEED_STRIDE: u32 = 1000;

/// Seed lane for the surface heightmap.
const SURFACE_SEED_OFFSET: u32 = 17;

/// Generation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainParams {
    /// Number of depth levels above the bedrock floor.
    pub max_depth_levels: u32,
    /// Blocks per depth level.
    pub blocks_per_level: u32,
    /// Mean surface height (block Y).
    pub surface_base: i32,
    /// Maximum surface deviation from `surface_base`, in blocks.
    pub surface_amplitude: i32,
    /// Dirt layer thickness under the grass.
    pub subsoil_depth: i32,
    /// Heightmap base frequency (per block).
    pub surface_scale: f64,
    /// Heightmap fbm octaves.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave.
    pub gain: f64,
    /// Ore noise frequency (per block).
    pub ore_noise_scale: f64,
    /// Ore definitions, ascending by tier.
    pub ores: &'static [OreDef],
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            max_depth_levels: 50,
            blocks_per_level: 4,
            surface_base: 4,
            surface_amplitude: 4,
            subsoil_depth: 3,
            surface_scale: 0.02,
            octaves: 4,
            lacunarity: 2.0,
            gain: 0.5,
            ore_noise_scale: 0.15,
            ores: &ORE_TABLE,
        }
    }
}

impl TerrainParams {
    /// Depth of the bedrock floor in blocks.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn max_depth_blocks(&self) -> i32 {
        (self.max_depth_levels * self.blocks_per_level) as i32
    }

    /// Highest Y the surface can reach.
    #[inline]
    #[must_use]
    pub const fn max_surface_height(&self) -> i32 {
        self.surface_base + self.surface_amplitude
    }
}

/// Terrain and ore generator.
///
/// Stateless apart from its seed and parameters; safe to share and call in
/// any order.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    seed: WorldSeed,
    params: TerrainParams,
}

impl TerrainGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new(seed: WorldSeed, params: TerrainParams) -> Self {
        Self { seed, params }
    }

    /// The world seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// The generation parameters.
    #[inline]
    #[must_use]
    pub const fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Surface height (Y of the grass block) for a column.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn surface_height(&self, bx: i32, bz: i32) -> i32 {
        let p = &self.params;
        let sample = fbm2d(
            f64::from(bx) * p.surface_scale,
            f64::from(bz) * p.surface_scale,
            self.seed.offset(SURFACE_SEED_OFFSET),
            p.octaves,
            p.lacunarity,
            p.gain,
        );
        let deviation = ((sample - 0.5) * 2.0 * f64::from(p.surface_amplitude)).round() as i32;
        p.surface_base + deviation
    }

    /// Depth level of a block row: `max(0, -by) / blocks_per_level`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn depth_level(&self, by: i32) -> u32 {
        let depth = by.saturating_neg().max(0) as u32;
        depth / self.params.blocks_per_level.max(1)
    }

    /// Ore noise sample for `ore` at a block, in `[0, 1]`.
    #[must_use]
    pub fn ore_sample(&self, ore: &OreDef, bx: i32, by: i32, bz: i32) -> f64 {
        let scale = self.params.ore_noise_scale;
        let lane = (u32::from(ore.tier.index()) + 1).wrapping_mul(ORE_SEED_STRIDE);
        noise3d(
            f64::from(bx) * scale,
            f64::from(by) * scale,
            f64::from(bz) * scale,
            self.seed.offset(lane),
        )
    }

    /// First ore in the configured table matching `level`, sampling lazily.
    pub fn select_ore<F>(&self, level: u32, sample: F) -> Option<&'static OreDef>
    where
        F: FnMut(&OreDef) -> f64,
    {
        ore::select_ore(self.params.ores, level, sample)
    }

    /// Generated block at a world block coordinate.
    ///
    /// Ignores edits; this is what the world looks like before anyone digs.
    #[must_use]
    pub fn block_at(&self, bx: i32, by: i32, bz: i32) -> BlockType {
        let surface = self.surface_height(bx, bz);
        self.column_block(bx, by, bz, surface)
    }

    fn column_block(&self, bx: i32, by: i32, bz: i32, surface: i32) -> BlockType {
        if by <= -self.params.max_depth_blocks() {
            return BlockType::Bedrock;
        }
        if by > surface {
            return BlockType::Air;
        }
        if by == surface {
            return BlockType::Grass;
        }
        if by >= surface - self.params.subsoil_depth {
            return BlockType::Dirt;
        }

        let level = self.depth_level(by);
        self.select_ore(level, |ore| self.ore_sample(ore, bx, by, bz))
            .map_or(BlockType::Stone, |ore| ore.block)
    }

    /// Generates a chunk at the given coordinates.
    ///
    /// The result is dirty with no mesh.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord);
        let [ox, oy, oz] = coord.origin();

        // Entirely above the highest possible surface: nothing to do.
        if oy > self.params.max_surface_height() {
            return chunk;
        }

        for lz in 0..CHUNK_SIZE_I32 {
            for lx in 0..CHUNK_SIZE_I32 {
                let bx = ox + lx;
                let bz = oz + lz;
                let surface = self.surface_height(bx, bz);

                for ly in 0..CHUNK_SIZE_I32 {
                    let block = self.column_block(bx, oy + ly, bz, surface);
                    if block != BlockType::Air {
                        chunk.set_block(lx, ly, lz, block);
                    }
                }
            }
        }

        chunk
    }
}
