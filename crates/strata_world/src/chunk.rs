//! # Chunk System
//!
//! World data is organized into fixed-size cubic chunks for:
//! - Memory efficiency (only chunks near the player exist)
//! - Fast streaming (generate/discard on demand)
//! - Bounded meshing cost (one chunk is one mesh)
//!
//! ## Chunk Format
//!
//! Chunks are 16x16x16 blocks. Each block is stored as one byte (its
//! `BlockType` code) in a dense linear array:
//!
//! ```text
//! index = lx + ly * 16 + lz * 16 * 16
//! ```
//!
//! ## Coordinates
//!
//! - block coordinate: integer lattice position of one block
//! - chunk coordinate: `floor(block / CHUNK_SIZE)` per axis
//! - local coordinate: `block.rem_euclid(CHUNK_SIZE)` per axis
//!
//! The mapping block ↔ (chunk, local) is a bijection for every `i32` input.

use std::fmt;
use std::str::FromStr;

use crate::block::BlockType;
use crate::error::WorldError;
use crate::mesh::{build_chunk_mesh, BlockSource, ChunkMesh};

/// Chunk edge length in blocks.
pub const CHUNK_SIZE: usize = 16;

/// `CHUNK_SIZE` as a signed value for coordinate math.
pub const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

/// Total blocks per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// Converts a continuous world position to a block coordinate.
///
/// `floor(position / block_size)`; already-integral block positions map to
/// themselves when `block_size` is 1.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn world_to_block(position: f32, block_size: f32) -> i32 {
    (position / block_size).floor() as i32
}

/// Local coordinate of a block coordinate within its chunk.
#[inline]
#[must_use]
pub const fn local_of(block: i32) -> i32 {
    block.rem_euclid(CHUNK_SIZE_I32)
}

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Y coordinate (in chunks, not blocks).
    pub y: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Converts block coordinates to the owning chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_block(block_x: i32, block_y: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE_I32),
            y: block_y.div_euclid(CHUNK_SIZE_I32),
            z: block_z.div_euclid(CHUNK_SIZE_I32),
        }
    }

    /// Returns the block coordinate of the chunk's minimum corner.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> [i32; 3] {
        [
            self.x * CHUNK_SIZE_I32,
            self.y * CHUNK_SIZE_I32,
            self.z * CHUNK_SIZE_I32,
        ]
    }

    /// Returns the chunk offset by `(dx, dy, dz)` chunks.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The six face-sharing neighbours.
    #[must_use]
    pub const fn face_neighbors(self) -> [Self; 6] {
        [
            self.offset(1, 0, 0),
            self.offset(-1, 0, 0),
            self.offset(0, 1, 0),
            self.offset(0, -1, 0),
            self.offset(0, 0, 1),
            self.offset(0, 0, -1),
        ]
    }

    /// Horizontal squared distance in chunks.
    #[inline]
    #[must_use]
    pub const fn horizontal_distance_sq(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dz * dz
    }
}

/// Composite key form: `"x,y,z"`.
impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl FromStr for ChunkCoord {
    type Err = WorldError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let invalid = || WorldError::InvalidChunkKey { key: key.to_owned() };

        let mut parts = key.split(',').map(|part| part.trim().parse::<i32>());
        let (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        Ok(Self::new(x, y, z))
    }
}

/// A chunk of world data.
///
/// Contains a 16x16x16 grid of blocks, the dirty flag, and the chunk's mesh
/// (owned 1:1, replaced wholesale on rebuild, never patched).
#[derive(Clone)]
pub struct Chunk {
    /// Chunk position in the world.
    pub coord: ChunkCoord,
    /// Block data (indexed as `lx + ly*S + lz*S*S`).
    blocks: Box<[BlockType; CHUNK_VOLUME]>,
    /// Number of solid blocks (quick empty check before meshing).
    solid_count: u32,
    /// Mesh built from a past snapshot of `blocks`, if it had any faces.
    mesh: Option<ChunkMesh>,
    /// Set when `mesh` no longer reflects `blocks`.
    dirty: bool,
}

impl Chunk {
    /// Creates a new all-air chunk at the given coordinates.
    ///
    /// New chunks start dirty: they have never been meshed.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: Box::new([BlockType::Air; CHUNK_VOLUME]),
            solid_count: 0,
            mesh: None,
            dirty: true,
        }
    }

    /// Creates a chunk with every block set to `block`.
    #[must_use]
    pub fn filled(coord: ChunkCoord, block: BlockType) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let full = CHUNK_VOLUME as u32;
        Self {
            coord,
            blocks: Box::new([block; CHUNK_VOLUME]),
            solid_count: if block.is_solid() { full } else { 0 },
            mesh: None,
            dirty: true,
        }
    }

    /// Linear index of a local position. Callers must bounds-check.
    #[inline]
    #[must_use]
    pub const fn index(lx: usize, ly: usize, lz: usize) -> usize {
        lx + ly * CHUNK_SIZE + lz * CHUNK_SIZE * CHUNK_SIZE
    }

    /// Inverse of [`Chunk::index`].
    #[inline]
    #[must_use]
    pub const fn local_from_index(index: usize) -> (usize, usize, usize) {
        (
            index % CHUNK_SIZE,
            (index / CHUNK_SIZE) % CHUNK_SIZE,
            index / (CHUNK_SIZE * CHUNK_SIZE),
        )
    }

    #[inline]
    fn checked_index(lx: i32, ly: i32, lz: i32) -> Option<usize> {
        let range = 0..CHUNK_SIZE_I32;
        if range.contains(&lx) && range.contains(&ly) && range.contains(&lz) {
            Some(Self::index(lx as usize, ly as usize, lz as usize))
        } else {
            None
        }
    }

    /// Gets a block at local coordinates. Out of range gives air.
    #[inline]
    #[must_use]
    pub fn get_block(&self, lx: i32, ly: i32, lz: i32) -> BlockType {
        Self::checked_index(lx, ly, lz).map_or(BlockType::Air, |idx| self.blocks[idx])
    }

    /// Sets a block at local coordinates and marks the chunk dirty.
    ///
    /// Out of range writes are ignored.
    #[inline]
    pub fn set_block(&mut self, lx: i32, ly: i32, lz: i32, block: BlockType) {
        let Some(idx) = Self::checked_index(lx, ly, lz) else {
            return;
        };

        let old = self.blocks[idx];
        match (old.is_solid(), block.is_solid()) {
            (true, false) => self.solid_count -= 1,
            (false, true) => self.solid_count += 1,
            _ => {}
        }

        self.blocks[idx] = block;
        self.dirty = true;
    }

    /// Raw block array in index order.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[BlockType] {
        self.blocks.as_slice()
    }

    /// Block array as bytes (one code per block).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.blocks.as_slice())
    }

    /// Number of solid blocks.
    #[inline]
    #[must_use]
    pub const fn solid_count(&self) -> u32 {
        self.solid_count
    }

    /// Returns true if the chunk has no solid blocks.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.solid_count == 0
    }

    /// Returns true if the mesh needs rebuilding.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags the mesh as stale (e.g. a neighbour's boundary changed).
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Current mesh, if the last rebuild emitted any faces.
    #[inline]
    #[must_use]
    pub const fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// Builds a mesh from the current blocks without installing it.
    ///
    /// `neighbors` resolves blocks outside this chunk by world coordinate.
    #[must_use]
    pub fn build_mesh<S: BlockSource + ?Sized>(&self, neighbors: &S, block_size: f32) -> Option<ChunkMesh> {
        build_chunk_mesh(self, neighbors, block_size)
    }

    /// Installs `mesh` and marks the chunk clean.
    ///
    /// Returns the previous mesh so the caller can release it (and detach it
    /// from any scene) before the new one is used.
    pub fn replace_mesh(&mut self, mesh: Option<ChunkMesh>) -> Option<ChunkMesh> {
        let previous = self.mesh.take();
        self.mesh = mesh;
        self.dirty = false;
        previous
    }

    /// Discards any previous mesh and rebuilds from the current blocks.
    ///
    /// Returns the number of faces in the new mesh (0 means no mesh).
    pub fn rebuild_mesh<S: BlockSource + ?Sized>(&mut self, neighbors: &S, block_size: f32) -> usize {
        drop(self.mesh.take());
        let mesh = self.build_mesh(neighbors, block_size);
        let faces = mesh.as_ref().map_or(0, ChunkMesh::face_count);
        self.replace_mesh(mesh);
        faces
    }

    /// Removes the mesh for disposal.
    #[inline]
    pub fn take_mesh(&mut self) -> Option<ChunkMesh> {
        self.mesh.take()
    }
}
