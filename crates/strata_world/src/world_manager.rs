//! # World Manager
//!
//! Streams chunks around the player and owns every loaded chunk.
//!
//! ## Update Loop
//!
//! Each [`WorldManager::update`] call:
//!
//! 1. Computes the needed set: a cylinder of `render_distance` chunks around
//!    the player, spanning a fixed vertical band from the bedrock chunk to
//!    `chunks_above_surface` above the highest possible surface chunk.
//! 2. Generates missing chunks, closest first, within the generation budget.
//!    Each new chunk dirties its loaded face neighbours (their border faces
//!    may now be culled).
//! 3. Unloads chunks outside the needed set, releasing meshes first. Loaded
//!    face neighbours of an unloaded chunk are dirtied so their border faces
//!    reopen.
//! 4. Rebuilds dirty meshes in FIFO order within the rebuild budget.
//!
//! Work over budget is deferred; the call returns `false` until nothing is
//! pending. With no cap the call always completes.
//!
//! ## Ownership
//!
//! Chunks never leave the manager. Callers pass block or chunk coordinates and
//! re-resolve each time; a chunk reference is only valid for one call.
//!
//! ## Unloaded Space
//!
//! Reads from chunks that are not loaded return air. Writes to them are
//! dropped and `set_block` returns `false`. Callers that must write ahead of
//! streaming (e.g. placing a pad in a freshly revealed column) call
//! [`WorldManager::ensure_chunk`] first.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, info, trace};

use crate::block::BlockType;
use crate::chunk::{local_of, world_to_block, Chunk, ChunkCoord, CHUNK_SIZE_I32};
use crate::config::WorldManagerConfig;
use crate::error::WorldResult;
use crate::mesh::{BlockSource, ChunkMesh};
use crate::noise::WorldSeed;
use crate::terrain::TerrainGenerator;

/// Per-call work limits. `None` means unlimited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateBudget {
    /// Maximum chunks generated this call.
    pub generation: Option<usize>,
    /// Maximum meshes rebuilt this call.
    pub rebuilds: Option<usize>,
}

impl UpdateBudget {
    /// No limits on either workload.
    pub const UNLIMITED: Self = Self { generation: None, rebuilds: None };

    /// Same cap for both workloads.
    #[must_use]
    pub const fn shared(max: usize) -> Self {
        Self { generation: Some(max), rebuilds: Some(max) }
    }
}

/// Lifecycle state of a chunk coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkState {
    /// Not loaded.
    Absent,
    /// Loaded; mesh missing or stale.
    Dirty,
    /// Loaded; mesh (or lack of one) matches the blocks.
    Clean,
}

/// Scene notifications for the host renderer, in the order they happened.
///
/// For a given coordinate a `Detached` always precedes the `Attached` of its
/// replacement. Once `Detached` is reported the host must drop any handle to
/// that mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshEvent {
    /// A new mesh is available via `chunk_mesh(coord)`.
    Attached(ChunkCoord),
    /// The previous mesh of `coord` was released.
    Detached(ChunkCoord),
}

/// Session statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks generated since the manager was created.
    pub generated_this_session: u64,
    /// Chunks unloaded since the manager was created.
    pub unloaded_this_session: u64,
    /// Meshes rebuilt since the manager was created.
    pub rebuilt_this_session: u64,
    /// Chunks generated by the last update.
    pub last_generated: usize,
    /// Chunks unloaded by the last update.
    pub last_unloaded: usize,
    /// Meshes rebuilt by the last update.
    pub last_rebuilt: usize,
    /// Needed chunks the last update left ungenerated.
    pub last_pending_generation: usize,
}

/// Streams and owns the voxel world.
///
/// Mesh changes are reported as [`MeshEvent`]s, which queue until the host
/// drains them with [`WorldManager::take_mesh_events`]. The host should drain
/// once per frame. An undrained `Attached` is dropped together with its
/// `Detached` when the mesh is released, so the queue holds at most one
/// `Attached` per loaded chunk plus the detaches of meshes the host has seen.
pub struct WorldManager {
    seed: WorldSeed,
    config: WorldManagerConfig,
    generator: TerrainGenerator,
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Every loaded dirty chunk, exactly once, oldest first.
    dirty_queue: VecDeque<ChunkCoord>,
    mesh_events: Vec<MeshEvent>,
    stats: WorldStats,
}

impl WorldManager {
    /// Creates an empty world.
    #[must_use]
    pub fn new(seed: WorldSeed, config: WorldManagerConfig) -> Self {
        let generator = TerrainGenerator::new(seed, config.terrain_params());

        info!(
            seed = seed.value(),
            render_distance = config.render_distance,
            max_depth_blocks = config.max_depth_blocks(),
            "world manager created"
        );

        Self {
            seed,
            config,
            generator,
            chunks: HashMap::new(),
            dirty_queue: VecDeque::new(),
            mesh_events: Vec::new(),
            stats: WorldStats::default(),
        }
    }

    /// Creates an empty world with production settings.
    #[must_use]
    pub fn with_seed(seed: WorldSeed) -> Self {
        Self::new(seed, WorldManagerConfig::production())
    }

    /// Creates an empty world after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn try_new(seed: WorldSeed, config: WorldManagerConfig) -> WorldResult<Self> {
        config.validate()?;
        Ok(Self::new(seed, config))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The world seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// The active configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &WorldManagerConfig {
        &self.config
    }

    /// The terrain generator.
    #[inline]
    #[must_use]
    pub const fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Session statistics.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> WorldStats {
        self.stats
    }

    /// Number of loaded chunks.
    #[inline]
    #[must_use]
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of loaded chunks waiting for a mesh rebuild.
    #[inline]
    #[must_use]
    pub fn dirty_chunk_count(&self) -> usize {
        self.dirty_queue.len()
    }

    /// A loaded chunk.
    #[inline]
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// The current mesh of a loaded chunk.
    #[inline]
    #[must_use]
    pub fn chunk_mesh(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.chunks.get(&coord).and_then(Chunk::mesh)
    }

    /// Lifecycle state of `coord`.
    #[must_use]
    pub fn chunk_state(&self, coord: ChunkCoord) -> ChunkState {
        match self.chunks.get(&coord) {
            None => ChunkState::Absent,
            Some(chunk) if chunk.is_dirty() => ChunkState::Dirty,
            Some(_) => ChunkState::Clean,
        }
    }

    /// Iterator over loaded chunk coordinates (arbitrary order).
    pub fn loaded_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Drains pending scene notifications.
    pub fn take_mesh_events(&mut self) -> Vec<MeshEvent> {
        std::mem::take(&mut self.mesh_events)
    }

    // =========================================================================
    // Coordinates
    // =========================================================================

    /// Converts a world position to a block coordinate.
    #[inline]
    #[must_use]
    pub fn world_to_block(&self, position: f32) -> i32 {
        world_to_block(position, self.config.block_size)
    }

    /// Chunk containing a world position.
    #[must_use]
    pub fn chunk_at_position(&self, x: f32, y: f32, z: f32) -> ChunkCoord {
        ChunkCoord::from_block(self.world_to_block(x), self.world_to_block(y), self.world_to_block(z))
    }

    /// Lowest and highest chunk Y kept loaded.
    #[must_use]
    pub fn vertical_band(&self) -> (i32, i32) {
        let params = self.generator.params();
        let bottom = ChunkCoord::from_block(0, -params.max_depth_blocks(), 0).y;
        let top = ChunkCoord::from_block(0, params.max_surface_height(), 0).y
            + self.config.chunks_above_surface;
        (bottom, top)
    }

    /// Chunks that should be loaded for a player at `(x, y, z)`, closest first.
    ///
    /// The vertical band does not depend on `y`; only the horizontal position
    /// selects columns. `y` breaks ties in the ordering.
    #[must_use]
    pub fn needed_chunks(&self, x: f32, y: f32, z: f32) -> Vec<ChunkCoord> {
        let center = self.chunk_at_position(x, y, z);
        let radius = self.config.render_distance.max(0);
        let radius_sq = i64::from(radius) * i64::from(radius);
        let (bottom, top) = self.vertical_band();

        let mut needed = Vec::new();
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if i64::from(dx) * i64::from(dx) + i64::from(dz) * i64::from(dz) > radius_sq {
                    continue;
                }
                for cy in bottom..=top {
                    needed.push(ChunkCoord::new(center.x + dx, cy, center.z + dz));
                }
            }
        }

        needed.sort_by_key(|c| (c.horizontal_distance_sq(center), (c.y - center.y).abs(), *c));
        needed
    }

    // =========================================================================
    // Streaming
    // =========================================================================

    /// Advances streaming for a player at `(x, y, z)`.
    ///
    /// `max_chunks_per_frame` caps both generation and rebuilds. `None` lifts
    /// both caps, so the call finishes all pending work and returns `true`.
    ///
    /// Returns `true` once nothing is left to generate or rebuild.
    pub fn update(&mut self, x: f32, y: f32, z: f32, max_chunks_per_frame: Option<usize>) -> bool {
        let budget = max_chunks_per_frame.map_or(UpdateBudget::UNLIMITED, UpdateBudget::shared);
        self.update_with_budget(x, y, z, budget)
    }

    /// Per-frame budget from the configuration: unlimited generation, rebuilds
    /// capped at `max_rebuilds_per_update`. Pass to
    /// [`WorldManager::update_with_budget`].
    #[must_use]
    pub const fn frame_budget(&self) -> UpdateBudget {
        UpdateBudget { generation: None, rebuilds: Some(self.config.max_rebuilds_per_update) }
    }

    /// [`WorldManager::update`] with independent generation/rebuild budgets.
    pub fn update_with_budget(&mut self, x: f32, y: f32, z: f32, budget: UpdateBudget) -> bool {
        let needed = self.needed_chunks(x, y, z);

        let (generated, pending_generation) = self.admit(&needed, budget.generation);
        let unloaded = self.unload_outside(&needed);
        let rebuilt = self.rebuild_dirty(budget.rebuilds);

        self.stats.last_generated = generated;
        self.stats.last_unloaded = unloaded;
        self.stats.last_rebuilt = rebuilt;
        self.stats.last_pending_generation = pending_generation;

        let done = pending_generation == 0 && self.dirty_queue.is_empty();

        if generated + unloaded + rebuilt > 0 {
            debug!(
                generated,
                unloaded,
                rebuilt,
                pending_generation,
                dirty = self.dirty_queue.len(),
                loaded = self.chunks.len(),
                "world update"
            );
        }

        done
    }

    /// Generates and unloads until the needed set matches, without meshing.
    ///
    /// Returns the number of chunks generated.
    pub fn ensure_loaded_around(&mut self, x: f32, y: f32, z: f32) -> usize {
        let needed = self.needed_chunks(x, y, z);
        let (generated, _) = self.admit(&needed, None);
        self.unload_outside(&needed);
        generated
    }

    /// Runs a full update with no limits. Always completes.
    pub fn flush(&mut self, x: f32, y: f32, z: f32) -> bool {
        self.update_with_budget(x, y, z, UpdateBudget::UNLIMITED)
    }

    /// Loads `coord` now if it is not loaded.
    ///
    /// The chunk is still subject to unloading by the next `update` if it is
    /// outside the needed set. Returns `true` if it was generated.
    pub fn ensure_chunk(&mut self, coord: ChunkCoord) -> bool {
        if self.chunks.contains_key(&coord) {
            return false;
        }
        self.generate_chunk(coord);
        true
    }

    fn admit(&mut self, needed: &[ChunkCoord], budget: Option<usize>) -> (usize, usize) {
        let limit = budget.unwrap_or(usize::MAX);
        let mut generated = 0;
        let mut pending = 0;

        for &coord in needed {
            if self.chunks.contains_key(&coord) {
                continue;
            }
            if generated >= limit {
                pending += 1;
                continue;
            }
            self.generate_chunk(coord);
            generated += 1;
        }

        (generated, pending)
    }

    fn generate_chunk(&mut self, coord: ChunkCoord) {
        let chunk = self.generator.generate(coord);
        trace!(%coord, solid = chunk.solid_count(), "chunk generated");

        self.chunks.insert(coord, chunk);
        self.dirty_queue.push_back(coord);
        self.stats.generated_this_session += 1;

        for neighbor in coord.face_neighbors() {
            self.mark_dirty(neighbor);
        }
    }

    fn unload_outside(&mut self, needed: &[ChunkCoord]) -> usize {
        let keep: HashSet<ChunkCoord> = needed.iter().copied().collect();
        let mut doomed: Vec<ChunkCoord> = self.chunks.keys().filter(|c| !keep.contains(c)).copied().collect();
        doomed.sort_unstable();

        for &coord in &doomed {
            self.unload_chunk(coord);
        }
        doomed.len()
    }

    fn unload_chunk(&mut self, coord: ChunkCoord) {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return;
        };

        let had_mesh = chunk.take_mesh().is_some();
        if chunk.is_dirty() {
            self.dirty_queue.retain(|c| *c != coord);
        }
        if had_mesh {
            self.push_detached(coord);
        }

        self.chunks.remove(&coord);
        self.stats.unloaded_this_session += 1;
        trace!(%coord, "chunk unloaded");

        for neighbor in coord.face_neighbors() {
            self.mark_dirty(neighbor);
        }
    }

    /// Records that the mesh of `coord` was released. If the host has not yet
    /// seen its `Attached`, both events are dropped.
    fn push_detached(&mut self, coord: ChunkCoord) {
        let attached = MeshEvent::Attached(coord);
        match self.mesh_events.iter().rposition(|e| *e == attached) {
            Some(pos) => {
                self.mesh_events.remove(pos);
            }
            None => self.mesh_events.push(MeshEvent::Detached(coord)),
        }
    }

    fn mark_dirty(&mut self, coord: ChunkCoord) {
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            if !chunk.is_dirty() {
                chunk.mark_dirty();
                self.dirty_queue.push_back(coord);
            }
        }
    }

    fn rebuild_dirty(&mut self, budget: Option<usize>) -> usize {
        let limit = budget.unwrap_or(usize::MAX);
        let mut rebuilt = 0;

        while rebuilt < limit {
            let Some(coord) = self.dirty_queue.pop_front() else {
                break;
            };
            if self.rebuild_chunk(coord) {
                rebuilt += 1;
            }
        }

        rebuilt
    }

    /// Rebuilds one chunk's mesh. Releases the old mesh before installing the
    /// new one.
    fn rebuild_chunk(&mut self, coord: ChunkCoord) -> bool {
        let block_size = self.config.block_size;
        let mesh = match self.chunks.get(&coord) {
            Some(chunk) if chunk.is_dirty() => chunk.build_mesh(self, block_size),
            _ => return false,
        };

        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };

        let had_mesh = chunk.take_mesh().is_some();
        let faces = mesh.as_ref().map_or(0, ChunkMesh::face_count);
        let attached = mesh.is_some();
        chunk.replace_mesh(mesh);

        if had_mesh {
            self.push_detached(coord);
        }
        if attached {
            self.mesh_events.push(MeshEvent::Attached(coord));
        }

        self.stats.rebuilt_this_session += 1;
        trace!(%coord, faces, "chunk mesh rebuilt");
        true
    }

    // =========================================================================
    // Block queries
    // =========================================================================

    /// Block at a world block coordinate. Air if the chunk is not loaded.
    #[must_use]
    pub fn get_block(&self, bx: i32, by: i32, bz: i32) -> BlockType {
        self.chunks
            .get(&ChunkCoord::from_block(bx, by, bz))
            .map_or(BlockType::Air, |chunk| chunk.get_block(local_of(bx), local_of(by), local_of(bz)))
    }

    /// Writes a block and dirties the owning chunk and any face neighbour
    /// sharing the edited border.
    ///
    /// Returns `false` (and changes nothing) if the chunk is not loaded.
    pub fn set_block(&mut self, bx: i32, by: i32, bz: i32, block: BlockType) -> bool {
        let coord = ChunkCoord::from_block(bx, by, bz);
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            trace!(bx, by, bz, ?block, "write to unloaded chunk dropped");
            return false;
        };

        let (lx, ly, lz) = (local_of(bx), local_of(by), local_of(bz));
        let was_dirty = chunk.is_dirty();
        chunk.set_block(lx, ly, lz, block);
        if !was_dirty {
            self.dirty_queue.push_back(coord);
        }

        let last = CHUNK_SIZE_I32 - 1;
        for (local, axis) in [(lx, 0), (ly, 1), (lz, 2)] {
            let step = if local == 0 {
                -1
            } else if local == last {
                1
            } else {
                continue;
            };
            let mut delta = [0; 3];
            delta[axis] = step;
            self.mark_dirty(coord.offset(delta[0], delta[1], delta[2]));
        }

        true
    }

    /// Returns true if the block collides.
    #[must_use]
    pub fn is_solid(&self, bx: i32, by: i32, bz: i32) -> bool {
        self.get_block(bx, by, bz).is_solid()
    }

    /// Returns true if the block is a ladder.
    #[must_use]
    pub fn is_ladder(&self, bx: i32, by: i32, bz: i32) -> bool {
        self.get_block(bx, by, bz) == BlockType::Ladder
    }

    /// [`WorldManager::get_block`] at a world position.
    #[must_use]
    pub fn block_at_position(&self, x: f32, y: f32, z: f32) -> BlockType {
        self.get_block(self.world_to_block(x), self.world_to_block(y), self.world_to_block(z))
    }

    /// [`WorldManager::set_block`] at a world position.
    pub fn set_block_at_position(&mut self, x: f32, y: f32, z: f32, block: BlockType) -> bool {
        let (bx, by, bz) = (self.world_to_block(x), self.world_to_block(y), self.world_to_block(z));
        self.set_block(bx, by, bz, block)
    }

    /// [`WorldManager::is_solid`] at a world position.
    #[must_use]
    pub fn is_solid_at_position(&self, x: f32, y: f32, z: f32) -> bool {
        self.block_at_position(x, y, z).is_solid()
    }

    /// [`WorldManager::is_ladder`] at a world position.
    #[must_use]
    pub fn is_ladder_at_position(&self, x: f32, y: f32, z: f32) -> bool {
        self.block_at_position(x, y, z) == BlockType::Ladder
    }
}

impl BlockSource for WorldManager {
    #[inline]
    fn block_at(&self, bx: i32, by: i32, bz: i32) -> BlockType {
        self.get_block(bx, by, bz)
    }
}
