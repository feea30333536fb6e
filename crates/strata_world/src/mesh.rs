//! # Chunk Meshing
//!
//! Culled-face meshing with per-vertex colours.
//!
//! Every solid block emits a quad (4 vertices, 6 indices) for each face whose
//! neighbour is transparent. Neighbours outside the chunk are looked up
//! through a [`BlockSource`], so faces on chunk borders are culled against
//! real world data rather than assumed open.
//!
//! Output is vertex buffer + index buffer, ready for upload via
//! [`ChunkMesh::vertex_bytes`].

use bytemuck::{Pod, Zeroable};

use crate::block::BlockType;
use crate::chunk::{Chunk, CHUNK_SIZE_I32};
use crate::noise::{lattice_hash, WorldSeed};

/// Salt for the per-block colour jitter hash.
const COLOR_SALT: WorldSeed = WorldSeed::new(0x5EED_C010);

/// Maximum colour variation either side of the base colour.
pub const COLOR_VARIATION: f32 = 0.08;

/// Face directions, in the order used by every per-face table.
pub const FACE_NORMALS: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],  // +X
    [-1.0, 0.0, 0.0], // -X
    [0.0, 1.0, 0.0],  // +Y
    [0.0, -1.0, 0.0], // -Y
    [0.0, 0.0, 1.0],  // +Z
    [0.0, 0.0, -1.0], // -Z
];

/// Integer neighbour offset per face.
pub const FACE_OFFSETS: [[i32; 3]; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

/// Unit-cube corners per face, CCW when viewed from outside along the normal.
const FACE_CORNERS: [[[f32; 3]; 4]; 6] = [
    [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
];

/// Read-only block lookup by world block coordinate.
///
/// Meshing uses this to see past the edge of the chunk being meshed.
/// Anything not materialised should read as air.
pub trait BlockSource {
    /// Block at world block coordinate `(bx, by, bz)`.
    fn block_at(&self, bx: i32, by: i32, bz: i32) -> BlockType;
}

/// A block source with nothing in it. Meshes a chunk as if it were alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptySpace;

impl BlockSource for EmptySpace {
    #[inline]
    fn block_at(&self, _bx: i32, _by: i32, _bz: i32) -> BlockType {
        BlockType::Air
    }
}

/// Vertex for chunk meshes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ChunkVertex {
    /// Position in world space (metres).
    pub position: [f32; 3],
    /// Face normal.
    pub normal: [f32; 3],
    /// Linear RGBA.
    pub color: [f32; 4],
}

/// Complete mesh data for a chunk (vertices + indices).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// Vertex buffer data.
    pub vertices: Vec<ChunkVertex>,
    /// Index buffer data.
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Check if mesh is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get triangle count.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get vertex count.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get face (quad) count.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Vertex buffer as raw bytes.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Appends one quad for `block` (world block coordinate).
    fn push_face(&mut self, block: [i32; 3], face: usize, color: [f32; 4], block_size: f32) {
        #[allow(clippy::cast_possible_truncation)]
        let base = self.vertices.len() as u32;
        let normal = FACE_NORMALS[face];

        #[allow(clippy::cast_precision_loss)]
        let origin = block.map(|b| b as f32);

        for corner in FACE_CORNERS[face] {
            self.vertices.push(ChunkVertex {
                position: [
                    (origin[0] + corner[0]) * block_size,
                    (origin[1] + corner[1]) * block_size,
                    (origin[2] + corner[2]) * block_size,
                ],
                normal,
                color,
            });
        }

        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Vertex colour for a block at a world position.
///
/// The base colour scaled by a factor in `[1 - COLOR_VARIATION, 1 + COLOR_VARIATION]`
/// taken from a hash of the position, so neighbouring blocks of the same type
/// are distinguishable and the result is stable across rebuilds.
#[must_use]
pub fn block_color(block: BlockType, bx: i32, by: i32, bz: i32) -> [f32; 4] {
    let hash = lattice_hash(bx, by, bz, COLOR_SALT);
    #[allow(clippy::cast_precision_loss)]
    let unit = (hash >> 8) as f32 / (1u32 << 24) as f32;
    let factor = 1.0 + (unit * 2.0 - 1.0) * COLOR_VARIATION;

    let [r, g, b] = block.def().rgb();
    [
        (r * factor).clamp(0.0, 1.0),
        (g * factor).clamp(0.0, 1.0),
        (b * factor).clamp(0.0, 1.0),
        1.0,
    ]
}

/// Meshes `chunk`, resolving out-of-chunk neighbours through `neighbors`.
///
/// Returns `None` when no face is visible.
#[must_use]
pub fn build_chunk_mesh<S: BlockSource + ?Sized>(
    chunk: &Chunk,
    neighbors: &S,
    block_size: f32,
) -> Option<ChunkMesh> {
    if chunk.is_empty() {
        return None;
    }

    let origin = chunk.coord.origin();
    let blocks = chunk.blocks();
    let mut mesh = ChunkMesh::default();

    for (idx, &block) in blocks.iter().enumerate() {
        if !block.is_solid() {
            continue;
        }

        let (lx, ly, lz) = Chunk::local_from_index(idx);
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        let local = [lx as i32, ly as i32, lz as i32];
        let world = [origin[0] + local[0], origin[1] + local[1], origin[2] + local[2]];
        let color = block_color(block, world[0], world[1], world[2]);

        for (face, offset) in FACE_OFFSETS.iter().enumerate() {
            let n = [local[0] + offset[0], local[1] + offset[1], local[2] + offset[2]];
            let inside = n.iter().all(|c| (0..CHUNK_SIZE_I32).contains(c));

            let neighbor = if inside {
                chunk.get_block(n[0], n[1], n[2])
            } else {
                neighbors.block_at(world[0] + offset[0], world[1] + offset[1], world[2] + offset[2])
            };

            if neighbor.is_transparent() {
                mesh.push_face(world, face, color, block_size);
            }
        }
    }

    if mesh.is_empty() {
        None
    } else {
        Some(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkCoord, CHUNK_SIZE};

    /// Block source that is solid stone everywhere.
    struct SolidSpace;

    impl BlockSource for SolidSpace {
        fn block_at(&self, _bx: i32, _by: i32, _bz: i32) -> BlockType {
            BlockType::Stone
        }
    }

    fn lone_block() -> Chunk {
        let mut chunk = Chunk::new(ChunkCoord::default());
        chunk.set_block(8, 8, 8, BlockType::Stone);
        chunk
    }

    #[test]
    fn test_single_block_mesh() {
        let mesh = build_chunk_mesh(&lone_block(), &EmptySpace, 1.0).unwrap();

        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_empty_chunk_has_no_mesh() {
        let chunk = Chunk::new(ChunkCoord::default());
        assert!(build_chunk_mesh(&chunk, &EmptySpace, 1.0).is_none());
    }

    #[test]
    fn test_full_chunk_surrounded_by_solid_has_no_mesh() {
        let chunk = Chunk::filled(ChunkCoord::default(), BlockType::Stone);
        assert!(build_chunk_mesh(&chunk, &SolidSpace, 1.0).is_none());
    }

    #[test]
    fn test_full_chunk_alone_only_meshes_outer_shell() {
        let chunk = Chunk::filled(ChunkCoord::default(), BlockType::Stone);
        let mesh = build_chunk_mesh(&chunk, &EmptySpace, 1.0).unwrap();
        assert_eq!(mesh.face_count(), 6 * CHUNK_SIZE * CHUNK_SIZE);
    }

    #[test]
    fn test_adjacent_blocks_share_no_face() {
        let mut chunk = lone_block();
        chunk.set_block(9, 8, 8, BlockType::Dirt);
        let mesh = build_chunk_mesh(&chunk, &EmptySpace, 1.0).unwrap();
        assert_eq!(mesh.face_count(), 10);
    }

    #[test]
    fn test_transparent_neighbor_keeps_face() {
        let mut chunk = lone_block();
        chunk.set_block(9, 8, 8, BlockType::Ladder);
        let mesh = build_chunk_mesh(&chunk, &EmptySpace, 1.0).unwrap();
        assert_eq!(mesh.face_count(), 6, "ladder is not solid and does not occlude");
    }

    #[test]
    fn test_boundary_faces_use_block_source() {
        let mut chunk = Chunk::new(ChunkCoord::default());
        chunk.set_block(0, 8, 8, BlockType::Stone);

        let open = build_chunk_mesh(&chunk, &EmptySpace, 1.0).unwrap();
        let closed = build_chunk_mesh(&chunk, &SolidSpace, 1.0).unwrap();
        assert_eq!(open.face_count(), 6);
        // Only the -X face looks out of the chunk.
        assert_eq!(closed.face_count(), 5);
    }

    #[test]
    fn test_quads_wind_counter_clockwise() {
        let mesh = build_chunk_mesh(&lone_block(), &EmptySpace, 1.0).unwrap();

        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize].position);
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let cross = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let n = mesh.vertices[tri[0] as usize].normal;
            let dot = cross[0] * n[0] + cross[1] * n[1] + cross[2] * n[2];
            assert!(dot > 0.0, "triangle {tri:?} winds against its normal");
        }
    }

    #[test]
    fn test_positions_scale_with_block_size() {
        let mut chunk = Chunk::new(ChunkCoord::new(1, 0, 0));
        chunk.set_block(0, 0, 0, BlockType::Stone);
        let mesh = build_chunk_mesh(&chunk, &EmptySpace, 0.5).unwrap();

        let min_x = mesh.vertices.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = mesh.vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!((min_x - 8.0).abs() < 1e-6);
        assert!((max_x - 8.5).abs() < 1e-6);
    }

    #[test]
    fn test_color_variation_is_bounded_and_stable() {
        let [br, ..] = BlockType::Stone.def().rgb();
        for p in -20..20 {
            let c = block_color(BlockType::Stone, p, p * 3, -p);
            assert_eq!(c, block_color(BlockType::Stone, p, p * 3, -p));
            assert!(c[0] >= br * (1.0 - COLOR_VARIATION) - 1e-6);
            assert!(c[0] <= br * (1.0 + COLOR_VARIATION) + 1e-6);
            assert!((c[3] - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_vertex_bytes_length() {
        let mesh = build_chunk_mesh(&lone_block(), &EmptySpace, 1.0).unwrap();
        assert_eq!(mesh.vertex_bytes().len(), 24 * std::mem::size_of::<ChunkVertex>());
        assert_eq!(std::mem::size_of::<ChunkVertex>(), 40);
    }
}
