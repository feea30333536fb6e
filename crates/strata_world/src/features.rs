//! # World Features
//!
//! Gameplay placements built on top of the block write API: teleport pads and
//! protected zones (NPC areas kept clear of terrain).
//!
//! Both load the chunks they touch before writing. Writes to unloaded chunks
//! are dropped by the world manager, and these run at times (world start,
//! right after a teleport) when streaming may not have reached the target.

use crate::block::BlockType;
use crate::chunk::ChunkCoord;
use crate::world_manager::WorldManager;

/// Places a teleport pad on top of the column at `(bx, bz)`.
///
/// The pad replaces the highest solid block at or below the generated
/// surface, so it still lands on the ground if the surface was dug out.
/// Returns the pad's block coordinate.
pub fn place_teleport_pad(world: &mut WorldManager, bx: i32, bz: i32) -> [i32; 3] {
    let floor = -world.generator().params().max_depth_blocks();
    let mut by = world.generator().surface_height(bx, bz);

    loop {
        world.ensure_chunk(ChunkCoord::from_block(bx, by, bz));
        if by <= floor || world.is_solid(bx, by, bz) {
            break;
        }
        by -= 1;
    }

    world.set_block(bx, by, bz, BlockType::TeleportPad);
    tracing::debug!(bx, by, bz, "teleport pad placed");
    [bx, by, bz]
}

/// A vertical cylinder of air with a stone floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProtectedZone {
    /// Floor centre; the lowest air layer is `center[1]`.
    pub center: [i32; 3],
    /// Horizontal radius in blocks.
    pub radius: i32,
    /// Air layers above the floor.
    pub height: i32,
}

impl ProtectedZone {
    /// Creates a zone.
    #[must_use]
    pub const fn new(center: [i32; 3], radius: i32, height: i32) -> Self {
        Self { center, radius, height }
    }

    fn in_footprint(&self, bx: i32, bz: i32) -> bool {
        let dx = i64::from(bx - self.center[0]);
        let dz = i64::from(bz - self.center[2]);
        let r = i64::from(self.radius);
        dx * dx + dz * dz <= r * r
    }

    /// Returns true if the block is inside the cleared volume.
    #[must_use]
    pub fn contains(&self, bx: i32, by: i32, bz: i32) -> bool {
        (self.center[1]..self.center[1] + self.height).contains(&by) && self.in_footprint(bx, bz)
    }

    /// Clears the zone to air and lays a stone floor under it.
    ///
    /// Returns the number of blocks written.
    pub fn carve(&self, world: &mut WorldManager) -> usize {
        let [cx, cy, cz] = self.center;
        let r = self.radius.max(0);
        let floor_y = cy - 1;
        let top_y = cy + self.height.max(0) - 1;

        let low = ChunkCoord::from_block(cx - r, floor_y, cz - r);
        let high = ChunkCoord::from_block(cx + r, top_y.max(floor_y), cz + r);
        for x in low.x..=high.x {
            for y in low.y..=high.y {
                for z in low.z..=high.z {
                    world.ensure_chunk(ChunkCoord::new(x, y, z));
                }
            }
        }

        let mut written = 0;
        for bz in cz - r..=cz + r {
            for bx in cx - r..=cx + r {
                if !self.in_footprint(bx, bz) {
                    continue;
                }
                if world.set_block(bx, floor_y, bz, BlockType::Stone) {
                    written += 1;
                }
                for by in cy..=top_y {
                    if world.set_block(bx, by, bz, BlockType::Air) {
                        written += 1;
                    }
                }
            }
        }

        tracing::debug!(center = ?self.center, r, written, "protected zone carved");
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldManagerConfig;
    use crate::noise::WorldSeed;

    fn world() -> WorldManager {
        WorldManager::new(WorldSeed::new(42), WorldManagerConfig::test())
    }

    #[test]
    fn test_pad_lands_in_unloaded_column() {
        let mut world = world();
        assert_eq!(world.loaded_chunk_count(), 0);

        let [bx, by, bz] = place_teleport_pad(&mut world, 300, -300);
        assert_eq!((bx, bz), (300, -300));
        assert_eq!(by, world.generator().surface_height(300, -300));
        assert_eq!(world.get_block(bx, by, bz), BlockType::TeleportPad);
        assert_eq!(world.get_block(bx, by + 1, bz), BlockType::Air);
    }

    #[test]
    fn test_pad_follows_dug_surface() {
        let mut world = world();
        let surface = world.generator().surface_height(3, 3);
        for by in surface - 2..=surface {
            world.ensure_chunk(ChunkCoord::from_block(3, by, 3));
        }
        world.set_block(3, surface, 3, BlockType::Air);
        world.set_block(3, surface - 1, 3, BlockType::Air);

        let pad = place_teleport_pad(&mut world, 3, 3);
        assert_eq!(pad, [3, surface - 2, 3]);
    }

    #[test]
    fn test_zone_contains() {
        let zone = ProtectedZone::new([0, 10, 0], 3, 4);
        assert!(zone.contains(0, 10, 0));
        assert!(zone.contains(3, 13, 0));
        assert!(!zone.contains(3, 14, 0));
        assert!(!zone.contains(0, 9, 0));
        assert!(!zone.contains(3, 10, 3), "corner is outside the cylinder");
    }

    #[test]
    fn test_carve_clears_and_floors() {
        let mut world = world();
        let zone = ProtectedZone::new([5, -6, 5], 2, 3);
        let written = zone.carve(&mut world);

        // 13 columns within radius 2, each 1 floor + 3 air.
        assert_eq!(written, 13 * 4);
        assert_eq!(world.get_block(5, -7, 5), BlockType::Stone);
        for by in -6..-3 {
            assert_eq!(world.get_block(5, by, 5), BlockType::Air);
            assert_eq!(world.get_block(7, by, 5), BlockType::Air);
        }
    }
}
