//! # Terrain Quality Integration Test
//!
//! Generated terrain obeys the layer, floor and ore rules for many seeds, and
//! the shipped config file loads.

use strata_world::{
    noise2d, noise3d, ore_for_block, BlockType, Chunk, ChunkCoord, SeededRng, TerrainGenerator,
    TerrainParams, WorldManager, WorldManagerConfig, WorldSeed, CHUNK_SIZE, ORE_TABLE,
};

const SEEDS: [u32; 5] = [0, 1, 42, 12345, u32::MAX];

/// Test: the floor is bedrock for every seed and column.
#[test]
fn test_depth_floor_for_all_seeds() {
    for seed in SEEDS {
        let gen = TerrainGenerator::new(WorldSeed::new(seed), TerrainParams::default());
        let floor = -gen.params().max_depth_blocks();
        for bx in (-64..64).step_by(9) {
            for bz in (-64..64).step_by(13) {
                for by in [floor, floor - 1, floor - 17] {
                    assert_eq!(gen.block_at(bx, by, bz), BlockType::Bedrock, "seed {seed} at ({bx},{by},{bz})");
                }
            }
        }
    }
}

/// Test: generated chunks match per-block sampling exactly.
#[test]
fn test_chunk_matches_block_sampling() {
    let gen = TerrainGenerator::new(WorldSeed::new(42), TerrainParams::default());
    let coord = ChunkCoord::new(-1, 0, 2);
    let chunk = gen.generate(coord);
    let [ox, oy, oz] = coord.origin();

    for (idx, block) in chunk.blocks().iter().enumerate() {
        let (lx, ly, lz) = Chunk::local_from_index(idx);
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        let expected = gen.block_at(ox + lx as i32, oy + ly as i32, oz + lz as i32);
        assert_eq!(*block, expected);
    }
}

/// Test: ores only appear inside their depth band and lower tiers win overlaps.
#[test]
fn test_ore_placement_rules() {
    let gen = TerrainGenerator::new(WorldSeed::new(7), TerrainParams::default());
    let mut counts = [0usize; 8];

    for cy in -12..0 {
        for cx in 0..2 {
            let chunk = gen.generate(ChunkCoord::new(cx, cy, 0));
            let [ox, oy, oz] = chunk.coord.origin();

            for (idx, block) in chunk.blocks().iter().enumerate() {
                let Some(ore) = ore_for_block(*block) else { continue };
                let (lx, ly, lz) = Chunk::local_from_index(idx);
                #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
                let (bx, by, bz) = (ox + lx as i32, oy + ly as i32, oz + lz as i32);
                let level = gen.depth_level(by);

                assert!(ore.in_band(level));
                counts[usize::from(ore.tier.index())] += 1;

                // No lower tier could also have matched here.
                for lower in ORE_TABLE.iter().take_while(|o| o.tier < ore.tier) {
                    assert!(!lower.matches(level, gen.ore_sample(lower, bx, by, bz)));
                }
            }
        }
    }

    println!("Ore counts by tier: {counts:?}");
    assert!(counts[0] > 0, "red ore should appear in its band");
}

/// Test: the world manager and a bare generator agree on fresh terrain.
#[test]
fn test_world_uses_configured_terrain() {
    let config = WorldManagerConfig::test();
    let mut world = WorldManager::new(WorldSeed::new(42), config.clone());
    world.flush(0.0, 0.0, 0.0);

    let gen = TerrainGenerator::new(WorldSeed::new(42), config.terrain_params());
    for by in -32..32 {
        assert_eq!(world.get_block(3, by, 4), gen.block_at(3, by, 4), "mismatch at y={by}");
    }
}

/// Test: noise stays in range and is reproducible.
#[test]
fn test_noise_contract() {
    let seed = WorldSeed::new(42);
    for i in 0..500 {
        let x = f64::from(i) * 0.37 - 90.0;
        let y = f64::from(i) * -0.21 + 4.0;
        let a = noise2d(x, y, seed);
        let b = noise3d(x, y, x * y * 0.01, seed);
        assert!((0.0..=1.0).contains(&a));
        assert!((0.0..=1.0).contains(&b));
        assert_eq!(a, noise2d(x, y, seed));
    }
}

/// Test: the seeded RNG is reproducible.
#[test]
fn test_seeded_rng_reproducible() {
    let mut a = SeededRng::new(2024);
    let mut b = SeededRng::new(2024);
    let rolls_a: Vec<i32> = (0..64).map(|_| a.next_int(1, 100)).collect();
    let rolls_b: Vec<i32> = (0..64).map(|_| b.next_int(1, 100)).collect();
    assert_eq!(rolls_a, rolls_b);
    assert!(rolls_a.iter().all(|r| (1..=100).contains(r)));
}

/// Test: the reference config file parses and validates.
#[test]
fn test_reference_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/world.toml");
    let config = WorldManagerConfig::from_toml_file(path).unwrap();
    assert_eq!(config, WorldManagerConfig::production());
    assert_eq!(config.max_depth_blocks(), 200);

    let world = WorldManager::try_new(WorldSeed::new(1), config).unwrap();
    let (bottom, _) = world.vertical_band();
    #[allow(clippy::cast_possible_wrap)]
    let expected_bottom = (-200i32).div_euclid(CHUNK_SIZE as i32);
    assert_eq!(bottom, expected_bottom);
}
