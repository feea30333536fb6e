//! # Ore Table
//!
//! Depth-gated ore definitions, ordered by ascending tier.
//!
//! Generation walks the table in order and the **first** matching entry wins,
//! so a lower tier always takes precedence where depth bands overlap.

use crate::block::{BlockType, Tier};

/// Static ore record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OreDef {
    /// Block placed when this ore matches.
    pub block: BlockType,
    /// Rarity tier (also the noise seed lane).
    pub tier: Tier,
    /// Shallowest depth level (inclusive).
    pub min_depth: u32,
    /// Deepest depth level (inclusive).
    pub max_depth: u32,
    /// Fraction of the noise range that counts as ore, in `(0, 1]`.
    pub rarity: f64,
    /// Intended vein size range. Carried for content tooling; per-block
    /// sampling does not enforce it.
    pub cluster_size: (u8, u8),
    /// Sell value per block.
    pub sell_value: u32,
}

impl OreDef {
    /// Noise value a sample must exceed: `1 - rarity`.
    #[inline]
    #[must_use]
    pub fn threshold(&self) -> f64 {
        1.0 - self.rarity
    }

    /// Returns true if `level` is inside this ore's depth band.
    #[inline]
    #[must_use]
    pub const fn in_band(&self, level: u32) -> bool {
        level >= self.min_depth && level <= self.max_depth
    }

    /// Returns true if this ore should be placed for the given depth level and
    /// noise sample.
    #[inline]
    #[must_use]
    pub fn matches(&self, level: u32, sample: f64) -> bool {
        self.in_band(level) && sample > self.threshold()
    }
}

/// Default ore table, ascending by tier.
pub static ORE_TABLE: [OreDef; 8] = [
    OreDef {
        block: BlockType::RedOre,
        tier: Tier::Red,
        min_depth: 1,
        max_depth: 14,
        rarity: 0.16,
        cluster_size: (3, 8),
        sell_value: 5,
    },
    OreDef {
        block: BlockType::OrangeOre,
        tier: Tier::Orange,
        min_depth: 5,
        max_depth: 20,
        rarity: 0.13,
        cluster_size: (3, 7),
        sell_value: 12,
    },
    OreDef {
        block: BlockType::YellowOre,
        tier: Tier::Yellow,
        min_depth: 10,
        max_depth: 26,
        rarity: 0.11,
        cluster_size: (2, 6),
        sell_value: 25,
    },
    OreDef {
        block: BlockType::GreenOre,
        tier: Tier::Green,
        min_depth: 15,
        max_depth: 32,
        rarity: 0.09,
        cluster_size: (2, 6),
        sell_value: 50,
    },
    OreDef {
        block: BlockType::BlueOre,
        tier: Tier::Blue,
        min_depth: 20,
        max_depth: 38,
        rarity: 0.08,
        cluster_size: (2, 5),
        sell_value: 100,
    },
    OreDef {
        block: BlockType::IndigoOre,
        tier: Tier::Indigo,
        min_depth: 26,
        max_depth: 43,
        rarity: 0.07,
        cluster_size: (2, 5),
        sell_value: 200,
    },
    OreDef {
        block: BlockType::VioletOre,
        tier: Tier::Violet,
        min_depth: 32,
        max_depth: 48,
        rarity: 0.06,
        cluster_size: (1, 4),
        sell_value: 400,
    },
    OreDef {
        block: BlockType::PrismaticOre,
        tier: Tier::Prismatic,
        min_depth: 38,
        max_depth: 50,
        rarity: 0.05,
        cluster_size: (1, 3),
        sell_value: 1000,
    },
];

/// Looks up the ore record that places `block`.
#[must_use]
pub fn ore_for_block(block: BlockType) -> Option<&'static OreDef> {
    ORE_TABLE.iter().find(|ore| ore.block == block)
}

/// Picks the first ore in `ores` matching `level`.
///
/// `sample` is called lazily with each candidate whose depth band contains
/// `level`, so noise is only evaluated for ores that could apply.
pub fn select_ore<'a, F>(ores: &'a [OreDef], level: u32, mut sample: F) -> Option<&'a OreDef>
where
    F: FnMut(&OreDef) -> f64,
{
    ores.iter()
        .filter(|ore| ore.in_band(level))
        .find(|ore| sample(*ore) > ore.threshold())
}
