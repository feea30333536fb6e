//! # Block Registry
//!
//! Static metadata for every block type: colour, collision, culling,
//! mining cost and drops.
//!
//! Block codes are stored one byte per voxel in chunks. They are fixed for
//! the lifetime of the game; a code is never reassigned.

use bytemuck::NoUninit;

/// Number of block types.
pub const BLOCK_TYPE_COUNT: usize = 15;

/// A voxel material code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, NoUninit)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space.
    #[default]
    Air = 0,
    /// Topsoil.
    Grass = 1,
    /// Subsoil.
    Dirt = 2,
    /// Base rock.
    Stone = 3,
    /// Tier 1 ore.
    RedOre = 4,
    /// Tier 2 ore.
    OrangeOre = 5,
    /// Tier 3 ore.
    YellowOre = 6,
    /// Tier 4 ore.
    GreenOre = 7,
    /// Tier 5 ore.
    BlueOre = 8,
    /// Tier 6 ore.
    IndigoOre = 9,
    /// Tier 7 ore.
    VioletOre = 10,
    /// Tier 8 ore.
    PrismaticOre = 11,
    /// Indestructible world floor.
    Bedrock = 12,
    /// Climbable, non-solid.
    Ladder = 13,
    /// Player-placed teleport destination.
    TeleportPad = 14,
}

impl BlockType {
    /// All block types in code order.
    pub const ALL: [Self; BLOCK_TYPE_COUNT] = [
        Self::Air,
        Self::Grass,
        Self::Dirt,
        Self::Stone,
        Self::RedOre,
        Self::OrangeOre,
        Self::YellowOre,
        Self::GreenOre,
        Self::BlueOre,
        Self::IndigoOre,
        Self::VioletOre,
        Self::PrismaticOre,
        Self::Bedrock,
        Self::Ladder,
        Self::TeleportPad,
    ];

    /// Converts from a raw code. Unknown codes give `None`.
    #[inline]
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        if (code as usize) < BLOCK_TYPE_COUNT {
            Some(Self::ALL[code as usize])
        } else {
            None
        }
    }

    /// Returns the raw code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the static definition for this block type.
    #[inline]
    #[must_use]
    pub fn def(self) -> &'static BlockDef {
        &BLOCK_DEFS[self as usize]
    }

    /// Returns true if this is an air block.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Returns true if the block collides and gets meshed.
    #[inline]
    #[must_use]
    pub fn is_solid(self) -> bool {
        self.def().solid
    }

    /// Returns true if neighbouring faces stay visible through this block.
    #[inline]
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.def().transparent
    }

    /// Returns true for the eight ore tiers.
    #[inline]
    #[must_use]
    pub const fn is_ore(self) -> bool {
        matches!(self as u8, 4..=11)
    }
}

/// Rainbow-named progression tier shared by ores, tools and gear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Tier {
    /// Tier 1.
    Red = 0,
    /// Tier 2.
    Orange = 1,
    /// Tier 3.
    Yellow = 2,
    /// Tier 4.
    Green = 3,
    /// Tier 5.
    Blue = 4,
    /// Tier 6.
    Indigo = 5,
    /// Tier 7.
    Violet = 6,
    /// Tier 8.
    Prismatic = 7,
}

impl Tier {
    /// Zero-based ordinal.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Tool tier needed to mine this tier's ore (`index + 1`; 0 means any tool).
    #[inline]
    #[must_use]
    pub const fn required_tool(self) -> u8 {
        self as u8 + 1
    }
}

/// Mining cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hardness {
    /// Breaks after this many hits.
    Hits(u32),
    /// Cannot be broken.
    Infinite,
}

/// Glow parameters for emissive blocks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emissive {
    /// Glow colour (0xRRGGBB).
    pub color: u32,
    /// Glow strength multiplier.
    pub intensity: f32,
}

/// Static per-block metadata.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockDef {
    /// Display name.
    pub name: &'static str,
    /// Base vertex colour (0xRRGGBB).
    pub color: u32,
    /// Collides and gets meshed.
    pub solid: bool,
    /// Faces behind it stay visible.
    pub transparent: bool,
    /// Hits to break.
    pub hardness: Hardness,
    /// Minimum tool tier (0 = any tool).
    pub min_tool_tier: u8,
    /// Item dropped when mined.
    pub drop_item: Option<&'static str>,
    /// Optional glow.
    pub emissive: Option<Emissive>,
}

impl BlockDef {
    /// Returns true if a tool of `tool_tier` can break this block.
    #[must_use]
    pub const fn can_be_mined_with(&self, tool_tier: u8) -> bool {
        match self.hardness {
            Hardness::Infinite => false,
            Hardness::Hits(_) => self.solid && tool_tier >= self.min_tool_tier,
        }
    }

    /// Base colour as linear `[r, g, b]` in `[0, 1]`.
    #[must_use]
    pub fn rgb(&self) -> [f32; 3] {
        let channel = |shift: u32| f32::from(((self.color >> shift) & 0xFF) as u8) / 255.0;
        [channel(16), channel(8), channel(0)]
    }
}

const fn ore(name: &'static str, color: u32, hits: u32, tier: Tier, drop: &'static str) -> BlockDef {
    BlockDef {
        name,
        color,
        solid: true,
        transparent: false,
        hardness: Hardness::Hits(hits),
        min_tool_tier: tier.required_tool(),
        drop_item: Some(drop),
        emissive: None,
    }
}

/// Definitions indexed by block code.
static BLOCK_DEFS: [BlockDef; BLOCK_TYPE_COUNT] = [
    BlockDef {
        name: "air",
        color: 0x00_0000,
        solid: false,
        transparent: true,
        hardness: Hardness::Hits(0),
        min_tool_tier: 0,
        drop_item: None,
        emissive: None,
    },
    BlockDef {
        name: "grass",
        color: 0x4C_A64C,
        solid: true,
        transparent: false,
        hardness: Hardness::Hits(1),
        min_tool_tier: 0,
        drop_item: Some("dirt"),
        emissive: None,
    },
    BlockDef {
        name: "dirt",
        color: 0x8B_5A2B,
        solid: true,
        transparent: false,
        hardness: Hardness::Hits(1),
        min_tool_tier: 0,
        drop_item: Some("dirt"),
        emissive: None,
    },
    BlockDef {
        name: "stone",
        color: 0x80_8080,
        solid: true,
        transparent: false,
        hardness: Hardness::Hits(2),
        min_tool_tier: 0,
        drop_item: Some("stone"),
        emissive: None,
    },
    ore("red_ore", 0xE0_3030, 3, Tier::Red, "red_gem"),
    ore("orange_ore", 0xF0_8A24, 4, Tier::Orange, "orange_gem"),
    ore("yellow_ore", 0xF2_D53C, 5, Tier::Yellow, "yellow_gem"),
    ore("green_ore", 0x3C_C85A, 6, Tier::Green, "green_gem"),
    ore("blue_ore", 0x3A_7BF0, 7, Tier::Blue, "blue_gem"),
    ore("indigo_ore", 0x5B_3CC4, 8, Tier::Indigo, "indigo_gem"),
    ore("violet_ore", 0xA8_4CE0, 10, Tier::Violet, "violet_gem"),
    BlockDef {
        emissive: Some(Emissive { color: 0xFF_FFFF, intensity: 0.6 }),
        ..ore("prismatic_ore", 0xF4_F0FF, 12, Tier::Prismatic, "prismatic_gem")
    },
    BlockDef {
        name: "bedrock",
        color: 0x2A_2A2E,
        solid: true,
        transparent: false,
        hardness: Hardness::Infinite,
        min_tool_tier: u8::MAX,
        drop_item: None,
        emissive: None,
    },
    BlockDef {
        name: "ladder",
        color: 0xA0_7840,
        solid: false,
        transparent: true,
        hardness: Hardness::Hits(1),
        min_tool_tier: 0,
        drop_item: Some("ladder"),
        emissive: None,
    },
    BlockDef {
        name: "teleport_pad",
        color: 0x30_E0E0,
        solid: true,
        transparent: true,
        hardness: Hardness::Hits(2),
        min_tool_tier: 0,
        drop_item: Some("teleport_pad"),
        emissive: Some(Emissive { color: 0x30_E0E0, intensity: 1.5 }),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for (code, block) in BlockType::ALL.iter().enumerate() {
            let code = u8::try_from(code).unwrap();
            assert_eq!(block.code(), code);
            assert_eq!(BlockType::from_u8(code), Some(*block));
        }
        assert_eq!(BlockType::from_u8(BLOCK_TYPE_COUNT as u8), None);
        assert_eq!(BlockType::from_u8(255), None);
    }

    #[test]
    fn test_air_is_transparent_and_not_solid() {
        assert!(BlockType::Air.is_air());
        assert!(!BlockType::Air.is_solid());
        assert!(BlockType::Air.is_transparent());
    }

    #[test]
    fn test_ladder_is_climbable_not_solid() {
        assert!(!BlockType::Ladder.is_solid());
        assert!(BlockType::Ladder.is_transparent());
    }

    #[test]
    fn test_ores_are_gated_by_tier() {
        let red = BlockType::RedOre.def();
        assert!(!red.can_be_mined_with(0));
        assert!(red.can_be_mined_with(1));

        let prismatic = BlockType::PrismaticOre.def();
        assert!(!prismatic.can_be_mined_with(7));
        assert!(prismatic.can_be_mined_with(8));
        assert!(prismatic.emissive.is_some());

        assert!(BlockType::Stone.def().can_be_mined_with(0));
    }

    #[test]
    fn test_bedrock_is_indestructible() {
        let bedrock = BlockType::Bedrock.def();
        assert_eq!(bedrock.hardness, Hardness::Infinite);
        assert!(!bedrock.can_be_mined_with(u8::MAX));
    }

    #[test]
    fn test_is_ore_covers_exactly_eight_types() {
        let count = BlockType::ALL.iter().filter(|b| b.is_ore()).count();
        assert_eq!(count, 8);
        assert!(!BlockType::Stone.is_ore());
        assert!(!BlockType::Bedrock.is_ore());
    }

    #[test]
    fn test_rgb_unpacks_channels() {
        let def = BlockType::Stone.def();
        let [r, g, b] = def.rgb();
        assert!((r - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }
}
