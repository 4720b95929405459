use std::fmt;
use std::ops::Range;

use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainCategory {
    Sand,
    Dirt,
    Water,
    Shore,
    Tree,
    Rock,
}

const TILE_NAMES: [&str; 35] = [
    "s01", "s02", "s03", "s04", "s05", "s06", // sand
    "d01", "d02", "d03", "d04", "d05", "d06", // dirt
    "w1", "w2", // water
    "sh1", "sh2", "sh3", "sh4", "sh5", "sh6", // shore
    "t01", "t02", "t03", "t05", "t06", "t07", "t08", "t10", // trees
    "rock1", "rock2", "rock3", "rock4", "rock5", "rock6", "rock7", // rocks
];

impl TerrainCategory {
    pub const ALL: [TerrainCategory; 6] = [
        TerrainCategory::Sand,
        TerrainCategory::Dirt,
        TerrainCategory::Water,
        TerrainCategory::Shore,
        TerrainCategory::Tree,
        TerrainCategory::Rock,
    ];

    fn index_range(self) -> Range<u8> {
        match self {
            TerrainCategory::Sand => 0..6,
            TerrainCategory::Dirt => 6..12,
            TerrainCategory::Water => 12..14,
            TerrainCategory::Shore => 14..20,
            TerrainCategory::Tree => 20..28,
            TerrainCategory::Rock => 28..35,
        }
    }

    /// Palette members in declaration order.
    pub fn members(self) -> impl Iterator<Item = TileId> {
        self.index_range().map(TileId)
    }

    pub fn member_count(self) -> usize {
        self.index_range().len()
    }

    /// Share of the palette this category is expected to occupy on a typical map.
    pub fn frequency(self) -> f64 {
        match self {
            TerrainCategory::Sand => 0.35,
            TerrainCategory::Dirt => 0.25,
            TerrainCategory::Water => 0.10,
            TerrainCategory::Shore => 0.10,
            TerrainCategory::Tree => 0.15,
            TerrainCategory::Rock => 0.05,
        }
    }

    pub fn is_buildable(self) -> bool {
        matches!(self, TerrainCategory::Sand | TerrainCategory::Dirt)
    }

    /// Picks a member with `floor(roll * len)`; `roll` is expected in `[0, 1)`.
    pub fn pick(self, roll: f64) -> TileId {
        let range = self.index_range();
        let len = range.len();
        let offset = ((roll * len as f64).floor().max(0.0) as usize).min(len - 1);
        TileId(range.start + offset as u8)
    }

    /// The nth member, used where a rule set only admits the first few variants.
    pub fn nth(self, n: usize) -> Option<TileId> {
        let range = self.index_range();
        (n < range.len()).then(|| TileId(range.start + n as u8))
    }
}

impl fmt::Display for TerrainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerrainCategory::Sand => "sand",
            TerrainCategory::Dirt => "dirt",
            TerrainCategory::Water => "water",
            TerrainCategory::Shore => "shore",
            TerrainCategory::Tree => "tree",
            TerrainCategory::Rock => "rock",
        };
        f.write_str(name)
    }
}

/// Opaque palette entry. Only constructible through [`TerrainCategory`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(u8);

impl TileId {
    pub const PALETTE_SIZE: usize = TILE_NAMES.len();

    pub fn name(self) -> &'static str {
        TILE_NAMES[self.0 as usize]
    }

    pub fn category(self) -> TerrainCategory {
        TerrainCategory::ALL
            .into_iter()
            .find(|category| category.index_range().contains(&self.0))
            .unwrap_or(TerrainCategory::Rock)
    }

    pub fn is_buildable(self) -> bool {
        self.category().is_buildable()
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn palette() -> impl Iterator<Item = TileId> {
        (0..TILE_NAMES.len() as u8).map(TileId)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TileId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Green,
    Blue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum GenerationMethod {
    #[serde(rename = "WFC")]
    Wfc,
    #[serde(rename = "classic")]
    Classic,
}
