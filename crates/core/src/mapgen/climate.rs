//! Climate presets and the post-base-layer climate rewrite.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MapGenError;
use crate::types::TerrainCategory;

use super::grid::TileGrid;
use super::seed::random;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Climate {
    Desert,
    #[default]
    Temperate,
    Arctic,
    Volcanic,
}

impl Climate {
    pub const ALL: [Climate; 4] =
        [Climate::Desert, Climate::Temperate, Climate::Arctic, Climate::Volcanic];

    pub fn as_str(self) -> &'static str {
        match self {
            Climate::Desert => "desert",
            Climate::Temperate => "temperate",
            Climate::Arctic => "arctic",
            Climate::Volcanic => "volcanic",
        }
    }

    pub fn config(self) -> ClimateConfig {
        match self {
            Climate::Temperate => ClimateConfig {
                primary: TerrainCategory::Sand,
                secondary: TerrainCategory::Dirt,
                water_frequency: 0.15,
                forest_frequency: 0.25,
                rock_frequency: 0.10,
                temperature_range: (5, 25),
                humidity_range: (40, 70),
            },
            // Dunes everywhere; dirt only arrives through patches and detail variation.
            Climate::Desert => ClimateConfig {
                primary: TerrainCategory::Sand,
                secondary: TerrainCategory::Sand,
                water_frequency: 0.02,
                forest_frequency: 0.05,
                rock_frequency: 0.15,
                temperature_range: (25, 45),
                humidity_range: (5, 20),
            },
            Climate::Arctic => ClimateConfig {
                primary: TerrainCategory::Sand,
                secondary: TerrainCategory::Dirt,
                water_frequency: 0.20,
                forest_frequency: 0.15,
                rock_frequency: 0.20,
                temperature_range: (-30, 0),
                humidity_range: (30, 60),
            },
            Climate::Volcanic => ClimateConfig {
                primary: TerrainCategory::Sand,
                secondary: TerrainCategory::Dirt,
                water_frequency: 0.05,
                forest_frequency: 0.05,
                rock_frequency: 0.35,
                temperature_range: (30, 60),
                humidity_range: (10, 30),
            },
        }
    }
}

impl fmt::Display for Climate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Climate {
    type Err = MapGenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Climate::ALL
            .into_iter()
            .find(|climate| climate.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| MapGenError::UnknownClimate(value.to_string()))
    }
}

impl TryFrom<String> for Climate {
    type Error = MapGenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Climate> for String {
    fn from(climate: Climate) -> Self {
        climate.as_str().to_string()
    }
}

/// Palette weighting for one climate. Temperature and humidity are informational only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ClimateConfig {
    pub primary: TerrainCategory,
    pub secondary: TerrainCategory,
    pub water_frequency: f64,
    pub forest_frequency: f64,
    pub rock_frequency: f64,
    pub temperature_range: (i32, i32),
    pub humidity_range: (i32, i32),
}

const CLIMATE_REWRITE_CHANCE: f64 = 0.1;
const VOLCANIC_ROCK_CHANCE: f64 = 0.05;

/// Rewrites roughly a tenth of the cells according to the climate.
///
/// Arctic and temperate carry distinct tables but no rewrite rule, so they leave the grid
/// untouched here.
pub(super) fn apply_climate(grid: &mut TileGrid, climate: Climate, seed: u64) {
    let rewrite = match climate {
        Climate::Desert => ClimateRewrite::DirtToSand,
        Climate::Volcanic => ClimateRewrite::SandToRock,
        Climate::Temperate | Climate::Arctic => return,
    };

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let (xi, yi) = (x as i64, y as i64);
            let roll = random(seed, xi + 10_000, yi);
            if roll >= CLIMATE_REWRITE_CHANCE {
                continue;
            }
            let category = grid.category_at(x, y);
            let variant = random(seed, xi + 10_500, yi);
            match rewrite {
                ClimateRewrite::DirtToSand if category == TerrainCategory::Dirt => {
                    grid.set(x, y, TerrainCategory::Sand.pick(variant));
                }
                ClimateRewrite::SandToRock
                    if category == TerrainCategory::Sand
                        && random(seed, xi + 10_250, yi) < VOLCANIC_ROCK_CHANCE =>
                {
                    grid.set(x, y, TerrainCategory::Rock.pick(variant));
                }
                _ => {}
            }
        }
    }
}

#[derive(Clone, Copy)]
enum ClimateRewrite {
    DirtToSand,
    SandToRock,
}
