//! Strategic terrain: rock chokepoints, high-ground clusters and scattered cover.

use crate::types::TerrainCategory;

use super::grid::{TileGrid, disc_bounds, distance};
use super::seed::random;

const CHOKEPOINT_COLUMNS: [f64; 2] = [0.3, 0.7];
const CHOKEPOINT_WIDTH: usize = 3;
const CHOKEPOINT_HEIGHT: usize = 8;
const CHOKEPOINT_FILL: f64 = 0.6;

const HIGH_GROUND_CENTERS: [(f64, f64); 4] = [(0.25, 0.25), (0.75, 0.75), (0.5, 0.1), (0.5, 0.9)];
const HIGH_GROUND_FILL: f64 = 0.4;

const COVER_DENSITY: f64 = 0.02;
const COVER_KEEP_CHANCE: f64 = 0.7;

fn is_open_water(category: TerrainCategory) -> bool {
    matches!(category, TerrainCategory::Water | TerrainCategory::Shore)
}

pub(super) fn apply_strategic_features(grid: &mut TileGrid, seed: u64) {
    place_chokepoints(grid, seed);
    place_high_ground(grid, seed);
    scatter_cover(grid, seed);
}

fn place_rock(grid: &mut TileGrid, x: usize, y: usize, variant_roll: f64) {
    if !is_open_water(grid.category_at(x, y)) {
        grid.set(x, y, TerrainCategory::Rock.pick(variant_roll));
    }
}

fn place_chokepoints(grid: &mut TileGrid, seed: u64) {
    let (width, height) = (grid.width(), grid.height());
    let top = (height / 2).saturating_sub(CHOKEPOINT_HEIGHT / 2);
    let bottom = (top + CHOKEPOINT_HEIGHT).min(height);
    for fraction in CHOKEPOINT_COLUMNS {
        let center = (fraction * width as f64).round() as usize;
        let left = center.saturating_sub(CHOKEPOINT_WIDTH / 2);
        let right = (left + CHOKEPOINT_WIDTH).min(width);
        for y in top..bottom {
            for x in left..right {
                let (xi, yi) = (x as i64, y as i64);
                if random(seed, xi + 11_000, yi) < CHOKEPOINT_FILL {
                    place_rock(grid, x, y, random(seed, xi + 11_500, yi));
                }
            }
        }
    }
}

fn place_high_ground(grid: &mut TileGrid, seed: u64) {
    let (width, height) = (grid.width(), grid.height());
    for (index, (fx, fy)) in HIGH_GROUND_CENTERS.into_iter().enumerate() {
        let (cx, cy) = (fx * width as f64, fy * height as f64);
        let radius = 3.0 + (random(seed, 12_000 + index as i64, 0) * 2.0).floor();
        for (x, y) in disc_bounds(width, height, cx, cy, radius) {
            if distance(x, y, cx, cy) > radius {
                continue;
            }
            let (xi, yi) = (x as i64, y as i64);
            if random(seed, xi + 12_500, yi) < HIGH_GROUND_FILL {
                place_rock(grid, x, y, random(seed, xi + 12_700, yi));
            }
        }
    }
}

fn scatter_cover(grid: &mut TileGrid, seed: u64) {
    let (width, height) = (grid.width(), grid.height());
    let count = (COVER_DENSITY * (width * height) as f64).floor() as i64;
    for index in 0..count {
        let stream = 13_000 + index;
        let x = ((random(seed, stream, 0) * width as f64) as usize).min(width - 1);
        let y = ((random(seed, stream, 1) * height as f64) as usize).min(height - 1);
        if is_open_water(grid.category_at(x, y)) || random(seed, stream, 2) >= COVER_KEEP_CHANCE {
            continue;
        }
        let category =
            if random(seed, stream, 3) < 0.5 { TerrainCategory::Tree } else { TerrainCategory::Rock };
        grid.set(x, y, category.pick(random(seed, stream, 4)));
    }
}
