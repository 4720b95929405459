//! Layered-noise terrain passes: base layer, water, forests, rocks, dirt, smoothing, detail.

use crate::types::TerrainCategory;

use super::climate::ClimateConfig;
use super::grid::{NEIGHBOR_OFFSETS, TileGrid, disc_bounds, distance};
use super::seed::{noise, random};

/// Circular feature anchored at a fraction of the map size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Blob {
    pub(super) fx: f64,
    pub(super) fy: f64,
    pub(super) radius: f64,
}

impl Blob {
    pub(super) const fn new(fx: f64, fy: f64, radius: f64) -> Self {
        Self { fx, fy, radius }
    }

    pub(super) fn center(&self, width: usize, height: usize) -> (f64, f64) {
        (self.fx * width as f64, self.fy * height as f64)
    }

    pub(super) fn radius(&self, width: usize, height: usize) -> f64 {
        clamp_radius(self.radius, width, height)
    }
}

/// Keeps fixed feature radii proportionate on small maps.
pub(super) fn clamp_radius(radius: f64, width: usize, height: usize) -> f64 {
    radius.min(width.min(height) as f64 * 0.3)
}

const WATER_RADIUS: f64 = 8.0;

const FOREST_BLOBS: [Blob; 3] =
    [Blob::new(0.85, 0.12, 6.0), Blob::new(0.10, 0.12, 4.0), Blob::new(0.60, 0.90, 4.0)];
const FOREST_DENSITY: f64 = 0.65;

const ROCK_ANCHORS: [(f64, f64, usize); 5] =
    [(0.45, 0.08, 4), (0.95, 0.40, 3), (0.55, 0.45, 5), (0.05, 0.45, 3), (0.75, 0.95, 4)];
const ROCK_CLUSTER_CHANCE: f64 = 0.6;

const DIRT_PATCHES: [Blob; 5] = [
    Blob::new(0.25, 0.45, 3.0),
    Blob::new(0.50, 0.30, 3.0),
    Blob::new(0.70, 0.55, 4.0),
    Blob::new(0.40, 0.80, 3.0),
    Blob::new(0.90, 0.80, 3.0),
];
const DIRT_DENSITY: f64 = 0.7;

const SMOOTH_TREE_EDGE_CHANCE: f64 = 0.3;
const DETAIL_SWAP_CHANCE: f64 = 0.05;

pub(super) fn is_protected(category: TerrainCategory) -> bool {
    matches!(
        category,
        TerrainCategory::Water | TerrainCategory::Shore | TerrainCategory::Tree | TerrainCategory::Rock
    )
}

/// Classic passes 1 to 4.
pub(super) fn build_classic_terrain(
    width: usize,
    height: usize,
    seed: u64,
    climate: &ClimateConfig,
) -> TileGrid {
    let mut grid = TileGrid::filled(width, height, climate.primary.pick(0.0));
    paint_base_layer(&mut grid, seed, climate);
    paint_water_feature(&mut grid, seed);
    paint_forest_regions(&mut grid, seed);
    place_rock_formations(&mut grid, seed);
    grid
}

pub(super) fn paint_base_layer(grid: &mut TileGrid, seed: u64, climate: &ClimateConfig) {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let (fx, fy) = (x as f64, y as f64);
            let value = noise(seed, fx * 0.08, fy * 0.08)
                + 0.5 * noise(seed, fx * 0.15, fy * 0.15)
                + 0.3 * noise(seed, fx * 0.3, fy * 0.3);
            let category = if value > 0.2 { climate.primary } else { climate.secondary };
            grid.set(x, y, category.pick(random(seed, x as i64 + 1_000, y as i64)));
        }
    }
}

pub(super) fn paint_water_feature(grid: &mut TileGrid, seed: u64) {
    let (width, height) = (grid.width(), grid.height());
    let (cx, cy) = (6.0, height as f64 - 8.0);
    let radius = clamp_radius(WATER_RADIUS, width, height);

    for (x, y) in disc_bounds(width, height, cx, cy, radius + 0.5) {
        let d = distance(x, y, cx, cy);
        let limit = radius + 0.3 * noise(seed, x as f64 * 0.2, y as f64 * 0.2);
        if d >= limit {
            continue;
        }
        let (xi, yi) = (x as i64, y as i64);
        if d < radius - 2.0 {
            grid.set(x, y, TerrainCategory::Water.pick(random(seed, xi + 2_000, yi)));
        } else if grid.category_at(x, y) != TerrainCategory::Water {
            grid.set(x, y, TerrainCategory::Shore.pick(random(seed, xi + 2_500, yi)));
        }
    }
}

pub(super) fn paint_forest_regions(grid: &mut TileGrid, seed: u64) {
    let (width, height) = (grid.width(), grid.height());
    for blob in FOREST_BLOBS {
        let (cx, cy) = blob.center(width, height);
        let radius = blob.radius(width, height);
        for (x, y) in disc_bounds(width, height, cx, cy, radius + 0.5) {
            if matches!(grid.category_at(x, y), TerrainCategory::Water | TerrainCategory::Shore) {
                continue;
            }
            let limit = radius + 0.4 * noise(seed, x as f64 * 0.25, y as f64 * 0.25);
            let (xi, yi) = (x as i64, y as i64);
            if distance(x, y, cx, cy) < limit && random(seed, xi + 3_000, yi) < FOREST_DENSITY {
                grid.set(x, y, TerrainCategory::Tree.pick(random(seed, xi + 3_500, yi)));
            }
        }
    }
}

pub(super) fn place_rock_formations(grid: &mut TileGrid, seed: u64) {
    let (width, height) = (grid.width(), grid.height());
    for (fx, fy, cluster_size) in ROCK_ANCHORS {
        let ax = ((fx * width as f64) as usize).min(width - 1);
        let ay = ((fy * height as f64) as usize).min(height - 1);
        if is_protected(grid.category_at(ax, ay)) {
            continue;
        }
        let (axi, ayi) = (ax as i64, ay as i64);
        grid.set(ax, ay, TerrainCategory::Rock.pick(random(seed, axi + 4_000, ayi)));

        for attempt in 0..(cluster_size as i64 - 1) {
            let direction = (random(seed, axi + 4_100 + attempt, ayi) * 8.0) as usize;
            let (dx, dy) = NEIGHBOR_OFFSETS[direction.min(7)];
            let Some((nx, ny)) = grid.offset(ax, ay, dx, dy) else {
                continue;
            };
            if is_protected(grid.category_at(nx, ny)) {
                continue;
            }
            if random(seed, axi + 4_200 + attempt, ayi) < ROCK_CLUSTER_CHANCE {
                let variant = random(seed, nx as i64 + 4_300, ny as i64);
                grid.set(nx, ny, TerrainCategory::Rock.pick(variant));
            }
        }
    }
}

/// Classic pass 5. Rocks are not protected here; only water, shore and trees are.
pub(super) fn paint_dirt_patches(grid: &mut TileGrid, seed: u64) {
    let (width, height) = (grid.width(), grid.height());
    for blob in DIRT_PATCHES {
        let (cx, cy) = blob.center(width, height);
        let radius = blob.radius(width, height);
        for (x, y) in disc_bounds(width, height, cx, cy, radius + 1.0) {
            if matches!(
                grid.category_at(x, y),
                TerrainCategory::Water | TerrainCategory::Shore | TerrainCategory::Tree
            ) {
                continue;
            }
            let (fx, fy) = (x as f64, y as f64);
            let limit = radius + 0.5 * noise(seed, fx * 0.3 + 17.0, fy * 0.3 + 31.0);
            let (xi, yi) = (x as i64, y as i64);
            if distance(x, y, cx, cy) < limit && random(seed, xi + 5_000, yi) < DIRT_DENSITY {
                grid.set(x, y, TerrainCategory::Dirt.pick(random(seed, xi + 5_500, yi)));
            }
        }
    }
}

/// Classic pass 7. Reads from a snapshot so rewrites never cascade within the pass.
pub(super) fn smooth_transitions(grid: &mut TileGrid, seed: u64) {
    let (width, height) = (grid.width(), grid.height());
    if width < 3 || height < 3 {
        return;
    }
    let snapshot = grid.clone();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let category = snapshot.category_at(x, y);
            let (xi, yi) = (x as i64, y as i64);
            let next_to_water = snapshot.count_neighbors_in(x, y, TerrainCategory::Water) > 0;
            if next_to_water
                && !matches!(category, TerrainCategory::Water | TerrainCategory::Shore)
            {
                grid.set(x, y, TerrainCategory::Shore.pick(random(seed, xi + 6_000, yi)));
                continue;
            }
            if category != TerrainCategory::Sand {
                continue;
            }
            let trees = snapshot.count_neighbors_in(x, y, TerrainCategory::Tree);
            if (1..=3).contains(&trees) && random(seed, xi + 6_500, yi) < SMOOTH_TREE_EDGE_CHANCE {
                grid.set(x, y, TerrainCategory::Dirt.pick(random(seed, xi + 7_000, yi)));
            }
        }
    }
}

/// Classic pass 8: occasional sand/dirt swaps so large areas do not look flat.
pub(super) fn vary_details(grid: &mut TileGrid, seed: u64) {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let opposite = match grid.category_at(x, y) {
                TerrainCategory::Sand => TerrainCategory::Dirt,
                TerrainCategory::Dirt => TerrainCategory::Sand,
                _ => continue,
            };
            let (xi, yi) = (x as i64, y as i64);
            if random(seed, xi + 8_000, yi) < DETAIL_SWAP_CHANCE {
                grid.set(x, y, opposite.pick(random(seed, xi + 8_500, yi)));
            }
        }
    }
}
