//! Wave function collapse over a restricted tile palette with cardinal adjacency rules.

use std::collections::{BTreeSet, VecDeque};

use crate::error::WfcContradiction;
use crate::types::{TerrainCategory, TileId};

use super::climate::ClimateConfig;
use super::grid::{CARDINAL_OFFSETS, TileGrid};
use super::seed::random;

/// Variants per category admitted by the rule set.
const WFC_VARIANTS_PER_CATEGORY: usize = 2;

/// Per-tile neighbour sets, one bitmask per cardinal direction (up, right, down, left).
#[derive(Clone, Debug)]
pub(super) struct WfcRules {
    tiles: Vec<TileId>,
    allowed: Vec<[u32; 4]>,
    weights: Vec<f64>,
}

fn compatible_categories(category: TerrainCategory) -> &'static [TerrainCategory] {
    use TerrainCategory::{Dirt, Rock, Sand, Shore, Tree, Water};
    match category {
        Sand | Dirt => &[Sand, Dirt, Shore, Tree, Rock],
        Water => &[Water, Shore],
        Shore => &[Water, Shore, Sand, Dirt],
        Tree => &[Tree, Sand, Dirt],
        Rock => &[Rock, Sand, Dirt],
    }
}

impl WfcRules {
    pub(super) fn for_climate(climate: &ClimateConfig) -> Self {
        let tiles: Vec<TileId> = TerrainCategory::ALL
            .into_iter()
            .flat_map(|category| (0..WFC_VARIANTS_PER_CATEGORY).filter_map(move |n| category.nth(n)))
            .collect();

        let allowed = tiles
            .iter()
            .map(|tile| {
                let neighbors = compatible_categories(tile.category());
                let mask = tiles
                    .iter()
                    .enumerate()
                    .filter(|(_, other)| neighbors.contains(&other.category()))
                    .fold(0_u32, |mask, (index, _)| mask | (1 << index));
                [mask; 4]
            })
            .collect();

        let weights = tiles
            .iter()
            .map(|tile| {
                let category = tile.category();
                let share = match category {
                    TerrainCategory::Water => climate.water_frequency,
                    TerrainCategory::Tree => climate.forest_frequency,
                    TerrainCategory::Rock => climate.rock_frequency,
                    TerrainCategory::Sand | TerrainCategory::Dirt | TerrainCategory::Shore => {
                        category.frequency()
                    }
                };
                share / WFC_VARIANTS_PER_CATEGORY as f64
            })
            .collect();

        Self { tiles, allowed, weights }
    }

    #[cfg(test)]
    fn from_parts(tiles: Vec<TileId>, allowed: Vec<[u32; 4]>, weights: Vec<f64>) -> Self {
        Self { tiles, allowed, weights }
    }

    pub(super) fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    #[cfg(test)]
    fn allows(&self, tile: TileId, direction: usize, neighbor: TileId) -> bool {
        let (Some(from), Some(to)) = (self.position(tile), self.position(neighbor)) else {
            return false;
        };
        self.allowed[from][direction] & (1 << to) != 0
    }

    #[cfg(test)]
    fn position(&self, tile: TileId) -> Option<usize> {
        self.tiles.iter().position(|candidate| *candidate == tile)
    }

    fn full_domain(&self) -> u32 {
        if self.tiles.len() >= 32 { u32::MAX } else { (1_u32 << self.tiles.len()) - 1 }
    }

    fn support(&self, domain: u32, direction: usize) -> u32 {
        bits(domain).fold(0, |mask, index| mask | self.allowed[index][direction])
    }
}

fn bits(domain: u32) -> impl Iterator<Item = usize> {
    (0..32).filter(move |index| domain & (1 << index) != 0)
}

struct WaveState<'a> {
    rules: &'a WfcRules,
    width: usize,
    height: usize,
    domains: Vec<u32>,
    // Keys are (entropy, y, x); the first entry is the next cell to collapse.
    open: BTreeSet<(u32, usize, usize)>,
}

impl<'a> WaveState<'a> {
    fn new(rules: &'a WfcRules, width: usize, height: usize) -> Self {
        let full = rules.full_domain();
        let domains = vec![full; width * height];
        let mut open = BTreeSet::new();
        if full.count_ones() > 1 {
            for y in 0..height {
                for x in 0..width {
                    open.insert((full.count_ones(), y, x));
                }
            }
        }
        Self { rules, width, height, domains, open }
    }

    fn narrow(&mut self, x: usize, y: usize, domain: u32) -> Result<bool, WfcContradiction> {
        let index = y * self.width + x;
        let previous = self.domains[index];
        if previous == domain {
            return Ok(false);
        }
        if previous.count_ones() > 1 {
            self.open.remove(&(previous.count_ones(), y, x));
        }
        self.domains[index] = domain;
        if domain == 0 {
            return Err(WfcContradiction { x, y });
        }
        if domain.count_ones() > 1 {
            self.open.insert((domain.count_ones(), y, x));
        }
        Ok(true)
    }

    fn collapse(&mut self, x: usize, y: usize, seed: u64) -> Result<(), WfcContradiction> {
        let domain = self.domains[y * self.width + x];
        let total: f64 = bits(domain).map(|index| self.rules.weights[index]).sum();
        let mut target = random(seed, x as i64 + 20_000, y as i64) * total;
        let mut chosen = bits(domain).last().unwrap_or(0);
        for index in bits(domain) {
            target -= self.rules.weights[index];
            if target < 0.0 {
                chosen = index;
                break;
            }
        }
        self.narrow(x, y, 1 << chosen)?;
        self.propagate(x, y)
    }

    fn propagate(&mut self, x: usize, y: usize) -> Result<(), WfcContradiction> {
        let mut pending = VecDeque::from([(x, y)]);
        while let Some((cx, cy)) = pending.pop_front() {
            let domain = self.domains[cy * self.width + cx];
            for (direction, &(dx, dy)) in CARDINAL_OFFSETS.iter().enumerate() {
                let nx = cx as i64 + dx;
                let ny = cy as i64 + dy;
                if nx < 0 || ny < 0 || nx as usize >= self.width || ny as usize >= self.height {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                let current = self.domains[ny * self.width + nx];
                let narrowed = current & self.rules.support(domain, direction);
                if self.narrow(nx, ny, narrowed)? {
                    pending.push_back((nx, ny));
                }
            }
        }
        Ok(())
    }
}

/// Collapses every cell, lowest entropy first with `(y, x)` tie-breaks.
pub(super) fn solve(
    width: usize,
    height: usize,
    seed: u64,
    rules: &WfcRules,
) -> Result<TileGrid, WfcContradiction> {
    let mut state = WaveState::new(rules, width, height);
    while let Some(&(_, y, x)) = state.open.first() {
        state.collapse(x, y, seed)?;
    }

    let fallback = rules.tiles().first().copied().unwrap_or(TerrainCategory::Sand.pick(0.0));
    let mut grid = TileGrid::filled(width, height, fallback);
    for y in 0..height {
        for x in 0..width {
            let domain = state.domains[y * width + x];
            let tile = rules.tiles()[domain.trailing_zeros() as usize];
            grid.set(x, y, tile);
        }
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::climate::Climate;

    fn temperate_rules() -> WfcRules {
        WfcRules::for_climate(&Climate::Temperate.config())
    }

    #[test]
    fn rule_set_covers_two_variants_per_category() {
        let rules = temperate_rules();
        assert_eq!(rules.tiles().len(), 12);
        for category in TerrainCategory::ALL {
            assert_eq!(rules.tiles().iter().filter(|tile| tile.category() == category).count(), 2);
        }
    }

    #[test]
    fn adjacency_rules_are_symmetric() {
        let rules = temperate_rules();
        for &a in rules.tiles() {
            for &b in rules.tiles() {
                for direction in 0..4 {
                    let opposite = (direction + 2) % 4;
                    assert_eq!(
                        rules.allows(a, direction, b),
                        rules.allows(b, opposite, a),
                        "{a} -> {b} in direction {direction}"
                    );
                }
            }
        }
    }

    #[test]
    fn water_only_touches_water_or_shore() {
        let rules = temperate_rules();
        let water = TerrainCategory::Water.pick(0.0);
        for &neighbor in rules.tiles() {
            let expected =
                matches!(neighbor.category(), TerrainCategory::Water | TerrainCategory::Shore);
            assert_eq!(rules.allows(water, 0, neighbor), expected, "water next to {neighbor}");
        }
    }

    #[test]
    fn solved_grids_respect_every_adjacency_rule() {
        let rules = temperate_rules();
        for seed in [1_u64, 2, 3, 99, 12_345] {
            let Ok(grid) = solve(16, 12, seed, &rules) else {
                continue;
            };
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    let tile = grid.get(x, y);
                    assert!(rules.tiles().contains(&tile));
                    for (direction, &(dx, dy)) in CARDINAL_OFFSETS.iter().enumerate() {
                        if let Some((nx, ny)) = grid.offset(x, y, dx, dy) {
                            assert!(
                                rules.allows(tile, direction, grid.get(nx, ny)),
                                "seed {seed}: {tile} at ({x}, {y}) next to {}",
                                grid.get(nx, ny)
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn solve_is_deterministic() {
        let rules = temperate_rules();
        assert_eq!(solve(20, 15, 77, &rules), solve(20, 15, 77, &rules));
    }

    #[test]
    fn tile_without_allowed_neighbors_reports_a_contradiction() {
        let lonely = TerrainCategory::Rock.pick(0.0);
        let other = TerrainCategory::Sand.pick(0.0);
        let rules =
            WfcRules::from_parts(vec![lonely, other], vec![[0; 4], [0b10; 4]], vec![1.0, 0.0]);
        // `other` has zero weight, so the first collapse picks `lonely` and starves its neighbour.
        assert_eq!(solve(2, 1, 4, &rules), Err(WfcContradiction { x: 1, y: 0 }));
    }
}
