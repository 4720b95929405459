//! Quality scoring of a finished map.

use crate::types::TerrainCategory;

use super::grid::TileGrid;
use super::model::{QualityMetrics, ResourceField};

const COHERENCE_WEIGHT: f64 = 0.25;
const RESOURCE_WEIGHT: f64 = 0.35;
const BUILDABLE_WEIGHT: f64 = 0.20;
const STRATEGIC_WEIGHT: f64 = 0.20;

pub(super) fn score(grid: &TileGrid, fields: &[ResourceField]) -> QualityMetrics {
    let terrain_coherence = terrain_coherence(grid);
    let resource_balance = resource_balance(fields);
    let buildable_area = 100.0 * grid.buildable_ratio();
    let strategic_balance = strategic_balance(grid);
    QualityMetrics {
        terrain_coherence,
        resource_balance,
        buildable_area,
        strategic_balance,
        overall_score: COHERENCE_WEIGHT * terrain_coherence
            + RESOURCE_WEIGHT * resource_balance
            + BUILDABLE_WEIGHT * buildable_area
            + STRATEGIC_WEIGHT * strategic_balance,
    }
}

pub(super) fn categories_compatible(a: TerrainCategory, b: TerrainCategory) -> bool {
    use TerrainCategory::{Dirt, Rock, Sand, Shore, Tree, Water};
    if a == b {
        return true;
    }
    matches!(
        (a, b),
        (Sand, Dirt)
            | (Dirt, Sand)
            | (Water, Shore)
            | (Shore, Water)
            | (Shore, Sand | Dirt)
            | (Sand | Dirt, Shore)
            | (Sand | Dirt, Tree)
            | (Tree, Sand | Dirt)
            | (Sand | Dirt, Rock)
            | (Rock, Sand | Dirt)
    )
}

/// Percentage of compatible right/down pairs, starting from interior cells.
fn terrain_coherence(grid: &TileGrid) -> f64 {
    let (width, height) = (grid.width(), grid.height());
    let mut pairs = 0_usize;
    let mut compatible = 0_usize;
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let here = grid.category_at(x, y);
            for (nx, ny) in [(x + 1, y), (x, y + 1)] {
                pairs += 1;
                if categories_compatible(here, grid.category_at(nx, ny)) {
                    compatible += 1;
                }
            }
        }
    }
    if pairs == 0 { 100.0 } else { 100.0 * compatible as f64 / pairs as f64 }
}

fn resource_balance(fields: &[ResourceField]) -> f64 {
    let sizes: Vec<f64> = fields.iter().map(|field| field.len() as f64).collect();
    match coefficient_of_variation(&sizes) {
        Some(cv) => (100.0 * (1.0 - cv)).max(0.0),
        None => 0.0,
    }
}

fn strategic_balance(grid: &TileGrid) -> f64 {
    let (width, height) = (grid.width(), grid.height());
    let (mid_x, mid_y) = (width / 2, height / 2);
    let mut quadrants = [0.0_f64; 4];
    for y in 0..height {
        for x in 0..width {
            if matches!(grid.category_at(x, y), TerrainCategory::Tree | TerrainCategory::Rock) {
                let quadrant = usize::from(x >= mid_x) + 2 * usize::from(y >= mid_y);
                quadrants[quadrant] += 1.0;
            }
        }
    }
    match coefficient_of_variation(&quadrants) {
        Some(cv) => (100.0 * (1.0 - 0.5 * cv)).max(0.0),
        None => 0.0,
    }
}

/// Population standard deviation over mean; `None` when the mean is zero.
fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    if mean <= 0.0 {
        return None;
    }
    let variance = values.iter().map(|value| (value - mean) * (value - mean)).sum::<f64>() / count;
    Some(variance.sqrt() / mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::model::ResourceTile;
    use crate::types::ResourceKind;

    fn field_of_size(zone_id: u32, size: usize) -> ResourceField {
        ResourceField {
            zone_id,
            kind: ResourceKind::Green,
            tiles: (0..size)
                .map(|x| ResourceTile { x, y: 0, kind: ResourceKind::Green, density: 1.0, zone_id })
                .collect(),
        }
    }

    #[test]
    fn compatibility_is_symmetric() {
        for a in TerrainCategory::ALL {
            for b in TerrainCategory::ALL {
                assert_eq!(categories_compatible(a, b), categories_compatible(b, a), "{a}/{b}");
            }
        }
        assert!(!categories_compatible(TerrainCategory::Water, TerrainCategory::Sand));
        assert!(!categories_compatible(TerrainCategory::Tree, TerrainCategory::Rock));
    }

    #[test]
    fn uniform_grid_is_fully_coherent() {
        let grid = TileGrid::filled(10, 10, TerrainCategory::Dirt.pick(0.0));
        let metrics = score(&grid, &[]);
        assert_eq!(metrics.terrain_coherence, 100.0);
        assert_eq!(metrics.buildable_area, 100.0);
        assert_eq!(metrics.resource_balance, 0.0);
        assert_eq!(metrics.strategic_balance, 0.0);
    }

    #[test]
    fn water_beside_sand_lowers_coherence() {
        let mut grid = TileGrid::filled(10, 10, TerrainCategory::Sand.pick(0.0));
        grid.set(5, 5, TerrainCategory::Water.pick(0.0));
        assert!(score(&grid, &[]).terrain_coherence < 100.0);
    }

    #[test]
    fn equal_fields_score_full_resource_balance() {
        let fields = vec![field_of_size(0, 5), field_of_size(1, 5), field_of_size(2, 5)];
        assert!((resource_balance(&fields) - 100.0).abs() < 1e-9);

        let skewed = vec![field_of_size(0, 1), field_of_size(1, 30)];
        assert!(resource_balance(&skewed) < 20.0);
    }

    #[test]
    fn one_sided_cover_scores_lower_than_spread_cover() {
        let rock = TerrainCategory::Rock.pick(0.0);
        let mut spread = TileGrid::filled(10, 10, TerrainCategory::Sand.pick(0.0));
        for (x, y) in [(1, 1), (8, 1), (1, 8), (8, 8)] {
            spread.set(x, y, rock);
        }
        let mut lopsided = TileGrid::filled(10, 10, TerrainCategory::Sand.pick(0.0));
        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            lopsided.set(x, y, rock);
        }
        assert_eq!(strategic_balance(&spread), 100.0);
        assert!(strategic_balance(&lopsided) < strategic_balance(&spread));
    }

    #[test]
    fn overall_score_is_the_weighted_sum() {
        let mut grid = TileGrid::filled(12, 12, TerrainCategory::Sand.pick(0.0));
        grid.set(3, 3, TerrainCategory::Tree.pick(0.0));
        grid.set(9, 9, TerrainCategory::Water.pick(0.0));
        let metrics = score(&grid, &[field_of_size(0, 4), field_of_size(1, 7)]);
        let expected = 0.25 * metrics.terrain_coherence
            + 0.35 * metrics.resource_balance
            + 0.20 * metrics.buildable_area
            + 0.20 * metrics.strategic_balance;
        assert!((metrics.overall_score - expected).abs() < 1e-6);
    }
}
