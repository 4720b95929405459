use std::collections::{BTreeSet, VecDeque};

use rts_mapgen::{
    Climate, GenerationMethod, GenerationOptions, GenerationResult, ResourceKind, TerrainCategory,
    TileGrid, generate_map,
};

fn scenario(climate: Climate, seed: u64, resource_balance: bool) -> GenerationResult {
    let options = GenerationOptions {
        use_wfc: false,
        climate,
        resource_balance,
        enable_validation: true,
        quality_threshold: 50.0,
        seed,
    };
    generate_map(40, 30, &options).expect("40x30 is a valid size")
}

#[test]
fn test_scenario_temperate_classic_baseline() {
    let result = scenario(Climate::Temperate, 12_345, true);

    assert_eq!(result.grid.tiles().len(), 1_200);
    assert_eq!(result.metadata.generation_method, GenerationMethod::Classic);
    assert!(!result.metadata.wfc_fallback);
    assert!(
        result.resource_fields.len() >= 3,
        "expected at least three fields, got {}",
        result.resource_fields.len()
    );
    assert!(
        result.grid.buildable_ratio() >= 0.6,
        "buildable ratio {} below the floor",
        result.grid.buildable_ratio()
    );
    let overall = result.metadata.quality.overall_score;
    assert!((50.0..=100.0).contains(&overall), "overall score {overall}");
}

fn cardinal(grid: &TileGrid, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
    [
        x.checked_sub(1).map(|nx| (nx, y)),
        (x + 1 < grid.width()).then_some((x + 1, y)),
        y.checked_sub(1).map(|ny| (x, ny)),
        (y + 1 < grid.height()).then_some((x, y + 1)),
    ]
    .into_iter()
    .flatten()
}

fn smallest_water_body(grid: &TileGrid) -> Option<usize> {
    let is_water = |(x, y): (usize, usize)| grid.category_at(x, y) == TerrainCategory::Water;
    let mut seen = BTreeSet::new();
    let mut smallest: Option<usize> = None;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if !is_water((x, y)) || !seen.insert((x, y)) {
                continue;
            }
            let mut open = VecDeque::from([(x, y)]);
            let mut size = 0;
            while let Some((cx, cy)) = open.pop_front() {
                size += 1;
                for next in cardinal(grid, cx, cy) {
                    if is_water(next) && seen.insert(next) {
                        open.push_back(next);
                    }
                }
            }
            smallest = Some(smallest.map_or(size, |best| best.min(size)));
        }
    }
    smallest
}

#[test]
fn test_scenario_wfc_baseline() {
    let options = GenerationOptions {
        use_wfc: true,
        climate: Climate::Temperate,
        resource_balance: true,
        enable_validation: true,
        quality_threshold: 50.0,
        seed: 12_345,
    };
    for seed in [12_345, 12_344, 12_346, 1, 2, 3] {
        let result = generate_map(40, 30, &GenerationOptions { seed, ..options.clone() })
            .expect("40x30 is a valid size");
        let grid = &result.grid;

        match result.metadata.generation_method {
            GenerationMethod::Wfc => assert!(!result.metadata.wfc_fallback),
            GenerationMethod::Classic => assert!(result.metadata.wfc_fallback),
        }
        assert_eq!(grid.tiles().len(), 1_200);
        assert!(
            grid.buildable_ratio() >= 0.6,
            "seed {seed}: buildable ratio {} below the floor",
            grid.buildable_ratio()
        );
        if let Some(size) = smallest_water_body(grid) {
            assert!(size >= 4, "seed {seed}: {size}-cell pond survived validation");
        }

        let mut claimed = BTreeSet::new();
        for field in &result.resource_fields {
            let cells: BTreeSet<(usize, usize)> =
                field.tiles.iter().map(|tile| (tile.x, tile.y)).collect();
            for &(x, y) in &cells {
                assert!(grid.get(x, y).is_buildable(), "seed {seed}: resource on {}", grid.get(x, y));
                assert!(claimed.insert((x, y)), "seed {seed}: ({x}, {y}) shared between fields");
            }
            let reachable = cells.iter().any(|&(x, y)| {
                cardinal(grid, x, y)
                    .any(|(nx, ny)| !cells.contains(&(nx, ny)) && grid.get(nx, ny).is_buildable())
            });
            assert!(reachable, "seed {seed}: zone {} is sealed in", field.zone_id);
        }

        let overall = result.metadata.quality.overall_score;
        assert!((0.0..=100.0).contains(&overall), "seed {seed}: overall score {overall}");
    }
}

#[test]
fn test_scenario_desert_base_is_sand_heavy() {
    let result = scenario(Climate::Desert, 7, true);
    let sand = result.grid.count_category(TerrainCategory::Sand) as f64;
    let dirt = result.grid.count_category(TerrainCategory::Dirt) as f64;

    assert!(sand >= dirt * 1.05, "desert map should favour sand: sand={sand} dirt={dirt}");
    assert_eq!(result.metadata.climate, Climate::Desert);
    assert_eq!(result.metadata.temperature_range, (25, 45));
}

#[test]
fn test_scenario_volcanic_adds_rock_over_desert() {
    let desert = scenario(Climate::Desert, 7, true);
    let volcanic = scenario(Climate::Volcanic, 7, true);

    let desert_rock = desert.grid.count_category(TerrainCategory::Rock);
    let volcanic_rock = volcanic.grid.count_category(TerrainCategory::Rock);
    assert!(
        volcanic_rock > desert_rock,
        "volcanic rock {volcanic_rock} should exceed desert rock {desert_rock}"
    );
}

#[test]
fn test_scenario_fixed_deposits_land_on_documented_centers() {
    let result = scenario(Climate::Temperate, 12_345, false);
    let centers = [
        (0_u32, 0.40 * 40.0, 0.35 * 30.0, 4.0, ResourceKind::Green),
        (1, 0.65 * 40.0, 0.60 * 30.0, 4.0, ResourceKind::Green),
        (2, 0.85 * 40.0, 0.45 * 30.0, 3.0, ResourceKind::Green),
        (3, 0.50 * 40.0, 0.75 * 30.0, 3.0, ResourceKind::Blue),
    ];

    assert_eq!(result.resource_fields.len(), 4);
    for (field, &(zone_id, cx, cy, radius, kind)) in result.resource_fields.iter().zip(&centers) {
        assert_eq!(field.zone_id, zone_id);
        assert_eq!(field.kind, kind);
        assert!(!field.is_empty());
        for tile in &field.tiles {
            let (dx, dy) = (tile.x as f64 - cx, tile.y as f64 - cy);
            assert!(
                (dx * dx + dy * dy).sqrt() <= radius + 0.5,
                "zone {zone_id} tile ({}, {}) strays from its center",
                tile.x,
                tile.y
            );
        }
    }
}

#[test]
fn test_scenario_temperate_and_arctic_share_terrain() {
    let temperate = scenario(Climate::Temperate, 99, true);
    let arctic = scenario(Climate::Arctic, 99, true);
    assert_eq!(temperate.grid, arctic.grid);
    assert_eq!(arctic.metadata.temperature_range, (-30, 0));
}

#[test]
fn test_scenario_quality_metrics_stay_in_range() {
    for climate in Climate::ALL {
        let quality = scenario(climate, 12_345, true).metadata.quality;
        for (name, value) in [
            ("coherence", quality.terrain_coherence),
            ("resource", quality.resource_balance),
            ("buildable", quality.buildable_area),
            ("strategic", quality.strategic_balance),
            ("overall", quality.overall_score),
        ] {
            assert!((0.0..=100.0).contains(&value), "{climate}: {name}={value}");
        }
    }
}
