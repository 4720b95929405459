//! High-level map generation entry point: input checks, then the pass pipeline.

mod pipeline;

use crate::error::MapGenError;

use super::MAX_MAP_CELLS;
use super::climate::ClimateConfig;
use super::model::GenerationResult;
use super::options::GenerationOptions;
use super::wfc::WfcRules;
use pipeline::{PipelineContext, run_pipeline};

/// Holds the read-only climate table and WFC rules for one option set.
///
/// `generate` borrows `self` immutably, so one generator can serve many calls and separate
/// generators can run on separate threads.
pub struct MapGenerator {
    options: GenerationOptions,
    climate: ClimateConfig,
    wfc_rules: WfcRules,
}

impl MapGenerator {
    pub fn new(options: GenerationOptions) -> Self {
        let climate = options.climate.config();
        let wfc_rules = WfcRules::for_climate(&climate);
        Self { options, climate, wfc_rules }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn generate(&self, width: usize, height: usize) -> Result<GenerationResult, MapGenError> {
        check_dimensions(width, height)?;
        tracing::debug!(
            target: "rts_mapgen::generate",
            width,
            height,
            seed = self.options.seed,
            climate = %self.options.climate,
            use_wfc = self.options.use_wfc,
            "mapgen.generate.start"
        );

        let result = run_pipeline(&PipelineContext {
            width,
            height,
            options: &self.options,
            climate: &self.climate,
            wfc_rules: &self.wfc_rules,
        });

        tracing::info!(
            target: "rts_mapgen::generate",
            method = ?result.metadata.generation_method,
            overall_score = result.metadata.quality.overall_score,
            fields = result.resource_fields.len(),
            "mapgen.generate.done"
        );
        Ok(result)
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), MapGenError> {
    let cells = width.checked_mul(height);
    match cells {
        Some(cells) if width > 0 && height > 0 && cells <= MAX_MAP_CELLS => Ok(()),
        _ => Err(MapGenError::InvalidDimensions { width, height }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use proptest::prelude::*;
    use xxhash_rust::xxh3::xxh3_64;

    use super::*;
    use crate::mapgen::climate::Climate;
    use crate::mapgen::model::ResourceField;
    use crate::mapgen::validate::water_bodies;
    use crate::types::{GenerationMethod, TerrainCategory};

    fn generate(options: GenerationOptions) -> GenerationResult {
        MapGenerator::new(options).generate(40, 30).expect("40x30 is a valid size")
    }

    #[test]
    fn zero_and_oversized_dimensions_are_rejected() {
        let generator = MapGenerator::new(GenerationOptions::default());
        for (width, height) in [(0, 10), (10, 0), (513, 513), (usize::MAX, 2)] {
            assert_eq!(
                generator.generate(width, height),
                Err(MapGenError::InvalidDimensions { width, height })
            );
        }
        assert_eq!(check_dimensions(512, 512), Ok(()));
    }

    #[test]
    fn tiny_maps_still_generate() {
        let generator = MapGenerator::new(GenerationOptions::default());
        for (width, height) in [(1, 1), (2, 5), (7, 3)] {
            let result = generator.generate(width, height).expect("small maps are valid");
            assert_eq!(result.grid.tiles().len(), width * height);
        }
    }

    #[test]
    fn same_inputs_produce_byte_identical_maps() {
        let options = GenerationOptions::default().with_seed(123_456);
        assert_eq!(generate(options.clone()).canonical_bytes(), generate(options).canonical_bytes());
    }

    #[test]
    fn one_generator_reused_across_calls_is_stable() {
        let generator = MapGenerator::new(GenerationOptions::default());
        let first = generator.generate(40, 30).expect("valid");
        let second = generator.generate(40, 30).expect("valid");
        assert_eq!(xxh3_64(&first.canonical_bytes()), xxh3_64(&second.canonical_bytes()));
    }

    #[test]
    fn wfc_runs_report_their_method_and_fallback_consistently() {
        for seed in [1_u64, 2, 3, 12_345] {
            let result = generate(GenerationOptions { use_wfc: true, seed, ..Default::default() });
            match result.metadata.generation_method {
                GenerationMethod::Wfc => assert!(!result.metadata.wfc_fallback),
                GenerationMethod::Classic => assert!(result.metadata.wfc_fallback),
            }
        }
        let classic = generate(GenerationOptions::default());
        assert_eq!(classic.metadata.generation_method, GenerationMethod::Classic);
        assert!(!classic.metadata.wfc_fallback);
    }

    #[test]
    fn validation_removes_every_small_water_body() {
        for seed in 0..20 {
            for use_wfc in [false, true] {
                let result = generate(GenerationOptions { use_wfc, seed, ..Default::default() });
                for body in water_bodies(&result.grid) {
                    assert!(body.len() >= 4, "seed={seed} wfc={use_wfc}: puddle of {}", body.len());
                }
            }
        }
    }

    #[test]
    fn metadata_carries_climate_information() {
        let result = generate(GenerationOptions::default().with_climate(Climate::Arctic));
        assert_eq!(result.metadata.climate, Climate::Arctic);
        assert_eq!(result.metadata.temperature_range, Climate::Arctic.config().temperature_range);
        assert_eq!((result.metadata.width, result.metadata.height), (40, 30));
    }

    #[test]
    fn arctic_and_temperate_classic_maps_are_identical() {
        let temperate = generate(GenerationOptions::default().with_climate(Climate::Temperate));
        let arctic = generate(GenerationOptions::default().with_climate(Climate::Arctic));
        assert_eq!(temperate.grid, arctic.grid);
        assert_eq!(temperate.resource_fields, arctic.resource_fields);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]
        #[test]
        fn resource_fields_are_connected_and_disjoint(
            seed in any::<u64>(),
            resource_balance in any::<bool>(),
            enable_validation in any::<bool>(),
        ) {
            let result = generate(GenerationOptions {
                seed,
                resource_balance,
                enable_validation,
                ..Default::default()
            });

            let mut zone_ids = BTreeSet::new();
            let mut cells = BTreeSet::new();
            for field in &result.resource_fields {
                prop_assert!(!field.is_empty());
                prop_assert!(zone_ids.insert(field.zone_id));
                for tile in &field.tiles {
                    prop_assert!(cells.insert((tile.x, tile.y)));
                    prop_assert!(result.grid.get(tile.x, tile.y).is_buildable());
                }
                prop_assert!(is_four_connected(field));
            }
            let categories_known =
                result.grid.tiles().iter().all(|tile| TerrainCategory::ALL.contains(&tile.category()));
            prop_assert!(categories_known);
        }
    }

    fn is_four_connected(field: &ResourceField) -> bool {
        let cells: BTreeSet<(usize, usize)> =
            field.tiles.iter().map(|tile| (tile.x, tile.y)).collect();
        let Some(&start) = cells.iter().next() else {
            return true;
        };
        let mut seen = BTreeSet::from([start]);
        let mut open = VecDeque::from([start]);
        while let Some((x, y)) = open.pop_front() {
            let neighbors = [
                x.checked_sub(1).map(|nx| (nx, y)),
                Some((x + 1, y)),
                y.checked_sub(1).map(|ny| (x, ny)),
                Some((x, y + 1)),
            ];
            for next in neighbors.into_iter().flatten() {
                if cells.contains(&next) && seen.insert(next) {
                    open.push_back(next);
                }
            }
        }
        seen.len() == cells.len()
    }
}
