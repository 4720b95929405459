//! Map-construction pipeline that composes the terrain, feature, resource and validation passes.

use crate::types::GenerationMethod;

use super::super::classic::{build_classic_terrain, paint_dirt_patches, smooth_transitions, vary_details};
use super::super::climate::{ClimateConfig, apply_climate};
use super::super::grid::TileGrid;
use super::super::model::{GenerationMetadata, GenerationResult};
use super::super::options::GenerationOptions;
use super::super::quality;
use super::super::resources::{
    FIXED_DEPOSITS, balanced_zones, finalize_fields, place_deposits, retain_accessible_fields,
};
use super::super::strategic::apply_strategic_features;
use super::super::validate::{ValidationReport, validate_and_optimize};
use super::super::wfc::{WfcRules, solve};

pub(super) struct PipelineContext<'a> {
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) options: &'a GenerationOptions,
    pub(super) climate: &'a ClimateConfig,
    pub(super) wfc_rules: &'a WfcRules,
}

pub(super) fn run_pipeline(context: &PipelineContext<'_>) -> GenerationResult {
    let PipelineContext { width, height, options, climate, .. } = *context;
    let seed = options.seed;

    let (mut grid, generation_method, wfc_fallback) = build_base_terrain(context);
    paint_dirt_patches(&mut grid, seed);
    apply_climate(&mut grid, options.climate, seed);
    apply_strategic_features(&mut grid, seed);

    let zones =
        if options.resource_balance { balanced_zones(&grid) } else { FIXED_DEPOSITS.to_vec() };
    let fields = place_deposits(&grid, &zones, seed);

    smooth_transitions(&mut grid, seed);
    vary_details(&mut grid, seed);
    let fields = finalize_fields(&grid, fields);

    let report = if options.enable_validation {
        validate_and_optimize(&mut grid, &fields, seed)
    } else {
        ValidationReport::default()
    };
    let resource_fields = retain_accessible_fields(&grid, fields);

    let quality = quality::score(&grid, &resource_fields);
    if quality.overall_score < options.quality_threshold {
        tracing::warn!(
            target: "rts_mapgen::quality",
            overall_score = quality.overall_score,
            threshold = options.quality_threshold,
            seed,
            "mapgen.quality.below_threshold"
        );
    }

    GenerationResult {
        grid,
        resource_fields,
        metadata: GenerationMetadata {
            width,
            height,
            seed,
            climate: options.climate,
            temperature_range: climate.temperature_range,
            humidity_range: climate.humidity_range,
            quality,
            generation_method,
            wfc_fallback,
            validation_passes: report.passes,
            remaining_issues: report.remaining_issues,
        },
    }
}

fn build_base_terrain(context: &PipelineContext<'_>) -> (TileGrid, GenerationMethod, bool) {
    let PipelineContext { width, height, options, climate, wfc_rules } = *context;
    if !options.use_wfc {
        let grid = build_classic_terrain(width, height, options.seed, climate);
        return (grid, GenerationMethod::Classic, false);
    }

    match solve(width, height, options.seed, wfc_rules) {
        Ok(grid) => (grid, GenerationMethod::Wfc, false),
        Err(contradiction) => {
            tracing::info!(
                target: "rts_mapgen::wfc",
                x = contradiction.x,
                y = contradiction.y,
                seed = options.seed,
                "mapgen.wfc.fallback"
            );
            let grid = build_classic_terrain(width, height, options.seed, climate);
            (grid, GenerationMethod::Classic, true)
        }
    }
}
