//! Post-generation validation: detect playability issues and repair them in bounded passes.

use std::collections::VecDeque;

use crate::types::TerrainCategory;

use super::grid::{CARDINAL_OFFSETS, TileGrid};
use super::model::ResourceField;
use super::resources::has_buildable_access;
use super::seed::random;

pub(super) const MAX_VALIDATION_PASSES: u8 = 3;
pub(super) const MIN_BUILDABLE_RATIO: f64 = 0.6;
const MIN_WATER_BODY: usize = 4;
const WATER_TO_SHORE_CHANCE: f64 = 0.5;
const TREE_CLEARING_CHANCE: f64 = 0.3;
const ACCESS_CLEARING_REACH: i64 = 3;

#[derive(Clone, Debug, PartialEq)]
pub(super) enum ValidationIssue {
    /// Cell indices of a water body too small to read as a lake.
    IsolatedWater { cells: Vec<usize> },
    InsufficientBuildable { ratio: f64 },
    InaccessibleResource { field_index: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct ValidationReport {
    pub(super) passes: u8,
    pub(super) remaining_issues: usize,
    pub(super) floor_enforced: bool,
}

pub(super) fn validate_and_optimize(
    grid: &mut TileGrid,
    fields: &[ResourceField],
    seed: u64,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut issues = detect_issues(grid, fields);

    while !issues.is_empty() && report.passes < MAX_VALIDATION_PASSES {
        tracing::debug!(
            target: "rts_mapgen::validate",
            pass = report.passes,
            issues = issues.len(),
            "mapgen.validate.pass"
        );
        for issue in &issues {
            apply_fix(grid, fields, issue, seed, report.passes);
        }
        report.passes += 1;
        issues = detect_issues(grid, fields);
    }

    report.remaining_issues = issues.len();
    if !issues.is_empty() {
        tracing::warn!(
            target: "rts_mapgen::validate",
            passes = report.passes,
            remaining = issues.len(),
            "mapgen.validate.stall"
        );
    }
    report.floor_enforced = enforce_buildable_floor(grid);
    report
}

pub(super) fn detect_issues(grid: &TileGrid, fields: &[ResourceField]) -> Vec<ValidationIssue> {
    let mut issues: Vec<ValidationIssue> = water_bodies(grid)
        .into_iter()
        .filter(|cells| cells.len() < MIN_WATER_BODY)
        .map(|cells| ValidationIssue::IsolatedWater { cells })
        .collect();

    let ratio = grid.buildable_ratio();
    if ratio < MIN_BUILDABLE_RATIO {
        issues.push(ValidationIssue::InsufficientBuildable { ratio });
    }

    issues.extend(
        fields
            .iter()
            .enumerate()
            .filter(|(_, field)| !has_buildable_access(grid, field))
            .map(|(field_index, _)| ValidationIssue::InaccessibleResource { field_index }),
    );
    issues
}

/// 4-connected water components in row-major discovery order.
pub(super) fn water_bodies(grid: &TileGrid) -> Vec<Vec<usize>> {
    let (width, height) = (grid.width(), grid.height());
    let mut seen = vec![false; width * height];
    let mut bodies = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let start = grid.index(x, y);
            if seen[start] || grid.category_at(x, y) != TerrainCategory::Water {
                continue;
            }
            seen[start] = true;
            let mut body = vec![start];
            let mut open = VecDeque::from([(x, y)]);
            while let Some((cx, cy)) = open.pop_front() {
                for (nx, ny) in grid.cardinal_neighbors(cx, cy) {
                    let index = grid.index(nx, ny);
                    if !seen[index] && grid.category_at(nx, ny) == TerrainCategory::Water {
                        seen[index] = true;
                        body.push(index);
                        open.push_back((nx, ny));
                    }
                }
            }
            bodies.push(body);
        }
    }
    bodies
}

fn apply_fix(
    grid: &mut TileGrid,
    fields: &[ResourceField],
    issue: &ValidationIssue,
    seed: u64,
    pass: u8,
) {
    let stream = 14_000 + i64::from(pass) * 1_000;
    match issue {
        ValidationIssue::IsolatedWater { cells } => {
            for &index in cells {
                let (x, y) = grid.coords(index);
                let (xi, yi) = (x as i64, y as i64);
                let category = if random(seed, xi + stream, yi) < WATER_TO_SHORE_CHANCE {
                    TerrainCategory::Shore
                } else {
                    TerrainCategory::Sand
                };
                grid.set(x, y, category.pick(random(seed, xi + stream + 500, yi)));
            }
        }
        ValidationIssue::InsufficientBuildable { .. } => {
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    let (xi, yi) = (x as i64, y as i64);
                    if grid.category_at(x, y) == TerrainCategory::Tree
                        && random(seed, xi + stream + 100, yi) < TREE_CLEARING_CHANCE
                    {
                        let variant = random(seed, xi + stream + 600, yi);
                        grid.set(x, y, TerrainCategory::Sand.pick(variant));
                    }
                }
            }
        }
        ValidationIssue::InaccessibleResource { field_index } => {
            let Some(first) = fields.get(*field_index).and_then(|field| field.tiles.first())
            else {
                return;
            };
            for (dx, dy) in CARDINAL_OFFSETS {
                for step in 1..=ACCESS_CLEARING_REACH {
                    let Some((x, y)) = grid.offset(first.x, first.y, dx * step, dy * step) else {
                        break;
                    };
                    if matches!(grid.category_at(x, y), TerrainCategory::Rock | TerrainCategory::Tree)
                    {
                        let variant = random(seed, x as i64 + stream + 700, y as i64);
                        grid.set(x, y, TerrainCategory::Sand.pick(variant));
                    }
                }
            }
        }
    }
}

/// Clears trees, then rocks, then shore in row-major order until the buildable floor holds.
/// Whole water bodies go last, smallest first, so no new puddles appear.
fn enforce_buildable_floor(grid: &mut TileGrid) -> bool {
    let total = grid.tiles().len();
    let required = (MIN_BUILDABLE_RATIO * total as f64).ceil() as usize;
    let mut buildable = grid.buildable_count();
    if buildable >= required {
        return false;
    }

    let sand = TerrainCategory::Sand.pick(0.0);
    for category in [TerrainCategory::Tree, TerrainCategory::Rock, TerrainCategory::Shore] {
        for index in 0..total {
            if buildable >= required {
                return true;
            }
            let (x, y) = grid.coords(index);
            if grid.category_at(x, y) == category {
                grid.set(x, y, sand);
                buildable += 1;
            }
        }
    }

    let mut bodies = water_bodies(grid);
    bodies.sort_by_key(Vec::len);
    for body in bodies {
        if buildable >= required {
            break;
        }
        tracing::debug!(
            target: "rts_mapgen::validate",
            cells = body.len(),
            "mapgen.validate.water_drained"
        );
        for index in body {
            let (x, y) = grid.coords(index);
            grid.set(x, y, sand);
            buildable += 1;
        }
    }
    true
}
