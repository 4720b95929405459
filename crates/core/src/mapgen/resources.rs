//! Tiberium deposits: the fixed deposit list, balanced zones, and field clean-up.

use std::collections::{BTreeSet, VecDeque};

use crate::types::ResourceKind;

use super::classic::{Blob, is_protected};
use super::grid::{TileGrid, disc_bounds, distance};
use super::model::{ResourceField, ResourceTile};
use super::seed::noise;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ZoneTier {
    Base,
    Contested,
    Expansion,
    Fixed,
}

/// Placement target for one resource field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ResourceZone {
    pub(super) id: u32,
    pub(super) kind: ResourceKind,
    pub(super) tier: ZoneTier,
    pub(super) blob: Blob,
}

const fn zone(id: u32, kind: ResourceKind, tier: ZoneTier, blob: Blob) -> ResourceZone {
    ResourceZone { id, kind, tier, blob }
}

pub(super) const FIXED_DEPOSITS: [ResourceZone; 4] = [
    zone(0, ResourceKind::Green, ZoneTier::Fixed, Blob::new(0.40, 0.35, 4.0)),
    zone(1, ResourceKind::Green, ZoneTier::Fixed, Blob::new(0.65, 0.60, 4.0)),
    zone(2, ResourceKind::Green, ZoneTier::Fixed, Blob::new(0.85, 0.45, 3.0)),
    zone(3, ResourceKind::Blue, ZoneTier::Fixed, Blob::new(0.50, 0.75, 3.0)),
];

const BALANCED_ZONES: [ResourceZone; 7] = [
    zone(0, ResourceKind::Green, ZoneTier::Base, Blob::new(0.2, 0.3, 3.0)),
    zone(1, ResourceKind::Green, ZoneTier::Base, Blob::new(0.8, 0.7, 3.0)),
    zone(2, ResourceKind::Blue, ZoneTier::Contested, Blob::new(0.5, 0.5, 4.0)),
    zone(3, ResourceKind::Green, ZoneTier::Contested, Blob::new(0.3, 0.7, 2.0)),
    zone(4, ResourceKind::Green, ZoneTier::Contested, Blob::new(0.7, 0.3, 2.0)),
    zone(5, ResourceKind::Green, ZoneTier::Expansion, Blob::new(0.1, 0.8, 2.0)),
    zone(6, ResourceKind::Green, ZoneTier::Expansion, Blob::new(0.9, 0.2, 2.0)),
];

const ZONE_MARGIN: i64 = 3;
const ZONE_MIN_BUILDABLE: f64 = 0.4;
const MIN_DENSITY: f64 = 0.3;

/// Balanced zones whose surroundings are buildable enough to host a base.
pub(super) fn balanced_zones(grid: &TileGrid) -> Vec<ResourceZone> {
    BALANCED_ZONES
        .into_iter()
        .filter(|zone| {
            let fraction = zone_buildable_fraction(grid, zone);
            let accepted = fraction >= ZONE_MIN_BUILDABLE;
            if !accepted {
                tracing::debug!(
                    target: "rts_mapgen::resources",
                    zone_id = zone.id,
                    tier = ?zone.tier,
                    buildable_fraction = fraction,
                    "mapgen.resources.zone_rejected"
                );
            }
            accepted
        })
        .collect()
}

/// Buildable share of the in-bounds cells in the `2 * (radius + 3) + 1` square around a zone.
pub(super) fn zone_buildable_fraction(grid: &TileGrid, zone: &ResourceZone) -> f64 {
    let (cx, cy) = zone.blob.center(grid.width(), grid.height());
    let half = zone.blob.radius(grid.width(), grid.height()).floor() as i64 + ZONE_MARGIN;
    let (cx, cy) = (cx.floor() as i64, cy.floor() as i64);

    let mut total = 0_usize;
    let mut buildable = 0_usize;
    for y in (cy - half)..=(cy + half) {
        for x in (cx - half)..=(cx + half) {
            if !grid.contains(x, y) {
                continue;
            }
            total += 1;
            if grid.get(x as usize, y as usize).is_buildable() {
                buildable += 1;
            }
        }
    }
    if total == 0 { 0.0 } else { buildable as f64 / total as f64 }
}

/// Lays down one field per zone on unprotected cells not claimed by an earlier zone.
pub(super) fn place_deposits(
    grid: &TileGrid,
    zones: &[ResourceZone],
    seed: u64,
) -> Vec<ResourceField> {
    let (width, height) = (grid.width(), grid.height());
    let mut claimed = vec![false; width * height];
    let mut fields = Vec::with_capacity(zones.len());

    for zone in zones {
        let (cx, cy) = zone.blob.center(width, height);
        let radius = zone.blob.radius(width, height);
        let mut tiles = Vec::new();
        for (x, y) in disc_bounds(width, height, cx, cy, radius + 0.5) {
            let index = grid.index(x, y);
            if claimed[index] || is_protected(grid.category_at(x, y)) {
                continue;
            }
            let d = distance(x, y, cx, cy);
            let limit = radius + 0.3 * noise(seed, x as f64 * 0.25 + 57.0, y as f64 * 0.25 + 91.0);
            if d >= limit {
                continue;
            }
            claimed[index] = true;
            tiles.push(ResourceTile {
                x,
                y,
                kind: zone.kind,
                density: (1.0 - d / radius).max(MIN_DENSITY),
                zone_id: zone.id,
            });
        }
        fields.push(ResourceField { zone_id: zone.id, kind: zone.kind, tiles });
    }
    fields
}

/// Drops tiles that lost their buildable ground, keeps each field's largest 4-connected
/// component, and removes fields left empty.
pub(super) fn finalize_fields(grid: &TileGrid, fields: Vec<ResourceField>) -> Vec<ResourceField> {
    fields
        .into_iter()
        .filter_map(|mut field| {
            field.tiles.retain(|tile| grid.get(tile.x, tile.y).is_buildable());
            field.tiles = largest_component(field.tiles);
            (!field.is_empty()).then_some(field)
        })
        .collect()
}

fn largest_component(tiles: Vec<ResourceTile>) -> Vec<ResourceTile> {
    let cells: BTreeSet<(usize, usize)> = tiles.iter().map(|tile| (tile.y, tile.x)).collect();
    let mut seen = BTreeSet::new();
    let mut best: BTreeSet<(usize, usize)> = BTreeSet::new();

    for tile in &tiles {
        let start = (tile.y, tile.x);
        if seen.contains(&start) {
            continue;
        }
        let mut component = BTreeSet::from([start]);
        let mut open = VecDeque::from([start]);
        seen.insert(start);
        while let Some((y, x)) = open.pop_front() {
            let candidates = [
                y.checked_sub(1).map(|ny| (ny, x)),
                Some((y, x + 1)),
                Some((y + 1, x)),
                x.checked_sub(1).map(|nx| (y, nx)),
            ];
            for next in candidates.into_iter().flatten() {
                if cells.contains(&next) && seen.insert(next) {
                    component.insert(next);
                    open.push_back(next);
                }
            }
        }
        if component.len() > best.len() {
            best = component;
        }
    }

    tiles.into_iter().filter(|tile| best.contains(&(tile.y, tile.x))).collect()
}

/// A field is reachable when some 4-neighbour outside it is buildable.
pub(super) fn has_buildable_access(grid: &TileGrid, field: &ResourceField) -> bool {
    field.tiles.iter().any(|tile| {
        grid.cardinal_neighbors(tile.x, tile.y)
            .any(|(nx, ny)| !field.contains(nx, ny) && grid.get(nx, ny).is_buildable())
    })
}

/// Final guard: fields that are still sealed off are discarded.
pub(super) fn retain_accessible_fields(
    grid: &TileGrid,
    fields: Vec<ResourceField>,
) -> Vec<ResourceField> {
    fields
        .into_iter()
        .filter(|field| {
            let accessible = has_buildable_access(grid, field);
            if !accessible {
                tracing::debug!(
                    target: "rts_mapgen::resources",
                    zone_id = field.zone_id,
                    tiles = field.len(),
                    "mapgen.resources.field_dropped"
                );
            }
            accessible
        })
        .collect()
}
