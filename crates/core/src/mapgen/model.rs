//! Public data models for generated maps, resource fields, and quality reports.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{GenerationMethod, ResourceKind};

use super::climate::Climate;
use super::grid::TileGrid;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceTile {
    pub x: usize,
    pub y: usize,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub density: f64,
    pub zone_id: u32,
}

/// A 4-connected cluster of resource tiles sharing one zone id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceField {
    pub zone_id: u32,
    pub kind: ResourceKind,
    pub tiles: Vec<ResourceTile>,
}

impl ResourceField {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.tiles.iter().any(|tile| tile.x == x && tile.y == y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct QualityMetrics {
    pub terrain_coherence: f64,
    pub resource_balance: f64,
    pub buildable_area: f64,
    pub strategic_balance: f64,
    pub overall_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationMetadata {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub climate: Climate,
    pub temperature_range: (i32, i32),
    pub humidity_range: (i32, i32),
    pub quality: QualityMetrics,
    pub generation_method: GenerationMethod,
    /// Set when a WFC attempt hit a contradiction and the classic pipeline took over.
    pub wfc_fallback: bool,
    pub validation_passes: u8,
    pub remaining_issues: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationResult {
    pub grid: TileGrid,
    pub resource_fields: Vec<ResourceField>,
    pub metadata: GenerationMetadata,
}

impl GenerationResult {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.grid.width() as u32).to_le_bytes());
        bytes.extend((self.grid.height() as u32).to_le_bytes());
        bytes.extend(self.grid.tiles().iter().map(|tile| tile.index()));

        bytes.extend((self.resource_fields.len() as u32).to_le_bytes());
        for field in &self.resource_fields {
            bytes.extend(field.zone_id.to_le_bytes());
            bytes.push(resource_kind_code(field.kind));
            bytes.extend((field.tiles.len() as u32).to_le_bytes());
            for tile in &field.tiles {
                bytes.extend((tile.x as u32).to_le_bytes());
                bytes.extend((tile.y as u32).to_le_bytes());
                bytes.push(resource_kind_code(tile.kind));
                bytes.extend(tile.density.to_bits().to_le_bytes());
            }
        }

        let metadata = &self.metadata;
        bytes.extend(metadata.seed.to_le_bytes());
        bytes.push(match metadata.climate {
            Climate::Desert => 0,
            Climate::Temperate => 1,
            Climate::Arctic => 2,
            Climate::Volcanic => 3,
        });
        bytes.push(match metadata.generation_method {
            GenerationMethod::Wfc => 0,
            GenerationMethod::Classic => 1,
        });
        bytes.push(u8::from(metadata.wfc_fallback));
        bytes.push(metadata.validation_passes);
        bytes.extend((metadata.remaining_issues as u32).to_le_bytes());
        let quality = &metadata.quality;
        for score in [
            quality.terrain_coherence,
            quality.resource_balance,
            quality.buildable_area,
            quality.strategic_balance,
            quality.overall_score,
        ] {
            bytes.extend(score.to_bits().to_le_bytes());
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn resource_tile_count(&self) -> usize {
        self.resource_fields.iter().map(ResourceField::len).sum()
    }
}

fn resource_kind_code(kind: ResourceKind) -> u8 {
    match kind {
        ResourceKind::Green => 0,
        ResourceKind::Blue => 1,
    }
}
