//! Procedural RTS battlefield generation split into coherent submodules.

pub mod climate;
pub mod model;
pub mod options;

mod classic;
mod generator;
mod grid;
mod quality;
mod resources;
mod seed;
mod strategic;
mod validate;
mod wfc;

pub use climate::{Climate, ClimateConfig};
pub use generator::MapGenerator;
pub use grid::TileGrid;
pub use model::{GenerationMetadata, GenerationResult, QualityMetrics, ResourceField, ResourceTile};
pub use options::GenerationOptions;

use crate::error::MapGenError;

/// Largest accepted `width * height` (a 512x512 map).
pub const MAX_MAP_CELLS: usize = 512 * 512;

pub fn generate_map(
    width: usize,
    height: usize,
    options: &GenerationOptions,
) -> Result<GenerationResult, MapGenError> {
    MapGenerator::new(options.clone()).generate(width, height)
}
