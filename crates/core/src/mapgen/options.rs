//! Caller-facing generation options.

use serde::{Deserialize, Serialize};

use super::climate::Climate;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Build the base terrain with wave function collapse instead of layered noise.
    pub use_wfc: bool,
    pub climate: Climate,
    /// Replace the fixed deposit list with symmetric, validated resource zones.
    pub resource_balance: bool,
    pub enable_validation: bool,
    /// Overall scores below this are logged; the map is returned regardless.
    pub quality_threshold: f64,
    pub seed: u64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            use_wfc: false,
            climate: Climate::Temperate,
            resource_balance: true,
            enable_validation: true,
            quality_threshold: 60.0,
            seed: 12_345,
        }
    }
}

impl GenerationOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_climate(mut self, climate: Climate) -> Self {
        self.climate = climate;
        self
    }
}
