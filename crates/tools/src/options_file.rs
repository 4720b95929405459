//! TOML options files for the `mapgen` binary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rts_mapgen::GenerationOptions;

/// Reads a `GenerationOptions` table; missing keys keep their defaults.
pub fn load(path: &Path) -> Result<GenerationOptions> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    let options = parse(&content)
        .with_context(|| format!("failed to parse options file {}", path.display()))?;
    tracing::debug!(
        target: "mapgen::cli",
        path = %path.display(),
        seed = options.seed,
        climate = %options.climate,
        "mapgen.cli.options_loaded"
    );
    Ok(options)
}

pub fn parse(content: &str) -> Result<GenerationOptions> {
    let options: GenerationOptions = toml::from_str(content)?;
    Ok(options)
}
