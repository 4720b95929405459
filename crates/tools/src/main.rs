use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rts_mapgen::{Climate, GenerationOptions, GenerationResult, TerrainCategory, generate_map};
use tracing_subscriber::EnvFilter;

mod options_file;

/// Generates one RTS battlefield and prints a summary or the full JSON result.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value_t = 40)]
    width: usize,
    #[arg(long, default_value_t = 30)]
    height: usize,
    /// TOML file holding `GenerationOptions`; flags below override it
    #[arg(short, long)]
    options: Option<PathBuf>,
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(short, long)]
    climate: Option<Climate>,
    /// Try wave function collapse before the classic passes
    #[arg(long)]
    wfc: bool,
    #[arg(long)]
    no_resource_balance: bool,
    #[arg(long)]
    no_validation: bool,
    #[arg(long)]
    quality_threshold: Option<f64>,
    /// Print the serialized result instead of the summary
    #[arg(long)]
    json: bool,
}

impl Args {
    fn resolve_options(&self) -> Result<GenerationOptions> {
        let mut options = match &self.options {
            Some(path) => options_file::load(path)?,
            None => GenerationOptions::default(),
        };
        if let Some(seed) = self.seed {
            options.seed = seed;
        }
        if let Some(climate) = self.climate {
            options.climate = climate;
        }
        if let Some(threshold) = self.quality_threshold {
            options.quality_threshold = threshold;
        }
        options.use_wfc |= self.wfc;
        options.resource_balance &= !self.no_resource_balance;
        options.enable_validation &= !self.no_validation;
        Ok(options)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let options = args.resolve_options()?;
    let result = generate_map(args.width, args.height, &options)
        .with_context(|| format!("failed to generate a {}x{} map", args.width, args.height))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }
    Ok(())
}

fn print_summary(result: &GenerationResult) {
    let metadata = &result.metadata;
    let quality = &metadata.quality;
    println!(
        "{}x{} {} map, seed {}, method {:?}{}",
        metadata.width,
        metadata.height,
        metadata.climate,
        metadata.seed,
        metadata.generation_method,
        if metadata.wfc_fallback { " (wfc fell back)" } else { "" }
    );
    println!(
        "Quality: overall {:.1} | coherence {:.1} | resources {:.1} | buildable {:.1} | strategic {:.1}",
        quality.overall_score,
        quality.terrain_coherence,
        quality.resource_balance,
        quality.buildable_area,
        quality.strategic_balance
    );
    println!(
        "Validation: {} pass(es), {} issue(s) remaining",
        metadata.validation_passes, metadata.remaining_issues
    );

    let counts: Vec<String> = TerrainCategory::ALL
        .iter()
        .map(|&category| format!("{category} {}", result.grid.count_category(category)))
        .collect();
    println!("Terrain: {}", counts.join(", "));

    println!("Resource fields: {}", result.resource_fields.len());
    for field in &result.resource_fields {
        println!("  zone {} {:?}: {} tiles", field.zone_id, field.kind, field.len());
    }
    println!("Fingerprint: {:016x}", result.fingerprint());
}
