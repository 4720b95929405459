use std::collections::{BTreeSet, VecDeque};

use anyhow::{Result, bail, ensure};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use rts_mapgen::{Climate, GenerationOptions, GenerationResult, TerrainCategory, generate_map};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of random maps to generate and check
    #[arg(short, long, default_value_t = 200)]
    count: u32,
    #[arg(long, default_value_t = 96)]
    max_side: usize,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn coin(rng: &mut ChaCha8Rng) -> bool {
    rng.next_u64() & 1 == 1
}

fn side(rng: &mut ChaCha8Rng, max_side: usize) -> usize {
    8 + rng.next_u64() as usize % max_side.saturating_sub(7).max(1)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    println!("Sweeping {} maps from seed {}...", args.count, args.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut fallbacks = 0;
    let mut below_threshold = 0;

    for run in 0..args.count {
        let width = side(&mut rng, args.max_side);
        let height = side(&mut rng, args.max_side);
        let options = GenerationOptions {
            use_wfc: coin(&mut rng),
            climate: choose(&mut rng, &Climate::ALL),
            resource_balance: coin(&mut rng),
            enable_validation: coin(&mut rng),
            seed: rng.next_u64(),
            ..GenerationOptions::default()
        };

        let result = generate_map(width, height, &options)?;
        let again = generate_map(width, height, &options)?;
        ensure!(
            result.canonical_bytes() == again.canonical_bytes(),
            "run {run}: {width}x{height} {options:?} is not reproducible"
        );
        if let Err(violation) = check_invariants(&result, &options) {
            bail!("run {run}: {width}x{height} {options:?}: {violation}");
        }

        fallbacks += usize::from(result.metadata.wfc_fallback);
        below_threshold += usize::from(result.metadata.quality.overall_score < options.quality_threshold);
    }

    println!(
        "Sweep completed: {} maps, {} wfc fallbacks, {} below quality threshold.",
        args.count, fallbacks, below_threshold
    );
    Ok(())
}

fn check_invariants(result: &GenerationResult, options: &GenerationOptions) -> Result<()> {
    let grid = &result.grid;
    ensure!(grid.tiles().len() == grid.width() * grid.height(), "grid has the wrong cell count");

    let mut claimed = BTreeSet::new();
    for field in &result.resource_fields {
        ensure!(!field.is_empty(), "zone {} produced an empty field", field.zone_id);
        for tile in &field.tiles {
            ensure!(
                grid.get(tile.x, tile.y).is_buildable(),
                "resource at ({}, {}) sits on {}",
                tile.x,
                tile.y,
                grid.get(tile.x, tile.y)
            );
            ensure!(claimed.insert((tile.x, tile.y)), "({}, {}) shared", tile.x, tile.y);
        }
        let cells: BTreeSet<(usize, usize)> = field.tiles.iter().map(|t| (t.x, t.y)).collect();
        let reachable = cells.iter().any(|&(x, y)| {
            neighbors(x, y, grid.width(), grid.height())
                .any(|(nx, ny)| !cells.contains(&(nx, ny)) && grid.get(nx, ny).is_buildable())
        });
        ensure!(reachable, "zone {} field is sealed in", field.zone_id);
    }

    if options.enable_validation {
        if let Some(size) = smallest_water_body(result) {
            ensure!(size >= 4, "a {size}-cell pond survived validation");
        }
        if options.resource_balance {
            let ratio = grid.buildable_ratio();
            ensure!(ratio >= 0.6, "buildable ratio {ratio}");
        }
    }

    let quality = &result.metadata.quality;
    for score in [
        quality.terrain_coherence,
        quality.resource_balance,
        quality.buildable_area,
        quality.strategic_balance,
        quality.overall_score,
    ] {
        ensure!((0.0..=100.0).contains(&score), "score {score} out of range");
    }
    Ok(())
}

fn neighbors(x: usize, y: usize, width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    [
        x.checked_sub(1).map(|nx| (nx, y)),
        (x + 1 < width).then_some((x + 1, y)),
        y.checked_sub(1).map(|ny| (x, ny)),
        (y + 1 < height).then_some((x, y + 1)),
    ]
    .into_iter()
    .flatten()
}

fn smallest_water_body(result: &GenerationResult) -> Option<usize> {
    let grid = &result.grid;
    let (width, height) = (grid.width(), grid.height());
    let is_water = |(x, y): (usize, usize)| grid.category_at(x, y) == TerrainCategory::Water;
    let mut seen = BTreeSet::new();
    let mut smallest = None;
    for y in 0..height {
        for x in 0..width {
            if !is_water((x, y)) || !seen.insert((x, y)) {
                continue;
            }
            let mut open = VecDeque::from([(x, y)]);
            let mut size = 0;
            while let Some((cx, cy)) = open.pop_front() {
                size += 1;
                for next in neighbors(cx, cy, width, height) {
                    if is_water(next) && seen.insert(next) {
                        open.push_back(next);
                    }
                }
            }
            smallest = Some(smallest.map_or(size, |best: usize| best.min(size)));
        }
    }
    smallest
}
