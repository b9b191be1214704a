//! Latch Grid Runtime
//!
//! Command-line driver for the grid: loads settings, then reports the cell,
//! cell origin and packed ID of each world point.
//!
//! ```text
//! latch-grid [--settings <file.json>] <x> <y> <z> [<x> <y> <z> ...]
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use latch_grid::math::DVec3;
use latch_services::Settings;
use std::path::PathBuf;

/// Report grid cells and packed IDs for world points.
#[derive(Parser, Debug)]
#[command(name = "latch-grid")]
#[command(about = "Maps world points to grid cells and packed cell IDs")]
struct Args {
    /// Path to a JSON settings file (default: uniform 32 unit grid).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// World coordinates as x y z triples.
    #[arg(allow_negative_numbers = true)]
    coords: Vec<f64>,
}

impl Args {
    fn points(&self) -> Result<Vec<DVec3>> {
        if self.coords.len() % 3 != 0 {
            bail!("expected x y z triples, got {} coordinates", self.coords.len());
        }
        Ok(self
            .coords
            .chunks_exact(3)
            .map(|c| DVec3::new(c[0], c[1], c[2]))
            .collect())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let points = args.points()?;
    let settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    latch_services::init_services(&settings)?;

    let grid = &settings.grid;
    tracing::info!("Latch Grid v{}", latch_grid::VERSION);
    tracing::info!(
        %grid,
        bits = %grid.bit_allocation(),
        dimensions = grid.dimensions(),
        "grid ready"
    );

    for world in points {
        let cell = grid.containing_cell(world);
        let id = grid.cell_to_id(cell.cell());
        println!(
            "{world} -> cell {cell} origin {} id {id:#018x} local {}",
            cell.world_origin(),
            cell.world_to_local(world)
        );
        if grid.id_to_cell(id) != cell.cell() {
            tracing::warn!(%cell, id, "cell does not fit the bit allocation and was truncated");
        }
    }

    Ok(())
}
