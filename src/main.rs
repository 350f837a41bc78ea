use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use ndarray::Array2;

use phaseflow::graph::digraph::Digraph;
use phaseflow::graph::rectangular_grid_graph::RectangularGridGraph;
use phaseflow::unwrap::unwrap_phase::unwrap_phase_with_costs;

/// Unwraps a wrapped-phase raster by routing its residues through a
/// minimum-cost network flow.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Input raster of little-endian f32 wrapped-phase samples, row-major
    input: PathBuf,

    /// Output path for the unwrapped raster (little-endian f32, row-major)
    #[arg(short, long)]
    output: PathBuf,

    /// Number of rows in the raster
    #[arg(long)]
    rows: usize,

    /// Number of columns in the raster
    #[arg(long)]
    cols: usize,

    /// Iteration limit for the primal-dual phase (0 = unbounded)
    #[arg(long, default_value_t = 0)]
    maxiter: usize,
}

fn main() -> Result<()> {
    Builder::new().filter_level(LevelFilter::Info).init();

    let cli = Cli::parse();
    log::info!("phaseflow starting");

    let bytes = fs::read(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let expected = 4 * cli.rows * cli.cols;
    if bytes.len() != expected {
        return Err(anyhow!(
            "expected {} bytes for a {}x{} f32 raster, {} has {}",
            expected,
            cli.rows,
            cli.cols,
            cli.input.display(),
            bytes.len()
        ));
    }
    let samples: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    let wrapped = Array2::from_shape_vec((cli.rows, cli.cols), samples)?;

    let dual_grid = RectangularGridGraph::new(cli.rows + 1, cli.cols + 1);
    let costs = vec![1i64; dual_grid.num_edges()];
    let unwrapped = unwrap_phase_with_costs(wrapped.view(), &costs, cli.maxiter)
        .context("unwrapping the input raster")?;

    let mut out = Vec::with_capacity(4 * unwrapped.len());
    for &sample in unwrapped.iter() {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    fs::write(&cli.output, out)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    log::info!("wrote {}", cli.output.display());

    Ok(())
}
