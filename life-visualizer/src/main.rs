use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_ellipse_mut;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use life_common::{parse_color, Density, LifeConfig, Rgba8, Snapshot, SurfaceLayout};
use life_engine::{ChannelDisplay, Coordinator, CoordinatorSettings};
use log::{debug, info, LevelFilter};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long to wait for the simulation thread to publish one generation.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(30);

/// Command-line arguments for the visualizer
#[derive(Parser, Debug)]
#[command(author, version, about = "Renders Game of Life generations to PNG frames", long_about = None)]
struct Args {
    /// Optional path to a config.toml (grid size, scale, colors, default density)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of generations to render after the initial population
    #[arg(short, long, default_value_t = 100)]
    generations: u64,

    /// Initial population density in percent (defaults to the config's density)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=100))]
    density: Option<u32>,

    /// Output directory for the PNG frames
    #[arg(short, long, default_value = "frames")]
    output: PathBuf,

    /// Minimum number of frames handed to one rayon task
    #[arg(long, default_value_t = 10)]
    chunk_size: usize,
}

/// Cell and background colors resolved from the config.
#[derive(Debug, Clone, Copy)]
struct Palette {
    cell: Rgba8,
    background: Rgba8,
}

/// Draws one snapshot: a filled ellipse per live cell over the background.
fn draw_frame(snapshot: &Snapshot, layout: &SurfaceLayout, palette: Palette) -> RgbaImage {
    let (width, height) = layout.canvas_size();
    let mut image = ImageBuffer::from_pixel(width, height, Rgba(palette.background));
    let cell_color = Rgba(palette.cell);

    for (row, col) in snapshot.live_positions() {
        let cell = layout.cell_rect(row, col);
        // Keep the ellipse inside the cell's own pixels.
        let rx = ((cell.width - 1) / 2).max(0);
        let ry = ((cell.height - 1) / 2).max(0);
        let center = (cell.left + rx, cell.top + ry);
        draw_filled_ellipse_mut(&mut image, center, rx, ry, cell_color);
    }

    image
}

fn frame_path(output: &Path, generation: u64) -> PathBuf {
    output.join(format!("frame_{:05}.png", generation))
}

/// Runs a coordinator step by step and collects every published snapshot,
/// starting with the initial population.
fn simulate(settings: CoordinatorSettings, generations: u64) -> Result<Vec<Arc<Snapshot>>> {
    let (display, rx) = ChannelDisplay::new();
    let coordinator = Coordinator::spawn(settings, display)?;

    let initial = rx
        .recv_timeout(PUBLISH_TIMEOUT)
        .context("Simulation did not publish the initial population")?;
    let mut snapshots = Vec::with_capacity(generations as usize + 1);
    snapshots.push(initial);

    let bar = ProgressBar::new(generations);
    bar.set_style(
        ProgressStyle::with_template("simulating [{bar:40}] {pos}/{len} generations ({eta})")
            .context("Invalid progress bar template")?,
    );
    for _ in 0..generations {
        // One request per publish: requests made before the loop catches up would coalesce.
        coordinator.request_step();
        let snapshot = rx
            .recv_timeout(PUBLISH_TIMEOUT)
            .context("Simulation stopped publishing generations")?;
        debug!(
            "Generation {}: {} live cells.",
            snapshot.generation, snapshot.live_cells
        );
        snapshots.push(snapshot);
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(snapshots)
}

fn render_frames(
    snapshots: &[Arc<Snapshot>],
    layout: &SurfaceLayout,
    palette: Palette,
    output: &Path,
    chunk_size: usize,
) -> Result<()> {
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory '{}'", output.display()))?;

    let bar = ProgressBar::new(snapshots.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("rendering  [{bar:40}] {pos}/{len} frames ({eta})")
            .context("Invalid progress bar template")?,
    );

    snapshots
        .par_iter()
        .with_min_len(chunk_size.max(1))
        .progress_with(bar.clone())
        .try_for_each(|snapshot| -> Result<()> {
            let path = frame_path(output, snapshot.generation);
            draw_frame(snapshot, layout, palette)
                .save(&path)
                .with_context(|| format!("Failed to write frame '{}'", path.display()))
        })?;
    bar.finish_and_clear();

    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    run_with_args(args)
}

fn run_with_args(args: Args) -> Result<()> {
    // Initialize logger
    Builder::from_default_env()
        .filter(None, LevelFilter::Info)
        .init();

    info!("Starting Game of Life visualizer...");

    let config = match &args.config {
        Some(path) => LifeConfig::load(path)?,
        None => LifeConfig::default(),
    };
    let mut settings = CoordinatorSettings::from_config(&config);
    if let Some(percent) = args.density {
        settings.density = Density::from_percent(percent);
    }
    info!(
        "Grid {}x{}, density {:.2}, {} generations -> {}",
        settings.width,
        settings.height,
        settings.density.get(),
        args.generations,
        args.output.display()
    );

    let started = Instant::now();
    let snapshots = simulate(settings, args.generations)?;
    info!(
        "Simulated {} generations in {:.2} s.",
        args.generations,
        started.elapsed().as_secs_f64()
    );

    let layout = config.surface_layout();
    let palette = Palette {
        cell: parse_color(&config.display.cell_color),
        background: parse_color(&config.display.background_color),
    };
    let started = Instant::now();
    render_frames(&snapshots, &layout, palette, &args.output, args.chunk_size)?;
    info!(
        "Wrote {} frames to {} in {:.2} s.",
        snapshots.len(),
        args.output.display(),
        started.elapsed().as_secs_f64()
    );

    if let Some(last) = snapshots.last() {
        info!(
            "Final generation {}: {} live cells ({:.1}%).",
            last.generation,
            last.live_cells,
            last.population_ratio() * 100.0
        );
    }
    Ok(())
}
