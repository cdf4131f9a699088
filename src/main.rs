use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::get_args;
use fourier_rs::io::csv::{create_csv_writer, write_peaks, write_spectra};
use fourier_rs::{analyze_grid, load_grid, read_metadata};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = get_args();
    let threads = args.thread_count();

    // Simulation parameters
    let metadata = read_metadata(&args.config)
        .with_context(|| format!("Failed to read config: {:?}", args.config))?;

    info!(
        grid_points = metadata.grid_size,
        total_time = metadata.total_time,
        timestep = metadata.timestep,
        sampling_interval = metadata.sampling_interval,
        output_steps = metadata.step_count,
        "simulation configuration"
    );

    // Field samples
    let grid = load_grid(&args.data, &metadata, args.component)
        .with_context(|| format!("Failed to load field data: {:?}", args.data))?;

    let pb = ProgressBar::new(metadata.grid_size as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} grid points ({eta})")?
            .progress_chars("#>-"),
    );

    let results = analyze_grid(&grid, &metadata, threads, &pb)
        .context("Spectral analysis failed")?;

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", args.output_dir))?;
    let stem = args.output_stem();

    if args.format.writes_spectra() {
        let path = args.output_dir.join(format!("{}_spectra.csv", stem));
        let mut wtr = create_csv_writer(&path)
            .with_context(|| format!("Failed to create spectra file: {:?}", path))?;
        write_spectra(&mut wtr, &results)
            .with_context(|| format!("Failed to write spectra: {:?}", path))?;
        info!(path = %path.display(), "spectra saved");
    }

    if args.format.writes_peaks() {
        let path = args.output_dir.join(format!("{}_peaks.csv", stem));
        let mut wtr = create_csv_writer(&path)
            .with_context(|| format!("Failed to create peaks file: {:?}", path))?;
        write_peaks(&mut wtr, &results, !args.include_dc)
            .with_context(|| format!("Failed to write peaks: {:?}", path))?;
        info!(path = %path.display(), "peaks saved");
    }

    info!(
        grid_points = results.spectra.len(),
        samples = results.sample_count,
        "analysis complete"
    );
    Ok(())
}
