use crate::config::SimulationMetadata;
use crate::error::AnalysisResult;
use crate::grid::TimeSeriesGrid;
use crate::io::results::AnalysisResults;
use crate::spectral::{SpectralAnalyzer, Spectrum};
use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{debug, info};

// Analyze every grid point in order on the calling thread
pub fn analyze_grid_serial(
    grid: &TimeSeriesGrid,
    metadata: &SimulationMetadata,
    pb: &ProgressBar,
) -> AnalysisResults {
    let analyzer = SpectralAnalyzer::for_metadata(metadata);
    let mut results = AnalysisResults::new(metadata.clone(), analyzer.len());

    for row in grid.rows() {
        results.spectra.push(analyzer.analyze(row));
        pb.inc(1);
    }

    pb.finish();
    results
}

// Analyze grid points on a dedicated pool. Each task reads only its own row
// and produces its own spectrum; results keep grid point order.
pub fn analyze_grid_parallel(
    grid: &TimeSeriesGrid,
    metadata: &SimulationMetadata,
    threads: usize,
    pb: &ProgressBar,
) -> AnalysisResult<AnalysisResults> {
    let analyzer = SpectralAnalyzer::for_metadata(metadata);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;
    debug!(threads = pool.current_num_threads(), "worker pool ready");

    let spectra: Vec<Spectrum> = pool.install(|| {
        (0..grid.grid_size())
            .into_par_iter()
            .map(|point| {
                let spectrum = analyzer.analyze(grid.row(point));
                pb.inc(1);
                spectrum
            })
            .collect()
    });
    pb.finish();

    let mut results = AnalysisResults::new(metadata.clone(), analyzer.len());
    results.spectra = spectra;
    Ok(results)
}

pub fn analyze_grid(
    grid: &TimeSeriesGrid,
    metadata: &SimulationMetadata,
    threads: usize,
    pb: &ProgressBar,
) -> AnalysisResult<AnalysisResults> {
    info!(
        grid_points = grid.grid_size(),
        samples = metadata.sample_count(),
        threads,
        "starting spectral analysis"
    );
    if threads <= 1 {
        Ok(analyze_grid_serial(grid, metadata, pb))
    } else {
        analyze_grid_parallel(grid, metadata, threads, pb)
    }
}
