//! Per-grid-point spectral analysis of gridded simulation output.
//!
//! The pipeline reads the simulation input deck into [`SimulationMetadata`],
//! streams a field output file into a [`TimeSeriesGrid`], then computes one
//! [`Spectrum`] per grid point.

pub mod analysis;
pub mod config;
pub mod error;
pub mod grid;
pub mod io;
pub mod spectral;

pub use analysis::analyze_grid;
pub use config::{OutputFormat, SimulationMetadata, read_metadata};
pub use error::{AnalysisError, AnalysisResult};
pub use grid::TimeSeriesGrid;
pub use io::data::load_grid;
pub use io::results::AnalysisResults;
pub use spectral::{SpectralAnalyzer, SpectralPeak, Spectrum, analyze_row};
