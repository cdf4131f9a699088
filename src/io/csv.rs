use crate::error::{AnalysisError, AnalysisResult};
use crate::io::results::AnalysisResults;
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

// One spectral bin of one grid point; `x` is empty when the domain bounds
// are unknown
#[derive(Debug, Serialize)]
struct BinRecord {
    grid_point: usize,
    x: Option<f64>,
    bin: usize,
    omega: f64,
    magnitude: f64,
}

// Create CSV writer; headers come from the serialized records
pub fn create_csv_writer(path: &Path) -> AnalysisResult<Writer<File>> {
    let file = File::create(path).map_err(|e| AnalysisError::io(path, e))?;
    Ok(WriterBuilder::new().has_headers(true).from_writer(file))
}

/// Every bin of every grid point, in grid point then FFT order.
pub fn write_spectra<W: Write>(wtr: &mut Writer<W>, results: &AnalysisResults) -> AnalysisResult<()> {
    for (grid_point, spectrum) in results.spectra.iter().enumerate() {
        let x = results.metadata.grid_position(grid_point);
        for (bin, (&omega, &magnitude)) in spectrum
            .angular_frequency
            .iter()
            .zip(&spectrum.magnitude)
            .enumerate()
        {
            wtr.serialize(BinRecord {
                grid_point,
                x,
                bin,
                omega,
                magnitude,
            })?;
        }
    }
    wtr.flush().map_err(|e| AnalysisError::io("spectra CSV", e))?;
    Ok(())
}

/// The dominant bin of each grid point. Empty spectra produce no row.
pub fn write_peaks<W: Write>(
    wtr: &mut Writer<W>,
    results: &AnalysisResults,
    skip_dc: bool,
) -> AnalysisResult<()> {
    for (grid_point, peak) in results.peaks(skip_dc).into_iter().enumerate() {
        if let Some(peak) = peak {
            wtr.serialize(BinRecord {
                grid_point,
                x: results.metadata.grid_position(grid_point),
                bin: peak.bin,
                omega: peak.angular_frequency,
                magnitude: peak.magnitude,
            })?;
        }
    }
    wtr.flush().map_err(|e| AnalysisError::io("peaks CSV", e))?;
    Ok(())
}
