use crate::config::SimulationMetadata;
use crate::spectral::{SpectralPeak, Spectrum};

// Spectra for every grid point, ordered by grid point index
#[derive(Debug, Clone)]
pub struct AnalysisResults {
    pub metadata: SimulationMetadata,
    pub sample_count: usize,
    pub spectra: Vec<Spectrum>,
}

impl AnalysisResults {
    pub fn new(metadata: SimulationMetadata, sample_count: usize) -> Self {
        AnalysisResults {
            metadata,
            sample_count,
            spectra: Vec::new(),
        }
    }

    pub fn peaks(&self, skip_dc: bool) -> Vec<Option<SpectralPeak>> {
        self.spectra.iter().map(|s| s.peak(skip_dc)).collect()
    }
}
