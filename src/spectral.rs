//! Discrete Fourier analysis of a single grid point's time series.
use crate::config::SimulationMetadata;
use rustfft::{Fft, FftPlanner, num_complex::Complex};
use std::f64::consts::PI;
use std::sync::Arc;

/// Angular frequency axis and normalized magnitudes, index-aligned, in FFT
/// order: non-negative frequencies first, then the negative ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub angular_frequency: Vec<f64>,
    pub magnitude: Vec<f64>,
}

/// Strongest bin of a spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPeak {
    pub bin: usize,
    pub angular_frequency: f64,
    pub magnitude: f64,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// Bin with the largest magnitude; the first one wins a tie. With
    /// `skip_dc` the zero-frequency bin is left out of the search.
    pub fn peak(&self, skip_dc: bool) -> Option<SpectralPeak> {
        let start = usize::from(skip_dc);
        let mut best: Option<SpectralPeak> = None;
        for (bin, (&omega, &mag)) in self
            .angular_frequency
            .iter()
            .zip(&self.magnitude)
            .enumerate()
            .skip(start)
        {
            if best.is_none_or(|b| mag > b.magnitude) {
                best = Some(SpectralPeak {
                    bin,
                    angular_frequency: omega,
                    magnitude: mag,
                });
            }
        }
        best
    }
}

/// Sample frequencies of a length-`n` transform with sample spacing `d`,
/// laid out as `[0, 1, .., -n/2, .., -1] / (n * d)`.
pub fn fft_frequencies(n: usize, d: f64) -> Vec<f64> {
    let positive = n.div_ceil(2);
    let scale = 1.0 / (n as f64 * d);
    (0..n)
        .map(|i| {
            let k = if i < positive {
                i as f64
            } else {
                i as f64 - n as f64
            };
            k * scale
        })
        .collect()
}

pub fn angular_frequencies(n: usize, d: f64) -> Vec<f64> {
    fft_frequencies(n, d)
        .into_iter()
        .map(|f| 2.0 * PI * f)
        .collect()
}

/// Forward transform planned once for a fixed length and shared across rows.
pub struct SpectralAnalyzer {
    len: usize,
    fft: Option<Arc<dyn Fft<f64>>>,
    omega: Vec<f64>,
}

impl SpectralAnalyzer {
    pub fn new(len: usize, sample_spacing: f64) -> Self {
        let fft = if len == 0 {
            None
        } else {
            Some(FftPlanner::new().plan_fft_forward(len))
        };
        SpectralAnalyzer {
            len,
            fft,
            omega: angular_frequencies(len, sample_spacing),
        }
    }

    pub fn for_metadata(metadata: &SimulationMetadata) -> Self {
        Self::new(metadata.sample_count(), metadata.sample_spacing())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Transform `row`, zero-padded or truncated to the planned length, and
    /// normalize magnitudes by that length.
    pub fn analyze(&self, row: &[f64]) -> Spectrum {
        let Some(fft) = &self.fft else {
            return Spectrum {
                angular_frequency: Vec::new(),
                magnitude: Vec::new(),
            };
        };

        let mut buffer: Vec<Complex<f64>> = row
            .iter()
            .take(self.len)
            .map(|&v| Complex::new(v, 0.0))
            .collect();
        buffer.resize(self.len, Complex::new(0.0, 0.0));

        fft.process(&mut buffer);

        let norm = self.len as f64;
        Spectrum {
            angular_frequency: self.omega.clone(),
            magnitude: buffer.iter().map(|c| c.norm() / norm).collect(),
        }
    }
}

/// One-shot analysis of a row with transform length `n`.
pub fn analyze_row(row: &[f64], metadata: &SimulationMetadata, n: usize) -> Spectrum {
    SpectralAnalyzer::new(n, metadata.sample_spacing()).analyze(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < TOL
    }

    #[test]
    fn frequencies_even_length() {
        assert_eq!(fft_frequencies(4, 1.0), vec![0.0, 0.25, -0.5, -0.25]);
        let omega = angular_frequencies(4, 1.0);
        for (w, f) in omega.iter().zip([0.0, 0.25, -0.5, -0.25]) {
            assert!(close(*w, 2.0 * PI * f));
        }
    }

    #[test]
    fn frequencies_odd_length() {
        let f = fft_frequencies(5, 0.5);
        let expected = [0.0, 0.4, 0.8, -0.8, -0.4];
        for (a, b) in f.iter().zip(expected) {
            assert!(close(*a, b), "{a} != {b}");
        }
    }

    #[test]
    fn constant_row_dc_equals_value() {
        let meta = SimulationMetadata::new(1, 4.0, 1.0, 1.0).unwrap();
        let n = meta.sample_count();
        let spectrum = analyze_row(&[3.5; 5], &meta, n);
        assert_eq!(spectrum.len(), 5);
        assert!(close(spectrum.magnitude[0], 3.5));
        assert!(spectrum.magnitude[1..].iter().all(|&m| m.abs() < 1e-9));
        assert_eq!(spectrum.angular_frequency[0], 0.0);
    }

    #[test]
    fn short_row_is_zero_padded() {
        let analyzer = SpectralAnalyzer::new(4, 1.0);
        let spectrum = analyzer.analyze(&[1.0]);
        assert_eq!(spectrum.len(), 4);
        assert!(spectrum.magnitude.iter().all(|&m| close(m, 0.25)));
    }

    #[test]
    fn long_row_is_truncated() {
        let analyzer = SpectralAnalyzer::new(4, 1.0);
        let spectrum = analyzer.analyze(&[1.0, 1.0, 1.0, 1.0, 9.0, 9.0]);
        assert!(close(spectrum.magnitude[0], 1.0));
    }

    #[test]
    fn normalizes_by_transform_length() {
        // impulse padded to 8: every bin has |X| = 2
        let analyzer = SpectralAnalyzer::new(8, 1.0);
        let spectrum = analyzer.analyze(&[2.0, 0.0, 0.0]);
        assert!(spectrum.magnitude.iter().all(|&m| close(m, 0.25)));
    }

    #[test]
    fn sinusoid_peak() {
        let n = 16;
        let d = 0.5;
        let k = 3.0;
        let row: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * k * i as f64 / n as f64).cos())
            .collect();
        let spectrum = SpectralAnalyzer::new(n, d).analyze(&row);
        let peak = spectrum.peak(true).unwrap();
        let expected = 2.0 * PI * k / (n as f64 * d);
        assert!((peak.angular_frequency.abs() - expected).abs() < 1e-9);
        assert!((peak.magnitude - 0.5).abs() < 1e-9);
    }

    #[test]
    fn peak_can_include_dc() {
        let spectrum = Spectrum {
            angular_frequency: vec![0.0, 1.0, -1.0],
            magnitude: vec![5.0, 2.0, 2.0],
        };
        assert_eq!(spectrum.peak(false).unwrap().bin, 0);
        assert_eq!(spectrum.peak(true).unwrap().bin, 1);
    }

    #[test]
    fn empty_transform() {
        let spectrum = SpectralAnalyzer::new(0, 1.0).analyze(&[1.0, 2.0]);
        assert!(spectrum.is_empty());
        assert_eq!(spectrum.peak(false), None);
    }
}
