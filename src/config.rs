use crate::error::{AnalysisError, AnalysisResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const SOURCE: &str = "config";
const TOO_LARGE: &str = "does not fit in usize";

// Simulation parameters read from the input deck
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationMetadata {
    pub grid_size: usize,
    pub total_time: f64,
    pub timestep: f64,
    /// Number of simulation steps between recorded samples.
    pub sampling_interval: f64,
    pub step_count: usize,
    pub grid_start: Option<f64>,
    pub grid_end: Option<f64>,
    sample_count: usize,
}

impl SimulationMetadata {
    /// Validated metadata; every derived count, and the number of grid
    /// cells, must fit in `usize`.
    pub fn new(
        grid_size: usize,
        total_time: f64,
        timestep: f64,
        sampling_interval: f64,
    ) -> AnalysisResult<Self> {
        Self::from_records(grid_size, None, total_time, timestep, sampling_interval, None)
    }

    fn from_records(
        grid_size: usize,
        s_line: Option<usize>,
        total_time: f64,
        timestep: f64,
        sampling_interval: f64,
        t_line: Option<usize>,
    ) -> AnalysisResult<Self> {
        let invalid = |what, reason, line| AnalysisError::InvalidValue { what, reason, line };

        if grid_size == 0 {
            return Err(invalid("grid size", "must be positive", s_line));
        }
        for (value, what) in [
            (total_time, "total time"),
            (timestep, "timestep"),
            (sampling_interval, "sampling interval"),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(what, "must be positive", t_line));
            }
        }

        let steps = step_count(total_time, timestep, sampling_interval)
            .ok_or_else(|| invalid("step count", TOO_LARGE, t_line))?;
        let samples = sample_count(total_time, timestep, sampling_interval)
            .ok_or_else(|| invalid("sample count", TOO_LARGE, t_line))?;
        if grid_size.checked_mul(steps).is_none() {
            return Err(invalid("grid size times step count", TOO_LARGE, s_line));
        }

        Ok(SimulationMetadata {
            grid_size,
            total_time,
            timestep,
            sampling_interval,
            step_count: steps,
            grid_start: None,
            grid_end: None,
            sample_count: samples,
        })
    }

    /// Time between two recorded samples.
    pub fn sample_spacing(&self) -> f64 {
        self.timestep * self.sampling_interval
    }

    /// Length of the sampled time axis `[0, total_time + timestep)` stepped by
    /// the sample spacing. This is the transform length used for every row.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Spatial position of a grid point, when the domain bounds are known.
    pub fn grid_position(&self, index: usize) -> Option<f64> {
        let (start, end) = (self.grid_start?, self.grid_end?);
        if self.grid_size < 2 {
            return Some(start);
        }
        Some(start + (end - start) * index as f64 / (self.grid_size - 1) as f64)
    }
}

/// Number of recorded outputs: one per full sampling interval, one for t = 0,
/// and one more for a trailing partial interval. `None` when the count does
/// not fit in `usize`.
pub fn step_count(total_time: f64, timestep: f64, sampling_interval: f64) -> Option<usize> {
    let ratio = total_time / timestep;
    let mut steps = (ratio / sampling_interval + 1.0).floor();
    if ratio % sampling_interval != 0.0 {
        steps += 1.0;
    }
    to_count(steps)
}

fn sample_count(total_time: f64, timestep: f64, sampling_interval: f64) -> Option<usize> {
    let span = total_time + timestep;
    to_count((span / (timestep * sampling_interval)).ceil())
}

// usize::MAX as f64 rounds up to 2^64, so `<` keeps the cast exact
fn to_count(value: f64) -> Option<usize> {
    (value >= 0.0 && value < usize::MAX as f64).then_some(value as usize)
}

pub fn read_metadata(path: &Path) -> AnalysisResult<SimulationMetadata> {
    let file = File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    parse_records(BufReader::new(file), path)
}

// Parse tagged records: `S <size> [start end]` and `T <time> <dt> <interval>`.
// Unknown tags are skipped; later records override earlier ones.
pub fn parse_metadata<R: BufRead>(reader: R) -> AnalysisResult<SimulationMetadata> {
    parse_records(reader, Path::new(SOURCE))
}

fn parse_records<R: BufRead>(reader: R, origin: &Path) -> AnalysisResult<SimulationMetadata> {
    let mut space: Option<(usize, Option<(f64, f64)>, usize)> = None;
    let mut time: Option<(f64, f64, f64, usize)> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| AnalysisError::read_failure(SOURCE, origin, line_no, e))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.first().copied() {
            Some("S") => {
                let bounds = match tokens.len() {
                    0 | 1 => {
                        return Err(AnalysisError::malformed(
                            SOURCE,
                            line_no,
                            &line,
                            "'S' record needs a grid size",
                        ));
                    }
                    2 => None,
                    3 => {
                        return Err(AnalysisError::malformed(
                            SOURCE,
                            line_no,
                            &line,
                            "grid bounds need both start and end",
                        ));
                    }
                    _ => Some((
                        parse_token(tokens[2], "grid start", line_no, &line)?,
                        parse_token(tokens[3], "grid end", line_no, &line)?,
                    )),
                };
                let size: usize = parse_token(tokens[1], "grid size", line_no, &line)?;
                space = Some((size, bounds, line_no));
            }
            Some("T") => {
                if tokens.len() < 4 {
                    return Err(AnalysisError::malformed(
                        SOURCE,
                        line_no,
                        &line,
                        "'T' record needs total time, timestep and sampling interval",
                    ));
                }
                time = Some((
                    parse_token(tokens[1], "total time", line_no, &line)?,
                    parse_token(tokens[2], "timestep", line_no, &line)?,
                    parse_token(tokens[3], "sampling interval", line_no, &line)?,
                    line_no,
                ));
            }
            Some(other) => debug!(line = line_no, tag = other, "skipping config record"),
            None => {}
        }
    }

    let (grid_size, bounds, s_line) = space.ok_or(AnalysisError::MissingField { tag: "S" })?;
    let (total_time, timestep, interval, t_line) =
        time.ok_or(AnalysisError::MissingField { tag: "T" })?;

    let mut metadata = SimulationMetadata::from_records(
        grid_size,
        Some(s_line),
        total_time,
        timestep,
        interval,
        Some(t_line),
    )?;
    if let Some((start, end)) = bounds {
        metadata.grid_start = Some(start);
        metadata.grid_end = Some(end);
    }
    Ok(metadata)
}

fn parse_token<T: FromStr>(
    token: &str,
    what: &str,
    line_no: usize,
    line: &str,
) -> AnalysisResult<T> {
    token.parse::<T>().map_err(|_| {
        AnalysisError::malformed(
            SOURCE,
            line_no,
            line,
            format!("{} {:?} is not a valid number", what, token),
        )
    })
}

// Output format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Spectra,
    Peaks,
    Both,
}

impl OutputFormat {
    pub fn writes_spectra(self) -> bool {
        matches!(self, OutputFormat::Spectra | OutputFormat::Both)
    }

    pub fn writes_peaks(self) -> bool {
        matches!(self, OutputFormat::Peaks | OutputFormat::Both)
    }
}
