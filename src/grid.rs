use crate::config::SimulationMetadata;
use crate::error::{AnalysisError, AnalysisResult, IndexKind};

// Recorded field values, one row per grid point and one column per output step
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesGrid {
    grid_size: usize,
    step_count: usize,
    values: Vec<f64>,
}

impl TimeSeriesGrid {
    pub fn new(grid_size: usize, step_count: usize) -> AnalysisResult<Self> {
        let cells = grid_size
            .checked_mul(step_count)
            .ok_or(AnalysisError::InvalidValue {
                what: "grid size times step count",
                reason: "does not fit in usize",
                line: None,
            })?;
        Ok(TimeSeriesGrid {
            grid_size,
            step_count,
            values: vec![0.0; cells],
        })
    }

    pub fn for_metadata(metadata: &SimulationMetadata) -> AnalysisResult<Self> {
        Self::new(metadata.grid_size, metadata.step_count)
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn get(&self, point: usize, step: usize) -> Option<f64> {
        if point < self.grid_size && step < self.step_count {
            Some(self.values[point * self.step_count + step])
        } else {
            None
        }
    }

    /// Store a sample, reporting which axis is out of bounds. `line` is only
    /// used to locate the error.
    pub fn set(&mut self, point: usize, step: usize, value: f64, line: usize) -> AnalysisResult<()> {
        if point >= self.grid_size {
            return Err(AnalysisError::IndexOutOfRange {
                kind: IndexKind::GridPoint,
                index: point,
                bound: self.grid_size,
                line,
            });
        }
        if step >= self.step_count {
            return Err(AnalysisError::IndexOutOfRange {
                kind: IndexKind::TimeStep,
                index: step,
                bound: self.step_count,
                line,
            });
        }
        self.values[point * self.step_count + step] = value;
        Ok(())
    }

    /// Time series of a single grid point.
    pub fn row(&self, point: usize) -> &[f64] {
        let start = point * self.step_count;
        &self.values[start..start + self.step_count]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        let width = self.step_count.max(1);
        let count = if self.step_count == 0 { 0 } else { self.grid_size };
        self.values.chunks_exact(width).take(count)
    }
}
