use crate::config::SimulationMetadata;
use crate::error::{AnalysisError, AnalysisResult};
use crate::grid::TimeSeriesGrid;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

const SOURCE: &str = "data";

// One `index value [value...]` record from a field output file
#[derive(Debug)]
struct GridSample {
    point: usize,
    value: f64,
}

impl GridSample {
    fn from_line(line: &str, line_no: usize, value_column: usize) -> AnalysisResult<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let needed = value_column + 2;
        if tokens.len() < needed {
            return Err(AnalysisError::malformed(
                SOURCE,
                line_no,
                line,
                format!("expected at least {} fields, found {}", needed, tokens.len()),
            ));
        }

        let point = tokens[0].parse::<usize>().map_err(|_| {
            AnalysisError::malformed(
                SOURCE,
                line_no,
                line,
                format!("grid point index {:?} is not a non-negative integer", tokens[0]),
            )
        })?;
        let raw = tokens[value_column + 1];
        let value = raw.parse::<f64>().map_err(|_| {
            AnalysisError::malformed(
                SOURCE,
                line_no,
                line,
                format!("value {:?} is not a number", raw),
            )
        })?;

        Ok(GridSample { point, value })
    }
}

pub fn load_grid(
    path: &Path,
    metadata: &SimulationMetadata,
    value_column: usize,
) -> AnalysisResult<TimeSeriesGrid> {
    let file = File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    read_samples(BufReader::new(file), metadata, value_column, path)
}

/// Stream a field output file into a grid sized from `metadata`.
///
/// Every blank line closes the current timestep. Cells that never appear in
/// the file stay zero. A leading `#` header, and the single blank line the
/// simulation writes after it, are skipped without advancing the timestep.
/// `value_column` selects which value to keep on multi-component rows
/// (0 = first value after the index).
pub fn parse_grid<R: BufRead>(
    reader: R,
    metadata: &SimulationMetadata,
    value_column: usize,
) -> AnalysisResult<TimeSeriesGrid> {
    read_samples(reader, metadata, value_column, Path::new(SOURCE))
}

fn read_samples<R: BufRead>(
    reader: R,
    metadata: &SimulationMetadata,
    value_column: usize,
    origin: &Path,
) -> AnalysisResult<TimeSeriesGrid> {
    let mut grid = TimeSeriesGrid::for_metadata(metadata)?;
    let mut current_step = 0usize;
    let mut samples = 0usize;
    let mut seen_data = false;
    let mut after_header = false;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| AnalysisError::read_failure(SOURCE, origin, line_no, e))?;
        let trimmed = line.trim();

        if trimmed.starts_with('#') {
            after_header = !seen_data;
            continue;
        }

        if trimmed.is_empty() {
            if after_header {
                after_header = false;
                continue;
            }
            current_step += 1;
            continue;
        }

        after_header = false;
        seen_data = true;
        let sample = GridSample::from_line(trimmed, line_no, value_column)?;
        grid.set(sample.point, current_step, sample.value, line_no)?;
        samples += 1;
    }

    debug!(blocks = current_step, "finished reading timestep blocks");
    info!(
        samples,
        grid_points = grid.grid_size(),
        steps = grid.step_count(),
        "loaded field samples"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexKind;

    fn meta(size: usize) -> SimulationMetadata {
        SimulationMetadata::new(size, 4.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn dense_file_round_trips() {
        let mut text = String::new();
        for step in 0..5 {
            for point in 0..2 {
                text.push_str(&format!("{}\t\t{}\n", point, step as f64 + point as f64 * 0.5));
            }
            text.push('\n');
        }
        let grid = parse_grid(text.as_bytes(), &meta(2), 0).unwrap();
        assert_eq!(grid.row(0), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(grid.row(1), &[0.5, 1.5, 2.5, 3.5, 4.5]);
    }

    #[test]
    fn sparse_file_leaves_zeros() {
        let text = "1 2.0\n\n\n0 7.0\n";
        let grid = parse_grid(text.as_bytes(), &meta(2), 0).unwrap();
        assert_eq!(grid.row(0), &[0.0, 0.0, 7.0, 0.0, 0.0]);
        assert_eq!(grid.row(1), &[2.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn header_and_its_blank_line_are_skipped() {
        let text = "# Gridpoint\tvalue\n\n0\t\t1.000000\n1\t\t2.000000\n\n0\t\t3.000000\n";
        let grid = parse_grid(text.as_bytes(), &meta(2), 0).unwrap();
        assert_eq!(grid.get(0, 0), Some(1.0));
        assert_eq!(grid.get(1, 0), Some(2.0));
        assert_eq!(grid.get(0, 1), Some(3.0));
    }

    #[test]
    fn selects_vector_component() {
        let text = "0 1.0 -1.0\n1 2.0 -2.0\n\n0 3.0 -3.0\n";
        let x = parse_grid(text.as_bytes(), &meta(2), 0).unwrap();
        let y = parse_grid(text.as_bytes(), &meta(2), 1).unwrap();
        assert_eq!(x.get(0, 1), Some(3.0));
        assert_eq!(y.get(0, 1), Some(-3.0));
        assert_eq!(y.get(1, 0), Some(-2.0));
    }

    #[test]
    fn missing_component_is_malformed() {
        let err = parse_grid("0 1.0\n".as_bytes(), &meta(2), 1).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn non_numeric_value_is_malformed() {
        let err = parse_grid("0 1.0\n1 nope\n".as_bytes(), &meta(2), 0).unwrap_err();
        match err {
            AnalysisError::MalformedLine { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "1 nope");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn point_beyond_grid_is_rejected() {
        let err = parse_grid("0 1.0\n5 3.2\n".as_bytes(), &meta(2), 0).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::IndexOutOfRange {
                kind: IndexKind::GridPoint,
                index: 5,
                bound: 2,
                line: 2
            }
        ));
    }

    #[test]
    fn too_many_blocks_is_rejected() {
        let text = "0 1\n\n0 1\n\n0 1\n\n0 1\n\n0 1\n\n0 1\n";
        let err = parse_grid(text.as_bytes(), &meta(1), 0).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::IndexOutOfRange {
                kind: IndexKind::TimeStep,
                index: 5,
                bound: 5,
                line: 11
            }
        ));
    }

    #[test]
    fn undecodable_bytes_report_line() {
        let err = parse_grid(&b"0 1.0\n1 \xff\xfe\n"[..], &meta(2), 0).unwrap_err();
        match err {
            AnalysisError::MalformedLine { line, ref reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("UTF-8"));
            }
            ref other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("data line 2"));
    }

    #[test]
    fn trailing_blank_after_last_block_is_fine() {
        let text = "0 1\n\n0 1\n\n0 1\n\n0 1\n\n0 1\n\n";
        let grid = parse_grid(text.as_bytes(), &meta(1), 0).unwrap();
        assert_eq!(grid.row(0), &[1.0; 5]);
    }
}
