//! Errors raised while reading simulation output and writing spectra.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Which axis of the grid an out-of-range index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    GridPoint,
    TimeStep,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::GridPoint => write!(f, "grid point"),
            IndexKind::TimeStep => write!(f, "timestep"),
        }
    }
}

/// Errors that can occur while parsing inputs or writing results.
///
/// Every variant is fatal to the current run. Line numbers are 1-based.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A required config record never appeared.
    #[error("config is missing the '{tag}' record")]
    MissingField { tag: &'static str },

    /// A line had the wrong number of tokens or a token failed to parse.
    #[error("{source_name} line {line}: {reason} (got {content:?})")]
    MalformedLine {
        source_name: &'static str,
        line: usize,
        content: String,
        reason: String,
    },

    /// A data line addressed a cell outside the grid.
    #[error("line {line}: {kind} index {index} outside valid range [0, {bound})")]
    IndexOutOfRange {
        kind: IndexKind,
        index: usize,
        bound: usize,
        line: usize,
    },

    /// A config value parsed but is not usable. `line` is `None` when the
    /// metadata was built in code rather than read from a file.
    #[error("{}{what} {reason}", line_prefix(.line))]
    InvalidValue {
        what: &'static str,
        reason: &'static str,
        line: Option<usize>,
    },

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn line_prefix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("config line {line}: "),
        None => String::new(),
    }
}

impl AnalysisError {
    pub(crate) fn malformed(
        source_name: &'static str,
        line: usize,
        content: &str,
        reason: impl Into<String>,
    ) -> Self {
        AnalysisError::MalformedLine {
            source_name,
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    /// A line could not be read from `origin`. Undecodable bytes are bad
    /// input and keep their line number; anything else is an I/O failure.
    pub(crate) fn read_failure(
        source_name: &'static str,
        origin: &Path,
        line: usize,
        source: std::io::Error,
    ) -> Self {
        if source.kind() == ErrorKind::InvalidData {
            Self::malformed(source_name, line, "<invalid UTF-8>", "line is not valid UTF-8")
        } else {
            Self::io(origin, source)
        }
    }
}
