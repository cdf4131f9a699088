use clap::Parser;
use fourier_rs::OutputFormat;
use std::path::PathBuf;

/// Fourier analysis of gridded field output, one spectrum per grid point
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Simulation input deck with the `S` and `T` records
    pub config: PathBuf,

    /// Field output file (`index value` rows, blank line per output step)
    pub data: PathBuf,

    /// Directory the CSV results are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Value column to analyze on multi-component rows (0 = first value)
    #[arg(short, long, default_value_t = 0)]
    pub component: usize,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    pub threads: Option<usize>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Both)]
    pub format: OutputFormat,

    /// Let the zero-frequency bin win the peak search
    #[arg(long)]
    pub include_dc: bool,
}

impl Args {
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn output_stem(&self) -> String {
        self.data
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "field".to_string())
    }
}

pub fn get_args() -> Args {
    Args::parse()
}
