// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod utils;

// Re-export commonly used types outside of crate (for make_demo_session.rs and tests)
pub use config::{ANALYSIS, AnalysisConfig, PERSISTENCE};
pub use engine::{BatchConfig, BatchRun, BatchSummary, run_batch};
pub use models::{BatchResults, GazeError};

// CLI argument parsing
use {
    anyhow::Result,
    clap::Parser,
    data::OutputPaths,
    std::path::PathBuf,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Gaze AOI analysis of eye-tracking recordings", long_about = None)]
pub struct Cli {
    /// Folder of raw eye-tracker exports (.csv)
    pub data_folder: PathBuf,

    /// Folder of per-session trial timing tables (.csv or two-sheet .xlsx)
    pub timestamp_folder: PathBuf,

    /// Folder the JSON, CSV and error log are written to
    pub results_folder: PathBuf,

    /// Neither runs shorter than this (ms) between Left and Right count as transit
    #[arg(long, default_value_t = config::DEFAULT_NEITHER_CUTOFF_MS)]
    pub neither_cutoff_ms: f64,

    /// JSON file name (default: {date}.json)
    #[arg(long)]
    pub json_out: Option<String>,

    /// CSV file name (default: {date}.csv)
    #[arg(long)]
    pub csv_out: Option<String>,

    /// Error log file name (default: {date}_errors.txt)
    #[arg(long)]
    pub errors_out: Option<String>,

    /// Process participants one at a time
    #[arg(long, default_value_t = false)]
    pub sequential: bool,
}

impl Cli {
    pub fn batch_config(&self) -> Result<BatchConfig> {
        let (json, csv, errors) = config::output_filenames(&utils::today_stamp());

        Ok(BatchConfig {
            data_folder: self.data_folder.clone(),
            timing_folder: self.timestamp_folder.clone(),
            outputs: OutputPaths::in_folder(
                &self.results_folder,
                self.json_out.as_deref().unwrap_or(&json),
                self.csv_out.as_deref().unwrap_or(&csv),
                self.errors_out.as_deref().unwrap_or(&errors),
            ),
            analysis: ANALYSIS.with_neither_cutoff(self.neither_cutoff_ms)?,
            parallel: !self.sequential,
        })
    }
}

/// Library entry point for the binary: runs one batch and returns its summary.
pub fn run(args: &Cli) -> Result<BatchSummary> {
    let config = args.batch_config()?;
    log::info!(
        "Gaze AOI run: {:?} + {:?} -> {:?} (neither cutoff {}ms)",
        config.data_folder,
        config.timing_folder,
        args.results_folder,
        config.analysis.neither_cutoff_ms
    );

    let run = run_batch(&config)?;
    Ok(run.summary)
}
