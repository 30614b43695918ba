use {
    super::summary::{BatchSummary, SummaryRow},
    crate::{
        analysis::TrialProcessor,
        config::AnalysisConfig,
        data::{OutputPaths, Session, discover_sessions, export_all, load_recording, load_timing},
        models::{BatchResults, ParticipantReport},
    },
    anyhow::Result,
    rayon::prelude::*,
    std::path::PathBuf,
};

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub data_folder: PathBuf,
    pub timing_folder: PathBuf,
    pub outputs: OutputPaths,
    pub analysis: AnalysisConfig,
    /// Process participants on the rayon pool.
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchRun {
    pub results: BatchResults,
    pub summary: BatchSummary,
}

/// Discovers, processes and exports every session.
/// Only environment failures (folders, unreadable files, writes) are errors.
pub fn run_batch(config: &BatchConfig) -> Result<BatchRun> {
    // 1. Discovery
    let (sessions, skipped) = discover_sessions(&config.data_folder, &config.timing_folder)?;

    let mut results = BatchResults::default();
    let mut summary = BatchSummary {
        skipped_files: skipped.len(),
        ..Default::default()
    };
    for diagnostic in skipped {
        diagnostic.log();
        results.note(diagnostic);
    }

    // 2. Per-participant processing
    let reports: Vec<ParticipantReport> = if config.parallel {
        sessions
            .par_iter()
            .map(|s| process_session(s, &config.analysis))
            .collect::<Result<_>>()?
    } else {
        sessions
            .iter()
            .map(|s| process_session(s, &config.analysis))
            .collect::<Result<_>>()?
    };

    // 3. Accumulate in discovery order
    for report in reports {
        summary.rows.push(SummaryRow::from(&report));
        results.absorb(report);
    }
    summary.diagnostics = results.diagnostics.len();

    // 4. Export
    export_all(&results, &config.outputs)?;

    Ok(BatchRun { results, summary })
}

pub fn process_session(session: &Session, analysis: &AnalysisConfig) -> Result<ParticipantReport> {
    let participant_id = session.participant_id();
    log::info!("Processing {}", participant_id);

    let recording = load_recording(&session.recording_path, &participant_id)?;
    let (identity, timings) = load_timing(&session.timing_path)?;

    Ok(TrialProcessor::process_participant(
        &recording, &identity, &timings, analysis,
    ))
}
