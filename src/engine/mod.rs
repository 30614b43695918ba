mod batch;
mod summary;

pub use {
    batch::{BatchConfig, BatchRun, process_session, run_batch},
    summary::{BatchSummary, ParticipantStatus, SummaryRow},
};
