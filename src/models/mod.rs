mod diagnostics;
mod records;

pub use {
    diagnostics::{GazeError, TrialBoundary},
    records::{
        BatchResults, ParticipantRecord, ParticipantReport, TransitionSet, TrialRecord,
    },
};
