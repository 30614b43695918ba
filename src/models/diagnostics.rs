use strum_macros::Display;

/// Which edge of a trial window failed to match a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TrialBoundary {
    #[strum(to_string = "start")]
    Start,
    #[strum(to_string = "end")]
    End,
}

/// Recoverable problems found while processing a batch.
/// None of these abort the run; they are collected and written to the error log.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GazeError {
    #[error("{file} - Naming convention not recognised: {reason}")]
    NamingMismatch { file: String, reason: String },

    #[error("{file} - No timing file found")]
    MissingCompanionData { file: String },

    #[error("{file} - Ambiguous timing files: {}", .candidates.join(", "))]
    AmbiguousCompanionData { file: String, candidates: Vec<String> },

    #[error("{file} - Participant {participant} already has a recording ({first})")]
    DuplicateParticipant {
        file: String,
        participant: String,
        first: String,
    },

    #[error("{participant} - Overlapping trials ({}): {}", .trials.len(), .trials.join(", "))]
    OverlappingTrials {
        participant: String,
        trials: Vec<String>,
    },

    #[error(
        "{participant} - Missing Data: recording ends at {recording_end_ms}ms, before the last trial ends at {trial_end_ms}ms"
    )]
    InsufficientRecording {
        participant: String,
        recording_end_ms: f64,
        trial_end_ms: f64,
    },

    #[error("{participant} - No timed trials")]
    NoTrials { participant: String },

    #[error("{participant}: {trial} - Empty trial (no samples or zero duration)")]
    EmptyTrial { participant: String, trial: String },

    #[error("{participant}: {trial} - No sample matches the trial {boundary} at {time_s}s")]
    MissingTimestampMatch {
        participant: String,
        trial: String,
        boundary: TrialBoundary,
        time_s: f64,
    },

    #[error("{participant} - Trial {trial_number} has no row/column identity")]
    UnknownTrial {
        participant: String,
        trial_number: u32,
    },

    #[error("{participant} - Trial {trial_number} repeats the trial name {trial}")]
    DuplicateTrial {
        participant: String,
        trial: String,
        trial_number: u32,
    },
}

impl GazeError {
    /// True when the whole participant is excluded from output.
    pub fn rejects_participant(&self) -> bool {
        matches!(
            self,
            GazeError::InsufficientRecording { .. } | GazeError::NoTrials { .. }
        )
    }

    pub fn log(&self) {
        if self.rejects_participant() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_subject() {
        let err = GazeError::OverlappingTrials {
            participant: "101CEArrow".to_string(),
            trials: vec!["1-1".to_string(), "1-2".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "101CEArrow - Overlapping trials (2): 1-1, 1-2"
        );
        assert!(!err.rejects_participant());

        let err = GazeError::MissingTimestampMatch {
            participant: "p".to_string(),
            trial: "2-4".to_string(),
            boundary: TrialBoundary::End,
            time_s: 12.5,
        };
        assert_eq!(
            err.to_string(),
            "p: 2-4 - No sample matches the trial end at 12.5s"
        );
    }

    #[test]
    fn test_rejection_variants() {
        assert!(
            GazeError::NoTrials {
                participant: "p".into()
            }
            .rejects_participant()
        );
        assert!(
            GazeError::InsufficientRecording {
                participant: "p".into(),
                recording_end_ms: 1.0,
                trial_end_ms: 2.0,
            }
            .rejects_participant()
        );
    }
}
