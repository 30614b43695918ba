use {
    super::diagnostics::GazeError,
    crate::analysis::{Interval, Ratios, Timeline, TransitionMatrix, TransitionPolicy},
    crate::domain::{AoiLabel, ResolvedTrial},
    std::collections::BTreeMap,
};

// ============================================================================
// TrialRecord: Everything computed for one trial
// ============================================================================

/// The three transition matrices of a trial, one per policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionSet {
    pub raw: TransitionMatrix,
    pub run_collapsed: TransitionMatrix,
    pub noise_filtered: TransitionMatrix,
}

impl TransitionSet {
    pub fn build(labels: &[AoiLabel], runs: &[Interval], neither_cutoff_ms: f64) -> Self {
        Self {
            raw: TransitionMatrix::build(TransitionPolicy::Raw, labels, runs, neither_cutoff_ms),
            run_collapsed: TransitionMatrix::build(
                TransitionPolicy::RunCollapsed,
                labels,
                runs,
                neither_cutoff_ms,
            ),
            noise_filtered: TransitionMatrix::build(
                TransitionPolicy::NoiseFiltered,
                labels,
                runs,
                neither_cutoff_ms,
            ),
        }
    }

    pub fn get(&self, policy: TransitionPolicy) -> &TransitionMatrix {
        match policy {
            TransitionPolicy::Raw => &self.raw,
            TransitionPolicy::RunCollapsed => &self.run_collapsed,
            TransitionPolicy::NoiseFiltered => &self.noise_filtered,
        }
    }
}

/// Immutable once built by the trial processor.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    pub trial: ResolvedTrial,

    pub timeline: Timeline,
    pub first_look: Option<Interval>,
    pub last_look: Option<Interval>,
    /// None when the trial never lands on Left or Right.
    pub first_valid_look: Option<Interval>,
    pub last_valid_look: Option<Interval>,

    /// None for an empty trial.
    pub ratios: Option<Ratios>,
    pub transitions: TransitionSet,

    /// Invalid samples in the raw (unfilled) column.
    pub invalid_sample_count: usize,
    /// `1 - invalid/samples`; None for a trial without samples.
    pub error_ratio: Option<f64>,
}

impl TrialRecord {
    pub fn name(&self) -> &str {
        self.trial.name()
    }

    pub fn sample_count(&self) -> usize {
        self.trial.sample_count()
    }

    pub fn nominal_duration_ms(&self) -> f64 {
        self.trial.window.nominal_duration_ms()
    }
}

// ============================================================================
// Participant level
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRecord {
    pub participant_id: String,
    /// Start-time order.
    pub trials: Vec<TrialRecord>,
    /// Non-Invalid share of every sample across all emitted trials.
    pub participant_error_ratio: Option<f64>,
}

impl ParticipantRecord {
    pub fn trial(&self, name: &str) -> Option<&TrialRecord> {
        self.trials.iter().find(|t| t.name() == name)
    }
}

/// Result of processing one recording: a record unless rejected, plus every
/// diagnostic raised along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantReport {
    pub participant_id: String,
    pub record: Option<ParticipantRecord>,
    pub diagnostics: Vec<GazeError>,
    /// Trials in the timing table that did not make it into the record.
    pub trials_dropped: usize,
}

impl ParticipantReport {
    pub fn rejected(participant_id: impl Into<String>, error: GazeError) -> Self {
        Self {
            participant_id: participant_id.into(),
            record: None,
            diagnostics: vec![error],
            trials_dropped: 0,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.record.is_none()
    }
}

// ============================================================================
// BatchResults: Accumulator across participants
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResults {
    /// Accepted participants, keyed (and therefore ordered) by id.
    pub participants: BTreeMap<String, ParticipantRecord>,
    /// Every diagnostic in the order it was absorbed.
    pub diagnostics: Vec<GazeError>,
    pub rejected: Vec<String>,
}

impl BatchResults {
    /// A diagnostic raised outside any participant (e.g. during discovery).
    pub fn note(&mut self, error: GazeError) {
        self.diagnostics.push(error);
    }

    pub fn absorb(&mut self, report: ParticipantReport) {
        self.diagnostics.extend(report.diagnostics);
        match report.record {
            Some(record) => {
                self.participants.insert(report.participant_id, record);
            }
            None => self.rejected.push(report.participant_id),
        }
    }

    pub fn any_rejected(&self) -> bool {
        !self.rejected.is_empty()
    }

    pub fn trial_count(&self) -> usize {
        self.participants.values().map(|p| p.trials.len()).sum()
    }
}
