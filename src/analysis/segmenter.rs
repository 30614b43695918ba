use {
    crate::{
        domain::{ResolvedTrial, TrialIdentityTable, TrialTiming, TrialWindow},
        models::{GazeError, TrialBoundary},
        utils::MS_IN_S,
    },
    std::collections::HashSet,
};

/// Outcome of mapping trial windows onto the sample sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    /// Non-overlapping trials in start-time order.
    pub trials: Vec<ResolvedTrial>,
    /// Names of trials dropped for overlapping a neighbour (deduplicated, in order found).
    pub overlapping: Vec<String>,
    /// Trials dropped because a boundary had no matching sample.
    pub unmatched: Vec<(String, TrialBoundary, f64)>,
}

pub struct TrialSegmenter;

impl TrialSegmenter {
    /// Rejects a recording that stops before the last trial (in start order) ends.
    /// `timings` must be sorted by start time.
    pub fn check_recording_length(
        participant: &str,
        timestamps_ms: &[f64],
        timings: &[TrialTiming],
    ) -> Result<(), GazeError> {
        let Some(last_trial) = timings.last() else {
            return Err(GazeError::NoTrials {
                participant: participant.to_string(),
            });
        };
        let trial_end_ms = last_trial.end_s * MS_IN_S;
        let recording_end_ms = timestamps_ms.last().copied().unwrap_or(f64::NEG_INFINITY);

        if recording_end_ms < trial_end_ms {
            return Err(GazeError::InsufficientRecording {
                participant: participant.to_string(),
                recording_end_ms,
                trial_end_ms,
            });
        }
        Ok(())
    }

    /// Names each timed trial through the identity table.
    /// Trials without an identity, or repeating an earlier trial's name, are
    /// reported and left out.
    pub fn assemble_windows(
        participant: &str,
        identity: &TrialIdentityTable,
        timings: &[TrialTiming],
    ) -> (Vec<TrialWindow>, Vec<GazeError>) {
        let mut windows = Vec::with_capacity(timings.len());
        let mut errors = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for timing in timings {
            let Some(name) = identity.name_of(timing.trial_number) else {
                errors.push(GazeError::UnknownTrial {
                    participant: participant.to_string(),
                    trial_number: timing.trial_number,
                });
                continue;
            };

            if !seen.insert(name) {
                errors.push(GazeError::DuplicateTrial {
                    participant: participant.to_string(),
                    trial: name.to_string(),
                    trial_number: timing.trial_number,
                });
                continue;
            }

            windows.push(TrialWindow {
                name: name.to_string(),
                trial_number: timing.trial_number,
                start_s: timing.start_s,
                end_s: timing.end_s,
            });
        }

        (windows, errors)
    }

    /// Maps each window (ascending start time) onto `[start_index, end_index)`.
    ///
    /// A cursor walks forward through the samples and never moves back. For each
    /// trial, `start_index` is the first sample at or after the cursor with
    /// `t >= start`, `end_index` the first sample from there with `t >= end`, and
    /// the cursor then moves to `end_index + 1`. If the sample under the cursor is
    /// already past a trial's start, the previous trial bled into this one and
    /// both are dropped.
    pub fn resolve(windows: &[TrialWindow], timestamps_ms: &[f64]) -> Segmentation {
        let mut candidates: Vec<ResolvedTrial> = Vec::with_capacity(windows.len());
        let mut overlapping: Vec<String> = Vec::new();
        let mut unmatched = Vec::new();

        let mut cursor = 0;
        let mut prev_name: Option<&str> = None;

        for window in windows {
            let start_ms = window.start_ms();
            let end_ms = window.end_ms();

            // 1. Collision with the previous trial
            if timestamps_ms.get(cursor).is_some_and(|&t| t > start_ms) {
                match prev_name {
                    Some(prev) => {
                        Self::flag(&mut overlapping, prev);
                        Self::flag(&mut overlapping, &window.name);
                    }
                    None => {
                        // Nothing before it to collide with: the trial predates the recording
                        unmatched.push((window.name.clone(), TrialBoundary::Start, window.start_s));
                        prev_name = Some(window.name.as_str());
                        if let Some(end_index) = Self::first_at_or_after(timestamps_ms, cursor, end_ms) {
                            cursor = end_index + 1;
                        }
                        continue;
                    }
                }
            }
            prev_name = Some(window.name.as_str());

            // 2. Locate boundaries
            let Some(start_index) = Self::first_at_or_after(timestamps_ms, cursor, start_ms) else {
                unmatched.push((window.name.clone(), TrialBoundary::Start, window.start_s));
                continue;
            };
            let Some(end_index) = Self::first_at_or_after(timestamps_ms, start_index, end_ms) else {
                unmatched.push((window.name.clone(), TrialBoundary::End, window.end_s));
                cursor = timestamps_ms.len();
                continue;
            };
            cursor = end_index + 1;

            candidates.push(ResolvedTrial {
                window: window.clone(),
                start_index,
                end_index,
            });
        }

        let trials = candidates
            .into_iter()
            .filter(|t| !overlapping.iter().any(|name| name == t.name()))
            .collect();

        Segmentation {
            trials,
            overlapping,
            unmatched,
        }
    }

    /// First sample from `from` on whose timestamp reaches `threshold_ms`.
    /// Assumes timestamps only move forward; out-of-order samples make the
    /// first match land early and the resulting ranges unreliable.
    fn first_at_or_after(timestamps_ms: &[f64], from: usize, threshold_ms: f64) -> Option<usize> {
        timestamps_ms
            .get(from..)?
            .iter()
            .position(|&t| t >= threshold_ms)
            .map(|offset| from + offset)
    }

    fn flag(overlapping: &mut Vec<String>, name: &str) {
        if !overlapping.iter().any(|n| n == name) {
            overlapping.push(name.to_string());
        }
    }
}
