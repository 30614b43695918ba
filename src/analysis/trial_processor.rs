use {
    super::{
        gap_filler::GapFiller,
        ratios::RatioCalculator,
        segmenter::TrialSegmenter,
        timeline::TimelineBuilder,
    },
    crate::{
        config::AnalysisConfig,
        domain::{AoiLabel, GazeRecording, ResolvedTrial, TrialIdentityTable, TrialTimingTable},
        models::{
            GazeError, ParticipantRecord, ParticipantReport, TransitionSet, TrialRecord,
        },
        trace_time,
        utils::complement_ratio,
    },
};

pub struct TrialProcessor;

impl TrialProcessor {
    /// Runs the full pipeline for one recording and its trial tables.
    /// Never fails: every problem becomes a diagnostic on the report.
    pub fn process_participant(
        recording: &GazeRecording,
        identity: &TrialIdentityTable,
        timings: &TrialTimingTable,
        config: &AnalysisConfig,
    ) -> ParticipantReport {
        let participant = recording.participant_id.as_str();

        trace_time!(format!("process {}", participant), 50_000, {
            // 1. Whole-participant gate
            let timings = timings.sorted_by_start();
            if let Err(e) =
                TrialSegmenter::check_recording_length(participant, &recording.timestamps_ms, &timings)
            {
                e.log();
                return ParticipantReport::rejected(participant, e);
            }

            // 2. Name and place every trial
            let (windows, mut diagnostics) =
                TrialSegmenter::assemble_windows(participant, identity, &timings);
            let segmentation = TrialSegmenter::resolve(&windows, &recording.timestamps_ms);

            if !segmentation.overlapping.is_empty() {
                diagnostics.push(GazeError::OverlappingTrials {
                    participant: participant.to_string(),
                    trials: segmentation.overlapping.clone(),
                });
            }
            for (trial, boundary, time_s) in &segmentation.unmatched {
                diagnostics.push(GazeError::MissingTimestampMatch {
                    participant: participant.to_string(),
                    trial: trial.clone(),
                    boundary: *boundary,
                    time_s: *time_s,
                });
            }

            // 3. Per-trial analysis
            let durations = recording.sample_durations();
            let mut trials = Vec::with_capacity(segmentation.trials.len());

            for resolved in segmentation.trials {
                let record = Self::process_trial(recording, &durations, resolved, config);
                if record.ratios.is_none() {
                    diagnostics.push(GazeError::EmptyTrial {
                        participant: participant.to_string(),
                        trial: record.name().to_string(),
                    });
                }
                trials.push(record);
            }

            for diagnostic in &diagnostics {
                diagnostic.log();
            }

            let trials_dropped = timings.len().saturating_sub(trials.len());
            log::info!(
                "{}: {} trials emitted, {} dropped",
                participant,
                trials.len(),
                trials_dropped
            );

            ParticipantReport {
                participant_id: participant.to_string(),
                record: Some(ParticipantRecord {
                    participant_id: participant.to_string(),
                    participant_error_ratio: Self::aggregate_error_ratio(&trials),
                    trials,
                }),
                diagnostics,
                trials_dropped,
            }
        })
    }

    /// Classify -> gap fill -> timeline -> ratios and transitions -> looks.
    pub fn process_trial(
        recording: &GazeRecording,
        durations: &[f64],
        trial: ResolvedTrial,
        config: &AnalysisConfig,
    ) -> TrialRecord {
        let range = trial.range();

        let raw: Vec<AoiLabel> = range
            .clone()
            .map(|i| config.aoi.classify(recording.gaze_x[i], recording.gaze_y[i]))
            .collect();
        let invalid_sample_count = raw.iter().filter(|&&l| l == AoiLabel::Invalid).count();

        let labels = GapFiller::fill(&raw);
        let durations = &durations[range];

        let timeline = TimelineBuilder::build(&labels, durations);
        let ratios = RatioCalculator::compute(&labels, durations);
        let transitions = TransitionSet::build(&labels, timeline.intervals(), config.neither_cutoff_ms);

        TrialRecord {
            first_look: timeline.first_look(),
            last_look: timeline.last_look(),
            first_valid_look: timeline.first_valid_look(),
            last_valid_look: timeline.last_valid_look(),
            ratios,
            transitions,
            invalid_sample_count,
            error_ratio: complement_ratio(invalid_sample_count, raw.len()),
            timeline,
            trial,
        }
    }

    /// Share of non-Invalid samples over several trials, weighted by sample count.
    pub fn aggregate_error_ratio(trials: &[TrialRecord]) -> Option<f64> {
        let invalid: usize = trials.iter().map(|t| t.invalid_sample_count).sum();
        let samples: usize = trials.iter().map(|t| t.sample_count()).sum();
        complement_ratio(invalid, samples)
    }
}
