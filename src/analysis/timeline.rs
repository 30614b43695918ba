use {
    crate::{domain::AoiLabel, utils::format_ms},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// One run of consecutive same-label samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub label: AoiLabel,
    pub duration_ms: f64,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, format_ms(self.duration_ms))
    }
}

/// Run-length encoded gaze path of one trial, in temporal order.
/// Adjacent intervals never share a label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    intervals: Vec<Interval>,
}

impl Timeline {
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn total_duration_ms(&self) -> f64 {
        self.intervals.iter().map(|i| i.duration_ms).sum()
    }

    /// First run regardless of label.
    pub fn first_look(&self) -> Option<Interval> {
        self.intervals.first().copied()
    }

    pub fn last_look(&self) -> Option<Interval> {
        self.intervals.last().copied()
    }

    /// First run on the Left or Right AOI.
    pub fn first_valid_look(&self) -> Option<Interval> {
        self.intervals.iter().find(|i| i.label.is_aoi()).copied()
    }

    pub fn last_valid_look(&self) -> Option<Interval> {
        self.intervals.iter().rev().find(|i| i.label.is_aoi()).copied()
    }

    /// Human/export form: `"{label}: {duration}ms"` per interval.
    pub fn to_strings(&self) -> Vec<String> {
        self.intervals.iter().map(Interval::to_string).collect()
    }
}

pub struct TimelineBuilder;

impl TimelineBuilder {
    /// Merges consecutive same-label samples, summing their durations.
    /// `labels` and `durations` are parallel per-sample columns.
    pub fn build(labels: &[AoiLabel], durations: &[f64]) -> Timeline {
        debug_assert_eq!(labels.len(), durations.len());

        let mut intervals: Vec<Interval> = Vec::new();

        for (&label, &duration_ms) in labels.iter().zip(durations) {
            match intervals.last_mut() {
                Some(current) if current.label == label => current.duration_ms += duration_ms,
                _ => intervals.push(Interval { label, duration_ms }),
            }
        }

        Timeline { intervals }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AoiLabel::*;

    #[test]
    fn test_runs_are_merged() {
        let labels = [Left, Left, Left, Neither, Right, Right];
        let durations = [5.0, 5.0, 5.0, 2.5, 5.0, 7.5];
        let timeline = TimelineBuilder::build(&labels, &durations);

        assert_eq!(
            timeline.intervals(),
            &[
                Interval { label: Left, duration_ms: 15.0 },
                Interval { label: Neither, duration_ms: 2.5 },
                Interval { label: Right, duration_ms: 12.5 },
            ]
        );
        assert_eq!(
            timeline.to_strings(),
            vec!["Left: 15.0ms", "Neither: 2.5ms", "Right: 12.5ms"]
        );
    }

    #[test]
    fn test_total_time_is_preserved() {
        let labels = [Left, Invalid, Invalid, Left, Neither, Neither, Right, Left];
        let durations = [4.9, 5.1, 5.0, 4.7, 5.3, 5.0, 4.95, 5.05];
        let timeline = TimelineBuilder::build(&labels, &durations);

        let expected: f64 = durations.iter().sum();
        assert!((timeline.total_duration_ms() - expected).abs() < 1e-9);

        for pair in timeline.intervals().windows(2) {
            assert_ne!(pair[0].label, pair[1].label);
        }
    }

    #[test]
    fn test_looks() {
        let labels = [Neither, Invalid, Invalid, Right, Neither, Left, Neither];
        let durations = [1.0; 7];
        let timeline = TimelineBuilder::build(&labels, &durations);

        assert_eq!(timeline.first_look().map(|i| i.label), Some(Neither));
        assert_eq!(timeline.last_look().map(|i| i.label), Some(Neither));
        assert_eq!(timeline.first_valid_look().map(|i| i.label), Some(Right));
        assert_eq!(timeline.last_valid_look().map(|i| i.label), Some(Left));
    }

    #[test]
    fn test_no_valid_look() {
        let timeline = TimelineBuilder::build(&[Neither, Invalid], &[1.0, 1.0]);
        assert!(timeline.first_valid_look().is_none());
        assert!(timeline.last_valid_look().is_none());

        let empty = TimelineBuilder::build(&[], &[]);
        assert!(empty.is_empty());
        assert!(empty.first_look().is_none());
    }
}
