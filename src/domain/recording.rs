use serde::{Deserialize, Serialize};

// ============================================================================
// GazeRecording: Raw sample stream for one participant session
// ============================================================================

/// Column-oriented storage of every sample of a recording, in file order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GazeRecording {
    pub participant_id: String,

    pub timestamps_ms: Vec<f64>,
    pub gaze_x: Vec<f64>,
    pub gaze_y: Vec<f64>,
}

impl GazeRecording {
    pub fn new(participant_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            ..Default::default()
        }
    }

    /// Builds a recording from `(timestamp_ms, x, y)` triples.
    pub fn from_samples<I>(participant_id: impl Into<String>, samples: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64, f64)>,
    {
        let iter = samples.into_iter();
        let (lower, _) = iter.size_hint();

        let mut recording = Self {
            participant_id: participant_id.into(),
            timestamps_ms: Vec::with_capacity(lower),
            gaze_x: Vec::with_capacity(lower),
            gaze_y: Vec::with_capacity(lower),
        };
        for (ts, x, y) in iter {
            recording.push(ts, x, y);
        }
        recording
    }

    pub fn push(&mut self, timestamp_ms: f64, x: f64, y: f64) {
        self.timestamps_ms.push(timestamp_ms);
        self.gaze_x.push(x);
        self.gaze_y.push(y);
    }

    pub fn len(&self) -> usize {
        self.timestamps_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps_ms.is_empty()
    }

    pub fn last_timestamp_ms(&self) -> Option<f64> {
        self.timestamps_ms.last().copied()
    }

    /// Exposure window of every sample: half the distance between its neighbours.
    /// The first and last samples only have one neighbour, so their window is
    /// one-sided and the durations sum to `t[n-1] - t[0]`.
    pub fn sample_durations(&self) -> Vec<f64> {
        let ts = &self.timestamps_ms;
        let len = ts.len();
        if len == 0 {
            return Vec::new();
        }
        let last = len - 1;

        (0..len)
            .map(|i| {
                let prev = ts[i.saturating_sub(1)];
                let next = ts[(i + 1).min(last)];
                (next - prev) / 2.0
            })
            .collect()
    }
}
