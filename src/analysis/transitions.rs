use {
    super::timeline::Interval,
    crate::domain::AoiLabel,
    itertools::Itertools,
    serde::{Serialize, Serializer, ser::SerializeMap},
    strum::IntoEnumIterator,
    strum_macros::{Display, EnumIter},
};

/// How adjacent analysis units are paired up when counting transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TransitionPolicy {
    /// Every adjacent pair of samples, self-loops included.
    #[strum(to_string = "Markov")]
    Raw,
    /// Every run boundary of the timeline.
    #[strum(to_string = "Adj_Markov")]
    RunCollapsed,
    /// Run boundaries, skipping short Neither runs that bridge Left and Right.
    #[strum(to_string = "Nei_Markov")]
    NoiseFiltered,
}

impl TransitionPolicy {
    /// Prefix of this policy's flattened export columns.
    pub const fn column_prefix(self) -> &'static str {
        match self {
            TransitionPolicy::Raw => "",
            TransitionPolicy::RunCollapsed => "Adj_",
            TransitionPolicy::NoiseFiltered => "Nei_",
        }
    }
}

/// 4x4 transition counts indexed by [`AoiLabel::index`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionMatrix {
    counts: [[u32; AoiLabel::COUNT]; AoiLabel::COUNT],
}

impl TransitionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, from: AoiLabel, to: AoiLabel) {
        self.counts[from.index()][to.index()] += 1;
    }

    pub fn count(&self, from: AoiLabel, to: AoiLabel) -> u32 {
        self.counts[from.index()][to.index()]
    }

    /// Number of outgoing transitions from `from`.
    pub fn row_total(&self, from: AoiLabel) -> u32 {
        self.counts[from.index()].iter().sum()
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }

    /// `count(from, to) / row_total(from)`; None when `from` never transitions.
    pub fn probability(&self, from: AoiLabel, to: AoiLabel) -> Option<f64> {
        match self.row_total(from) {
            0 => None,
            total => Some(self.count(from, to) as f64 / total as f64),
        }
    }

    // ------------------------------------------------------------------------
    // Policies
    // ------------------------------------------------------------------------

    pub fn build(
        policy: TransitionPolicy,
        labels: &[AoiLabel],
        runs: &[Interval],
        neither_cutoff_ms: f64,
    ) -> Self {
        match policy {
            TransitionPolicy::Raw => Self::from_samples(labels),
            TransitionPolicy::RunCollapsed => Self::from_runs(runs),
            TransitionPolicy::NoiseFiltered => Self::from_runs_filtered(runs, neither_cutoff_ms),
        }
    }

    /// Raw policy: one count per adjacent sample pair.
    pub fn from_samples(labels: &[AoiLabel]) -> Self {
        let mut matrix = Self::new();
        for (&from, &to) in labels.iter().tuple_windows() {
            matrix.record(from, to);
        }
        matrix
    }

    /// Run-collapsed policy: one count per run boundary. No self-loops by construction.
    pub fn from_runs(runs: &[Interval]) -> Self {
        let mut matrix = Self::new();
        for (from, to) in runs.iter().tuple_windows() {
            matrix.record(from.label, to.label);
        }
        matrix
    }

    /// Noise-filtered policy.
    ///
    /// A Neither run shorter than `neither_cutoff_ms` sitting between a Left and a
    /// Right run (either order) is gaze crossing the gap between the AOIs, so the
    /// transition is counted straight across it and the walk resumes from the run
    /// after it. A Neither that opens or closes the timeline has no AOI on one
    /// side and is never skipped.
    pub fn from_runs_filtered(runs: &[Interval], neither_cutoff_ms: f64) -> Self {
        let mut matrix = Self::new();

        let mut i = 0;
        while i + 1 < runs.len() {
            let from = runs[i].label;
            let mut next = i + 1;
            if Self::is_transit_neither(runs, next, neither_cutoff_ms) {
                next += 1;
            }
            matrix.record(from, runs[next].label);
            i = next;
        }

        matrix
    }

    fn is_transit_neither(runs: &[Interval], k: usize, neither_cutoff_ms: f64) -> bool {
        let (Some(before), Some(mid), Some(after)) = (
            k.checked_sub(1).and_then(|p| runs.get(p)),
            runs.get(k),
            runs.get(k + 1),
        ) else {
            return false;
        };

        mid.label == AoiLabel::Neither
            && mid.duration_ms < neither_cutoff_ms
            && before.label.opposite_aoi() == Some(after.label)
    }
}

/// Serialized as `{from: {to: {count, probability}}}` in label order.
/// An undefined probability is `null`.
impl Serialize for TransitionMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut outer = serializer.serialize_map(Some(AoiLabel::COUNT))?;
        for from in AoiLabel::iter() {
            outer.serialize_entry(&from, &MatrixRow { matrix: self, from })?;
        }
        outer.end()
    }
}

struct MatrixRow<'a> {
    matrix: &'a TransitionMatrix,
    from: AoiLabel,
}

#[derive(Serialize)]
struct MatrixCell {
    count: u32,
    probability: Option<f64>,
}

impl Serialize for MatrixRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_map(Some(AoiLabel::COUNT))?;
        for to in AoiLabel::iter() {
            let cell = MatrixCell {
                count: self.matrix.count(self.from, to),
                probability: self.matrix.probability(self.from, to),
            };
            row.serialize_entry(&to, &cell)?;
        }
        row.end()
    }
}
