use {
    crate::domain::AoiLabel,
    serde::Serialize,
    strum::IntoEnumIterator,
};

/// Dwell on one label: share of the trial and absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LabelShare {
    pub fraction: f64,
    pub duration_ms: f64,
}

/// Per-label dwell of one trial, computed on the gap-filled column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ratios {
    #[serde(rename = "L")]
    pub left: LabelShare,
    #[serde(rename = "R")]
    pub right: LabelShare,
    #[serde(rename = "NaN")]
    pub invalid: LabelShare,
    #[serde(rename = "Neither")]
    pub neither: LabelShare,
    pub total_ms: f64,
}

impl Ratios {
    pub fn share(&self, label: AoiLabel) -> LabelShare {
        match label {
            AoiLabel::Left => self.left,
            AoiLabel::Right => self.right,
            AoiLabel::Invalid => self.invalid,
            AoiLabel::Neither => self.neither,
        }
    }
}

pub struct RatioCalculator;

impl RatioCalculator {
    /// Sums sample durations per label and divides by the trial total.
    /// Returns None when the trial has no duration to divide by.
    pub fn compute(labels: &[AoiLabel], durations: &[f64]) -> Option<Ratios> {
        debug_assert_eq!(labels.len(), durations.len());

        let mut sums = [0.0_f64; AoiLabel::COUNT];
        for (label, duration) in labels.iter().zip(durations) {
            sums[label.index()] += duration;
        }
        let total_ms: f64 = AoiLabel::iter().map(|l| sums[l.index()]).sum();

        if total_ms <= 0.0 || !total_ms.is_finite() {
            return None;
        }

        let share = |label: AoiLabel| {
            let duration_ms = sums[label.index()];
            LabelShare {
                fraction: duration_ms / total_ms,
                duration_ms,
            }
        };

        Some(Ratios {
            left: share(AoiLabel::Left),
            right: share(AoiLabel::Right),
            invalid: share(AoiLabel::Invalid),
            neither: share(AoiLabel::Neither),
            total_ms,
        })
    }
}
