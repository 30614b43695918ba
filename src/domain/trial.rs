use {
    crate::utils::MS_IN_S,
    serde::Serialize,
    std::{collections::HashMap, ops::Range},
};

/// Trial number -> `"{row}-{column}"` lookup (first sheet of a timing workbook).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialIdentityTable {
    names: HashMap<u32, String>,
}

impl TrialIdentityTable {
    pub fn insert(&mut self, trial_number: u32, row: i64, column: i64) {
        self.names.insert(trial_number, format!("{}-{}", row, column));
    }

    pub fn name_of(&self, trial_number: u32) -> Option<&str> {
        self.names.get(&trial_number).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One row of the timing sheet. Times are wall-clock seconds from recording start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialTiming {
    pub trial_number: u32,
    pub start_s: f64,
    pub end_s: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialTimingTable {
    rows: Vec<TrialTiming>,
}

impl TrialTimingTable {
    /// Adds a row. Rows lacking a start or an end are not timed trials and are dropped.
    /// Returns whether the row was kept.
    pub fn push_row(&mut self, trial_number: u32, start_s: Option<f64>, end_s: Option<f64>) -> bool {
        match (start_s, end_s) {
            (Some(start_s), Some(end_s)) if start_s.is_finite() && end_s.is_finite() => {
                self.rows.push(TrialTiming {
                    trial_number,
                    start_s,
                    end_s,
                });
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in ascending start time (stable for equal starts).
    pub fn sorted_by_start(&self) -> Vec<TrialTiming> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| a.start_s.total_cmp(&b.start_s));
        rows
    }
}

/// A named trial with its nominal wall-clock window, before index resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialWindow {
    pub name: String,
    pub trial_number: u32,
    pub start_s: f64,
    pub end_s: f64,
}

impl TrialWindow {
    #[inline]
    pub fn start_ms(&self) -> f64 {
        self.start_s * MS_IN_S
    }

    #[inline]
    pub fn end_ms(&self) -> f64 {
        self.end_s * MS_IN_S
    }

    pub fn nominal_duration_ms(&self) -> f64 {
        self.end_ms() - self.start_ms()
    }
}

/// A trial mapped onto the sample sequence. `start_index..end_index` is half-open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTrial {
    pub window: TrialWindow,
    pub start_index: usize,
    pub end_index: usize,
}

impl ResolvedTrial {
    pub fn name(&self) -> &str {
        &self.window.name
    }

    pub fn range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    pub fn sample_count(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }
}
