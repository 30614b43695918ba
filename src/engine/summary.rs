use {
    crate::models::ParticipantReport,
    std::fmt,
    strum_macros::Display,
    tabled::{Table, Tabled, settings::Style},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ParticipantStatus {
    #[strum(to_string = "ok")]
    Accepted,
    #[strum(to_string = "ok with warnings")]
    AcceptedWithWarnings,
    #[strum(to_string = "rejected")]
    Rejected,
}

/// One line of the end-of-run table.
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "Participant")]
    pub participant: String,
    #[tabled(rename = "Trials")]
    pub trials_emitted: usize,
    #[tabled(rename = "Dropped")]
    pub trials_dropped: usize,
    #[tabled(rename = "Valid ratio")]
    pub participant_error_ratio: String,
    #[tabled(rename = "Status")]
    pub status: ParticipantStatus,
}

impl From<&ParticipantReport> for SummaryRow {
    fn from(report: &ParticipantReport) -> Self {
        let status = match (&report.record, report.diagnostics.is_empty()) {
            (None, _) => ParticipantStatus::Rejected,
            (Some(_), true) => ParticipantStatus::Accepted,
            (Some(_), false) => ParticipantStatus::AcceptedWithWarnings,
        };
        let record = report.record.as_ref();

        Self {
            participant: report.participant_id.clone(),
            trials_emitted: record.map_or(0, |r| r.trials.len()),
            trials_dropped: report.trials_dropped,
            participant_error_ratio: record
                .and_then(|r| r.participant_error_ratio)
                .map_or_else(|| "-".to_string(), |v| format!("{:.3}", v)),
            status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub rows: Vec<SummaryRow>,
    /// Recordings skipped before processing (naming or pairing problems).
    pub skipped_files: usize,
    pub diagnostics: usize,
}

impl BatchSummary {
    pub fn any_rejected(&self) -> bool {
        self.rows.iter().any(|r| r.status == ParticipantStatus::Rejected)
    }

    pub fn accepted(&self) -> usize {
        self.rows.iter().filter(|r| r.status != ParticipantStatus::Rejected).count()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = Table::new(self.rows.clone());
        table.with(Style::modern());
        writeln!(f, "{}", table)?;
        write!(
            f,
            "{} of {} participants accepted, {} files skipped, {} diagnostics",
            self.accepted(),
            self.rows.len(),
            self.skipped_files,
            self.diagnostics
        )
    }
}
