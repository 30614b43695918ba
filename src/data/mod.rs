mod discovery;
mod export;
mod recording_io;
mod timing_io;

use anyhow::{Result, anyhow};

pub use {
    discovery::{RecordingName, Session, TaskKind, discover_sessions},
    export::{OutputPaths, csv_header, export_all, write_csv, write_errors, write_json},
    recording_io::{load_recording, read_recording, save_recording, write_recording},
    timing_io::{
        TimingRow, load_timing, read_timing, read_timing_workbook, save_timing, write_timing,
    },
};

/// Position of `name` in a header row. Names are trimmed and compared case-insensitively.
pub(crate) fn column_index(header: &csv::StringRecord, name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("Missing column {:?}", name))
}

/// A finite number, or None for empty and non-numeric cells.
pub(crate) fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
