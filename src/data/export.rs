use {
    super::discovery::TaskKind,
    crate::{
        analysis::{Interval, Ratios, TransitionMatrix, TransitionPolicy},
        config::{NO_VALID_LOOK, constants::naming},
        domain::AoiLabel,
        models::{BatchResults, GazeError, ParticipantRecord, TrialRecord},
    },
    anyhow::{Context, Result},
    serde::Serialize,
    std::{
        collections::BTreeMap,
        fs::{self, File},
        io::{BufWriter, Write},
        path::{Path, PathBuf},
    },
    strum::IntoEnumIterator,
};

/// Where one run writes its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
    pub errors: PathBuf,
}

impl OutputPaths {
    pub fn in_folder(folder: &Path, json: &str, csv: &str, errors: &str) -> Self {
        Self {
            json: folder.join(json),
            csv: folder.join(csv),
            errors: folder.join(errors),
        }
    }
}

pub fn export_all(results: &BatchResults, paths: &OutputPaths) -> Result<()> {
    for path in [&paths.json, &paths.csv, &paths.errors] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create results folder {:?}", parent))?;
        }
    }

    write_file(&paths.json, |w| write_json(w, results))?;
    write_file(&paths.csv, |w| write_csv(w, results))?;
    write_file(&paths.errors, |w| write_errors(w, &results.diagnostics))?;

    log::info!(
        "Wrote {} participants to {:?}, {:?} and {:?}",
        results.participants.len(),
        paths.json,
        paths.csv,
        paths.errors
    );
    Ok(())
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).with_context(|| format!("Failed to write {:?}", path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {:?}", path))
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Serialize)]
struct ParticipantView<'a> {
    participant_id: &'a str,
    participant_error_ratio: Option<f64>,
    trials: Vec<TrialView<'a>>,
}

#[derive(Serialize)]
struct TrialView<'a> {
    name: &'a str,
    trial_number: u32,
    start_index: usize,
    end_index: usize,
    nominal_duration_ms: f64,
    sample_count: usize,
    invalid_sample_count: usize,
    timeline: Vec<String>,
    first_look: String,
    last_look: String,
    first_valid_look: String,
    last_valid_look: String,
    ratios: Option<&'a Ratios>,
    markov: &'a TransitionMatrix,
    adj_markov: &'a TransitionMatrix,
    nei_markov: &'a TransitionMatrix,
    trial_error_ratio: Option<f64>,
}

impl<'a> From<&'a ParticipantRecord> for ParticipantView<'a> {
    fn from(record: &'a ParticipantRecord) -> Self {
        Self {
            participant_id: &record.participant_id,
            participant_error_ratio: record.participant_error_ratio,
            trials: record.trials.iter().map(TrialView::from).collect(),
        }
    }
}

impl<'a> From<&'a TrialRecord> for TrialView<'a> {
    fn from(record: &'a TrialRecord) -> Self {
        let look = |interval: Option<Interval>| {
            interval.map_or_else(|| NO_VALID_LOOK.to_string(), |i| i.to_string())
        };
        Self {
            name: record.name(),
            trial_number: record.trial.window.trial_number,
            start_index: record.trial.start_index,
            end_index: record.trial.end_index,
            nominal_duration_ms: record.nominal_duration_ms(),
            sample_count: record.sample_count(),
            invalid_sample_count: record.invalid_sample_count,
            timeline: record.timeline.to_strings(),
            first_look: look(record.first_look),
            last_look: look(record.last_look),
            first_valid_look: look(record.first_valid_look),
            last_valid_look: look(record.last_valid_look),
            ratios: record.ratios.as_ref(),
            markov: record.transitions.get(TransitionPolicy::Raw),
            adj_markov: record.transitions.get(TransitionPolicy::RunCollapsed),
            nei_markov: record.transitions.get(TransitionPolicy::NoiseFiltered),
            trial_error_ratio: record.error_ratio,
        }
    }
}

/// Pretty JSON object keyed by participant id.
pub fn write_json<W: Write>(writer: W, results: &BatchResults) -> Result<()> {
    let views: BTreeMap<&str, ParticipantView> = results
        .participants
        .iter()
        .map(|(id, record)| (id.as_str(), ParticipantView::from(record)))
        .collect();
    serde_json::to_writer_pretty(writer, &views)?;
    Ok(())
}

// ============================================================================
// CSV
// ============================================================================

const LOOK_COLUMNS: [&str; 4] = ["First_Look", "First_Valid_Look", "Last_Look", "Last_Valid_Look"];

/// Column names of the flat per-trial table.
pub fn csv_header() -> Vec<String> {
    let mut header: Vec<String> = ["Participant", "Letter_Code", "Row", "Column"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    for look in LOOK_COLUMNS {
        header.push(look.to_string());
        header.push(format!("{}_Time", look));
    }

    header.push("Total_Time".to_string());
    for label in AoiLabel::iter() {
        header.push(format!("%{}", label.short_name()));
        header.push(format!("{}_Time", label.short_name()));
    }

    for policy in TransitionPolicy::iter() {
        for from in AoiLabel::iter() {
            for to in AoiLabel::iter() {
                header.push(format!(
                    "{}{}_to_{}",
                    policy.column_prefix(),
                    from.short_name(),
                    to.short_name()
                ));
            }
        }
    }

    header.push("Participant_NaN_Ratio".to_string());
    header.push("Trial_NaN_Ratio".to_string());
    header
}

/// One row per emitted trial. Undefined values are empty cells.
pub fn write_csv<W: Write>(writer: W, results: &BatchResults) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(csv_header())?;

    for record in results.participants.values() {
        for trial in &record.trials {
            csv_writer.write_record(csv_row(record, trial))?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

fn csv_row(participant: &ParticipantRecord, trial: &TrialRecord) -> Vec<String> {
    let (number, task_token) = participant
        .participant_id
        .split_once(naming::PARTICIPANT_SUFFIX)
        .unwrap_or((participant.participant_id.as_str(), ""));
    let letter_code = TaskKind::from_token(task_token)
        .map(|t| t.letter_code().to_string())
        .unwrap_or_default();
    let (row, column) = trial.name().split_once('-').unwrap_or((trial.name(), ""));

    let mut cells = vec![
        number.to_string(),
        letter_code,
        row.to_string(),
        column.to_string(),
    ];

    for look in [
        trial.first_look,
        trial.first_valid_look,
        trial.last_look,
        trial.last_valid_look,
    ] {
        match look {
            Some(interval) => {
                cells.push(interval.label.to_string());
                cells.push(number_cell(interval.duration_ms));
            }
            None => cells.extend([String::new(), String::new()]),
        }
    }

    cells.push(number_cell(trial.nominal_duration_ms()));
    for label in AoiLabel::iter() {
        match &trial.ratios {
            Some(ratios) => {
                let share = ratios.share(label);
                cells.push(number_cell(share.fraction));
                cells.push(number_cell(share.duration_ms));
            }
            None => cells.extend([String::new(), String::new()]),
        }
    }

    for policy in TransitionPolicy::iter() {
        let matrix = trial.transitions.get(policy);
        for from in AoiLabel::iter() {
            for to in AoiLabel::iter() {
                cells.push(optional_cell(matrix.probability(from, to)));
            }
        }
    }

    cells.push(optional_cell(participant.participant_error_ratio));
    cells.push(optional_cell(trial.error_ratio));
    cells
}

fn number_cell(value: f64) -> String {
    format!("{:?}", value)
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(number_cell).unwrap_or_default()
}

// ============================================================================
// Error log
// ============================================================================

pub fn write_errors<W: Write>(mut writer: W, diagnostics: &[GazeError]) -> Result<()> {
    for diagnostic in diagnostics {
        writeln!(writer, "{}", diagnostic)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            analysis::TrialProcessor,
            config::ANALYSIS,
            domain::{GazeRecording, ResolvedTrial, TrialWindow},
        },
    };

    fn sample_results() -> BatchResults {
        // L L N R R at 5ms spacing, padded either side
        let points = [
            (960.0, 100.0),
            (500.0, 500.0),
            (500.0, 500.0),
            (960.0, 100.0),
            (1400.0, 500.0),
            (1400.0, 500.0),
            (960.0, 100.0),
        ];
        let rec = GazeRecording::from_samples(
            "101CEArrow",
            points.iter().enumerate().map(|(i, &(x, y))| (i as f64 * 5.0, x, y)),
        );
        let durations = rec.sample_durations();
        let trial = ResolvedTrial {
            window: TrialWindow {
                name: "2-3".to_string(),
                trial_number: 4,
                start_s: 0.005,
                end_s: 0.03,
            },
            start_index: 1,
            end_index: 6,
        };
        let record = TrialProcessor::process_trial(&rec, &durations, trial, &ANALYSIS);

        let mut results = BatchResults::default();
        results.participants.insert(
            "101CEArrow".to_string(),
            ParticipantRecord {
                participant_id: "101CEArrow".to_string(),
                participant_error_ratio: Some(1.0),
                trials: vec![record],
            },
        );
        results
    }

    #[test]
    fn test_csv_header_layout() {
        let header = csv_header();
        assert_eq!(header.len(), 4 + 8 + 1 + 8 + 48 + 2);
        assert_eq!(header[4], "First_Look");
        assert_eq!(header[13], "%L");
        assert_eq!(header[21], "L_to_L");
        assert_eq!(header[22], "L_to_R");
        assert_eq!(header[37], "Adj_L_to_L");
        assert_eq!(header[53], "Nei_L_to_L");
        assert_eq!(header[68], "Nei_Neither_to_Neither");
        assert_eq!(header[69], "Participant_NaN_Ratio");
    }

    #[test]
    fn test_csv_row() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample_results()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        let header: Vec<&str> = lines.next().unwrap().split(',').collect();
        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert!(lines.next().is_none());

        let cell = |name: &str| row[header.iter().position(|h| *h == name).unwrap()];
        assert_eq!(cell("Participant"), "101");
        assert_eq!(cell("Letter_Code"), "A");
        assert_eq!((cell("Row"), cell("Column")), ("2", "3"));
        assert_eq!(cell("First_Look"), "Left");
        assert_eq!(cell("First_Look_Time"), "10.0");
        assert_eq!(cell("Total_Time"), "25.0");
        assert_eq!(cell("%L"), "0.4");
        assert_eq!(cell("L_to_L"), "0.5");
        assert_eq!(cell("NaN_to_L"), "");
        assert_eq!(cell("Adj_L_to_Neither"), "1.0");
        assert_eq!(cell("Nei_L_to_R"), "1.0");
        assert_eq!(cell("Trial_NaN_Ratio"), "1.0");
    }

    #[test]
    fn test_json_shape() {
        let mut buf = Vec::new();
        write_json(&mut buf, &sample_results()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        let trial = &json["101CEArrow"]["trials"][0];
        assert_eq!(trial["name"], "2-3");
        assert_eq!(trial["timeline"][0], "Left: 10.0ms");
        assert_eq!(trial["first_valid_look"], "Left: 10.0ms");
        assert_eq!(trial["ratios"]["L"]["fraction"], 0.4);
        assert_eq!(trial["markov"]["Left"]["Left"]["count"], 1);
        assert!(trial["markov"]["NaN"]["Left"]["probability"].is_null());
    }

    #[test]
    fn test_error_log_lines() {
        let diagnostics = [
            GazeError::MissingCompanionData { file: "a.csv".to_string() },
            GazeError::NoTrials { participant: "p".to_string() },
        ];
        let mut buf = Vec::new();
        write_errors(&mut buf, &diagnostics).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "a.csv - No timing file found\np - No timed trials\n"
        );
    }
}
