use {
    gaze_aoi::{
        ANALYSIS, BatchConfig, GazeError, run_batch,
        data::{OutputPaths, TimingRow, save_recording, save_timing},
        domain::GazeRecording,
    },
    std::{fs, path::Path},
    tempfile::TempDir,
};

const LEFT: (f64, f64) = (500.0, 500.0);
const RIGHT: (f64, f64) = (1400.0, 500.0);

struct Fixture {
    _root: TempDir,
    data: std::path::PathBuf,
    timing: std::path::PathBuf,
    results: std::path::PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let data = root.path().join("data");
        let timing = root.path().join("timestamps");
        let results = root.path().join("results");
        fs::create_dir_all(&data).unwrap();
        fs::create_dir_all(&timing).unwrap();
        Self {
            _root: root,
            data,
            timing,
            results,
        }
    }

    /// Samples every 5ms up to `end_ms`; Left before `switch_ms`, Right after.
    fn recording(&self, file_name: &str, end_ms: usize, switch_ms: f64) {
        let recording = GazeRecording::from_samples(
            "unused",
            (0..=end_ms).step_by(5).map(|t| {
                let t = t as f64;
                let (x, y) = if t < switch_ms { LEFT } else { RIGHT };
                (t, x, y)
            }),
        );
        save_recording(&self.data.join(file_name), &recording, &[("Respondent", file_name)]).unwrap();
    }

    fn timing(&self, file_name: &str, trials: &[(u32, i64, i64, f64, f64)]) {
        let rows: Vec<TimingRow> = trials
            .iter()
            .map(|&(trial_number, row, column, start, end)| TimingRow {
                trial_number,
                row,
                column,
                start_s: Some(start),
                end_s: Some(end),
            })
            .collect();
        save_timing(&self.timing.join(file_name), &rows).unwrap();
    }

    /// Identity on the first sheet, timing on the second.
    fn timing_workbook(&self, file_name: &str, trials: &[(u32, i64, i64, f64, f64)]) {
        let mut workbook = rust_xlsxwriter::Workbook::new();

        let ids = workbook.add_worksheet();
        for (c, h) in ["Trial", " row", " column"].iter().enumerate() {
            ids.write_string(0, c as u16, *h).unwrap();
        }
        for (r, &(trial_number, row, column, _, _)) in trials.iter().enumerate() {
            let r = r as u32 + 1;
            ids.write_number(r, 0, trial_number as f64).unwrap();
            ids.write_number(r, 1, row as f64).unwrap();
            ids.write_number(r, 2, column as f64).unwrap();
        }

        let times = workbook.add_worksheet();
        for (c, h) in ["Trial", "Start (seconds)", "End"].iter().enumerate() {
            times.write_string(0, c as u16, *h).unwrap();
        }
        for (r, &(trial_number, _, _, start, end)) in trials.iter().enumerate() {
            let r = r as u32 + 1;
            times.write_number(r, 0, trial_number as f64).unwrap();
            times.write_number(r, 1, start).unwrap();
            times.write_number(r, 2, end).unwrap();
        }

        workbook.save(self.timing.join(file_name)).unwrap();
    }

    fn config(&self, results: &Path, parallel: bool) -> BatchConfig {
        BatchConfig {
            data_folder: self.data.clone(),
            timing_folder: self.timing.clone(),
            outputs: OutputPaths::in_folder(results, "out.json", "out.csv", "out_errors.txt"),
            analysis: ANALYSIS,
            parallel,
        }
    }

    fn populate(&self) {
        self.recording("101CE s1 Arrow.csv", 3000, 1250.0);
        self.timing("101CE_I.csv", &[(1, 1, 1, 0.5, 1.0), (2, 1, 2, 1.5, 2.0)]);

        // Stops before its last trial ends
        self.recording("102CE s1 Letter.csv", 1000, 500.0);
        self.timing("102CE_J.csv", &[(1, 1, 1, 0.2, 0.6), (2, 1, 2, 0.8, 2.0)]);

        // Trials 1 and 2 overlap
        self.recording("103CE s1 Arrow.csv", 3000, 0.0);
        self.timing(
            "103CE_I.csv",
            &[(1, 1, 1, 0.5, 1.5), (2, 1, 2, 1.0, 2.0), (3, 2, 1, 2.5, 2.9)],
        );

        // No timing file
        self.recording("104CE s1 Arrow.csv", 3000, 0.0);
        // Naming convention not followed
        self.recording("bad.csv", 3000, 0.0);
    }
}

#[test]
fn test_full_batch() {
    let fx = Fixture::new();
    fx.populate();

    let run = run_batch(&fx.config(&fx.results, true)).unwrap();
    let results = &run.results;

    // Participants
    let ids: Vec<&str> = results.participants.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["101CEArrow", "103CEArrow"]);
    assert_eq!(results.rejected, vec!["102CELetter".to_string()]);
    assert!(run.summary.any_rejected());
    assert_eq!(run.summary.rows.len(), 3);
    assert_eq!(run.summary.skipped_files, 2);

    let p101 = &results.participants["101CEArrow"];
    assert_eq!(p101.trials.len(), 2);
    let first = p101.trial("1-1").unwrap();
    assert_eq!(first.first_look.map(|i| i.label.to_string()), Some("Left".to_string()));
    assert!((first.ratios.unwrap().left.fraction - 1.0).abs() < 1e-12);
    let second = p101.trial("1-2").unwrap();
    assert!((second.ratios.unwrap().right.fraction - 1.0).abs() < 1e-12);
    assert_eq!(p101.participant_error_ratio, Some(1.0));

    let p103 = &results.participants["103CEArrow"];
    let names: Vec<&str> = p103.trials.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["2-1"]);

    // Diagnostics, in discovery order
    let d = &results.diagnostics;
    assert!(matches!(d[0], GazeError::MissingCompanionData { .. }));
    assert!(matches!(d[1], GazeError::NamingMismatch { .. }));
    assert!(matches!(d[2], GazeError::InsufficientRecording { .. }));
    assert!(matches!(&d[3], GazeError::OverlappingTrials { trials, .. } if trials == &["1-1", "1-2"]));
    assert_eq!(d.len(), 4);

    // Outputs
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fx.results.join("out.json")).unwrap()).unwrap();
    assert_eq!(json.as_object().unwrap().len(), 2);
    assert_eq!(json["101CEArrow"]["trials"][0]["first_valid_look"], "Left: 500.0ms");
    assert_eq!(json["101CEArrow"]["trials"][0]["markov"]["Left"]["Left"]["probability"], 1.0);

    let csv = fs::read_to_string(fx.results.join("out.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1 + 3);
    assert!(csv.lines().nth(1).unwrap().starts_with("101,A,1,1,Left,500.0,"));

    let errors = fs::read_to_string(fx.results.join("out_errors.txt")).unwrap();
    assert_eq!(errors.lines().count(), 4);
    assert!(errors.contains("102CELetter - Missing Data"));
}

#[test]
fn test_reruns_are_byte_identical() {
    let fx = Fixture::new();
    fx.populate();

    let a = fx.results.join("a");
    let b = fx.results.join("b");
    run_batch(&fx.config(&a, true)).unwrap();
    run_batch(&fx.config(&b, false)).unwrap();

    for file in ["out.json", "out.csv", "out_errors.txt"] {
        assert_eq!(
            fs::read(a.join(file)).unwrap(),
            fs::read(b.join(file)).unwrap(),
            "{} differs between runs",
            file
        );
    }
}

#[test]
fn test_second_recording_of_a_participant_is_reported() {
    let fx = Fixture::new();
    // All Left, then all Right, under the same participant id
    fx.recording("101CE s1 Arrow.csv", 3000, f64::INFINITY);
    fx.recording("101CE s2 Arrow.csv", 3000, 0.0);
    fx.timing("101CE_I.csv", &[(1, 1, 1, 0.5, 1.0)]);

    let run = run_batch(&fx.config(&fx.results, true)).unwrap();

    assert_eq!(run.results.participants.len(), 1);
    assert_eq!(run.summary.rows.len(), 1);
    assert_eq!(run.summary.skipped_files, 1);

    let kept = run.results.participants["101CEArrow"].trial("1-1").unwrap();
    assert!((kept.ratios.unwrap().left.fraction - 1.0).abs() < 1e-12);

    assert!(matches!(
        &run.results.diagnostics[..],
        [GazeError::DuplicateParticipant { file, first, .. }]
            if file == "101CE s2 Arrow.csv" && first == "101CE s1 Arrow.csv"
    ));
    let errors = fs::read_to_string(fx.results.join("out_errors.txt")).unwrap();
    assert!(errors.starts_with("101CE s2 Arrow.csv - Participant 101CEArrow already has a recording"));
}

#[test]
fn test_workbook_timing_file() {
    let fx = Fixture::new();
    fx.recording("101CE s1 Arrow.csv", 3000, 1250.0);
    fx.timing_workbook("101CE_I.xlsx", &[(1, 1, 1, 0.5, 1.0), (2, 1, 2, 1.5, 2.0)]);

    let run = run_batch(&fx.config(&fx.results, false)).unwrap();

    assert!(run.results.diagnostics.is_empty());
    let p101 = &run.results.participants["101CEArrow"];
    let names: Vec<&str> = p101.trials.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["1-1", "1-2"]);
    assert!((p101.trial("1-2").unwrap().ratios.unwrap().right.fraction - 1.0).abs() < 1e-12);
}

#[test]
fn test_unreadable_recording_aborts() {
    let fx = Fixture::new();
    fs::write(fx.data.join("101CE s1 Arrow.csv"), "Timestamp,Gaze X\n0,1\n").unwrap();
    fx.timing("101CE_I.csv", &[(1, 1, 1, 0.0, 0.0)]);

    let err = run_batch(&fx.config(&fx.results, false)).unwrap_err();
    assert!(format!("{:#}", err).contains("Gaze Y"));
}

#[test]
fn test_empty_folders_produce_empty_outputs() {
    let fx = Fixture::new();
    let run = run_batch(&fx.config(&fx.results, true)).unwrap();

    assert!(run.results.participants.is_empty());
    assert!(!run.summary.any_rejected());
    let csv = fs::read_to_string(fx.results.join("out.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1);
}
