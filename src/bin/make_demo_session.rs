use {
    anyhow::{Context, Result},
    clap::Parser,
    gaze_aoi::{
        data::{TimingRow, save_recording, save_timing},
        domain::GazeRecording,
    },
    std::{fs, path::PathBuf},
};

// 200Hz tracker, 12s session, four trials of 2s with 1s gaps
const SAMPLE_INTERVAL_MS: f64 = 5.0;
const SESSION_MS: f64 = 12_000.0;
const TRIALS: [(u32, i64, i64, f64, f64); 4] = [
    (1, 1, 1, 1.0, 3.0),
    (2, 1, 2, 4.0, 6.0),
    (3, 2, 1, 7.0, 9.0),
    (4, 2, 2, 10.0, 11.5),
];

#[derive(Parser, Debug)]
#[command(about = "Writes a synthetic recording and timing table for smoke-testing gaze-aoi")]
struct Args {
    /// Root folder; `data/` and `timestamps/` are created inside it
    #[arg(default_value = "demo_session")]
    out: PathBuf,

    /// Participant number (file names become `{n}CE ...`)
    #[arg(long, default_value_t = 900)]
    participant: u32,
}

/// Gaze point at sample `i`: dwells on Left, glances across the gap to Right,
/// drifts off-screen, and drops a sample now and then.
fn gaze_at(i: usize) -> (f64, f64) {
    match i % 160 {
        0..=59 => (510.0 + (i % 7) as f64, 540.0),
        60..=63 => (960.0, 540.0),
        64..=119 => (1410.0 - (i % 5) as f64, 540.0),
        120..=129 => (960.0, 120.0),
        130 | 145 => (f64::NAN, f64::NAN),
        _ => (500.0, 520.0 + (i % 11) as f64),
    }
}

fn main() -> Result<()> {
    // 1. Setup Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let data_dir = args.out.join("data");
    let timing_dir = args.out.join("timestamps");
    for dir in [&data_dir, &timing_dir] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    // 2. Recording
    let participant_code = format!("{}CE", args.participant);
    let sample_count = (SESSION_MS / SAMPLE_INTERVAL_MS) as usize + 1;
    let recording = GazeRecording::from_samples(
        format!("{}Arrow", participant_code),
        (0..sample_count).map(|i| {
            let (x, y) = gaze_at(i);
            (i as f64 * SAMPLE_INTERVAL_MS, x, y)
        }),
    );

    let recording_path = data_dir.join(format!("{} demo Arrow.csv", participant_code));
    save_recording(
        &recording_path,
        &recording,
        &[("Study", "gaze-aoi demo"), ("Respondent", participant_code.as_str())],
    )?;
    log::info!("Wrote {} samples to {:?}", recording.len(), recording_path);

    // 3. Timing table
    let rows: Vec<TimingRow> = TRIALS
        .iter()
        .map(|&(trial_number, row, column, start, end)| TimingRow {
            trial_number,
            row,
            column,
            start_s: Some(start),
            end_s: Some(end),
        })
        .collect();

    let timing_path = timing_dir.join(format!("{}_I.csv", participant_code));
    save_timing(&timing_path, &rows)?;
    log::info!("Wrote {} trials to {:?}", rows.len(), timing_path);

    log::info!(
        "✅ Run: gaze-aoi {:?} {:?} <results folder>",
        data_dir,
        timing_dir
    );
    Ok(())
}
