use {
    super::{column_index, parse_number},
    crate::{
        config::{DATA_SECTION_MARKER, constants::columns},
        domain::GazeRecording,
    },
    anyhow::{Context, Result},
    std::{
        fs::File,
        io::{BufReader, BufWriter, Read, Write},
        path::Path,
    },
};

/// Parses a raw eye-tracker export.
///
/// Metadata rows are skipped up to the `#DATA` marker; the row after it is the
/// header. Without a marker the first row is the header. Gaze cells that are
/// empty or not numbers become NaN. Rows without a usable timestamp are dropped.
pub fn read_recording<R: Read>(participant_id: &str, reader: R) -> Result<GazeRecording> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let rows: Vec<csv::StringRecord> = csv_reader
        .records()
        .collect::<Result<_, _>>()
        .context("Malformed CSV")?;

    let header_row = rows
        .iter()
        .position(|r| r.get(0).map(str::trim) == Some(DATA_SECTION_MARKER))
        .map_or(0, |marker| marker + 1);
    let header = rows.get(header_row).context("No header row")?;

    let ts_col = column_index(header, columns::TIMESTAMP)?;
    let x_col = column_index(header, columns::GAZE_X)?;
    let y_col = column_index(header, columns::GAZE_Y)?;

    let mut recording = GazeRecording::new(participant_id);
    let mut skipped = 0_usize;

    for row in &rows[header_row + 1..] {
        let Some(timestamp_ms) = row.get(ts_col).and_then(parse_number) else {
            skipped += 1;
            continue;
        };
        let x = row.get(x_col).and_then(parse_number).unwrap_or(f64::NAN);
        let y = row.get(y_col).and_then(parse_number).unwrap_or(f64::NAN);
        recording.push(timestamp_ms, x, y);
    }

    if skipped > 0 {
        log::warn!(
            "{}: skipped {} rows without a timestamp",
            participant_id,
            skipped
        );
    }

    Ok(recording)
}

pub fn load_recording(path: &Path, participant_id: &str) -> Result<GazeRecording> {
    let file = File::open(path).with_context(|| format!("Failed to open recording {:?}", path))?;
    read_recording(participant_id, BufReader::new(file))
        .with_context(|| format!("Failed to read recording {:?}", path))
}

/// Writes `recording` in the export layout: `metadata` rows, the `#DATA`
/// marker, the header, then one row per sample. NaN gaze is written as an
/// empty cell.
pub fn write_recording<W: Write>(
    writer: W,
    recording: &GazeRecording,
    metadata: &[(&str, &str)],
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    for (key, value) in metadata {
        csv_writer.write_record([*key, *value])?;
    }
    csv_writer.write_record([DATA_SECTION_MARKER])?;
    csv_writer.write_record([columns::TIMESTAMP, columns::GAZE_X, columns::GAZE_Y])?;

    let cell = |v: f64| if v.is_finite() { v.to_string() } else { String::new() };
    for ((ts, &x), &y) in recording
        .timestamps_ms
        .iter()
        .zip(&recording.gaze_x)
        .zip(&recording.gaze_y)
    {
        csv_writer.write_record([ts.to_string(), cell(x), cell(y)])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn save_recording(path: &Path, recording: &GazeRecording, metadata: &[(&str, &str)]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    write_recording(BufWriter::new(file), recording, metadata)
        .with_context(|| format!("Failed to write recording {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
Study,Gaze Pilot
Respondent,101
#DATA
Row,Timestamp,Gaze X,Gaze Y,Pupil
1,0,500,500,3.1
2,5,,,3.0
3,,600,600,3.0
4,15,abc,400,2.9
5,20,1400.5,420,3.0
";

    #[test]
    fn test_reads_after_marker() {
        let rec = read_recording("p", EXPORT.as_bytes()).unwrap();

        assert_eq!(rec.timestamps_ms, vec![0.0, 5.0, 15.0, 20.0]);
        assert_eq!(rec.gaze_x[0], 500.0);
        assert!(rec.gaze_x[1].is_nan() && rec.gaze_y[1].is_nan());
        assert!(rec.gaze_x[2].is_nan());
        assert_eq!(rec.gaze_y[2], 400.0);
        assert_eq!(rec.gaze_x[3], 1400.5);
    }

    #[test]
    fn test_header_without_marker() {
        let rec = read_recording("p", "Timestamp,Gaze X,Gaze Y\n0,1,2\n5,3,4\n".as_bytes()).unwrap();
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.gaze_y[1], 4.0);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let err = read_recording("p", "#DATA\nTimestamp,Gaze X\n0,1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Gaze Y"));
    }

    #[test]
    fn test_written_recording_reads_back() {
        let rec = GazeRecording::from_samples(
            "p",
            [(0.0, 500.0, 500.0), (5.0, f64::NAN, f64::NAN), (10.0, 1200.25, 400.0)],
        );
        let mut buf = Vec::new();
        write_recording(&mut buf, &rec, &[("Respondent", "101")]).unwrap();

        let back = read_recording("p", buf.as_slice()).unwrap();
        assert_eq!(back.timestamps_ms, rec.timestamps_ms);
        assert_eq!(back.gaze_x[2], 1200.25);
        assert!(back.gaze_x[1].is_nan());
    }
}
