use {
    super::{column_index, parse_number},
    crate::{
        config::{PERSISTENCE, constants::columns},
        domain::{TrialIdentityTable, TrialTimingTable},
    },
    anyhow::{Context, Result, anyhow},
    calamine::{Data, Range, Reader, Xlsx},
    std::{
        fs::File,
        io::{BufReader, BufWriter, Read, Seek, Write},
        path::Path,
    },
};

/// One row of a timing table as written by the task software.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingRow {
    pub trial_number: u32,
    pub row: i64,
    pub column: i64,
    pub start_s: Option<f64>,
    pub end_s: Option<f64>,
}

/// Reads both tables from one timing file.
/// Rows without a numeric trial number are ignored; rows without a start or an
/// end still name their trial but are not timed.
pub fn read_timing<R: Read>(reader: R) -> Result<(TrialIdentityTable, TrialTimingTable)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header = csv_reader.headers().context("Missing header row")?.clone();
    let trial_col = column_index(&header, columns::TRIAL)?;
    let row_col = column_index(&header, columns::ROW)?;
    let column_col = column_index(&header, columns::COLUMN)?;
    let start_col = column_index(&header, columns::START)?;
    let end_col = column_index(&header, columns::END)?;

    let mut identity = TrialIdentityTable::default();
    let mut timings = TrialTimingTable::default();

    for record in csv_reader.records() {
        let record = record.context("Malformed CSV")?;
        let number = |col: usize| record.get(col).and_then(parse_number);

        push_identity(&mut identity, number(trial_col), number(row_col), number(column_col));
        push_timing(&mut timings, number(trial_col), number(start_col), number(end_col));
    }

    Ok((identity, timings))
}

/// Reads the task software's workbook: identity on sheet 0, timing on sheet 1.
pub fn read_timing_workbook<RS: Read + Seek>(
    reader: RS,
) -> Result<(TrialIdentityTable, TrialTimingTable)> {
    let mut workbook = Xlsx::new(reader).context("Not an xlsx workbook")?;

    let mut identity = TrialIdentityTable::default();
    let sheet = worksheet(&mut workbook, 0)?;
    let (header, rows) = split_header(&sheet);
    let trial_col = column_index(&header, columns::TRIAL)?;
    let row_col = column_index(&header, columns::ROW)?;
    let column_col = column_index(&header, columns::COLUMN)?;
    for cells in rows {
        let number = |col: usize| cells.get(col).and_then(cell_number);
        push_identity(&mut identity, number(trial_col), number(row_col), number(column_col));
    }

    let mut timings = TrialTimingTable::default();
    let sheet = worksheet(&mut workbook, 1)?;
    let (header, rows) = split_header(&sheet);
    let trial_col = column_index(&header, columns::TRIAL)?;
    let start_col = column_index(&header, columns::START)?;
    let end_col = column_index(&header, columns::END)?;
    for cells in rows {
        let number = |col: usize| cells.get(col).and_then(cell_number);
        push_timing(&mut timings, number(trial_col), number(start_col), number(end_col));
    }

    Ok((identity, timings))
}

/// Picks the reader by extension.
pub fn load_timing(path: &Path) -> Result<(TrialIdentityTable, TrialTimingTable)> {
    let file = File::open(path).with_context(|| format!("Failed to open timing file {:?}", path))?;
    let reader = BufReader::new(file);

    let is_workbook = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PERSISTENCE.input.workbook_extension));

    let tables = if is_workbook {
        read_timing_workbook(reader)
    } else {
        read_timing(reader)
    };
    tables.with_context(|| format!("Failed to read timing file {:?}", path))
}

pub fn write_timing<W: Write>(writer: W, rows: &[TimingRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        columns::TRIAL,
        columns::ROW,
        columns::COLUMN,
        columns::START,
        columns::END,
    ])?;

    let cell = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    for row in rows {
        csv_writer.write_record([
            row.trial_number.to_string(),
            row.row.to_string(),
            row.column.to_string(),
            cell(row.start_s),
            cell(row.end_s),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn save_timing(path: &Path, rows: &[TimingRow]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    write_timing(BufWriter::new(file), rows).with_context(|| format!("Failed to write timing file {:?}", path))
}

fn push_identity(
    identity: &mut TrialIdentityTable,
    trial: Option<f64>,
    row: Option<f64>,
    column: Option<f64>,
) {
    if let (Some(trial_number), Some(row), Some(column)) = (
        trial.and_then(as_whole::<u32>),
        row.and_then(as_whole::<i64>),
        column.and_then(as_whole::<i64>),
    ) {
        identity.insert(trial_number, row, column);
    }
}

/// Rows without a whole trial number are ignored.
fn push_timing(
    timings: &mut TrialTimingTable,
    trial: Option<f64>,
    start_s: Option<f64>,
    end_s: Option<f64>,
) {
    if let Some(trial_number) = trial.and_then(as_whole::<u32>) {
        timings.push_row(trial_number, start_s, end_s);
    }
}

fn worksheet<RS: Read + Seek>(workbook: &mut Xlsx<RS>, index: usize) -> Result<Range<Data>> {
    workbook
        .worksheet_range_at(index)
        .ok_or_else(|| anyhow!("Workbook has no sheet {}", index))?
        .with_context(|| format!("Failed to read sheet {}", index))
}

/// First row as a header record, plus the remaining rows.
fn split_header(sheet: &Range<Data>) -> (csv::StringRecord, Vec<&[Data]>) {
    let mut rows = sheet.rows();
    let header = rows
        .next()
        .map(|cells| cells.iter().map(cell_text).collect::<csv::StringRecord>())
        .unwrap_or_else(csv::StringRecord::new);
    (header, rows.collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(v) => Some(*v as f64),
        Data::Float(v) => Some(*v).filter(|v| v.is_finite()),
        Data::String(s) => parse_number(s),
        _ => None,
    }
}

/// Spreadsheet exports write integers as `3` or `3.0`.
fn as_whole<T: TryFrom<i64>>(value: f64) -> Option<T> {
    if value.fract() != 0.0 {
        return None;
    }
    T::try_from(value as i64).ok()
}
