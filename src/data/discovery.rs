use {
    crate::{
        config::{PERSISTENCE, constants::naming},
        models::GazeError,
    },
    anyhow::{Context, Result},
    std::{
        collections::HashMap,
        fs,
        path::{Path, PathBuf},
    },
    strum_macros::{Display, EnumIter},
};

/// Which task a recording belongs to, from the first letter of its task token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TaskKind {
    Arrow,
    Letter,
}

impl TaskKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.chars().next()?.to_ascii_uppercase() {
            'A' => Some(TaskKind::Arrow),
            'L' => Some(TaskKind::Letter),
            _ => None,
        }
    }

    /// Letter that marks this task's timing file.
    pub const fn timing_code(self) -> char {
        match self {
            TaskKind::Arrow => 'I',
            TaskKind::Letter => 'J',
        }
    }

    /// Single-letter code used in the CSV export.
    pub const fn letter_code(self) -> char {
        match self {
            TaskKind::Arrow => 'A',
            TaskKind::Letter => 'L',
        }
    }
}

/// Parsed raw-recording file name, e.g. `101CE 2024-03-01 Arrow.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingName {
    pub file_name: String,
    /// Text before the first `CE`, plus `CE`.
    pub participant_code: String,
    pub task_token: String,
    pub task: TaskKind,
}

impl RecordingName {
    pub fn parse(file_name: &str) -> Result<Self, GazeError> {
        let mismatch = |reason: String| GazeError::NamingMismatch {
            file: file_name.to_string(),
            reason,
        };

        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);

        let Some((prefix, _)) = stem.split_once(naming::PARTICIPANT_SUFFIX) else {
            return Err(mismatch(format!(
                "no participant code (missing \"{}\")",
                naming::PARTICIPANT_SUFFIX
            )));
        };

        let Some(task_token) = stem
            .split(' ')
            .nth(naming::TASK_TOKEN_POSITION)
            .filter(|t| !t.is_empty())
        else {
            return Err(mismatch(format!(
                "no task token at position {}",
                naming::TASK_TOKEN_POSITION + 1
            )));
        };

        let Some(task) = TaskKind::from_token(task_token) else {
            return Err(mismatch(format!("unknown task token \"{}\"", task_token)));
        };

        Ok(Self {
            file_name: file_name.to_string(),
            participant_code: format!("{}{}", prefix, naming::PARTICIPANT_SUFFIX),
            task_token: task_token.to_string(),
            task,
        })
    }

    pub fn participant_id(&self) -> String {
        format!("{}{}", self.participant_code, self.task_token)
    }

    /// True for a timing file name that carries this participant's code and task letter.
    pub fn matches_timing_file(&self, timing_file_name: &str) -> bool {
        timing_file_name.contains(&self.participant_code)
            && timing_file_name.contains(self.task.timing_code())
    }
}

/// A recording paired with its timing table.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub name: RecordingName,
    pub recording_path: PathBuf,
    pub timing_path: PathBuf,
}

impl Session {
    pub fn participant_id(&self) -> String {
        self.name.participant_id()
    }
}

/// Pairs every raw recording in `data_folder` with its timing file in
/// `timing_folder`. Recordings that cannot be paired are reported and skipped,
/// as is any later recording of a participant id that is already paired.
pub fn discover_sessions(
    data_folder: &Path,
    timing_folder: &Path,
) -> Result<(Vec<Session>, Vec<GazeError>)> {
    let recordings = list_files(data_folder, &[PERSISTENCE.input.recording_extension])?;
    let timing_files = list_files(timing_folder, PERSISTENCE.input.timing_extensions)?;

    let mut sessions = Vec::with_capacity(recordings.len());
    let mut diagnostics = Vec::new();
    // participant id -> file that claimed it
    let mut claimed: HashMap<String, String> = HashMap::new();

    for recording_path in recordings {
        let file_name = file_name_of(&recording_path);

        let name = match RecordingName::parse(&file_name) {
            Ok(name) => name,
            Err(e) => {
                diagnostics.push(e);
                continue;
            }
        };

        let candidates: Vec<&PathBuf> = timing_files
            .iter()
            .filter(|p| name.matches_timing_file(&file_name_of(p)))
            .collect();

        match candidates.as_slice() {
            [] => diagnostics.push(GazeError::MissingCompanionData { file: file_name }),
            [timing_path] => {
                let participant = name.participant_id();
                if let Some(first) = claimed.get(&participant) {
                    diagnostics.push(GazeError::DuplicateParticipant {
                        file: file_name,
                        participant,
                        first: first.clone(),
                    });
                    continue;
                }
                claimed.insert(participant, file_name);
                sessions.push(Session {
                    timing_path: (*timing_path).clone(),
                    recording_path,
                    name,
                });
            }
            many => diagnostics.push(GazeError::AmbiguousCompanionData {
                file: file_name,
                candidates: many.iter().map(|p| file_name_of(p)).collect(),
            }),
        }
    }

    log::info!(
        "Discovered {} sessions in {:?} ({} skipped)",
        sessions.len(),
        data_folder,
        diagnostics.len()
    );

    Ok((sessions, diagnostics))
}

/// Regular files with one of the given extensions (case-insensitive), sorted by name.
fn list_files(folder: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder)
        .with_context(|| format!("Failed to read folder {:?}", folder))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list folder {:?}", folder))?
            .path();
        let has_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)));
        if path.is_file() && has_extension {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
