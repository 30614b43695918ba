// Top Level Constants

/// Default Neither-run length (ms) below which a Left<->Right bridging Neither is treated as transit noise.
pub const DEFAULT_NEITHER_CUTOFF_MS: f64 = 200.0;

/// First cell of the row that precedes the sample header in a raw export.
pub const DATA_SECTION_MARKER: &str = "#DATA";

/// Written wherever a trial has no Left/Right interval.
pub const NO_VALID_LOOK: &str = "no valid look";

/// Log sections wrapped in `trace_time!` that exceed their threshold.
pub const LOG_PERFORMANCE: bool = true;

pub mod aoi {
    use crate::domain::{AoiLayout, AoiRect};

    // Change these if the task screen changes. Bounds are exclusive.
    pub const Y_MIN: f64 = 330.0;
    pub const Y_MAX: f64 = 750.0;

    pub const LEFT: AoiRect = AoiRect::new(200.0, 820.0, Y_MIN, Y_MAX);
    pub const RIGHT: AoiRect = AoiRect::new(1100.0, 1720.0, Y_MIN, Y_MAX);

    pub const DEFAULT: AoiLayout = AoiLayout {
        left: LEFT,
        right: RIGHT,
    };
}

pub mod columns {
    // Raw recording header names
    pub const TIMESTAMP: &str = "Timestamp";
    pub const GAZE_X: &str = "Gaze X";
    pub const GAZE_Y: &str = "Gaze Y";

    // Timing table header names (matched case-insensitively)
    pub const TRIAL: &str = "Trial";
    pub const ROW: &str = "row";
    pub const COLUMN: &str = "column";
    pub const START: &str = "Start (seconds)";
    pub const END: &str = "End";
}

pub mod naming {
    /// Separates the participant number from the rest of a recording file name.
    pub const PARTICIPANT_SUFFIX: &str = "CE";
    /// Position of the task token among the space-separated parts of a file stem.
    pub const TASK_TOKEN_POSITION: usize = 2;
}
