use {
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumIter},
};

/// Where a single gaze sample landed.
/// Iteration order (Left, Right, Invalid, Neither) is the row/column order of every
/// transition matrix and of the exported columns.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum AoiLabel {
    Left,
    Right,
    /// Sensor dropout (non-finite coordinate)
    #[strum(to_string = "NaN")]
    #[serde(rename = "NaN")]
    Invalid,
    /// Valid gaze outside both AOIs
    Neither,
}

impl AoiLabel {
    pub const COUNT: usize = 4;

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            AoiLabel::Left => 0,
            AoiLabel::Right => 1,
            AoiLabel::Invalid => 2,
            AoiLabel::Neither => 3,
        }
    }

    /// Left or Right. These are the only labels that count as a "valid look".
    #[inline]
    pub const fn is_aoi(self) -> bool {
        matches!(self, AoiLabel::Left | AoiLabel::Right)
    }

    /// The AOI on the other side of the screen, if this label is an AOI at all.
    pub const fn opposite_aoi(self) -> Option<AoiLabel> {
        match self {
            AoiLabel::Left => Some(AoiLabel::Right),
            AoiLabel::Right => Some(AoiLabel::Left),
            AoiLabel::Invalid | AoiLabel::Neither => None,
        }
    }

    /// Abbreviation used in flattened export column names (`%L`, `L_to_R`, ...).
    pub const fn short_name(self) -> &'static str {
        match self {
            AoiLabel::Left => "L",
            AoiLabel::Right => "R",
            AoiLabel::Invalid => "NaN",
            AoiLabel::Neither => "Neither",
        }
    }
}

/// Axis-aligned screen rectangle with exclusive bounds (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AoiRect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AoiRect {
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.x_min && x < self.x_max && y > self.y_min && y < self.y_max
    }
}

/// The two fixed AOIs of the task screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AoiLayout {
    pub left: AoiRect,
    pub right: AoiRect,
}

impl AoiLayout {
    /// Maps one raw coordinate pair to its label.
    /// Any non-finite coordinate is a dropout, whatever the other coordinate says.
    pub fn classify(&self, x: f64, y: f64) -> AoiLabel {
        if !x.is_finite() || !y.is_finite() {
            return AoiLabel::Invalid;
        }
        if self.left.contains(x, y) {
            AoiLabel::Left
        } else if self.right.contains(x, y) {
            AoiLabel::Right
        } else {
            AoiLabel::Neither
        }
    }
}

/// Classifies against the fixed task layout in [`crate::config::ANALYSIS`].
#[inline]
pub fn classify(x: f64, y: f64) -> AoiLabel {
    crate::config::ANALYSIS.aoi.classify(x, y)
}
