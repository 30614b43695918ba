//! Configuration module for the gaze AOI pipeline.

// Can all be private now because we have a public re-export.
mod analysis;
mod persistence;

// Public
pub mod constants;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig};
pub use constants::{DATA_SECTION_MARKER, DEFAULT_NEITHER_CUTOFF_MS, LOG_PERFORMANCE, NO_VALID_LOOK};
pub use persistence::{PERSISTENCE, output_filenames};
