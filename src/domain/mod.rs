// Domain types and value objects
mod aoi;
mod recording;
mod trial;

// Re-export commonly used types to the world
pub use {
    aoi::{AoiLabel, AoiLayout, AoiRect, classify},
    recording::GazeRecording,
    trial::{ResolvedTrial, TrialIdentityTable, TrialTiming, TrialTimingTable, TrialWindow},
};
