// Gaze analysis algorithms
mod gap_filler;
mod ratios;
mod segmenter;
mod timeline;
mod transitions;
mod trial_processor;

pub use {
    gap_filler::GapFiller,
    ratios::{LabelShare, RatioCalculator, Ratios},
    segmenter::{Segmentation, TrialSegmenter},
    timeline::{Interval, Timeline, TimelineBuilder},
    transitions::{TransitionMatrix, TransitionPolicy},
    trial_processor::TrialProcessor,
};
