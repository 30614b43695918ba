//! Analysis and computation configuration

use {
    super::constants::{DEFAULT_NEITHER_CUTOFF_MS, aoi},
    crate::domain::AoiLayout,
    anyhow::{Result, bail},
    serde::{Deserialize, Serialize},
};

/// The Master Analysis Configuration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Neither runs strictly shorter than this (ms) that bridge Left and Right
    /// are skipped by the noise-filtered transition policy.
    pub neither_cutoff_ms: f64,

    /// Fixed screen regions. Not runtime-configurable.
    pub aoi: AoiLayout,
}

impl AnalysisConfig {
    pub fn with_neither_cutoff(self, neither_cutoff_ms: f64) -> Result<Self> {
        if !neither_cutoff_ms.is_finite() || neither_cutoff_ms < 0.0 {
            bail!(
                "neither cutoff must be a finite, non-negative number of ms (got {})",
                neither_cutoff_ms
            );
        }
        Ok(Self {
            neither_cutoff_ms,
            ..self
        })
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        ANALYSIS
    }
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    neither_cutoff_ms: DEFAULT_NEITHER_CUTOFF_MS,
    aoi: aoi::DEFAULT,
};
