// Derived comparison statistics
use crate::models::metrics::OptLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ML candidate vs one standard level. A `None` ratio marks a degenerate
/// metric (zero denominator) - the value is unavailable, never an infinity,
/// and the verdict flag stays false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelComparison {
    pub speedup: Option<f64>,
    pub ml_faster: bool,
    pub size_reduction: Option<f64>,
    pub ml_smaller: bool,
}

/// Which standard level ran fastest, and whether the ML build beat it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestTimeSummary {
    pub best_standard: OptLevel,
    pub best_execution_time: f64,
    pub ml_beats_best: bool,
    pub speedup_vs_best: Option<f64>,
}

/// Which standard level produced the smallest binary, and whether the ML
/// build beat it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSizeSummary {
    pub best_size_standard: OptLevel,
    pub best_size_bytes: u64,
    pub ml_beats_best_size: bool,
    pub size_reduction_vs_best: Option<f64>,
}

/// Full comparison view-model for one workflow run. Summary counts are
/// always out of `level_count` - the levels actually present - not a
/// hardcoded four.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub levels: BTreeMap<OptLevel, LevelComparison>,
    pub vs_best: Option<BestTimeSummary>,
    pub vs_best_size: Option<BestSizeSummary>,
    pub faster_than: usize,
    pub smaller_than: usize,
    pub level_count: usize,
}

impl ComparisonRecord {
    /// Level names the ML build beat on execution time
    pub fn faster_levels(&self) -> Vec<OptLevel> {
        self.levels
            .iter()
            .filter(|(_, c)| c.ml_faster)
            .map(|(level, _)| *level)
            .collect()
    }

    /// Level names the ML build beat on binary size
    pub fn smaller_levels(&self) -> Vec<OptLevel> {
        self.levels
            .iter()
            .filter(|(_, c)| c.ml_smaller)
            .map(|(level, _)| *level)
            .collect()
    }
}
