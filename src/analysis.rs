// Comparison derivation engine
// Derives per-level and aggregate statistics from raw benchmark metrics

use crate::models::{
    BestSizeSummary, BestTimeSummary, ComparisonRecord, LevelComparison, OptLevel, PerLevelMetrics,
};
use std::collections::BTreeMap;

/// Derive the full comparison view-model for one ML candidate against the
/// standard levels that are present. Pure and deterministic: the same
/// inputs always produce an identical record.
pub fn derive_comparison(
    ml: &PerLevelMetrics,
    baselines: &BTreeMap<OptLevel, PerLevelMetrics>,
) -> ComparisonRecord {
    let mut levels = BTreeMap::new();
    for (level, baseline) in baselines {
        levels.insert(*level, compare_level(ml, baseline));
    }

    let faster_than = levels.values().filter(|c| c.ml_faster).count();
    let smaller_than = levels.values().filter(|c| c.ml_smaller).count();

    ComparisonRecord {
        levels,
        vs_best: best_time_summary(ml, baselines),
        vs_best_size: best_size_summary(ml, baselines),
        faster_than,
        smaller_than,
        level_count: baselines.len(),
    }
}

fn compare_level(ml: &PerLevelMetrics, baseline: &PerLevelMetrics) -> LevelComparison {
    let speedup = speedup(baseline.execution_time_avg, ml.execution_time_avg);
    let size_reduction = size_reduction(baseline.binary_size, ml.binary_size);

    LevelComparison {
        speedup,
        ml_faster: matches!(speedup, Some(s) if s > 1.0),
        size_reduction,
        ml_smaller: matches!(size_reduction, Some(r) if r > 0.0),
    }
}

/// baseline_time / ml_time, or None when the ML time is zero. A zero
/// denominator must not silently become infinity and count as "faster".
fn speedup(baseline_time: f64, ml_time: f64) -> Option<f64> {
    if ml_time == 0.0 {
        None
    } else {
        Some(baseline_time / ml_time)
    }
}

/// (baseline_size - ml_size) / baseline_size, or None when the baseline
/// size is zero
fn size_reduction(baseline_size: u64, ml_size: u64) -> Option<f64> {
    if baseline_size == 0 {
        None
    } else {
        Some((baseline_size as f64 - ml_size as f64) / baseline_size as f64)
    }
}

/// Baseline level with the minimum execution time. Strict comparison over
/// the ordinal-ordered map keeps ties on the lowest level.
fn best_time_summary(
    ml: &PerLevelMetrics,
    baselines: &BTreeMap<OptLevel, PerLevelMetrics>,
) -> Option<BestTimeSummary> {
    let (best_level, best) = baselines
        .iter()
        .fold(None::<(OptLevel, &PerLevelMetrics)>, |acc, (level, m)| {
            match acc {
                Some((_, current)) if current.execution_time_avg <= m.execution_time_avg => acc,
                _ => Some((*level, m)),
            }
        })?;

    Some(BestTimeSummary {
        best_standard: best_level,
        best_execution_time: best.execution_time_avg,
        ml_beats_best: ml.execution_time_avg < best.execution_time_avg,
        speedup_vs_best: speedup(best.execution_time_avg, ml.execution_time_avg),
    })
}

/// Baseline level with the minimum binary size; same tie-break rule
fn best_size_summary(
    ml: &PerLevelMetrics,
    baselines: &BTreeMap<OptLevel, PerLevelMetrics>,
) -> Option<BestSizeSummary> {
    let (best_level, best) = baselines
        .iter()
        .fold(None::<(OptLevel, &PerLevelMetrics)>, |acc, (level, m)| {
            match acc {
                Some((_, current)) if current.binary_size <= m.binary_size => acc,
                _ => Some((*level, m)),
            }
        })?;

    Some(BestSizeSummary {
        best_size_standard: best_level,
        best_size_bytes: best.binary_size,
        ml_beats_best_size: ml.binary_size < best.binary_size,
        size_reduction_vs_best: size_reduction(best.binary_size, ml.binary_size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(time: f64, size: u64) -> PerLevelMetrics {
        PerLevelMetrics {
            execution_time_avg: time,
            binary_size: size,
            compile_time: None,
            optimization_time: None,
            ir_passes: Vec::new(),
            pass_count: 0,
        }
    }

    fn standard_baselines() -> BTreeMap<OptLevel, PerLevelMetrics> {
        let mut baselines = BTreeMap::new();
        baselines.insert(OptLevel::O0, metrics(2.8, 24576));
        baselines.insert(OptLevel::O1, metrics(1.9, 18432));
        baselines.insert(OptLevel::O2, metrics(1.4, 15360));
        baselines.insert(OptLevel::O3, metrics(1.3, 14336));
        baselines
    }

    #[test]
    fn test_end_to_end_scenario() {
        let ml = metrics(1.127, 12288);
        let mut baselines = BTreeMap::new();
        baselines.insert(OptLevel::O3, metrics(1.289, 14336));

        let record = derive_comparison(&ml, &baselines);
        let o3 = &record.levels[&OptLevel::O3];

        let speedup = o3.speedup.unwrap();
        assert!((speedup - 1.144).abs() < 0.001, "speedup = {}", speedup);
        assert!(o3.ml_faster);

        let reduction = o3.size_reduction.unwrap();
        assert!((reduction - 0.1429).abs() < 0.001, "reduction = {}", reduction);
        assert!(o3.ml_smaller);

        assert_eq!(record.faster_than, 1);
        assert_eq!(record.smaller_than, 1);
        assert_eq!(record.level_count, 1);
    }

    #[test]
    fn test_vs_best_selects_global_minimum() {
        let ml = metrics(1.127, 12288);
        let record = derive_comparison(&ml, &standard_baselines());

        let vs_best = record.vs_best.unwrap();
        assert_eq!(vs_best.best_standard, OptLevel::O3);
        assert!(vs_best.ml_beats_best);

        let vs_best_size = record.vs_best_size.unwrap();
        assert_eq!(vs_best_size.best_size_standard, OptLevel::O3);
        assert_eq!(vs_best_size.best_size_bytes, 14336);
        assert!(vs_best_size.ml_beats_best_size);
    }

    #[test]
    fn test_vs_best_tie_prefers_lowest_level() {
        let ml = metrics(2.0, 20000);
        let mut baselines = BTreeMap::new();
        baselines.insert(OptLevel::O1, metrics(1.5, 16384));
        baselines.insert(OptLevel::O3, metrics(1.5, 16384));

        let record = derive_comparison(&ml, &baselines);
        assert_eq!(record.vs_best.unwrap().best_standard, OptLevel::O1);
        assert_eq!(
            record.vs_best_size.unwrap().best_size_standard,
            OptLevel::O1
        );
    }

    #[test]
    fn test_partial_baselines_count_present_levels() {
        let ml = metrics(1.0, 10000);
        let mut baselines = standard_baselines();
        baselines.remove(&OptLevel::O1);

        let record = derive_comparison(&ml, &baselines);
        assert_eq!(record.level_count, 3);
        assert_eq!(record.faster_than, 3);
        assert_eq!(record.smaller_than, 3);
        assert_eq!(record.levels.len(), 3);
        assert!(!record.levels.contains_key(&OptLevel::O1));
    }

    #[test]
    fn test_zero_ml_time_is_flagged_not_infinite() {
        let ml = metrics(0.0, 12288);
        let record = derive_comparison(&ml, &standard_baselines());

        for comparison in record.levels.values() {
            assert!(comparison.speedup.is_none());
            assert!(!comparison.ml_faster);
        }
        assert_eq!(record.faster_than, 0);
        assert!(record.vs_best.unwrap().speedup_vs_best.is_none());
    }

    #[test]
    fn test_zero_baseline_size_is_flagged() {
        let ml = metrics(1.0, 12288);
        let mut baselines = BTreeMap::new();
        baselines.insert(OptLevel::O0, metrics(2.0, 0));

        let record = derive_comparison(&ml, &baselines);
        let o0 = &record.levels[&OptLevel::O0];
        assert!(o0.size_reduction.is_none());
        assert!(!o0.ml_smaller);
        // the time side of the level is unaffected
        assert!(o0.ml_faster);
    }

    #[test]
    fn test_speedup_monotonic_in_ml_time() {
        let baselines = standard_baselines();
        let mut previous: Option<ComparisonRecord> = None;

        // decreasing ML time never decreases any speedup or flips a
        // faster verdict back to false
        for &time in &[2.0, 1.5, 1.1, 0.7, 0.2] {
            let record = derive_comparison(&metrics(time, 12288), &baselines);
            if let Some(prev) = &previous {
                for (level, comparison) in &record.levels {
                    let before = &prev.levels[level];
                    assert!(comparison.speedup.unwrap() >= before.speedup.unwrap());
                    if before.ml_faster {
                        assert!(comparison.ml_faster);
                    }
                }
            }
            previous = Some(record);
        }
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let ml = metrics(1.127, 12288);
        let baselines = standard_baselines();
        assert_eq!(
            derive_comparison(&ml, &baselines),
            derive_comparison(&ml, &baselines)
        );
    }

    #[test]
    fn test_no_baselines_yields_empty_record() {
        let ml = metrics(1.0, 4096);
        let record = derive_comparison(&ml, &BTreeMap::new());
        assert!(record.levels.is_empty());
        assert!(record.vs_best.is_none());
        assert!(record.vs_best_size.is_none());
        assert_eq!(record.level_count, 0);
    }
}
