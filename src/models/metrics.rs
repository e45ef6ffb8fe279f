// Optimization level and per-level metric types
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Standard compiler optimization level used as a comparison baseline.
/// Ordered by level ordinal so map traversal visits -O0 first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptLevel {
    #[serde(rename = "-O0", alias = "O0")]
    O0,
    #[serde(rename = "-O1", alias = "O1")]
    O1,
    #[serde(rename = "-O2", alias = "O2")]
    O2,
    #[serde(rename = "-O3", alias = "O3")]
    O3,
}

impl OptLevel {
    pub const ALL: [OptLevel; 4] = [OptLevel::O0, OptLevel::O1, OptLevel::O2, OptLevel::O3];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptLevel::O0 => "-O0",
            OptLevel::O1 => "-O1",
            OptLevel::O2 => "-O2",
            OptLevel::O3 => "-O3",
        }
    }

    /// Parse a level name, with or without the leading dash
    pub fn parse(name: &str) -> Option<OptLevel> {
        match name.trim_start_matches('-') {
            "O0" => Some(OptLevel::O0),
            "O1" => Some(OptLevel::O1),
            "O2" => Some(OptLevel::O2),
            "O3" => Some(OptLevel::O3),
            _ => None,
        }
    }
}

impl fmt::Display for OptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptLevel::parse(s).ok_or_else(|| format!("Unknown optimization level: {}", s))
    }
}

/// Benchmark metrics for one build (a standard level or the ML candidate).
/// Produced by the service; immutable once received. Compile and
/// optimization times are optional because the service may omit them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerLevelMetrics {
    pub execution_time_avg: f64,
    pub binary_size: u64,
    pub compile_time: Option<f64>,
    pub optimization_time: Option<f64>,
    #[serde(default)]
    pub ir_passes: Vec<String>,
    #[serde(default)]
    pub pass_count: u32,
}

/// Tolerant decode of a metrics payload: every field optional, plus the
/// per-build error string the service attaches when one build fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    #[serde(default)]
    pub execution_time_avg: Option<f64>,
    #[serde(default)]
    pub binary_size: Option<u64>,
    #[serde(default)]
    pub compile_time: Option<f64>,
    #[serde(default)]
    pub optimization_time: Option<f64>,
    #[serde(default)]
    pub ir_passes: Option<Vec<String>>,
    #[serde(default)]
    pub pass_count: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RawMetrics {
    /// Usable metrics require at least an execution time and a binary size;
    /// anything else renders as "not available" downstream.
    pub fn into_metrics(self) -> Option<PerLevelMetrics> {
        let execution_time_avg = self.execution_time_avg?;
        let binary_size = self.binary_size?;
        let ir_passes = self.ir_passes.unwrap_or_default();
        let pass_count = self.pass_count.unwrap_or(ir_passes.len() as u32);

        Some(PerLevelMetrics {
            execution_time_avg,
            binary_size,
            compile_time: self.compile_time,
            optimization_time: self.optimization_time,
            ir_passes,
            pass_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse_accepts_both_spellings() {
        assert_eq!(OptLevel::parse("-O2"), Some(OptLevel::O2));
        assert_eq!(OptLevel::parse("O2"), Some(OptLevel::O2));
        assert_eq!(OptLevel::parse("-O9"), None);
    }

    #[test]
    fn test_levels_ordered_by_ordinal() {
        assert!(OptLevel::O0 < OptLevel::O1);
        assert!(OptLevel::O2 < OptLevel::O3);
    }

    #[test]
    fn test_level_serializes_with_dash() {
        let json = serde_json::to_string(&OptLevel::O3).unwrap();
        assert_eq!(json, "\"-O3\"");
        let back: OptLevel = serde_json::from_str("\"O3\"").unwrap();
        assert_eq!(back, OptLevel::O3);
    }

    #[test]
    fn test_raw_metrics_require_time_and_size() {
        let raw = RawMetrics {
            execution_time_avg: Some(1.5),
            binary_size: None,
            ..Default::default()
        };
        assert!(raw.into_metrics().is_none());

        let raw = RawMetrics {
            execution_time_avg: Some(1.5),
            binary_size: Some(4096),
            ir_passes: Some(vec!["mem2reg".to_string(), "simplifycfg".to_string()]),
            ..Default::default()
        };
        let metrics = raw.into_metrics().unwrap();
        assert_eq!(metrics.pass_count, 2);
        assert!(metrics.compile_time.is_none());
    }
}
