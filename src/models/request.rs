// Request configuration and wire request bodies
use crate::error::WorkflowError;
use crate::models::artifact::SourceArtifact;
use crate::models::metrics::OptLevel;
use crate::samples::default_manual_passes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const BEAM_SIZE_MIN: u32 = 1;
pub const BEAM_SIZE_MAX: u32 = 20;

/// Hint passed alongside transformer predictions, matching the service's
/// expected spelling
const OPT_LEVEL_HINT: &str = "O_2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetArch {
    Riscv64,
    Riscv32,
}

impl TargetArch {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetArch::Riscv64 => "riscv64",
            TargetArch::Riscv32 => "riscv32",
        }
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetArch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "riscv64" => Ok(TargetArch::Riscv64),
            "riscv32" => Ok(TargetArch::Riscv32),
            _ => Err(format!("Unknown target architecture: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMetric {
    ExecutionTime,
    BinarySize,
}

impl TargetMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetMetric::ExecutionTime => "execution_time",
            TargetMetric::BinarySize => "binary_size",
        }
    }
}

impl fmt::Display for TargetMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "execution_time" => Ok(TargetMetric::ExecutionTime),
            "binary_size" => Ok(TargetMetric::BinarySize),
            _ => Err(format!("Unknown target metric: {}", s)),
        }
    }
}

/// Knobs for one optimization request. Owned by the caller and passed by
/// value into the workflow; validated before any request is issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequestConfig {
    pub beam_size: u32,
    pub target_metric: TargetMetric,
    pub target_arch: TargetArch,
    pub use_ml_predictor: bool,
    /// Manual pass sequence, used only when the ML predictor is disabled
    #[serde(default)]
    pub ir_passes: Option<Vec<String>>,
}

impl Default for OptimizationRequestConfig {
    fn default() -> Self {
        Self {
            beam_size: 5,
            target_metric: TargetMetric::ExecutionTime,
            target_arch: TargetArch::Riscv64,
            use_ml_predictor: true,
            ir_passes: None,
        }
    }
}

impl OptimizationRequestConfig {
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if !(BEAM_SIZE_MIN..=BEAM_SIZE_MAX).contains(&self.beam_size) {
            return Err(WorkflowError::InvalidRequest(format!(
                "beam size must be between {} and {}, got {}",
                BEAM_SIZE_MIN, BEAM_SIZE_MAX, self.beam_size
            )));
        }
        Ok(())
    }

    /// Force the beam size into bounds instead of rejecting the request
    pub fn clamped(mut self) -> Self {
        self.beam_size = self.beam_size.clamp(BEAM_SIZE_MIN, BEAM_SIZE_MAX);
        self
    }
}

// ============= Wire request bodies =============

#[derive(Debug, Clone, Serialize)]
pub struct FeatureRequest {
    pub code: String,
    pub target_arch: TargetArch,
}

impl FeatureRequest {
    pub fn new(artifact: &SourceArtifact, target_arch: TargetArch) -> Self {
        Self {
            code: artifact.code.clone(),
            target_arch,
        }
    }
}

/// Shared body for /optimize and /compare. When the ML predictor is in
/// play, `ir_passes` is omitted so the service's transformer predicts the
/// sequence itself.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeRequest {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ir_passes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_transformer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opt_level_hint: Option<String>,
    pub target_arch: TargetArch,
    pub beam_size: u32,
    pub target_metric: TargetMetric,
}

impl OptimizeRequest {
    pub fn from_config(artifact: &SourceArtifact, config: &OptimizationRequestConfig) -> Self {
        let (ir_passes, use_transformer, opt_level_hint) = if config.use_ml_predictor {
            (None, Some(true), Some(OPT_LEVEL_HINT.to_string()))
        } else {
            let passes = config
                .ir_passes
                .clone()
                .unwrap_or_else(default_manual_passes);
            (Some(passes), None, None)
        };

        Self {
            code: artifact.code.clone(),
            ir_passes,
            use_transformer,
            opt_level_hint,
            target_arch: config.target_arch,
            beam_size: config.beam_size,
            target_metric: config.target_metric,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StandardRequest {
    pub code: String,
    pub opt_levels: Vec<OptLevel>,
    pub target_arch: TargetArch,
}

impl StandardRequest {
    pub fn new(artifact: &SourceArtifact, target_arch: TargetArch) -> Self {
        Self {
            code: artifact.code.clone(),
            opt_levels: OptLevel::ALL.to_vec(),
            target_arch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beam_size_bounds() {
        let mut config = OptimizationRequestConfig::default();
        assert!(config.validate().is_ok());

        config.beam_size = 0;
        assert!(config.validate().is_err());
        config.beam_size = 21;
        assert!(config.validate().is_err());
        config.beam_size = 20;
        assert!(config.validate().is_ok());

        let clamped = OptimizationRequestConfig {
            beam_size: 99,
            ..Default::default()
        }
        .clamped();
        assert_eq!(clamped.beam_size, BEAM_SIZE_MAX);
    }

    #[test]
    fn test_predictor_request_omits_passes() {
        let artifact = SourceArtifact::from_code("a.c", "int main() { return 0; }");
        let config = OptimizationRequestConfig::default();
        let request = OptimizeRequest::from_config(&artifact, &config);

        assert!(request.ir_passes.is_none());
        assert_eq!(request.use_transformer, Some(true));

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("ir_passes").is_none());
        assert_eq!(json["target_metric"], "execution_time");
        assert_eq!(json["target_arch"], "riscv64");
    }

    #[test]
    fn test_manual_request_sends_default_passes() {
        let artifact = SourceArtifact::from_code("a.c", "int main() { return 0; }");
        let config = OptimizationRequestConfig {
            use_ml_predictor: false,
            ..Default::default()
        };
        let request = OptimizeRequest::from_config(&artifact, &config);

        assert_eq!(request.ir_passes, Some(default_manual_passes()));
        assert!(request.use_transformer.is_none());
    }
}
