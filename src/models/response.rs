// Service response payloads - one tagged type per endpoint
use crate::models::metrics::RawMetrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single extracted feature value; the service mixes numbers and strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

pub type FeatureMap = BTreeMap<String, FeatureValue>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureExtractionResponse {
    pub success: bool,
    #[serde(default)]
    pub features: Option<FeatureMap>,
    #[serde(default)]
    pub feature_count: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResponse {
    pub success: bool,
    #[serde(default)]
    pub metrics: Option<RawMetrics>,
    #[serde(default)]
    pub passes_used: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of the combined /compare call. Baseline keys stay strings here;
/// unknown level names are dropped during interpretation rather than
/// failing the whole decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResponse {
    pub success: bool,
    #[serde(default)]
    pub features: Option<FeatureMap>,
    #[serde(default)]
    pub ml_optimization: Option<RawMetrics>,
    #[serde(default)]
    pub standard_optimizations: Option<BTreeMap<String, RawMetrics>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardResponse {
    pub success: bool,
    #[serde(default, alias = "standard_optimizations")]
    pub results: Option<BTreeMap<String, RawMetrics>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_response_tolerates_partial_payload() {
        let json = r#"{
            "success": true,
            "ml_optimization": {"execution_time_avg": 1.127, "binary_size": 12288},
            "standard_optimizations": {
                "-O0": {"execution_time_avg": 2.8, "binary_size": 16384},
                "-O5": {"execution_time_avg": 1.0}
            },
            "comparison": {"-O0": {"speedup": 2.48}}
        }"#;

        let response: ComparisonResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert!(response.features.is_none());
        let standard = response.standard_optimizations.unwrap();
        assert_eq!(standard.len(), 2);
        assert_eq!(
            standard["-O0"].binary_size,
            Some(16384),
        );
    }

    #[test]
    fn test_feature_values_decode_numbers_and_text() {
        let json = r#"{"success": true, "features": {"loop_depth": 3.0, "target": "riscv64"}, "feature_count": 2}"#;
        let response: FeatureExtractionResponse = serde_json::from_str(json).unwrap();
        let features = response.features.unwrap();
        assert_eq!(features["loop_depth"], FeatureValue::Number(3.0));
        assert_eq!(features["target"], FeatureValue::Text("riscv64".to_string()));
    }
}
