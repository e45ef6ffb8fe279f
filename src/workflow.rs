// Workflow orchestrator
// Sequences the remote calls for one comparison run and owns the single
// per-session result slot.

use crate::analysis::derive_comparison;
use crate::error::{classify_service_error, WorkflowError};
use crate::models::{
    ComparisonRecord, FeatureMap, FeatureRequest, OptLevel, OptimizationRequestConfig,
    OptimizeRequest, PerLevelMetrics, RawMetrics, SourceArtifact,
};
use crate::service::OptimizationBackend;
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// How the remote calls for one run are sequenced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencingMode {
    /// One combined /compare call does everything service-side
    SingleStep,
    /// /features first, then the combined call; a feature-extraction
    /// failure short-circuits the run
    TwoStep,
}

/// Everything a successful run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowResult {
    pub features: FeatureMap,
    pub feature_count: Option<u64>,
    pub predicted_passes: Vec<String>,
    pub ml_metrics: PerLevelMetrics,
    pub baselines: BTreeMap<OptLevel, PerLevelMetrics>,
    pub comparison: ComparisonRecord,
}

/// The session's single workflow slot. Exactly one variant is active and
/// the whole value is replaced on every transition.
#[derive(Debug, Clone, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Loading,
    Succeeded(Box<WorkflowResult>),
    Failed(WorkflowError),
}

impl WorkflowState {
    pub fn is_loading(&self) -> bool {
        matches!(self, WorkflowState::Loading)
    }
}

/// Handle for one run, stamped with the generation it was started under.
/// An outcome delivered under a stale generation is discarded.
#[derive(Debug)]
pub struct RunToken {
    generation: u64,
}

/// Owns the workflow state for one session. At most one run is in flight;
/// cancellation is soft - a cleared session ignores whatever the pending
/// call eventually resolves to.
pub struct WorkflowSession {
    state: Mutex<WorkflowState>,
    generation: AtomicU64,
}

impl WorkflowSession {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(WorkflowState::Idle),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> WorkflowState {
        self.state.lock().clone()
    }

    /// Move into Loading. Rejected while a run is already in flight;
    /// allowed from Idle, Succeeded (new artifact) and Failed (retry).
    pub fn begin(&self) -> Result<RunToken, WorkflowError> {
        let mut state = self.state.lock();
        if state.is_loading() {
            return Err(WorkflowError::Busy);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = WorkflowState::Loading;
        debug!("workflow run {} started", generation);
        Ok(RunToken { generation })
    }

    /// Deliver a run's outcome. Returns false when the outcome was stale
    /// (the session was cleared while the call was in flight) and the
    /// state was left untouched.
    pub fn finish(
        &self,
        token: RunToken,
        outcome: Result<WorkflowResult, WorkflowError>,
    ) -> bool {
        let mut state = self.state.lock();

        let current = self.generation.load(Ordering::SeqCst);
        if token.generation != current || !state.is_loading() {
            info!(
                "discarding stale outcome for run {} (current generation {})",
                token.generation, current
            );
            return false;
        }

        *state = match outcome {
            Ok(result) => WorkflowState::Succeeded(Box::new(result)),
            Err(error) => {
                warn!("workflow run {} failed: {}", token.generation, error);
                WorkflowState::Failed(error)
            }
        };
        true
    }

    /// Discard any result and return to Idle. Bumps the generation so a
    /// still-pending call's outcome is ignored when it arrives.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.state.lock() = WorkflowState::Idle;
        debug!("workflow session cleared");
    }

    /// Drive one full comparison run against the backend and return the
    /// resulting state snapshot.
    pub fn run_comparison(
        &self,
        backend: &dyn OptimizationBackend,
        artifact: &SourceArtifact,
        config: &OptimizationRequestConfig,
        mode: SequencingMode,
    ) -> Result<WorkflowState, WorkflowError> {
        // out-of-range knobs never reach the wire
        config.validate()?;

        let token = self.begin()?;
        let outcome = execute_comparison(backend, artifact, config, mode);
        self.finish(token, outcome);
        Ok(self.state())
    }
}

impl Default for WorkflowSession {
    fn default() -> Self {
        Self::new()
    }
}

fn execute_comparison(
    backend: &dyn OptimizationBackend,
    artifact: &SourceArtifact,
    config: &OptimizationRequestConfig,
    mode: SequencingMode,
) -> Result<WorkflowResult, WorkflowError> {
    let mut features = FeatureMap::new();
    let mut feature_count = None;

    // Step 1 (two-step mode only). The combined call is never issued
    // while this one is outstanding or after it failed.
    if mode == SequencingMode::TwoStep {
        let response = backend.extract_features(&FeatureRequest::new(artifact, config.target_arch))?;
        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "Feature extraction failed".to_string());
            return Err(classify_service_error(message));
        }
        features = response.features.unwrap_or_default();
        feature_count = response.feature_count;
        info!(
            "extracted {} features from {}",
            feature_count.unwrap_or(features.len() as u64),
            artifact.file_name
        );
    }

    let request = OptimizeRequest::from_config(artifact, config);
    let response = backend.compare_optimizations(&request)?;
    if !response.success {
        let message = response
            .error
            .unwrap_or_else(|| "Comparison failed".to_string());
        return Err(classify_service_error(message));
    }

    if features.is_empty() {
        if let Some(combined) = response.features {
            features = combined;
        }
    }

    let ml_raw = response.ml_optimization.unwrap_or_default();
    let ml_error = ml_raw.error.clone();
    let predicted_passes = ml_raw.ir_passes.clone().unwrap_or_default();
    let ml_metrics = match ml_raw.into_metrics() {
        Some(metrics) => metrics,
        // the ML build itself failed; its error is the real story
        None => match ml_error {
            Some(message) => return Err(classify_service_error(message)),
            None => return Err(WorkflowError::MissingMlMetrics),
        },
    };

    let baselines = collect_baselines(response.standard_optimizations.unwrap_or_default());
    if baselines.len() < OptLevel::ALL.len() {
        warn!(
            "only {} of {} standard levels present in the comparison",
            baselines.len(),
            OptLevel::ALL.len()
        );
    }

    let comparison = derive_comparison(&ml_metrics, &baselines);

    Ok(WorkflowResult {
        features,
        feature_count,
        predicted_passes,
        ml_metrics,
        baselines,
        comparison,
    })
}

/// Keep the baseline levels that both name a known level and decoded to
/// usable metrics; drop the rest.
fn collect_baselines(raw: BTreeMap<String, RawMetrics>) -> BTreeMap<OptLevel, PerLevelMetrics> {
    let mut baselines = BTreeMap::new();
    for (name, metrics) in raw {
        let Some(level) = OptLevel::parse(&name) else {
            debug!("ignoring unknown baseline level {:?}", name);
            continue;
        };
        match metrics.into_metrics() {
            Some(metrics) => {
                baselines.insert(level, metrics);
            }
            None => debug!("baseline {} has no usable metrics", level),
        }
    }
    baselines
}
