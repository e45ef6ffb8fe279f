// HTTP client for the LLVM optimization service
use crate::error::WorkflowError;
use crate::models::{
    ComparisonResponse, FeatureExtractionResponse, FeatureRequest, HealthResponse,
    OptimizationResponse, OptimizeRequest, StandardRequest, StandardResponse,
};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

// Default backend URL; override via settings or --server
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5001";

/// Transport seam for the workflow orchestrator. The production
/// implementation is [`LlvmService`]; tests script their own.
pub trait OptimizationBackend {
    fn extract_features(
        &self,
        request: &FeatureRequest,
    ) -> Result<FeatureExtractionResponse, WorkflowError>;

    fn compare_optimizations(
        &self,
        request: &OptimizeRequest,
    ) -> Result<ComparisonResponse, WorkflowError>;
}

/// Client for the service's /api/llvm endpoints
pub struct LlvmService {
    base_url: String,
    agent: ureq::Agent,
}

impl LlvmService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/llvm/{}", self.base_url, path)
    }

    fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, WorkflowError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        match self.agent.post(&url).send_json(body) {
            Ok(response) => response
                .into_json::<T>()
                .map_err(|e| WorkflowError::Network(format!("malformed response from {}: {}", url, e))),
            // Non-2xx answers usually still carry the service's JSON error
            // payload; decode it so the error string survives
            Err(ureq::Error::Status(code, response)) => {
                warn!("{} returned status {}", url, code);
                response.into_json::<T>().map_err(|_| {
                    WorkflowError::Network(format!("server returned status {} for {}", code, url))
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(WorkflowError::Network(transport.to_string()))
            }
        }
    }

    /// Run the ML-predicted (or manual) pass sequence on its own
    pub fn run_optimization(
        &self,
        request: &OptimizeRequest,
    ) -> Result<OptimizationResponse, WorkflowError> {
        self.post_json("optimize", request)
    }

    /// Build and benchmark the standard levels without an ML candidate
    pub fn run_standard(
        &self,
        request: &StandardRequest,
    ) -> Result<StandardResponse, WorkflowError> {
        self.post_json("standard", request)
    }

    /// The session counts as connected iff the service reports "healthy"
    pub fn check_health(&self) -> bool {
        let url = self.endpoint("health");
        debug!("GET {}", url);

        match self.agent.get(&url).call() {
            Ok(response) => response
                .into_json::<HealthResponse>()
                .map(|health| health.status == "healthy")
                .unwrap_or(false),
            Err(e) => {
                debug!("health check failed: {}", e);
                false
            }
        }
    }
}

impl OptimizationBackend for LlvmService {
    fn extract_features(
        &self,
        request: &FeatureRequest,
    ) -> Result<FeatureExtractionResponse, WorkflowError> {
        self.post_json("features", request)
    }

    fn compare_optimizations(
        &self,
        request: &OptimizeRequest,
    ) -> Result<ComparisonResponse, WorkflowError> {
        self.post_json("compare", request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let service = LlvmService::new("http://localhost:5001/");
        assert_eq!(service.base_url(), "http://localhost:5001");
        assert_eq!(
            service.endpoint("compare"),
            "http://localhost:5001/api/llvm/compare"
        );
    }
}
