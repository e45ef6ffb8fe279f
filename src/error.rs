// Workflow error taxonomy
use thiserror::Error;

/// Substrings marking a service error as a compiler diagnostic
const COMPILER_ERROR_MARKERS: [&str; 2] = ["Compilation failed", "compilation errors"];

/// Wrapper text the service prepends to compiler diagnostics; stripped
/// before the diagnostic is shown as a preformatted block
const DIAGNOSTIC_PREFIXES: [&str; 2] = [
    "Feature extraction failed: Compilation failed: Failed to compile C source: ",
    "Comparison failed: ",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Transport failure or unreachable service
    #[error("cannot reach the optimization service: {0}")]
    Network(String),
    /// The service answered with success == false; surfaced verbatim
    #[error("{0}")]
    Service(String),
    /// A service error carrying a compiler diagnostic, unwrapped from its
    /// known wrapper prefixes
    #[error("compilation failed:\n{0}")]
    CompilationDiagnostic(String),
    /// A success response without the ML execution-time/size fields, which
    /// block computing any comparison
    #[error("service response did not include ML optimization metrics")]
    MissingMlMetrics,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Submitting while a run is already in flight
    #[error("a workflow run is already in progress")]
    Busy,
}

/// Map a service-provided error string to the right error kind. Messages
/// containing a known compiler-failure marker become a diagnostic with the
/// wrapper prefixes removed; everything else is surfaced verbatim.
pub fn classify_service_error(message: impl Into<String>) -> WorkflowError {
    let message = message.into();

    if COMPILER_ERROR_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
    {
        let mut diagnostic = message;
        for prefix in DIAGNOSTIC_PREFIXES {
            diagnostic = diagnostic.replacen(prefix, "", 1);
        }
        WorkflowError::CompilationDiagnostic(diagnostic.trim().to_string())
    } else {
        WorkflowError::Service(message)
    }
}
