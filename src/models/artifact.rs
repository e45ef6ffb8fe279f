// Uploaded source artifact
use std::fs;
use std::path::Path;

/// An uploaded C/C++ source file. Immutable once created; a new upload
/// replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArtifact {
    pub file_name: String,
    pub size_bytes: u64,
    pub code: String,
}

impl SourceArtifact {
    /// Read a source file from disk (UTF-8 text)
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let code = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(Self {
            file_name,
            size_bytes: code.len() as u64,
            code,
        })
    }

    pub fn from_code(file_name: impl Into<String>, code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            file_name: file_name.into(),
            size_bytes: code.len() as u64,
            code,
        }
    }
}
