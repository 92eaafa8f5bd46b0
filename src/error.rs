//! Error types for the structural analysis pipeline

use thiserror::Error;

/// Main error type for structure-building and analysis operations
#[derive(Error, Debug)]
pub enum StructureError {
    #[error("Node '{0}' not found in structure")]
    NodeNotFound(String),

    #[error("Element '{0}' not found in structure")]
    ElementNotFound(String),

    #[error("Load case '{0}' not found in structure")]
    LoadCaseNotFound(String),

    #[error("Load combination '{0}' not found in structure")]
    LoadComboNotFound(String),

    #[error("Duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No load cases selected to run")]
    NoLoadCases,

    #[error("Singular stiffness matrix - structure is a mechanism or under-restrained")]
    Singular,

    #[error("Structure not analyzed - call solve() first")]
    NotAnalyzed,

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Invalid state: {0}")]
    StateViolation(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for structure-building and analysis operations
pub type StructureResult<T> = Result<T, StructureError>;
