//! Error types and exit codes for gradeflow
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (I/O, serialization)
//! - 2: Usage error (bad flags/args, rejected input)
//! - 3: Data error (rubric schema, workspace, session snapshot, blocked transition)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the gradeflow CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args or rejected input (2)
    Usage = 2,
    /// Data error - rubric, workspace or session problems (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during gradeflow operations
#[derive(Error, Debug)]
pub enum GradeError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("validation failed: {0}")]
    Validation(String),

    // Data errors (exit code 3)
    #[error("rubric schema error in {source_name}: {reason}")]
    Schema { source_name: String, reason: String },

    #[error("duplicate metric in {source_name}: {metric}")]
    DuplicateMetric { source_name: String, metric: String },

    #[error("not ready: {0}")]
    NotReady(String),

    #[error("workspace not found (searched from {search_root:?})")]
    WorkspaceNotFound { search_root: PathBuf },

    #[error("invalid session snapshot: {reason}")]
    InvalidSession { reason: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl GradeError {
    /// Create a rubric schema error for the named source
    pub fn schema(source_name: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        GradeError::Schema {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a validation error
    pub fn validation(reason: impl Into<String>) -> Self {
        GradeError::Validation(reason.into())
    }

    /// Create an error for a snapshot that no longer matches its rubrics
    pub fn invalid_session(reason: impl Into<String>) -> Self {
        GradeError::InvalidSession {
            reason: reason.into(),
        }
    }

    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        GradeError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            GradeError::UsageError(_)
            | GradeError::Validation(_) => ExitCode::Usage,

            GradeError::Schema { .. }
            | GradeError::DuplicateMetric { .. }
            | GradeError::NotReady(_)
            | GradeError::WorkspaceNotFound { .. }
            | GradeError::InvalidSession { .. } => ExitCode::Data,

            GradeError::Io(_)
            | GradeError::Yaml(_)
            | GradeError::Json(_)
            | GradeError::Toml(_)
            | GradeError::FailedOperationWithTarget { .. }
            | GradeError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            GradeError::UsageError(_) => "usage_error",
            GradeError::Validation(_) => "validation_error",
            GradeError::Schema { .. } => "schema_error",
            GradeError::DuplicateMetric { .. } => "duplicate_metric",
            GradeError::NotReady(_) => "not_ready",
            GradeError::WorkspaceNotFound { .. } => "workspace_not_found",
            GradeError::InvalidSession { .. } => "invalid_session",
            GradeError::Io(_) => "io_error",
            GradeError::Yaml(_) => "yaml_error",
            GradeError::Json(_) => "json_error",
            GradeError::Toml(_) => "toml_error",
            GradeError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            GradeError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for gradeflow operations
pub type Result<T> = std::result::Result<T, GradeError>;
