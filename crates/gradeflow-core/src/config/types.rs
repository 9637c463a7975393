//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::rubric::ColumnSpec;

/// Current workspace format version
pub const WORKSPACE_FORMAT_VERSION: u32 = 1;

/// Workspace configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeConfig {
    /// Format version for compatibility checking
    #[serde(default = "default_version")]
    pub version: u32,

    /// Where finalized records are written, relative to the project root
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Rubrics graded in order; one or two entries
    #[serde(default)]
    pub rubrics: Vec<RubricSource>,

    /// Table column labels
    #[serde(default)]
    pub columns: ColumnSpec,
}

impl Default for GradeConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            output_dir: default_output_dir(),
            rubrics: Vec::new(),
            columns: ColumnSpec::default(),
        }
    }
}

/// One rubric table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricSource {
    /// Phase name; defaults to the file stem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Table path, relative to the project root
    pub path: String,
}

impl RubricSource {
    /// Parse `NAME=PATH` or a bare `PATH`
    pub fn parse(spec: &str) -> Self {
        match spec.split_once('=') {
            Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => Self {
                name: Some(name.trim().to_string()),
                path: path.trim().to_string(),
            },
            _ => Self {
                name: None,
                path: spec.trim().to_string(),
            },
        }
    }
}

fn default_version() -> u32 {
    WORKSPACE_FORMAT_VERSION
}

fn default_output_dir() -> String {
    "evaluations".to_string()
}
