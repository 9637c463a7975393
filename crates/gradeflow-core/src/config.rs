//! Workspace configuration for gradeflow
//!
//! Configuration is stored in `.gradeflow/config.toml`.

pub mod types;

use std::fs;
use std::path::Path;

use crate::error::{GradeError, Result};

pub use types::{GradeConfig, RubricSource, WORKSPACE_FORMAT_VERSION};

impl GradeConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: GradeConfig = toml::from_str(&content)?;

        if config.version > WORKSPACE_FORMAT_VERSION {
            tracing::warn!(
                version = config.version,
                supported = WORKSPACE_FORMAT_VERSION,
                "workspace config is newer than this gradeflow"
            );
        }

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GradeError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}
