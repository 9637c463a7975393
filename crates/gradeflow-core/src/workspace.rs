//! Workspace management for gradeflow
//!
//! A workspace is a `.gradeflow/` directory holding `config.toml` and, while a
//! grading run is in progress, `session.json`. Rubric and output paths in the
//! config are relative to the project root (the directory containing
//! `.gradeflow/`).
//!
//! One workspace holds one session. Evaluators sharing a workspace share its
//! in-progress session; separate evaluators use separate workspaces.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{GradeConfig, RubricSource};
use crate::error::{GradeError, Result};
use crate::export::write_new_file;
use crate::rubric::RubricCatalog;
use crate::session::{GradingSession, SessionPlan, SessionState};

/// Workspace directory name
pub const WORKSPACE_DIR: &str = ".gradeflow";

/// Configuration filename
pub const CONFIG_FILE: &str = "config.toml";

/// Session snapshot filename
pub const SESSION_FILE: &str = "session.json";

/// Walk up from `root` to the nearest `.gradeflow/` directory
pub fn discover_workspace(root: &Path) -> Result<PathBuf> {
    let mut current = root.to_path_buf();

    loop {
        let candidate = current.join(WORKSPACE_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(GradeError::WorkspaceNotFound {
                    search_root: root.to_path_buf(),
                });
            }
        }
    }
}

/// Options for [`Workspace::init`]
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Replace the configured rubric list when non-empty
    pub rubrics: Vec<RubricSource>,
    /// Replace the output directory when set
    pub output_dir: Option<String>,
}

/// An opened gradeflow workspace
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    config: GradeConfig,
}

impl Workspace {
    /// Discover a workspace by walking up from the given directory
    pub fn discover(root: &Path) -> Result<Self> {
        let path = discover_workspace(root)?;
        Self::open(&path)
    }

    /// Open an existing workspace directory
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(GradeError::WorkspaceNotFound {
                search_root: path.to_path_buf(),
            });
        }

        let config_path = path.join(CONFIG_FILE);
        let config = if config_path.exists() {
            GradeConfig::load(&config_path)?
        } else {
            GradeConfig::default()
        };

        Ok(Workspace {
            root: path.to_path_buf(),
            config,
        })
    }

    /// Create (or update) the workspace under `project_root`. Idempotent.
    pub fn init(project_root: &Path, options: InitOptions) -> Result<Self> {
        let root = project_root.join(WORKSPACE_DIR);
        fs::create_dir_all(&root)
            .map_err(|e| GradeError::io_operation("create workspace", root.display(), e))?;

        let config_path = root.join(CONFIG_FILE);
        let existed = config_path.exists();
        let mut config = if existed {
            GradeConfig::load(&config_path)?
        } else {
            GradeConfig::default()
        };

        let changed = !options.rubrics.is_empty() || options.output_dir.is_some();
        if !options.rubrics.is_empty() {
            config.rubrics = options.rubrics;
        }
        if let Some(output_dir) = options.output_dir {
            config.output_dir = output_dir;
        }
        if !existed || changed {
            config.save(&config_path)?;
        }

        debug!(root = %root.display(), existed, changed, "workspace initialized");
        Ok(Workspace { root, config })
    }

    /// The `.gradeflow/` directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory containing `.gradeflow/`; config paths resolve against it
    pub fn project_root(&self) -> &Path {
        self.root.parent().unwrap_or(&self.root)
    }

    pub fn config(&self) -> &GradeConfig {
        &self.config
    }

    pub fn session_path(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.config.output_dir)
    }

    /// Resolve a config path against the project root
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root().join(path)
        }
    }

    /// Load the configured rubrics through the process-wide catalog
    pub fn plan(&self) -> Result<SessionPlan> {
        if self.config.rubrics.is_empty() {
            return Err(GradeError::UsageError(
                "no rubrics configured; run `gradeflow init --rubric <path>`".to_string(),
            ));
        }

        let catalog = RubricCatalog::global();
        let rubrics = self
            .config
            .rubrics
            .iter()
            .map(|source| {
                let path = self.resolve(&source.path);
                match &source.name {
                    Some(name) => catalog.load_named(name, &path, &self.config.columns),
                    None => catalog.load(&path, &self.config.columns),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        SessionPlan::from_rubrics(rubrics)
    }

    /// The saved session, or a fresh one in `SETUP` when nothing is saved
    pub fn load_session(&self) -> Result<GradingSession> {
        let plan = self.plan()?;
        let path = self.session_path();
        if !path.exists() {
            return Ok(GradingSession::new(plan));
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| GradeError::io_operation("read session", path.display(), e))?;
        let state: SessionState = serde_json::from_str(&content).map_err(|e| {
            GradeError::invalid_session(format!("{}: {}", path.display(), e))
        })?;
        GradingSession::restore(plan, state)
    }

    /// Persist the session snapshot, replacing the previous one
    pub fn save_session(&self, session: &GradingSession) -> Result<()> {
        let path = self.session_path();
        let staging = self.root.join(format!("{}.tmp", SESSION_FILE));
        let content = serde_json::to_string_pretty(session.state())?;

        if staging.exists() {
            fs::remove_file(&staging)?;
        }
        write_new_file(&staging, &content)?;
        fs::rename(&staging, &path)
            .map_err(|e| GradeError::io_operation("save session", path.display(), e))?;
        debug!(phase = %session.phase(), cursor = session.cursor(), "session saved");
        Ok(())
    }

    /// Remove the saved session, if any
    pub fn clear_session(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| GradeError::io_operation("remove session", path.display(), e))?;
        }
        Ok(())
    }
}
