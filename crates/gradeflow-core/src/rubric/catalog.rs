//! Process-wide rubric cache
//!
//! Loading a rubric is the only I/O in a grading run. Each source is read and
//! validated once per process; later loads share the same [`Rubric`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;

use tracing::debug;

use super::table::{read_rows, source_label};
use super::{ColumnSpec, Rubric};
use crate::error::Result;
use crate::trace_time;

type CacheKey = (PathBuf, String, ColumnSpec);

static GLOBAL: OnceLock<RubricCatalog> = OnceLock::new();

/// Memoizing rubric loader
#[derive(Debug, Default)]
pub struct RubricCatalog {
    loaded: Mutex<HashMap<CacheKey, Arc<Rubric>>>,
}

impl RubricCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shared by the whole process
    pub fn global() -> &'static RubricCatalog {
        GLOBAL.get_or_init(RubricCatalog::new)
    }

    /// Load the rubric at `path`, named after its file stem
    pub fn load(&self, path: &Path, columns: &ColumnSpec) -> Result<Arc<Rubric>> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| source_label(path));
        self.load_named(&name, path, columns)
    }

    /// Load the rubric at `path` under an explicit name
    #[tracing::instrument(skip(self, path, columns), fields(path = %path.display()))]
    pub fn load_named(&self, name: &str, path: &Path, columns: &ColumnSpec) -> Result<Arc<Rubric>> {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let key = (canonical, name.to_string(), columns.clone());

        if let Some(rubric) = self.lock().get(&key) {
            debug!(rubric = name, "rubric cache hit");
            return Ok(Arc::clone(rubric));
        }

        let start = Instant::now();
        let rows = read_rows(path)?;
        let rubric = Arc::new(Rubric::from_rows(name, source_label(path), &rows, columns)?);
        trace_time!(start, "load_rubric", metrics = rubric.len());

        let mut cache = self.lock();
        let shared = cache.entry(key).or_insert(rubric);
        Ok(Arc::clone(shared))
    }

    /// Number of cached rubrics
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Arc<Rubric>>> {
        // Entries are inserted whole, so a poisoned map is still consistent
        self.loaded.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
