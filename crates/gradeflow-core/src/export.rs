//! Persisting and handing out evaluation records
//!
//! The rendered payload and the durable write are independent: a failed write
//! still leaves the payload available to the caller.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{GradeError, Result};
use crate::record::EvaluationRecord;

/// Timestamp layout used in record file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

const FALLBACK_COMPONENT: &str = "unnamed";

/// Reduce a name to `[A-Za-z0-9_]`: other character runs become one `_`,
/// edge underscores are trimmed, and an empty result becomes `unnamed`.
pub fn sanitize_component(raw: &str) -> String {
    let cleaned = match Regex::new(r"[^A-Za-z0-9]+") {
        Ok(re) => re.replace_all(raw, "_").into_owned(),
        Err(e) => {
            warn!(error = %e, "file name pattern unavailable");
            raw.chars().filter(char::is_ascii_alphanumeric).collect()
        }
    };

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_COMPONENT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `{tag_}{grader}_{document}_{timestamp}.json`
pub fn record_file_name(
    grader: &str,
    document: &str,
    tag: Option<&str>,
    timestamp: DateTime<Utc>,
) -> String {
    let prefix = tag
        .map(|t| format!("{}_", sanitize_component(t)))
        .unwrap_or_default();
    format!(
        "{}{}_{}_{}.json",
        prefix,
        sanitize_component(grader),
        sanitize_component(document),
        timestamp.format(FILE_TIMESTAMP_FORMAT)
    )
}

/// File name for a finalized record, derived from its metadata
pub fn file_name_for(record: &EvaluationRecord) -> String {
    let metadata = record.metadata();
    record_file_name(
        &metadata.grader_name,
        &metadata.document_name,
        metadata.tag.as_deref(),
        metadata.date,
    )
}

/// A rendered record plus the outcome of writing it to disk
#[derive(Debug)]
pub struct Delivery {
    /// Pretty JSON, ready to hand to the evaluator
    pub payload: String,
    pub file_name: String,
    /// Where the record was saved, or why saving failed
    pub saved: Result<PathBuf>,
}

/// Render `record` and save it under `output_dir`.
///
/// Only rendering failures are returned as `Err`; a write failure is carried
/// in [`Delivery::saved`] next to the payload.
pub fn deliver(record: &EvaluationRecord, output_dir: &Path) -> Result<Delivery> {
    let payload = record.to_json_pretty()?;
    let file_name = file_name_for(record);
    let saved = write_new_file(&output_dir.join(&file_name), &payload);

    match &saved {
        Ok(path) => debug!(path = %path.display(), "record saved"),
        Err(e) => warn!(error = %e, "record could not be saved"),
    }

    Ok(Delivery {
        payload,
        file_name,
        saved,
    })
}

/// Write `content` to `path`, refusing to replace an existing file
pub fn write_new_file(path: &Path, content: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| GradeError::io_operation("create directory", parent.display(), e))?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| GradeError::io_operation("create", path.display(), e))?;
    file.write_all(content.as_bytes())
        .and_then(|_| file.write_all(b"\n"))
        .map_err(|e| GradeError::io_operation("write", path.display(), e))?;

    Ok(path.to_path_buf())
}
