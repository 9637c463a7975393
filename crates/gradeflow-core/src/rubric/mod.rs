//! Rubric definitions
//!
//! A rubric is an ordered list of metrics sharing one rating scale. The scale
//! is derived from the table schema: every column whose label starts with the
//! rating prefix is one scale entry, valued by the first run of digits in its
//! label, ordered from highest to lowest.

pub mod catalog;
pub mod columns;
pub mod table;

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::bail_schema;
use crate::error::{GradeError, Result};
pub use catalog::RubricCatalog;
pub use columns::ColumnSpec;
use table::{column_labels, Row};

/// Maximum description length shown in a rating selector label
pub const RATING_LABEL_WIDTH: usize = 50;

/// One permitted rating value and what it means
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleEntry {
    pub value: u32,
    pub description: String,
}

/// One criterion being evaluated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub id: String,
    pub definition: String,
    /// Strictly descending by value, never empty
    pub scale: Vec<ScaleEntry>,
}

impl Metric {
    /// Whether `value` is one of this metric's declared ratings
    pub fn permits(&self, value: u32) -> bool {
        self.scale.iter().any(|entry| entry.value == value)
    }

    /// The permitted values, highest first
    pub fn scale_values(&self) -> Vec<u32> {
        self.scale.iter().map(|entry| entry.value).collect()
    }

    /// Selector label for one scale entry: `"<value> - <description>"`,
    /// with long descriptions cut at [`RATING_LABEL_WIDTH`] characters.
    pub fn rating_label(&self, value: u32) -> Option<String> {
        let entry = self.scale.iter().find(|entry| entry.value == value)?;
        let description = &entry.description;
        if description.chars().count() > RATING_LABEL_WIDTH {
            let cut: String = description.chars().take(RATING_LABEL_WIDTH).collect();
            Some(format!("{} - {}...", value, cut))
        } else {
            Some(format!("{} - {}", value, description))
        }
    }
}

/// An ordered, immutable list of metrics loaded from one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rubric {
    name: String,
    source: String,
    metrics: Vec<Metric>,
}

impl Rubric {
    /// Build a rubric from table rows.
    ///
    /// Rows whose identifier is missing or blank are dropped. Fails with
    /// [`GradeError::Schema`] when a required column is absent or the rating
    /// columns are unusable, and with [`GradeError::DuplicateMetric`] when two
    /// rows normalize to the same identifier.
    pub fn from_rows(
        name: impl Into<String>,
        source: impl Into<String>,
        rows: &[Row],
        columns: &ColumnSpec,
    ) -> Result<Self> {
        let name = name.into();
        let source = source.into();
        let labels = column_labels(rows);

        if !labels.iter().any(|l| l == &columns.metric) {
            bail_schema!(&source, "missing required column '{}'", columns.metric);
        }

        let definition_column = match columns
            .definition
            .iter()
            .find(|candidate| labels.iter().any(|l| l == *candidate))
        {
            Some(column) => column.clone(),
            None => bail_schema!(
                &source,
                "missing required column '{}'",
                columns.definition.join("' or '")
            ),
        };

        let rating_columns = rating_columns(&source, &labels, &columns.rating_prefix)?;

        let mut seen = HashSet::new();
        let mut metrics = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            let id = row
                .get(&columns.metric)
                .and_then(|cell| cell.as_text())
                .map(|raw| normalize_metric_id(&raw))
                .unwrap_or_default();

            if id.is_empty() {
                debug!(rubric = %name, row = index, "dropping row without metric identifier");
                continue;
            }

            if !seen.insert(id.clone()) {
                return Err(GradeError::DuplicateMetric {
                    source_name: source,
                    metric: id,
                });
            }

            let text_of = |column: &str| {
                row.get(column)
                    .and_then(|cell| cell.as_text())
                    .unwrap_or_default()
            };

            metrics.push(Metric {
                id,
                definition: text_of(&definition_column),
                scale: rating_columns
                    .iter()
                    .map(|(value, column)| ScaleEntry {
                        value: *value,
                        description: text_of(column),
                    })
                    .collect(),
            });
        }

        if metrics.is_empty() {
            bail_schema!(&source, "no metrics with an identifier in '{}'", columns.metric);
        }

        debug!(rubric = %name, metrics = metrics.len(), scale = rating_columns.len(), "rubric built");

        Ok(Rubric {
            name,
            source,
            metrics,
        })
    }

    /// Rubric name; keys this rubric's phase in two-phase results
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source label (file name) recorded as the protocol
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn metric(&self, id: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.id == id)
    }

    pub fn metric_at(&self, index: usize) -> Option<&Metric> {
        self.metrics.get(index)
    }

    /// Metric ids in catalog order
    pub fn metric_ids(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|m| m.id.as_str())
    }
}

/// Normalize a metric label into its identifier: non-breaking spaces become
/// regular spaces, whitespace runs collapse to one space, ends are trimmed.
pub fn normalize_metric_id(raw: &str) -> String {
    raw.replace(['\u{a0}', '\u{2007}', '\u{202f}'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rating columns as `(value, label)`, highest value first
fn rating_columns(source: &str, labels: &[String], prefix: &str) -> Result<Vec<(u32, String)>> {
    let digits =
        Regex::new(r"[0-9]+").map_err(|e| GradeError::Other(format!("digit pattern: {}", e)))?;

    let mut columns = Vec::new();
    for label in labels.iter().filter(|l| l.trim_start().starts_with(prefix)) {
        let Some(found) = digits.find(label) else {
            bail_schema!(source, "rating column '{}' has no numeric value", label);
        };
        let value: u32 = found.as_str().parse().map_err(|_| {
            GradeError::schema(source, format!("rating column '{}' value out of range", label))
        })?;
        if let Some((_, other)) = columns.iter().find(|(v, _)| *v == value) {
            bail_schema!(
                source,
                "rating columns '{}' and '{}' both declare value {}",
                other,
                label,
                value
            );
        }
        columns.push((value, label.clone()));
    }

    if columns.is_empty() {
        bail_schema!(source, "no rating columns (labels starting with '{}')", prefix);
    }

    columns.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(columns)
}
