//! Column labels a rubric table is read with

use serde::{Deserialize, Serialize};

/// Which table columns carry the identifier, definition and rating scale
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Metric identifier column
    #[serde(default = "default_metric_column")]
    pub metric: String,

    /// Definition column candidates; the first one present is used
    #[serde(default = "default_definition_columns")]
    pub definition: Vec<String>,

    /// Columns whose label starts with this prefix are rating scale entries
    #[serde(default = "default_rating_prefix")]
    pub rating_prefix: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            metric: default_metric_column(),
            definition: default_definition_columns(),
            rating_prefix: default_rating_prefix(),
        }
    }
}

fn default_metric_column() -> String {
    "Metric".to_string()
}

// The protocol workbooks spell the header "Defination"
fn default_definition_columns() -> Vec<String> {
    vec![
        "Metric Defination".to_string(),
        "Metric Definition".to_string(),
    ]
}

fn default_rating_prefix() -> String {
    "Rating".to_string()
}
