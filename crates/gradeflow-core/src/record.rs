//! The evaluation record emitted when a session completes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ordered::OrderedMap;
use crate::session::answers::AnswerMap;

/// Record header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub date: DateTime<Utc>,
    /// Source of the single rubric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Sources of a two-phase run, in phase order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocols: Option<Vec<String>>,
    pub grader_name: String,
    pub document_name: String,
    pub tag: Option<String>,
}

impl RecordMetadata {
    /// Protocol sources regardless of single/two-phase shape
    pub fn protocol_sources(&self) -> Vec<&str> {
        match (&self.protocol, &self.protocols) {
            (_, Some(list)) => list.iter().map(String::as_str).collect(),
            (Some(single), None) => vec![single.as_str()],
            (None, None) => Vec::new(),
        }
    }
}

/// Collected answers: one map for a single rubric, or one map per phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Results {
    Single(AnswerMap),
    Phased(OrderedMap<AnswerMap>),
}

impl Results {
    /// Answer maps with their phase name (`None` for single-rubric results)
    pub fn phases(&self) -> Vec<(Option<&str>, &AnswerMap)> {
        match self {
            Results::Single(answers) => vec![(None, answers)],
            Results::Phased(phases) => phases.iter().map(|(name, a)| (Some(name), a)).collect(),
        }
    }
}

/// Immutable output of a completed grading session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    metadata: RecordMetadata,
    results: Results,
}

impl EvaluationRecord {
    pub(crate) fn new(metadata: RecordMetadata, results: Results) -> Self {
        Self { metadata, results }
    }

    pub fn metadata(&self) -> &RecordMetadata {
        &self.metadata
    }

    pub fn results(&self) -> &Results {
        &self.results
    }

    /// Parse a record previously written by [`EvaluationRecord::to_json_pretty`]
    pub fn from_json(content: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::answers::Answer;
    use chrono::TimeZone;

    fn answers(entries: &[(&str, u32, &str)]) -> AnswerMap {
        entries
            .iter()
            .map(|(id, rating, evidence)| {
                (
                    id.to_string(),
                    Answer {
                        rating: Some(*rating),
                        evidence: evidence.to_string(),
                        notes: String::new(),
                    },
                )
            })
            .collect()
    }

    fn metadata(protocol: Option<&str>, protocols: Option<Vec<&str>>) -> RecordMetadata {
        RecordMetadata {
            date: Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
            protocol: protocol.map(str::to_string),
            protocols: protocols.map(|p| p.into_iter().map(str::to_string).collect()),
            grader_name: "AB".to_string(),
            document_name: "doc1".to_string(),
            tag: None,
        }
    }

    #[test]
    fn test_single_record_json_shape() {
        let record = EvaluationRecord::new(
            metadata(Some("five.json"), None),
            Results::Single(answers(&[("Clarity", 5, "text")])),
        );

        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["metadata"]["protocol"], "five.json");
        assert!(json["metadata"].get("protocols").is_none());
        assert_eq!(json["metadata"]["tag"], serde_json::Value::Null);
        assert_eq!(json["metadata"]["date"], "2026-10-16T09:30:00Z");
        assert_eq!(
            json["results"]["Clarity"],
            serde_json::json!({"rating": 5, "evidence": "text", "notes": ""})
        );
    }

    #[test]
    fn test_phased_record_parses_back_as_phased() {
        let mut phases = OrderedMap::new();
        phases.insert("2-point", answers(&[("Scope", 2, "s")]));
        phases.insert("5-point", answers(&[("Clarity", 4, "c")]));
        let record = EvaluationRecord::new(
            metadata(None, Some(vec!["two.json", "five.json"])),
            Results::Phased(phases),
        );

        let parsed = EvaluationRecord::from_json(&record.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, record);
        assert!(matches!(parsed.results(), Results::Phased(_)));
        assert_eq!(
            parsed.metadata().protocol_sources(),
            vec!["two.json", "five.json"]
        );
    }

    #[test]
    fn test_single_record_parses_back_as_single() {
        let record = EvaluationRecord::new(
            metadata(Some("five.json"), None),
            Results::Single(answers(&[("Clarity", 5, "a"), ("Fairness", 0, "b")])),
        );

        let parsed = EvaluationRecord::from_json(&record.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, record);
        let phases = parsed.results().phases();
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].0, None);
    }
}
