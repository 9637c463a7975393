//! Session state value objects

use std::fmt;

use serde::{Deserialize, Serialize};

use super::answers::PhaseAnswers;

/// Where the session is in the wizard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    Setup,
    #[serde(rename = "RUBRIC_A_ACTIVE")]
    RubricA,
    #[serde(rename = "RUBRIC_B_ACTIVE")]
    RubricB,
    Done,
}

impl Phase {
    /// Index of the rubric this phase is grading, if any
    pub fn rubric_index(self) -> Option<usize> {
        match self {
            Phase::RubricA => Some(0),
            Phase::RubricB => Some(1),
            Phase::Setup | Phase::Done => None,
        }
    }

    pub(crate) fn for_rubric(index: usize) -> Option<Phase> {
        match index {
            0 => Some(Phase::RubricA),
            1 => Some(Phase::RubricB),
            _ => None,
        }
    }

    pub fn is_active(self) -> bool {
        self.rubric_index().is_some()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Setup => "SETUP",
            Phase::RubricA => "RUBRIC_A_ACTIVE",
            Phase::RubricB => "RUBRIC_B_ACTIVE",
            Phase::Done => "DONE",
        };
        f.write_str(label)
    }
}

/// Who is grading what. Fixed once the session starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub grader: String,
    pub document: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl SessionMetadata {
    pub fn new(
        grader: impl Into<String>,
        document: impl Into<String>,
        tag: Option<String>,
    ) -> Self {
        Self {
            grader: grader.into(),
            document: document.into(),
            tag,
        }
    }

    /// Trimmed copy; a blank tag becomes absent
    pub(crate) fn normalized(&self) -> Self {
        Self {
            grader: self.grader.trim().to_string(),
            document: self.document.trim().to_string(),
            tag: self
                .tag
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        }
    }
}

/// Everything mutable about a grading run, as one serializable snapshot.
///
/// `answers[i]` belongs to rubric `i`. Entries for phases before the active
/// one are frozen; the active phase's entry is the only one written to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub cursor: usize,
    pub metadata: SessionMetadata,
    #[serde(default)]
    pub answers: Vec<PhaseAnswers>,
}
