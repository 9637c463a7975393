//! Per-metric answers

use serde::{Deserialize, Serialize};

use crate::ordered::OrderedMap;
use crate::rubric::Rubric;

/// The evaluator's judgement for one metric in one phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Answer {
    pub rating: Option<u32>,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub notes: String,
}

impl Answer {
    /// A rating is chosen and the evidence is not blank. Notes never count.
    pub fn is_complete(&self) -> bool {
        self.rating.is_some() && !self.evidence.trim().is_empty()
    }
}

/// Answers keyed by metric id, in catalog order
pub type AnswerMap = OrderedMap<Answer>;

/// One empty answer per metric of `rubric`, in catalog order
pub fn blank_answers(rubric: &Rubric) -> AnswerMap {
    rubric
        .metric_ids()
        .map(|id| (id.to_string(), Answer::default()))
        .collect()
}

/// The answer map of one phase, tagged with the rubric it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseAnswers {
    pub rubric: String,
    pub answers: AnswerMap,
}

impl PhaseAnswers {
    pub fn blank(rubric: &Rubric) -> Self {
        Self {
            rubric: rubric.name().to_string(),
            answers: blank_answers(rubric),
        }
    }

    /// Whether this map has exactly the rubric's metrics, in order
    pub fn matches(&self, rubric: &Rubric) -> bool {
        self.rubric == rubric.name() && self.answers.keys().eq(rubric.metric_ids())
    }
}
