//! Grading session state machine
//!
//! ```text
//! SETUP --start--> RUBRIC_A_ACTIVE --finalize--> RUBRIC_B_ACTIVE --finalize--> DONE
//! ```
//!
//! A single-rubric plan skips `RUBRIC_B_ACTIVE`. Within a phase the cursor
//! moves one metric at a time: forward only past a complete answer, backward
//! freely, never across a phase boundary. `reset` returns to `SETUP` from
//! anywhere.
//!
//! A session is owned by one caller. Concurrent evaluators each need their
//! own instance.

pub mod answers;
pub mod plan;
pub mod state;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::bail_validation;
use crate::error::{GradeError, Result};
use crate::ordered::OrderedMap;
use crate::record::{EvaluationRecord, RecordMetadata, Results};
use crate::rubric::{Metric, Rubric};
pub use answers::{Answer, AnswerMap, PhaseAnswers};
pub use plan::SessionPlan;
pub use state::{Phase, SessionMetadata, SessionState};

/// Outcome of [`GradingSession::finalize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finalization {
    /// The last phase completed; the session is `DONE`
    Record(EvaluationRecord),
    /// The first of two phases completed; the second begins at its first metric
    PhaseTransition { completed: String, next: String },
    /// The current metric is not the last one or its answer is incomplete
    NotReady,
}

/// A grading run over a [`SessionPlan`]
#[derive(Debug, Clone)]
pub struct GradingSession {
    plan: SessionPlan,
    state: SessionState,
}

impl GradingSession {
    /// Fresh session in `SETUP`
    pub fn new(plan: SessionPlan) -> Self {
        Self {
            plan,
            state: SessionState::default(),
        }
    }

    /// Rehydrate a saved snapshot, checking it still fits the plan's rubrics
    pub fn restore(plan: SessionPlan, state: SessionState) -> Result<Self> {
        validate_snapshot(&plan, &state)?;
        Ok(Self { plan, state })
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    /// Current snapshot, suitable for persisting
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn metadata(&self) -> &SessionMetadata {
        &self.state.metadata
    }

    /// Rubric of the active phase
    pub fn active_rubric(&self) -> Option<&Arc<Rubric>> {
        self.state
            .phase
            .rubric_index()
            .and_then(|index| self.plan.rubric(index))
    }

    /// Metric in focus
    pub fn current_metric(&self) -> Option<&Metric> {
        self.active_rubric()?.metric_at(self.state.cursor)
    }

    /// `(position, total)` of the metric in focus, 1-based
    pub fn progress(&self) -> Option<(usize, usize)> {
        let rubric = self.active_rubric()?;
        Some((self.state.cursor + 1, rubric.len()))
    }

    /// Answer for a metric of the active phase
    pub fn answer(&self, metric_id: &str) -> Option<&Answer> {
        self.active_answers()?.answers.get(metric_id)
    }

    /// Answers of the phase grading rubric `index`, frozen or active
    pub fn phase_answers(&self, index: usize) -> Option<&PhaseAnswers> {
        self.state.answers.get(index)
    }

    /// Begin grading: records metadata and opens the first rubric phase
    pub fn start(&mut self, metadata: SessionMetadata) -> Result<()> {
        if self.state.phase != Phase::Setup {
            bail_validation!("session already started (phase {})", self.state.phase);
        }

        let metadata = metadata.normalized();
        if metadata.grader.is_empty() {
            bail_validation!("grader name is required");
        }
        if metadata.document.is_empty() {
            bail_validation!("document name is required");
        }

        let Some(first) = self.plan.rubric(0) else {
            bail_validation!("session plan has no rubrics");
        };

        self.state = SessionState {
            phase: Phase::RubricA,
            cursor: 0,
            answers: vec![PhaseAnswers::blank(first)],
            metadata,
        };

        debug!(
            grader = %self.state.metadata.grader,
            document = %self.state.metadata.document,
            rubric = first.name(),
            "session started"
        );
        Ok(())
    }

    /// Set or clear the rating of the metric in focus
    pub fn set_rating(&mut self, metric_id: &str, value: Option<u32>) -> Result<()> {
        let metric = self.focused_metric(metric_id)?;
        if let Some(value) = value {
            if !metric.permits(value) {
                bail_validation!(
                    "rating {} is not on the scale of '{}' (allowed: {:?})",
                    value,
                    metric_id,
                    metric.scale_values()
                );
            }
        }

        self.focused_answer_mut(metric_id)?.rating = value;
        debug!(metric = metric_id, rating = ?value, "rating set");
        Ok(())
    }

    /// Replace the evidence text of the metric in focus
    pub fn set_evidence(&mut self, metric_id: &str, text: impl Into<String>) -> Result<()> {
        self.focused_metric(metric_id)?;
        self.focused_answer_mut(metric_id)?.evidence = text.into();
        Ok(())
    }

    /// Replace the notes of the metric in focus
    pub fn set_notes(&mut self, metric_id: &str, text: impl Into<String>) -> Result<()> {
        self.focused_metric(metric_id)?;
        self.focused_answer_mut(metric_id)?.notes = text.into();
        Ok(())
    }

    pub fn is_answer_complete(&self, metric_id: &str) -> bool {
        self.answer(metric_id).is_some_and(Answer::is_complete)
    }

    fn current_is_complete(&self) -> bool {
        self.current_metric()
            .is_some_and(|metric| self.is_answer_complete(&metric.id))
    }

    fn is_on_last_metric(&self) -> bool {
        self.active_rubric()
            .is_some_and(|rubric| self.state.cursor + 1 == rubric.len())
    }

    /// Not on the last metric, and the current answer is complete
    pub fn can_advance(&self) -> bool {
        self.active_rubric()
            .is_some_and(|rubric| self.state.cursor + 1 < rubric.len())
            && self.current_is_complete()
    }

    /// Move to the next metric. Returns false, changing nothing, when blocked.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            debug!(cursor = self.state.cursor, "advance blocked");
            return false;
        }
        self.state.cursor += 1;
        debug!(cursor = self.state.cursor, "advanced");
        true
    }

    /// Move to the previous metric of the same phase. Answers are untouched.
    pub fn retreat(&mut self) -> bool {
        if !self.state.phase.is_active() || self.state.cursor == 0 {
            return false;
        }
        self.state.cursor -= 1;
        debug!(cursor = self.state.cursor, "retreated");
        true
    }

    /// On the last metric, and its answer is complete
    pub fn can_finalize(&self) -> bool {
        self.is_on_last_metric() && self.current_is_complete()
    }

    /// Complete the active phase, stamping any record with the current time
    pub fn finalize(&mut self) -> Finalization {
        self.finalize_at(Utc::now())
    }

    /// Complete the active phase.
    ///
    /// With a second rubric pending, the first phase's answers are frozen and
    /// the second phase opens with blank answers at its first metric.
    /// Otherwise the record is built and the session becomes `DONE`.
    pub fn finalize_at(&mut self, timestamp: DateTime<Utc>) -> Finalization {
        if !self.can_finalize() {
            return Finalization::NotReady;
        }
        let Some(index) = self.state.phase.rubric_index() else {
            return Finalization::NotReady;
        };

        if let (Some(next_phase), Some(next_rubric)) =
            (Phase::for_rubric(index + 1), self.plan.rubric(index + 1))
        {
            let completed = self.state.answers[index].rubric.clone();
            let next = next_rubric.name().to_string();
            self.state.answers.push(PhaseAnswers::blank(next_rubric));
            self.state.phase = next_phase;
            self.state.cursor = 0;
            debug!(completed = %completed, next = %next, "phase completed");
            return Finalization::PhaseTransition { completed, next };
        }

        let record = self.build_record(timestamp);
        self.state.phase = Phase::Done;
        debug!(phases = self.state.answers.len(), "session finalized");
        Finalization::Record(record)
    }

    /// Discard everything and return to `SETUP`
    pub fn reset(&mut self) {
        self.state = SessionState::default();
        debug!("session reset");
    }

    fn active_answers(&self) -> Option<&PhaseAnswers> {
        let index = self.state.phase.rubric_index()?;
        self.state.answers.get(index)
    }

    /// The metric at the cursor, provided it is `metric_id`
    fn focused_metric(&self, metric_id: &str) -> Result<&Metric> {
        let Some(current) = self.current_metric() else {
            bail_validation!("no metric is in focus (phase {})", self.state.phase);
        };
        if current.id != metric_id {
            bail_validation!(
                "metric '{}' is not in focus (current metric is '{}')",
                metric_id,
                current.id
            );
        }
        Ok(current)
    }

    fn focused_answer_mut(&mut self, metric_id: &str) -> Result<&mut Answer> {
        let index = self
            .state
            .phase
            .rubric_index()
            .ok_or_else(|| GradeError::validation("no phase is active"))?;
        self.state
            .answers
            .get_mut(index)
            .and_then(|phase| phase.answers.get_mut(metric_id))
            .ok_or_else(|| GradeError::validation(format!("no answer slot for '{}'", metric_id)))
    }

    fn build_record(&self, timestamp: DateTime<Utc>) -> EvaluationRecord {
        let sources: Vec<String> = self
            .plan
            .rubrics()
            .iter()
            .map(|rubric| rubric.source().to_string())
            .collect();

        let (protocol, protocols, results) = if self.plan.is_chained() {
            let phases: OrderedMap<AnswerMap> = self
                .state
                .answers
                .iter()
                .map(|phase| (phase.rubric.clone(), phase.answers.clone()))
                .collect();
            (None, Some(sources), Results::Phased(phases))
        } else {
            let answers = self
                .state
                .answers
                .first()
                .map(|phase| phase.answers.clone())
                .unwrap_or_default();
            (sources.into_iter().next(), None, Results::Single(answers))
        };

        let metadata = &self.state.metadata;
        EvaluationRecord::new(
            RecordMetadata {
                date: timestamp,
                protocol,
                protocols,
                grader_name: metadata.grader.clone(),
                document_name: metadata.document.clone(),
                tag: metadata.tag.clone(),
            },
            results,
        )
    }
}

fn validate_snapshot(plan: &SessionPlan, state: &SessionState) -> Result<()> {
    let expected_phases = match state.phase {
        Phase::Setup => {
            if !state.answers.is_empty() || state.cursor != 0 {
                return Err(GradeError::invalid_session("setup snapshot carries answers"));
            }
            return Ok(());
        }
        Phase::Done => plan.len(),
        active => match active.rubric_index() {
            Some(index) if index < plan.len() => index + 1,
            _ => {
                return Err(GradeError::invalid_session(format!(
                    "phase {} does not exist in a {}-rubric plan",
                    active,
                    plan.len()
                )))
            }
        },
    };

    if state.metadata.grader.trim().is_empty() || state.metadata.document.trim().is_empty() {
        return Err(GradeError::invalid_session("grader and document are required"));
    }

    if state.answers.len() != expected_phases {
        return Err(GradeError::invalid_session(format!(
            "expected {} answer maps, found {}",
            expected_phases,
            state.answers.len()
        )));
    }

    for (phase, rubric) in state.answers.iter().zip(plan.rubrics()) {
        if !phase.matches(rubric) {
            return Err(GradeError::invalid_session(format!(
                "answers for '{}' do not match the metrics of rubric '{}'",
                phase.rubric,
                rubric.name()
            )));
        }
        for (id, answer) in phase.answers.iter() {
            let permitted = match (answer.rating, rubric.metric(id)) {
                (None, _) => true,
                (Some(value), Some(metric)) => metric.permits(value),
                (Some(_), None) => false,
            };
            if !permitted {
                return Err(GradeError::invalid_session(format!(
                    "rating for '{}' is outside its scale",
                    id
                )));
            }
        }
    }

    let current_len = state
        .answers
        .last()
        .map(|phase| phase.answers.len())
        .unwrap_or(0);
    if state.cursor >= current_len {
        return Err(GradeError::invalid_session(format!(
            "cursor {} is past the last metric",
            state.cursor
        )));
    }

    Ok(())
}
