//! Which rubrics a session walks through

use std::sync::Arc;

use crate::bail_validation;
use crate::error::Result;
use crate::rubric::Rubric;

/// One rubric, or two rubrics graded back to back
#[derive(Debug, Clone)]
pub struct SessionPlan {
    rubrics: Vec<Arc<Rubric>>,
}

impl SessionPlan {
    pub fn single(rubric: Arc<Rubric>) -> Self {
        Self {
            rubrics: vec![rubric],
        }
    }

    /// Two phases; the names key the merged results so they must differ
    pub fn chained(first: Arc<Rubric>, second: Arc<Rubric>) -> Result<Self> {
        if first.name() == second.name() {
            bail_validation!(
                "chained rubrics need distinct names (both are '{}')",
                first.name()
            );
        }
        Ok(Self {
            rubrics: vec![first, second],
        })
    }

    /// Build from an ordered list of one or two rubrics
    pub fn from_rubrics(mut rubrics: Vec<Arc<Rubric>>) -> Result<Self> {
        match rubrics.len() {
            1 => Ok(Self::single(rubrics.remove(0))),
            2 => {
                let second = rubrics.remove(1);
                let first = rubrics.remove(0);
                Self::chained(first, second)
            }
            n => bail_validation!("a session grades one or two rubrics, got {}", n),
        }
    }

    pub fn rubrics(&self) -> &[Arc<Rubric>] {
        &self.rubrics
    }

    pub fn rubric(&self, index: usize) -> Option<&Arc<Rubric>> {
        self.rubrics.get(index)
    }

    pub fn is_chained(&self) -> bool {
        self.rubrics.len() > 1
    }

    pub fn len(&self) -> usize {
        self.rubrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rubrics.is_empty()
    }
}
