//! Gradeflow Core Library
//!
//! Rubric loading, the grading session state machine and evaluation records
//! for the gradeflow rubric grading workflow.

pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod ordered;
pub mod record;
pub mod rubric;
pub mod session;
pub mod workspace;
