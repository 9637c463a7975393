//! CLI commands for gradeflow

pub mod answer;
pub mod dispatch;
pub mod finalize;
pub mod format;
pub mod init;
pub mod navigate;
pub mod reset;
pub mod rubric;
pub mod show;
pub mod start;
pub mod status;
