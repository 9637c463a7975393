//! Main CLI commands enum and argument structures

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Top-level gradeflow commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or update the workspace in the current directory
    Init(InitArgs),

    /// List the configured rubrics with their metrics and scales
    Rubric,

    /// Begin grading a document
    Start(StartArgs),

    /// Show the metric in focus
    Show,

    /// Summarize the session's progress
    Status,

    /// Set or clear the rating of a metric
    Rate(RateArgs),

    /// Set the evidence of a metric
    Evidence(TextArgs),

    /// Set the notes of a metric
    Notes(TextArgs),

    /// Move to the next metric (requires a rating and evidence)
    Next,

    /// Move to the previous metric
    Back,

    /// Complete the active rubric; after the last one, emit the evaluation record
    Finalize(FinalizeArgs),

    /// Discard the session and return to setup
    Reset,
}

/// Arguments for the init command.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Rubric file as `PATH` or `NAME=PATH`; repeat for a two-rubric run
    #[arg(long = "rubric", value_name = "[NAME=]PATH")]
    pub rubrics: Vec<String>,

    /// Directory for saved evaluation records
    #[arg(long)]
    pub output_dir: Option<String>,
}

/// Arguments for the start command.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Evaluator name or initials
    #[arg(long)]
    pub grader: String,

    /// Name of the document being graded
    #[arg(long)]
    pub document: String,

    /// Optional free-form tag, prefixed to the record's file name
    #[arg(long)]
    pub tag: Option<String>,
}

/// Arguments for the rate command.
#[derive(Args, Debug)]
pub struct RateArgs {
    /// A value from the metric's scale, or `none` to clear the rating
    pub value: String,

    /// Metric id (defaults to the metric in focus)
    #[arg(long)]
    pub metric: Option<String>,
}

/// Arguments for the evidence and notes commands.
#[derive(Args, Debug)]
pub struct TextArgs {
    /// The text, or `-` to read it from stdin
    pub text: String,

    /// Metric id (defaults to the metric in focus)
    #[arg(long)]
    pub metric: Option<String>,
}

/// Arguments for the finalize command.
#[derive(Args, Debug)]
pub struct FinalizeArgs {
    /// Also write the record to this path
    #[arg(long)]
    pub export: Option<PathBuf>,
}
