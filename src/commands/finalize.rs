//! `gradeflow finalize` command - complete the active rubric
//!
//! With a second rubric pending the session moves on to it. After the last
//! rubric the evaluation record is written to stdout, saved under the
//! workspace output directory and, with `--export`, copied to a chosen path.
//! Status lines go to stderr so stdout carries only the record.

use std::fs;
use std::path::Path;

use serde_json::json;
use tracing::{info, warn};

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{print_json_status, print_screen};
use crate::output_by_format_result;
use gradeflow_core::bail_validation;
use gradeflow_core::error::{GradeError, Result};
use gradeflow_core::export::deliver;
use gradeflow_core::session::{Finalization, GradingSession};

fn not_ready(session: &GradingSession) -> GradeError {
    match (session.current_metric(), session.progress()) {
        (Some(metric), Some((position, total))) if position < total => {
            GradeError::NotReady(format!(
                "metric {} of {} ('{}') is in focus; finish the rubric with `gradeflow next`",
                position, total, metric.id
            ))
        }
        (Some(metric), _) => GradeError::NotReady(format!(
            "'{}' needs a rating and evidence before finalizing",
            metric.id
        )),
        (None, _) => GradeError::NotReady("no metric is in focus".to_string()),
    }
}

/// Execute the finalize command
pub fn execute(ctx: &CommandContext, export: Option<&Path>) -> Result<()> {
    let (workspace, mut session) = ctx.load_session()?;
    if !session.phase().is_active() {
        bail_validation!("nothing to finalize (phase {})", session.phase());
    }

    let record = match session.finalize() {
        Finalization::NotReady => return Err(not_ready(&session)),
        Finalization::PhaseTransition { completed, next } => {
            workspace.save_session(&session)?;
            info!(completed = %completed, next = %next, "rubric completed");
            return output_by_format_result!(ctx.cli.format,
                json => print_json_status(
                    "ok",
                    None,
                    &[
                        ("phase", json!(session.phase().to_string())),
                        ("completed", json!(completed)),
                        ("next", json!(next)),
                    ],
                ),
                human => {
                    if !ctx.cli.quiet {
                        println!("Completed {}; now grading {}", completed, next);
                        println!();
                    }
                    print_screen(&session);
                }
            );
        }
        Finalization::Record(record) => record,
    };

    workspace.save_session(&session)?;
    let delivery = deliver(&record, &workspace.output_dir())?;
    println!("{}", delivery.payload);

    let exported = export.map(|path| {
        fs::write(path, format!("{}\n", delivery.payload))
            .map(|()| path)
            .map_err(|e| GradeError::io_operation("export record", path.display(), e))
    });
    if let Some(Ok(path)) = &exported {
        if !ctx.cli.quiet {
            eprintln!("Exported evaluation to {}", path.display());
        }
    }

    match (exported, delivery.saved) {
        (Some(Err(export_err)), saved) => {
            // The export failure is returned; the save outcome still gets reported
            match saved {
                Ok(saved) => report_saved(ctx, &saved),
                Err(save_err) => report_error(ctx, &save_err),
            }
            Err(export_err)
        }
        (_, Ok(saved)) => {
            report_saved(ctx, &saved);
            Ok(())
        }
        (_, Err(save_err)) => Err(save_err),
    }
}

fn report_saved(ctx: &CommandContext, saved: &Path) {
    info!(path = %saved.display(), "evaluation saved");
    if !ctx.cli.quiet {
        eprintln!("Saved evaluation to {}", saved.display());
    }
}

/// Report an error that is not the one the command returns
fn report_error(ctx: &CommandContext, err: &GradeError) {
    warn!(error = %err, "evaluation not saved");
    match ctx.cli.format {
        OutputFormat::Json => eprintln!("{}", err.to_json()),
        OutputFormat::Human => eprintln!("error: {}", err),
    }
}
