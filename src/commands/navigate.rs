//! `gradeflow next` and `gradeflow back` commands - move between metrics

use crate::commands::dispatch::CommandContext;
use crate::commands::format::{print_json, print_screen, screen_json};
use crate::output_by_format_result;
use gradeflow_core::bail_validation;
use gradeflow_core::error::{GradeError, Result};
use gradeflow_core::session::GradingSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Why `next` is refused for the metric in focus
fn advance_blocker(session: &GradingSession) -> GradeError {
    match (session.current_metric(), session.progress()) {
        (Some(metric), Some((position, total))) if position == total => GradeError::NotReady(
            format!("'{}' is the last metric; run `gradeflow finalize`", metric.id),
        ),
        (Some(metric), _) => GradeError::NotReady(format!(
            "'{}' needs a rating and evidence before moving on",
            metric.id
        )),
        (None, _) => {
            GradeError::validation(format!("no metric is in focus (phase {})", session.phase()))
        }
    }
}

/// Execute the next or back command
pub fn execute(ctx: &CommandContext, direction: Direction) -> Result<()> {
    let (workspace, mut session) = ctx.load_session()?;
    if !session.phase().is_active() {
        bail_validation!("no metric is in focus (phase {})", session.phase());
    }

    let moved = match direction {
        Direction::Forward => {
            if !session.advance() {
                return Err(advance_blocker(&session));
            }
            true
        }
        Direction::Backward => session.retreat(),
    };
    if moved {
        workspace.save_session(&session)?;
    }

    output_by_format_result!(ctx.cli.format,
        json => print_json(&screen_json(&session)),
        human => {
            if !moved && !ctx.cli.quiet {
                println!("Already at the first metric.");
                println!();
            }
            print_screen(&session);
        }
    )
}
