//! `gradeflow start` command - begin grading a document

use tracing::info;

use crate::commands::dispatch::CommandContext;
use crate::commands::format::{print_json, print_screen, screen_json};
use crate::output_by_format_result;
use gradeflow_core::error::Result;
use gradeflow_core::session::SessionMetadata;

/// Execute the start command
pub fn execute(
    ctx: &CommandContext,
    grader: &str,
    document: &str,
    tag: Option<String>,
) -> Result<()> {
    let (workspace, mut session) = ctx.load_session()?;

    session.start(SessionMetadata::new(grader, document, tag))?;
    workspace.save_session(&session)?;
    info!(
        grader = %session.metadata().grader,
        document = %session.metadata().document,
        "grading started"
    );

    output_by_format_result!(ctx.cli.format,
        json => print_json(&screen_json(&session)),
        human => {
            if !ctx.cli.quiet {
                let metadata = session.metadata();
                println!("Grading '{}' as {}", metadata.document, metadata.grader);
                println!();
            }
            print_screen(&session);
        }
    )
}
