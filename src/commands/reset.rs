//! `gradeflow reset` command - discard the session

use crate::commands::dispatch::CommandContext;
use crate::commands::format::print_json_status;
use crate::output_by_format_result;
use gradeflow_core::error::Result;
use gradeflow_core::session::Phase;
use serde_json::json;

/// Execute the reset command
///
/// Works on a corrupt snapshot too: the saved session is removed without
/// being loaded.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let workspace = ctx.discover_workspace()?;
    workspace.clear_session()?;

    output_by_format_result!(ctx.cli.format,
        json => print_json_status(
            "ok",
            Some("Session reset"),
            &[("phase", json!(Phase::Setup.to_string()))],
        ),
        human => {
            if !ctx.cli.quiet {
                println!("Session reset. Run `gradeflow start` to grade another document.");
            }
        }
    )
}
