//! `gradeflow show` command - display the metric in focus

use crate::cli::Cli;
use crate::commands::format::{print_json, print_screen, screen_json};
use crate::output_by_format_result;
use gradeflow_core::error::Result;
use gradeflow_core::session::GradingSession;

/// Execute the show command
pub fn execute(cli: &Cli, session: &GradingSession) -> Result<()> {
    output_by_format_result!(cli.format,
        json => print_json(&screen_json(session)),
        human => {
            print_screen(session);
        }
    )
}
