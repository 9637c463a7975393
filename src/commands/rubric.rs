//! `gradeflow rubric` command - list the configured rubrics

use crate::cli::Cli;
use crate::commands::format::print_json;
use crate::output_by_format_result;
use gradeflow_core::error::Result;
use gradeflow_core::workspace::Workspace;

/// Execute the rubric command
pub fn execute(cli: &Cli, workspace: &Workspace) -> Result<()> {
    let plan = workspace.plan()?;
    let rubrics: Vec<_> = plan.rubrics().iter().map(|r| r.as_ref()).collect();

    output_by_format_result!(cli.format,
        json => print_json(&rubrics),
        human => {
            for (index, rubric) in rubrics.iter().enumerate() {
                if index > 0 {
                    println!();
                }
                println!(
                    "{} ({}): {} metric{}",
                    rubric.name(),
                    rubric.source(),
                    rubric.len(),
                    if rubric.len() == 1 { "" } else { "s" }
                );
                for metric in rubric.metrics() {
                    let scale: Vec<String> =
                        metric.scale_values().iter().map(u32::to_string).collect();
                    println!("  {}  [{}]", metric.id, scale.join(" "));
                    if !cli.quiet && !metric.definition.is_empty() {
                        println!("      {}", metric.definition);
                    }
                }
            }
        }
    )
}
