//! `gradeflow init` command - create or update the workspace
//!
//! Idempotent: a second run keeps the existing config unless rubrics or an
//! output directory are given, in which case those fields are replaced.

use std::path::Path;

use crate::cli::Cli;
use crate::output_by_format_result;
use gradeflow_core::config::RubricSource;
use gradeflow_core::error::Result;
use gradeflow_core::workspace::{InitOptions, Workspace};

/// Execute the init command
pub fn execute(
    cli: &Cli,
    root: &Path,
    rubrics: &[String],
    output_dir: Option<String>,
) -> Result<()> {
    let options = InitOptions {
        rubrics: rubrics.iter().map(|spec| RubricSource::parse(spec)).collect(),
        output_dir,
    };
    let workspace = Workspace::init(root, options)?;
    let config = workspace.config();

    output_by_format_result!(cli.format,
        json => {
            let output = serde_json::json!({
                "status": "ok",
                "workspace": workspace.root().display().to_string(),
                "rubrics": config.rubrics,
                "output_dir": workspace.output_dir().display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        },
        human => {
            println!("Initialized gradeflow workspace at {}", workspace.root().display());
            if !cli.quiet {
                if config.rubrics.is_empty() {
                    println!();
                    println!("No rubrics configured yet. Run `gradeflow init --rubric <PATH>`.");
                } else {
                    for source in &config.rubrics {
                        match &source.name {
                            Some(name) => println!("  rubric {} = {}", name, source.path),
                            None => println!("  rubric {}", source.path),
                        }
                    }
                    println!("  records saved to {}", workspace.output_dir().display());
                }
            }
        }
    )
}
