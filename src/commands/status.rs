//! `gradeflow status` command - summarize the session
//!
//! One line per rubric of the plan: how many of its metrics have a complete
//! answer, and whether the phase is pending, active or done.

use serde::Serialize;

use crate::cli::Cli;
use crate::commands::format::print_json;
use crate::output_by_format_result;
use gradeflow_core::error::Result;
use gradeflow_core::session::{GradingSession, Phase, SessionMetadata};

#[derive(Debug, Serialize)]
struct PhaseSummary<'a> {
    rubric: &'a str,
    source: &'a str,
    state: &'static str,
    complete: usize,
    total: usize,
}

#[derive(Debug, Serialize)]
struct StatusSummary<'a> {
    phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a SessionMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<usize>,
    phases: Vec<PhaseSummary<'a>>,
}

fn summarize(session: &GradingSession) -> StatusSummary<'_> {
    let active = session.phase().rubric_index();
    let phases = session
        .plan()
        .rubrics()
        .iter()
        .enumerate()
        .map(|(index, rubric)| {
            let complete = session
                .phase_answers(index)
                .map(|phase| {
                    phase
                        .answers
                        .iter()
                        .filter(|(_, answer)| answer.is_complete())
                        .count()
                })
                .unwrap_or(0);
            let state = match (session.phase(), active) {
                (Phase::Done, _) => "done",
                (_, Some(current)) if index < current => "done",
                (_, Some(current)) if index == current => "active",
                _ => "pending",
            };
            PhaseSummary {
                rubric: rubric.name(),
                source: rubric.source(),
                state,
                complete,
                total: rubric.len(),
            }
        })
        .collect();

    StatusSummary {
        phase: session.phase().to_string(),
        metadata: (session.phase() != Phase::Setup).then(|| session.metadata()),
        position: session.progress().map(|(position, _)| position),
        phases,
    }
}

/// Execute the status command
pub fn execute(cli: &Cli, session: &GradingSession) -> Result<()> {
    let summary = summarize(session);

    output_by_format_result!(cli.format,
        json => print_json(&summary),
        human => {
            println!("Phase: {}", summary.phase);
            if let Some(metadata) = summary.metadata {
                println!("Grader: {}", metadata.grader);
                println!("Document: {}", metadata.document);
                if let Some(tag) = &metadata.tag {
                    println!("Tag: {}", tag);
                }
            }
            for phase in &summary.phases {
                let position = match (phase.state, summary.position) {
                    ("active", Some(position)) => format!(", at metric {}", position),
                    _ => String::new(),
                };
                println!(
                    "  {} ({}): {}/{} complete [{}{}]",
                    phase.rubric, phase.source, phase.complete, phase.total, phase.state, position
                );
            }
        }
    )
}
