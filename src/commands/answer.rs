//! `gradeflow rate`, `evidence` and `notes` commands - record an answer
//!
//! Each targets the metric in focus. `--metric` names it explicitly and is
//! rejected when it names any other metric.

use std::io::{self, Read};

use serde_json::json;

use crate::commands::dispatch::CommandContext;
use crate::commands::format::print_json_status;
use crate::output_by_format_result;
use gradeflow_core::bail_usage;
use gradeflow_core::error::{GradeError, Result};
use gradeflow_core::rubric::normalize_metric_id;
use gradeflow_core::session::GradingSession;

/// Which free-text field of an answer to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Evidence,
    Notes,
}

impl TextField {
    fn label(self) -> &'static str {
        match self {
            TextField::Evidence => "evidence",
            TextField::Notes => "notes",
        }
    }
}

/// Parse a rating argument: a scale value, or `none` to clear
pub fn parse_rating(value: &str) -> Result<Option<u32>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match value.parse::<u32>() {
        Ok(rating) => Ok(Some(rating)),
        Err(_) => bail_usage!(format!(
            "invalid rating '{}': expected a scale value or `none`",
            value
        )),
    }
}

/// The metric a command writes to: `--metric` when given, else the one in focus
fn target_metric(session: &GradingSession, metric: Option<&str>) -> Result<String> {
    match metric {
        Some(id) => Ok(normalize_metric_id(id)),
        None => session
            .current_metric()
            .map(|metric| metric.id.clone())
            .ok_or_else(|| {
                GradeError::validation(format!(
                    "no metric is in focus (phase {})",
                    session.phase()
                ))
            }),
    }
}

/// Resolve a text argument, reading stdin for `-`
fn read_text(text: &str) -> Result<String> {
    if text != "-" {
        return Ok(text.to_string());
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim_end_matches(['\n', '\r']).to_string())
}

/// Execute the rate command
pub fn execute_rate(ctx: &CommandContext, value: &str, metric: Option<&str>) -> Result<()> {
    let rating = parse_rating(value)?;
    let (workspace, mut session) = ctx.load_session()?;
    let metric_id = target_metric(&session, metric)?;

    session.set_rating(&metric_id, rating)?;
    workspace.save_session(&session)?;

    let label = match (rating, session.current_metric()) {
        (Some(value), Some(metric)) => metric.rating_label(value),
        _ => None,
    };

    output_by_format_result!(ctx.cli.format,
        json => print_json_status(
            "ok",
            None,
            &[("metric", json!(metric_id)), ("rating", json!(rating))],
        ),
        human => {
            if !ctx.cli.quiet {
                match label {
                    Some(label) => println!("{}: rated {}", metric_id, label),
                    None => println!("{}: rating cleared", metric_id),
                }
            }
        }
    )
}

/// Execute the evidence or notes command
pub fn execute_text(
    ctx: &CommandContext,
    field: TextField,
    text: &str,
    metric: Option<&str>,
) -> Result<()> {
    let text = read_text(text)?;
    let (workspace, mut session) = ctx.load_session()?;
    let metric_id = target_metric(&session, metric)?;

    match field {
        TextField::Evidence => session.set_evidence(&metric_id, text.as_str())?,
        TextField::Notes => session.set_notes(&metric_id, text.as_str())?,
    }
    workspace.save_session(&session)?;

    output_by_format_result!(ctx.cli.format,
        json => print_json_status(
            "ok",
            None,
            &[("metric", json!(metric_id)), (field.label(), json!(text))],
        ),
        human => {
            if !ctx.cli.quiet {
                let verb = if text.trim().is_empty() { "cleared" } else { "recorded" };
                println!("{}: {} {}", metric_id, field.label(), verb);
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("4").unwrap(), Some(4));
        assert_eq!(parse_rating(" 0 ").unwrap(), Some(0));
        assert_eq!(parse_rating("none").unwrap(), None);
        assert_eq!(parse_rating("NONE").unwrap(), None);
    }

    #[test]
    fn test_parse_rating_rejects_garbage() {
        for bad in ["five", "-1", "2.5", ""] {
            assert!(matches!(
                parse_rating(bad).unwrap_err(),
                GradeError::UsageError(_)
            ));
        }
    }

    #[test]
    fn test_read_text_passes_literal_through() {
        assert_eq!(read_text("p. 12\n").unwrap(), "p. 12\n");
    }
}
