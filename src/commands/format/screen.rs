//! The metric screen shared by `show`, `start` and the navigation commands

use gradeflow_core::session::{GradingSession, Phase};
use serde_json::json;

const BLOCKED_REASON: &str = "needs a rating and evidence";

/// JSON view of the session's current screen
pub fn screen_json(session: &GradingSession) -> serde_json::Value {
    let phase = session.phase().to_string();
    let (Some(rubric), Some(metric), Some((position, total))) = (
        session.active_rubric(),
        session.current_metric(),
        session.progress(),
    ) else {
        return match session.phase() {
            Phase::Setup => json!({ "phase": phase }),
            _ => json!({ "phase": phase, "metadata": session.metadata() }),
        };
    };

    json!({
        "phase": phase,
        "metadata": session.metadata(),
        "rubric": rubric.name(),
        "source": rubric.source(),
        "position": position,
        "total": total,
        "metric": metric,
        "answer": session.answer(&metric.id),
        "can_advance": session.can_advance(),
        "can_finalize": session.can_finalize(),
    })
}

/// Human view of the session's current screen
pub fn render_screen(session: &GradingSession) -> String {
    let mut lines = Vec::new();

    let (Some(rubric), Some(metric), Some((position, total))) = (
        session.active_rubric(),
        session.current_metric(),
        session.progress(),
    ) else {
        match session.phase() {
            Phase::Done => {
                let metadata = session.metadata();
                lines.push(format!(
                    "Grading of '{}' by {} is complete.",
                    metadata.document, metadata.grader
                ));
                lines.push("Run `gradeflow reset` to grade another document.".to_string());
            }
            _ => {
                lines.push("No grading in progress.".to_string());
                lines.push(
                    "Run `gradeflow start --grader <NAME> --document <NAME>` to begin."
                        .to_string(),
                );
            }
        }
        return lines.join("\n");
    };

    let plan = session.plan();
    if plan.is_chained() {
        let index = session.phase().rubric_index().unwrap_or(0);
        lines.push(format!(
            "Rubric {} of {}: {} ({})",
            index + 1,
            plan.len(),
            rubric.name(),
            rubric.source()
        ));
    } else {
        lines.push(format!("Rubric: {} ({})", rubric.name(), rubric.source()));
    }

    lines.push(format!("Metric {} of {}: {}", position, total, metric.id));
    if !metric.definition.is_empty() {
        lines.push(metric.definition.clone());
    }
    lines.push(String::new());

    lines.push("Rating guidance:".to_string());
    for entry in &metric.scale {
        lines.push(format!("  {:>3}  {}", entry.value, entry.description));
    }
    lines.push(String::new());

    let answer = session.answer(&metric.id).cloned().unwrap_or_default();
    let rating = answer
        .rating
        .and_then(|value| metric.rating_label(value))
        .unwrap_or_else(|| "(not set)".to_string());
    lines.push(format!("Rating:   {}", rating));
    lines.push(format!("Evidence: {}", or_placeholder(&answer.evidence)));
    lines.push(format!("Notes:    {}", or_placeholder(&answer.notes)));
    lines.push(String::new());

    lines.push(if session.can_advance() {
        "Next: ready (`gradeflow next`)".to_string()
    } else if position == total && session.can_finalize() {
        "Finalize: ready (`gradeflow finalize`)".to_string()
    } else if position == total {
        format!("Finalize: blocked ({})", BLOCKED_REASON)
    } else {
        format!("Next: blocked ({})", BLOCKED_REASON)
    });

    lines.join("\n")
}

pub fn print_screen(session: &GradingSession) {
    println!("{}", render_screen(session));
}

fn or_placeholder(text: &str) -> &str {
    if text.trim().is_empty() {
        "(empty)"
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradeflow_core::rubric::table::{Cell, Row};
    use gradeflow_core::rubric::{ColumnSpec, Rubric};
    use gradeflow_core::session::{SessionMetadata, SessionPlan};
    use std::sync::Arc;

    fn row(metric: &str) -> Row {
        [
            ("Metric", metric),
            ("Metric Defination", "Is it clear"),
            ("Rating 2", "Fully"),
            ("Rating 1", "Partly"),
            ("Rating 0", "Not at all"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), Cell::from(v)))
        .collect()
    }

    fn session() -> GradingSession {
        let rubric = Rubric::from_rows(
            "3-point",
            "three.json",
            &[row("Clarity"), row("Fairness")],
            &ColumnSpec::default(),
        )
        .unwrap();
        GradingSession::new(SessionPlan::single(Arc::new(rubric)))
    }

    #[test]
    fn test_setup_screen() {
        let session = session();
        assert!(render_screen(&session).starts_with("No grading in progress."));
        assert_eq!(screen_json(&session), json!({ "phase": "SETUP" }));
    }

    #[test]
    fn test_active_screen_shows_guidance_and_gate() {
        let mut session = session();
        session
            .start(SessionMetadata::new("AB", "doc1", None))
            .unwrap();

        let text = render_screen(&session);
        assert!(text.contains("Rubric: 3-point (three.json)"));
        assert!(text.contains("Metric 1 of 2: Clarity"));
        assert!(text.contains("    2  Fully"));
        assert!(text.contains("Rating:   (not set)"));
        assert!(text.contains("Next: blocked"));

        session.set_rating("Clarity", Some(1)).unwrap();
        session.set_evidence("Clarity", "p. 3").unwrap();
        let text = render_screen(&session);
        assert!(text.contains("Rating:   1 - Partly"));
        assert!(text.contains("Next: ready"));

        let value = screen_json(&session);
        assert_eq!(value["position"], 1);
        assert_eq!(value["total"], 2);
        assert_eq!(value["answer"]["rating"], 1);
        assert_eq!(value["can_advance"], true);
    }

    #[test]
    fn test_last_metric_offers_finalize() {
        let mut session = session();
        session
            .start(SessionMetadata::new("AB", "doc1", None))
            .unwrap();
        session.set_rating("Clarity", Some(2)).unwrap();
        session.set_evidence("Clarity", "p. 1").unwrap();
        assert!(session.advance());

        assert!(render_screen(&session).contains("Finalize: blocked"));
        session.set_rating("Fairness", Some(0)).unwrap();
        session.set_evidence("Fairness", "p. 2").unwrap();
        assert!(render_screen(&session).contains("Finalize: ready"));
    }
}
