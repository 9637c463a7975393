//! Integration tests for the gradeflow CLI: grading a document end to end

mod support;

use std::fs;

use predicates::prelude::*;
use support::{
    answer, gradeflow, run_and_get_stdout, run_assert_success, saved_records, setup_chained,
    setup_single,
};

fn start(dir: &tempfile::TempDir) {
    run_assert_success(
        dir,
        &["start", "--grader", "AB", "--document", "doc1", "--tag", "spring"],
    );
}

// ============================================================================
// start / show / status
// ============================================================================

#[test]
fn test_start_shows_first_metric() {
    let dir = setup_single();

    gradeflow()
        .current_dir(dir.path())
        .args(["start", "--grader", "AB", "--document", "doc1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Metric 1 of 2: Clarity"))
        .stdout(predicate::str::contains("5  Plain language throughout"));

    assert!(dir.path().join(".gradeflow/session.json").exists());
}

#[test]
fn test_start_requires_grader_and_document() {
    let dir = setup_single();

    gradeflow()
        .current_dir(dir.path())
        .args(["start", "--grader", "  ", "--document", "doc1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("grader name is required"));

    gradeflow()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase: SETUP"));
}

#[test]
fn test_start_twice_is_rejected() {
    let dir = setup_single();
    start(&dir);

    gradeflow()
        .current_dir(dir.path())
        .args(["start", "--grader", "CD", "--document", "doc2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already started"));
}

#[test]
fn test_show_json() {
    let dir = setup_single();
    start(&dir);

    let stdout = run_and_get_stdout(&dir, &["--format", "json", "show"]);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["phase"], "RUBRIC_A_ACTIVE");
    assert_eq!(value["metadata"]["tag"], "spring");
    assert_eq!(value["metric"]["id"], "Clarity");
    assert_eq!(value["answer"]["rating"], serde_json::Value::Null);
    assert_eq!(value["can_advance"], false);
}

#[test]
fn test_status_reports_progress() {
    let dir = setup_chained();
    start(&dir);

    gradeflow()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase: RUBRIC_A_ACTIVE"))
        .stdout(predicate::str::contains("Tag: spring"))
        .stdout(predicate::str::contains(
            "2-point (two.yaml): 0/1 complete [active, at metric 1]",
        ))
        .stdout(predicate::str::contains("5-point (five.json): 0/2 complete [pending]"));
}

// ============================================================================
// rate / evidence / notes
// ============================================================================

#[test]
fn test_rate_off_scale_is_rejected() {
    let dir = setup_single();
    start(&dir);

    gradeflow()
        .current_dir(dir.path())
        .args(["rate", "7"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not on the scale"));
}

#[test]
fn test_rate_and_clear() {
    let dir = setup_single();
    start(&dir);

    gradeflow()
        .current_dir(dir.path())
        .args(["rate", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Clarity: rated 4 - Mostly plain"));

    gradeflow()
        .current_dir(dir.path())
        .args(["rate", "none"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rating cleared"));
}

#[test]
fn test_answer_for_unfocused_metric_is_rejected() {
    let dir = setup_single();
    start(&dir);

    gradeflow()
        .current_dir(dir.path())
        .args(["evidence", "p. 4", "--metric", "Fairness"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not in focus"));
}

#[test]
fn test_evidence_from_stdin() {
    let dir = setup_single();
    start(&dir);

    gradeflow()
        .current_dir(dir.path())
        .args(["evidence", "-"])
        .write_stdin("Section 2, paragraph 3\n")
        .assert()
        .success();

    let stdout = run_and_get_stdout(&dir, &["--format", "json", "show"]);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["answer"]["evidence"], "Section 2, paragraph 3");
}

#[test]
fn test_mutation_before_start_is_rejected() {
    let dir = setup_single();

    gradeflow()
        .current_dir(dir.path())
        .args(["rate", "5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no metric is in focus"));
}

// ============================================================================
// next / back
// ============================================================================

#[test]
fn test_next_blocked_without_evidence() {
    let dir = setup_single();
    start(&dir);
    run_assert_success(&dir, &["rate", "4"]);

    gradeflow()
        .current_dir(dir.path())
        .arg("next")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not ready"));

    run_assert_success(&dir, &["evidence", "   "]);
    gradeflow()
        .current_dir(dir.path())
        .arg("next")
        .assert()
        .code(3);

    let stdout = run_and_get_stdout(&dir, &["--format", "json", "show"]);
    assert!(stdout.contains("\"Clarity\""));
}

#[test]
fn test_notes_do_not_gate_progress() {
    let dir = setup_single();
    start(&dir);
    run_assert_success(&dir, &["notes", "ask the committee"]);
    answer(&dir, "3", "p. 1");

    gradeflow()
        .current_dir(dir.path())
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("Metric 2 of 2: Fairness"));
}

#[test]
fn test_back_preserves_answers() {
    let dir = setup_single();
    start(&dir);
    answer(&dir, "3", "p. 1");
    run_assert_success(&dir, &["next"]);

    gradeflow()
        .current_dir(dir.path())
        .arg("back")
        .assert()
        .success()
        .stdout(predicate::str::contains("Metric 1 of 2: Clarity"))
        .stdout(predicate::str::contains("Rating:   3 - Mixed"))
        .stdout(predicate::str::contains("Evidence: p. 1"));

    gradeflow()
        .current_dir(dir.path())
        .arg("back")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already at the first metric."));
}

#[test]
fn test_next_on_last_metric_points_to_finalize() {
    let dir = setup_single();
    start(&dir);
    answer(&dir, "3", "p. 1");
    run_assert_success(&dir, &["next"]);
    answer(&dir, "5", "p. 2");

    gradeflow()
        .current_dir(dir.path())
        .arg("next")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("gradeflow finalize"));
}

// ============================================================================
// finalize / reset
// ============================================================================

#[test]
fn test_finalize_before_last_metric_is_not_ready() {
    let dir = setup_single();
    start(&dir);
    answer(&dir, "3", "p. 1");

    gradeflow()
        .current_dir(dir.path())
        .arg("finalize")
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty());
    assert!(saved_records(&dir).is_empty());
}

#[test]
fn test_single_rubric_finalize_emits_record() {
    let dir = setup_single();
    start(&dir);
    answer(&dir, "3", "p. 1");
    run_assert_success(&dir, &["next"]);
    run_assert_success(&dir, &["notes", "borderline"]);
    answer(&dir, "0", "not covered");

    let export = dir.path().join("download.json");
    let output = gradeflow()
        .current_dir(dir.path())
        .args(["finalize", "--export", export.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["metadata"]["protocol"], "five.json");
    assert_eq!(record["metadata"]["grader_name"], "AB");
    assert_eq!(record["metadata"]["document_name"], "doc1");
    assert_eq!(record["metadata"]["tag"], "spring");
    assert!(record["metadata"].get("protocols").is_none());
    assert_eq!(record["results"]["Clarity"]["rating"], 3);
    assert_eq!(record["results"]["Fairness"]["rating"], 0);
    assert_eq!(record["results"]["Fairness"]["notes"], "borderline");
    assert!(stdout.find("\"Clarity\"").unwrap() < stdout.find("\"Fairness\"").unwrap());

    let saved = saved_records(&dir);
    assert_eq!(saved.len(), 1);
    let name = saved[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("spring_AB_doc1_"));
    assert!(name.ends_with("Z.json"));

    let saved_value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&saved[0]).unwrap()).unwrap();
    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(saved_value, record);
    assert_eq!(exported, record);

    gradeflow()
        .current_dir(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("is complete"));
}

#[test]
fn test_chained_rubrics_merge_results() {
    let dir = setup_chained();
    start(&dir);
    answer(&dir, "2", "Syllabus states it");

    gradeflow()
        .current_dir(dir.path())
        .arg("finalize")
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed 2-point; now grading 5-point"))
        .stdout(predicate::str::contains("Rubric 2 of 2: 5-point"));
    assert!(saved_records(&dir).is_empty());

    // The first phase is frozen: back stays inside the second rubric
    run_assert_success(&dir, &["back"]);
    gradeflow()
        .current_dir(dir.path())
        .args(["rate", "2", "--metric", "Disclosure"])
        .assert()
        .code(2);

    answer(&dir, "4", "p. 3");
    run_assert_success(&dir, &["next"]);
    answer(&dir, "5", "p. 4");

    let stdout = run_and_get_stdout(&dir, &["finalize"]);
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        record["metadata"]["protocols"],
        serde_json::json!(["two.yaml", "five.json"])
    );
    assert!(record["metadata"].get("protocol").is_none());
    assert_eq!(record["results"]["2-point"]["Disclosure"]["rating"], 2);
    assert_eq!(record["results"]["5-point"]["Clarity"]["rating"], 4);
    assert_eq!(record["results"]["5-point"]["Fairness"]["evidence"], "p. 4");
    assert!(stdout.find("\"2-point\"").unwrap() < stdout.find("\"5-point\"").unwrap());
    assert_eq!(saved_records(&dir).len(), 1);
}

#[test]
fn test_finalize_reports_unwritable_output_dir() {
    let dir = setup_single();
    // A file where the output directory should be
    fs::write(dir.path().join("evaluations"), "not a directory").unwrap();
    start(&dir);
    answer(&dir, "3", "p. 1");
    run_assert_success(&dir, &["next"]);
    answer(&dir, "5", "p. 2");

    gradeflow()
        .current_dir(dir.path())
        .arg("finalize")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"grader_name\": \"AB\""))
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_finalize_export_failure_still_reports_save() {
    let dir = setup_single();
    start(&dir);
    answer(&dir, "3", "p. 1");
    run_assert_success(&dir, &["next"]);
    answer(&dir, "5", "p. 2");

    gradeflow()
        .current_dir(dir.path())
        .args(["finalize", "--export", "missing/dir/record.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"grader_name\": \"AB\""))
        .stderr(predicate::str::contains("export record"))
        .stderr(predicate::str::contains("Saved evaluation to"));

    assert_eq!(saved_records(&dir).len(), 1);
}

#[test]
fn test_finalize_reports_both_export_and_save_failures() {
    let dir = setup_single();
    fs::write(dir.path().join("evaluations"), "not a directory").unwrap();
    start(&dir);
    answer(&dir, "3", "p. 1");
    run_assert_success(&dir, &["next"]);
    answer(&dir, "5", "p. 2");

    gradeflow()
        .current_dir(dir.path())
        .args(["finalize", "--export", "missing/dir/record.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("export record"))
        .stderr(predicate::str::contains("evaluations"))
        .stderr(predicate::str::contains("Saved evaluation to").not());
}

#[test]
fn test_reset_returns_to_setup() {
    let dir = setup_single();
    start(&dir);
    answer(&dir, "3", "p. 1");

    gradeflow()
        .current_dir(dir.path())
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session reset"));
    assert!(!dir.path().join(".gradeflow/session.json").exists());

    gradeflow()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase: SETUP"));

    // Grading can start over with new metadata
    gradeflow()
        .current_dir(dir.path())
        .args(["start", "--grader", "CD", "--document", "doc2"])
        .assert()
        .success();
}

#[test]
fn test_corrupt_session_is_reported_and_resettable() {
    let dir = setup_single();
    fs::write(dir.path().join(".gradeflow/session.json"), "{broken").unwrap();

    gradeflow()
        .current_dir(dir.path())
        .args(["--format", "json", "show"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"invalid_session\""));

    run_assert_success(&dir, &["reset"]);
    run_assert_success(&dir, &["show"]);
}
