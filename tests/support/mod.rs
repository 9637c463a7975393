use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Two metrics on a 0-5 scale, in the spreadsheet's column layout
#[allow(dead_code)]
pub const FIVE_POINT: &str = r#"[
  {"Metric": "Clarity", "Metric Defination": "The policy is understandable",
   "Rating 5 (max positive)": "Plain language throughout", "Rating 4": "Mostly plain",
   "Rating 3": "Mixed", "Rating 2": "Mostly unclear", "Rating 1": "Unclear",
   "Rating 0 (N/A or absent)": "Not addressed"},
  {"Metric": "Fairness", "Metric Defination": "Rules apply evenly",
   "Rating 5 (max positive)": "Even", "Rating 4": "Nearly even", "Rating 3": "Some gaps",
   "Rating 2": "Uneven", "Rating 1": "Arbitrary", "Rating 0 (N/A or absent)": "Not addressed"}
]"#;

/// One metric on a 0-2 scale
#[allow(dead_code)]
pub const TWO_POINT: &str = "\
- Metric: Disclosure
  Metric Definition: Students must disclose AI use
  Rating 2 (required): Required
  Rating 1 (encouraged): Encouraged
  Rating 0 (absent): Absent
";

/// Get a Command for gradeflow
pub fn gradeflow() -> Command {
    cargo_bin_cmd!("gradeflow")
}

/// Write a file below `dir`, creating parent directories
#[allow(dead_code)]
pub fn write_file(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Workspace configured with the five-point rubric only
#[allow(dead_code)]
pub fn setup_single() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "rubrics/five.json", FIVE_POINT);
    run_assert_success(&dir, &["init", "--rubric", "5-point=rubrics/five.json"]);
    dir
}

/// Workspace configured with the two-point then the five-point rubric
#[allow(dead_code)]
pub fn setup_chained() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "rubrics/two.yaml", TWO_POINT);
    write_file(dir.path(), "rubrics/five.json", FIVE_POINT);
    run_assert_success(
        &dir,
        &[
            "init",
            "--rubric",
            "2-point=rubrics/two.yaml",
            "--rubric",
            "5-point=rubrics/five.json",
        ],
    );
    dir
}

/// Run gradeflow command and return stdout as String
#[allow(dead_code)]
pub fn run_and_get_stdout(dir: &TempDir, args: &[&str]) -> String {
    let output = gradeflow().current_dir(dir.path()).args(args).output().unwrap();
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run gradeflow command and assert success
#[allow(dead_code)]
pub fn run_assert_success(dir: &TempDir, args: &[&str]) {
    gradeflow().current_dir(dir.path()).args(args).assert().success();
}

/// Rate the metric in focus and give it evidence
#[allow(dead_code)]
pub fn answer(dir: &TempDir, rating: &str, evidence: &str) {
    run_assert_success(dir, &["rate", rating]);
    run_assert_success(dir, &["evidence", evidence]);
}

/// Saved evaluation records, sorted by file name
#[allow(dead_code)]
pub fn saved_records(dir: &TempDir) -> Vec<std::path::PathBuf> {
    let out = dir.path().join("evaluations");
    let Ok(entries) = fs::read_dir(&out) else {
        return Vec::new();
    };
    let mut paths: Vec<_> = entries.map(|e| e.unwrap().path()).collect();
    paths.sort();
    paths
}
