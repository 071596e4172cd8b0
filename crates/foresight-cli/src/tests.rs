//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::path::PathBuf;

use foresight_core::{EvaluationInput, Evaluator, QualityScorer, RiskClassifier, Thresholds};
use tempfile::TempDir;

use crate::commands;

const SCENARIO: &str = r#"{
    "forecast": {
        "predictions": [100, 102, 101, 103, 105],
        "lower_bound": [90, 91, 90, 92, 94],
        "upper_bound": [110, 113, 112, 114, 116]
    },
    "metrics": {"mape": 6.8, "rmse": 4.1, "mae": 3.2, "r2": 0.91},
    "historical_tail": [98],
    "data_profile": {"completeness": 98, "consistency": 70, "validity": 55, "missing_count": 40},
    "baseline_revenue": 500
}"#;

fn scenario_input() -> EvaluationInput {
    EvaluationInput::from_json(SCENARIO).unwrap()
}

fn write_bundle(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

// ========== Shared Utility Tests ==========

#[test]
fn test_load_thresholds_defaults() {
    let thresholds = commands::load_thresholds(None).unwrap();
    assert_eq!(thresholds.sanity.trend_spike_multiplier, 3.0);
}

#[test]
fn test_load_thresholds_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let result = commands::load_thresholds(Some(&dir.path().join("nope.toml")));
    assert!(result.is_err());
}

#[test]
fn test_load_thresholds_override() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle(&dir, "thresholds.toml", "[risk]\nlow_below = 0.3\n");
    let thresholds = commands::load_thresholds(Some(&path)).unwrap();
    assert_eq!(thresholds.risk.low_below, 0.3);
}

#[test]
fn test_read_bundle_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle(&dir, "bad.json", "{ not json");
    let err = commands::read_bundle(&path).unwrap_err();
    assert!(err.to_string().contains("Invalid forecast bundle"));
}

#[test]
fn test_cmd_config_and_schema() {
    assert!(commands::cmd_config(&Thresholds::default()).is_ok());
    assert!(commands::cmd_schema().is_ok());
}

// ========== Check Command Tests ==========

#[test]
fn test_cmd_check() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle(&dir, "scenario.json", SCENARIO);
    let thresholds = Thresholds::default();

    assert!(commands::cmd_check(&path, &thresholds, false).is_ok());
    assert!(commands::cmd_check(&path, &thresholds, true).is_ok());
}

#[test]
fn test_cmd_check_empty_predictions_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle(&dir, "empty.json", r#"{"forecast": {"predictions": []}}"#);
    assert!(commands::cmd_check(&path, &Thresholds::default(), false).is_err());
}

#[test]
fn test_format_sanity_report() {
    let input = scenario_input();
    let report = Evaluator::new().evaluate(&input).unwrap();
    let text = commands::format_sanity_report(&report.sanity);

    assert!(text.contains("Historical Continuity"));
    assert!(text.contains("Confidence Bounds"));
    assert!(text.contains("Score: 100/100 (4 of 4 checks passed)"));
}

// ========== Quality Command Tests ==========

#[test]
fn test_cmd_quality_requires_profile() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle(&dir, "bare.json", r#"{"forecast": {"predictions": [1]}}"#);
    let err = commands::cmd_quality(&path, &Thresholds::default(), false).unwrap_err();
    assert!(err.to_string().contains("no data_profile"));
}

#[test]
fn test_format_scorecard() {
    let input = scenario_input();
    let card = QualityScorer::new().score(input.data_profile.as_ref().unwrap());
    let text = commands::format_scorecard(&card);

    // (98 + 70 + 55) / 3 = 74.3
    assert!(text.contains("74.3/100 (Fair)"));
    assert!(text.contains("Missing Values"));
    assert!(text.contains("Poor"));
}

// ========== Risk / Summary Command Tests ==========

#[test]
fn test_cmd_risk() {
    let thresholds = Thresholds::default();
    assert!(commands::cmd_risk(12.0, &thresholds, false).is_ok());
    assert!(commands::cmd_risk(-1.0, &thresholds, false).is_err());
    assert!(commands::cmd_risk(f64::NAN, &thresholds, true).is_err());
}

#[test]
fn test_format_risk() {
    let text = commands::format_risk(&RiskClassifier::new().assess(30.0));
    assert!(text.contains("Moderate (50%)"));
    assert!(text.contains("Maintain 20% safety stock for high-stakes decisions"));
}

#[test]
fn test_cmd_summarize_overrides() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle(&dir, "scenario.json", SCENARIO);
    let thresholds = Thresholds::default();

    assert!(commands::cmd_summarize(&path, None, None, &thresholds, false).is_ok());
    assert!(commands::cmd_summarize(&path, Some(1000.0), Some(2.0), &thresholds, true).is_ok());
}

#[test]
fn test_format_summary_uses_bundle_baseline() {
    let input = scenario_input();
    let report = Evaluator::new().evaluate(&input).unwrap();
    let text = commands::format_summary(&report.summary);

    // 511 vs baseline 500
    assert!(text.contains("grow 2.2%"));
    assert!(text.contains("Medium"));
}

// ========== Evaluate Command Tests ==========

#[test]
fn test_cmd_evaluate_batch() {
    let dir = TempDir::new().unwrap();
    let good = write_bundle(&dir, "good.json", SCENARIO);
    let empty = write_bundle(&dir, "empty.json", r#"{"forecast": {"predictions": []}}"#);
    let thresholds = Thresholds::default();

    assert!(commands::cmd_evaluate(&[good.clone(), empty.clone()], &thresholds, false).is_ok());
    assert!(commands::cmd_evaluate(&[good, empty.clone()], &thresholds, true).is_ok());
    assert!(commands::cmd_evaluate(&[empty], &thresholds, false).is_err());
}

#[test]
fn test_cmd_evaluate_malformed_file_does_not_stop_batch() {
    let dir = TempDir::new().unwrap();
    let good = write_bundle(&dir, "good.json", SCENARIO);
    let bad = write_bundle(&dir, "bad.json", "{ not json");
    let missing = dir.path().join("missing.json");
    let thresholds = Thresholds::default();

    assert!(commands::cmd_evaluate(&[good.clone(), bad.clone()], &thresholds, false).is_ok());
    assert!(commands::cmd_evaluate(&[bad.clone(), good.clone()], &thresholds, true).is_ok());
    assert!(commands::cmd_evaluate(&[missing, good], &thresholds, false).is_ok());
    assert!(commands::cmd_evaluate(&[bad], &thresholds, true).is_err());
}

#[test]
fn test_cmd_evaluate_unreadable_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(commands::cmd_evaluate(&[missing], &Thresholds::default(), false).is_err());
}
