//! Input contracts and shared output types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::numeric::{
    deserialize_lenient_count, deserialize_lenient_opt_seq, deserialize_lenient_seq,
    finite_values,
};

/// A forecast as produced by the forecasting backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastResult {
    /// Point predictions, one per horizon step
    #[serde(deserialize_with = "deserialize_lenient_seq")]
    #[schemars(with = "Vec<Option<f64>>")]
    pub predictions: Vec<Option<f64>>,
    /// Lower edge of the prediction interval per step
    #[serde(default, deserialize_with = "deserialize_lenient_opt_seq")]
    #[schemars(with = "Option<Vec<Option<f64>>>")]
    pub lower_bound: Option<Vec<Option<f64>>>,
    /// Upper edge of the prediction interval per step
    #[serde(default, deserialize_with = "deserialize_lenient_opt_seq")]
    #[schemars(with = "Option<Vec<Option<f64>>>")]
    pub upper_bound: Option<Vec<Option<f64>>>,
    /// Date labels passed through untouched (ISO strings, epoch numbers, nulls)
    #[serde(default)]
    pub dates: Option<Vec<Value>>,
}

impl ForecastResult {
    /// Forecast with clean predictions and no interval
    pub fn from_predictions(predictions: &[f64]) -> Self {
        Self {
            predictions: predictions.iter().copied().map(Some).collect(),
            ..Default::default()
        }
    }

    /// Attach a prediction interval
    pub fn with_bounds(mut self, lower: &[f64], upper: &[f64]) -> Self {
        self.lower_bound = Some(lower.iter().copied().map(Some).collect());
        self.upper_bound = Some(upper.iter().copied().map(Some).collect());
        self
    }

    /// Forecast horizon (number of predicted steps)
    pub fn horizon(&self) -> usize {
        self.predictions.len()
    }

    /// Both interval edges, if the backend supplied them
    pub fn bounds(&self) -> Option<(&[Option<f64>], &[Option<f64>])> {
        match (&self.lower_bound, &self.upper_bound) {
            (Some(lower), Some(upper)) => Some((lower.as_slice(), upper.as_slice())),
            _ => None,
        }
    }

    /// Valid predictions only
    pub fn finite_predictions(&self) -> Vec<f64> {
        finite_values(&self.predictions)
    }
}

/// Accuracy metrics of the trained model. `mape` is in percent (6.8 = 6.8%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricsSet {
    pub mape: f64,
    #[serde(default)]
    pub rmse: f64,
    #[serde(default)]
    pub mae: f64,
    #[serde(default)]
    pub r2: f64,
}

impl MetricsSet {
    pub fn with_mape(mape: f64) -> Self {
        Self {
            mape,
            rmse: 0.0,
            mae: 0.0,
            r2: 0.0,
        }
    }
}

/// Data-quality profile of the uploaded history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DataProfile {
    pub completeness: f64,
    pub consistency: f64,
    pub validity: f64,
    /// Producer-computed overall score; derived from the sub-scores if absent
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_count")]
    #[schemars(with = "Option<u64>")]
    pub missing_count: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_lenient_count")]
    #[schemars(with = "Option<u64>")]
    pub outlier_count: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_lenient_count")]
    #[schemars(with = "Option<u64>")]
    pub date_gaps: Option<u64>,
}

/// Outcome severity shared by checks and dashboard badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Warning,
    Error,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Severity::Success),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "info" => Ok(Severity::Info),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Identifier of a sanity check
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    NumericValidity,
    Continuity,
    TrendStability,
    ConfidenceBounds,
}

impl CheckId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckId::NumericValidity => "numeric_validity",
            CheckId::Continuity => "continuity",
            CheckId::TrendStability => "trend_stability",
            CheckId::ConfidenceBounds => "confidence_bounds",
        }
    }

    /// Display title for the check card
    pub fn title(&self) -> &'static str {
        match self {
            CheckId::NumericValidity => "Numeric Validity",
            CheckId::Continuity => "Historical Continuity",
            CheckId::TrendStability => "Trend Stability",
            CheckId::ConfidenceBounds => "Confidence Bounds",
        }
    }

    pub fn all() -> &'static [CheckId] {
        &[
            CheckId::NumericValidity,
            CheckId::Continuity,
            CheckId::TrendStability,
            CheckId::ConfidenceBounds,
        ]
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CheckId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "numeric_validity" => Ok(CheckId::NumericValidity),
            "continuity" => Ok(CheckId::Continuity),
            "trend_stability" => Ok(CheckId::TrendStability),
            "confidence_bounds" => Ok(CheckId::ConfidenceBounds),
            _ => Err(format!("Unknown check: {}", s)),
        }
    }
}

/// Result of a single sanity check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub id: CheckId,
    pub passed: bool,
    pub severity: Severity,
    pub message: String,
}

impl CheckResult {
    pub fn pass(id: CheckId, message: impl Into<String>) -> Self {
        Self {
            id,
            passed: true,
            severity: Severity::Success,
            message: message.into(),
        }
    }

    /// Passing result for a check that had nothing to judge
    pub fn skipped(id: CheckId, message: impl Into<String>) -> Self {
        Self {
            id,
            passed: true,
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn fail(id: CheckId, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id,
            passed: false,
            severity,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_id_round_trip_names() {
        for id in CheckId::all() {
            assert_eq!(CheckId::from_str(id.as_str()).unwrap(), *id);
        }
        assert!(CheckId::from_str("bogus").is_err());
    }

    #[test]
    fn test_forecast_lenient_deserialization() {
        let json = r#"{
            "predictions": [1, null, "NaN", "Infinity", "7"],
            "upper_bound": null,
            "dates": ["2026-01-01"]
        }"#;
        let forecast: ForecastResult = serde_json::from_str(json).unwrap();

        assert_eq!(forecast.horizon(), 5);
        assert_eq!(forecast.predictions[0], Some(1.0));
        assert_eq!(forecast.predictions[1], None);
        assert!(forecast.predictions[2].unwrap().is_nan());
        assert_eq!(forecast.predictions[3], Some(f64::INFINITY));
        assert_eq!(forecast.predictions[4], Some(7.0));
        assert!(forecast.lower_bound.is_none());
        assert!(forecast.upper_bound.is_none());
        assert!(forecast.bounds().is_none());
        assert_eq!(forecast.finite_predictions(), vec![1.0, 7.0]);
    }

    #[test]
    fn test_forecast_dates_pass_through() {
        let json = r#"{"predictions": [1, 2, 3], "dates": ["2026-01-01", null, 1767312000]}"#;
        let forecast: ForecastResult = serde_json::from_str(json).unwrap();

        let dates = forecast.dates.unwrap();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0], Value::from("2026-01-01"));
        assert!(dates[1].is_null());
        assert_eq!(dates[2], Value::from(1767312000u64));
    }

    #[test]
    fn test_profile_counts_lenient() {
        let json = r#"{
            "completeness": 98, "consistency": 90, "validity": 95,
            "missing_count": 4.0, "outlier_count": -1, "date_gaps": "2"
        }"#;
        let profile: DataProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.missing_count, Some(4));
        assert_eq!(profile.outlier_count, None);
        assert_eq!(profile.date_gaps, Some(2));

        let bare: DataProfile =
            serde_json::from_str(r#"{"completeness": 1, "consistency": 1, "validity": 1}"#)
                .unwrap();
        assert_eq!(bare.missing_count, None);
    }

    #[test]
    fn test_forecast_requires_predictions() {
        let result: std::result::Result<ForecastResult, _> =
            serde_json::from_str(r#"{"lower_bound": [1.0]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_metrics_defaults() {
        let metrics: MetricsSet = serde_json::from_str(r#"{"mape": 6.8}"#).unwrap();
        assert_eq!(metrics.mape, 6.8);
        assert_eq!(metrics.r2, 0.0);
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(
            serde_json::to_string(&Severity::Warning).unwrap(),
            "\"warning\""
        );
        assert_eq!(Severity::from_str("info").unwrap(), Severity::Info);
    }
}
