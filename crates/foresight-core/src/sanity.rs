//! Forecast sanity checks
//!
//! Four independent checks run against every forecast:
//!
//! - **Numeric validity** - no missing, NaN or infinite predictions
//! - **Continuity** - the first step does not jump away from the last actual
//! - **Trend stability** - no single step dwarfs the average step
//! - **Confidence bounds** - every prediction sits inside a non-empty interval
//!
//! Malformed data is reported as a failing check, never as an error. A check
//! that has nothing to judge (no history, no bounds) passes with `info`
//! severity so the report always carries all four results.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::numeric::{
    invalid_count, is_invalid_number, max_absolute_step_delta, mean_absolute_step_delta,
};
use crate::thresholds::SanityThresholds;
use crate::types::{CheckId, CheckResult, ForecastResult, Severity};

/// Data handed to each check
pub struct CheckInput<'a> {
    pub forecast: &'a ForecastResult,
    /// Most recent actuals, oldest first
    pub historical_tail: Option<&'a [Option<f64>]>,
}

/// A single sanity check
pub trait SanityCheck: Send + Sync {
    fn id(&self) -> CheckId;

    /// Evaluate the forecast. Must not panic on malformed data.
    fn evaluate(&self, input: &CheckInput<'_>) -> CheckResult;
}

/// Fails when any prediction is missing, NaN or infinite
pub struct NumericValidityCheck;

impl SanityCheck for NumericValidityCheck {
    fn id(&self) -> CheckId {
        CheckId::NumericValidity
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> CheckResult {
        let invalid = invalid_count(&input.forecast.predictions);
        if invalid == 0 {
            CheckResult::pass(self.id(), "All predictions are valid finite numbers")
        } else {
            CheckResult::fail(
                self.id(),
                Severity::Error,
                format!(
                    "Found {} invalid or infinite value(s) in {} predictions",
                    invalid,
                    input.forecast.horizon()
                ),
            )
        }
    }
}

fn valid(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !is_invalid_number(Some(*v)))
}

/// Flags a first forecast step that jumps too far from the last actual
pub struct ContinuityCheck {
    jump_ratio: f64,
    zero_tolerance: f64,
}

impl ContinuityCheck {
    pub fn new(thresholds: &SanityThresholds) -> Self {
        Self {
            jump_ratio: thresholds.continuity_jump_ratio,
            zero_tolerance: thresholds.zero_tolerance,
        }
    }
}

impl SanityCheck for ContinuityCheck {
    fn id(&self) -> CheckId {
        CheckId::Continuity
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> CheckResult {
        let Some(&last) = input.historical_tail.and_then(|tail| tail.last()) else {
            return CheckResult::skipped(self.id(), "No historical data to compare against");
        };
        let first = input.forecast.predictions.first().copied().flatten();

        let (Some(last), Some(first)) = (valid(last), valid(first)) else {
            return CheckResult::fail(
                self.id(),
                Severity::Warning,
                "Cannot compare: last historical value or first forecast is not a valid number",
            );
        };

        let gap = (first - last).abs();
        if !gap.is_finite() {
            return CheckResult::fail(
                self.id(),
                Severity::Warning,
                "Jump from last actual to first forecast is too large to compare",
            );
        }
        let threshold = last.abs() * self.jump_ratio;

        // A zero baseline has no meaningful ratio; only an unchanged start is continuous
        let continuous = if threshold <= self.zero_tolerance {
            gap <= self.zero_tolerance
        } else {
            gap < threshold
        };

        if continuous {
            CheckResult::pass(
                self.id(),
                format!(
                    "Smooth transition from last actual {:.2} to first forecast {:.2}",
                    last, first
                ),
            )
        } else {
            CheckResult::fail(
                self.id(),
                Severity::Warning,
                format!(
                    "Forecast starts at {:.2}, a jump of {:.2} from last actual {:.2}",
                    first, gap, last
                ),
            )
        }
    }
}

/// Flags a forecast where one step is far larger than the typical step
pub struct TrendStabilityCheck {
    spike_multiplier: f64,
    zero_tolerance: f64,
}

impl TrendStabilityCheck {
    pub fn new(thresholds: &SanityThresholds) -> Self {
        Self {
            spike_multiplier: thresholds.trend_spike_multiplier,
            zero_tolerance: thresholds.zero_tolerance,
        }
    }
}

impl SanityCheck for TrendStabilityCheck {
    fn id(&self) -> CheckId {
        CheckId::TrendStability
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> CheckResult {
        // Invalid points are numeric_validity's concern
        let values = input.forecast.finite_predictions();
        if values.len() < 2 {
            return CheckResult::pass(self.id(), "Too few points to show a trend change");
        }

        let avg_diff = mean_absolute_step_delta(&values);
        let max_diff = max_absolute_step_delta(&values);

        if !(avg_diff.is_finite() && max_diff.is_finite()) {
            return CheckResult::fail(
                self.id(),
                Severity::Warning,
                "Step sizes are too large to compare",
            );
        }

        // Flat series: every step is zero
        let stable = if avg_diff <= self.zero_tolerance {
            true
        } else {
            max_diff < avg_diff * self.spike_multiplier
        };

        let message = format!(
            "Largest step {:.2} vs average step {:.2}",
            max_diff, avg_diff
        );
        if stable {
            CheckResult::pass(self.id(), message)
        } else {
            CheckResult::fail(self.id(), Severity::Warning, message)
        }
    }
}

/// Requires every prediction to sit inside a non-empty interval
pub struct ConfidenceBoundsCheck;

impl ConfidenceBoundsCheck {
    fn index_is_consistent(
        prediction: Option<f64>,
        lower: Option<f64>,
        upper: Option<f64>,
    ) -> bool {
        match (prediction, lower, upper) {
            (Some(p), Some(lo), Some(hi)) => lo <= p && p <= hi && hi > lo,
            _ => false,
        }
    }
}

impl SanityCheck for ConfidenceBoundsCheck {
    fn id(&self) -> CheckId {
        CheckId::ConfidenceBounds
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> CheckResult {
        let Some((lower, upper)) = input.forecast.bounds() else {
            return CheckResult::skipped(self.id(), "Confidence bounds not available to verify");
        };

        let violations: Vec<usize> = input
            .forecast
            .predictions
            .iter()
            .enumerate()
            .filter(|(i, prediction)| {
                let lo = lower.get(*i).copied().flatten();
                let hi = upper.get(*i).copied().flatten();
                !Self::index_is_consistent(**prediction, lo, hi)
            })
            .map(|(i, _)| i)
            .collect();

        match violations.first() {
            None => CheckResult::pass(
                self.id(),
                "All predictions fall within valid confidence bounds",
            ),
            Some(first) => CheckResult::fail(
                self.id(),
                Severity::Error,
                format!(
                    "{} of {} steps have invalid confidence bounds (first at step {})",
                    violations.len(),
                    input.forecast.horizon(),
                    first + 1
                ),
            ),
        }
    }
}

/// Outcome of all sanity checks for one forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanityReport {
    pub checks: BTreeMap<CheckId, CheckResult>,
    /// `round(100 * passed / total)`
    pub overall_score: u32,
    pub passed_count: usize,
    pub total_checks: usize,
}

impl SanityReport {
    fn from_results(results: Vec<CheckResult>) -> Self {
        let total_checks = results.len();
        let passed_count = results.iter().filter(|r| r.passed).count();
        let overall_score = if total_checks == 0 {
            0
        } else {
            (100.0 * passed_count as f64 / total_checks as f64).round() as u32
        };

        Self {
            checks: results.into_iter().map(|r| (r.id, r)).collect(),
            overall_score,
            passed_count,
            total_checks,
        }
    }

    pub fn get(&self, id: CheckId) -> Option<&CheckResult> {
        self.checks.get(&id)
    }

    pub fn all_passed(&self) -> bool {
        self.passed_count == self.total_checks
    }

    /// Failed checks in check order
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.values().filter(|r| !r.passed)
    }
}

/// Runs the four sanity checks against a forecast
pub struct SanityCheckRunner {
    checks: Vec<Box<dyn SanityCheck>>,
}

impl Default for SanityCheckRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SanityCheckRunner {
    /// Create a runner with the built-in thresholds
    pub fn new() -> Self {
        Self::with_thresholds(&SanityThresholds::default())
    }

    pub fn with_thresholds(thresholds: &SanityThresholds) -> Self {
        Self {
            checks: vec![
                Box::new(NumericValidityCheck),
                Box::new(ContinuityCheck::new(thresholds)),
                Box::new(TrendStabilityCheck::new(thresholds)),
                Box::new(ConfidenceBoundsCheck),
            ],
        }
    }

    /// Check ids in evaluation order
    pub fn check_ids(&self) -> Vec<CheckId> {
        self.checks.iter().map(|c| c.id()).collect()
    }

    /// Run every check. Errors only when there are no predictions at all.
    pub fn run(
        &self,
        forecast: &ForecastResult,
        historical_tail: Option<&[Option<f64>]>,
    ) -> Result<SanityReport> {
        if forecast.predictions.is_empty() {
            return Err(Error::InvalidInput(
                "forecast has no predictions to evaluate".to_string(),
            ));
        }

        let input = CheckInput {
            forecast,
            historical_tail,
        };

        let results: Vec<CheckResult> = self
            .checks
            .iter()
            .map(|check| {
                let result = check.evaluate(&input);
                tracing::debug!(
                    check = check.id().as_str(),
                    passed = result.passed,
                    severity = result.severity.as_str(),
                    "Sanity check complete"
                );
                result
            })
            .collect();

        Ok(SanityReport::from_results(results))
    }
}
