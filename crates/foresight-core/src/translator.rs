//! Business Translator
//!
//! Turns forecast numbers into executive prose: how accurate the model is,
//! what revenue the forecast implies, and how much uncertainty surrounds it.
//! Each narrative can be generated on its own and degrades to an explicit
//! "insufficient data" narrative instead of failing.

use serde::Serialize;
use std::fmt;

use crate::numeric::is_invalid_number;
use crate::risk::{AccuracyRating, RiskClassifier};
use crate::thresholds::{RevenueSettings, RiskThresholds, Thresholds};
use crate::types::{ForecastResult, MetricsSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyNarrative {
    pub title: String,
    pub description: String,
    /// `max(0, 100 - mape)`
    pub percentage: f64,
    pub rating: AccuracyRating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueNarrative {
    pub projected_revenue: f64,
    pub formatted_revenue: String,
    pub narrative: String,
    /// Change vs baseline, only when a positive baseline was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
}

/// Forecast uncertainty level derived from interval width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskNarrative {
    pub level: RiskLevel,
    pub narrative: String,
    pub variance_metric: String,
    /// Mean of `(upper - lower) / prediction` over positive predictions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_spread: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveSummary {
    pub headline: String,
    pub detailed_summary: String,
    pub accuracy: AccuracyNarrative,
    pub revenue: RevenueNarrative,
    pub risk: RiskNarrative,
}

/// Everything the translator needs for a full summary
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    pub forecast: &'a ForecastResult,
    pub metrics: Option<&'a MetricsSet>,
    pub baseline_revenue: Option<f64>,
    /// Price per predicted unit; the configured default when `None`
    pub avg_price: Option<f64>,
}

impl<'a> SummaryInput<'a> {
    pub fn new(forecast: &'a ForecastResult) -> Self {
        Self {
            forecast,
            metrics: None,
            baseline_revenue: None,
            avg_price: None,
        }
    }

    pub fn with_metrics(mut self, metrics: &'a MetricsSet) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_baseline(mut self, baseline_revenue: f64) -> Self {
        self.baseline_revenue = Some(baseline_revenue);
        self
    }

    pub fn with_avg_price(mut self, avg_price: f64) -> Self {
        self.avg_price = Some(avg_price);
        self
    }
}

/// Builds executive narratives from forecast output
#[derive(Debug, Clone, Default)]
pub struct BusinessTranslator {
    classifier: RiskClassifier,
    risk: RiskThresholds,
    revenue: RevenueSettings,
}

impl BusinessTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: &Thresholds) -> Self {
        Self {
            classifier: RiskClassifier::with_thresholds(
                thresholds.confidence,
                thresholds.accuracy,
            ),
            risk: thresholds.risk,
            revenue: thresholds.revenue,
        }
    }

    pub fn accuracy(&self, metrics: Option<&MetricsSet>) -> AccuracyNarrative {
        let Some(mape) = metrics.map(|m| m.mape).filter(|m| m.is_finite()) else {
            return AccuracyNarrative {
                title: "Accuracy Not Available".to_string(),
                description: "Insufficient data: no accuracy metrics were provided for this forecast."
                    .to_string(),
                percentage: 0.0,
                rating: AccuracyRating::Unknown,
            };
        };

        let rating = self.classifier.accuracy_rating(mape);
        let (title, description) = match rating {
            AccuracyRating::Excellent => (
                "Exceptional Forecast Accuracy",
                format!(
                    "Predictions land within {:.1}% of actual sales on average, precise enough for automated decisions.",
                    mape
                ),
            ),
            AccuracyRating::Good => (
                "Strong Forecast Accuracy",
                format!(
                    "Predictions land within {:.1}% of actual sales on average, reliable for planning and budgeting.",
                    mape
                ),
            ),
            AccuracyRating::Fair => (
                "Moderate Forecast Accuracy",
                format!(
                    "Predictions are off by {:.1}% on average, suitable for directional planning with review.",
                    mape
                ),
            ),
            AccuracyRating::Poor | AccuracyRating::Unknown => (
                "Limited Forecast Accuracy",
                format!(
                    "Predictions deviate by {:.1}% on average; use them for broad trends only.",
                    mape
                ),
            ),
        };

        AccuracyNarrative {
            title: title.to_string(),
            description,
            percentage: (100.0 - mape).max(0.0),
            rating,
        }
    }

    pub fn revenue(
        &self,
        forecast: &ForecastResult,
        baseline_revenue: Option<f64>,
        avg_price: Option<f64>,
    ) -> RevenueNarrative {
        let price = avg_price
            .filter(|p| p.is_finite())
            .unwrap_or(self.revenue.average_unit_price);
        let units = forecast.finite_predictions();
        let projected = units.iter().sum::<f64>() * price;

        if units.is_empty() || !projected.is_finite() {
            return RevenueNarrative {
                projected_revenue: 0.0,
                formatted_revenue: format_currency(0.0),
                narrative: "No forecast data available to project revenue.".to_string(),
                percent_change: None,
            };
        }

        let formatted = format_currency(projected);
        let baseline = baseline_revenue.filter(|b| b.is_finite() && *b > 0.0);

        let Some(baseline) = baseline else {
            let periods = forecast.horizon();
            return RevenueNarrative {
                projected_revenue: projected,
                formatted_revenue: formatted.clone(),
                narrative: format!(
                    "The forecast projects {} in pipeline revenue over the next {} {}.",
                    formatted,
                    periods,
                    if periods == 1 { "period" } else { "periods" }
                ),
                percent_change: None,
            };
        };

        let percent_change = (projected - baseline) / baseline * 100.0;
        let baseline_formatted = format_currency(baseline);
        let narrative = if percent_change.abs() < self.revenue.flat_change_pct {
            format!(
                "Revenue is projected to hold steady at {}, in line with the baseline of {}.",
                formatted, baseline_formatted
            )
        } else if percent_change > 0.0 {
            format!(
                "Revenue is projected to grow {:.1}% to {}, up from a baseline of {}.",
                percent_change, formatted, baseline_formatted
            )
        } else {
            format!(
                "Revenue is projected to decline {:.1}% to {}, down from a baseline of {}.",
                percent_change.abs(),
                formatted,
                baseline_formatted
            )
        };

        RevenueNarrative {
            projected_revenue: projected,
            formatted_revenue: formatted,
            narrative,
            percent_change: Some(percent_change),
        }
    }

    pub fn risk(&self, forecast: &ForecastResult) -> RiskNarrative {
        let Some((lower, upper)) = forecast.bounds() else {
            return unknown_risk(
                "Insufficient data to assess uncertainty: confidence bounds were not provided.",
            );
        };

        let spreads: Vec<f64> = forecast
            .predictions
            .iter()
            .enumerate()
            .filter_map(|(i, prediction)| {
                let p = prediction.filter(|p| !is_invalid_number(Some(*p)) && *p > 0.0)?;
                let lo = lower.get(i).copied().flatten()?;
                let hi = upper.get(i).copied().flatten()?;
                // Inverted or empty intervals say nothing about width
                if hi <= lo {
                    return None;
                }
                let spread = (hi - lo) / p;
                spread.is_finite().then_some(spread)
            })
            .collect();

        if spreads.is_empty() {
            return unknown_risk(
                "Insufficient data to assess uncertainty: no positive predictions with valid bounds.",
            );
        }

        let average = spreads.iter().sum::<f64>() / spreads.len() as f64;
        let (level, narrative) = if average < self.risk.low_below {
            (
                RiskLevel::Low,
                "Forecast is stable with tight confidence intervals, supporting a lean supply chain.",
            )
        } else if average > self.risk.high_above {
            (
                RiskLevel::High,
                "High volatility expected; hold buffer stock to absorb demand swings.",
            )
        } else {
            (
                RiskLevel::Medium,
                "Moderate uncertainty in certain periods; review safety stock for peak weeks.",
            )
        };

        RiskNarrative {
            level,
            narrative: narrative.to_string(),
            variance_metric: format!("{:.1}%", average * 100.0),
            average_spread: Some(average),
        }
    }

    pub fn summarize(&self, input: &SummaryInput<'_>) -> ExecutiveSummary {
        let accuracy = self.accuracy(input.metrics);
        let revenue = self.revenue(input.forecast, input.baseline_revenue, input.avg_price);
        let risk = self.risk(input.forecast);

        let headline = format!(
            "Projected revenue of {} with {} risk",
            revenue.formatted_revenue, risk.level
        );

        let accuracy_clause = match accuracy.rating {
            AccuracyRating::Unknown => "Model accuracy could not be assessed".to_string(),
            rating => format!(
                "The model delivers {} accuracy ({:.1}%)",
                rating.as_str().to_lowercase(),
                accuracy.percentage
            ),
        };
        let detailed_summary = format!(
            "{}, and {} Overall risk is {}: {}",
            accuracy_clause,
            lowercase_first(&revenue.narrative),
            risk.level.as_str().to_lowercase(),
            risk.narrative.to_lowercase()
        );

        tracing::debug!(
            rating = accuracy.rating.as_str(),
            risk = risk.level.as_str(),
            projected = revenue.projected_revenue,
            "Executive summary composed"
        );

        ExecutiveSummary {
            headline,
            detailed_summary,
            accuracy,
            revenue,
            risk,
        }
    }
}

fn unknown_risk(narrative: &str) -> RiskNarrative {
    RiskNarrative {
        level: RiskLevel::Unknown,
        narrative: narrative.to_string(),
        variance_metric: "N/A".to_string(),
        average_spread: None,
    }
}

/// Compact currency: `$1.2M`, `$45.0K`, `$950`
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "N/A".to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    if abs >= 1e9 {
        format!("{}${:.1}B", sign, abs / 1e9)
    } else if abs >= 1e6 {
        format!("{}${:.1}M", sign, abs / 1e6)
    } else if abs >= 1e3 {
        format!("{}${:.1}K", sign, abs / 1e3)
    } else {
        format!("{}${:.0}", sign, abs)
    }
}

/// Lower-case the first character so a sentence can be embedded mid-sentence
fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
