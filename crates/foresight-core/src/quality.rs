//! Data-quality scoring
//!
//! Turns a [`DataProfile`] into a scorecard: an overall 0-100 score, the
//! three sub-scores, a qualitative band for each, and warning/error status
//! for the raw count cards (missing values, outliers, date gaps).

use serde::Serialize;
use std::fmt;

use crate::thresholds::{CountThresholds, QualityThresholds};
use crate::types::{DataProfile, Severity};

/// Qualitative quality band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityLevel {
    /// Band a 0-100 score (lower bounds inclusive)
    pub fn from_score(score: f64, thresholds: &QualityThresholds) -> Self {
        if score >= thresholds.excellent {
            QualityLevel::Excellent
        } else if score >= thresholds.good {
            QualityLevel::Good
        } else if score >= thresholds.fair {
            QualityLevel::Fair
        } else {
            QualityLevel::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Excellent => "excellent",
            QualityLevel::Good => "good",
            QualityLevel::Fair => "fair",
            QualityLevel::Poor => "poor",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityLevel::Excellent => "Excellent",
            QualityLevel::Good => "Good",
            QualityLevel::Fair => "Fair",
            QualityLevel::Poor => "Poor",
        }
    }

    /// Badge severity for metric cards
    pub fn severity(&self) -> Severity {
        match self {
            QualityLevel::Excellent | QualityLevel::Good => Severity::Success,
            QualityLevel::Fair => Severity::Warning,
            QualityLevel::Poor => Severity::Error,
        }
    }

    /// Display tone for the band
    pub fn tone(&self) -> &'static str {
        match self {
            QualityLevel::Excellent => "green",
            QualityLevel::Good => "blue",
            QualityLevel::Fair => "yellow",
            QualityLevel::Poor => "red",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `error` above the error cut-off, `warning` above the warning cut-off
pub fn count_status(count: u64, thresholds: &CountThresholds) -> Severity {
    match thresholds.error_above {
        Some(error_above) if count > error_above => Severity::Error,
        _ if count > thresholds.warning_above => Severity::Warning,
        _ => Severity::Success,
    }
}

/// Count cards shown next to the scorecard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileCount {
    MissingValues,
    Outliers,
    DateGaps,
}

impl ProfileCount {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileCount::MissingValues => "missing_values",
            ProfileCount::Outliers => "outliers",
            ProfileCount::DateGaps => "date_gaps",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ProfileCount::MissingValues => "Missing Values",
            ProfileCount::Outliers => "Outliers Detected",
            ProfileCount::DateGaps => "Date Gaps",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountStatus {
    pub field: ProfileCount,
    pub count: u64,
    pub status: Severity,
}

/// Band of each sub-score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScoreLevels {
    pub completeness: QualityLevel,
    pub consistency: QualityLevel,
    pub validity: QualityLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityScorecard {
    pub overall_score: f64,
    pub completeness: f64,
    pub consistency: f64,
    pub validity: f64,
    pub level: QualityLevel,
    pub sub_levels: SubScoreLevels,
    /// Only the counts present in the profile
    pub counts: Vec<CountStatus>,
}

/// Scores data profiles
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    thresholds: QualityThresholds,
}

impl QualityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn level(&self, score: f64) -> QualityLevel {
        QualityLevel::from_score(score, &self.thresholds)
    }

    pub fn score(&self, profile: &DataProfile) -> QualityScorecard {
        let completeness = clamp_score(profile.completeness);
        let consistency = clamp_score(profile.consistency);
        let validity = clamp_score(profile.validity);

        let overall_score = match profile.overall_score {
            Some(score) => clamp_score(score),
            None => self.weighted_mean(completeness, consistency, validity),
        };

        let t = &self.thresholds;
        let counts = [
            (ProfileCount::MissingValues, profile.missing_count, t.missing_values),
            (ProfileCount::Outliers, profile.outlier_count, t.outliers),
            (ProfileCount::DateGaps, profile.date_gaps, t.date_gaps),
        ]
        .into_iter()
        .filter_map(|(field, count, limits)| {
            count.map(|count| CountStatus {
                field,
                count,
                status: count_status(count, &limits),
            })
        })
        .collect();

        let scorecard = QualityScorecard {
            overall_score,
            completeness,
            consistency,
            validity,
            level: self.level(overall_score),
            sub_levels: SubScoreLevels {
                completeness: self.level(completeness),
                consistency: self.level(consistency),
                validity: self.level(validity),
            },
            counts,
        };

        tracing::debug!(
            overall = scorecard.overall_score,
            level = scorecard.level.as_str(),
            "Quality scored"
        );

        scorecard
    }

    fn weighted_mean(&self, completeness: f64, consistency: f64, validity: f64) -> f64 {
        let t = &self.thresholds;
        let total_weight = t.completeness_weight + t.consistency_weight + t.validity_weight;
        if total_weight <= 0.0 {
            return 0.0;
        }
        let weighted = completeness * t.completeness_weight
            + consistency * t.consistency_weight
            + validity * t.validity_weight;
        clamp_score(weighted / total_weight)
    }
}

/// Clamp to [0, 100]; non-finite scores count as 0
fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(completeness: f64, consistency: f64, validity: f64) -> DataProfile {
        DataProfile {
            completeness,
            consistency,
            validity,
            ..Default::default()
        }
    }

    #[test]
    fn test_level_boundaries() {
        let t = QualityThresholds::default();
        assert_eq!(QualityLevel::from_score(90.0, &t), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_score(89.999, &t), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(75.0, &t), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(74.9, &t), QualityLevel::Fair);
        assert_eq!(QualityLevel::from_score(60.0, &t), QualityLevel::Fair);
        assert_eq!(QualityLevel::from_score(59.99, &t), QualityLevel::Poor);
        assert_eq!(QualityLevel::from_score(0.0, &t), QualityLevel::Poor);
    }

    #[test]
    fn test_level_presentation() {
        assert_eq!(QualityLevel::Good.severity(), Severity::Success);
        assert_eq!(QualityLevel::Fair.severity(), Severity::Warning);
        assert_eq!(QualityLevel::Poor.severity(), Severity::Error);
        assert_eq!(QualityLevel::Excellent.tone(), "green");
        assert_eq!(QualityLevel::Poor.label(), "Poor");
    }

    #[test]
    fn test_overall_from_sub_scores() {
        let card = QualityScorer::new().score(&profile(95.0, 80.0, 65.0));
        assert!((card.overall_score - 80.0).abs() < 1e-9);
        assert_eq!(card.level, QualityLevel::Good);
        assert_eq!(card.sub_levels.completeness, QualityLevel::Excellent);
        assert_eq!(card.sub_levels.consistency, QualityLevel::Good);
        assert_eq!(card.sub_levels.validity, QualityLevel::Fair);
        assert!(card.counts.is_empty());
    }

    #[test]
    fn test_producer_overall_score_wins() {
        let mut p = profile(50.0, 50.0, 50.0);
        p.overall_score = Some(90.0);
        let card = QualityScorer::new().score(&p);
        assert_eq!(card.overall_score, 90.0);
        assert_eq!(card.level, QualityLevel::Excellent);

        p.overall_score = Some(89.999);
        assert_eq!(QualityScorer::new().score(&p).level, QualityLevel::Good);
    }

    #[test]
    fn test_out_of_range_sub_scores_clamped() {
        let card = QualityScorer::new().score(&profile(140.0, -3.0, f64::NAN));
        assert_eq!(card.completeness, 100.0);
        assert_eq!(card.consistency, 0.0);
        assert_eq!(card.validity, 0.0);
    }

    #[test]
    fn test_weights() {
        let thresholds = QualityThresholds {
            completeness_weight: 2.0,
            consistency_weight: 1.0,
            validity_weight: 1.0,
            ..Default::default()
        };
        let card = QualityScorer::with_thresholds(thresholds).score(&profile(100.0, 60.0, 60.0));
        assert!((card.overall_score - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_value_status() {
        let t = QualityThresholds::default();
        assert_eq!(count_status(0, &t.missing_values), Severity::Success);
        assert_eq!(count_status(10, &t.missing_values), Severity::Success);
        assert_eq!(count_status(11, &t.missing_values), Severity::Warning);
        assert_eq!(count_status(100, &t.missing_values), Severity::Warning);
        assert_eq!(count_status(101, &t.missing_values), Severity::Error);
    }

    #[test]
    fn test_outlier_status_has_no_error_tier() {
        let t = QualityThresholds::default();
        assert_eq!(count_status(50, &t.outliers), Severity::Success);
        assert_eq!(count_status(51, &t.outliers), Severity::Warning);
        assert_eq!(count_status(10_000, &t.outliers), Severity::Warning);
    }

    #[test]
    fn test_count_cards() {
        let mut p = profile(90.0, 90.0, 90.0);
        p.missing_count = Some(150);
        p.date_gaps = Some(2);
        let card = QualityScorer::new().score(&p);

        assert_eq!(card.counts.len(), 2);
        assert_eq!(card.counts[0].field, ProfileCount::MissingValues);
        assert_eq!(card.counts[0].status, Severity::Error);
        assert_eq!(card.counts[1].field, ProfileCount::DateGaps);
        assert_eq!(card.counts[1].status, Severity::Warning);
    }

    #[test]
    fn test_scorecard_serialization() {
        let card = QualityScorer::new().score(&profile(90.0, 90.0, 90.0));
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["level"], "excellent");
        assert_eq!(json["overall_score"], 90.0);
        assert_eq!(json["sub_levels"]["validity"], "excellent");
    }
}
