//! MAPE classification
//!
//! Two independent bandings over the same error metric:
//!
//! - [`ConfidenceLevel`] drives the risk panel and its safety-stock guidance
//!   (cut-offs 10 / 25 / 50, lower bound inclusive).
//! - [`AccuracyRating`] drives the executive accuracy narrative
//!   (cut-offs 3 / 7 / 15, upper bound inclusive).
//!
//! They serve different surfaces and are configured separately.

use serde::Serialize;
use std::fmt;

use crate::thresholds::{AccuracyThresholds, ConfidenceThresholds};

/// Risk panel confidence band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConfidenceLevel {
    Excellent,
    Good,
    Moderate,
    Low,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Excellent => "Excellent",
            ConfidenceLevel::Good => "Good",
            ConfidenceLevel::Moderate => "Moderate",
            ConfidenceLevel::Low => "Low",
        }
    }

    /// Fixed gauge value per band
    pub fn gauge_percentage(&self) -> u8 {
        match self {
            ConfidenceLevel::Excellent => 95,
            ConfidenceLevel::Good => 75,
            ConfidenceLevel::Moderate => 50,
            ConfidenceLevel::Low => 25,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ConfidenceLevel::Excellent => {
                "High confidence, suitable for automated purchase orders"
            }
            ConfidenceLevel::Good => "Reliable for planning",
            ConfidenceLevel::Moderate => "Suitable for directional planning only",
            ConfidenceLevel::Low => "Limited reliability, trends only",
        }
    }

    /// Recommended safety-stock action. Good and Moderate both use a 20% buffer.
    pub fn recommended_action(&self) -> &'static str {
        match self {
            ConfidenceLevel::Excellent => "Standard 15% safety stock",
            ConfidenceLevel::Good => "20% safety stock buffer",
            ConfidenceLevel::Moderate => "Maintain 20% safety stock for high-stakes decisions",
            ConfidenceLevel::Low => "Do not use for automated orders, manual review required",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Risk panel content for one MAPE value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub mape: f64,
    pub level: ConfidenceLevel,
    pub confidence_percentage: u8,
    pub message: String,
    pub recommended_action: String,
}

/// Executive narrative accuracy rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AccuracyRating {
    Excellent,
    Good,
    Fair,
    Poor,
    /// No usable metric
    Unknown,
}

impl AccuracyRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccuracyRating::Excellent => "Excellent",
            AccuracyRating::Good => "Good",
            AccuracyRating::Fair => "Fair",
            AccuracyRating::Poor => "Poor",
            AccuracyRating::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AccuracyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies MAPE into both bandings
#[derive(Debug, Clone, Default)]
pub struct RiskClassifier {
    confidence: ConfidenceThresholds,
    accuracy: AccuracyThresholds,
}

impl RiskClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(confidence: ConfidenceThresholds, accuracy: AccuracyThresholds) -> Self {
        Self {
            confidence,
            accuracy,
        }
    }

    /// Risk panel band. Non-finite MAPE is treated as the least reliable band.
    pub fn confidence_level(&self, mape: f64) -> ConfidenceLevel {
        let t = &self.confidence;
        if !mape.is_finite() || mape >= t.low_from {
            ConfidenceLevel::Low
        } else if mape >= t.moderate_from {
            ConfidenceLevel::Moderate
        } else if mape >= t.good_from {
            ConfidenceLevel::Good
        } else {
            ConfidenceLevel::Excellent
        }
    }

    pub fn assess(&self, mape: f64) -> RiskAssessment {
        let level = self.confidence_level(mape);
        RiskAssessment {
            mape,
            level,
            confidence_percentage: level.gauge_percentage(),
            message: level.message().to_string(),
            recommended_action: level.recommended_action().to_string(),
        }
    }

    /// Narrative accuracy rating; `Unknown` for non-finite MAPE
    pub fn accuracy_rating(&self, mape: f64) -> AccuracyRating {
        let t = &self.accuracy;
        if !mape.is_finite() {
            AccuracyRating::Unknown
        } else if mape <= t.excellent_max {
            AccuracyRating::Excellent
        } else if mape <= t.good_max {
            AccuracyRating::Good
        } else if mape <= t.fair_max {
            AccuracyRating::Fair
        } else {
            AccuracyRating::Poor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_bands_monotonic() {
        let classifier = RiskClassifier::new();
        let levels: Vec<_> = [5.0, 15.0, 30.0, 60.0]
            .iter()
            .map(|m| classifier.confidence_level(*m))
            .collect();
        assert_eq!(
            levels,
            vec![
                ConfidenceLevel::Excellent,
                ConfidenceLevel::Good,
                ConfidenceLevel::Moderate,
                ConfidenceLevel::Low
            ]
        );

        let gauges: Vec<u8> = levels.iter().map(|l| l.gauge_percentage()).collect();
        assert!(gauges.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_confidence_band_edges() {
        let classifier = RiskClassifier::new();
        assert_eq!(classifier.confidence_level(9.999), ConfidenceLevel::Excellent);
        assert_eq!(classifier.confidence_level(10.0), ConfidenceLevel::Good);
        assert_eq!(classifier.confidence_level(25.0), ConfidenceLevel::Moderate);
        assert_eq!(classifier.confidence_level(50.0), ConfidenceLevel::Low);
        assert_eq!(classifier.confidence_level(f64::NAN), ConfidenceLevel::Low);
    }

    #[test]
    fn test_gauge_values_are_buckets() {
        let classifier = RiskClassifier::new();
        assert_eq!(classifier.assess(10.0).confidence_percentage, 75);
        assert_eq!(classifier.assess(24.9).confidence_percentage, 75);
    }

    #[test]
    fn test_assessment_text() {
        let assessment = RiskClassifier::new().assess(3.2);
        assert_eq!(assessment.level, ConfidenceLevel::Excellent);
        assert_eq!(assessment.confidence_percentage, 95);
        assert!(assessment.message.contains("automated purchase orders"));
        assert_eq!(assessment.recommended_action, "Standard 15% safety stock");

        let moderate = RiskClassifier::new().assess(30.0);
        assert!(moderate.recommended_action.contains("20% safety stock"));
        let low = RiskClassifier::new().assess(75.0);
        assert!(low.recommended_action.contains("manual review required"));
    }

    #[test]
    fn test_accuracy_rating_bands() {
        let classifier = RiskClassifier::new();
        assert_eq!(classifier.accuracy_rating(3.0), AccuracyRating::Excellent);
        assert_eq!(classifier.accuracy_rating(3.01), AccuracyRating::Good);
        assert_eq!(classifier.accuracy_rating(6.8), AccuracyRating::Good);
        assert_eq!(classifier.accuracy_rating(7.0), AccuracyRating::Good);
        assert_eq!(classifier.accuracy_rating(15.0), AccuracyRating::Fair);
        assert_eq!(classifier.accuracy_rating(15.1), AccuracyRating::Poor);
        assert_eq!(
            classifier.accuracy_rating(f64::INFINITY),
            AccuracyRating::Unknown
        );
    }

    #[test]
    fn test_bandings_are_independent() {
        // 8% is Excellent on the risk panel but only Fair in the narrative
        let classifier = RiskClassifier::new();
        assert_eq!(classifier.confidence_level(8.0), ConfidenceLevel::Excellent);
        assert_eq!(classifier.accuracy_rating(8.0), AccuracyRating::Fair);
    }
}
