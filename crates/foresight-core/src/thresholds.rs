//! Threshold configuration
//!
//! Every cut-off used by the checks, scorers and narratives lives here so it
//! can be tuned without touching check logic. The built-in values reproduce
//! the existing dashboard exactly.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/foresight/config/thresholds.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override file keep their built-in values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::numeric::ZERO_TOLERANCE;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/thresholds.toml");

/// Cut-offs for the forecast sanity checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SanityThresholds {
    /// Continuity fails when the first step moves this fraction of the last actual
    pub continuity_jump_ratio: f64,
    /// Trend fails when a step reaches this multiple of the mean step
    pub trend_spike_multiplier: f64,
    /// Magnitude below which a denominator counts as zero
    pub zero_tolerance: f64,
}

impl Default for SanityThresholds {
    fn default() -> Self {
        Self {
            continuity_jump_ratio: 0.5,
            trend_spike_multiplier: 3.0,
            zero_tolerance: ZERO_TOLERANCE,
        }
    }
}

/// Warning/error cut-offs for a raw count (exclusive: `count > warning_above`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountThresholds {
    pub warning_above: u64,
    #[serde(default)]
    pub error_above: Option<u64>,
}

/// Data-quality bands and count-card cut-offs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub completeness_weight: f64,
    pub consistency_weight: f64,
    pub validity_weight: f64,
    pub missing_values: CountThresholds,
    pub outliers: CountThresholds,
    pub date_gaps: CountThresholds,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            excellent: 90.0,
            good: 75.0,
            fair: 60.0,
            completeness_weight: 1.0,
            consistency_weight: 1.0,
            validity_weight: 1.0,
            missing_values: CountThresholds {
                warning_above: 10,
                error_above: Some(100),
            },
            outliers: CountThresholds {
                warning_above: 50,
                error_above: None,
            },
            date_gaps: CountThresholds {
                warning_above: 0,
                error_above: None,
            },
        }
    }
}

/// MAPE cut-offs for the risk panel (lower bound inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfidenceThresholds {
    pub good_from: f64,
    pub moderate_from: f64,
    pub low_from: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            good_from: 10.0,
            moderate_from: 25.0,
            low_from: 50.0,
        }
    }
}

/// MAPE cut-offs for the accuracy narrative (upper bound inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccuracyThresholds {
    pub excellent_max: f64,
    pub good_max: f64,
    pub fair_max: f64,
}

impl Default for AccuracyThresholds {
    fn default() -> Self {
        Self {
            excellent_max: 3.0,
            good_max: 7.0,
            fair_max: 15.0,
        }
    }
}

/// Average relative interval width cut-offs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskThresholds {
    pub low_below: f64,
    pub high_above: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_below: 0.15,
            high_above: 0.40,
        }
    }
}

/// Revenue narrative settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevenueSettings {
    /// Price applied to each predicted unit when the caller gives none
    pub average_unit_price: f64,
    /// Changes smaller than this (percent) are reported as flat
    pub flat_change_pct: f64,
}

impl Default for RevenueSettings {
    fn default() -> Self {
        Self {
            average_unit_price: 1.0,
            flat_change_pct: 0.05,
        }
    }
}

/// All engine thresholds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub sanity: SanityThresholds,
    pub quality: QualityThresholds,
    pub confidence: ConfidenceThresholds,
    pub accuracy: AccuracyThresholds,
    pub risk: RiskThresholds,
    pub revenue: RevenueSettings,
}

impl Thresholds {
    /// Load thresholds (override first, then embedded default)
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) if path.exists() => read_config(path)?,
            Some(path) => {
                tracing::debug!(path = %path.display(), "Threshold override not found, using defaults");
                DEFAULT_CONFIG.to_string()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => read_config(&path)?,
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::parse(&content)
    }

    /// Parse thresholds from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let thresholds: Thresholds = toml::from_str(content)?;
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reject band definitions that are out of order or not finite
    pub fn validate(&self) -> Result<()> {
        let q = &self.quality;
        ensure_ascending("quality", &[q.fair, q.good, q.excellent])?;
        let weights = [
            q.completeness_weight,
            q.consistency_weight,
            q.validity_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.iter().sum::<f64>() <= 0.0
        {
            return Err(Error::Config(
                "quality weights must be non-negative with a positive sum".to_string(),
            ));
        }
        for (name, count) in [
            ("missing_values", q.missing_values),
            ("outliers", q.outliers),
            ("date_gaps", q.date_gaps),
        ] {
            if let Some(error_above) = count.error_above {
                if error_above < count.warning_above {
                    return Err(Error::Config(format!(
                        "quality.{}: error_above must not be below warning_above",
                        name
                    )));
                }
            }
        }

        let c = &self.confidence;
        ensure_ascending("confidence", &[c.good_from, c.moderate_from, c.low_from])?;

        let a = &self.accuracy;
        ensure_ascending("accuracy", &[a.excellent_max, a.good_max, a.fair_max])?;

        let r = &self.risk;
        if !(r.low_below.is_finite() && r.high_above.is_finite() && r.low_below <= r.high_above) {
            return Err(Error::Config(
                "risk: low_below must not exceed high_above".to_string(),
            ));
        }

        let s = &self.sanity;
        if !(s.continuity_jump_ratio > 0.0
            && s.trend_spike_multiplier > 0.0
            && s.zero_tolerance >= 0.0)
        {
            return Err(Error::Config(
                "sanity: ratios must be positive and zero_tolerance non-negative".to_string(),
            ));
        }

        let rev = &self.revenue;
        if !(rev.average_unit_price.is_finite() && rev.flat_change_pct >= 0.0) {
            return Err(Error::Config(
                "revenue: average_unit_price must be finite, flat_change_pct non-negative"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("foresight").join("config").join("thresholds.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "Loading threshold override");
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}

fn ensure_ascending(section: &str, values: &[f64]) -> Result<()> {
    let finite = values.iter().all(|v| v.is_finite());
    let ordered = values.windows(2).all(|w| w[0] < w[1]);
    if finite && ordered {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{}: band cut-offs must be finite and strictly increasing, got {:?}",
            section, values
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let parsed = Thresholds::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, Thresholds::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let parsed = Thresholds::parse(
            r#"
            [sanity]
            continuity_jump_ratio = 0.25

            [risk]
            high_above = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(parsed.sanity.continuity_jump_ratio, 0.25);
        assert_eq!(parsed.sanity.trend_spike_multiplier, 3.0);
        assert_eq!(parsed.risk.high_above, 0.5);
        assert_eq!(parsed.risk.low_below, 0.15);
        assert_eq!(parsed.confidence, ConfidenceThresholds::default());
    }

    #[test]
    fn test_unordered_bands_rejected() {
        let err = Thresholds::parse(
            r#"
            [accuracy]
            excellent_max = 8.0
            good_max = 7.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Thresholds::parse(
            r#"
            [quality.missing_values]
            warning_above = 20
            error_above = 5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Thresholds::parse("[sanity]\ncontinuity = 0.5\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_load_from_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[confidence]\ngood_from = 12.0").unwrap();

        let loaded = Thresholds::load(Some(file.path())).unwrap();
        assert_eq!(loaded.confidence.good_from, 12.0);
        assert_eq!(loaded.confidence.moderate_from, 25.0);
    }

    #[test]
    fn test_load_missing_override_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Thresholds::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded, Thresholds::default());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let rendered = Thresholds::default().to_toml().unwrap();
        assert_eq!(Thresholds::parse(&rendered).unwrap(), Thresholds::default());
    }
}
