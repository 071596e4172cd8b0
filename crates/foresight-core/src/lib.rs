//! Foresight Core Library
//!
//! Deterministic sanity checks and business translation for sales forecasts:
//! - Numeric guards that tolerate null / NaN / infinite payload values
//! - Four forecast sanity checks with an aggregate score
//! - Data-quality scorecards with qualitative bands
//! - MAPE risk bands with safety-stock guidance
//! - Executive narratives (accuracy, revenue impact, uncertainty)
//! - Threshold configuration with embedded defaults and file overrides
//!
//! Every public operation is a pure function of its inputs.

pub mod error;
pub mod evaluation;
pub mod numeric;
pub mod quality;
pub mod risk;
pub mod sanity;
pub mod thresholds;
pub mod translator;
pub mod types;

pub use error::{Error, Result};
pub use evaluation::{EvaluationInput, EvaluationReport, Evaluator};
pub use quality::{CountStatus, ProfileCount, QualityLevel, QualityScorecard, QualityScorer};
pub use risk::{AccuracyRating, ConfidenceLevel, RiskAssessment, RiskClassifier};
pub use sanity::{SanityCheck, SanityCheckRunner, SanityReport};
pub use thresholds::Thresholds;
pub use translator::{
    format_currency, AccuracyNarrative, BusinessTranslator, ExecutiveSummary, RevenueNarrative,
    RiskLevel, RiskNarrative, SummaryInput,
};
pub use types::{CheckId, CheckResult, DataProfile, ForecastResult, MetricsSet, Severity};
