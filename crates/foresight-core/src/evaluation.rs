//! Evaluator - runs every component over one forecast bundle

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::numeric::deserialize_lenient_opt_seq;
use crate::quality::{QualityScorecard, QualityScorer};
use crate::risk::{RiskAssessment, RiskClassifier};
use crate::sanity::{SanityCheckRunner, SanityReport};
use crate::thresholds::Thresholds;
use crate::translator::{BusinessTranslator, ExecutiveSummary, SummaryInput};
use crate::types::{DataProfile, ForecastResult, MetricsSet};

/// A forecast together with the context needed to judge it
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationInput {
    pub forecast: ForecastResult,
    #[serde(default)]
    pub metrics: Option<MetricsSet>,
    /// Most recent actuals immediately before the forecast horizon
    #[serde(default, deserialize_with = "deserialize_lenient_opt_seq")]
    #[schemars(with = "Option<Vec<Option<f64>>>")]
    pub historical_tail: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub data_profile: Option<DataProfile>,
    #[serde(default)]
    pub baseline_revenue: Option<f64>,
    #[serde(default)]
    pub avg_price: Option<f64>,
}

impl EvaluationInput {
    /// Parse a JSON bundle
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    fn summary_input(&self) -> SummaryInput<'_> {
        SummaryInput {
            forecast: &self.forecast,
            metrics: self.metrics.as_ref(),
            baseline_revenue: self.baseline_revenue,
            avg_price: self.avg_price,
        }
    }
}

/// Everything the dashboard renders for one forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub sanity: SanityReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityScorecard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskAssessment>,
    pub summary: ExecutiveSummary,
}

/// Runs sanity checks, quality scoring, risk classification and translation
pub struct Evaluator {
    runner: SanityCheckRunner,
    scorer: QualityScorer,
    classifier: RiskClassifier,
    translator: BusinessTranslator,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_thresholds(&Thresholds::default())
    }

    pub fn with_thresholds(thresholds: &Thresholds) -> Self {
        Self {
            runner: SanityCheckRunner::with_thresholds(&thresholds.sanity),
            scorer: QualityScorer::with_thresholds(thresholds.quality),
            classifier: RiskClassifier::with_thresholds(
                thresholds.confidence,
                thresholds.accuracy,
            ),
            translator: BusinessTranslator::with_thresholds(thresholds),
        }
    }

    pub fn runner(&self) -> &SanityCheckRunner {
        &self.runner
    }

    pub fn scorer(&self) -> &QualityScorer {
        &self.scorer
    }

    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    pub fn translator(&self) -> &BusinessTranslator {
        &self.translator
    }

    /// Evaluate one bundle
    pub fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationReport> {
        let sanity = self
            .runner
            .run(&input.forecast, input.historical_tail.as_deref())?;
        let quality = input.data_profile.as_ref().map(|p| self.scorer.score(p));
        let risk = input.metrics.map(|m| self.classifier.assess(m.mape));
        let summary = self.translator.summarize(&input.summary_input());

        tracing::debug!(
            horizon = input.forecast.horizon(),
            sanity_score = sanity.overall_score,
            "Forecast evaluated"
        );

        Ok(EvaluationReport {
            sanity,
            quality,
            risk,
            summary,
        })
    }

    /// Evaluate independent bundles; a failing bundle does not stop the rest
    pub fn evaluate_batch(&self, inputs: &[EvaluationInput]) -> Vec<Result<EvaluationReport>> {
        inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                let result = self.evaluate(input);
                if let Err(ref e) = result {
                    tracing::warn!(index, error = %e, "Forecast evaluation failed");
                }
                result
            })
            .collect()
    }
}
