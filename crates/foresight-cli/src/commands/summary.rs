//! Risk band and executive summary commands

use std::path::Path;

use anyhow::Result;
use foresight_core::{
    BusinessTranslator, ExecutiveSummary, RiskAssessment, RiskClassifier, SummaryInput,
    Thresholds,
};

use super::{print_json, read_bundle};

pub fn cmd_risk(mape: f64, thresholds: &Thresholds, json: bool) -> Result<()> {
    if !mape.is_finite() || mape < 0.0 {
        anyhow::bail!("MAPE must be a non-negative number, got {}", mape);
    }
    let classifier = RiskClassifier::with_thresholds(thresholds.confidence, thresholds.accuracy);
    let assessment = classifier.assess(mape);

    if json {
        return print_json(&assessment);
    }
    print!("{}", format_risk(&assessment));
    Ok(())
}

pub fn format_risk(assessment: &RiskAssessment) -> String {
    format!(
        "\n🎯 Forecast Confidence: {} ({}%)\n   MAPE: {:.1}%\n   {}\n   Recommended: {}\n",
        assessment.level,
        assessment.confidence_percentage,
        assessment.mape,
        assessment.message,
        assessment.recommended_action
    )
}

pub fn cmd_summarize(
    file: &Path,
    baseline: Option<f64>,
    price: Option<f64>,
    thresholds: &Thresholds,
    json: bool,
) -> Result<()> {
    let input = read_bundle(file)?;
    let summary_input = SummaryInput {
        forecast: &input.forecast,
        metrics: input.metrics.as_ref(),
        baseline_revenue: baseline.or(input.baseline_revenue),
        avg_price: price.or(input.avg_price),
    };
    let summary = BusinessTranslator::with_thresholds(thresholds).summarize(&summary_input);

    if json {
        return print_json(&summary);
    }
    print!("{}", format_summary(&summary));
    Ok(())
}

pub fn format_summary(summary: &ExecutiveSummary) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("📈 {}\n", summary.headline));
    out.push_str("   ─────────────────────────────────────────────────────────────\n");
    out.push_str(&format!("   {}\n\n", summary.detailed_summary));
    out.push_str(&format!(
        "   Accuracy: {} - {} ({:.1}%)\n",
        summary.accuracy.title, summary.accuracy.rating, summary.accuracy.percentage
    ));
    out.push_str(&format!("      {}\n", summary.accuracy.description));
    out.push_str(&format!(
        "   Revenue:  {}\n      {}\n",
        summary.revenue.formatted_revenue, summary.revenue.narrative
    ));
    out.push_str(&format!(
        "   Risk:     {} (spread {})\n      {}\n",
        summary.risk.level, summary.risk.variance_metric, summary.risk.narrative
    ));
    out
}
