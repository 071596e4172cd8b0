//! Sanity check command

use std::path::Path;

use anyhow::Result;
use foresight_core::{SanityCheckRunner, SanityReport, Thresholds};

use super::{print_json, read_bundle, severity_icon};

pub fn cmd_check(file: &Path, thresholds: &Thresholds, json: bool) -> Result<()> {
    let input = read_bundle(file)?;
    let runner = SanityCheckRunner::with_thresholds(&thresholds.sanity);
    let report = runner.run(&input.forecast, input.historical_tail.as_deref())?;

    if json {
        return print_json(&report);
    }
    print!("{}", format_sanity_report(&report));
    Ok(())
}

pub fn format_sanity_report(report: &SanityReport) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("🔎 Forecast Sanity Checks\n");
    out.push_str("   ─────────────────────────────────────────────────────────────\n");
    for result in report.checks.values() {
        out.push_str(&format!(
            "   {} {:<22} {}\n",
            severity_icon(result.severity),
            result.id.title(),
            result.message
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "   Score: {}/100 ({} of {} checks passed)\n",
        report.overall_score, report.passed_count, report.total_checks
    ));
    out
}
