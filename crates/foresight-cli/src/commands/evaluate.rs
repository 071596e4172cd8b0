//! Full evaluation over one or more bundles

use std::path::PathBuf;

use anyhow::{Context, Result};
use foresight_core::{EvaluationReport, Evaluator, Thresholds};
use serde::Serialize;

use super::{format_risk, format_sanity_report, format_scorecard, format_summary, read_bundle};

#[derive(Serialize)]
struct BatchEntry<'a, T: Serialize> {
    file: String,
    #[serde(flatten)]
    outcome: &'a T,
}

#[derive(Serialize)]
struct BatchError {
    error: String,
}

pub fn cmd_evaluate(files: &[PathBuf], thresholds: &Thresholds, json: bool) -> Result<()> {
    let evaluator = Evaluator::with_thresholds(thresholds);

    // A bundle that cannot be read is reported like one that fails to evaluate
    let results: Vec<std::result::Result<EvaluationReport, String>> = files
        .iter()
        .map(|file| {
            let input = read_bundle(file).map_err(|e| {
                tracing::warn!(file = %file.display(), error = %e, "Skipping unreadable bundle");
                format!("{:#}", e)
            })?;
            evaluator.evaluate(&input).map_err(|e| {
                tracing::warn!(file = %file.display(), error = %e, "Bundle failed to evaluate");
                e.to_string()
            })
        })
        .collect();

    let mut failures = 0;
    let mut entries = Vec::with_capacity(results.len());

    for (file, result) in files.iter().zip(&results) {
        let name = file.display().to_string();
        match result {
            Ok(report) => {
                if json {
                    entries.push(serde_json::to_value(BatchEntry {
                        file: name,
                        outcome: report,
                    })?);
                } else {
                    println!("\n━━━ {} ━━━", name);
                    print!("{}", format_sanity_report(&report.sanity));
                    if let Some(ref quality) = report.quality {
                        print!("{}", format_scorecard(quality));
                    }
                    if let Some(ref risk) = report.risk {
                        print!("{}", format_risk(risk));
                    }
                    print!("{}", format_summary(&report.summary));
                }
            }
            Err(e) => {
                failures += 1;
                if json {
                    entries.push(serde_json::to_value(BatchEntry {
                        file: name,
                        outcome: &BatchError { error: e.clone() },
                    })?);
                } else {
                    println!("\n━━━ {} ━━━", name);
                    println!("   ❌ {}", e);
                }
            }
        }
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).context("Failed to render report")?
        );
    }

    tracing::info!(
        bundles = files.len(),
        failed = failures,
        "Evaluation complete"
    );

    if failures == files.len() {
        anyhow::bail!("All {} bundle(s) failed to evaluate", failures);
    }
    Ok(())
}
