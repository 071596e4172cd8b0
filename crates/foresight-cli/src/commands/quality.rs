//! Data-quality command

use std::path::Path;

use anyhow::Result;
use foresight_core::{QualityScorecard, QualityScorer, Thresholds};

use super::{print_json, read_bundle, severity_icon};

pub fn cmd_quality(file: &Path, thresholds: &Thresholds, json: bool) -> Result<()> {
    let input = read_bundle(file)?;
    let Some(profile) = input.data_profile.as_ref() else {
        anyhow::bail!("Bundle {} has no data_profile section", file.display());
    };

    let scorecard = QualityScorer::with_thresholds(thresholds.quality).score(profile);

    if json {
        return print_json(&scorecard);
    }
    print!("{}", format_scorecard(&scorecard));
    Ok(())
}

pub fn format_scorecard(card: &QualityScorecard) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!(
        "📋 Data Quality: {:.1}/100 ({})\n",
        card.overall_score,
        card.level.label()
    ));
    out.push_str("   ─────────────────────────────\n");
    for (name, score, level) in [
        ("Completeness", card.completeness, card.sub_levels.completeness),
        ("Consistency", card.consistency, card.sub_levels.consistency),
        ("Validity", card.validity, card.sub_levels.validity),
    ] {
        out.push_str(&format!(
            "   {} {:<14} {:>5.1}  {}\n",
            severity_icon(level.severity()),
            name,
            score,
            level.label()
        ));
    }

    if !card.counts.is_empty() {
        out.push('\n');
        for count in &card.counts {
            out.push_str(&format!(
                "   {} {:<18} {}\n",
                severity_icon(count.status),
                count.field.title(),
                count.count
            ));
        }
    }
    out
}
