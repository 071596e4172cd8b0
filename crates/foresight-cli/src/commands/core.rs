//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_thresholds` - Resolve the threshold config (explicit path, data dir, built-in)
//! - `read_bundle` - Read and parse a forecast bundle
//! - `print_json` - Pretty JSON output for --json
//! - `cmd_config` - Print effective thresholds
//! - `cmd_schema` - Print the bundle JSON Schema

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use foresight_core::{EvaluationInput, Thresholds};
use serde::Serialize;

/// Load thresholds from an explicit file, the data-dir override, or built-ins
pub fn load_thresholds(config: Option<&Path>) -> Result<Thresholds> {
    if let Some(path) = config {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    }
    Thresholds::load(config).context("Failed to load threshold config")
}

/// Read a forecast bundle from disk
pub fn read_bundle(path: &Path) -> Result<EvaluationInput> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read bundle {}", path.display()))?;
    EvaluationInput::from_json(&content)
        .with_context(|| format!("Invalid forecast bundle {}", path.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn cmd_config(thresholds: &Thresholds) -> Result<()> {
    print!("{}", thresholds.to_toml()?);
    Ok(())
}

pub fn cmd_schema() -> Result<()> {
    print_json(&schemars::schema_for!(EvaluationInput))
}
