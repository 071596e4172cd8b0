//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (threshold loading, bundle reading, JSON output) plus config/schema
//! - `check` - Forecast sanity checks
//! - `quality` - Data-quality scorecard
//! - `summary` - Risk band and executive summary
//! - `evaluate` - Full report for a batch of bundles

pub mod check;
pub mod core;
pub mod evaluate;
pub mod quality;
pub mod summary;

// Re-export command functions for main.rs
pub use check::*;
pub use self::core::*;
pub use evaluate::*;
pub use quality::*;
pub use summary::*;

/// Status icon for a check or badge severity
pub fn severity_icon(severity: foresight_core::Severity) -> &'static str {
    use foresight_core::Severity;
    match severity {
        Severity::Success => "✅",
        Severity::Warning => "⚠️ ",
        Severity::Error => "❌",
        Severity::Info => "ℹ️ ",
    }
}
