//! Demo reports the interactive session starts with.

use relief_map_report_models::DamageReport;

const SEED_REPORTS: &str = include_str!("../seed/reports.json");

/// Parses the embedded demo reports, newest first.
///
/// # Errors
///
/// Returns an error if the embedded JSON is malformed.
pub fn demo_reports() -> Result<Vec<DamageReport>, serde_json::Error> {
    serde_json::from_str(SEED_REPORTS)
}
