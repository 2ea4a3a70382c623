//! JSON output formatting

use crate::tasks::TaskReport;

pub fn format_json(report: &TaskReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}
