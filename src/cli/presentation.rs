//! CLI presentation: text and JSON rendering of allocation results.

use crate::collection::Collection;
use crate::error::{AllocError, Result};
use crate::statistics::{StatMap, TOTAL};
use comfy_table::Table;

/// One handle path per line, in collection order.
pub fn format_paths(collection: &Collection) -> String {
    collection
        .handles()
        .iter()
        .filter(|h| !h.ignored())
        .map(|h| h.path().display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Category counts as a table, with the total as the last row.
pub fn format_stats_text(report: &StatMap) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Category", "Count"]);
    for (category, count) in report.iter().filter(|(k, _)| k.as_str() != TOTAL) {
        table.add_row(vec![category.clone(), count.to_string()]);
    }
    let total = report.get(TOTAL).copied().unwrap_or(0);
    table.add_row(vec![TOTAL.to_string(), total.to_string()]);
    table.to_string()
}

pub fn format_stats_json(report: &StatMap) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| AllocError::Configuration(format!("Failed to render statistics: {}", e)))
}
