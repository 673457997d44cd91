//! Batch summary rendering for the terminal.

use comfy_table::{presets, Cell, ContentArrangement, Table};

use crate::domain::models::{BatchResult, TrialOutcome};

/// Render the batch as a table plus a one-line tally.
pub fn render_summary(result: &BatchResult) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["PR", "Branch", "Outcome", "Failing checks"]);

    for trial in &result.trials {
        let failing = if trial.failing_checks.is_empty() {
            match trial.outcome {
                TrialOutcome::Failed => "(timed out or no signal)".to_string(),
                _ => String::new(),
            }
        } else {
            trial
                .failing_checks
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        table.add_row(vec![
            Cell::new(format!("#{}", trial.number)),
            Cell::new(&trial.branch),
            Cell::new(trial.outcome.as_str()),
            Cell::new(failing),
        ]);
    }

    format!(
        "{table}\ntotal: {}  passed: {}  failed: {}",
        result.total(),
        result.passed(),
        result.failed()
    )
}
