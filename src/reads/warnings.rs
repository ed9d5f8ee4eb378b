use serde::Serialize;

use crate::core::read_run::BaseReadRun;
use crate::core::types::SequencingDataType;
use crate::reads::filters::{
    pre_select_filters, ColumnFilter, WorkflowParameter, LIBRARY_LAYOUT, LIBRARY_SOURCE,
    LIBRARY_STRATEGY,
};

/// Shown in place of a column value a row does not carry
pub const MISSING_VALUE: &str = "(missing)";

/// Human-readable name of a filter column; unknown columns use their key
#[must_use]
pub fn column_label(column: &str) -> &str {
    match column {
        LIBRARY_LAYOUT => "Library layout",
        LIBRARY_STRATEGY => "Library strategy",
        LIBRARY_SOURCE => "Library source",
        other => other,
    }
}

/// Explain how the selected rows diverge from what the workflow expects.
///
/// Returns at most one warning per dimension: species first (when a
/// taxonomy ID is given), then one per filter in filter order. Each
/// warning lists the distinct offending values in first-seen order.
/// Nothing is returned when no rows are selected. Warnings are advisory
/// and never invalidate a selection.
#[must_use]
pub fn requirement_warnings(
    filters: &[ColumnFilter],
    selected: &[&BaseReadRun],
    taxonomy_id: Option<&str>,
) -> Vec<String> {
    if selected.is_empty() {
        return Vec::new();
    }

    let mut warnings = Vec::new();

    if let Some(expected) = taxonomy_id {
        let offending = distinct(
            selected
                .iter()
                .filter(|run| run.tax_id != expected)
                .map(|run| run.tax_id.clone()),
        );
        if !offending.is_empty() {
            warnings.push(format!(
                "Species mismatch: data is not from the selected taxonomy ID {expected} (found {})",
                offending.join(", ")
            ));
        }
    }

    for filter in filters {
        let offending = distinct(
            selected
                .iter()
                .filter(|run| !filter.matches(run))
                .map(|run| {
                    run.column_value(&filter.column)
                        .unwrap_or_else(|| MISSING_VALUE.to_string())
                }),
        );
        if !offending.is_empty() {
            warnings.push(format!(
                "{} mismatch: expected {}, but {} selected",
                column_label(&filter.column),
                filter.values.join(" OR "),
                offending.join(", ")
            ));
        }
    }

    warnings
}

/// Filters pre-applied to a set of rows and the warnings for a selection from them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub filters: Vec<ColumnFilter>,
    pub warnings: Vec<String>,
}

/// Pre-select filters over `rows` and check `selected` against those same filters.
///
/// Filters that no row satisfies are discarded before any warning is
/// raised, and the any-layout step never pre-selects, so in both cases
/// only the species check can warn.
#[must_use]
pub fn reconcile<'a, I>(
    rows: I,
    selected: &[&BaseReadRun],
    step: SequencingDataType,
    parameter: Option<&WorkflowParameter>,
    taxonomy_id: Option<&str>,
) -> Reconciliation
where
    I: IntoIterator<Item = &'a BaseReadRun>,
{
    let filters = pre_select_filters(rows, step, parameter);
    let warnings = requirement_warnings(&filters, selected, taxonomy_id);
    Reconciliation { filters, warnings }
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
