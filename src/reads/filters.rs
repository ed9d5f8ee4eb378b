use serde::{Deserialize, Deserializer, Serialize};

use crate::core::read_run::BaseReadRun;
use crate::core::types::SequencingDataType;

pub const LIBRARY_LAYOUT: &str = "library_layout";
pub const LIBRARY_STRATEGY: &str = "library_strategy";
pub const LIBRARY_SOURCE: &str = "library_source";
pub const DESCRIPTION: &str = "description";

/// Strategy assumed when a workflow states no requirement
pub const DEFAULT_LIBRARY_STRATEGY: &str = "WGS";

/// Sequencing data a workflow input declares it needs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRequirements {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub library_layout: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub library_source: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub library_strategy: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One input parameter of a workflow, as listed in the workflow catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowParameter {
    pub key: String,

    #[serde(default)]
    pub variable: Option<String>,

    #[serde(default)]
    pub data_requirements: Option<DataRequirements>,
}

/// Accepted values for one column; a row matches if its value is any of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: String,
    pub values: Vec<String>,
}

impl ColumnFilter {
    pub fn new(column: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            column: column.into(),
            values,
        }
    }

    /// Whether `run` carries one of the accepted values in this column
    #[must_use]
    pub fn matches(&self, run: &BaseReadRun) -> bool {
        run.column_value(&self.column)
            .is_some_and(|value| self.values.contains(&value))
    }
}

/// Build the filters implied by a workflow step and its parameter.
///
/// Column order is fixed: layout, strategy, source, description.
#[must_use]
pub fn build_filters(
    step: SequencingDataType,
    parameter: Option<&WorkflowParameter>,
) -> Vec<ColumnFilter> {
    let requirements = parameter.and_then(|p| p.data_requirements.as_ref());
    let mut filters = Vec::new();

    let layout = requirements
        .and_then(|r| r.library_layout.clone())
        .filter(|l| !l.is_empty())
        .or_else(|| step.layout().map(|l| l.as_str().to_string()));
    if let Some(layout) = layout {
        filters.push(ColumnFilter::new(LIBRARY_LAYOUT, vec![layout]));
    }

    let strategy = requirements
        .map(|r| r.library_strategy.clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| vec![DEFAULT_LIBRARY_STRATEGY.to_string()]);
    filters.push(ColumnFilter::new(LIBRARY_STRATEGY, strategy));

    if let Some(source) = requirements
        .map(|r| r.library_source.clone())
        .filter(|s| !s.is_empty())
    {
        filters.push(ColumnFilter::new(LIBRARY_SOURCE, source));
    }

    if let Some(description) = requirements
        .and_then(|r| r.description.clone())
        .filter(|d| !d.is_empty())
    {
        filters.push(ColumnFilter::new(DESCRIPTION, vec![description]));
    }

    filters
}

/// Keep `filters` only if at least one row satisfies all of them.
///
/// Filters are accepted or rejected as a whole; individual columns are
/// never dropped.
#[must_use]
pub fn validate_filters<'a, I>(rows: I, filters: Vec<ColumnFilter>) -> Vec<ColumnFilter>
where
    I: IntoIterator<Item = &'a BaseReadRun>,
{
    let satisfiable = rows
        .into_iter()
        .any(|row| filters.iter().all(|filter| filter.matches(row)));

    if satisfiable {
        filters
    } else {
        Vec::new()
    }
}

/// Filters to pre-apply for a step over `rows`; never any for [`SequencingDataType::ReadRunsAny`]
#[must_use]
pub fn pre_select_filters<'a, I>(
    rows: I,
    step: SequencingDataType,
    parameter: Option<&WorkflowParameter>,
) -> Vec<ColumnFilter>
where
    I: IntoIterator<Item = &'a BaseReadRun>,
{
    if step == SequencingDataType::ReadRunsAny {
        return Vec::new();
    }
    validate_filters(rows, build_filters(step, parameter))
}

/// Number of rows satisfying every filter
#[must_use]
pub fn requirement_match_count<'a, I>(rows: I, filters: &[ColumnFilter]) -> usize
where
    I: IntoIterator<Item = &'a BaseReadRun>,
{
    rows.into_iter()
        .filter(|row| filters.iter().all(|filter| filter.matches(row)))
        .count()
}
