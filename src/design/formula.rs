use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::ColumnType;
use crate::parsing::ParseError;

/// Column name mapped to its classification (`None` = not yet classified),
/// in sample-sheet column order
pub type Classification = Vec<(String, Option<ColumnType>)>;

/// A sample-sheet column eligible for the design formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaColumn {
    pub column_name: String,
    pub column_type: ColumnType,
}

/// Primary factor and covariates chosen for the formula.
///
/// `covariates` keeps selection order and never contains `primary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaSelection {
    primary: Option<String>,
    covariates: Vec<String>,
}

impl FormulaSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    #[must_use]
    pub fn covariates(&self) -> &[String] {
        &self.covariates
    }

    /// Make `column` the primary factor, dropping it from the covariates
    #[must_use]
    pub fn select_primary(&self, column: &str) -> Self {
        Self {
            primary: Some(column.to_string()),
            covariates: self
                .covariates
                .iter()
                .filter(|c| *c != column)
                .cloned()
                .collect(),
        }
    }

    /// Add `column` to the covariates, or remove it if already there.
    ///
    /// The current primary cannot become a covariate; toggling it is a no-op.
    #[must_use]
    pub fn toggle_covariate(&self, column: &str) -> Self {
        if self.primary.as_deref() == Some(column) {
            return self.clone();
        }

        let mut covariates = self.covariates.clone();
        if let Some(index) = covariates.iter().position(|c| c == column) {
            covariates.remove(index);
        } else {
            covariates.push(column.to_string());
        }

        Self {
            primary: self.primary.clone(),
            covariates,
        }
    }

    /// A selection is complete once a primary factor is chosen
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.primary.is_some()
    }
}

/// Columns that may take part in a formula, in classification order
#[must_use]
pub fn formula_columns(classification: &[(String, Option<ColumnType>)]) -> Vec<FormulaColumn> {
    classification
        .iter()
        .filter_map(|(name, column_type)| {
            let column_type = (*column_type)?;
            column_type.is_formula_type().then(|| FormulaColumn {
                column_name: name.clone(),
                column_type,
            })
        })
        .collect()
}

/// Render the design formula for a selection.
///
/// Terms are ordered technical/blocking factors, then other covariates,
/// then biological factors (each in selection order), with the primary
/// factor last. Covariates that are not among `columns` are left out.
/// Returns `None` until a primary factor is selected.
#[must_use]
pub fn generate_formula(columns: &[FormulaColumn], selection: &FormulaSelection) -> Option<String> {
    let primary = selection.primary()?;

    let mut technical = Vec::new();
    let mut other = Vec::new();
    let mut biological = Vec::new();

    for covariate in selection.covariates() {
        let Some(column) = columns.iter().find(|c| &c.column_name == covariate) else {
            continue;
        };
        match column.column_type {
            ColumnType::TechnicalBlockingFactor => technical.push(covariate.as_str()),
            ColumnType::OtherCovariate => other.push(covariate.as_str()),
            ColumnType::BiologicalFactor => biological.push(covariate.as_str()),
            _ => {}
        }
    }

    let terms: Vec<&str> = technical
        .into_iter()
        .chain(other)
        .chain(biological)
        .chain(std::iter::once(primary))
        .collect();

    Some(format!("~ {}", terms.join(" + ")))
}

/// Read a classification from a JSON object of `column -> type | null`
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any error from
/// [`parse_classification`].
pub fn parse_classification_file(path: &Path) -> Result<Classification, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_classification(&content)
}

/// Parse a classification, keeping the object's key order
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON or an unknown column type,
/// or `ParseError::InvalidFormat` if the top-level value is not an object.
pub fn parse_classification(text: &str) -> Result<Classification, ParseError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(map) = value else {
        return Err(ParseError::InvalidFormat(
            "classification must be a JSON object".to_string(),
        ));
    };

    map.into_iter()
        .map(|(name, column_type)| -> Result<_, ParseError> {
            let column_type: Option<ColumnType> = serde_json::from_value(column_type)?;
            Ok((name, column_type))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification() -> Classification {
        vec![
            ("sample_id".to_string(), Some(ColumnType::Identifier)),
            ("condition".to_string(), Some(ColumnType::BiologicalFactor)),
            ("batch".to_string(), Some(ColumnType::TechnicalBlockingFactor)),
            ("age".to_string(), Some(ColumnType::OtherCovariate)),
            ("genotype".to_string(), Some(ColumnType::BiologicalFactor)),
            ("lane".to_string(), Some(ColumnType::TechnicalBlockingFactor)),
            ("fastq_1".to_string(), Some(ColumnType::ForwardFileUrl)),
            ("rin".to_string(), Some(ColumnType::QcOnly)),
            ("notes".to_string(), None),
        ]
    }

    #[test]
    fn test_formula_columns_filters_types() {
        let columns = formula_columns(&classification());
        let names: Vec<&str> = columns.iter().map(|c| c.column_name.as_str()).collect();
        assert_eq!(names, vec!["condition", "batch", "age", "genotype", "lane"]);
    }

    #[test]
    fn test_formula_term_order() {
        let columns = formula_columns(&classification());
        let selection = FormulaSelection::new()
            .select_primary("condition")
            .toggle_covariate("genotype")
            .toggle_covariate("age")
            .toggle_covariate("lane")
            .toggle_covariate("batch");

        assert_eq!(
            generate_formula(&columns, &selection).as_deref(),
            Some("~ lane + batch + age + genotype + condition")
        );
    }

    #[test]
    fn test_no_primary_no_formula() {
        let columns = formula_columns(&classification());
        let selection = FormulaSelection::new().toggle_covariate("batch");
        assert_eq!(generate_formula(&columns, &selection), None);
        assert!(!selection.is_valid());
    }

    #[test]
    fn test_primary_only() {
        let columns = formula_columns(&classification());
        let selection = FormulaSelection::new().select_primary("condition");
        assert_eq!(
            generate_formula(&columns, &selection).as_deref(),
            Some("~ condition")
        );
        assert!(selection.is_valid());
    }

    #[test]
    fn test_selecting_primary_removes_covariate() {
        let selection = FormulaSelection::new()
            .toggle_covariate("batch")
            .toggle_covariate("condition")
            .select_primary("condition");

        assert_eq!(selection.primary(), Some("condition"));
        assert_eq!(selection.covariates(), &["batch".to_string()]);
    }

    #[test]
    fn test_toggle_is_symmetric_and_spares_primary() {
        let selection = FormulaSelection::new().select_primary("condition");
        let toggled = selection.toggle_covariate("batch").toggle_covariate("batch");
        assert_eq!(toggled, selection);

        let unchanged = selection.toggle_covariate("condition");
        assert_eq!(unchanged.primary(), Some("condition"));
        assert!(unchanged.covariates().is_empty());
    }

    #[test]
    fn test_unknown_covariate_is_omitted() {
        let columns = formula_columns(&classification());
        let selection = FormulaSelection::new()
            .select_primary("condition")
            .toggle_covariate("rin")
            .toggle_covariate("batch");
        assert_eq!(
            generate_formula(&columns, &selection).as_deref(),
            Some("~ batch + condition")
        );
    }

    #[test]
    fn test_parse_classification_keeps_order() {
        let parsed = parse_classification(
            r#"{"sample": "IDENTIFIER", "tissue": "BIOLOGICAL_FACTOR", "x": null, "batch": "TECHNICAL_BLOCKING_FACTOR"}"#,
        )
        .unwrap();
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[1], ("tissue".to_string(), Some(ColumnType::BiologicalFactor)));
        assert_eq!(parsed[2].1, None);
        assert_eq!(parsed[3].0, "batch");
    }

    #[test]
    fn test_parse_classification_rejects_unknown_type() {
        assert!(parse_classification(r#"{"a": "FACTOR"}"#).is_err());
        assert!(parse_classification("[]").is_err());
    }
}
