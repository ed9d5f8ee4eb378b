//! Experimental design derivation.
//!
//! Turns a classified sample sheet into the two values a differential
//! analysis needs: a design formula and the contrasts to test.
//!
//! - [`formula`]: Column classification, primary factor and covariate
//!   selection, formula rendering
//! - [`contrast`]: All-against-all, baseline and explicit-pair contrasts
//!
//! ## Example
//!
//! ```rust
//! use assembly_config::core::types::ColumnType;
//! use assembly_config::design::formula::{formula_columns, generate_formula, FormulaSelection};
//!
//! let classification = vec![
//!     ("condition".to_string(), Some(ColumnType::BiologicalFactor)),
//!     ("batch".to_string(), Some(ColumnType::TechnicalBlockingFactor)),
//! ];
//! let columns = formula_columns(&classification);
//! let selection = FormulaSelection::new()
//!     .select_primary("condition")
//!     .toggle_covariate("batch");
//!
//! assert_eq!(
//!     generate_formula(&columns, &selection).as_deref(),
//!     Some("~ batch + condition")
//! );
//! ```

pub mod contrast;
pub mod formula;
