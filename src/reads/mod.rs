//! Sequencing read-run validation and selection.
//!
//! Read runs come back from the sequence archive as loosely typed rows.
//! This module decides which rows are selectable, which filters a workflow
//! step implies, what to warn about once rows are selected, and how the
//! selection is written into the workflow configuration.
//!
//! - [`validation`]: Per-run layout and FASTQ-count checks
//! - [`filters`]: Pre-selection filters from a step and its data requirements
//! - [`warnings`]: Advisory mismatch warnings and the pre-selection reconcile step
//! - [`selection`]: Selection by accession and the configured read collections
//! - [`query`]: Accession parsing and archive search
//!
//! ## Example
//!
//! ```rust
//! use assembly_config::core::read_run::BaseReadRun;
//! use assembly_config::reads::validation::normalize;
//!
//! let runs = normalize(vec![BaseReadRun {
//!     run_accession: "SRR000001".to_string(),
//!     library_layout: "PAIRED".to_string(),
//!     fastq_ftp: "a_1.fastq.gz".to_string(),
//!     ..Default::default()
//! }]);
//!
//! assert!(!runs[0].is_valid());
//! assert_eq!(
//!     runs[0].validation.error.as_deref(),
//!     Some("\"PAIRED\" run must have exactly 2 FASTQ files, found 1.")
//! );
//! ```

pub mod filters;
pub mod query;
pub mod selection;
pub mod validation;
pub mod warnings;
