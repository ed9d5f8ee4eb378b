//! # assembly-config
//!
//! A library for turning loosely typed genome-browser and sequence-archive
//! data into validated analysis-workflow configuration for a genome
//! assembly.
//!
//! External catalogs return flat, weakly typed records. Before a workflow
//! can run, those records need to become something a workflow engine can
//! trust: a track tree with resolved download URLs and checksums, a set of
//! read runs whose layout matches their FASTQ files, and an experimental
//! design expressed as a formula plus contrasts.
//!
//! ## Features
//!
//! - **Track hierarchy**: Rebuilds composite/leaf track trees from the flat
//!   track-list payload and attaches MD5 checksums from the assembly manifest
//! - **Degraded checksums**: A missing or slow manifest never fails track
//!   resolution; tracks simply come back without checksums
//! - **Read-run validation**: Exact layout vs. FASTQ-count checks with a
//!   per-run reason
//! - **Selection reconciliation**: Pre-selection filters from workflow data
//!   requirements and advisory mismatch warnings
//! - **Design formula**: Fixed term ordering over classified sample-sheet
//!   columns
//! - **Contrasts**: All-against-all, baseline and de-duplicated explicit pairs
//!
//! ## Example
//!
//! ```rust
//! use assembly_config::design::contrast::ContrastPairs;
//! use assembly_config::PrimaryContrasts;
//!
//! let mut pairs = ContrastPairs::new();
//! pairs.update_pair(0, 0, "control");
//! pairs.update_pair(0, 1, "treated");
//!
//! let contrasts = pairs.build().unwrap();
//! assert!(matches!(contrasts, PrimaryContrasts::Explicit { .. }));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Shared data types for tracks, read runs and design enums
//! - [`parsing`]: Parsers for checksum manifests, track lists and read-run rows
//! - [`tracks`]: Track hierarchy resolution and checksum acquisition
//! - [`reads`]: Read-run validation, filters, warnings and selection
//! - [`design`]: Design formula and contrast engines
//! - [`http`]: Async fetch abstraction shared by the network layers
//! - [`config`]: Endpoint configuration
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod design;
pub mod http;
pub mod parsing;
pub mod reads;
pub mod tracks;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::Endpoints;
pub use core::read_run::{BaseReadRun, ConfiguredReads, ReadRun, SequencingReads, Validation};
pub use core::track::{TrackCatalog, TrackGroup, TrackNode};
pub use core::types::*;
pub use design::contrast::{ContrastPairs, ContrastState, PrimaryContrasts};
pub use design::formula::{FormulaColumn, FormulaSelection};
pub use parsing::checksum::ChecksumMap;
pub use tracks::resolver::TrackResolver;
pub use tracks::TrackError;
