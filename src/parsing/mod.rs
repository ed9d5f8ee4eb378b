//! Parsers for the loosely structured inputs the engines consume.
//!
//! This module provides parsers for:
//!
//! - **Checksum manifests**: `md5sum.txt`-style `<md5>  <path>` listings
//! - **Track-list payloads**: the genome browser's per-assembly track catalog
//! - **Read-run rows**: JSON arrays returned by the sequence archive's search API
//!
//! ## Example
//!
//! ```rust
//! use assembly_config::parsing::checksum::parse_manifest;
//!
//! let text = "6aef897c3d6ff0c78aff06ac189178dd  ./GCF_000002765.6.fa.gz\n";
//! let checksums = parse_manifest(text).unwrap();
//! assert_eq!(checksums.get("./GCF_000002765.6.fa.gz"), Some("6aef897c3d6ff0c78aff06ac189178dd"));
//! ```
//!
//! ## Track-list Schema
//!
//! Each track record is validated against a fixed set of optional string
//! fields. Any other property is ignored, except object-valued properties
//! carrying a `parent` key, which are child tracks of a composite.
//!
//! | Field | Description |
//! |-------|-------------|
//! | bigDataUrl | Server-internal path of the data file |
//! | compositeContainer | `"TRUE"` for composite tracks |
//! | group | Display/selection group |
//! | longLabel | Long display label |
//! | shortLabel | Short display label |
//! | type | Track type (e.g., `bigBed 12`) |

use thiserror::Error;

pub mod checksum;
pub mod read_run;
pub mod track_list;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Structural problem with an upstream payload; the message is user-facing as is
    #[error("{0}")]
    Payload(String),

    #[error("Too many manifest entries: {0} exceeds maximum allowed (1000000)")]
    TooManyEntries(usize),

    #[error("Too many read runs: {0} exceeds maximum allowed (500000)")]
    TooManyRuns(usize),
}
