//! Command-line interface for assembly-config.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **tracks**: Resolve the track hierarchy of an assembly
//! - **verify**: Check a local file against the assembly's checksum manifest
//! - **reads**: Validate read runs and reconcile a selection with a workflow
//! - **formula**: Derive a design formula from a classified sample sheet
//! - **contrasts**: Build contrasts for the primary factor's levels
//!
//! ## Usage
//!
//! ```text
//! # Track tree with checksums
//! assembly-config tracks GCF_000001405.40
//!
//! # JSON output for scripting
//! assembly-config tracks GCF_000001405.40 --format json
//!
//! # Validate runs from the archive and preview a paired-end selection
//! assembly-config reads --accessions SRR000001,SRR000002 --step paired --select SRR000001
//!
//! # Design formula
//! assembly-config formula --classification columns.json --primary condition --covariate batch
//!
//! # Explicit contrasts
//! assembly-config contrasts --levels control,treated,mock --mode explicit --pair control:treated
//! ```

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    Endpoints, DEFAULT_CHECKSUM_TIMEOUT_SECS, DEFAULT_DOWNLOAD_BASE, DEFAULT_FILES_API,
    DEFAULT_SEARCH_API, DEFAULT_TRACKS_API,
};

pub mod contrasts;
pub mod formula;
pub mod reads;
pub mod tracks;
pub mod verify;

#[derive(Parser)]
#[command(name = "assembly-config")]
#[command(author)]
#[command(version)]
#[command(about = "Build validated workflow configuration for genome assemblies")]
#[command(
    long_about = "assembly-config turns genome-browser track lists, sequence-archive read runs and classified sample sheets into workflow configuration.\n\nIt provides:\n- Track hierarchies with resolved download URLs and MD5 checksums\n- Read-run validation and selection warnings against workflow requirements\n- Design formulas and contrasts for differential analysis"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the track hierarchy of an assembly
    Tracks(tracks::TracksArgs),

    /// Verify a downloaded file against the assembly's checksum manifest
    Verify(verify::VerifyArgs),

    /// Validate read runs and reconcile a selection with a workflow step
    Reads(reads::ReadsArgs),

    /// Derive a design formula from column classifications
    Formula(formula::FormulaArgs),

    /// Build contrasts over the levels of the primary factor
    Contrasts(contrasts::ContrastsArgs),
}

/// External service endpoints, overridable from the environment
#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// Track-list API
    #[arg(long, env = "ASSEMBLY_CONFIG_TRACKS_API", default_value = DEFAULT_TRACKS_API)]
    pub tracks_api: String,

    /// Files-listing API
    #[arg(long, env = "ASSEMBLY_CONFIG_FILES_API", default_value = DEFAULT_FILES_API)]
    pub files_api: String,

    /// Download host for track data and manifests
    #[arg(long, env = "ASSEMBLY_CONFIG_DOWNLOAD_BASE", default_value = DEFAULT_DOWNLOAD_BASE)]
    pub download_base: String,

    /// Sequence archive search API
    #[arg(long, env = "ASSEMBLY_CONFIG_SEARCH_API", default_value = DEFAULT_SEARCH_API)]
    pub search_api: String,

    /// Seconds allowed for checksum manifest acquisition
    #[arg(
        long,
        env = "ASSEMBLY_CONFIG_CHECKSUM_TIMEOUT",
        default_value_t = DEFAULT_CHECKSUM_TIMEOUT_SECS
    )]
    pub checksum_timeout: u64,
}

impl EndpointArgs {
    /// Validated endpoint configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any endpoint is not an http(s) URL or the timeout is zero.
    pub fn to_endpoints(&self) -> anyhow::Result<Endpoints> {
        let endpoints = Endpoints {
            tracks_api: self.tracks_api.clone(),
            files_api: self.files_api.clone(),
            download_base: self.download_base.clone(),
            search_api: self.search_api.clone(),
            checksum_timeout: Duration::from_secs(self.checksum_timeout),
        };
        endpoints.validate()?;
        Ok(endpoints)
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Run a future to completion on a fresh multi-threaded runtime
pub(crate) fn block_on<F: std::future::Future>(future: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(future))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_author_is_package_author() {
        let command = Cli::command();
        assert_eq!(command.get_author(), Some(env!("CARGO_PKG_AUTHORS")));
        assert_eq!(command.get_author(), Some("BRC Analytics"));
    }
}
