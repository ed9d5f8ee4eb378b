use std::path::PathBuf;

use clap::Args;

use crate::cli::{block_on, EndpointArgs, OutputFormat};
use crate::http::HttpFetcher;
use crate::parsing::checksum::{parse_manifest_file, ChecksumMap};
use crate::tracks::client::fetch_checksums;
use crate::tracks::resolver::checksum_for_path;
use crate::utils::validation::md5_of_file;

#[derive(Args)]
pub struct VerifyArgs {
    /// Assembly accession the file belongs to
    #[arg(required = true)]
    pub assembly: String,

    /// Download URL of the file, as reported by `tracks`
    #[arg(required = true)]
    pub url: String,

    /// Local copy of the file
    #[arg(required = true)]
    pub file: PathBuf,

    /// Use a local md5sum.txt instead of fetching the assembly's manifest
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    #[command(flatten)]
    pub endpoints: EndpointArgs,
}

pub fn run(args: VerifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let checksums = load_checksums(&args)?;

    if verbose {
        eprintln!("Manifest: {} entries", checksums.len());
    }

    let expected = checksum_for_path(&args.url, &args.assembly, &checksums).ok_or_else(|| {
        anyhow::anyhow!(
            "No checksum for '{}' in the manifest of {}",
            args.url,
            args.assembly
        )
    })?;
    let actual = md5_of_file(&args.file)?;
    let matches = expected == actual;

    match format {
        OutputFormat::Text => {
            println!("File:     {}", args.file.display());
            println!("Expected: {expected}");
            println!("Actual:   {actual}");
            println!("Status:   {}", if matches { "OK" } else { "MISMATCH" });
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "file": args.file.display().to_string(),
                "url": args.url,
                "expected": expected,
                "actual": actual,
                "matches": matches,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("file\texpected\tactual\tmatches");
            println!("{}\t{expected}\t{actual}\t{matches}", args.file.display());
        }
    }

    if !matches {
        anyhow::bail!("Checksum mismatch for {}", args.file.display());
    }
    Ok(())
}

fn load_checksums(args: &VerifyArgs) -> anyhow::Result<ChecksumMap> {
    if let Some(path) = &args.manifest {
        return Ok(parse_manifest_file(path)?);
    }

    let endpoints = args.endpoints.to_endpoints()?;
    let fetcher = HttpFetcher::new()?;
    let checksums = block_on(fetch_checksums(&fetcher, &endpoints, &args.assembly))?
        .map_err(|reason| anyhow::anyhow!("Checksums unavailable: {reason}"))?;
    Ok(checksums)
}
