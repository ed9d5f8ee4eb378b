use clap::Args;

use crate::cli::{block_on, EndpointArgs, OutputFormat};
use crate::core::track::{TrackCatalog, TrackNode};
use crate::http::HttpFetcher;
use crate::tracks::client::resolve_assembly_tracks;
use crate::tracks::resolver::group_tracks;

#[derive(Args)]
pub struct TracksArgs {
    /// Assembly accession (e.g., GCF_000001405.40)
    #[arg(required = true)]
    pub assembly: String,

    /// Skip the checksum manifest
    #[arg(long)]
    pub no_checksums: bool,

    #[command(flatten)]
    pub endpoints: EndpointArgs,
}

pub fn run(args: TracksArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let endpoints = args.endpoints.to_endpoints()?;
    let fetcher = HttpFetcher::new()?;

    let catalog = block_on(resolve_assembly_tracks(
        &fetcher,
        &endpoints,
        &args.assembly,
        !args.no_checksums,
    ))??;

    if verbose {
        eprintln!(
            "Resolved {} root tracks ({} leaves, {} with MD5)",
            catalog.tracks.len(),
            catalog.leaf_count(),
            catalog.checksum_count()
        );
    }

    match format {
        OutputFormat::Text => print_text_tracks(&catalog),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog)?),
        OutputFormat::Tsv => print_tsv_tracks(&catalog),
    }

    Ok(())
}

fn print_text_tracks(catalog: &TrackCatalog) {
    println!("Tracks for {}", catalog.assembly);
    println!("{}", "=".repeat(60));
    if !catalog.checksums_available {
        println!("(checksums unavailable)");
    }

    for group in group_tracks(&catalog.tracks) {
        println!("\n[{}]", group.group_id);
        for node in &group.tracks {
            print_node(node, 1);
        }
    }

    println!(
        "\n{} leaves, {} with MD5",
        catalog.leaf_count(),
        catalog.checksum_count()
    );
}

fn print_node(node: &TrackNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = node.short_label().or(node.long_label()).unwrap_or("-");

    match node {
        TrackNode::Composite(composite) => {
            println!("{indent}+ {label}");
            for child in &composite.tracks {
                print_node(child, depth + 1);
            }
        }
        TrackNode::Leaf(leaf) => {
            println!("{indent}- {label}");
            println!("{indent}    {}", leaf.big_data_url);
            if let Some(md5) = &leaf.md5_hash {
                println!("{indent}    md5: {md5}");
            }
        }
    }
}

fn print_tsv_tracks(catalog: &TrackCatalog) {
    println!("group\tparent\tshort_label\ttype\tbig_data_url\tmd5");
    for node in &catalog.tracks {
        match node {
            TrackNode::Leaf(_) => print_tsv_leaf(node, "-"),
            TrackNode::Composite(composite) => {
                let parent = node.short_label().unwrap_or("-");
                for child in &composite.tracks {
                    print_tsv_leaf(child, parent);
                }
            }
        }
    }
}

fn print_tsv_leaf(node: &TrackNode, parent: &str) {
    for leaf in node.leaves() {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            leaf.group_id,
            parent,
            leaf.short_label.as_deref().unwrap_or("-"),
            leaf.track_type.as_deref().unwrap_or("-"),
            leaf.big_data_url,
            leaf.md5_hash.as_deref().unwrap_or("-"),
        );
    }
}
