use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde_json::Value;

use crate::cli::{block_on, EndpointArgs, OutputFormat};
use crate::core::read_run::{BaseReadRun, ConfiguredReads, ReadRun};
use crate::core::types::SequencingDataType;
use crate::http::HttpFetcher;
use crate::parsing::read_run::parse_read_runs_file;
use crate::reads::filters::{requirement_match_count, ColumnFilter, WorkflowParameter};
use crate::reads::query::{fetch_read_runs, parse_accession_list, SearchTarget};
use crate::reads::selection::{configured_reads, select_runs};
use crate::reads::validation::normalize;
use crate::reads::warnings::reconcile;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Step {
    Paired,
    Single,
    Any,
}

impl From<Step> for SequencingDataType {
    fn from(step: Step) -> Self {
        match step {
            Step::Paired => Self::ReadRunsPaired,
            Step::Single => Self::ReadRunsSingle,
            Step::Any => Self::ReadRunsAny,
        }
    }
}

#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("source")
        .required(true)
        .args(["input", "accessions", "taxonomy_id"])
))]
pub struct ReadsArgs {
    /// JSON file of read-run rows as returned by the archive search
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Comma- or whitespace-separated run, experiment, sample or study accessions
    #[arg(long)]
    pub accessions: Option<String>,

    /// Fetch every run under this taxonomy ID
    #[arg(long)]
    pub taxonomy_id: Option<String>,

    /// Workflow step collecting the reads
    #[arg(long, value_enum, default_value = "any")]
    pub step: Step,

    /// Workflow parameter JSON (one parameter, or the workflow's parameter list)
    #[arg(long)]
    pub parameter: Option<PathBuf>,

    /// Run accessions to select
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Taxonomy ID of the assembly, for the species check
    #[arg(long)]
    pub genome_taxonomy_id: Option<String>,

    #[command(flatten)]
    pub endpoints: EndpointArgs,
}

pub fn run(args: ReadsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let step = SequencingDataType::from(args.step);
    let parameter = match &args.parameter {
        Some(path) => load_parameter(path, step)?,
        None => None,
    };

    let runs = normalize(load_runs(&args)?);
    let base_runs = || runs.iter().map(|r| &r.run);

    let selection = select_runs(&runs, &args.select);
    let selected: Vec<&BaseReadRun> = selection.selected.iter().map(|r| &r.run).collect();
    let reconciled = reconcile(
        base_runs(),
        &selected,
        step,
        parameter.as_ref(),
        args.genome_taxonomy_id.as_deref(),
    );
    let (filters, warnings) = (reconciled.filters, reconciled.warnings);
    let matching = requirement_match_count(base_runs(), &filters);
    let configured = configured_reads(&selection.selected);

    if verbose {
        let valid = runs.iter().filter(|r| r.is_valid()).count();
        eprintln!("{} read runs ({valid} selectable)", runs.len());
    }

    match format {
        OutputFormat::Text => {
            print_text_runs(&runs);
            print_text_filters(&filters, matching);
            print_text_selection(&selection.rejected, &warnings, &configured);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "runs": runs,
                "filters": filters,
                "matching_runs": matching,
                "rejected": selection
                    .rejected
                    .iter()
                    .map(|(accession, reason)| serde_json::json!({
                        "accession": accession,
                        "reason": reason,
                    }))
                    .collect::<Vec<_>>(),
                "warnings": warnings,
                "configured": configured,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => print_tsv_runs(&runs, &args.select),
    }

    Ok(())
}

fn load_runs(args: &ReadsArgs) -> anyhow::Result<Vec<BaseReadRun>> {
    if let Some(path) = &args.input {
        return Ok(parse_read_runs_file(path)?);
    }

    let target = match (&args.accessions, &args.taxonomy_id) {
        (Some(text), _) => SearchTarget::Accessions(parse_accession_list(text)?),
        (None, Some(id)) => SearchTarget::Taxonomy(id.clone()),
        (None, None) => anyhow::bail!("One of --input, --accessions or --taxonomy-id is required"),
    };

    let endpoints = args.endpoints.to_endpoints()?;
    let fetcher = HttpFetcher::new()?;
    Ok(block_on(fetch_read_runs(&fetcher, &endpoints.search_api, &target))??)
}

/// Load one parameter, or pick the step's parameter out of a list by variable
fn load_parameter(
    path: &Path,
    step: SequencingDataType,
) -> anyhow::Result<Option<WorkflowParameter>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    if !value.is_array() {
        return Ok(Some(serde_json::from_value(value)?));
    }

    let parameters: Vec<WorkflowParameter> = serde_json::from_value(value)?;
    let Some(variable) = step.parameter_variable() else {
        return Ok(None);
    };
    Ok(parameters
        .into_iter()
        .find(|p| p.variable.as_deref() == Some(variable)))
}

fn print_text_runs(runs: &[ReadRun]) {
    println!("Read Runs");
    println!("{}", "=".repeat(60));
    for run in runs {
        let status = if run.is_valid() {
            "ok".to_string()
        } else {
            run.validation.error.clone().unwrap_or_default()
        };
        println!(
            "  {:<14} {:<8} {:<10} {}",
            run.run_accession, run.library_layout, run.library_strategy, status
        );
    }
}

fn print_text_filters(filters: &[ColumnFilter], matching: usize) {
    println!("\nPre-selection filters:");
    if filters.is_empty() {
        println!("  (none)");
        return;
    }
    for filter in filters {
        println!("  {}: {}", filter.column, filter.values.join(" OR "));
    }
    println!("  {matching} runs match");
}

fn print_text_selection(
    rejected: &[(String, String)],
    warnings: &[String],
    configured: &ConfiguredReads,
) {
    if configured.selected_count() == 0 && rejected.is_empty() {
        return;
    }

    println!("\nSelection: {} runs", configured.selected_count());
    for (accession, reason) in rejected {
        println!("  Rejected {accession}: {reason}");
    }
    for warning in warnings {
        println!("  Warning: {warning}");
    }
}

fn print_tsv_runs(runs: &[ReadRun], selected: &[String]) {
    println!("run_accession\tlibrary_layout\tfastq_count\tvalid\tselected\terror");
    for run in runs {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            run.run_accession,
            run.library_layout,
            run.fastq_urls().len(),
            run.is_valid(),
            selected.contains(&run.run_accession),
            run.validation.error.as_deref().unwrap_or("")
        );
    }
}
