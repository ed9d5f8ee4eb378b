//! Sequence archive search: accession parsing, query building and fetch.

use thiserror::Error;

use crate::core::read_run::BaseReadRun;
use crate::core::types::AccessionType;
use crate::http::{url_with_query, Fetch, FetchError};
use crate::parsing::read_run::parse_read_runs;
use crate::parsing::ParseError;

/// Fields requested for every read run
pub const SEARCH_FIELDS: &[&str] = &[
    "accession",
    "study_accession",
    "sample_accession",
    "experiment_accession",
    "run_accession",
    "tax_id",
    "scientific_name",
    "library_strategy",
    "library_source",
    "library_selection",
    "read_count",
    "base_count",
    "first_public",
    "last_updated",
    "collection_date",
    "study_title",
    "sample_title",
    "experiment_title",
    "instrument_model",
    "instrument_platform",
    "fastq_bytes",
    "fastq_ftp",
    "fastq_md5",
    "library_layout",
    "description",
];

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Unrecognized accession: {0}")]
    UnrecognizedAccession(String),

    #[error("Accession is required")]
    NoAccessions,

    #[error("Accessions were not found. Please check the IDs and try again.")]
    AccessionsNotFound,

    #[error("No sequencing data found for taxonomy ID {0}")]
    TaxonomyNotFound(String),

    #[error("ENA API request failed: {0}")]
    Request(#[from] FetchError),

    #[error("Invalid ENA API response: {0}")]
    Response(#[from] ParseError),
}

/// What to search the archive for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    /// Explicit accessions, each with its classified type
    Accessions(Vec<(String, AccessionType)>),
    /// Every run under a taxonomy ID, descendants included
    Taxonomy(String),
}

impl SearchTarget {
    /// Query expression for the search API
    #[must_use]
    pub fn query(&self) -> String {
        match self {
            Self::Accessions(accessions) => accession_query(accessions),
            Self::Taxonomy(id) => taxonomy_query(id),
        }
    }

    fn not_found(&self) -> QueryError {
        match self {
            Self::Accessions(_) => QueryError::AccessionsNotFound,
            Self::Taxonomy(id) => QueryError::TaxonomyNotFound(id.clone()),
        }
    }
}

/// Split free text on commas and whitespace and classify each accession
///
/// # Errors
///
/// Returns `QueryError::UnrecognizedAccession` for the first token that is
/// not a known accession, or `QueryError::NoAccessions` if `text` is blank.
pub fn parse_accession_list(text: &str) -> Result<Vec<(String, AccessionType)>, QueryError> {
    let accessions = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            AccessionType::classify(token)
                .map(|kind| (token.to_string(), kind))
                .ok_or_else(|| QueryError::UnrecognizedAccession(token.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if accessions.is_empty() {
        return Err(QueryError::NoAccessions);
    }
    Ok(accessions)
}

/// `<field> IN (<a>,<b>)` per accession type in first-seen order, joined with ` OR `
#[must_use]
pub fn accession_query(accessions: &[(String, AccessionType)]) -> String {
    let mut by_type: Vec<(AccessionType, Vec<&str>)> = Vec::new();
    for (accession, kind) in accessions {
        match by_type.iter_mut().find(|(k, _)| *k == *kind) {
            Some((_, list)) => list.push(accession.as_str()),
            None => by_type.push((*kind, vec![accession.as_str()])),
        }
    }

    by_type
        .iter()
        .map(|(kind, list)| format!("{} IN ({})", kind.field(), list.join(",")))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Query matching every run under `taxonomy_id`
#[must_use]
pub fn taxonomy_query(taxonomy_id: &str) -> String {
    format!("tax_tree({taxonomy_id})")
}

/// Full search URL for a query expression
///
/// # Errors
///
/// Returns `FetchError::InvalidUrl` if `endpoint` is not an absolute URL.
pub fn search_url(endpoint: &str, query: &str) -> Result<String, FetchError> {
    let fields = SEARCH_FIELDS.join(",");
    url_with_query(
        endpoint,
        &[
            ("result", "read_run"),
            ("query", query),
            ("fields", &fields),
            ("format", "json"),
        ],
    )
}

/// Search the archive and decode the matching read runs.
///
/// A single request is made; there is no retry.
///
/// # Errors
///
/// Returns `QueryError::Request` for transport or status failures,
/// `QueryError::Response` for an undecodable body, and
/// `QueryError::AccessionsNotFound` / `QueryError::TaxonomyNotFound` when
/// the archive returns no rows.
pub async fn fetch_read_runs<F: Fetch>(
    fetcher: &F,
    endpoint: &str,
    target: &SearchTarget,
) -> Result<Vec<BaseReadRun>, QueryError> {
    let url = search_url(endpoint, &target.query())?;
    tracing::debug!(url = %url, "Querying sequence archive");

    let body = fetcher.get_text(&url).await?;

    // The archive answers an empty search with an empty body
    if body.trim().is_empty() {
        return Err(target.not_found());
    }

    let runs = parse_read_runs(&body)?;
    if runs.is_empty() {
        return Err(target.not_found());
    }

    tracing::info!(count = runs.len(), "Fetched read runs");
    Ok(runs)
}
