use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Endpoints;
use crate::core::track::TrackCatalog;
use crate::http::{url_with_query, Fetch};
use crate::parsing::checksum::{parse_manifest, ChecksumMap};
use crate::parsing::ParseError;
use crate::tracks::resolver::TrackResolver;
use crate::tracks::TrackError;

const MANIFEST_FILE_NAME: &str = "md5sum.txt";

/// Why checksum acquisition fell back to an empty manifest
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DegradedReason {
    #[error("Error querying files API: {0}")]
    FilesListingUnavailable(String),

    #[error("Could not find md5sum.txt in files listing")]
    ManifestNotListed,

    #[error("Error fetching md5sum.txt: {0}")]
    ManifestUnavailable(String),

    #[error("Timed out fetching checksums")]
    TimedOut,
}

#[derive(Debug, Deserialize)]
struct FilesListing {
    #[serde(rename = "urlList", default)]
    url_list: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    url: String,
}

/// Fetch and decode the raw track-list payload for `assembly`
///
/// # Errors
///
/// Returns `TrackError::Status` for a non-success response, `TrackError::Fetch`
/// for transport failures, or `TrackError::Payload` if the body is not JSON.
pub async fn fetch_track_payload<F: Fetch>(
    fetcher: &F,
    endpoints: &Endpoints,
    assembly: &str,
) -> Result<Value, TrackError> {
    let url = url_with_query(&endpoints.tracks_api, &[("genome", assembly)])?;
    let body = fetcher.get_text(&url).await?;
    serde_json::from_str(&body).map_err(|e| TrackError::Payload(ParseError::Json(e)))
}

/// Locate, download and parse the checksum manifest of `assembly`.
///
/// The whole acquisition is bounded by `endpoints.checksum_timeout`.
///
/// # Errors
///
/// Returns the `DegradedReason` describing which step failed. Callers are
/// expected to continue with an empty map.
pub async fn fetch_checksums<F: Fetch>(
    fetcher: &F,
    endpoints: &Endpoints,
    assembly: &str,
) -> Result<ChecksumMap, DegradedReason> {
    let acquisition = fetch_checksums_unbounded(fetcher, endpoints, assembly);
    let checksums = tokio::time::timeout(endpoints.checksum_timeout, acquisition)
        .await
        .map_err(|_| DegradedReason::TimedOut)??;

    tracing::info!(
        assembly = %assembly,
        "Loaded {} MD5 checksums from {MANIFEST_FILE_NAME}",
        checksums.len()
    );
    Ok(checksums)
}

async fn fetch_checksums_unbounded<F: Fetch>(
    fetcher: &F,
    endpoints: &Endpoints,
    assembly: &str,
) -> Result<ChecksumMap, DegradedReason> {
    let listing_url = url_with_query(&endpoints.files_api, &[("genome", assembly)])
        .map_err(|e| DegradedReason::FilesListingUnavailable(e.to_string()))?;

    let body = fetcher
        .get_text(&listing_url)
        .await
        .map_err(|e| DegradedReason::FilesListingUnavailable(e.to_string()))?;

    let listing: FilesListing = serde_json::from_str(&body)
        .map_err(|e| DegradedReason::FilesListingUnavailable(e.to_string()))?;

    let manifest_url = listing
        .url_list
        .iter()
        .find(|entry| entry.url.ends_with(MANIFEST_FILE_NAME))
        .map(|entry| absolute_url(&entry.url, endpoints.download_base()))
        .ok_or(DegradedReason::ManifestNotListed)?;

    tracing::debug!(url = %manifest_url, "Fetching checksum manifest");

    let text = fetcher
        .get_text(&manifest_url)
        .await
        .map_err(|e| DegradedReason::ManifestUnavailable(e.to_string()))?;

    parse_manifest(&text).map_err(|e| DegradedReason::ManifestUnavailable(e.to_string()))
}

/// Resolve a files-listing URL against the download host
fn absolute_url(url: &str, download_base: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{download_base}/{}", url.trim_start_matches('/'))
    }
}

/// Fetch and resolve every track of `assembly`.
///
/// The track list and checksum manifest are requested concurrently. A
/// checksum failure is logged and leaves every leaf without an MD5; only a
/// track-list failure is returned as an error.
///
/// # Errors
///
/// Returns a `TrackError` if the track list cannot be fetched or is
/// structurally invalid, or if a track carries an unrecognized `bigDataUrl`.
pub async fn resolve_assembly_tracks<F: Fetch>(
    fetcher: &F,
    endpoints: &Endpoints,
    assembly: &str,
    with_checksums: bool,
) -> Result<TrackCatalog, TrackError> {
    let checksums = async {
        if !with_checksums {
            return None;
        }
        match fetch_checksums(fetcher, endpoints, assembly).await {
            Ok(checksums) => Some(checksums),
            Err(reason) => {
                tracing::warn!(assembly = %assembly, "{reason}");
                None
            }
        }
    };

    let (payload, checksums) =
        tokio::join!(fetch_track_payload(fetcher, endpoints, assembly), checksums);
    let payload = payload?;

    let checksums_available = checksums.is_some();
    let checksums = checksums.unwrap_or_default();

    let resolver = TrackResolver::new(assembly, &checksums, endpoints.download_base());
    let tracks = resolver.resolve(&payload)?;

    tracing::debug!(
        assembly = %assembly,
        roots = tracks.len(),
        "Resolved track hierarchy"
    );

    Ok(TrackCatalog {
        assembly: assembly.to_string(),
        resolved_at: chrono::Utc::now().to_rfc3339(),
        checksums_available,
        tracks,
    })
}
