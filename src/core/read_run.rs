use serde::{Deserialize, Deserializer, Serialize};

use crate::core::types::LibraryLayout;

/// One read-run record as returned by the sequence archive's search API.
///
/// The archive returns every field as a string and omits or nulls fields
/// freely, so decoding is lenient: missing strings become empty, counts
/// accept either numbers or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseReadRun {
    #[serde(default, deserialize_with = "lenient_string")]
    pub run_accession: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub experiment_accession: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub sample_accession: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub study_accession: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub library_layout: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub library_strategy: String,

    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub library_source: Option<String>,

    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub description: Option<String>,

    /// Semicolon-separated FASTQ locations
    #[serde(default, deserialize_with = "lenient_string")]
    pub fastq_ftp: String,

    /// Semicolon-separated FASTQ MD5s, parallel to `fastq_ftp`
    #[serde(default, deserialize_with = "lenient_string")]
    pub fastq_md5: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub submitted_ftp: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub instrument_model: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub instrument_platform: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub scientific_name: String,

    /// NCBI taxonomy ID of the sequenced organism
    #[serde(default, deserialize_with = "lenient_string")]
    pub tax_id: String,

    #[serde(default, deserialize_with = "lenient_count")]
    pub read_count: Option<u64>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub base_count: Option<u64>,
}

impl BaseReadRun {
    /// Value of a filterable column, by search-field name
    #[must_use]
    pub fn column_value(&self, column: &str) -> Option<String> {
        let value = match column {
            "run_accession" => self.run_accession.clone(),
            "experiment_accession" => self.experiment_accession.clone(),
            "sample_accession" => self.sample_accession.clone(),
            "study_accession" => self.study_accession.clone(),
            "library_layout" => self.library_layout.clone(),
            "library_strategy" => self.library_strategy.clone(),
            "library_source" => self.library_source.clone()?,
            "description" => self.description.clone()?,
            "fastq_ftp" => self.fastq_ftp.clone(),
            "instrument_model" => self.instrument_model.clone(),
            "instrument_platform" => self.instrument_platform.clone(),
            "scientific_name" => self.scientific_name.clone(),
            "tax_id" => self.tax_id.clone(),
            "read_count" => self.read_count?.to_string(),
            "base_count" => self.base_count?.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// FASTQ locations, split on `;`
    #[must_use]
    pub fn fastq_urls(&self) -> Vec<&str> {
        if self.fastq_ftp.is_empty() {
            return Vec::new();
        }
        self.fastq_ftp.split(';').collect()
    }

    /// Parsed layout, `None` for anything but the exact archive values
    #[must_use]
    pub fn layout(&self) -> Option<LibraryLayout> {
        LibraryLayout::parse(&self.library_layout)
    }
}

/// Whether a read run may be selected, and why not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Validation {
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }
}

/// A read run with its selection verdict attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRun {
    #[serde(flatten)]
    pub run: BaseReadRun,

    pub validation: Validation,
}

impl ReadRun {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid
    }
}

impl std::ops::Deref for ReadRun {
    type Target = BaseReadRun;

    fn deref(&self) -> &Self::Target {
        &self.run
    }
}

/// Selected run as persisted into the workflow configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencingReads {
    pub md5_hashes: String,
    pub run_accession: String,
    pub urls: String,
}

impl From<&BaseReadRun> for SequencingReads {
    fn from(run: &BaseReadRun) -> Self {
        Self {
            md5_hashes: run.fastq_md5.clone(),
            run_accession: run.run_accession.clone(),
            urls: run.fastq_ftp.clone(),
        }
    }
}

/// Read-run fields contributed to the workflow configuration.
///
/// `None` means "nothing selected for this layout"; an empty list means the
/// user will upload their own data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredReads {
    pub read_runs_paired: Option<Vec<SequencingReads>>,
    pub read_runs_single: Option<Vec<SequencingReads>>,
}

impl ConfiguredReads {
    /// Number of selected runs across both layouts
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.read_runs_paired.as_ref().map_or(0, Vec::len)
            + self.read_runs_single.as_ref().map_or(0, Vec::len)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_string(deserializer)?.unwrap_or_default())
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
