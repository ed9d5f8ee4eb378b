use serde::{Deserialize, Serialize};

/// Library layout of a sequencing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LibraryLayout {
    Single,
    Paired,
}

impl LibraryLayout {
    /// Parse the archive's layout string. Matching is exact: `"paired"` is not a layout.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SINGLE" => Some(Self::Single),
            "PAIRED" => Some(Self::Paired),
            _ => None,
        }
    }

    /// Number of FASTQ files a run with this layout must carry
    #[must_use]
    pub fn expected_fastq_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Paired => 2,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Paired => "PAIRED",
        }
    }
}

impl std::fmt::Display for LibraryLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which kind of sequencing data a workflow step collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SequencingDataType {
    /// Paired-end read runs only
    ReadRunsPaired,
    /// Single-end read runs only
    ReadRunsSingle,
    /// Either layout; no pre-selection is applied
    ReadRunsAny,
}

impl SequencingDataType {
    /// Layout implied by the step key, if any
    #[must_use]
    pub fn layout(self) -> Option<LibraryLayout> {
        match self {
            Self::ReadRunsPaired => Some(LibraryLayout::Paired),
            Self::ReadRunsSingle => Some(LibraryLayout::Single),
            Self::ReadRunsAny => None,
        }
    }

    /// Workflow parameter variable that carries this step's data requirements
    #[must_use]
    pub fn parameter_variable(self) -> Option<&'static str> {
        match self {
            Self::ReadRunsPaired => Some("SANGER_READ_RUN_PAIRED"),
            Self::ReadRunsSingle => Some("SANGER_READ_RUN_SINGLE"),
            Self::ReadRunsAny => None,
        }
    }
}

/// Classification assigned to a sample sheet column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    /// Sample identifier
    Identifier,
    /// Biological variable (condition, genotype, tissue)
    BiologicalFactor,
    /// Technical/blocking variable (batch, lane)
    TechnicalBlockingFactor,
    /// Any other covariate (age, RIN)
    OtherCovariate,
    /// Forward read file location
    ForwardFileUrl,
    /// Reverse read file location
    ReverseFileUrl,
    /// Quality-control metric, never modelled
    QcOnly,
    /// Explicitly ignored
    Ignored,
}

impl ColumnType {
    /// Whether a column of this type may appear in a design formula
    #[must_use]
    pub fn is_formula_type(self) -> bool {
        matches!(
            self,
            Self::BiologicalFactor | Self::TechnicalBlockingFactor | Self::OtherCovariate
        )
    }
}

/// How primary contrasts are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContrastMode {
    /// Every level against every other level
    #[default]
    AllAgainstAll,
    /// Selected levels each against one reference level
    Baseline,
    /// User-specified pairs
    Explicit,
}

impl std::fmt::Display for ContrastMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllAgainstAll => write!(f, "ALL_AGAINST_ALL"),
            Self::Baseline => write!(f, "BASELINE"),
            Self::Explicit => write!(f, "EXPLICIT"),
        }
    }
}

/// Archive accession kind, named after the search field it is queried by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessionType {
    RunAccession,
    ExperimentAccession,
    SampleAccession,
    StudyAccession,
}

impl AccessionType {
    /// Search field name used in `<field> IN (...)` queries
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::RunAccession => "run_accession",
            Self::ExperimentAccession => "experiment_accession",
            Self::SampleAccession => "sample_accession",
            Self::StudyAccession => "study_accession",
        }
    }

    /// Classify an accession by its registry prefix
    #[must_use]
    pub fn classify(accession: &str) -> Option<Self> {
        let upper = accession.to_ascii_uppercase();
        let has_digits_after = |prefix: &str| {
            upper.len() > prefix.len()
                && upper[prefix.len()..].chars().all(|c| c.is_ascii_digit())
        };

        for prefix in ["SRR", "ERR", "DRR"] {
            if upper.starts_with(prefix) && has_digits_after(prefix) {
                return Some(Self::RunAccession);
            }
        }
        for prefix in ["SRX", "ERX", "DRX"] {
            if upper.starts_with(prefix) && has_digits_after(prefix) {
                return Some(Self::ExperimentAccession);
            }
        }
        for prefix in ["SAMEA", "SAMN", "SAMD", "SRS", "ERS", "DRS"] {
            if upper.starts_with(prefix) && has_digits_after(prefix) {
                return Some(Self::SampleAccession);
            }
        }
        for prefix in ["PRJEB", "PRJNA", "PRJDB", "SRP", "ERP", "DRP"] {
            if upper.starts_with(prefix) && has_digits_after(prefix) {
                return Some(Self::StudyAccession);
            }
        }
        None
    }
}
