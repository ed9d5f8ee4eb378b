use crate::core::read_run::{ConfiguredReads, ReadRun, SequencingReads};
use crate::core::types::{LibraryLayout, SequencingDataType};

/// Outcome of selecting runs by accession
#[derive(Debug, Default)]
pub struct Selection<'a> {
    /// Selected runs, in the order they were requested
    pub selected: Vec<&'a ReadRun>,

    /// Requested accessions that could not be selected, with the reason
    pub rejected: Vec<(String, String)>,
}

/// Select valid runs by run accession.
///
/// Invalid runs are never selectable; their validation error is reported
/// as the rejection reason. Duplicated accessions are selected once.
#[must_use]
pub fn select_runs<'a>(runs: &'a [ReadRun], accessions: &[String]) -> Selection<'a> {
    let mut selection = Selection::default();

    for accession in accessions {
        if selection
            .selected
            .iter()
            .any(|run| &run.run_accession == accession)
        {
            continue;
        }

        match runs.iter().find(|run| &run.run_accession == accession) {
            Some(run) if run.is_valid() => selection.selected.push(run),
            Some(run) => selection.rejected.push((
                accession.clone(),
                run.validation.error.clone().unwrap_or_default(),
            )),
            None => selection
                .rejected
                .push((accession.clone(), "Run not found in results.".to_string())),
        }
    }

    selection
}

/// Split selected runs by layout into the configured read collections.
///
/// A layout with no selected runs is `None`. Runs with an unrecognized
/// layout are skipped; they cannot have passed validation.
#[must_use]
pub fn configured_reads(selected: &[&ReadRun]) -> ConfiguredReads {
    let mut paired = Vec::new();
    let mut single = Vec::new();

    for run in selected {
        match run.layout() {
            Some(LibraryLayout::Paired) => paired.push(SequencingReads::from(&run.run)),
            Some(LibraryLayout::Single) => single.push(SequencingReads::from(&run.run)),
            None => {}
        }
    }

    ConfiguredReads {
        read_runs_paired: (!paired.is_empty()).then_some(paired),
        read_runs_single: (!single.is_empty()).then_some(single),
    }
}

/// Configuration meaning "the user will upload their own reads" for `step`
#[must_use]
pub fn upload_own_data(step: SequencingDataType) -> ConfiguredReads {
    match step {
        SequencingDataType::ReadRunsPaired => ConfiguredReads {
            read_runs_paired: Some(Vec::new()),
            read_runs_single: None,
        },
        SequencingDataType::ReadRunsSingle => ConfiguredReads {
            read_runs_paired: None,
            read_runs_single: Some(Vec::new()),
        },
        SequencingDataType::ReadRunsAny => ConfiguredReads {
            read_runs_paired: Some(Vec::new()),
            read_runs_single: Some(Vec::new()),
        },
    }
}

/// Run accessions already present in a configuration, paired first
#[must_use]
pub fn selected_accessions(configured: &ConfiguredReads) -> Vec<&str> {
    configured
        .read_runs_paired
        .iter()
        .chain(configured.read_runs_single.iter())
        .flatten()
        .map(|reads| reads.run_accession.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::read_run::BaseReadRun;
    use crate::reads::validation::normalize;

    fn runs() -> Vec<ReadRun> {
        normalize(vec![
            BaseReadRun {
                run_accession: "SRR1".to_string(),
                library_layout: "PAIRED".to_string(),
                fastq_ftp: "a_1.fq.gz;a_2.fq.gz".to_string(),
                fastq_md5: "m1;m2".to_string(),
                ..Default::default()
            },
            BaseReadRun {
                run_accession: "SRR2".to_string(),
                library_layout: "SINGLE".to_string(),
                fastq_ftp: "b.fq.gz".to_string(),
                fastq_md5: "m3".to_string(),
                ..Default::default()
            },
            BaseReadRun {
                run_accession: "SRR3".to_string(),
                library_layout: "PAIRED".to_string(),
                fastq_ftp: "c.fq.gz".to_string(),
                ..Default::default()
            },
        ])
    }

    fn accessions(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_select_runs() {
        let runs = runs();
        let selection = select_runs(&runs, &accessions(&["SRR2", "SRR3", "SRR9", "SRR2"]));

        assert_eq!(selection.selected.len(), 1);
        assert_eq!(selection.selected[0].run_accession, "SRR2");
        assert_eq!(selection.rejected.len(), 2);
        assert_eq!(
            selection.rejected[0].1,
            "\"PAIRED\" run must have exactly 2 FASTQ files, found 1."
        );
        assert_eq!(selection.rejected[1].0, "SRR9");
    }

    #[test]
    fn test_configured_reads_split_by_layout() {
        let runs = runs();
        let selection = select_runs(&runs, &accessions(&["SRR1", "SRR2"]));
        let configured = configured_reads(&selection.selected);

        let paired = configured.read_runs_paired.as_ref().unwrap();
        assert_eq!(paired.len(), 1);
        assert_eq!(paired[0].run_accession, "SRR1");
        assert_eq!(paired[0].urls, "a_1.fq.gz;a_2.fq.gz");
        assert_eq!(paired[0].md5_hashes, "m1;m2");

        let single = configured.read_runs_single.as_ref().unwrap();
        assert_eq!(single[0].run_accession, "SRR2");

        assert_eq!(selected_accessions(&configured), vec!["SRR1", "SRR2"]);
    }

    #[test]
    fn test_empty_layout_is_none() {
        let runs = runs();
        let selection = select_runs(&runs, &accessions(&["SRR1"]));
        let configured = configured_reads(&selection.selected);
        assert!(configured.read_runs_single.is_none());

        assert_eq!(configured_reads(&[]), ConfiguredReads::default());
    }

    #[test]
    fn test_upload_own_data() {
        let configured = upload_own_data(SequencingDataType::ReadRunsSingle);
        assert_eq!(configured.read_runs_single, Some(Vec::new()));
        assert!(configured.read_runs_paired.is_none());

        let configured = upload_own_data(SequencingDataType::ReadRunsAny);
        assert_eq!(configured.read_runs_paired, Some(Vec::new()));
        assert_eq!(configured.selected_count(), 0);
    }
}
