use crate::core::read_run::{BaseReadRun, ReadRun, Validation};
use crate::core::types::LibraryLayout;

/// Decide whether a read run can be selected.
///
/// A run is valid when it has FASTQ data, its layout is exactly `SINGLE`
/// or `PAIRED`, and the FASTQ count matches the layout (1 or 2). The FASTQ
/// count is the number of `;`-separated entries, empty entries included.
#[must_use]
pub fn validate_run(run: &BaseReadRun) -> Validation {
    if run.fastq_ftp.is_empty() {
        return Validation::invalid("FASTQ data is missing or invalid.");
    }

    let Some(layout) = run.layout() else {
        return Validation::invalid(format!(
            "Invalid library layout: \"{}\".",
            run.library_layout
        ));
    };

    let expected = layout.expected_fastq_count();
    let actual = run.fastq_urls().len();
    if actual == expected {
        Validation::valid()
    } else {
        Validation::invalid(fastq_count_error(layout, expected, actual))
    }
}

fn fastq_count_error(layout: LibraryLayout, expected: usize, actual: usize) -> String {
    let noun = if expected == 1 { "file" } else { "files" };
    format!("\"{layout}\" run must have exactly {expected} FASTQ {noun}, found {actual}.")
}

/// Attach a validation verdict to every row, preserving order
#[must_use]
pub fn normalize(rows: Vec<BaseReadRun>) -> Vec<ReadRun> {
    rows.into_iter()
        .map(|run| {
            let validation = validate_run(&run);
            ReadRun { run, validation }
        })
        .collect()
}
