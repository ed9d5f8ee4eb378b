//! End-to-end tests of the offline CLI commands

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const ASSEMBLY: &str = "GCF_000001405.40";
const HELLO_MD5: &str = "b1946ac92492d2347c6235b4d2611184";

fn cmd() -> Command {
    Command::cargo_bin("assembly-config").unwrap()
}

fn json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn classification() -> NamedTempFile {
    json_file(
        r#"{
            "sample": "IDENTIFIER",
            "condition": "BIOLOGICAL_FACTOR",
            "batch": "TECHNICAL_BLOCKING_FACTOR",
            "age": "OTHER_COVARIATE",
            "fastq_1": "FORWARD_FILE_URL",
            "notes": null
        }"#,
    )
}

fn read_runs() -> NamedTempFile {
    json_file(
        r#"[
            {"run_accession": "SRR1", "library_layout": "PAIRED", "library_strategy": "WGS",
             "fastq_ftp": "a_1.fq.gz;a_2.fq.gz", "fastq_md5": "m1;m2", "tax_id": "9606"},
            {"run_accession": "SRR2", "library_layout": "SINGLE", "library_strategy": "WGS",
             "fastq_ftp": "b.fq.gz", "fastq_md5": "m3", "tax_id": "9606"},
            {"run_accession": "SRR3", "library_layout": "SINGLE", "library_strategy": "WGS",
             "fastq_ftp": "c_1.fq.gz;c_2.fq.gz", "tax_id": "9606"}
        ]"#,
    )
}

#[test]
fn test_formula_text() {
    let file = classification();
    cmd()
        .args(["formula", "--classification"])
        .arg(file.path())
        .args(["--primary", "condition", "--covariate", "age,batch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Formula: ~ batch + age + condition"));
}

#[test]
fn test_formula_json_without_primary() {
    let file = classification();
    cmd()
        .args(["--format", "json", "formula", "--classification"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"formula\": null"))
        .stdout(predicate::str::contains("\"valid\": false"));
}

#[test]
fn test_formula_rejects_non_formula_primary() {
    let file = classification();
    cmd()
        .args(["formula", "--classification"])
        .arg(file.path())
        .args(["--primary", "sample"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a formula column"));
}

#[test]
fn test_contrasts_all_against_all() {
    cmd()
        .args(["--format", "json", "contrasts", "--levels", "treated,control"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"ALL_AGAINST_ALL\""))
        .stdout(predicate::str::contains("\"disabled\": false"));
}

#[test]
fn test_contrasts_need_two_levels() {
    cmd()
        .args(["contrasts", "--levels", "control"])
        .assert()
        .success()
        .stdout(predicate::str::contains("At least two levels are required"))
        .stdout(predicate::str::contains("Ready:  no"));
}

#[test]
fn test_contrasts_explicit_pairs() {
    cmd()
        .args([
            "--format",
            "tsv",
            "contrasts",
            "--levels",
            "control,treated,mock",
            "--mode",
            "explicit",
            "--pair",
            "control:treated",
            "--pair",
            "treated:control",
            "--pair",
            "mock:control",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("EXPLICIT\tcontrol\ttreated"))
        .stdout(predicate::str::contains("EXPLICIT\tmock\tcontrol"))
        .stdout(predicate::str::contains("EXPLICIT\ttreated\tcontrol").not());
}

#[test]
fn test_contrasts_baseline_from_sample_sheet() {
    let sheet = json_file(
        r#"[
            {"sample": "s1", "condition": "control"},
            {"sample": "s2", "condition": "treated"},
            {"sample": "s3", "condition": "mock"},
            {"sample": "s4", "condition": "treated"}
        ]"#,
    );
    cmd()
        .args(["contrasts", "--sample-sheet"])
        .arg(sheet.path())
        .args([
            "--factor",
            "condition",
            "--mode",
            "baseline",
            "--baseline",
            "control",
            "--compare",
            "treated,mock",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Levels: control, mock, treated"))
        .stdout(predicate::str::contains("treated vs control"))
        .stdout(predicate::str::contains("Ready:  yes"));
}

#[test]
fn test_contrasts_unknown_level() {
    cmd()
        .args([
            "contrasts",
            "--levels",
            "a,b",
            "--mode",
            "baseline",
            "--baseline",
            "c",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown level 'c'"));
}

#[test]
fn test_reads_validation_and_warnings() {
    let file = read_runs();
    cmd()
        .args(["reads", "--input"])
        .arg(file.path())
        .args(["--step", "single", "--select", "SRR1,SRR3", "--genome-taxonomy-id", "9606"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"SINGLE\" run must have exactly 1 FASTQ file, found 2.",
        ))
        .stdout(predicate::str::contains("library_layout: SINGLE"))
        .stdout(predicate::str::contains(
            "Warning: Library layout mismatch: expected SINGLE, but PAIRED selected",
        ))
        .stdout(predicate::str::contains("Rejected SRR3"))
        .stdout(predicate::str::contains("Species mismatch").not());
}

#[test]
fn test_reads_any_step_has_no_requirement_warnings() {
    let file = json_file(
        r#"[{"run_accession": "SRR1", "library_layout": "SINGLE", "library_strategy": "RNA-Seq",
             "fastq_ftp": "a.fq.gz", "tax_id": "9606"}]"#,
    );
    cmd()
        .args(["reads", "--input"])
        .arg(file.path())
        .args(["--step", "any", "--select", "SRR1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(none)"))
        .stdout(predicate::str::contains("Warning").not());
}

#[test]
fn test_reads_discarded_preselection_has_no_requirement_warnings() {
    let file = json_file(
        r#"[{"run_accession": "SRR1", "library_layout": "PAIRED", "library_strategy": "RNA-Seq",
             "fastq_ftp": "a_1.fq.gz;a_2.fq.gz", "tax_id": "9606"}]"#,
    );
    cmd()
        .args(["reads", "--input"])
        .arg(file.path())
        .args(["--step", "paired", "--select", "SRR1", "--genome-taxonomy-id", "9606"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(none)"))
        .stdout(predicate::str::contains("Warning").not());
}

#[test]
fn test_reads_missing_column_value_warns() {
    let file = json_file(
        r#"[
            {"run_accession": "SRR1", "library_layout": "SINGLE", "library_strategy": "WGS",
             "library_source": "GENOMIC", "fastq_ftp": "a.fq.gz", "tax_id": "9606"},
            {"run_accession": "SRR2", "library_layout": "SINGLE", "library_strategy": "WGS",
             "library_source": null, "fastq_ftp": "b.fq.gz", "tax_id": "9606"}
        ]"#,
    );
    let parameter =
        json_file(r#"{"key": "reads", "data_requirements": {"library_source": ["GENOMIC"]}}"#);
    cmd()
        .args(["reads", "--input"])
        .arg(file.path())
        .args(["--step", "single", "--select", "SRR2", "--parameter"])
        .arg(parameter.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("library_source: GENOMIC"))
        .stdout(predicate::str::contains(
            "Warning: Library source mismatch: expected GENOMIC, but (missing) selected",
        ));
}

#[test]
fn test_reads_json_configured_reads() {
    let file = read_runs();
    cmd()
        .args(["--format", "json", "reads", "--input"])
        .arg(file.path())
        .args(["--select", "SRR1", "--select", "SRR2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"readRunsPaired\""))
        .stdout(predicate::str::contains("\"md5Hashes\": \"m1;m2\""))
        .stdout(predicate::str::contains("\"isValid\": false"));
}

#[test]
fn test_reads_requires_a_source() {
    cmd().arg("reads").assert().failure();
}

#[test]
fn test_verify_with_local_manifest() {
    let mut data = NamedTempFile::new().unwrap();
    data.write_all(b"hello\n").unwrap();

    let mut manifest = NamedTempFile::new().unwrap();
    writeln!(manifest, "{HELLO_MD5}  ./bbi/{ASSEMBLY}.gc.bw").unwrap();

    let url = format!(
        "https://hgdownload.soe.ucsc.edu/hubs/GCF/000/001/405/{ASSEMBLY}/bbi/{ASSEMBLY}.gc.bw"
    );

    cmd()
        .args(["verify", ASSEMBLY, &url])
        .arg(data.path())
        .arg("--manifest")
        .arg(manifest.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Status:   OK"));
}

#[test]
fn test_verify_mismatch_fails() {
    let mut data = NamedTempFile::new().unwrap();
    data.write_all(b"goodbye\n").unwrap();

    let mut manifest = NamedTempFile::new().unwrap();
    writeln!(manifest, "{HELLO_MD5}  bbi/track.bb").unwrap();

    let url = format!("https://hgdownload.soe.ucsc.edu/hubs/x/{ASSEMBLY}/bbi/track.bb");

    cmd()
        .args(["verify", ASSEMBLY, &url])
        .arg(data.path())
        .arg("--manifest")
        .arg(manifest.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("MISMATCH"))
        .stderr(predicate::str::contains("Checksum mismatch"));
}

#[test]
fn test_tracks_rejects_invalid_endpoint() {
    cmd()
        .args(["tracks", ASSEMBLY, "--tracks-api", "ftp://example.org/tracks"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid URL for tracks API"));
}
