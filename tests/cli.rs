//! Command-line behaviour of the `guidescan` binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

use guidescan::io::results;
use guidescan::score::ScoreMethod;

const GUIDE: &str = "GAGTCCGAGCAGAAGAAGA";
const SMALL_FASTA: &str = "tests/data/small.fa";

fn guidescan() -> Command {
    Command::cargo_bin("guidescan").unwrap()
}

fn run_search(out: &Path, method: &str) {
    guidescan()
        .args(["search", "--guide", GUIDE, "--fasta", SMALL_FASTA, "--score-method", method, "--out"])
        .arg(out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 hits to"));
}

#[test]
fn search_scores_with_each_method() {
    for (name, method) in [
        ("pw", ScoreMethod::Pw),
        ("mit", ScoreMethod::Mit),
        ("cfd", ScoreMethod::Cfd),
        ("cfd_full", ScoreMethod::CfdFull),
        ("cfd_table", ScoreMethod::CfdTable),
    ] {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results.csv");
        run_search(&out, name);

        let rows = results::read_results_file(&out).unwrap();
        assert_eq!(rows.len(), 3);
        for row in rows {
            let expected = method.score(GUIDE, &row.target_seq, "NGG", None).unwrap();
            assert!((row.score - expected).abs() < 1e-6, "{}", name);
        }
    }
}

#[test]
fn search_with_weight_table_file() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("table.json");
    let weights = vec!["0.5"; GUIDE.len()].join(",");
    std::fs::write(&table, format!(r#"{{"pos_weights": [{}], "sub_weights": {{"C>G": 0.2}}}}"#, weights)).unwrap();
    let out = dir.path().join("results.csv");

    guidescan()
        .args(["search", "--guide", GUIDE, "--fasta", SMALL_FASTA, "--score-method", "cfd_table", "--cfd-table"])
        .arg(&table)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let rows = results::read_results_file(&out).unwrap();
    let mutated = rows.iter().find(|r| r.mismatches == 1).unwrap();
    assert!((mutated.score - 90.0).abs() < 1e-6);
}

#[test]
fn pretty_table_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results.csv");

    guidescan()
        .args(["search", "--guide", GUIDE, "--fasta", SMALL_FASTA, "--pretty", "--manifest", "-t", "2", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("seq_id").and(predicate::str::contains("chr1_mut")));

    let manifest = std::fs::read_to_string(dir.path().join("results.csv.manifest.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(json["hits"], 3);
    assert_eq!(json["score_method"], "pw");
    assert_eq!(json["guide"], GUIDE);
}

#[test]
fn invalid_inputs_are_reported_together() {
    guidescan()
        .args(["search", "--guide", GUIDE, "--fasta", "tests/data/missing.fa", "--max-mismatches", "-1"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("does not exist")
                .and(predicate::str::contains("--max-mismatches must be non-negative")),
        );
}

#[test]
fn unknown_score_method_is_rejected() {
    guidescan()
        .args(["search", "--guide", GUIDE, "--fasta", SMALL_FASTA, "--score-method", "best"])
        .assert()
        .failure();
}

#[test]
fn summarize_adds_risk_columns() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results.csv");
    let human = dir.path().join("results_human.csv");
    run_search(&out, "cfd_full");

    guidescan()
        .arg("summarize")
        .arg(&out)
        .arg(&human)
        .assert()
        .success();

    let text = std::fs::read_to_string(&human).unwrap();
    let header = text.lines().next().unwrap();
    assert!(header.ends_with(",summary,risk_level"));
    assert_eq!(text.lines().filter(|l| l.ends_with(",high")).count(), 2);
}

#[test]
fn stats_describes_score_columns() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results.csv");
    run_search(&out, "pw");

    guidescan()
        .arg("stats")
        .arg(&out)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Summary statistics for 'score'")
                .and(predicate::str::contains("Summary statistics for 'score_cfd_full'"))
                .and(predicate::str::contains("count")),
        );
}
