//! Batch output verification against the input log.

use std::fs;

use cmdtree::engine::{Matcher, RecordLayout};
use cmdtree::grammar::{GrammarCompiler, GrammarRow, RuleSet};
use cmdtree::runtime::{RecordWriter, VerificationReport};

const LOG: &str = "\
## lab switch
add syslog host 10.0.0.1
add   syslog host 10.0.0.2 port 514

set pair 1,2
set delay 5ms
";

fn rules() -> RuleSet {
    let rows = vec![
        GrammarRow::new("add", "syslog", "host <ip> [port <p>]"),
        GrammarRow::new("set", "pair", "<a>,<b>"),
        GrammarRow::new("", "delay", "<n>[ms]"),
    ];
    GrammarCompiler::default().compile_rows(&rows).rules
}

fn batch_output(log: &str) -> String {
    let set = rules();
    let batch = Matcher::new(&set).match_lines(log.lines());
    let mut writer = RecordWriter::new(Vec::new(), RecordLayout::Tokens, true);
    for record in batch.records() {
        writer.write(record).unwrap();
    }
    String::from_utf8(writer.finish().unwrap()).unwrap()
}

#[test]
fn batch_output_verifies_against_its_log() {
    let output = batch_output(LOG);
    let report = VerificationReport::check(LOG, &output, "##", true);

    assert_eq!(report.valid_lines, 4);
    assert_eq!(report.objects, 4);
    assert!(report.mismatches.is_empty());
    assert!(report.is_success());
    assert!(report.to_string().ends_with("verification successful"));
}

#[test]
fn unmatched_lines_make_counts_disagree() {
    let log = format!("{LOG}reboot now\n");
    let report = VerificationReport::check(&log, &batch_output(&log), "##", true);

    assert_eq!(report.valid_lines, 5);
    assert_eq!(report.objects, 4);
    assert!(!report.is_success());
}

#[test]
fn tampered_record_is_a_mismatch() {
    let output = batch_output(LOG).replacen("10.0.0.1\"", "10.9.9.9\"", 1);
    let report = VerificationReport::check(LOG, &output, "##", true);

    assert_eq!(report.mismatches.len(), 1);
    let mismatch = &report.mismatches[0];
    assert_eq!(mismatch.object, 1);
    assert_eq!(mismatch.raw, "add syslog host 10.0.0.1");
    assert_eq!(mismatch.reassembled, "add syslog host 10.9.9.9");
    assert!(report.to_string().contains("mismatch in object #1"));
}

#[test]
fn records_without_raw_or_invalid_json_are_counted() {
    let output = "{\"verb\":\"set\",\"object\":\"pair\",\"args\":[]}\nnot json\n";
    let report = VerificationReport::check("set pair\nset pair\n", output, "##", true);

    assert_eq!(report.objects, 2);
    assert_eq!(report.missing_raw, vec![1]);
    assert_eq!(report.invalid, vec![2]);
}

#[test]
fn verification_reads_files() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("device.log");
    let out = dir.path().join("device.jsonl");
    fs::write(&log, LOG).unwrap();
    fs::write(&out, batch_output(LOG)).unwrap();

    let report = VerificationReport::from_files(&log, &out, "##", true).unwrap();
    assert!(report.is_success());
    assert!(VerificationReport::from_files(dir.path().join("nope"), &out, "##", true).is_err());
}
