//! Matcher tests.

use cmdtree_engine::{DEFAULT_COMMENT_PREFIX, MatchOutcome, Matcher};
use cmdtree_grammar::{CompileOptions, DiagnosticCode, Location};

use crate::{compile, rule_set};

// =============================================================================
// Single lines
// =============================================================================

#[test]
fn first_match_after_ranking_wins() {
    let set = rule_set(&[
        ("show", "log", "<what>"),
        ("show", "log", "last <n>"),
    ]);
    let matcher = Matcher::new(&set);

    let record = matcher.match_line("show log last 10").into_record().unwrap();
    assert_eq!(record.key().template, "last <n>");
    assert_eq!(record.get("n"), Some("10"));

    let record = matcher.match_line("show log errors").into_record().unwrap();
    assert_eq!(record.key().template, "<what>");
}

#[test]
fn partial_lines_do_not_match() {
    let set = rule_set(&[("set", "vlan", "id <n> name <s>")]);
    let matcher = Matcher::new(&set);

    assert!(!matcher.match_line("set vlan id 4").is_matched());
    assert!(!matcher.match_line("set vlan id 4 name x y").is_matched());
    assert!(matcher.match_line("set vlan id 4 name x").is_matched());
}

#[test]
fn surrounding_and_inner_whitespace_is_tolerated() {
    let set = rule_set(&[("set", "vlan", "id <n>")]);
    let outcome = Matcher::new(&set).match_line("  set \t vlan   id  4 ");

    let record = outcome.record().unwrap();
    assert_eq!(record.get("n"), Some("4"));
    assert_eq!(record.raw(), "  set \t vlan   id  4 ");
}

#[test]
fn unmatched_carries_the_raw_line() {
    let set = rule_set(&[("set", "vlan", "id <n>")]);
    match Matcher::new(&set).match_line("reboot now") {
        MatchOutcome::Unmatched(unmatched) => assert_eq!(unmatched.raw, "reboot now"),
        MatchOutcome::Matched(record) => panic!("unexpected match: {}", record.key()),
    }
}

#[test]
fn rejected_choice_falls_through_to_next_rule() {
    let set = rule_set(&[
        ("set", "port", "{up|down}"),
        ("set", "port", "<anything>"),
    ]);
    let matcher = Matcher::new(&set);

    let record = matcher.match_line("set port up").into_record().unwrap();
    assert_eq!(record.key().template, "{up|down}");

    let record = matcher.match_line("set port sideways").into_record().unwrap();
    assert_eq!(record.key().template, "<anything>");
}

#[test]
fn case_sensitive_rules_reject_other_case() {
    let set = compile(
        &[("set", "mode", "{Fast|Slow}")],
        CompileOptions::default().with_case_insensitive(false),
    );
    let matcher = Matcher::new(&set);

    assert!(matcher.match_line("set mode Fast").is_matched());
    assert!(!matcher.match_line("set mode fast").is_matched());
    assert!(!matcher.match_line("SET mode Fast").is_matched());
}

#[test]
fn matching_is_independent_of_line_order() {
    let set = rule_set(&[
        ("add", "syslog", "host <ip> [port <p>]"),
        ("set", "lldp", "{enable|disable}"),
    ]);
    let matcher = Matcher::new(&set);
    let lines = ["set lldp enable", "add syslog host h port 1", "add syslog host h"];

    let forward: Vec<_> = lines
        .iter()
        .map(|l| matcher.match_line(l).into_record().map(|r| r.values().to_vec()))
        .collect();
    let backward: Vec<_> = lines
        .iter()
        .rev()
        .map(|l| matcher.match_line(l).into_record().map(|r| r.values().to_vec()))
        .collect();

    assert_eq!(forward, backward.into_iter().rev().collect::<Vec<_>>());
}

// =============================================================================
// Batches
// =============================================================================

#[test]
fn batch_skips_blank_and_comment_lines() {
    let set = rule_set(&[("set", "vlan", "id <n>")]);
    let text = "## header\nset vlan id 1\n\n   \nset vlan id x y\n  ## indented comment\nset vlan id 2\n";
    let report = Matcher::new(&set).match_lines(text.lines());

    assert_eq!(report.considered(), 3);
    assert_eq!(report.matched(), 2);
    assert_eq!(report.unmatched(), 1);
    assert_eq!(report.lines[1].line, 5);

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].code, DiagnosticCode::Unmatched);
    assert_eq!(report.diagnostics[0].location, Location::Line { line: 5 });

    let values: Vec<_> = report.records().map(|r| r.get("n")).collect();
    assert_eq!(values, vec![Some("1"), Some("2")]);
}

#[test]
fn batch_comment_prefix_is_configurable() {
    let set = rule_set(&[("set", "vlan", "id <n>")]);
    let lines = ["# note", "## set vlan id 1", "set vlan id 2"];

    let hash = Matcher::new(&set).with_comment_prefix("#").match_lines(lines);
    assert_eq!(hash.considered(), 1);

    let none = Matcher::new(&set).with_comment_prefix("").match_lines(lines);
    assert_eq!(none.considered(), 3);
    assert_eq!(none.unmatched(), 2);

    assert!(Matcher::new(&set).is_skipped(&format!("{DEFAULT_COMMENT_PREFIX} x")));
}
