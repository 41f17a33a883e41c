//! Grammar rows in, structured records out.

use cmdtree::engine::{MatchOutcome, MatchRecord, Matcher, RecordLayout, reconstruct};
use cmdtree::grammar::{GrammarCompiler, GrammarRow, RuleSet};
use serde_json::json;

fn compile(rows: &[GrammarRow]) -> RuleSet {
    let compilation = GrammarCompiler::default().compile_rows(rows);
    assert!(!compilation.has_errors(), "{:?}", compilation.diagnostics);
    compilation.rules
}

// =============================================================================
// Optional blocks
// =============================================================================

#[test]
fn absent_optional_block_is_not_a_failed_match() {
    let set = compile(&[GrammarRow::new("set", "host", "[port <p>]")]);
    let record = Matcher::new(&set).match_line("set host").into_record().unwrap();

    assert_eq!(record.get("p"), None);
    assert_eq!(record.get("port"), None);
    assert!(record.values().iter().all(Option::is_none));
}

#[test]
fn present_optional_block_fills_both_slots() {
    let set = compile(&[GrammarRow::new("set", "host", "[port <p>]")]);
    let record = Matcher::new(&set)
        .match_line("set host port 514")
        .into_record()
        .unwrap();

    assert_eq!(record.get("p"), Some("514"));
    assert_eq!(record.get("port"), Some("port"));
}

// =============================================================================
// Aliases and choices
// =============================================================================

#[test]
fn aliased_verbs_match_their_own_lines() {
    let set = compile(&[GrammarRow::new("bind/unbind", "link-group", "<group>")]);
    assert_eq!(set.len(), 2);
    assert_eq!(set.rules()[0].slots(), set.rules()[1].slots());

    let matcher = Matcher::new(&set);
    let bind = matcher.match_line("bind link-group g1").into_record().unwrap();
    let unbind = matcher.match_line("unbind link-group g1").into_record().unwrap();
    assert_eq!(bind.verb(), "bind");
    assert_eq!(unbind.verb(), "unbind");
}

#[test]
fn choice_accepts_only_its_alternatives() {
    let set = compile(&[GrammarRow::new("set", "lldp", "{enable|disable}")]);
    let matcher = Matcher::new(&set);

    let record = matcher.match_line("set lldp enable").into_record().unwrap();
    assert_eq!(record.get("choice"), Some("enable"));

    assert!(matches!(
        matcher.match_line("set lldp maybe"),
        MatchOutcome::Unmatched(_)
    ));
}

// =============================================================================
// Specificity
// =============================================================================

#[test]
fn fixed_text_beats_a_variable() {
    // Declared generic-first; ranking must still try the literal rule first.
    let set = compile(&[
        GrammarRow::new("show", "system", "<anything>"),
        GrammarRow::new("show", "system", "memory usage detail"),
    ]);
    assert_eq!(set.rules()[0].score(), 9);
    assert_eq!(set.rules()[1].score(), 1);

    let record = Matcher::new(&set)
        .match_line("show system memory usage detail")
        .into_record()
        .unwrap();
    assert_eq!(record.key().template, "memory usage detail");
}

// =============================================================================
// Full records
// =============================================================================

#[test]
fn syslog_host_record() {
    let set = compile(&[GrammarRow::new("add", "syslog", "host <ip> [port <p>]")]);
    let matcher = Matcher::new(&set);

    let record = matcher
        .match_line("add syslog host 10.10.11.183 port 514")
        .into_record()
        .unwrap();
    assert_eq!(
        RecordLayout::Tokens.render(&record, false),
        json!({
            "verb": "add",
            "object": "syslog",
            "args": [
                {"type": "keyword", "value": "host", "optional": false},
                {"type": "variable", "name": "ip", "value": "10.10.11.183", "optional": false},
                {"type": "keyword", "value": "port", "optional": true},
                {"type": "variable", "name": "p", "value": "514", "optional": true}
            ]
        })
    );

    let record = matcher
        .match_line("add syslog host 10.10.11.183")
        .into_record()
        .unwrap();
    assert_eq!(
        RecordLayout::Tokens.render(&record, false),
        json!({
            "verb": "add",
            "object": "syslog",
            "args": [
                {"type": "keyword", "value": "host", "optional": false},
                {"type": "variable", "name": "ip", "value": "10.10.11.183", "optional": false},
                {"type": "keyword", "value": null, "optional": true},
                {"type": "variable", "name": "p", "value": null, "optional": true}
            ]
        })
    );
    assert_eq!(reconstruct(&record), "add syslog host 10.10.11.183");
}

#[test]
fn mixed_table_matches_a_log() {
    let rows = vec![
        GrammarRow::new("add/del", "syslog", "host <ip> [port <p>]"),
        GrammarRow::continuation("facility <f>"),
        GrammarRow::new("set", "lldp", "{enable|disable} [hold <n>]"),
        GrammarRow::new("", "banner", "<text...>"),
    ];
    let set = compile(&rows);
    let log = "\
## device bootstrap
add syslog host 10.0.0.1
del syslog facility local7
set lldp disable hold 4
set banner Authorized access only
reboot
";
    let batch = Matcher::new(&set).match_lines(log.lines());

    assert_eq!(batch.considered(), 5);
    assert_eq!(batch.unmatched(), 1);
    let summary: Vec<_> = batch
        .records()
        .map(|r| format!("{} {} {}", r.verb(), r.object(), values(r)))
        .collect();
    assert_eq!(
        summary,
        vec![
            "add syslog 10.0.0.1",
            "del syslog local7",
            "set lldp disable 4",
            "set banner Authorized access only",
        ]
    );
}

/// Present non-keyword values joined by spaces.
fn values(record: &MatchRecord<'_>) -> String {
    record
        .slots()
        .filter(|sv| sv.slot.keyword().is_none())
        .filter_map(|sv| sv.value)
        .collect::<Vec<_>>()
        .join(" ")
}
