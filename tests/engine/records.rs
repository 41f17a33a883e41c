//! Record building and layout tests.

use cmdtree_engine::{ArgToken, Matcher, RecordLayout, SerializedRecord};
use serde_json::json;

use crate::rule_set;

fn syslog() -> cmdtree_grammar::RuleSet {
    rule_set(&[("add", "syslog", "host <ip> [port <p>] [vrf <v>]")])
}

// =============================================================================
// Slot values
// =============================================================================

#[test]
fn values_follow_declaration_order() {
    let set = syslog();
    let record = Matcher::new(&set)
        .match_line("add syslog host h1 vrf mgmt")
        .into_record()
        .unwrap();

    let pairs: Vec<_> = record.slots().map(|sv| (sv.slot.name.as_str(), sv.value)).collect();
    assert_eq!(
        pairs,
        vec![
            ("host", Some("host")),
            ("ip", Some("h1")),
            ("port", None),
            ("p", None),
            ("vrf", Some("vrf")),
            ("v", Some("mgmt")),
        ]
    );
}

#[test]
fn absent_and_unknown_slots_read_as_none() {
    let set = syslog();
    let record = Matcher::new(&set)
        .match_line("add syslog host h1")
        .into_record()
        .unwrap();

    assert!(record.is_present("ip"));
    assert!(!record.is_present("p"));
    assert_eq!(record.get("no_such_slot"), None);
    assert_eq!(record.values().len(), record.rule().slots().len());
}

#[test]
fn keyword_value_is_the_observed_text() {
    let set = syslog();
    let record = Matcher::new(&set)
        .match_line("add syslog HOST h1 Port 9")
        .into_record()
        .unwrap();

    assert_eq!(record.get("host"), Some("HOST"));
    assert_eq!(record.get("port"), Some("Port"));
    assert_eq!(record.verb(), "add");
}

#[test]
fn multi_word_choice_keeps_observed_spacing() {
    let set = rule_set(&[("set", "if", "{no shutdown|shutdown}")]);
    let record = Matcher::new(&set)
        .match_line("set if no   shutdown")
        .into_record()
        .unwrap();
    assert_eq!(record.get("choice"), Some("no   shutdown"));
}

// =============================================================================
// Layouts
// =============================================================================

#[test]
fn tokens_layout_round_trips_through_json() {
    let set = syslog();
    let record = Matcher::new(&set)
        .match_line("add syslog host h1 port 514")
        .into_record()
        .unwrap();

    let value = RecordLayout::Tokens.render(&record, true);
    let text = serde_json::to_string(&value).unwrap();
    let back: SerializedRecord = serde_json::from_str(&text).unwrap();

    assert_eq!(back, SerializedRecord::from_record(&record, true));
    assert_eq!(back.raw.as_deref(), Some("add syslog host h1 port 514"));
    assert_eq!(
        back.args[3],
        ArgToken::Variable {
            name: "p".into(),
            value: Some("514".into()),
            optional: true,
            options: None,
            joined: false,
        }
    );
}

#[test]
fn tokens_layout_marks_glued_tokens() {
    let set = rule_set(&[("set", "range", "<lo>~<hi>")]);
    let record = Matcher::new(&set)
        .match_line("set range 1~9")
        .into_record()
        .unwrap();
    let value = RecordLayout::Tokens.render(&record, false);

    assert!(value["args"][0].get("joined").is_none());
    assert_eq!(value["args"][1], json!({"type": "keyword", "value": "~", "optional": false, "joined": true}));
    assert_eq!(value["args"][2]["joined"], json!(true));
}

#[test]
fn nested_layout_keeps_unlinked_slots_at_top_level() {
    let set = rule_set(&[("set", "lldp", "{enable|disable} [timer <t>]")]);
    let record = Matcher::new(&set)
        .match_line("set lldp enable timer 30")
        .into_record()
        .unwrap();

    assert_eq!(
        RecordLayout::Nested.render(&record, true),
        json!({
            "verb": "set",
            "object": "lldp",
            "args": {"choice": "enable", "timer": {"t": "30"}},
            "raw": "set lldp enable timer 30"
        })
    );
}

#[test]
fn flat_layout_has_one_key_per_slot() {
    let set = syslog();
    let record = Matcher::new(&set)
        .match_line("add syslog host h1")
        .into_record()
        .unwrap();
    let args = &RecordLayout::Flat.render(&record, false)["args"];

    assert_eq!(args.as_object().unwrap().len(), 6);
    assert_eq!(args["ip\\host"], json!("h1"));
    assert_eq!(args["p\\port"], json!(null));
    assert_eq!(args["vrf"], json!(null));
}
