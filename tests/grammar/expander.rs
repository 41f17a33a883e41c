//! Row carry and verb expansion tests.

use cmdtree_grammar::expander::{resolve_rows, split_aliases};
use cmdtree_grammar::{
    CompileOptions, DiagnosticCode, ErrorKind, GrammarCompiler, GrammarRow, Location, RuleKey,
    TemplateCompiler, VerbExpander,
};

fn keys(rows: &[GrammarRow]) -> Vec<RuleKey> {
    GrammarCompiler::default()
        .compile_rows(rows)
        .rules
        .iter()
        .map(|r| r.key().clone())
        .collect()
}

// =============================================================================
// Aliases
// =============================================================================

#[test]
fn bind_unbind_expands_into_two_identical_rules() {
    let rows = vec![GrammarRow::new("bind/unbind", "link-group", "<group> port <p>")];
    let compilation = GrammarCompiler::default().compile_rows(&rows);
    let rules = compilation.rules.rules();

    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].verb(), "bind");
    assert_eq!(rules[1].verb(), "unbind");
    assert_eq!(rules[0].slots(), rules[1].slots());
    assert_eq!(rules[0].object(), "link-group");
    assert_eq!(rules[0].template(), rules[1].template());
}

#[test]
fn every_separator_splits_aliases() {
    let rows = vec![GrammarRow::new("add|del,set / show", "ntp", "server <ip>")];
    let verbs: Vec<_> = keys(&rows).into_iter().map(|k| k.verb).collect();
    assert_eq!(verbs, vec!["add", "del", "set", "show"]);
}

#[test]
fn custom_separators_replace_the_defaults() {
    let options = CompileOptions::default().with_alias_separators([';']);
    let expander = VerbExpander::new(&options);
    assert_eq!(expander.aliases("add;del"), vec!["add", "del"]);
    assert_eq!(expander.aliases("add/del"), vec!["add/del"]);
}

#[test]
fn repeated_aliases_expand_once() {
    assert_eq!(split_aliases("add/add/ del", &['/']), vec!["add", "del"]);
}

#[test]
fn expand_keeps_the_row_key_fields() {
    let rows = vec![GrammarRow::new(" get/set ", " snmp ", "  community <c>  ")];
    let row = resolve_rows(&rows).remove(0).unwrap();
    let compiled = TemplateCompiler::compile(&row.template).unwrap();
    let options = CompileOptions::default();
    let rules = VerbExpander::new(&options).expand(&row, &compiled).unwrap();

    assert_eq!(
        rules.iter().map(|r| r.key().clone()).collect::<Vec<_>>(),
        vec![
            RuleKey::new("get", "snmp", "community <c>"),
            RuleKey::new("set", "snmp", "community <c>"),
        ]
    );
}

// =============================================================================
// Continuation rows
// =============================================================================

#[test]
fn continuation_rows_inherit_before_expansion() {
    let rows = vec![
        GrammarRow::new("add/del", "vlan", "id <n>"),
        GrammarRow::continuation("range <from> to <to>"),
        GrammarRow::new("", "route", "<prefix> via <gw>"),
    ];
    let keys = keys(&rows);

    assert_eq!(keys.len(), 6);
    assert!(keys.contains(&RuleKey::new("del", "vlan", "range <from> to <to>")));
    assert!(keys.contains(&RuleKey::new("add", "route", "<prefix> via <gw>")));
    assert!(keys.contains(&RuleKey::new("del", "route", "<prefix> via <gw>")));
}

#[test]
fn continuation_without_a_previous_row_is_reported() {
    let rows = vec![
        GrammarRow::continuation("id <n>"),
        GrammarRow::new("set", "vlan", "id <n>"),
    ];
    let resolved = resolve_rows(&rows);
    assert!(matches!(
        resolved[0].as_ref().unwrap_err().kind,
        ErrorKind::MissingVerb
    ));

    let compilation = GrammarCompiler::default().compile_rows(&rows);
    assert_eq!(compilation.rules.len(), 1);
    assert_eq!(compilation.diagnostics[0].code, DiagnosticCode::InvalidRow);
    assert_eq!(compilation.diagnostics[0].location, Location::Row { row: 1 });
}

#[test]
fn skipped_verbs_leave_the_other_aliases() {
    let options = CompileOptions::default().with_skip_verb("SHOW");
    let rows = vec![GrammarRow::new("set/show", "clock", "<time>")];
    let compilation = GrammarCompiler::new(options).compile_rows(&rows);

    let verbs: Vec<_> = compilation.rules.iter().map(|r| r.verb()).collect();
    assert_eq!(verbs, vec!["set"]);
}
