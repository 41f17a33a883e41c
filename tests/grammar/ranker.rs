//! Specificity ranking tests.

use cmdtree_grammar::ranker::specificity;
use cmdtree_grammar::{GrammarCompiler, GrammarRow, RuleKey, TemplateCompiler};

fn score(template: &str) -> u32 {
    specificity(&TemplateCompiler::compile(template).unwrap().slots)
}

#[test]
fn score_weights_mandatory_literals_three_times() {
    assert_eq!(score("a b c"), 9);
    assert_eq!(score("<x>"), 1);
    assert_eq!(score("host <ip> [port <p>]"), 6);
    assert_eq!(score("{on|off}"), 1);
    assert_eq!(score(""), 0);
}

#[test]
fn more_specific_rules_come_first() {
    let rows = vec![
        GrammarRow::new("show", "log", "<what>"),
        GrammarRow::new("show", "log", "last hour only"),
        GrammarRow::new("show", "log", "last <n>"),
    ];
    let compilation = GrammarCompiler::default().compile_rows(&rows);
    let templates: Vec<_> = compilation.rules.iter().map(|r| r.template()).collect();

    assert_eq!(templates, vec!["last hour only", "last <n>", "<what>"]);
}

#[test]
fn equal_scores_keep_declaration_order() {
    let rows = vec![
        GrammarRow::new("set", "a", "<x>"),
        GrammarRow::new("set", "b", "<y>"),
        GrammarRow::new("set", "c", "<z>"),
    ];
    let compilation = GrammarCompiler::default().compile_rows(&rows);
    let objects: Vec<_> = compilation.rules.iter().map(|r| r.object()).collect();

    assert_eq!(objects, vec!["a", "b", "c"]);
}

#[test]
fn dispatch_narrows_candidates_to_the_leading_verb() {
    let rows = vec![
        GrammarRow::new("set", "host", "<name>"),
        GrammarRow::new("show", "host", ""),
        GrammarRow::new("set", "vlan", "id <n>"),
    ];
    let compilation = GrammarCompiler::default().compile_rows(&rows);
    let rules = &compilation.rules;

    let candidates: Vec<_> = rules.candidates("SET vlan id 4").map(|r| r.key().clone()).collect();
    assert_eq!(
        candidates,
        vec![
            RuleKey::new("set", "vlan", "id <n>"),
            RuleKey::new("set", "host", "<name>"),
        ]
    );
    assert_eq!(rules.candidates("delete host").count(), 0);
    assert_eq!(rules.verbs(), vec!["set", "show"]);
}
