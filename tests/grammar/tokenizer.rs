//! Tokenizer tests.
//!
//! Tests for converting template text to token streams.

use cmdtree_grammar::{ErrorKind, Span, TokenKind, tokenize};

fn kinds(template: &str) -> Vec<TokenKind> {
    tokenize(template)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

// =============================================================================
// Token forms
// =============================================================================

#[test]
fn tokenize_every_form() {
    let kinds = kinds("host <ip> {tcp|udp} [port <p>] ...");

    assert_eq!(kinds.len(), 5);
    assert_eq!(kinds[0], TokenKind::Literal("host".into()));
    assert!(matches!(&kinds[1], TokenKind::Variable { alternatives, remainder: false } if alternatives == &["ip"]));
    assert_eq!(kinds[2], TokenKind::Choice(vec!["tcp".into(), "udp".into()]));
    assert!(matches!(&kinds[3], TokenKind::Optional(inner) if inner.len() == 2));
    assert_eq!(kinds[4], TokenKind::Wildcard);
}

#[test]
fn tokenize_empty_template() {
    assert!(tokenize("").unwrap().is_empty());
    assert!(tokenize("   \t ").unwrap().is_empty());
}

#[test]
fn tokenize_star_is_wildcard() {
    assert_eq!(kinds("*"), vec![TokenKind::Wildcard]);
}

#[test]
fn tokenize_multi_word_choice_collapses_inner_space() {
    assert_eq!(
        kinds("{no   shutdown|shutdown}"),
        vec![TokenKind::Choice(vec!["no shutdown".into(), "shutdown".into()])]
    );
}

#[test]
fn tokenize_choice_may_hold_wildcard() {
    assert_eq!(
        kinds("{all|...}"),
        vec![TokenKind::Choice(vec!["all".into(), "...".into()])]
    );
}

// =============================================================================
// Spacing and spans
// =============================================================================

#[test]
fn tokenize_glued_optional_block() {
    let tokens = tokenize("<n>[ms]").unwrap();

    assert_eq!(tokens.len(), 2);
    assert!(!tokens[0].joined);
    assert!(tokens[1].joined);
    let TokenKind::Optional(inner) = &tokens[1].kind else {
        panic!("expected optional block");
    };
    assert_eq!(inner[0].kind, TokenKind::Literal("ms".into()));
    assert_eq!(inner[0].span, Span::new(4, 6));
}

#[test]
fn tokenize_spans_cover_source_text() {
    let template = "vlan <id> {on|off}";
    for token in tokenize(template).unwrap() {
        let text = &template[token.span.start..token.span.end];
        assert!(!text.is_empty());
        assert!(!text.starts_with(' '));
        assert_eq!(token.span.len(), text.len());
    }
}

#[test]
fn tokenize_punctuation_between_variables() {
    let tokens = tokenize("<from>~<to>").unwrap();
    assert_eq!(tokens[1].kind, TokenKind::Punct('~'));
    assert!(tokens[1].joined);
    assert!(tokens[2].joined);
}

// =============================================================================
// Malformed templates
// =============================================================================

#[test]
fn tokenize_reports_position_of_unbalanced_delimiter() {
    let err = tokenize("host {a|b").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnbalancedDelimiter {
            open: '{',
            position: 5
        }
    ));
    assert!(err.is_template_error());
}

#[test]
fn tokenize_rejects_reopened_variable() {
    assert!(matches!(
        tokenize("<a <b>").unwrap_err().kind,
        ErrorKind::UnbalancedDelimiter { open: '<', .. }
    ));
}

#[test]
fn tokenize_rejects_empty_choice() {
    assert!(matches!(
        tokenize("{}").unwrap_err().kind,
        ErrorKind::EmptyAlternation { .. }
    ));
    assert!(matches!(
        tokenize("{a|}").unwrap_err().kind,
        ErrorKind::EmptyAlternation { .. }
    ));
}

#[test]
fn tokenize_rejects_stray_closers() {
    for template in ["a >", "a }", "]"] {
        assert!(
            matches!(tokenize(template).unwrap_err().kind, ErrorKind::UnexpectedCloser { .. }),
            "{template}"
        );
    }
}
