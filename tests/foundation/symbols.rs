//! Integration tests for symbols and keywords
//!
//! Tests the symbol grammar boundary, namespaces and keyword edge cases.

use evaedn_foundation::{Element, ElementType, ErrorKind, Symbol, is_valid_namespace};

// =============================================================================
// Symbol Grammar
// =============================================================================

#[test]
fn single_punctuation_symbols() {
    for text in ["*", "!", "_", "?", "$", "%", "&", "=", "<", ">", ".", "+", "-", "/"] {
        assert!(Symbol::new(text).is_ok(), "{text} should be a valid symbol");
    }
}

#[test]
fn common_symbols() {
    for text in ["foo", "foo-bar", "valid?", "swap!", "->thread", "+x", "a:b", "a#b", "x1"] {
        assert!(Symbol::new(text).is_ok(), "{text} should be a valid symbol");
    }
}

#[test]
fn rejected_symbols() {
    for text in ["", "1bad", ":bad", "-1bad", "+2", ".5x", "bad/worse/wrong", "#tag"] {
        let err = Symbol::new(text).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::InvalidSymbol(_)),
            "{text} should be rejected"
        );
    }
}

#[test]
fn namespaced_symbol() {
    let symbol = Symbol::new("ns/name").unwrap();
    assert_eq!(symbol.prefix(), "ns");
    assert_eq!(symbol.name(), "name");
    assert_eq!(symbol.to_string(), "ns/name");
    assert!(!symbol.is_keyword());
}

#[test]
fn namespace_halves_must_be_non_empty() {
    assert!(Symbol::new("ns/").is_err());
    assert!(Symbol::with_prefix("", "name").is_err());
    assert!(Symbol::with_prefix("ns", "").is_err());
    assert!(Symbol::with_prefix("1ns", "name").is_err());
}

#[test]
fn explicit_prefix() {
    let symbol = Symbol::with_prefix("my.ns", "thing").unwrap();
    assert_eq!(symbol.to_string(), "my.ns/thing");
    assert_eq!(symbol, Symbol::new("my.ns/thing").unwrap());
}

#[test]
fn namespace_validation() {
    assert!(is_valid_namespace("db.type"));
    assert!(!is_valid_namespace("9lives"));
    assert!(!is_valid_namespace(""));
}

#[test]
fn append_name_onto_namespace() {
    let keyword = Symbol::keyword(":db/ident").unwrap();
    assert_eq!(keyword.append_name_onto_namespace("other"), ":db/other");

    let symbol = Symbol::new("plain").unwrap();
    assert_eq!(symbol.append_name_onto_namespace("other"), "other");
}

// =============================================================================
// Keywords
// =============================================================================

#[test]
fn keyword_strips_modifier() {
    let keyword = Symbol::keyword(":foo").unwrap();
    assert_eq!(keyword.name(), "foo");
    assert_eq!(keyword.prefix(), "");
    assert!(keyword.is_keyword());
    assert_eq!(keyword.to_string(), ":foo");
    assert_eq!(keyword, Symbol::keyword("foo").unwrap());
}

#[test]
fn keyword_edge_cases() {
    for text in ["", ":", ":/", ":/anything", "::double", ":1bad", ":a/b/c"] {
        let err = Symbol::keyword(text).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::InvalidKeyword(_)),
            "{text:?} should be an invalid keyword"
        );
    }
}

#[test]
fn keyword_with_prefix() {
    let keyword = Symbol::keyword_with_prefix(":db", "ident").unwrap();
    assert_eq!(keyword.to_string(), ":db/ident");
    assert!(matches!(
        Symbol::keyword_with_prefix("", "x").unwrap_err().kind,
        ErrorKind::InvalidKeyword(_)
    ));
}

#[test]
fn symbol_and_keyword_differ() {
    let symbol = Element::symbol("foo").unwrap();
    let keyword = Element::keyword("foo").unwrap();
    assert_eq!(symbol.element_type(), ElementType::Symbol);
    assert_eq!(keyword.element_type(), ElementType::Keyword);
    assert_ne!(symbol, keyword);
}
