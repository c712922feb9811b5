//! Integration tests for the lexer
//!
//! Tests tokenization of notation text: separators, literal selection,
//! tags and source positions.

use evaedn_foundation::{Element, ElementType, ErrorKind};
use evaedn_reader::{Grammar, Lexer, ReaderConfig, Token, TokenKind};

fn tokenize(source: &str) -> Vec<Token> {
    let grammar = Grammar::with_defaults().unwrap();
    let config = ReaderConfig::default();
    Lexer::new(&grammar, &config, source).tokenize_all().unwrap()
}

fn value_types(source: &str) -> Vec<ElementType> {
    tokenize(source)
        .into_iter()
        .filter_map(|token| match token.kind {
            TokenKind::Value(element) => Some(element.element_type()),
            _ => None,
        })
        .collect()
}

fn first_value(source: &str) -> Element {
    tokenize(source)
        .into_iter()
        .find_map(|token| match token.kind {
            TokenKind::Value(element) => Some(element),
            _ => None,
        })
        .unwrap()
}

fn error_position(source: &str) -> (String, u32, u32) {
    let grammar = Grammar::with_defaults().unwrap();
    let config = ReaderConfig::default();
    let err = Lexer::new(&grammar, &config, source)
        .tokenize_all()
        .unwrap_err();
    match err.kind {
        ErrorKind::ParseError {
            message,
            line,
            column,
            ..
        } => (message, line, column),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

// =============================================================================
// Separators
// =============================================================================

#[test]
fn commas_are_whitespace() {
    assert_eq!(
        value_types("1,2 ,, 3"),
        vec![ElementType::Integer; 3]
    );
}

#[test]
fn comments_are_tokens() {
    let tokens = tokenize("; heading\n42 ; trailing");
    assert!(matches!(&tokens[0].kind, TokenKind::Comment(text) if text == "; heading"));
    assert!(tokens[1].is_value());
    assert!(tokens[2].is_trivia());
    assert_eq!(tokens[3].kind, TokenKind::Eof);
}

#[test]
fn stray_closer_is_a_token() {
    let tokens = tokenize("1 ]");
    assert_eq!(tokens[1].kind, TokenKind::Close("]".to_string()));
}

// =============================================================================
// Literal Selection
// =============================================================================

#[test]
fn numbers_pick_the_longest_rule() {
    assert_eq!(
        value_types("1 1.5 1N 1M -5 +7 2e3"),
        vec![
            ElementType::Integer,
            ElementType::Float,
            ElementType::Integer,
            ElementType::Float,
            ElementType::Integer,
            ElementType::Integer,
            ElementType::Float,
        ]
    );
}

#[test]
fn literals_beat_symbols_of_equal_length() {
    assert_eq!(
        value_types("nil true false nilly truthy"),
        vec![
            ElementType::Nil,
            ElementType::Boolean,
            ElementType::Boolean,
            ElementType::Symbol,
            ElementType::Symbol,
        ]
    );
}

#[test]
fn keywords_and_symbols() {
    assert_eq!(
        value_types(":db/ident db/ident - +"),
        vec![
            ElementType::Keyword,
            ElementType::Symbol,
            ElementType::Symbol,
            ElementType::Symbol,
        ]
    );
}

#[test]
fn characters() {
    assert_eq!(first_value(r"\newline").as_char(), Some('\n'));
    assert_eq!(first_value(r"\A").as_char(), Some('A'));
    assert_eq!(first_value(r"\z").as_char(), Some('z'));
}

#[test]
fn multiline_string() {
    assert_eq!(first_value("\"a\nb\"").as_str(), Some("a\nb"));
}

// =============================================================================
// Tags
// =============================================================================

#[test]
fn tag_attaches_to_next_value() {
    let element = first_value("#point [1 2]");
    assert_eq!(element.tag(), "point");
    assert_eq!(element.element_type(), ElementType::Vector);
}

#[test]
fn tag_may_touch_an_opener() {
    let element = first_value("#point[1 2]");
    assert_eq!(element.tag(), "point");
}

#[test]
fn set_opener_is_not_a_tag() {
    assert_eq!(first_value("#{1}").element_type(), ElementType::Set);
}

#[test]
fn tag_errors() {
    let (message, ..) = error_position("#my/tag");
    assert!(message.contains("not followed by a value"), "{message}");
    let (message, ..) = error_position("#a #b 1");
    assert!(message.contains("followed by another tag"), "{message}");
    let (message, ..) = error_position("#tag\"x\"");
    assert!(message.contains("must be followed by whitespace"), "{message}");
}

// =============================================================================
// Positions
// =============================================================================

#[test]
fn token_spans() {
    let source = "[1]\n  :k";
    let tokens = tokenize(source);
    assert_eq!(tokens[0].text(source), "[1]");
    assert_eq!((tokens[1].span.line, tokens[1].span.column), (2, 3));
    assert_eq!(tokens[1].text(source), ":k");
}

#[test]
fn unexpected_character_position() {
    let (message, line, column) = error_position("[1\n 2 @]");
    assert_eq!(message, "unexpected character: @");
    assert_eq!((line, column), (2, 4));
}

#[test]
fn unterminated_string() {
    let (message, line, column) = error_position("  \"open");
    assert_eq!(message, "unterminated string literal");
    assert_eq!((line, column), (1, 3));
}

#[test]
fn error_context_is_the_source_line() {
    let grammar = Grammar::with_defaults().unwrap();
    let config = ReaderConfig::default();
    let err = Lexer::new(&grammar, &config, "ok\n(1 2 ]\nrest")
        .tokenize_all()
        .unwrap_err();
    match err.kind {
        ErrorKind::ParseError { context, .. } => assert_eq!(context, "(1 2 ]"),
        other => panic!("expected a parse error, got {other:?}"),
    }
}
