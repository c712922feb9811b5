//! Tokens produced by the lexer.
//!
//! Collections are scanned recursively inside the lexer, so a whole
//! collection arrives as a single [`TokenKind::Value`] token. Only closing
//! delimiters surface on their own.

use evaedn_foundation::Element;

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    /// Returns true if this token carries a value.
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self.kind, TokenKind::Value(_))
    }

    /// Returns true for tokens the parser skips.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Comment(_))
    }
}

/// Token types.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// A fully built value: scalar, symbol or whole collection.
    Value(Element),
    /// A closing delimiter such as `)` or `}`.
    Close(String),
    /// `; ...` to end of line (text excludes the newline).
    Comment(String),
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Value(element) => element.element_type().to_string(),
            Self::Close(end) => format!("'{end}'"),
            Self::Comment(_) => "comment".to_string(),
            Self::Eof => "end of input".to_string(),
        }
    }
}
