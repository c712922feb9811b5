//! Parse entry points.
//!
//! A [`Reader`] couples a [`Grammar`] with a [`ReaderConfig`] and reduces a
//! source text to exactly one value.

use evaedn_foundation::{Element, Error, ReaderLimit, Result};
use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::config::ReaderConfig;
use crate::grammar::Grammar;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::TokenKind;

/// Reads notation text into elements.
#[derive(Debug)]
pub struct Reader {
    grammar: Grammar,
    config: ReaderConfig,
}

impl Reader {
    /// Creates a reader over a grammar with the default configuration.
    #[must_use]
    pub fn new(grammar: Grammar) -> Self {
        Self::with_config(grammar, ReaderConfig::default())
    }

    /// Creates a reader over a grammar and configuration.
    #[must_use]
    pub const fn with_config(grammar: Grammar, config: ReaderConfig) -> Self {
        Self { grammar, config }
    }

    /// Creates a reader with the built-in grammar.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if a built-in rule fails to compile.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(Grammar::with_defaults()?))
    }

    /// Returns the process-wide reader with the built-in grammar.
    ///
    /// # Panics
    ///
    /// Panics on first use if the built-in grammar does not compile.
    pub fn global() -> &'static Self {
        static GLOBAL: Lazy<Reader> = Lazy::new(|| {
            Reader::with_defaults()
                .unwrap_or_else(|e| panic!("built-in grammar failed to compile: {e}"))
        });
        &GLOBAL
    }

    /// Returns the grammar.
    #[must_use]
    pub const fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Returns the grammar for adding rules.
    pub fn grammar_mut(&mut self) -> &mut Grammar {
        &mut self.grammar
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Parses a source text that holds exactly one value.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the text holds zero or several values, a
    /// stray closing delimiter, or anything the lexer rejects. Returns
    /// `LimitExceeded` if the text is longer than the configured limit.
    pub fn parse(&self, source: &str) -> Result<Element> {
        self.read_one(source).map(|(element, _)| element)
    }

    /// Parses a source text that holds exactly one collection.
    ///
    /// # Errors
    ///
    /// Fails as [`Reader::parse`] does, and with a parse error if the value
    /// is not a collection.
    pub fn parse_collection(&self, source: &str) -> Result<Element> {
        let (element, span) = self.read_one(source)?;
        if element.is_collection() {
            return Ok(element);
        }
        let message = format!("expected a collection, got {}", element.element_type());
        debug!(%message, "parse failed");
        Err(Error::parse_at(
            message,
            span.line,
            span.column,
            span.source_line(source),
        ))
    }

    fn read_one(&self, source: &str) -> Result<(Element, Span)> {
        trace!(len = source.len(), "parse");
        if let Some(limit) = self.config.max_input_len {
            if source.len() > limit {
                return Err(Error::limit_exceeded(ReaderLimit::MaxInputLength {
                    limit,
                    actual: source.len(),
                }));
            }
        }

        let result = self.scan(source);
        match &result {
            Ok((element, _)) => trace!(element_type = %element.element_type(), "parsed"),
            Err(e) => debug!(error = %e, "parse failed"),
        }
        result
    }

    fn scan(&self, source: &str) -> Result<(Element, Span)> {
        let mut lexer = Lexer::new(&self.grammar, &self.config, source);
        let mut values = Vec::new();
        let end = loop {
            let token = lexer.next_token()?;
            match token.kind {
                TokenKind::Eof => break token.span,
                TokenKind::Comment(_) => {}
                TokenKind::Value(element) => values.push((element, token.span)),
                TokenKind::Close(end) => {
                    return Err(lexer.error_at(token.span, format!("unexpected end token: '{end}'")));
                }
            }
        };

        let count = values.len();
        let mut values = values.into_iter();
        match (values.next(), values.next()) {
            (Some(only), None) => Ok(only),
            (_, extra) => {
                let at = extra.map_or(end, |(_, span)| span);
                Err(lexer.error_at(at, format!("expected one result, got: {count}")))
            }
        }
    }
}

/// Parses a source text with the process-wide reader.
///
/// # Errors
///
/// See [`Reader::parse`].
pub fn parse(source: &str) -> Result<Element> {
    Reader::global().parse(source)
}

/// Parses a source text that holds one collection with the process-wide
/// reader.
///
/// # Errors
///
/// See [`Reader::parse_collection`].
pub fn parse_collection(source: &str) -> Result<Element> {
    Reader::global().parse_collection(source)
}
