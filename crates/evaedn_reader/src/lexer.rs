//! Lexer for notation text.
//!
//! The lexer runs a [`Grammar`] over the source. Whitespace, commas and
//! `;` comments separate tokens. A value may be preceded by one tag
//! (`#name` plus whitespace); the tag is detached and handed to the rule
//! that builds the value. A whole collection comes back as one value token;
//! its open frames are kept on a heap stack, not the call stack.

use evaedn_foundation::{Element, Error, ReaderLimit, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ReaderConfig;
use crate::grammar::{CollectionRule, Grammar};
use crate::span::Span;
use crate::token::{Token, TokenKind};

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[A-Za-z][-A-Za-z0-9_/.]*").unwrap());

/// Lexer over one source text.
pub struct Lexer<'g, 'src> {
    grammar: &'g Grammar,
    config: &'g ReaderConfig,
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
}

/// A collection whose opener has been read but not its closer.
struct OpenCollection<'g> {
    rule: &'g CollectionRule,
    tag: String,
    children: Vec<Element>,
    start: Span,
}

impl<'g, 'src> Lexer<'g, 'src> {
    /// Creates a lexer for the given source.
    #[must_use]
    pub fn new(grammar: &'g Grammar, config: &'g ReaderConfig, source: &'src str) -> Self {
        Self {
            grammar,
            config,
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the next token from the source.
    ///
    /// # Errors
    ///
    /// Returns a parse error for text no rule matches, a malformed tag, an
    /// unterminated or mismatched collection, or a value its rule rejects.
    /// Returns `LimitExceeded` when collections nest deeper than allowed.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let start = self.mark();

        if self.rest.is_empty() {
            return Ok(Token::new(TokenKind::Eof, start));
        }

        if self.rest.starts_with(';') {
            let text = self.scan_comment();
            return Ok(Token::new(TokenKind::Comment(text), self.span_from(start)));
        }

        let grammar = self.grammar;
        if let Some(end) = grammar.closing(self.rest) {
            self.advance_by(end.len());
            return Ok(Token::new(
                TokenKind::Close(end.to_string()),
                self.span_from(start),
            ));
        }

        let element = self.scan_value()?;
        Ok(Token::new(TokenKind::Value(element), self.span_from(start)))
    }

    /// Tokenizes the rest of the source, ending with the `Eof` token.
    ///
    /// Comments are included in the output.
    ///
    /// # Errors
    ///
    /// Returns the first error [`Lexer::next_token`] reports.
    pub fn tokenize_all(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    /// Builds a parse error at a span of this lexer's source.
    #[must_use]
    pub fn error_at(&self, span: Span, message: impl Into<String>) -> Error {
        Error::parse_at(message, span.line, span.column, span.source_line(self.source))
    }

    /// Places an error raised by a rule at the span it was read from.
    fn locate(&self, error: Error, span: Span) -> Error {
        error.located(span.line, span.column, span.source_line(self.source))
    }

    // === Values ===

    /// Scans one value: an optional tag, then a collection or a literal.
    ///
    /// Collections are built on an explicit stack of open frames, so nesting
    /// is bounded by `max_depth` rather than by the thread's stack.
    fn scan_value(&mut self) -> Result<Element> {
        let grammar = self.grammar;
        let mut open: Vec<OpenCollection<'g>> = Vec::new();
        loop {
            if let Some((rule, start)) = open.last().map(|frame| (frame.rule, frame.start)) {
                self.skip_whitespace();
                if self.rest.is_empty() {
                    return Err(self.error_at(
                        start,
                        format!("unterminated collection, expected '{}'", rule.end()),
                    ));
                }
                if self.rest.starts_with(';') {
                    self.scan_comment();
                    continue;
                }
                if let Some(end) = grammar.closing(self.rest) {
                    if end != rule.end() {
                        return Err(self.error_at(
                            self.mark(),
                            format!("unexpected end token: '{end}' instead of '{}'", rule.end()),
                        ));
                    }
                    self.advance_by(end.len());
                    let Some(frame) = open.pop() else {
                        return Err(self.unexpected());
                    };
                    let element = frame
                        .rule
                        .process(&frame.tag, frame.children)
                        .map_err(|e| self.locate(e, frame.start))?;
                    match open.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                    continue;
                }
            }

            let start = self.mark();
            let tag = self.scan_tag()?.unwrap_or_default();

            if let Some(rule) = grammar.opening(self.rest) {
                self.advance_by(rule.start().len());
                if open.len() >= self.config.max_depth {
                    let error = Error::limit_exceeded(ReaderLimit::MaxDepth {
                        limit: self.config.max_depth,
                    });
                    return Err(self.locate(error, start));
                }
                open.push(OpenCollection {
                    rule,
                    tag,
                    children: Vec::new(),
                    start,
                });
                continue;
            }

            let element = self.scan_literal(&tag)?;
            match open.last_mut() {
                Some(parent) => parent.children.push(element),
                None => return Ok(element),
            }
        }
    }

    /// Scans the longest literal the grammar matches at the cursor.
    fn scan_literal(&mut self, tag: &str) -> Result<Element> {
        let grammar = self.grammar;
        let rest = self.rest;
        let Some((rule, len)) = grammar.longest_match(rest) else {
            return Err(self.unexpected());
        };
        let at = self.mark();
        self.advance_by(len);
        rule.process(tag, &rest[..len])
            .map_err(|e| self.locate(e, at))
    }

    /// Consumes a leading tag and the whitespace after it.
    ///
    /// A tag must be followed by whitespace and then a value; only a
    /// collection opener may follow the tag directly.
    fn scan_tag(&mut self) -> Result<Option<String>> {
        let Some(found) = TAG.find(self.rest) else {
            return Ok(None);
        };
        let start = self.mark();
        let tag = found.as_str()[1..].to_string();
        self.advance_by(found.end());

        let before = self.position;
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
        let spaced = self.position > before;

        if self.rest.is_empty()
            || self.rest.starts_with(';')
            || self.grammar.closing(self.rest).is_some()
        {
            return Err(self.error_at(start, format!("tag '#{tag}' is not followed by a value")));
        }
        if TAG.is_match(self.rest) {
            return Err(self.error_at(
                self.mark(),
                format!("tag '#{tag}' is followed by another tag"),
            ));
        }
        if !spaced && self.grammar.opening(self.rest).is_none() {
            return Err(self.error_at(
                start,
                format!("tag '#{tag}' must be followed by whitespace"),
            ));
        }
        Ok(Some(tag))
    }

    /// Builds the error for text no rule matches.
    fn unexpected(&self) -> Error {
        let at = self.mark();
        match self.peek_char() {
            Some('"') => self.error_at(at, "unterminated string literal"),
            Some(c) => self.error_at(at, format!("unexpected character: {c}")),
            None => self.error_at(at, "unexpected end of input"),
        }
    }

    // === Cursor ===

    /// Returns an empty span at the current position.
    const fn mark(&self) -> Span {
        Span::point(self.position, self.line, self.column)
    }

    /// Returns the span from `start` to the current position.
    const fn span_from(&self, start: Span) -> Span {
        Span::new(start.start, self.position, start.line, start.column)
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.advance_by(c.len_utf8());
        }
    }

    /// Advances past `len` bytes, which must end on a character boundary.
    fn advance_by(&mut self, len: usize) {
        for c in self.rest[..len].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.rest = &self.rest[len..];
        self.position += len;
    }

    /// Skips whitespace characters; commas count as whitespace.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || c == ',' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Scans a comment starting with `;`, up to the end of the line.
    fn scan_comment(&mut self) -> String {
        let len = self.rest.find('\n').unwrap_or(self.rest.len());
        let text = self.rest[..len].to_string();
        self.advance_by(len);
        text
    }
}
