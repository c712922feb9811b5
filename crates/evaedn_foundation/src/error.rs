//! Error types for the notation engine.
//!
//! Uses `thiserror` for ergonomic error definition with rich context. Every
//! kind carries a stable, comparable message (see [`ErrorKind::message`]) plus
//! free-form details.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for notation operations.
#[derive(Clone, Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput(details.into()))
    }

    /// Creates an invalid element error.
    #[must_use]
    pub fn invalid_element(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidElement(details.into()))
    }

    /// Creates an invalid symbol error.
    #[must_use]
    pub fn invalid_symbol(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSymbol(details.into()))
    }

    /// Creates an invalid keyword error.
    #[must_use]
    pub fn invalid_keyword(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidKeyword(details.into()))
    }

    /// Creates an invalid pair error.
    #[must_use]
    pub fn invalid_pair(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPair(details.into()))
    }

    /// Creates a duplicate key error.
    #[must_use]
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateKey(key.into()))
    }

    /// Creates a missing value error.
    #[must_use]
    pub fn no_value(key: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoValue(key.into()))
    }

    /// Creates an unknown mime type error.
    #[must_use]
    pub fn unknown_mime_type(mime_type: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownMimeType(mime_type.into()))
    }

    /// Creates an invalid factory error.
    #[must_use]
    pub fn invalid_factory(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidFactory(details.into()))
    }

    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPattern(details.into()))
    }

    /// Creates a reader limit error.
    #[must_use]
    pub fn limit_exceeded(limit: ReaderLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Creates a parse error that has not been placed in the source yet.
    ///
    /// The lexer fills in the position with [`Error::located`].
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            line: 0,
            column: 0,
            context: String::new(),
        })
    }

    /// Creates a parse error at a known source position.
    #[must_use]
    pub fn parse_at(
        message: impl Into<String>,
        line: u32,
        column: u32,
        context: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            line,
            column,
            context: context.into(),
        })
    }

    /// Places an error at a source position.
    ///
    /// Parse errors without a position take it over; every other kind keeps
    /// its kind and records the position as context.
    #[must_use]
    pub fn located(self, at_line: u32, at_column: u32, source_line: &str) -> Self {
        match self.kind {
            ErrorKind::ParseError {
                message,
                line: 0,
                ..
            } => Self::parse_at(message, at_line, at_column, source_line),
            kind => {
                let context = self.context.unwrap_or_else(|| {
                    ErrorContext::new()
                        .with_source(source_line)
                        .with_position(at_line as usize, at_column as usize)
                });
                Self {
                    kind,
                    context: Some(context),
                }
            }
        }
    }

    /// Returns the stable message of this error's kind.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }

    /// Returns true if both errors share the same kind, ignoring details.
    #[must_use]
    pub fn is_same_kind(&self, other: &Error) -> bool {
        std::mem::discriminant(&self.kind) == std::mem::discriminant(&other.kind)
    }

    /// Collapses a batch of independent errors into one.
    ///
    /// Returns `None` for an empty batch, the error itself for a batch of one,
    /// and a [`ErrorKind::Multiple`] error otherwise.
    #[must_use]
    pub fn accumulate<I>(errors: I) -> Option<Error>
    where
        I: IntoIterator<Item = Error>,
    {
        errors.into_iter().collect::<CumulativeError>().into_error()
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Clone, Debug, Error)]
pub enum ErrorKind {
    /// A native value did not match the shape a factory expects.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No factory for a stereotype, or a malformed collection store.
    #[error("invalid element: {0}")]
    InvalidElement(String),

    /// Symbol grammar violation.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Keyword grammar violation.
    #[error("invalid keyword: {0}")]
    InvalidKeyword(String),

    /// A key/value pair is incomplete.
    #[error("invalid pair: {0}")]
    InvalidPair(String),

    /// A map or set already holds the key.
    #[error("duplicate key found: {0}")]
    DuplicateKey(String),

    /// A key or index is missing from a collection.
    #[error("no value found: {0}")]
    NoValue(String),

    /// Unsupported serialization format or unstereotypable native value.
    #[error("unknown serialization mime type: {0}")]
    UnknownMimeType(String),

    /// Lexical or structural failure while reading notation text.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed, 0 when not yet located).
        line: u32,
        /// Column number (1-indexed, 0 when not yet located).
        column: u32,
        /// The source line where the error occurred.
        context: String,
    },

    /// A factory was registered twice for the same type.
    #[error("invalid factory: {0}")]
    InvalidFactory(String),

    /// A grammar rule's regular expression does not compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// A reader limit was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(ReaderLimit),

    /// Several independent failures.
    #[error("{0}")]
    Multiple(CumulativeError),
}

impl ErrorKind {
    /// Returns the stable message for this kind.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "Invalid input",
            Self::InvalidElement(_) => "Invalid Element",
            Self::InvalidSymbol(_) => "Invalid Symbol",
            Self::InvalidKeyword(_) => "Invalid keyword",
            Self::InvalidPair(_) => "Invalid pair",
            Self::DuplicateKey(_) => "Duplicate key found",
            Self::NoValue(_) => "No value found",
            Self::UnknownMimeType(_) => "unknown serialization mime type",
            Self::ParseError { .. } => "Parser error",
            Self::InvalidFactory(_) => "Invalid factory",
            Self::InvalidPattern(_) => "Invalid pattern",
            Self::LimitExceeded(_) => "Limit exceeded",
            Self::Multiple(_) => "Multiple errors",
        }
    }
}

/// Reader limits that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderLimit {
    /// Collections nested deeper than allowed.
    MaxDepth {
        /// The configured limit.
        limit: usize,
    },
    /// Input text longer than allowed.
    MaxInputLength {
        /// The configured limit in bytes.
        limit: usize,
        /// The length of the rejected input.
        actual: usize,
    },
}

impl fmt::Display for ReaderLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxDepth { limit } => write!(f, "max nesting depth ({limit}) exceeded"),
            Self::MaxInputLength { limit, actual } => {
                write!(f, "max input length ({limit} bytes) exceeded: {actual} bytes")
            }
        }
    }
}

/// An ordered collection of independent errors.
///
/// Appending a cumulative error flattens it, so the items are always leaf
/// errors.
#[derive(Clone, Debug, Default)]
pub struct CumulativeError {
    items: Vec<Error>,
}

impl CumulativeError {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error, flattening nested cumulative errors.
    pub fn append(&mut self, error: Error) {
        match error.kind {
            ErrorKind::Multiple(nested) => self.items.extend(nested.items),
            _ => self.items.push(error),
        }
    }

    /// Returns the collected errors.
    #[must_use]
    pub fn errors(&self) -> &[Error] {
        &self.items
    }

    /// Returns the number of collected errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no error was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts the container into a single error, if anything was collected.
    #[must_use]
    pub fn into_error(mut self) -> Option<Error> {
        match self.items.len() {
            0 => None,
            1 => self.items.pop(),
            _ => Some(Error::new(ErrorKind::Multiple(self))),
        }
    }
}

impl FromIterator<Error> for CumulativeError {
    fn from_iter<I: IntoIterator<Item = Error>>(iter: I) -> Self {
        let mut cumulative = Self::new();
        for error in iter {
            cumulative.append(error);
        }
        cumulative
    }
}

impl fmt::Display for CumulativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, item) in self.items.iter().enumerate() {
            writeln!(f, "{index}: {item}")?;
        }
        Ok(())
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source text (usually the offending line).
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source text.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "at {line}:{col}")?;
        }
        if let Some(source) = &self.source {
            write!(f, " in `{source}`")?;
        }
        Ok(())
    }
}
