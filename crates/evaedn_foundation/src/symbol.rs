//! Symbols and keywords.

use std::fmt;

use crate::error::{Error, ErrorKind, Result};
use crate::grammar::{
    NAMESPACE_SEPARATOR, decode_symbol, decode_symbol_parts, encode_symbol, is_valid_name,
};
use crate::types::ElementType;

/// Modifier that turns a symbol into a keyword.
pub const KEYWORD_MODIFIER: &str = ":";

/// A possibly prefixed identifier. Keywords are symbols carrying the `:`
/// modifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    prefix: String,
    name: String,
    modifier: &'static str,
}

impl Symbol {
    /// Parses `prefix/name` or `name` into a symbol.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSymbol` if the text breaks the symbol grammar.
    pub fn new(text: &str) -> Result<Self> {
        let (prefix, name) = decode_symbol(text)?;
        Ok(Self {
            prefix,
            name,
            modifier: "",
        })
    }

    /// Builds a symbol from an explicit prefix and name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSymbol` if the prefix is empty or either part breaks
    /// the grammar.
    pub fn with_prefix(prefix: &str, name: &str) -> Result<Self> {
        let (prefix, name) = decode_symbol_parts(prefix, name)?;
        Ok(Self {
            prefix,
            name,
            modifier: "",
        })
    }

    /// Parses keyword text. One leading `:` is optional.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeyword` if the text (after the `:`) starts with `/` or
    /// breaks the symbol grammar.
    pub fn keyword(text: &str) -> Result<Self> {
        let body = text.strip_prefix(KEYWORD_MODIFIER).unwrap_or(text);
        if body.starts_with(NAMESPACE_SEPARATOR) {
            return Err(Error::invalid_keyword(text));
        }
        Self::new(body).map(Self::into_keyword).map_err(keyword_error)
    }

    /// Builds a keyword from an explicit prefix and name. One leading `:` on
    /// the prefix is optional.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeyword` under the same rules as [`Symbol::with_prefix`].
    pub fn keyword_with_prefix(prefix: &str, name: &str) -> Result<Self> {
        let prefix = prefix.strip_prefix(KEYWORD_MODIFIER).unwrap_or(prefix);
        if prefix.starts_with(NAMESPACE_SEPARATOR) {
            return Err(Error::invalid_keyword(format!("{prefix}/{name}")));
        }
        Self::with_prefix(prefix, name)
            .map(Self::into_keyword)
            .map_err(keyword_error)
    }

    fn into_keyword(mut self) -> Self {
        self.modifier = KEYWORD_MODIFIER;
        self
    }

    /// Returns the prefix (empty when unprefixed).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the modifier: `:` for keywords, empty otherwise.
    #[must_use]
    pub const fn modifier(&self) -> &'static str {
        self.modifier
    }

    /// Returns true if this symbol is a keyword.
    #[must_use]
    pub fn is_keyword(&self) -> bool {
        self.modifier == KEYWORD_MODIFIER
    }

    /// Returns [`ElementType::Keyword`] or [`ElementType::Symbol`].
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        if self.is_keyword() {
            ElementType::Keyword
        } else {
            ElementType::Symbol
        }
    }

    /// Renders `name` inside this symbol's namespace, keeping the modifier.
    #[must_use]
    pub fn append_name_onto_namespace(&self, name: &str) -> String {
        format!("{}{}", self.modifier, encode_symbol(&self.prefix, name))
    }
}

/// Returns true if `namespace` is usable as a symbol prefix.
#[must_use]
pub fn is_valid_namespace(namespace: &str) -> bool {
    is_valid_name(namespace)
}

fn keyword_error(err: Error) -> Error {
    match err.kind {
        ErrorKind::InvalidSymbol(details) => Error::invalid_keyword(details),
        kind => Error::new(kind),
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.modifier)?;
        f.write_str(&encode_symbol(&self.prefix, &self.name))
    }
}
