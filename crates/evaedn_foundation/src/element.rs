//! The `Element` type: a typed, optionally tagged notation value.

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeZone};
use uuid::Uuid;

use crate::collection::{Collection, CollectionKind};
use crate::error::{Error, Result};
use crate::grammar::{decode_symbol, encode_symbol, is_valid_name};
use crate::pair::Pairs;
use crate::scalar::{INSTANT_TAG, Scalar, UUID_TAG};
use crate::serializer::{Serializer, get_serializer};
use crate::symbol::Symbol;
use crate::types::ElementType;

/// Marks a tag in notation text.
pub const TAG_PREFIX: char = '#';

/// The payload of an element.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementKind {
    /// A scalar value.
    Scalar(Scalar),
    /// A symbol or keyword.
    Symbol(Symbol),
    /// A list, vector, map or set.
    Collection(Collection),
}

/// A notation value with an optional tag.
///
/// Elements compare equal when their types, tags and payloads match.
/// Collections compare structurally.
#[derive(Clone, Debug)]
pub struct Element {
    tag: String,
    kind: ElementKind,
}

impl Element {
    fn untagged(kind: ElementKind) -> Self {
        Self {
            tag: String::new(),
            kind,
        }
    }

    fn with_builtin_tag(kind: ElementKind, tag: &str) -> Self {
        debug_assert!(is_valid_name(tag));
        Self {
            tag: tag.to_string(),
            kind,
        }
    }

    // === Scalars ===

    /// Creates the nil element.
    #[must_use]
    pub fn nil() -> Self {
        Self::untagged(ElementKind::Scalar(Scalar::Nil))
    }

    /// Creates a boolean element.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::untagged(ElementKind::Scalar(Scalar::Boolean(value)))
    }

    /// Creates a string element.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::untagged(ElementKind::Scalar(Scalar::String(value.into())))
    }

    /// Creates a character element.
    #[must_use]
    pub fn character(value: char) -> Self {
        Self::untagged(ElementKind::Scalar(Scalar::Character(value)))
    }

    /// Creates an integer element.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::untagged(ElementKind::Scalar(Scalar::Integer(value)))
    }

    /// Creates a float element.
    #[must_use]
    pub fn float(value: f64) -> Self {
        Self::untagged(ElementKind::Scalar(Scalar::Float(value)))
    }

    /// Creates an instant element, tagged `inst`.
    #[must_use]
    pub fn instant<Tz: TimeZone>(value: DateTime<Tz>) -> Self {
        Self::with_builtin_tag(
            ElementKind::Scalar(Scalar::Instant(value.fixed_offset())),
            INSTANT_TAG,
        )
    }

    /// Creates a UUID element, tagged `uuid`.
    #[must_use]
    pub fn uuid(value: Uuid) -> Self {
        Self::with_builtin_tag(ElementKind::Scalar(Scalar::Uuid(value)), UUID_TAG)
    }

    // === Symbols ===

    /// Creates a symbol element from `prefix/name` or `name`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSymbol` if the text breaks the symbol grammar.
    pub fn symbol(text: &str) -> Result<Self> {
        Symbol::new(text).map(Self::from)
    }

    /// Creates a keyword element. One leading `:` is optional.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeyword` if the text breaks the keyword grammar.
    pub fn keyword(text: &str) -> Result<Self> {
        Symbol::keyword(text).map(Self::from)
    }

    // === Collections ===

    /// Creates a list from its children.
    #[must_use]
    pub fn list(children: impl IntoIterator<Item = Element>) -> Self {
        Collection::list(children).into()
    }

    /// Creates a vector from its children.
    #[must_use]
    pub fn vector(children: impl IntoIterator<Item = Element>) -> Self {
        Collection::vector(children).into()
    }

    /// Creates a set from its members.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if two members share a key.
    pub fn set(members: impl IntoIterator<Item = Element>) -> Result<Self> {
        Collection::from_elements(CollectionKind::Set, members).map(Self::from)
    }

    /// Creates a map from key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if two pairs have equal keys.
    pub fn map(pairs: impl Into<Pairs>) -> Result<Self> {
        Collection::from_pairs(pairs.into()).map(Self::from)
    }

    // === Introspection ===

    /// Returns the element type.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match &self.kind {
            ElementKind::Scalar(s) => s.element_type(),
            ElementKind::Symbol(s) => s.element_type(),
            ElementKind::Collection(c) => c.kind().element_type(),
        }
    }

    /// Returns the payload.
    #[must_use]
    pub const fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Consumes the element, returning its payload.
    #[must_use]
    pub fn into_kind(self) -> ElementKind {
        self.kind
    }

    /// Returns true if this is a collection element.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self.kind, ElementKind::Collection(_))
    }

    // === Tags ===

    /// Returns the tag, or an empty string when untagged.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns true if the element carries a tag.
    #[must_use]
    pub fn has_tag(&self) -> bool {
        !self.tag.is_empty()
    }

    /// Sets or clears the tag.
    ///
    /// An empty string clears the tag. Otherwise one leading `#` is dropped
    /// and the rest must be a valid symbol; it is stored in normalized
    /// `prefix/name` form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSymbol` if the tag breaks the symbol grammar. The
    /// current tag is left unchanged.
    pub fn set_tag(&mut self, tag: &str) -> Result<()> {
        if tag.is_empty() {
            self.tag.clear();
            return Ok(());
        }
        let body = tag.strip_prefix(TAG_PREFIX).unwrap_or(tag);
        let (prefix, name) = decode_symbol(body)?;
        self.tag = encode_symbol(&prefix, &name);
        Ok(())
    }

    /// Returns this element with its tag set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSymbol` if the tag breaks the symbol grammar.
    pub fn with_tag(mut self, tag: &str) -> Result<Self> {
        self.set_tag(tag)?;
        Ok(self)
    }

    // === Value accessors ===

    /// Returns true if this is the nil element.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self.kind, ElementKind::Scalar(Scalar::Nil))
    }

    /// Returns the scalar payload, if any.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            ElementKind::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_scalar()? {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string value, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self.as_scalar()? {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the character value, if this is a character.
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self.as_scalar()? {
            Scalar::Character(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self.as_scalar()? {
            Scalar::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float value, if this is a float.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self.as_scalar()? {
            Scalar::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the instant, if this is an instant.
    #[must_use]
    pub fn as_instant(&self) -> Option<&DateTime<FixedOffset>> {
        match self.as_scalar()? {
            Scalar::Instant(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the UUID, if this is a UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self.as_scalar()? {
            Scalar::Uuid(u) => Some(u),
            _ => None,
        }
    }

    /// Returns the symbol, if this is a symbol or keyword.
    #[must_use]
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match &self.kind {
            ElementKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the collection, if this is a collection.
    #[must_use]
    pub fn as_collection(&self) -> Option<&Collection> {
        match &self.kind {
            ElementKind::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the collection mutably, if this is a collection.
    pub fn as_collection_mut(&mut self) -> Option<&mut Collection> {
        match &mut self.kind {
            ElementKind::Collection(c) => Some(c),
            _ => None,
        }
    }

    // === Serialization ===

    /// Serializes the element with the serializer registered for `format`.
    ///
    /// `format` is a MIME type, optionally followed by `;` and options.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMimeType` if no serializer handles the format.
    pub fn serialize(&self, format: &str) -> Result<String> {
        get_serializer(format)?.encode(self)
    }

    /// Serializes the element with a specific serializer.
    ///
    /// # Errors
    ///
    /// Propagates the serializer's error.
    pub fn serialize_with(&self, serializer: &dyn Serializer) -> Result<String> {
        serializer.encode(self)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.element_type() == other.element_type()
            && self.tag == other.tag
            && self.kind == other.kind
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_tag() {
            write!(f, "{TAG_PREFIX}{} ", self.tag)?;
        }
        match &self.kind {
            ElementKind::Scalar(s) => fmt::Display::fmt(s, f),
            ElementKind::Symbol(s) => fmt::Display::fmt(s, f),
            ElementKind::Collection(c) => fmt::Display::fmt(c, f),
        }
    }
}

impl From<Symbol> for Element {
    fn from(symbol: Symbol) -> Self {
        Self::untagged(ElementKind::Symbol(symbol))
    }
}

impl From<Collection> for Element {
    fn from(collection: Collection) -> Self {
        Self::untagged(ElementKind::Collection(collection))
    }
}

impl From<Scalar> for Element {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Instant(t) => Self::instant(t),
            Scalar::Uuid(u) => Self::uuid(u),
            other => Self::untagged(ElementKind::Scalar(other)),
        }
    }
}

impl TryFrom<Element> for Collection {
    type Error = Error;

    fn try_from(element: Element) -> Result<Self> {
        match element.kind {
            ElementKind::Collection(c) => Ok(c),
            _ => Err(Error::invalid_element(format!(
                "{} is not a collection",
                element.element_type()
            ))),
        }
    }
}
