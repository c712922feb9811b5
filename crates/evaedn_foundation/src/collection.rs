//! Collections: lists, vectors, maps and sets.
//!
//! Lists and vectors keep their children in order. Maps and sets are keyed by
//! the *storage key* of each key element: the raw text of a string, or the
//! notation of anything else. Keyed iteration follows storage-key order.
//!
//! Backing stores are persistent (`im`), so cloning a collection is cheap.

use std::fmt;

use im::{OrdMap, Vector};

use crate::element::{Element, ElementKind};
use crate::error::{Error, Result};
use crate::pair::Pairs;
use crate::registry::{Primitive, new_primitive_element};
use crate::scalar::Scalar;
use crate::types::ElementType;

/// The four collection flavours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// `( ... )`
    List,
    /// `[ ... ]`
    Vector,
    /// `{ k v, ... }`
    Map,
    /// `#{ ... }`
    Set,
}

impl CollectionKind {
    /// Returns the matching element type.
    #[must_use]
    pub const fn element_type(self) -> ElementType {
        match self {
            Self::List => ElementType::List,
            Self::Vector => ElementType::Vector,
            Self::Map => ElementType::Map,
            Self::Set => ElementType::Set,
        }
    }

    /// Returns the opening delimiter.
    #[must_use]
    pub const fn start_symbol(self) -> &'static str {
        match self {
            Self::List => "(",
            Self::Vector => "[",
            Self::Map => "{",
            Self::Set => "#{",
        }
    }

    /// Returns the closing delimiter.
    #[must_use]
    pub const fn end_symbol(self) -> &'static str {
        match self {
            Self::List => ")",
            Self::Vector => "]",
            Self::Map | Self::Set => "}",
        }
    }

    /// Returns the text written between children (or entries).
    #[must_use]
    pub const fn separator(self) -> &'static str {
        match self {
            Self::Map => ", ",
            _ => " ",
        }
    }

    /// Returns the text written between a key and its value, for maps.
    #[must_use]
    pub const fn key_value_separator(self) -> Option<&'static str> {
        match self {
            Self::Map => Some(" "),
            _ => None,
        }
    }

    /// Returns true for maps and sets.
    #[must_use]
    pub const fn is_keyed(self) -> bool {
        matches!(self, Self::Map | Self::Set)
    }
}

/// A lookup key for [`Collection::get`].
#[derive(Clone, Copy, Debug)]
pub enum Key<'a> {
    /// A position or an integer-valued key.
    Index(i64),
    /// Raw key text: an index for ordered kinds, a storage key for keyed kinds.
    Text(&'a str),
    /// A key element.
    Element(&'a Element),
}

impl From<i64> for Key<'_> {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<i32> for Key<'_> {
    fn from(index: i32) -> Self {
        Key::Index(i64::from(index))
    }
}

impl From<usize> for Key<'_> {
    fn from(index: usize) -> Self {
        Key::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(text: &'a str) -> Self {
        Key::Text(text)
    }
}

impl<'a> From<&'a Element> for Key<'a> {
    fn from(element: &'a Element) -> Self {
        Key::Element(element)
    }
}

impl Key<'_> {
    fn storage_key(&self) -> String {
        match self {
            Key::Index(n) => n.to_string(),
            Key::Text(text) => (*text).to_string(),
            Key::Element(element) => storage_key(element),
        }
    }
}

/// Returns the text a keyed collection files `element` under.
///
/// Strings use their raw value, so the string `"a"` and the symbol `a` share
/// a storage key.
#[must_use]
pub fn storage_key(element: &Element) -> String {
    match element.kind() {
        ElementKind::Scalar(Scalar::String(s)) => s.clone(),
        _ => element.to_string(),
    }
}

#[derive(Clone, Debug)]
struct Entry {
    key: Element,
    value: Element,
}

#[derive(Clone, Debug)]
enum Store {
    Ordered(Vector<Element>),
    Keyed(OrdMap<String, Entry>),
}

/// A list, vector, map or set of elements.
#[derive(Clone, Debug)]
pub struct Collection {
    kind: CollectionKind,
    store: Store,
}

impl Collection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new(kind: CollectionKind) -> Self {
        let store = if kind.is_keyed() {
            Store::Keyed(OrdMap::new())
        } else {
            Store::Ordered(Vector::new())
        };
        Self { kind, store }
    }

    /// Creates a list from its children.
    #[must_use]
    pub fn list(children: impl IntoIterator<Item = Element>) -> Self {
        Self::ordered(CollectionKind::List, children)
    }

    /// Creates a vector from its children.
    #[must_use]
    pub fn vector(children: impl IntoIterator<Item = Element>) -> Self {
        Self::ordered(CollectionKind::Vector, children)
    }

    /// Keyed kinds go through [`Collection::from_elements`], which can fail.
    fn ordered(kind: CollectionKind, children: impl IntoIterator<Item = Element>) -> Self {
        debug_assert!(!kind.is_keyed(), "keyed collections need from_elements");
        Self {
            kind,
            store: Store::Ordered(children.into_iter().collect()),
        }
    }

    /// Creates a collection of any kind from a flat child sequence.
    ///
    /// Maps read the sequence as `[k1, v1, k2, v2, ...]`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` for a repeated key in a map or set, or
    /// `InvalidInput` for an odd-length map sequence.
    pub fn from_elements(
        kind: CollectionKind,
        children: impl IntoIterator<Item = Element>,
    ) -> Result<Self> {
        let mut collection = Self::new(kind);
        collection.append(children)?;
        Ok(collection)
    }

    /// Creates a collection from native values, converting each through the
    /// global type registry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidElement` if any child is absent, the conversion error
    /// of a child that cannot be stereotyped, or any
    /// [`Collection::from_elements`] error.
    pub fn from_primitives(
        kind: CollectionKind,
        children: impl IntoIterator<Item = Option<Primitive>>,
    ) -> Result<Self> {
        let children = children
            .into_iter()
            .enumerate()
            .map(|(index, child)| match child {
                Some(value) => new_primitive_element(value),
                None => Err(Error::invalid_element(format!(
                    "{} child {index} is absent",
                    kind.element_type()
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_elements(kind, children)
    }

    /// Creates a map from key/value pairs.
    ///
    /// Equal keys always share a storage key, so storage-key uniqueness
    /// covers element equality too.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if two keys share a storage key.
    pub fn from_pairs(pairs: Pairs) -> Result<Self> {
        Self::from_elements(CollectionKind::Map, pairs.raw_elements())
    }

    /// Returns the collection kind.
    #[must_use]
    pub const fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Returns the number of children (entries for maps).
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.store {
            Store::Ordered(items) => items.len(),
            Store::Keyed(entries) => entries.len(),
        }
    }

    /// Returns true if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds children at the end.
    ///
    /// Maps take the children as `[k1, v1, k2, v2, ...]`. A failed keyed
    /// append leaves the collection unchanged.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an odd-length map sequence, or
    /// `DuplicateKey` if a key is already present.
    pub fn append(&mut self, children: impl IntoIterator<Item = Element>) -> Result<()> {
        match &mut self.store {
            Store::Ordered(items) => {
                items.extend(children);
                Ok(())
            }
            Store::Keyed(entries) => {
                let updated = insert_keyed(self.kind, entries.clone(), children)?;
                *entries = updated;
                Ok(())
            }
        }
    }

    /// Adds children at the front, keeping their relative order.
    ///
    /// Keyed collections have no front; prepending behaves like appending.
    ///
    /// # Errors
    ///
    /// Same as [`Collection::append`].
    pub fn prepend(&mut self, children: impl IntoIterator<Item = Element>) -> Result<()> {
        if self.kind.is_keyed() {
            return self.append(children);
        }
        if let Store::Ordered(items) = &mut self.store {
            let mut front: Vector<Element> = children.into_iter().collect();
            front.append(std::mem::take(items));
            *items = front;
        }
        Ok(())
    }

    /// Looks up a child.
    ///
    /// Ordered kinds read the key as a zero-based index. Keyed kinds look the
    /// key up by storage key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if an ordered kind gets a non-integer key, or
    /// `NoValue` if the index is out of range or the key is absent.
    pub fn get<'k>(&self, key: impl Into<Key<'k>>) -> Result<&Element> {
        let real_key = key.into().storage_key();
        match &self.store {
            Store::Ordered(items) => {
                let index: i64 = real_key
                    .parse()
                    .map_err(|_| Error::invalid_input(format!("{real_key} is not an index")))?;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| items.get(i))
                    .ok_or_else(|| Error::no_value(real_key))
            }
            Store::Keyed(entries) => entries
                .get(&real_key)
                .map(|entry| &entry.value)
                .ok_or_else(|| Error::no_value(real_key)),
        }
    }

    /// Walks the children in structural order, stopping at the first error.
    ///
    /// Ordered kinds pass the position as an integer element key. Maps pass
    /// each entry's key and value; sets pass each member as both.
    ///
    /// # Errors
    ///
    /// Returns the first error the visitor produces.
    pub fn iterate_children<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&Element, &Element) -> Result<()>,
    {
        match &self.store {
            Store::Ordered(items) => {
                for (index, child) in items.iter().enumerate() {
                    let key = Element::integer(i64::try_from(index).unwrap_or(i64::MAX));
                    visit(&key, child)?;
                }
            }
            Store::Keyed(entries) => {
                for entry in entries.values() {
                    visit(&entry.key, &entry.value)?;
                }
            }
        }
        Ok(())
    }

    /// Iterates over the children (map values, set members).
    pub fn values(&self) -> Box<dyn Iterator<Item = &Element> + '_> {
        match &self.store {
            Store::Ordered(items) => Box::new(items.iter()),
            Store::Keyed(entries) => Box::new(entries.values().map(|entry| &entry.value)),
        }
    }

    /// Iterates over `(key, value)` entries. Ordered kinds yield nothing.
    pub fn entries(&self) -> Box<dyn Iterator<Item = (&Element, &Element)> + '_> {
        match &self.store {
            Store::Ordered(_) => Box::new(std::iter::empty()),
            Store::Keyed(entries) => {
                Box::new(entries.values().map(|entry| (&entry.key, &entry.value)))
            }
        }
    }

    /// Appends every child of `other` to this collection.
    ///
    /// Ordered and set targets take the values; map targets take the
    /// `(key, value)` entries, so an ordered source contributes its indices as
    /// keys. Children are added one at a time; an error stops the merge with
    /// the earlier children kept.
    ///
    /// # Errors
    ///
    /// Returns the first `append` error.
    pub fn merge(&mut self, other: &Collection) -> Result<()> {
        let target = self.kind;
        other.iterate_children(|key, value| match target {
            CollectionKind::Map => self.append([key.clone(), value.clone()]),
            _ => self.append([value.clone()]),
        })
    }
}

fn insert_keyed(
    kind: CollectionKind,
    mut entries: OrdMap<String, Entry>,
    children: impl IntoIterator<Item = Element>,
) -> Result<OrdMap<String, Entry>> {
    let children: Vec<Element> = children.into_iter().collect();
    let mut add = |key: Element, value: Element| -> Result<()> {
        let storage = storage_key(&key);
        if entries.contains_key(&storage) {
            return Err(Error::duplicate_key(storage));
        }
        entries.insert(storage, Entry { key, value });
        Ok(())
    };

    match kind {
        CollectionKind::Map => {
            if children.len() % 2 != 0 {
                return Err(Error::invalid_input(format!(
                    "map append needs key/value pairs, got {} elements",
                    children.len()
                )));
            }
            let mut iter = children.into_iter();
            while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
                add(key, value)?;
            }
        }
        _ => {
            for member in children {
                add(member.clone(), member)?;
            }
        }
    }
    Ok(entries)
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind || self.len() != other.len() {
            return false;
        }
        match (&self.store, &other.store) {
            (Store::Ordered(left), Store::Ordered(right)) => {
                left.iter().zip(right.iter()).all(|(l, r)| l == r)
            }
            (Store::Keyed(left), Store::Keyed(right)) => left.iter().all(|(key, entry)| {
                right
                    .get(key)
                    .is_some_and(|other_entry| entry.value == other_entry.value)
            }),
            _ => false,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.start_symbol())?;
        let separator = self.kind.separator();
        match (&self.store, self.kind.key_value_separator()) {
            (Store::Keyed(entries), Some(kv_separator)) => {
                for (i, entry) in entries.values().enumerate() {
                    if i > 0 {
                        f.write_str(separator)?;
                    }
                    write!(f, "{}{kv_separator}{}", entry.key, entry.value)?;
                }
            }
            _ => {
                for (i, child) in self.values().enumerate() {
                    if i > 0 {
                        f.write_str(separator)?;
                    }
                    write!(f, "{child}")?;
                }
            }
        }
        f.write_str(self.kind.end_symbol())
    }
}
