//! Key/value pairs used to build maps.

use crate::element::Element;
use crate::error::{Error, Result};
use crate::registry::{Primitive, new_primitive_element};

/// A key and its value.
#[derive(Clone, Debug, PartialEq)]
pub struct Pair {
    key: Element,
    value: Element,
}

impl Pair {
    /// Creates a pair from two elements.
    #[must_use]
    pub fn new(key: Element, value: Element) -> Self {
        Self { key, value }
    }

    /// Creates a pair from native values, converting each through the
    /// global type registry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPair` if either side is absent, or the conversion error
    /// if either value cannot be stereotyped.
    pub fn from_primitives(key: Option<Primitive>, value: Option<Primitive>) -> Result<Self> {
        let (Some(key), Some(value)) = (key, value) else {
            return Err(Error::invalid_pair("key and value are both required"));
        };
        Ok(Self::new(
            new_primitive_element(key)?,
            new_primitive_element(value)?,
        ))
    }

    /// Returns the key.
    #[must_use]
    pub const fn key(&self) -> &Element {
        &self.key
    }

    /// Returns the value.
    #[must_use]
    pub const fn value(&self) -> &Element {
        &self.value
    }

    /// Splits the pair into key and value.
    #[must_use]
    pub fn into_parts(self) -> (Element, Element) {
        (self.key, self.value)
    }
}

/// An ordered builder of pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pairs {
    data: Vec<Pair>,
}

impl Pairs {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a key and value.
    pub fn append(&mut self, key: Element, value: Element) {
        self.data.push(Pair::new(key, value));
    }

    /// Appends an existing pair.
    pub fn append_pair(&mut self, pair: Pair) {
        self.data.push(pair);
    }

    /// Returns the pairs in insertion order.
    #[must_use]
    pub fn raw(&self) -> &[Pair] {
        &self.data
    }

    /// Flattens the pairs into `[k1, v1, k2, v2, ...]`.
    #[must_use]
    pub fn raw_elements(&self) -> Vec<Element> {
        self.data
            .iter()
            .flat_map(|pair| [pair.key.clone(), pair.value.clone()])
            .collect()
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Builds pairs from a flat `[k1, v1, k2, v2, ...]` sequence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPair` if the sequence has an odd length.
    pub fn from_flat(elements: Vec<Element>) -> Result<Self> {
        if elements.len() % 2 != 0 {
            return Err(Error::invalid_pair(format!(
                "{} elements cannot be paired up",
                elements.len()
            )));
        }
        let mut pairs = Self::new();
        let mut iter = elements.into_iter();
        while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
            pairs.append(key, value);
        }
        Ok(pairs)
    }
}

impl From<Vec<Pair>> for Pairs {
    fn from(data: Vec<Pair>) -> Self {
        Self { data }
    }
}

impl<const N: usize> From<[Pair; N]> for Pairs {
    fn from(data: [Pair; N]) -> Self {
        Self {
            data: data.into(),
        }
    }
}

impl FromIterator<Pair> for Pairs {
    fn from_iter<I: IntoIterator<Item = Pair>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Pairs {
    type Item = Pair;
    type IntoIter = std::vec::IntoIter<Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
