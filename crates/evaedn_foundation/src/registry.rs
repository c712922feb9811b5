//! Conversion from native values into elements.
//!
//! A native value is first *stereotyped*: classified into an element type and
//! normalized (integers widen to `i64`, `"nil"` becomes nil, strings starting
//! with `:` become keywords). The factory registered for that type then
//! builds the element.

use std::any::Any;
use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, FixedOffset, Local, Utc};
use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::scalar::NIL_LITERAL;
use crate::symbol::KEYWORD_MODIFIER;
use crate::types::ElementType;

/// A native value accepted at the conversion boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// An already-built element; passes through unchanged.
    Element(Element),
    /// The absent value.
    Nil,
    /// Boolean.
    Bool(bool),
    /// Any integer width, widened.
    Int(i64),
    /// Any float width, widened.
    Float(f64),
    /// A character.
    Char(char),
    /// A string; may stereotype as nil or keyword.
    Str(String),
    /// A point in time.
    Instant(DateTime<FixedOffset>),
    /// A UUID.
    Uuid(Uuid),
}

macro_rules! primitive_from {
    ($variant:ident: $($ty:ty),+ => $conv:expr) => {
        $(
            impl From<$ty> for Primitive {
                fn from(value: $ty) -> Self {
                    Primitive::$variant($conv(value))
                }
            }
        )+
    };
}

primitive_from!(Int: i8, i16, i32, i64, u8, u16, u32 => i64::from);
primitive_from!(Float: f32, f64 => f64::from);
primitive_from!(Bool: bool => std::convert::identity);
primitive_from!(Char: char => std::convert::identity);
primitive_from!(Str: String, &str => String::from);
primitive_from!(Uuid: Uuid => std::convert::identity);
primitive_from!(Element: Element => std::convert::identity);
primitive_from!(Instant: DateTime<FixedOffset>, DateTime<Utc>, DateTime<Local> => |t: DateTime<_>| t.fixed_offset());

impl<T: Into<Primitive>> From<Option<T>> for Primitive {
    fn from(value: Option<T>) -> Self {
        value.map_or(Primitive::Nil, Into::into)
    }
}

impl Primitive {
    /// Converts a type-erased native value.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMimeType` for unsupported native types, or
    /// `InvalidInput` for unsigned values beyond the `i64` range.
    pub fn from_any(value: &dyn Any) -> Result<Self> {
        macro_rules! try_downcast {
            ($($ty:ty),+) => {
                $(
                    if let Some(v) = value.downcast_ref::<$ty>() {
                        return Ok(Primitive::from(v.clone()));
                    }
                )+
            };
        }
        try_downcast!(
            i8,
            i16,
            i32,
            i64,
            u8,
            u16,
            u32,
            f32,
            f64,
            bool,
            char,
            String,
            &'static str,
            Uuid,
            DateTime<FixedOffset>,
            DateTime<Utc>,
            DateTime<Local>,
            Element
        );
        if let Some(v) = value.downcast_ref::<u64>() {
            return i64::try_from(*v)
                .map(Primitive::Int)
                .map_err(|_| Error::invalid_input(format!("{v} does not fit in 64 bits")));
        }
        if let Some(v) = value.downcast_ref::<usize>() {
            return i64::try_from(*v)
                .map(Primitive::Int)
                .map_err(|_| Error::invalid_input(format!("{v} does not fit in 64 bits")));
        }
        if let Some(v) = value.downcast_ref::<isize>() {
            return i64::try_from(*v)
                .map(Primitive::Int)
                .map_err(|_| Error::invalid_input(format!("{v} does not fit in 64 bits")));
        }
        Err(Error::unknown_mime_type("unsupported native type"))
    }
}

/// Classifies and normalizes a native value.
///
/// # Errors
///
/// Returns `UnknownMimeType` for a value with no element stereotype, which is
/// the case for already-built elements.
pub fn stereotype(value: Primitive) -> Result<(Primitive, ElementType)> {
    let ty = match &value {
        Primitive::Nil => ElementType::Nil,
        Primitive::Bool(_) => ElementType::Boolean,
        Primitive::Int(_) => ElementType::Integer,
        Primitive::Float(_) => ElementType::Float,
        Primitive::Char(_) => ElementType::Character,
        Primitive::Str(s) if s == NIL_LITERAL => return Ok((Primitive::Nil, ElementType::Nil)),
        Primitive::Str(s) if s.starts_with(KEYWORD_MODIFIER) => ElementType::Keyword,
        Primitive::Str(_) => ElementType::String,
        Primitive::Instant(_) => ElementType::Instant,
        Primitive::Uuid(_) => ElementType::Uuid,
        Primitive::Element(e) => {
            return Err(Error::unknown_mime_type(format!(
                "{} element is not a native value",
                e.element_type()
            )));
        }
    };
    Ok((value, ty))
}

/// Returns true if the native value has an element stereotype.
#[must_use]
pub fn is_primitive(value: &dyn Any) -> bool {
    Primitive::from_any(value)
        .and_then(stereotype)
        .is_ok()
}

/// Builds an element from a stereotyped native value.
pub type ElementFactory = fn(Primitive) -> Result<Element>;

fn mismatch(ty: ElementType, value: &Primitive) -> Error {
    Error::invalid_input(format!("{ty} factory cannot build from {value:?}"))
}

fn nil_factory(value: Primitive) -> Result<Element> {
    match value {
        Primitive::Nil => Ok(Element::nil()),
        other => Err(mismatch(ElementType::Nil, &other)),
    }
}

fn boolean_factory(value: Primitive) -> Result<Element> {
    match value {
        Primitive::Bool(b) => Ok(Element::boolean(b)),
        other => Err(mismatch(ElementType::Boolean, &other)),
    }
}

fn string_factory(value: Primitive) -> Result<Element> {
    match value {
        Primitive::Str(s) => Ok(Element::string(s)),
        other => Err(mismatch(ElementType::String, &other)),
    }
}

fn character_factory(value: Primitive) -> Result<Element> {
    match value {
        Primitive::Char(c) => Ok(Element::character(c)),
        other => Err(mismatch(ElementType::Character, &other)),
    }
}

fn keyword_factory(value: Primitive) -> Result<Element> {
    match value {
        Primitive::Str(s) => Element::keyword(&s),
        other => Err(mismatch(ElementType::Keyword, &other)),
    }
}

fn integer_factory(value: Primitive) -> Result<Element> {
    match value {
        Primitive::Int(n) => Ok(Element::integer(n)),
        other => Err(mismatch(ElementType::Integer, &other)),
    }
}

fn float_factory(value: Primitive) -> Result<Element> {
    match value {
        Primitive::Float(x) => Ok(Element::float(x)),
        other => Err(mismatch(ElementType::Float, &other)),
    }
}

fn instant_factory(value: Primitive) -> Result<Element> {
    match value {
        Primitive::Instant(t) => Ok(Element::instant(t)),
        other => Err(mismatch(ElementType::Instant, &other)),
    }
}

fn uuid_factory(value: Primitive) -> Result<Element> {
    match value {
        Primitive::Uuid(u) => Ok(Element::uuid(u)),
        other => Err(mismatch(ElementType::Uuid, &other)),
    }
}

const DEFAULT_FACTORIES: [(ElementType, ElementFactory); 9] = [
    (ElementType::Nil, nil_factory),
    (ElementType::Boolean, boolean_factory),
    (ElementType::String, string_factory),
    (ElementType::Character, character_factory),
    (ElementType::Keyword, keyword_factory),
    (ElementType::Integer, integer_factory),
    (ElementType::Float, float_factory),
    (ElementType::Instant, instant_factory),
    (ElementType::Uuid, uuid_factory),
];

/// Maps element types to their factories.
#[derive(Default)]
pub struct TypeRegistry {
    factories: RwLock<HashMap<ElementType, ElementFactory>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with a factory for every scalar type.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            factories: RwLock::new(DEFAULT_FACTORIES.into_iter().collect()),
        }
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static TypeRegistry {
        static GLOBAL: Lazy<TypeRegistry> = Lazy::new(|| {
            tracing::debug!(
                factories = DEFAULT_FACTORIES.len(),
                "initializing element type registry"
            );
            TypeRegistry::with_defaults()
        });
        &GLOBAL
    }

    /// Registers a factory for an element type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFactory` if the type already has a factory.
    pub fn register(&self, ty: ElementType, factory: ElementFactory) -> Result<()> {
        let mut factories = self
            .factories
            .write()
            .map_err(|_| Error::invalid_factory("type registry lock poisoned"))?;
        if factories.contains_key(&ty) {
            tracing::warn!(element_type = %ty, "element factory already registered");
            return Err(Error::invalid_factory(format!(
                "factory for {ty} already registered"
            )));
        }
        factories.insert(ty, factory);
        tracing::debug!(element_type = %ty, "registered element factory");
        Ok(())
    }

    /// Returns true if the type has a factory.
    #[must_use]
    pub fn contains(&self, ty: ElementType) -> bool {
        self.factory(ty).is_some()
    }

    /// Returns the factory for a type.
    #[must_use]
    pub fn factory(&self, ty: ElementType) -> Option<ElementFactory> {
        self.factories.read().ok()?.get(&ty).copied()
    }

    /// Builds an element from a native value.
    ///
    /// Elements pass through unchanged and nil becomes the nil element.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMimeType` if the value has no stereotype,
    /// `InvalidElement` if its type has no factory, or the factory's error.
    pub fn new_element(&self, value: impl Into<Primitive>) -> Result<Element> {
        let value = value.into();
        if let Primitive::Element(element) = value {
            return Ok(element);
        }
        let (value, ty) = stereotype(value)?;
        let factory = self
            .factory(ty)
            .ok_or_else(|| Error::invalid_element(format!("no factory for {ty}")))?;
        factory(value)
    }
}

/// Builds an element from a native value using the global registry.
///
/// # Errors
///
/// See [`TypeRegistry::new_element`].
pub fn new_primitive_element(value: impl Into<Primitive>) -> Result<Element> {
    TypeRegistry::global().new_element(value)
}
