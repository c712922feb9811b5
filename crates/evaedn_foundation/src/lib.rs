//! Core element model for the eva notation.
//!
//! This crate provides:
//! - [`Element`] - A typed, optionally tagged notation value
//! - [`Symbol`] - Symbols and keywords, validated against the symbol grammar
//! - [`Collection`] - Lists, vectors, maps and sets on persistent storage
//! - [`TypeRegistry`] - Conversion from native values into elements
//! - [`Serializer`] - MIME-type selected encoders
//! - [`Error`] - Error kinds with stable messages and details

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collection;
pub mod element;
pub mod error;
pub mod grammar;
pub mod pair;
pub mod registry;
pub mod scalar;
pub mod serializer;
pub mod symbol;
pub mod types;

pub use collection::{Collection, CollectionKind, Key};
pub use element::{Element, ElementKind};
pub use error::{CumulativeError, Error, ErrorContext, ErrorKind, ReaderLimit, Result};
pub use pair::{Pair, Pairs};
pub use registry::{Primitive, TypeRegistry, is_primitive, new_primitive_element, stereotype};
pub use scalar::Scalar;
pub use serializer::{
    DEFAULT_MIME_TYPE, EVA_EDN_MIME_TYPE, EdnSerializer, MimeType, Serializer, SerializerRegistry,
    get_serializer,
};
pub use symbol::{Symbol, is_valid_namespace};
pub use types::ElementType;
