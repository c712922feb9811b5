//! evaedn - Reader and writer for the eva notation
//!
//! This crate re-exports both layers of the notation engine for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: evaedn_reader      — Grammar rules, lexer, parse entry points
//! Layer 0: evaedn_foundation  — Elements, symbols, collections, serializers, errors
//! ```
//!
//! # Example
//!
//! ```
//! let element = evaedn::parse("{:db/ident :person/name}").unwrap();
//! assert_eq!(element.serialize(evaedn::EVA_EDN_MIME_TYPE).unwrap(), "{:db/ident :person/name}");
//! ```

pub use evaedn_foundation as foundation;
pub use evaedn_reader as reader;

pub use evaedn_foundation::{
    Collection, CollectionKind, DEFAULT_MIME_TYPE, EVA_EDN_MIME_TYPE, Element, ElementKind,
    ElementType, Error, ErrorKind, Pair, Pairs, Result, Symbol,
};
pub use evaedn_reader::{Reader, ReaderConfig, parse, parse_collection};
