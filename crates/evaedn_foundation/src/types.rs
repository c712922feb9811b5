//! Element type tags.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Namespace shared by every element type name.
pub const TYPE_NAMESPACE: &str = ":db.type";

/// The closed set of element type tags.
///
/// The last six tags name types the notation may grow into; nothing in this
/// crate constructs elements of those types yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElementType {
    /// The absent value.
    Nil,
    /// `true` or `false`.
    Boolean,
    /// A UTF-8 string.
    String,
    /// A single Unicode scalar value.
    Character,
    /// A possibly prefixed identifier.
    Symbol,
    /// A symbol with the `:` modifier.
    Keyword,
    /// A 64-bit signed integer.
    Integer,
    /// A 64-bit float.
    Float,
    /// A point in time, tagged `inst`.
    Instant,
    /// A UUID, tagged `uuid`.
    Uuid,
    /// Ordered collection written with parentheses.
    List,
    /// Ordered collection written with brackets.
    Vector,
    /// Keyed collection of key/value entries.
    Map,
    /// Keyed collection of unique values.
    Set,
    /// Reserved.
    BigInt,
    /// Reserved.
    BigDec,
    /// Reserved.
    Double,
    /// Reserved.
    Ref,
    /// Reserved.
    Uri,
    /// Reserved.
    Bytes,
}

impl ElementType {
    /// Every element type, in declaration order.
    pub const ALL: [ElementType; 20] = [
        Self::Nil,
        Self::Boolean,
        Self::String,
        Self::Character,
        Self::Symbol,
        Self::Keyword,
        Self::Integer,
        Self::Float,
        Self::Instant,
        Self::Uuid,
        Self::List,
        Self::Vector,
        Self::Map,
        Self::Set,
        Self::BigInt,
        Self::BigDec,
        Self::Double,
        Self::Ref,
        Self::Uri,
        Self::Bytes,
    ];

    /// Returns the namespaced type name, e.g. `:db.type/long`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nil => ":db.type/nil",
            Self::Boolean => ":db.type/boolean",
            Self::String => ":db.type/string",
            Self::Character => ":db.type/char",
            Self::Symbol => ":db.type/symbol",
            Self::Keyword => ":db.type/keyword",
            Self::Integer => ":db.type/long",
            Self::Float => ":db.type/float",
            Self::Instant => ":db.type/instant",
            Self::Uuid => ":db.type/uuid",
            Self::List => ":db.type/group",
            Self::Vector => ":db.type/vector",
            Self::Map => ":db.type/map",
            Self::Set => ":db.type/set",
            Self::BigInt => ":db.type/bigint",
            Self::BigDec => ":db.type/bigdec",
            Self::Double => ":db.type/double",
            Self::Ref => ":db.type/ref",
            Self::Uri => ":db.type/uri",
            Self::Bytes => ":db.type/bytes",
        }
    }

    /// Returns true for the four collection types.
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::List | Self::Vector | Self::Map | Self::Set)
    }

    /// Returns true for the symbol-like types.
    #[must_use]
    pub const fn is_symbolic(self) -> bool {
        matches!(self, Self::Symbol | Self::Keyword)
    }

    /// Returns false for the reserved types with no element representation.
    #[must_use]
    pub const fn is_implemented(self) -> bool {
        !matches!(
            self,
            Self::BigInt | Self::BigDec | Self::Double | Self::Ref | Self::Uri | Self::Bytes
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
