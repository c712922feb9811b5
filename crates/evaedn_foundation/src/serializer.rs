//! Serializers selected by MIME type.
//!
//! A format string is a MIME type optionally followed by `;` and a list of
//! `name=value` options separated by `,` or `;`, e.g.
//! `application/vnd.eva+edn;indent=2`. Only the part before `;` selects the
//! serializer; the serializer sees the whole string.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::element::Element;
use crate::error::{Error, Result};

/// The MIME type of the notation format.
pub const EVA_EDN_MIME_TYPE: &str = "application/vnd.eva+edn";

/// The format used when none is given.
pub const DEFAULT_MIME_TYPE: &str = EVA_EDN_MIME_TYPE;

/// A MIME type string with its options.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MimeType(String);

impl MimeType {
    /// Wraps a format string.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the bare MIME type, without options.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        self.0.split_once(';').map_or(self.0.as_str(), |(mime, _)| mime)
    }

    /// Returns the value of the named option, if present.
    ///
    /// An option without `=` has an empty value.
    #[must_use]
    pub fn options(&self, name: &str) -> Option<&str> {
        let (_, options) = self.0.split_once(';')?;
        options.split([',', ';']).find_map(|option| {
            let (key, value) = option.split_once('=').unwrap_or((option, ""));
            (key == name).then_some(value)
        })
    }

    /// Returns the full format string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MimeType {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Encodes elements into a serialized form.
pub trait Serializer: Send + Sync {
    /// Returns the format this serializer was created for, options included.
    fn mime_type(&self) -> &MimeType;

    /// Encodes an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be represented in this format.
    fn encode(&self, element: &Element) -> Result<String>;
}

/// The notation serializer.
#[derive(Clone, Debug)]
pub struct EdnSerializer {
    mime_type: MimeType,
}

impl EdnSerializer {
    /// Creates a serializer for the given format string.
    #[must_use]
    pub fn new(mime_type: MimeType) -> Self {
        Self { mime_type }
    }
}

impl Default for EdnSerializer {
    fn default() -> Self {
        Self::new(MimeType::new(EVA_EDN_MIME_TYPE))
    }
}

impl Serializer for EdnSerializer {
    fn mime_type(&self) -> &MimeType {
        &self.mime_type
    }

    fn encode(&self, element: &Element) -> Result<String> {
        Ok(element.to_string())
    }
}

/// Builds a serializer from a full format string.
pub type SerializerFactory = fn(MimeType) -> Box<dyn Serializer>;

fn edn_factory(mime_type: MimeType) -> Box<dyn Serializer> {
    Box::new(EdnSerializer::new(mime_type))
}

/// Maps bare MIME types to serializer factories.
#[derive(Default)]
pub struct SerializerRegistry {
    factories: RwLock<HashMap<String, SerializerFactory>>,
}

impl SerializerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the notation serializer installed.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut factories: HashMap<String, SerializerFactory> = HashMap::new();
        factories.insert(EVA_EDN_MIME_TYPE.to_string(), edn_factory);
        Self {
            factories: RwLock::new(factories),
        }
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static SerializerRegistry {
        static GLOBAL: Lazy<SerializerRegistry> = Lazy::new(SerializerRegistry::with_defaults);
        &GLOBAL
    }

    /// Registers a factory for a bare MIME type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFactory` if the MIME type already has a factory.
    pub fn register(&self, mime_type: &str, factory: SerializerFactory) -> Result<()> {
        let mut factories = self
            .factories
            .write()
            .map_err(|_| Error::invalid_factory("serializer registry lock poisoned"))?;
        if factories.contains_key(mime_type) {
            tracing::warn!(mime_type, "serializer already registered");
            return Err(Error::invalid_factory(format!(
                "serializer for {mime_type} already registered"
            )));
        }
        factories.insert(mime_type.to_string(), factory);
        tracing::debug!(mime_type, "registered serializer");
        Ok(())
    }

    /// Returns a serializer for a format string.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMimeType` if no factory handles the bare MIME type.
    pub fn get(&self, format: &str) -> Result<Box<dyn Serializer>> {
        let mime_type = MimeType::new(format);
        let factory = self
            .factories
            .read()
            .ok()
            .and_then(|factories| factories.get(mime_type.mime_type()).copied())
            .ok_or_else(|| Error::unknown_mime_type(format))?;
        Ok(factory(mime_type))
    }
}

/// Returns a serializer from the global registry.
///
/// # Errors
///
/// Returns `UnknownMimeType` if no factory handles the bare MIME type.
pub fn get_serializer(format: &str) -> Result<Box<dyn Serializer>> {
    SerializerRegistry::global().get(format)
}
