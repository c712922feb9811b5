//! Configuration for the reader.

/// Default maximum collection nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Limits applied while reading notation text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Maximum collection nesting depth.
    pub max_depth: usize,

    /// Maximum input size in bytes (`None` = unlimited).
    pub max_input_len: Option<usize>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: None,
        }
    }
}

impl ReaderConfig {
    /// Creates a configuration for untrusted input: shallow nesting and a
    /// 1 MiB input cap.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_depth: 64,
            max_input_len: Some(1024 * 1024),
        }
    }

    /// Creates a configuration for trusted bulk input.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            max_depth: 1024,
            max_input_len: None,
        }
    }

    /// Builder method to set the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder method to set the maximum input length.
    #[must_use]
    pub fn with_max_input_len(mut self, len: Option<usize>) -> Self {
        self.max_input_len = len;
        self
    }
}
