//! The lexer grammar: prioritized literal rules and collection delimiters.
//!
//! At each position every literal rule is tried. The longest match wins;
//! ties go to the rule with the higher [`Priority`], then to the rule added
//! first.

use std::fmt;

use evaedn_foundation::{Element, Error, Result};
use regex::Regex;
use tracing::debug;

use crate::rules;

/// Literal rule classes, highest priority first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    /// Fixed literals such as `nil` and `true`.
    Literal,
    /// Integers.
    Integer,
    /// Floats.
    Float,
    /// Characters.
    Character,
    /// Symbols and keywords.
    Symbol,
    /// Strings.
    String,
}

/// Turns a tag (empty when untagged) and the matched token text into an
/// element.
pub type PrimitiveProcessor = Box<dyn Fn(&str, &str) -> Result<Element> + Send + Sync>;

/// Turns a tag (empty when untagged) and the scanned children into a
/// collection element.
pub type CollectionProcessor = Box<dyn Fn(&str, Vec<Element>) -> Result<Element> + Send + Sync>;

/// A literal rule.
pub struct PrimitiveRule {
    priority: Priority,
    pattern: String,
    regex: Regex,
    processor: PrimitiveProcessor,
}

impl PrimitiveRule {
    /// Returns the rule's priority class.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the pattern as registered.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Runs the processor on a matched token.
    ///
    /// # Errors
    ///
    /// Propagates the processor's error.
    pub fn process(&self, tag: &str, token: &str) -> Result<Element> {
        (self.processor)(tag, token)
    }
}

impl fmt::Debug for PrimitiveRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveRule")
            .field("priority", &self.priority)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// A collection delimiter pair.
pub struct CollectionRule {
    start: String,
    end: String,
    processor: CollectionProcessor,
}

impl CollectionRule {
    /// Returns the opening delimiter.
    #[must_use]
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Returns the closing delimiter.
    #[must_use]
    pub fn end(&self) -> &str {
        &self.end
    }

    /// Runs the processor on the scanned children.
    ///
    /// # Errors
    ///
    /// Propagates the processor's error.
    pub fn process(&self, tag: &str, children: Vec<Element>) -> Result<Element> {
        (self.processor)(tag, children)
    }
}

impl fmt::Debug for CollectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionRule")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}

/// The rule set a lexer runs.
#[derive(Debug, Default)]
pub struct Grammar {
    /// Sorted by priority, insertion order within a priority.
    primitives: Vec<PrimitiveRule>,
    /// Sorted by opening delimiter length, longest first.
    collections: Vec<CollectionRule>,
}

impl Grammar {
    /// Creates an empty grammar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grammar with the rules for every built-in type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if a built-in pattern fails to compile.
    pub fn with_defaults() -> Result<Self> {
        let mut grammar = Self::new();
        rules::install_defaults(&mut grammar)?;
        Ok(grammar)
    }

    /// Adds a literal rule.
    ///
    /// The pattern is anchored at the current input position. Adding a
    /// pattern already present at the same priority keeps the first rule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if the pattern does not compile.
    pub fn add_pattern<F>(&mut self, priority: Priority, pattern: &str, processor: F) -> Result<()>
    where
        F: Fn(&str, &str) -> Result<Element> + Send + Sync + 'static,
    {
        if self
            .primitives
            .iter()
            .any(|rule| rule.priority == priority && rule.pattern == pattern)
        {
            debug!(?priority, pattern, "pattern already registered, keeping first");
            return Ok(());
        }

        let regex = Regex::new(&format!("^(?:{pattern})"))
            .map_err(|e| Error::invalid_pattern(format!("{pattern}: {e}")))?;
        let at = self
            .primitives
            .iter()
            .position(|rule| rule.priority > priority)
            .unwrap_or(self.primitives.len());
        self.primitives.insert(
            at,
            PrimitiveRule {
                priority,
                pattern: pattern.to_string(),
                regex,
                processor: Box::new(processor),
            },
        );
        debug!(?priority, pattern, "installed literal rule");
        Ok(())
    }

    /// Adds a collection delimiter pair.
    ///
    /// Adding an opening delimiter that is already present keeps the first
    /// rule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if either delimiter is empty.
    pub fn add_collection_pattern<F>(&mut self, start: &str, end: &str, processor: F) -> Result<()>
    where
        F: Fn(&str, Vec<Element>) -> Result<Element> + Send + Sync + 'static,
    {
        if start.is_empty() || end.is_empty() {
            return Err(Error::invalid_pattern(format!(
                "collection delimiters must be non-empty: '{start}' '{end}'"
            )));
        }
        if self.collections.iter().any(|rule| rule.start == start) {
            debug!(start, end, "collection pattern already registered, keeping first");
            return Ok(());
        }

        let at = self
            .collections
            .iter()
            .position(|rule| rule.start.len() < start.len())
            .unwrap_or(self.collections.len());
        self.collections.insert(
            at,
            CollectionRule {
                start: start.to_string(),
                end: end.to_string(),
                processor: Box::new(processor),
            },
        );
        debug!(start, end, "installed collection rule");
        Ok(())
    }

    /// Returns the literal rules in match order.
    #[must_use]
    pub fn primitive_rules(&self) -> &[PrimitiveRule] {
        &self.primitives
    }

    /// Returns the collection rules.
    #[must_use]
    pub fn collection_rules(&self) -> &[CollectionRule] {
        &self.collections
    }

    /// Finds the literal rule with the longest non-empty match at the start
    /// of `input`, returning it with the match length.
    #[must_use]
    pub fn longest_match(&self, input: &str) -> Option<(&PrimitiveRule, usize)> {
        let mut best: Option<(&PrimitiveRule, usize)> = None;
        for rule in &self.primitives {
            let Some(found) = rule.regex.find(input) else {
                continue;
            };
            let len = found.end();
            if len > 0 && best.is_none_or(|(_, best_len)| len > best_len) {
                best = Some((rule, len));
            }
        }
        best
    }

    /// Returns the collection rule whose opening delimiter starts `input`.
    #[must_use]
    pub fn opening(&self, input: &str) -> Option<&CollectionRule> {
        self.collections
            .iter()
            .find(|rule| input.starts_with(rule.start.as_str()))
    }

    /// Returns the closing delimiter that starts `input`, if any.
    #[must_use]
    pub fn closing(&self, input: &str) -> Option<&str> {
        self.collections
            .iter()
            .map(|rule| rule.end.as_str())
            .find(|end| input.starts_with(end))
    }
}
