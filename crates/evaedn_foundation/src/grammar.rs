//! Symbol grammar.
//!
//! A symbol name starts with a letter or one of `* ! _ ? $ % & = < >`,
//! optionally preceded by a numeric modifier (`.`, `+` or `-`). After that
//! come letters, digits, modifiers, the leading specials, `:` and `#`. A
//! lone modifier is a valid name, and so is a lone `/`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// Separates a symbol's prefix from its name.
pub const NAMESPACE_SEPARATOR: char = '/';

const NUMERIC_MODIFIER: &str = r"\.|\+|-";
const LEGAL_FIRST: &str = r"\*|!|_|\?|\$|%|&|=|<|>";
const SPECIAL: &str = ":|#";

static SYMBOL_NAME: Lazy<Regex> = Lazy::new(|| {
    let first = format!("(?:{LEGAL_FIRST}|[[:alpha:]])");
    let modifier = format!("(?:{NUMERIC_MODIFIER})");
    let pattern = format!(
        "^(?:{modifier}|(?:{modifier}{first}|{first})+(?:{modifier}|{LEGAL_FIRST}|{SPECIAL}|[[:alnum:]])*)$"
    );
    Regex::new(&pattern).unwrap()
});

/// Returns true if `text` is a valid symbol name or prefix on its own.
#[must_use]
pub fn is_valid_name(text: &str) -> bool {
    SYMBOL_NAME.is_match(text)
}

/// Splits `input` into `(prefix, name)`, validating both halves.
///
/// # Errors
///
/// Returns `InvalidSymbol` if the input is empty, has more than one
/// separator, has an empty half, or either half breaks the grammar.
pub fn decode_symbol(input: &str) -> Result<(String, String)> {
    if input.len() == 1 && input.starts_with(NAMESPACE_SEPARATOR) {
        return Ok((String::new(), input.to_string()));
    }

    match input.split_once(NAMESPACE_SEPARATOR) {
        Some((prefix, name)) => {
            if name.contains(NAMESPACE_SEPARATOR) {
                return Err(Error::invalid_symbol(format!(
                    "{input}: more than one namespace separator"
                )));
            }
            decode_symbol_parts(prefix, name)
        }
        None if is_valid_name(input) => Ok((String::new(), input.to_string())),
        None => Err(Error::invalid_symbol(input)),
    }
}

/// Validates an explicit `(prefix, name)` pair.
///
/// # Errors
///
/// Returns `InvalidSymbol` if the prefix is empty or either part breaks the
/// grammar.
pub fn decode_symbol_parts(prefix: &str, name: &str) -> Result<(String, String)> {
    if prefix.is_empty() {
        return Err(Error::invalid_symbol(format!("/{name}: empty prefix")));
    }
    if !is_valid_name(prefix) {
        return Err(Error::invalid_symbol(format!("{prefix}: invalid prefix")));
    }
    if !is_valid_name(name) {
        return Err(Error::invalid_symbol(format!("{prefix}/{name}: invalid name")));
    }
    Ok((prefix.to_string(), name.to_string()))
}

/// Renders a symbol as `prefix/name`, or just `name` without a prefix.
#[must_use]
pub fn encode_symbol(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{NAMESPACE_SEPARATOR}{name}")
    }
}
