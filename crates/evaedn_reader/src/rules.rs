//! Default grammar rules: the decode side of every built-in type.

use evaedn_foundation::scalar::{
    FALSE_LITERAL, INSTANT_TAG, NIL_LITERAL, TRUE_LITERAL, UUID_TAG, decode_character,
    decode_instant, unescape_string,
};
use evaedn_foundation::{CollectionKind, Element, Error, Pairs, Result};
use tracing::debug;
use uuid::Uuid;

use crate::grammar::{Grammar, Priority};

/// Integers with an optional sign and an optional `N` suffix.
pub const INTEGER_PATTERN: &str = r"[-+]?(?:0|[1-9][0-9]*)N?";

/// Floats with an optional sign, fraction, exponent and `M` suffix.
pub const FLOAT_PATTERN: &str = r"[-+]?(?:0|[1-9][0-9]*)(?:\.[0-9]*)?(?:[eE][-+]?[0-9]+)?M?";

/// Named, unicode and single-character escapes.
pub const CHARACTER_PATTERN: &str = r"\\(?:newline|return|space|tab|u[0-9A-Fa-f]{4}|\S)";

/// Symbol-shaped text; the symbol grammar does the real validation.
pub const SYMBOL_PATTERN: &str = r"[-+*!?$%&=<>_.a-zA-Z/][-+*!?$%&=<>_.:#/a-zA-Z0-9]*";

/// Keyword-shaped text.
pub const KEYWORD_PATTERN: &str = r":[-+*!?$%&=<>_.:#/a-zA-Z0-9]*";

/// Double-quoted strings; escapes are checked when the body is decoded.
pub const STRING_PATTERN: &str = r#"(?s)"(?:[^"\\]|\\.)*""#;

/// Installs the rules for every built-in type.
///
/// # Errors
///
/// Returns `InvalidPattern` if a pattern fails to compile.
pub fn install_defaults(grammar: &mut Grammar) -> Result<()> {
    grammar.add_pattern(Priority::Literal, NIL_LITERAL, |tag, _| {
        tagged(Element::nil(), tag)
    })?;
    grammar.add_pattern(Priority::Literal, TRUE_LITERAL, |tag, _| {
        tagged(Element::boolean(true), tag)
    })?;
    grammar.add_pattern(Priority::Literal, FALSE_LITERAL, |tag, _| {
        tagged(Element::boolean(false), tag)
    })?;
    grammar.add_pattern(Priority::Integer, INTEGER_PATTERN, |tag, token| {
        tagged(Element::integer(decode_integer(token)?), tag)
    })?;
    grammar.add_pattern(Priority::Float, FLOAT_PATTERN, |tag, token| {
        tagged(Element::float(decode_float(token)?), tag)
    })?;
    grammar.add_pattern(Priority::Character, CHARACTER_PATTERN, |tag, token| {
        let body = token.strip_prefix('\\').unwrap_or(token);
        tagged(Element::character(decode_character(body)?), tag)
    })?;
    grammar.add_pattern(Priority::Symbol, SYMBOL_PATTERN, |tag, token| {
        tagged(Element::symbol(token)?, tag)
    })?;
    grammar.add_pattern(Priority::Symbol, KEYWORD_PATTERN, |tag, token| {
        tagged(Element::keyword(token)?, tag)
    })?;
    grammar.add_pattern(Priority::String, STRING_PATTERN, decode_string)?;

    grammar.add_collection_pattern(
        CollectionKind::List.start_symbol(),
        CollectionKind::List.end_symbol(),
        |tag, children| tagged(Element::list(children), tag),
    )?;
    grammar.add_collection_pattern(
        CollectionKind::Vector.start_symbol(),
        CollectionKind::Vector.end_symbol(),
        |tag, children| tagged(Element::vector(children), tag),
    )?;
    grammar.add_collection_pattern(
        CollectionKind::Map.start_symbol(),
        CollectionKind::Map.end_symbol(),
        |tag, children| tagged(Element::map(Pairs::from_flat(children)?)?, tag),
    )?;
    grammar.add_collection_pattern(
        CollectionKind::Set.start_symbol(),
        CollectionKind::Set.end_symbol(),
        |tag, children| tagged(Element::set(children)?, tag),
    )?;

    debug!(
        literals = grammar.primitive_rules().len(),
        collections = grammar.collection_rules().len(),
        "installed default grammar"
    );
    Ok(())
}

/// Attaches the tag a token was read with, if any.
fn tagged(element: Element, tag: &str) -> Result<Element> {
    if tag.is_empty() {
        Ok(element)
    } else {
        element.with_tag(tag)
    }
}

fn decode_integer(token: &str) -> Result<i64> {
    let digits = token.strip_suffix('N').unwrap_or(token);
    digits
        .parse()
        .map_err(|e| Error::parse(format!("invalid integer '{token}': {e}")))
}

fn decode_float(token: &str) -> Result<f64> {
    let digits = token.strip_suffix('M').unwrap_or(token);
    digits
        .parse()
        .map_err(|e| Error::parse(format!("invalid float '{token}': {e}")))
}

/// Decodes a string token, routing `#inst` and `#uuid` bodies to their own
/// decoders.
fn decode_string(tag: &str, token: &str) -> Result<Element> {
    let body = token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| Error::parse(format!("malformed string literal: {token}")))?;

    match tag {
        INSTANT_TAG => {
            Ok(Element::instant(decode_instant(body)?))
        }
        UUID_TAG => {
            let uuid = Uuid::parse_str(body)
                .map_err(|e| Error::parse(format!("invalid uuid \"{body}\": {e}")))?;
            Ok(Element::uuid(uuid))
        }
        _ => tagged(Element::string(unescape_string(body)?), tag),
    }
}
