//! Scalar payloads and their text codecs.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, SecondsFormat};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::ElementType;

/// Literal text of the nil value.
pub const NIL_LITERAL: &str = "nil";
/// Literal text of boolean true.
pub const TRUE_LITERAL: &str = "true";
/// Literal text of boolean false.
pub const FALSE_LITERAL: &str = "false";
/// Tag carried by instant elements.
pub const INSTANT_TAG: &str = "inst";
/// Tag carried by UUID elements.
pub const UUID_TAG: &str = "uuid";

const NAMED_CHARACTERS: [(char, &str); 4] = [
    ('\r', "return"),
    ('\n', "newline"),
    (' ', "space"),
    ('\t', "tab"),
];

/// A scalar payload.
#[derive(Clone, Debug)]
pub enum Scalar {
    /// The absent value.
    Nil,
    /// Boolean value.
    Boolean(bool),
    /// UTF-8 string.
    String(String),
    /// Unicode scalar value.
    Character(char),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Float(f64),
    /// Point in time with its original offset.
    Instant(DateTime<FixedOffset>),
    /// UUID.
    Uuid(Uuid),
}

impl Scalar {
    /// Returns the element type of this payload.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Nil => ElementType::Nil,
            Self::Boolean(_) => ElementType::Boolean,
            Self::String(_) => ElementType::String,
            Self::Character(_) => ElementType::Character,
            Self::Integer(_) => ElementType::Integer,
            Self::Float(_) => ElementType::Float,
            Self::Instant(_) => ElementType::Instant,
            Self::Uuid(_) => ElementType::Uuid,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Character(a), Self::Character(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Instant(a), Self::Instant(b)) => a == b,
            (Self::Uuid(a), Self::Uuid(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str(NIL_LITERAL),
            Self::Boolean(true) => f.write_str(TRUE_LITERAL),
            Self::Boolean(false) => f.write_str(FALSE_LITERAL),
            Self::String(s) => write_quoted(f, s),
            Self::Character(c) => write_character(f, *c),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => f.write_str(&format_float(*x)),
            Self::Instant(t) => write_quoted(f, &t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Uuid(u) => write!(f, "\"{}\"", u.hyphenated()),
        }
    }
}

/// Formats a float in scientific notation with the shortest round-tripping
/// mantissa, an explicit exponent sign and at least two exponent digits,
/// e.g. `1.234567E+04`.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let formatted = format!("{value:E}");
    let (mantissa, exponent) = formatted.split_once('E').unwrap_or((formatted.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}E{sign}{:02}", exponent.unsigned_abs())
}

/// Writes `value` as a double-quoted string literal.
fn write_quoted(out: &mut impl fmt::Write, value: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            '\u{8}' => out.write_str("\\b")?,
            '\u{c}' => out.write_str("\\f")?,
            c if c.is_control() => write!(out, "\\u{:04x}", u32::from(c))?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

/// Returns `value` as a double-quoted string literal.
#[must_use]
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    // Writing into a String cannot fail.
    let _ = write_quoted(&mut out, value);
    out
}

/// Resolves the escape sequences in the body of a string literal.
///
/// # Errors
///
/// Returns a parse error for an unknown escape, a malformed `\u` escape, or
/// a trailing backslash.
pub fn unescape_string(body: &str) -> Result<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let resolved = match chars.next() {
            Some('t') => '\t',
            Some('b') => '\u{8}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('f') => '\u{c}',
            Some('\\') => '\\',
            Some('\'') => '\'',
            Some('"') => '"',
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                decode_unicode_escape(&hex)?
            }
            Some(other) => {
                return Err(Error::parse(format!("invalid escape sequence: \\{other}")));
            }
            None => return Err(Error::parse("escape character at end of string")),
        };
        out.push(resolved);
    }
    Ok(out)
}

fn decode_unicode_escape(hex: &str) -> Result<char> {
    if hex.chars().count() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::parse(format!("invalid unicode escape: \\u{hex}")));
    }
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| Error::parse(format!("invalid unicode code point: \\u{hex}")))
}

/// Returns the name of a named character (`newline`, `space`, ...).
#[must_use]
pub fn character_name(c: char) -> Option<&'static str> {
    NAMED_CHARACTERS
        .iter()
        .find(|(named, _)| *named == c)
        .map(|(_, name)| *name)
}

/// Decodes a character literal body (the text after the backslash).
///
/// # Errors
///
/// Returns a parse error if the body is empty, an invalid `uXXXX` code, or
/// more than one character that is not a known name.
pub fn decode_character(body: &str) -> Result<char> {
    if let Some((c, _)) = NAMED_CHARACTERS.iter().find(|(_, name)| *name == body) {
        return Ok(*c);
    }
    let mut chars = body.chars();
    match (chars.next(), chars.as_str()) {
        (Some(c), "") => Ok(c),
        (Some('u'), hex) => decode_unicode_escape(hex),
        _ => Err(Error::parse(format!("invalid character literal: \\{body}"))),
    }
}

/// Decodes the RFC 3339 body of an `#inst` literal.
///
/// Years outside `0000..=9999` are written with a sign and at least four
/// digits (`+10000-01-01T00:00:00Z`, `-0044-03-15T12:00:00Z`); those are
/// accepted too.
///
/// # Errors
///
/// Returns a parse error if the text is not a valid timestamp.
pub fn decode_instant(text: &str) -> Result<DateTime<FixedOffset>> {
    let invalid = |reason: String| Error::parse(format!("invalid instant \"{text}\": {reason}"));
    if !text.starts_with(['+', '-']) {
        return DateTime::parse_from_rfc3339(text).map_err(|e| invalid(e.to_string()));
    }

    let year_len = text[1..].find('-').map_or(text.len(), |end| end + 1);
    let (year, rest) = text.split_at(year_len);
    if year.len() < 5 || !year[1..].bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("malformed year '{year}'")));
    }
    let year: i32 = year.parse().map_err(|_| invalid(format!("year {year} is out of range")))?;

    // 2000 is a leap year, so every month and day parses before the swap.
    let shifted = DateTime::parse_from_rfc3339(&format!("2000{rest}"))
        .map_err(|e| invalid(e.to_string()))?;
    shifted
        .with_year(year)
        .ok_or_else(|| invalid(format!("year {year} is out of range")))
}

fn write_character(out: &mut impl fmt::Write, c: char) -> fmt::Result {
    out.write_char('\\')?;
    if let Some(name) = character_name(c) {
        return out.write_str(name);
    }
    let code = u32::from(c);
    if c.is_ascii_graphic() || code > 0xFFFF {
        out.write_char(c)
    } else {
        write!(out, "u{code:04x}")
    }
}
