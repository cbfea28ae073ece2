//! Shared surface grammar: array headers plus the quoting and escaping
//! policy. The encoder emits through this module and the scanner recognizes
//! through it, so the two sides cannot drift apart.

use crate::options::{Delimiter, EncodeOptions};
use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Array/record header grammar:
///
/// ```text
/// [key] '[' [marker] N [delimiter-if-non-comma] ']' [ '{' fields '}' ] ':' [inline-values]
/// ```
fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([^\[\]]+)?\[(#)?(\d+)([,\t|])?\](?:\{([^}]+)\})?:\s*(.*)$").unwrap()
    })
}

/// Anything that reads as a number, including leading-zero integers.
/// These shapes force quoting so decoded text keeps its type.
fn numeric_like_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?([eE][+-]?\d+)?$").unwrap())
}

/// The shape the parser turns into an f64. Leading-zero multi-digit
/// integers are excluded on purpose: they stay strings.
fn strict_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?(0|[1-9]\d*)(\.\d+)?([eE][+-]?\d+)?$").unwrap())
}

/// ISO-8601 timestamps are the one colon-bearing shape allowed unquoted.
fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?Z?$").unwrap()
    })
}

/// A recognized array header line, still carrying raw (encoded) key and
/// field tokens.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Header {
    pub key: Option<String>,
    pub length: usize,
    pub delimiter: Delimiter,
    pub fields: Option<Vec<String>>,
    pub inline: Option<String>,
}

/// Formats a header up to and including the trailing colon.
pub(crate) fn format_header(
    key: Option<&str>,
    length: usize,
    fields: Option<&[String]>,
    options: &EncodeOptions,
) -> String {
    let mut header = String::new();
    if let Some(key) = key {
        header.push_str(&encode_key(key));
    }
    header.push('[');
    if let Some(marker) = options.length_marker {
        header.push(marker);
    }
    header.push_str(&length.to_string());
    header.push_str(options.delimiter.header_mark());
    header.push(']');
    if let Some(fields) = fields {
        let encoded: Vec<String> = fields.iter().map(|f| encode_key(f)).collect();
        header.push('{');
        header.push_str(&encoded.join(options.delimiter.as_str()));
        header.push('}');
    }
    header.push(':');
    header
}

/// Recognizes a header line. Returns `None` when the line is not a header.
///
/// The key part tolerates one trailing colon (`key: [2]: a,b` reads the
/// same as `key[2]: a,b`). A key fragment with an unbalanced quote means
/// the bracket came from inside a quoted value, not from a header.
pub(crate) fn parse_header(line: &str) -> Option<Header> {
    let caps = header_re().captures(line)?;
    let key = match caps.get(1) {
        Some(m) => {
            let raw = m.as_str().trim();
            let raw = raw.strip_suffix(':').map(str::trim_end).unwrap_or(raw);
            if raw.contains('"') && !(raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"'))
            {
                return None;
            }
            Some(raw.to_string()).filter(|k| !k.is_empty())
        }
        None => None,
    };
    let length: usize = caps[3].parse().ok()?;
    let delimiter = caps
        .get(4)
        .and_then(|m| m.as_str().chars().next())
        .and_then(Delimiter::from_char)
        .unwrap_or(Delimiter::Comma);
    let fields = caps
        .get(5)
        .map(|m| split_delimited(m.as_str(), delimiter.as_char()));
    let inline = caps
        .get(6)
        .map(|m| m.as_str().trim_end())
        .filter(|s| !s.is_empty())
        .map(String::from);
    Some(Header {
        key,
        length,
        delimiter,
        fields,
        inline,
    })
}

/// Keys are emitted bare iff they match `[A-Za-z_][A-Za-z0-9_.]*`.
pub(crate) fn is_identifier_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

pub(crate) fn encode_key(key: &str) -> String {
    if is_identifier_key(key) {
        key.to_string()
    } else {
        escape_string(key)
    }
}

/// Reverses [`encode_key`]. Tokens that fail to unquote cleanly are kept
/// verbatim rather than aborting the parse.
pub(crate) fn decode_key(raw: &str) -> String {
    if raw.starts_with('"') {
        unquote(raw, 0).unwrap_or_else(|_| raw.to_string())
    } else {
        raw.to_string()
    }
}

/// Whether a string scalar may be emitted without quotes in a context
/// using `delimiter`.
///
/// Bare emission requires all of: non-empty, no surrounding whitespace,
/// not a literal token (`true`/`false`/`null`), not number-shaped, no
/// colon (ISO-8601 timestamps excepted), none of the structural characters
/// `" \ [ ] { }` or control whitespace, no active delimiter, and no
/// leading `-` (which would read as a list-item marker).
pub(crate) fn is_safe_unquoted(value: &str, delimiter: Delimiter) -> bool {
    if value.is_empty() {
        return false;
    }
    if value != value.trim() {
        return false;
    }
    if matches!(value, "true" | "false" | "null") {
        return false;
    }
    if numeric_like_re().is_match(value) {
        return false;
    }
    if value.contains(':') && !timestamp_re().is_match(value) {
        return false;
    }
    if value
        .chars()
        .any(|c| matches!(c, '"' | '\\' | '[' | ']' | '{' | '}' | '\n' | '\r' | '\t'))
    {
        return false;
    }
    if value.contains(delimiter.as_char()) {
        return false;
    }
    if value.starts_with('-') {
        return false;
    }
    true
}

/// Wraps a string in double quotes, escaping `" \ \n \r \t`.
pub(crate) fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Reverses [`escape_string`]. `token` must start with `"`; the closing
/// quote must end the token. Only the five escape forms are legal.
pub(crate) fn unquote(token: &str, line: usize) -> Result<String> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    chars.next(); // opening quote
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                return if chars.next().is_none() {
                    Ok(out)
                } else {
                    Err(Error::structure(
                        line,
                        "unexpected characters after closing quote",
                    ))
                };
            }
            '\\' => match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some(other) => {
                    return Err(Error::structure(
                        line,
                        format!("invalid escape sequence '\\{other}'"),
                    ));
                }
                None => return Err(Error::structure(line, "backslash at end of string")),
            },
            other => out.push(other),
        }
    }
    Err(Error::structure(line, "unterminated quoted string"))
}

/// Byte index of the first `:` outside any double-quoted region.
pub(crate) fn find_unquoted_colon(line: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Whether the text before a colon plausibly names a key: quoted, or
/// comma-free, short, and not just digits/commas/whitespace.
pub(crate) fn is_key_like(text: &str) -> bool {
    if text.starts_with('"') {
        return true;
    }
    !text.contains(',')
        && text.len() < 100
        && !text
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c.is_whitespace())
}

/// Splits on `delimiter`, ignoring delimiters inside double-quoted regions.
/// Tokens are trimmed of surrounding whitespace.
pub(crate) fn split_delimited(text: &str, delimiter: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;
    for ch in text.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => {
                current.push(ch);
                escaped = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            c if c == delimiter && !in_quotes => {
                out.push(current.trim().to_string());
                current = String::new();
            }
            c => current.push(c),
        }
    }
    out.push(current.trim().to_string());
    out
}

/// Whether the parser should read this token as a number.
pub(crate) fn is_strict_number(text: &str) -> bool {
    strict_number_re().is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let options = EncodeOptions::default();
        let formatted = format_header(Some("items"), 3, None, &options);
        assert_eq!(formatted, "items[3]:");

        let header = parse_header(&formatted).unwrap();
        assert_eq!(header.key.as_deref(), Some("items"));
        assert_eq!(header.length, 3);
        assert_eq!(header.delimiter, Delimiter::Comma);
        assert!(header.fields.is_none());
        assert!(header.inline.is_none());
    }

    #[test]
    fn test_header_with_fields_and_pipe() {
        let options = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
        let fields = vec!["sku".to_string(), "qty".to_string()];
        let formatted = format_header(Some("items"), 1, Some(&fields), &options);
        assert_eq!(formatted, "items[1|]{sku|qty}:");

        let header = parse_header(&formatted).unwrap();
        assert_eq!(header.delimiter, Delimiter::Pipe);
        assert_eq!(
            header.fields,
            Some(vec!["sku".to_string(), "qty".to_string()])
        );
    }

    #[test]
    fn test_header_with_marker_and_inline() {
        let header = parse_header("tags[#3]: a,b,c").unwrap();
        assert_eq!(header.key.as_deref(), Some("tags"));
        assert_eq!(header.length, 3);
        assert_eq!(header.inline.as_deref(), Some("a,b,c"));
    }

    #[test]
    fn test_unkeyed_header() {
        let header = parse_header("[2]: x,y").unwrap();
        assert!(header.key.is_none());
        assert_eq!(header.length, 2);
    }

    #[test]
    fn test_non_headers() {
        assert!(parse_header("label: warm").is_none());
        assert!(parse_header("just text").is_none());
        assert!(parse_header("[x]: y").is_none());
        // brackets inside a quoted value are not a header
        assert!(parse_header("note: \"see [1]: above\"").is_none());
    }

    #[test]
    fn test_key_colon_header_form() {
        let header = parse_header("tags: [2]: a,b").unwrap();
        assert_eq!(header.key.as_deref(), Some("tags"));
        assert_eq!(header.length, 2);

        let header = parse_header("\"my key\": [1]: x").unwrap();
        assert_eq!(header.key.as_deref(), Some("\"my key\""));
    }

    #[test]
    fn test_key_encoding() {
        assert_eq!(encode_key("user_name"), "user_name");
        assert_eq!(encode_key("meta.sha"), "meta.sha");
        assert_eq!(encode_key("2ndPlace"), "\"2ndPlace\"");
        assert_eq!(encode_key("user-id"), "\"user-id\"");
        assert_eq!(decode_key("\"user-id\""), "user-id");
    }

    #[test]
    fn test_safe_unquoted() {
        let d = Delimiter::Comma;
        assert!(is_safe_unquoted("hello world", d));
        assert!(is_safe_unquoted("2024-01-15T10:30:00Z", d));
        assert!(!is_safe_unquoted("", d));
        assert!(!is_safe_unquoted(" padded", d));
        assert!(!is_safe_unquoted("true", d));
        assert!(!is_safe_unquoted("42", d));
        assert!(!is_safe_unquoted("0123", d));
        assert!(!is_safe_unquoted("-3.5e2", d));
        assert!(!is_safe_unquoted("a,b", d));
        assert!(!is_safe_unquoted("key: value", d));
        assert!(!is_safe_unquoted("-dash", d));
        assert!(!is_safe_unquoted("[5]", d));
        // inactive delimiters stay safe
        assert!(is_safe_unquoted("a|b", d));
        assert!(!is_safe_unquoted("a|b", Delimiter::Pipe));
    }

    #[test]
    fn test_strict_number_shape() {
        assert!(is_strict_number("0"));
        assert!(is_strict_number("-12.5"));
        assert!(is_strict_number("1e-6"));
        assert!(!is_strict_number("0123"));
        assert!(!is_strict_number("1."));
        assert!(!is_strict_number("abc"));
    }

    #[test]
    fn test_unquote_errors() {
        assert_eq!(unquote("\"a b\"", 1).unwrap(), "a b");
        assert_eq!(unquote("\"a\\nb\"", 1).unwrap(), "a\nb");
        assert!(unquote("\"open", 1).is_err());
        assert!(unquote("\"bad\\q\"", 1).is_err());
        assert!(unquote("\"tail\\", 1).is_err());
    }

    #[test]
    fn test_split_delimited_respects_quotes() {
        assert_eq!(
            split_delimited("\"a,b\",c", ','),
            vec!["\"a,b\"".to_string(), "c".to_string()]
        );
        assert_eq!(split_delimited("1|2|3", '|'), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_find_unquoted_colon() {
        assert_eq!(find_unquoted_colon("a: b"), Some(1));
        assert_eq!(find_unquoted_colon("\"a:b\": c"), Some(5));
        assert_eq!(find_unquoted_colon("no colon"), None);
    }
}
