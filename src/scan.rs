//! Line scanner: turns TOON text into a token stream.
//!
//! Each non-blank line becomes one of: a `- ` list item, an array header,
//! a key (with its colon and optional same-line value), or a bare value
//! such as a tabular row. Tokens carry the line's indentation column count
//! and 1-based line number. Tab indentation is rejected in strict mode;
//! lenient mode counts each tab as 4 columns and flags the line so the
//! parser can use it for the sibling-vs-nested decision.

use crate::options::DecodeOptions;
use crate::syntax::{self, Header};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub(crate) enum TokenKind {
    /// Raw key text, still carrying quotes if the key was quoted.
    Key(String),
    Colon,
    /// Inline value, tabular row, or other continuation data.
    Value(String),
    ArrayHeader(Header),
    /// Payload after the `- ` marker; empty for a lone `-`.
    ListItem(String),
    Eof,
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub indent: usize,
    pub line: usize,
    pub had_tab: bool,
}

impl Token {
    fn new(kind: TokenKind, indent: usize, line: usize, had_tab: bool) -> Self {
        Token {
            kind,
            indent,
            line,
            had_tab,
        }
    }
}

/// Columns contributed by one tab in lenient mode. Fixed, independent of
/// the configured indent width.
const TAB_COLUMNS: usize = 4;

pub(crate) fn scan(input: &str, options: &DecodeOptions) -> Result<Vec<Token>> {
    let lines: Vec<&str> = input.split('\n').collect();
    let mut tokens = Vec::new();
    // indents of array headers whose bodies are still open; used for the
    // strict blank-line-inside-array check
    let mut open_headers: Vec<usize> = Vec::new();

    for (idx, raw) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let (indent, had_tab, content_start) = measure_indent(raw, options, line_no)?;
        let trimmed = raw[content_start..].trim_end();

        if trimmed.is_empty() {
            if options.strict {
                if let (Some(&open), Some(next_indent)) =
                    (open_headers.last(), next_nonblank_indent(&lines[idx + 1..]))
                {
                    if next_indent > open {
                        return Err(Error::indentation(line_no, "blank line inside array"));
                    }
                }
            }
            continue;
        }

        while open_headers.last().is_some_and(|&h| indent <= h) {
            open_headers.pop();
        }

        if options.strict && indent > 0 && (options.indent == 0 || indent % options.indent != 0) {
            return Err(Error::indentation(
                line_no,
                format!(
                    "indentation of {indent} columns is not a multiple of {}",
                    options.indent
                ),
            ));
        }

        if let Some(rest) = trimmed.strip_prefix("- ") {
            tokens.push(Token::new(
                TokenKind::ListItem(rest.trim_start().to_string()),
                indent,
                line_no,
                had_tab,
            ));
        } else if trimmed == "-" {
            tokens.push(Token::new(
                TokenKind::ListItem(String::new()),
                indent,
                line_no,
                had_tab,
            ));
        } else if let Some(header) = syntax::parse_header(trimmed) {
            let opens_body = header.inline.is_none() && header.length > 0;
            tokens.push(Token::new(
                TokenKind::ArrayHeader(header),
                indent,
                line_no,
                had_tab,
            ));
            if opens_body {
                open_headers.push(indent);
            }
        } else if let Some(colon_at) = find_key_colon(trimmed) {
            let before = trimmed[..colon_at].trim_end();
            let after = trimmed[colon_at + 1..].trim();
            tokens.push(Token::new(
                TokenKind::Key(before.to_string()),
                indent,
                line_no,
                had_tab,
            ));
            tokens.push(Token::new(TokenKind::Colon, indent, line_no, had_tab));
            if !after.is_empty() {
                tokens.push(Token::new(
                    TokenKind::Value(after.to_string()),
                    indent,
                    line_no,
                    had_tab,
                ));
            }
        } else {
            tokens.push(Token::new(
                TokenKind::Value(trimmed.to_string()),
                indent,
                line_no,
                had_tab,
            ));
        }
    }

    tokens.push(Token::new(TokenKind::Eof, 0, lines.len() + 1, false));
    Ok(tokens)
}

fn measure_indent(raw: &str, options: &DecodeOptions, line_no: usize) -> Result<(usize, bool, usize)> {
    let mut indent = 0;
    let mut had_tab = false;
    let mut content_start = 0;
    for ch in raw.chars() {
        match ch {
            ' ' => indent += 1,
            '\t' => {
                if options.strict {
                    return Err(Error::indentation(line_no, "tab character in indentation"));
                }
                indent += TAB_COLUMNS;
                had_tab = true;
            }
            _ => break,
        }
        content_start += ch.len_utf8();
    }
    Ok((indent, had_tab, content_start))
}

/// A colon makes a key line only if the text before it looks like a key.
fn find_key_colon(trimmed: &str) -> Option<usize> {
    let colon_at = syntax::find_unquoted_colon(trimmed)?;
    let before = trimmed[..colon_at].trim_end();
    if syntax::is_key_like(before) {
        Some(colon_at)
    } else {
        None
    }
}

fn next_nonblank_indent(rest: &[&str]) -> Option<usize> {
    for raw in rest {
        let mut indent = 0;
        let mut blank = true;
        for ch in raw.chars() {
            match ch {
                ' ' => indent += 1,
                '\t' => indent += TAB_COLUMNS,
                _ => {
                    blank = false;
                    break;
                }
            }
        }
        if !blank && !raw.trim().is_empty() {
            return Some(indent);
        }
    }
    None
}
