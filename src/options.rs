//! Configuration options for TOON encoding and decoding.
//!
//! - [`EncodeOptions`]: controls indentation, delimiter, and the optional
//!   array-length marker
//! - [`DecodeOptions`]: controls strict mode and the expected indent width
//! - [`Delimiter`]: choice of separator for inline arrays and tabular rows
//!
//! ## Examples
//!
//! ```rust
//! use toon_codec::{encode, toon, Delimiter, EncodeOptions};
//!
//! let value = toon!({ "tags": ["a", "b", "c"] });
//!
//! // Pipe delimiter
//! let options = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
//! assert_eq!(encode(&value, &options), "tags[3|]: a|b|c");
//!
//! // Length marker '#'
//! let options = EncodeOptions::new().with_length_marker('#');
//! assert_eq!(encode(&value, &options), "tags[#3]: a,b,c");
//! ```

/// Delimiter choice for inline arrays, tabular field lists, and tabular rows.
///
/// - **Comma**: default, most compact
/// - **Tab**: TSV-like output
/// - **Pipe**: readable for markdown-style tables
///
/// For tab and pipe the delimiter character is also announced inside the
/// array header (e.g. `[3|]`); comma is implicit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    /// Returns the delimiter character.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    /// Returns the string representation of this delimiter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    /// The marker emitted between the length and `]` in array headers.
    /// Comma is the implicit default and emits nothing there.
    pub(crate) const fn header_mark(&self) -> &'static str {
        match self {
            Delimiter::Comma => "",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    pub(crate) const fn from_char(ch: char) -> Option<Delimiter> {
        match ch {
            ',' => Some(Delimiter::Comma),
            '\t' => Some(Delimiter::Tab),
            '|' => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

/// Maximum spaces-per-level accepted by [`EncodeOptions::with_indent`].
const MAX_INDENT: usize = 10;

/// Options controlling TOON output.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{Delimiter, EncodeOptions};
///
/// let options = EncodeOptions::new()
///     .with_indent(4)
///     .with_delimiter(Delimiter::Tab)
///     .with_length_marker('#');
/// ```
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    pub indent: usize,
    pub delimiter: Delimiter,
    pub length_marker: Option<char>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            indent: 2,
            delimiter: Delimiter::default(),
            length_marker: None,
        }
    }
}

impl EncodeOptions {
    /// Creates default options (2-space indent, comma delimiter, no marker).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of spaces per indentation level, clamped to `0..=10`.
    ///
    /// An indent of `0` still emits nested structures on separate lines,
    /// just with no leading spaces.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.min(MAX_INDENT);
        self
    }

    /// Sets the delimiter for inline arrays and tabular rows.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the array-length marker character (e.g. `[#3]` instead of `[3]`).
    #[must_use]
    pub fn with_length_marker(mut self, marker: char) -> Self {
        self.length_marker = Some(marker);
        self
    }
}

/// Options controlling TOON parsing.
///
/// Lenient mode (the default) accepts what it can; strict mode turns count
/// and indentation inconsistencies into errors.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{decode, DecodeOptions};
///
/// assert!(decode("items[2]: a,b,c", &DecodeOptions::default()).is_ok());
/// assert!(decode("items[2]: a,b,c", &DecodeOptions::strict()).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    pub strict: bool,
    pub indent: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            strict: false,
            indent: 2,
        }
    }
}

impl DecodeOptions {
    /// Creates default (lenient) options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates strict options: indentation must be a multiple of the indent
    /// width, declared element counts must match, and tabs in indentation
    /// are rejected.
    #[must_use]
    pub fn strict() -> Self {
        DecodeOptions {
            strict: true,
            ..Default::default()
        }
    }

    /// Sets the expected spaces-per-level. Only consulted in strict mode.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Enables or disables strict mode.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
