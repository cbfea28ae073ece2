//! TOON decoding.
//!
//! The decoder runs in two stages: the scanner (see [`crate::scan`]) turns
//! input lines into tokens, and the parser here reassembles a [`Value`]
//! tree from the token stream using indentation alone. Lenient mode (the
//! default) accepts what it can; strict mode turns count and indentation
//! inconsistencies into errors.
//!
//! ## Usage
//!
//! ```rust
//! use toon_codec::{decode, DecodeOptions, Value};
//!
//! let value = decode("id: 1\nname: Ada", &DecodeOptions::default()).unwrap();
//! let obj = value.as_object().unwrap();
//! assert_eq!(obj.get("id"), Some(&Value::Number(1.0)));
//! ```
//!
//! Typed deserialization goes through the same pipeline:
//!
//! ```rust
//! use serde::Deserialize;
//! use toon_codec::from_str;
//!
//! #[derive(Deserialize, PartialEq, Debug)]
//! struct Offset { dx: i32, dy: i32 }
//!
//! let offset: Offset = from_str("dx: 4\ndy: -1").unwrap();
//! assert_eq!(offset, Offset { dx: 4, dy: -1 });
//! ```

use crate::options::{DecodeOptions, Delimiter};
use crate::scan::{scan, Token, TokenKind};
use crate::syntax::{self, Header};
use crate::{Error, Map, Result, Value};
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// Decodes TOON text into a value.
///
/// Empty or whitespace-only input decodes to `Null`. A bare primitive on
/// the first line decodes to that primitive, an unkeyed array header to an
/// array, and anything else to an object of the indent-0 entries.
///
/// # Errors
///
/// Returns an error for malformed input (unterminated strings, invalid
/// escapes, missing colons) and, in strict mode, for count mismatches and
/// indentation violations. Errors carry a 1-based line number.
pub fn decode(input: &str, options: &DecodeOptions) -> Result<Value> {
    let tokens = scan(input, options)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        options: options.clone(),
    };
    parser.parse_document()
}

/// Deserializes a value into any `T: Deserialize`.
///
/// # Errors
///
/// Returns an error when the value's shape does not match `T`.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: de::DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    options: DecodeOptions,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    fn parse_document(&mut self) -> Result<Value> {
        match self.peek().kind.clone() {
            TokenKind::Eof => Ok(Value::Null),
            TokenKind::Value(text) => {
                let line = self.peek().line;
                self.bump();
                parse_scalar(&text, line)
            }
            TokenKind::ArrayHeader(header) if header.key.is_none() => {
                let (indent, line) = (self.peek().indent, self.peek().line);
                self.bump();
                self.parse_array(header, indent, line)
            }
            _ => {
                let base = self.peek().indent;
                self.parse_object(base)
            }
        }
    }

    /// Keyed entries at a fixed base indent. Stops at the first token that
    /// does not belong to the object.
    fn parse_object(&mut self, base: usize) -> Result<Value> {
        let mut map = Map::new();
        loop {
            match self.peek().kind.clone() {
                TokenKind::ArrayHeader(header)
                    if self.peek().indent == base && header.key.is_some() =>
                {
                    let (indent, line) = (self.peek().indent, self.peek().line);
                    self.bump();
                    let key = header
                        .key
                        .as_deref()
                        .map(syntax::decode_key)
                        .unwrap_or_default();
                    let value = self.parse_array(header, indent, line)?;
                    map.insert(key, value);
                }
                TokenKind::Key(_) if self.peek().indent == base => {
                    let (key, value) = self.parse_keyed_entry(base)?;
                    map.insert(key, value);
                }
                _ => break,
            }
        }
        Ok(Value::Object(map))
    }

    /// One `key: …` entry whose key token sits at `base`.
    fn parse_keyed_entry(&mut self, base: usize) -> Result<(String, Value)> {
        let key_token = self.bump();
        let key_line = key_token.line;
        let key_tab = key_token.had_tab;
        let raw_key = match key_token.kind {
            TokenKind::Key(raw) => raw,
            _ => return Err(Error::structure(key_line, "expected key")),
        };
        let key = syntax::decode_key(&raw_key);
        if matches!(self.peek().kind, TokenKind::Colon) {
            self.bump();
        } else {
            return Err(Error::structure(
                key_line,
                format!("missing ':' after key '{key}'"),
            ));
        }
        let value = self.parse_value_for_key(base, key_line, key_tab)?;
        Ok((key, value))
    }

    fn parse_value_for_key(&mut self, base: usize, key_line: usize, key_tab: bool) -> Result<Value> {
        let next = self.peek().clone();
        match next.kind {
            TokenKind::Value(text) if next.line == key_line => {
                self.bump();
                parse_scalar(&text, next.line)
            }
            TokenKind::ArrayHeader(header) if next.line == key_line => {
                self.bump();
                self.parse_array(header, next.indent, next.line)
            }
            TokenKind::Value(_) if next.indent > base => {
                Err(Error::structure(next.line, "missing ':' after key"))
            }
            TokenKind::ListItem(_) if next.indent > base => {
                let (items, _) = self.parse_list_items(next.indent)?;
                Ok(Value::Array(items))
            }
            TokenKind::ArrayHeader(ref header) if next.indent > base && header.key.is_none() => {
                let header = header.clone();
                self.bump();
                self.parse_array(header, next.indent, next.line)
            }
            TokenKind::Key(_) | TokenKind::ArrayHeader(_) if next.indent > base => {
                self.parse_object(next.indent)
            }
            // compact documents cannot indent children; a run of keys after
            // a childless parent reads as that parent's body
            TokenKind::Key(_)
                if next.indent == base && self.options.indent == 0 && !next.had_tab =>
            {
                self.parse_object(base)
            }
            // tab-indented lines land on the same column as their parent
            // when the parent used spaces; the tab flag marks them as
            // children rather than siblings
            TokenKind::Key(_) if next.indent == base && next.had_tab && !key_tab => {
                self.parse_tab_children(base)
            }
            _ => Ok(Value::Object(Map::new())),
        }
    }

    fn parse_tab_children(&mut self, base: usize) -> Result<Value> {
        let mut map = Map::new();
        while matches!(self.peek().kind, TokenKind::Key(_))
            && self.peek().indent == base
            && self.peek().had_tab
        {
            let (key, value) = self.parse_keyed_entry(base)?;
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self, header: Header, header_indent: usize, header_line: usize) -> Result<Value> {
        let delimiter = header.delimiter;

        if header.length == 0 {
            if self.options.strict && header.inline.is_some() {
                return Err(Error::count(
                    header_line,
                    "array declared empty but carries inline elements",
                ));
            }
            return Ok(Value::Array(Vec::new()));
        }

        if let Some(payload) = &header.inline {
            let cells = syntax::split_delimited(payload, delimiter.as_char());
            if self.options.strict && cells.len() != header.length {
                return Err(Error::count(
                    header_line,
                    format!(
                        "expected {} inline elements, found {}",
                        header.length,
                        cells.len()
                    ),
                ));
            }
            let mut elements = Vec::with_capacity(cells.len());
            for cell in &cells {
                elements.push(parse_scalar(cell, header_line)?);
            }
            return Ok(Value::Array(elements));
        }

        if let Some(fields) = &header.fields {
            return self.parse_tabular_rows(fields, header.length, delimiter, header_indent, header_line);
        }

        match self.peek().kind.clone() {
            TokenKind::ListItem(_) if self.peek().indent > header_indent => {
                let item_indent = self.peek().indent;
                let (items, saw_nested_array) = self.parse_list_items(item_indent)?;
                // counting is unreliable once items hold their own arrays,
                // so the length check only applies to simple contents
                if !saw_nested_array && items.len() != header.length {
                    return Err(Error::count(
                        header_line,
                        format!("expected {} list items, found {}", header.length, items.len()),
                    ));
                }
                Ok(Value::Array(items))
            }
            TokenKind::Value(text) if self.peek().indent > header_indent => {
                let line = self.peek().line;
                self.bump();
                let cells = syntax::split_delimited(&text, delimiter.as_char());
                if self.options.strict && cells.len() != header.length {
                    return Err(Error::count(
                        line,
                        format!("expected {} elements, found {}", header.length, cells.len()),
                    ));
                }
                let mut elements = Vec::with_capacity(cells.len());
                for cell in &cells {
                    elements.push(parse_scalar(cell, line)?);
                }
                Ok(Value::Array(elements))
            }
            _ => {
                if self.options.strict {
                    Err(Error::count(
                        header_line,
                        format!("array declares {} elements but has none", header.length),
                    ))
                } else {
                    Ok(Value::Array(Vec::new()))
                }
            }
        }
    }

    fn parse_tabular_rows(
        &mut self,
        fields: &[String],
        length: usize,
        delimiter: Delimiter,
        header_indent: usize,
        header_line: usize,
    ) -> Result<Value> {
        let names: Vec<String> = fields.iter().map(|f| syntax::decode_key(f)).collect();
        let mut rows = Vec::new();
        loop {
            let text = match &self.peek().kind {
                TokenKind::Value(text) if self.peek().indent > header_indent => text.clone(),
                _ => break,
            };
            let line = self.peek().line;
            self.bump();
            let cells = syntax::split_delimited(&text, delimiter.as_char());
            if self.options.strict && cells.len() != names.len() {
                return Err(Error::count(
                    line,
                    format!("row has {} cells, header names {} fields", cells.len(), names.len()),
                ));
            }
            let mut obj = Map::new();
            for (i, name) in names.iter().enumerate() {
                let value = match cells.get(i) {
                    Some(cell) => parse_scalar(cell, line)?,
                    None => Value::Null,
                };
                obj.insert(name.clone(), value);
            }
            rows.push(Value::Object(obj));
        }
        if self.options.strict && rows.len() != length {
            return Err(Error::count(
                header_line,
                format!("expected {} rows, found {}", length, rows.len()),
            ));
        }
        Ok(Value::Array(rows))
    }

    /// Items at indent ≥ `base`. The bool reports whether any item held a
    /// nested array, which disables list length validation.
    fn parse_list_items(&mut self, base: usize) -> Result<(Vec<Value>, bool)> {
        let mut items = Vec::new();
        let mut saw_nested_array = false;
        loop {
            let token = self.peek().clone();
            let content = match token.kind {
                TokenKind::ListItem(content) if token.indent >= base => content,
                _ => break,
            };
            self.bump();

            if content.is_empty() {
                items.push(Value::Object(Map::new()));
                continue;
            }

            if let Some(header) = syntax::parse_header(&content) {
                saw_nested_array = true;
                match header.key.clone() {
                    None => items.push(self.parse_array(header, token.indent, token.line)?),
                    Some(raw_key) => {
                        let key = syntax::decode_key(&raw_key);
                        let value = self.parse_array(header, token.indent, token.line)?;
                        let mut obj = Map::new();
                        obj.insert(key, value);
                        self.merge_item_properties(&mut obj, token.indent)?;
                        items.push(Value::Object(obj));
                    }
                }
                continue;
            }

            if let Some(colon_at) = syntax::find_unquoted_colon(&content) {
                let before = content[..colon_at].trim_end();
                if syntax::is_key_like(before) {
                    let after = content[colon_at + 1..].trim();
                    let key = syntax::decode_key(before);
                    let mut obj = Map::new();
                    let value = if after.is_empty() {
                        self.parse_item_tail(token.indent, &mut saw_nested_array)?
                    } else if let Some(header) =
                        syntax::parse_header(after).filter(|h| h.key.is_none())
                    {
                        saw_nested_array = true;
                        self.parse_array(header, token.indent, token.line)?
                    } else {
                        parse_scalar(after, token.line)?
                    };
                    obj.insert(key, value);
                    saw_nested_array |= self.merge_item_properties(&mut obj, token.indent)?;
                    items.push(Value::Object(obj));
                    continue;
                }
            }

            items.push(parse_scalar(&content, token.line)?);
        }
        Ok((items, saw_nested_array))
    }

    /// Value of a `key:` pair opened on a list-item line with nothing after
    /// the colon: whatever structure follows at deeper indent.
    ///
    /// A fused key's object body sits two levels below the item line (past
    /// the `- ` column and the key's own column). A key only one level
    /// deeper is a continuation property of the list item, which makes the
    /// fused key an empty object.
    fn parse_item_tail(&mut self, item_indent: usize, saw_nested_array: &mut bool) -> Result<Value> {
        let next = self.peek().clone();
        let body_indent = item_indent + 2 * self.options.indent.max(1);
        match next.kind {
            TokenKind::ListItem(_) if next.indent > item_indent => {
                *saw_nested_array = true;
                let (items, _) = self.parse_list_items(next.indent)?;
                Ok(Value::Array(items))
            }
            TokenKind::ArrayHeader(ref header) if next.indent > item_indent && header.key.is_none() => {
                *saw_nested_array = true;
                let header = header.clone();
                self.bump();
                self.parse_array(header, next.indent, next.line)
            }
            TokenKind::Key(_) | TokenKind::ArrayHeader(_) if next.indent >= body_indent => {
                self.parse_object(next.indent)
            }
            TokenKind::Value(_) if next.indent > item_indent => {
                Err(Error::structure(next.line, "missing ':' after key"))
            }
            _ => Ok(Value::Object(Map::new())),
        }
    }

    /// Folds deeper keys and keyed array headers into the current list-item
    /// object. Returns whether any merged value was an array.
    fn merge_item_properties(&mut self, obj: &mut Map, item_indent: usize) -> Result<bool> {
        let mut saw_array = false;
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Key(_) if token.indent > item_indent => {
                    let (key, value) = self.parse_keyed_entry(token.indent)?;
                    saw_array |= value.is_array();
                    obj.insert(key, value);
                }
                TokenKind::ArrayHeader(ref header)
                    if token.indent > item_indent && header.key.is_some() =>
                {
                    let header = header.clone();
                    self.bump();
                    let key = header
                        .key
                        .as_deref()
                        .map(syntax::decode_key)
                        .unwrap_or_default();
                    let value = self.parse_array(header, token.indent, token.line)?;
                    saw_array = true;
                    obj.insert(key, value);
                }
                _ => break,
            }
        }
        Ok(saw_array)
    }
}

/// Primitive parsing, applied in order: literals, the strict numeric
/// shape, quoted strings, bare strings. Leading-zero multi-digit integers
/// fall through to strings, matching the encoder's quoting discipline.
fn parse_scalar(text: &str, line: usize) -> Result<Value> {
    match text {
        "null" => return Ok(Value::Null),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    if syntax::is_strict_number(text) {
        if let Ok(n) = text.parse::<f64>() {
            return Ok(Value::from(n));
        }
    }
    if text.starts_with('"') {
        return syntax::unquote(text, line).map(Value::String);
    }
    Ok(Value::String(text.to_string()))
}

/// Deserializer over an already-parsed [`Value`].
struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
                    visitor.visit_i64(n as i64)
                } else {
                    visitor.visit_f64(n)
                }
            }
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Object(obj) => {
                let mut iter = obj.into_iter();
                match (iter.next(), iter.next()) {
                    (Some((variant, value)), None) => {
                        visitor.visit_enum(EnumDeserializer { variant, value })
                    }
                    _ => Err(Error::custom(
                        "expected an object with a single variant key",
                    )),
                }
            }
            _ => Err(Error::custom("expected enum")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: Map) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null => Ok(()),
            _ => Err(Error::custom("expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}
