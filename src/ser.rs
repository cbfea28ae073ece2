//! TOON encoding.
//!
//! The encoder walks a [`Value`] tree and picks a surface form for every
//! non-primitive node:
//!
//! - **Inline arrays**: all-primitive arrays stay on the header line
//!   (`tags[3]: a,b,c`)
//! - **Tabular arrays**: arrays of same-shaped flat objects become a header
//!   plus one row per record (`items[2]{id,qty}:`)
//! - **List form**: everything else uses `- ` items
//! - **Objects**: key-per-line, children indented one level deeper
//!
//! Strings are left bare whenever the quoting policy allows, and quoted
//! with the `\" \\ \n \r \t` escape set otherwise. Output never carries
//! trailing spaces or a trailing newline, and is a deterministic function
//! of the value and options.
//!
//! ## Usage
//!
//! ```rust
//! use toon_codec::{encode, toon, EncodeOptions};
//!
//! let value = toon!({ "id": 1, "name": "Ada" });
//! assert_eq!(encode(&value, &EncodeOptions::default()), "id: 1\nname: Ada");
//! ```
//!
//! Rust values serialize through the same pipeline:
//!
//! ```rust
//! use serde::Serialize;
//! use toon_codec::to_string;
//!
//! #[derive(Serialize)]
//! struct Tag { name: String, weight: u32 }
//!
//! let tag = Tag { name: "beta".to_string(), weight: 3 };
//! assert_eq!(to_string(&tag).unwrap(), "name: beta\nweight: 3");
//! ```

use crate::options::{Delimiter, EncodeOptions};
use crate::{syntax, Error, Map, Result, Value};
use serde::{ser, Serialize};

/// Encodes a value as TOON text. Infallible: every `Value` has a rendering.
///
/// A primitive root emits the bare primitive, a root array uses the
/// unkeyed header form, and a root empty object emits the empty string.
pub fn encode(value: &Value, options: &EncodeOptions) -> String {
    let mut writer = LineWriter::new(options.indent);
    match value {
        Value::Object(obj) if obj.is_empty() => {}
        Value::Object(obj) => encode_entries(&mut writer, obj, 0, options),
        Value::Array(arr) => encode_array(&mut writer, "", None, arr, 0, options),
        scalar => {
            let line = format_scalar(scalar, options.delimiter);
            writer.push(0, &line);
        }
    }
    writer.into_string()
}

/// Accumulates fully-formed lines, indenting each by `depth × indent`
/// spaces. The buffer is released to the caller when encoding finishes.
struct LineWriter {
    out: String,
    indent: usize,
}

impl LineWriter {
    fn new(indent: usize) -> Self {
        LineWriter {
            out: String::with_capacity(256),
            indent,
        }
    }

    fn push(&mut self, depth: usize, line: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..depth * self.indent {
            self.out.push(' ');
        }
        self.out.push_str(line);
    }

    fn into_string(self) -> String {
        self.out
    }
}

fn encode_entries(w: &mut LineWriter, map: &Map, depth: usize, options: &EncodeOptions) {
    for (key, value) in map.iter() {
        encode_entry(w, key, value, depth, options);
    }
}

fn encode_entry(w: &mut LineWriter, key: &str, value: &Value, depth: usize, options: &EncodeOptions) {
    let ekey = syntax::encode_key(key);
    match value {
        Value::Object(obj) if obj.is_empty() => w.push(depth, &format!("{ekey}:")),
        Value::Object(obj) => {
            w.push(depth, &format!("{ekey}:"));
            encode_entries(w, obj, depth + 1, options);
        }
        Value::Array(arr) => encode_array(w, "", Some(key), arr, depth, options),
        scalar => {
            let rendered = format_scalar(scalar, options.delimiter);
            w.push(depth, &format!("{ekey}: {rendered}"));
        }
    }
}

/// Emits an array with its chosen shape. `prefix` carries the `- ` marker
/// when the header is fused onto a list-item line.
fn encode_array(
    w: &mut LineWriter,
    prefix: &str,
    key: Option<&str>,
    arr: &[Value],
    depth: usize,
    options: &EncodeOptions,
) {
    if arr.is_empty() {
        let header = syntax::format_header(key, 0, None, options);
        w.push(depth, &format!("{prefix}{header}"));
        return;
    }

    if let Some(fields) = tabular_fields(arr) {
        let header = syntax::format_header(key, arr.len(), Some(&fields), options);
        w.push(depth, &format!("{prefix}{header}"));
        for element in arr {
            if let Value::Object(obj) = element {
                let row: Vec<String> = fields
                    .iter()
                    .map(|f| format_scalar(obj.get(f).unwrap_or(&Value::Null), options.delimiter))
                    .collect();
                w.push(depth + 1, &row.join(options.delimiter.as_str()));
            }
        }
        return;
    }

    if arr.iter().all(Value::is_primitive) {
        let header = syntax::format_header(key, arr.len(), None, options);
        let row: Vec<String> = arr
            .iter()
            .map(|v| format_scalar(v, options.delimiter))
            .collect();
        w.push(
            depth,
            &format!("{prefix}{header} {}", row.join(options.delimiter.as_str())),
        );
        return;
    }

    let header = syntax::format_header(key, arr.len(), None, options);
    w.push(depth, &format!("{prefix}{header}"));
    encode_list_items(w, arr, depth + 1, options);
}

/// Tabular form applies when every element is an object with the same key
/// set as the first element and every field value is primitive. Rows emit
/// in the first element's key order.
fn tabular_fields(arr: &[Value]) -> Option<Vec<String>> {
    let Some(Value::Object(first)) = arr.first() else {
        return None;
    };
    if first.is_empty() || !first.values().all(Value::is_primitive) {
        return None;
    }
    let fields: Vec<String> = first.keys().cloned().collect();
    for element in &arr[1..] {
        let Value::Object(obj) = element else {
            return None;
        };
        if obj.len() != fields.len() {
            return None;
        }
        for field in &fields {
            match obj.get(field) {
                Some(v) if v.is_primitive() => {}
                _ => return None,
            }
        }
    }
    Some(fields)
}

fn encode_list_items(w: &mut LineWriter, items: &[Value], depth: usize, options: &EncodeOptions) {
    for item in items {
        match item {
            Value::Object(obj) if obj.is_empty() => w.push(depth, "-"),
            Value::Object(obj) => encode_list_object(w, obj, depth, options),
            Value::Array(arr) => encode_array(w, "- ", None, arr, depth, options),
            scalar => {
                let rendered = format_scalar(scalar, options.delimiter);
                w.push(depth, &format!("- {rendered}"));
            }
        }
    }
}

/// An object list item fuses its first key onto the `- ` line; remaining
/// keys continue one level deeper. When the first value is itself an
/// object, its body indents two levels to clear both the `- ` column and
/// the key's own column.
fn encode_list_object(w: &mut LineWriter, obj: &Map, depth: usize, options: &EncodeOptions) {
    let mut entries = obj.iter();
    if let Some((first_key, first_value)) = entries.next() {
        let ekey = syntax::encode_key(first_key);
        match first_value {
            Value::Object(inner) if inner.is_empty() => w.push(depth, &format!("- {ekey}:")),
            Value::Object(inner) => {
                w.push(depth, &format!("- {ekey}:"));
                encode_entries(w, inner, depth + 2, options);
            }
            Value::Array(arr) => encode_array(w, "- ", Some(first_key), arr, depth, options),
            scalar => {
                let rendered = format_scalar(scalar, options.delimiter);
                w.push(depth, &format!("- {ekey}: {rendered}"));
            }
        }
    }
    for (key, value) in entries {
        encode_entry(w, key, value, depth + 1, options);
    }
}

fn format_scalar(value: &Value, delimiter: Delimiter) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => {
            if syntax::is_safe_unquoted(s, delimiter) {
                s.clone()
            } else {
                syntax::escape_string(s)
            }
        }
        // containers never reach scalar position; shape selection routes
        // them first
        Value::Array(_) | Value::Object(_) => "null".to_string(),
    }
}

fn format_number(n: f64) -> String {
    if !n.is_finite() {
        "null".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Serializer that projects any `T: Serialize` onto the six-case [`Value`]
/// domain, applying normalization along the way: non-finite floats and
/// unit-ish values become `Null`, integers outside the safe range become
/// decimal strings, and map keys are stringified.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeValueMap {
    map: Map,
    current_key: Option<String>,
}

pub struct SerializeTupleVariantValue {
    variant: &'static str,
    vec: Vec<Value>,
}

pub struct SerializeStructVariantValue {
    variant: &'static str,
    map: Map,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariantValue;
    type SerializeMap = SerializeValueMap;
    type SerializeStruct = SerializeValueMap;
    type SerializeStructVariant = SerializeStructVariantValue;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::from_integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        if v <= i128::MAX as u128 {
            Ok(Value::from_integer(v as i128))
        } else {
            Ok(Value::String(v.to_string()))
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        let vec = v.iter().map(|&b| Value::from(b)).collect();
        Ok(Value::Array(vec))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut map = Map::new();
        map.insert(variant.to_string(), value.serialize(ValueSerializer)?);
        Ok(Value::Object(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariantValue> {
        Ok(SerializeTupleVariantValue {
            variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeValueMap> {
        Ok(SerializeValueMap {
            map: Map::new(),
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeValueMap> {
        self.serialize_map(None)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariantValue> {
        Ok(SerializeStructVariantValue {
            variant,
            map: Map::new(),
        })
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariantValue {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut map = Map::new();
        map.insert(self.variant.to_string(), Value::Array(self.vec));
        Ok(Value::Object(map))
    }
}

impl ser::SerializeMap for SerializeValueMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeValueMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariantValue {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut outer = Map::new();
        outer.insert(self.variant.to_string(), Value::Object(self.map));
        Ok(Value::Object(outer))
    }
}

/// Stringifies scalar map keys. Structural keys have no text form and are
/// rejected.
struct KeySerializer;

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = ser::Impossible<String, Error>;
    type SerializeTuple = ser::Impossible<String, Error>;
    type SerializeTupleStruct = ser::Impossible<String, Error>;
    type SerializeTupleVariant = ser::Impossible<String, Error>;
    type SerializeMap = ser::Impossible<String, Error>;
    type SerializeStruct = ser::Impossible<String, Error>;
    type SerializeStructVariant = ser::Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, v: f32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f64(self, v: f64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(Error::custom("map keys must be strings"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(Error::custom("map keys must be strings"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::custom("map keys must be strings"))
    }

    fn serialize_unit(self) -> Result<String> {
        Err(Error::custom("map keys must be strings"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(Error::custom("map keys must be strings"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::custom("map keys must be strings"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::custom("map keys must be strings"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::custom("map keys must be strings"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::custom("map keys must be strings"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::custom("map keys must be strings"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::custom("map keys must be strings"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Error::custom("map keys must be strings"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::custom("map keys must be strings"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toon;

    fn enc(value: &Value) -> String {
        encode(value, &EncodeOptions::default())
    }

    #[test]
    fn test_flat_object() {
        let v = toon!({ "id": 1, "name": "Ada" });
        assert_eq!(enc(&v), "id: 1\nname: Ada");
    }

    #[test]
    fn test_nested_object() {
        let v = toon!({ "user": { "id": 1 } });
        assert_eq!(enc(&v), "user:\n  id: 1");
    }

    #[test]
    fn test_inline_array() {
        let v = toon!({ "tags": ["foo", "bar"] });
        assert_eq!(enc(&v), "tags[2]: foo,bar");
    }

    #[test]
    fn test_tabular_array() {
        let v = toon!({ "items": [{ "id": 1, "qty": 5 }, { "id": 2, "qty": 3 }] });
        assert_eq!(enc(&v), "items[2]{id,qty}:\n  1,5\n  2,3");
    }

    #[test]
    fn test_tabular_requires_matching_keys() {
        let v = toon!({ "items": [{ "id": 1 }, { "id": 2, "qty": 3 }] });
        assert_eq!(enc(&v), "items[2]:\n  - id: 1\n  - id: 2\n    qty: 3");
    }

    #[test]
    fn test_tabular_field_order_follows_first_element() {
        let v = toon!({ "items": [{ "b": 1, "a": 2 }, { "a": 3, "b": 4 }] });
        assert_eq!(enc(&v), "items[2]{b,a}:\n  1,2\n  4,3");
    }

    #[test]
    fn test_mixed_list() {
        let v = toon!({ "items": [1, { "a": 1 }, "x"] });
        assert_eq!(enc(&v), "items[3]:\n  - 1\n  - a: 1\n  - x");
    }

    #[test]
    fn test_nested_primitive_arrays() {
        let v = toon!({ "pairs": [[1, 2], [3, 4]] });
        assert_eq!(enc(&v), "pairs[2]:\n  - [2]: 1,2\n  - [2]: 3,4");
    }

    #[test]
    fn test_root_array() {
        let v = toon!(["x", "y"]);
        assert_eq!(enc(&v), "[2]: x,y");
    }

    #[test]
    fn test_root_scalar_and_empty_object() {
        assert_eq!(enc(&Value::from(42)), "42");
        assert_eq!(enc(&Value::Null), "null");
        assert_eq!(enc(&toon!({})), "");
    }

    #[test]
    fn test_list_item_object_with_object_first() {
        let v = toon!({ "rows": [{ "meta": { "x": 1 }, "id": 7 }] });
        assert_eq!(enc(&v), "rows[1]:\n  - meta:\n      x: 1\n    id: 7");
    }

    #[test]
    fn test_list_item_object_with_array_first() {
        let v = toon!({ "rows": [{ "tags": ["a", "b"], "id": 7 }] });
        assert_eq!(enc(&v), "rows[1]:\n  - tags[2]: a,b\n    id: 7");
    }

    #[test]
    fn test_zero_indent_flattens() {
        let options = EncodeOptions::new().with_indent(0);
        let v = toon!({ "user": { "id": 1 } });
        assert_eq!(encode(&v, &options), "user:\nid: 1");
    }

    #[test]
    fn test_no_trailing_whitespace() {
        let v = toon!({ "a": { "b": [1, { "c": 2 }] }, "d": [] });
        let out = enc(&v);
        assert!(!out.ends_with('\n'));
        for line in out.lines() {
            assert_eq!(line, line.trim_end());
        }
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "null");
    }

    #[test]
    fn test_stringified_map_keys() {
        use std::collections::BTreeMap;

        let mut map = BTreeMap::new();
        map.insert(1, "one");
        map.insert(2, "two");
        let value = crate::to_value(&map).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.get("1").and_then(Value::as_str), Some("one"));
    }
}
