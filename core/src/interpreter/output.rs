//! Output rendering
//!
//! Values are printed as JSON with a one-space indent and `/` escaped.
//! Scalars printed by `unstring` use their bare textual form.

use super::types::Value;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::ser::{Formatter, PrettyFormatter};
use std::io::{self, Write};

/* ===================== Rendering ===================== */

/// Serializable view of a value with the key-ordering policy applied
pub struct Rendered<'a> {
    value: &'a Value,
    sort_keys: bool,
}

impl<'a> Rendered<'a> {
    pub fn new(value: &'a Value, sort_keys: bool) -> Self {
        Rendered { value, sort_keys }
    }
}

impl Serialize for Rendered<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Real(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(elements) => {
                let elements = elements.borrow();
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in elements.iter() {
                    seq.serialize_element(&Rendered::new(element, self.sort_keys))?;
                }
                seq.end()
            }
            Value::Object(members) => {
                let members = members.borrow();
                let mut entries: Vec<(&String, &Value)> = members.iter().collect();
                if self.sort_keys {
                    entries.sort_by(|a, b| a.0.cmp(b.0));
                }
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, &Rendered::new(value, self.sort_keys))?;
                }
                map.end()
            }
        }
    }
}

/// Pretty formatter with a one-space indent that escapes forward slashes
struct SlashEscaping<'a> {
    inner: PrettyFormatter<'a>,
}

impl Formatter for SlashEscaping<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut rest = fragment;
        while let Some(idx) = rest.find('/') {
            writer.write_all(rest[..idx].as_bytes())?;
            writer.write_all(b"\\/")?;
            rest = &rest[idx + 1..];
        }
        writer.write_all(rest.as_bytes())
    }
}

/// Render a value as pretty-printed JSON text (no trailing newline)
pub fn to_json_string(value: &Value, sort_keys: bool) -> String {
    let mut buf = Vec::new();
    let formatter = SlashEscaping {
        inner: PrettyFormatter::with_indent(b" "),
    };
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    // Serializing into memory cannot fail and only produces valid UTF-8
    if Rendered::new(value, sort_keys).serialize(&mut serializer).is_err() {
        return "null".to_string();
    }
    String::from_utf8(buf).unwrap_or_default()
}

/// Bare textual form used by `unstring`
///
/// Strings print their raw text; numbers, bools and null print their JSON
/// scalar rendering. Containers have no bare form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
        scalar => Some(to_json_string(scalar, false)),
    }
}
