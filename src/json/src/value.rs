// Copyright 2026 The Swvk Developers.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `JsonValue`: the tagged sum `{null, bool, string, number, array, object}`
//! every value of which carries a [`Location`] that cites where it was
//! parsed from. Equality is structural and ignores both locations and
//! object key order; `duplicate()` deep-copies while preserving locations.

use crate::source::Location;
use std::collections::BTreeMap;
use swvk_core::number;

#[derive(Clone, Debug)]
pub struct JsonValue {
    pub location: Location,
    pub kind: ValueKind,
}

#[derive(Clone, Debug)]
pub enum ValueKind {
    Null,
    Boolean(bool),
    String(String),
    Number(f64),
    Array(Vec<JsonValue>),
    /// Preserves insertion order; the writer only sorts keys when asked to.
    Object(Vec<(String, JsonValue)>),
}

impl JsonValue {
    pub fn new(location: Location, kind: ValueKind) -> Self {
        JsonValue { location, kind }
    }

    pub fn null(location: Location) -> Self {
        Self::new(location, ValueKind::Null)
    }

    pub fn as_object(&self) -> Option<&[(String, JsonValue)]> {
        match &self.kind {
            ValueKind::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match &self.kind {
            ValueKind::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ValueKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.kind {
            ValueKind::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object()?.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Deep copy, preserving every `Location`.
    pub fn duplicate(&self) -> JsonValue {
        let kind = match &self.kind {
            ValueKind::Null => ValueKind::Null,
            ValueKind::Boolean(b) => ValueKind::Boolean(*b),
            ValueKind::String(s) => ValueKind::String(s.clone()),
            ValueKind::Number(n) => ValueKind::Number(*n),
            ValueKind::Array(items) => ValueKind::Array(items.iter().map(JsonValue::duplicate).collect()),
            ValueKind::Object(entries) => {
                ValueKind::Object(entries.iter().map(|(k, v)| (k.clone(), v.duplicate())).collect())
            }
        };
        JsonValue::new(self.location.clone(), kind)
    }

    /// Structural equality: ignores locations and object key order.
    pub fn structurally_equal(&self, other: &JsonValue) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Null, ValueKind::Null) => true,
            (ValueKind::Boolean(a), ValueKind::Boolean(b)) => a == b,
            (ValueKind::String(a), ValueKind::String(b)) => a == b,
            (ValueKind::Number(a), ValueKind::Number(b)) => a.to_bits() == b.to_bits() || a == b,
            (ValueKind::Array(a), ValueKind::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structurally_equal(y))
            }
            (ValueKind::Object(a), ValueKind::Object(b)) => {
                if a.len() != b.len() {
                    return false;
                }
                let a_map: BTreeMap<&str, &JsonValue> = a.iter().map(|(k, v)| (k.as_str(), v)).collect();
                let b_map: BTreeMap<&str, &JsonValue> = b.iter().map(|(k, v)| (k.as_str(), v)).collect();
                a_map.len() == b_map.len()
                    && a_map.iter().all(|(k, v)| b_map.get(k).map_or(false, |other| v.structurally_equal(other)))
            }
            _ => false,
        }
    }

    pub fn write_compact(&self) -> String {
        let mut out = String::new();
        write_value(self, &WriteOptions::compact(), 0, &mut out);
        out
    }

    pub fn write_pretty(&self, indent_text: &str, sort_keys: bool) -> String {
        let options = WriteOptions { separate_lines: true, sort_object_keys: sort_keys, indent_text: indent_text.to_string() };
        let mut out = String::new();
        write_value(self, &options, 0, &mut out);
        out
    }
}

pub struct WriteOptions {
    pub separate_lines: bool,
    pub sort_object_keys: bool,
    pub indent_text: String,
}

impl WriteOptions {
    pub fn compact() -> Self {
        WriteOptions { separate_lines: false, sort_object_keys: false, indent_text: String::new() }
    }

    pub fn pretty(indent_text: impl Into<String>) -> Self {
        WriteOptions { separate_lines: true, sort_object_keys: true, indent_text: indent_text.into() }
    }
}

fn write_indent(out: &mut String, options: &WriteOptions, level: usize) {
    if options.separate_lines {
        out.push('\n');
        for _ in 0..level {
            out.push_str(&options.indent_text);
        }
    }
}

fn write_value(value: &JsonValue, options: &WriteOptions, level: usize, out: &mut String) {
    match &value.kind {
        ValueKind::Null => out.push_str("null"),
        ValueKind::Boolean(true) => out.push_str("true"),
        ValueKind::Boolean(false) => out.push_str("false"),
        ValueKind::String(s) => write_json_string(s, out),
        ValueKind::Number(n) => number::append_double_to_string(out, *n, 10),
        ValueKind::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_indent(out, options, level + 1);
                write_value(item, options, level + 1, out);
            }
            if !items.is_empty() {
                write_indent(out, options, level);
            }
            out.push(']');
        }
        ValueKind::Object(entries) => {
            out.push('{');
            let mut sorted;
            let ordered: &[(String, JsonValue)] = if options.sort_object_keys {
                sorted = entries.clone();
                sorted.sort_by(|a, b| a.0.cmp(&b.0));
                &sorted
            } else {
                entries
            };
            for (i, (key, item)) in ordered.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_indent(out, options, level + 1);
                write_json_string(key, out);
                out.push(':');
                if options.separate_lines {
                    out.push(' ');
                }
                write_value(item, options, level + 1, out);
            }
            if !ordered.is_empty() {
                write_indent(out, options, level);
            }
            out.push('}');
        }
    }
}

fn write_json_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::none()
    }

    #[test]
    fn structural_equality_ignores_key_order() {
        let a = JsonValue::new(
            loc(),
            ValueKind::Object(vec![("a".into(), JsonValue::new(loc(), ValueKind::Number(1.0))), ("b".into(), JsonValue::new(loc(), ValueKind::Number(2.0)))]),
        );
        let b = JsonValue::new(
            loc(),
            ValueKind::Object(vec![("b".into(), JsonValue::new(loc(), ValueKind::Number(2.0))), ("a".into(), JsonValue::new(loc(), ValueKind::Number(1.0)))]),
        );
        assert!(a.structurally_equal(&b));
    }

    #[test]
    fn duplicate_preserves_structure() {
        let v = JsonValue::new(loc(), ValueKind::Array(vec![JsonValue::new(loc(), ValueKind::Boolean(true))]));
        let d = v.duplicate();
        assert!(v.structurally_equal(&d));
    }
}
