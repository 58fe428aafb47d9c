//! Textual rendering of [`Object`] values in PDF syntax.
//!
//! Rendering is infallible and deterministic: dictionaries are emitted in
//! [`Dictionary::sorted_keys`] order and reals use the shortest decimal form
//! that round-trips.

use crate::objects::{Dictionary, Object};
use std::fmt::Write as _;

/// Appends the PDF form of `obj` to `out`. `level` is the nesting depth and
/// only affects dictionary indentation.
pub fn write_object(out: &mut Vec<u8>, obj: &Object, level: usize) {
    match obj {
        Object::Null => out.extend_from_slice(b"null"),
        Object::Boolean(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
        Object::Integer(i) => out.extend_from_slice(i.to_string().as_bytes()),
        Object::Real(f) => out.extend_from_slice(format_real(*f).as_bytes()),
        Object::String(s) => out.extend_from_slice(escape_string(s).as_bytes()),
        Object::HexString(bytes) => out.extend_from_slice(hex_string(bytes).as_bytes()),
        Object::Name(n) => out.extend_from_slice(escape_name(n).as_bytes()),
        Object::Array(elements) => write_array(out, elements, level),
        Object::Dictionary(dict) => write_dictionary(out, dict, level),
        Object::Reference(id) => out.extend_from_slice(id.to_string().as_bytes()),
        Object::Raw(fragment) => out.extend_from_slice(fragment.as_bytes()),
    }
}

pub fn write_array(out: &mut Vec<u8>, elements: &[Object], level: usize) {
    out.push(b'[');
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            out.push(b' ');
        }
        write_object(out, element, level);
    }
    out.push(b']');
}

/// Writes `<<`, one indented `/Key value` line per entry and the closing `>>`.
pub fn write_dictionary(out: &mut Vec<u8>, dict: &Dictionary, level: usize) {
    out.extend_from_slice(b"<<\n");
    for key in dict.sorted_keys() {
        out.resize(out.len() + level + 1, b' ');
        out.extend_from_slice(escape_name(key).as_bytes());
        out.push(b' ');
        if let Some(value) = dict.get(key) {
            write_object(out, value, level + 1);
        }
        out.push(b'\n');
    }
    out.resize(out.len() + level, b' ');
    out.extend_from_slice(b">>");
}

/// Renders a name with its leading slash. An existing leading slash is not
/// doubled; delimiters, `#` and bytes outside printable ASCII become `#xx`.
pub fn escape_name(name: &str) -> String {
    let bare = name.strip_prefix('/').unwrap_or(name);
    let mut out = String::with_capacity(bare.len() + 1);
    out.push('/');
    for byte in bare.bytes() {
        let needs_escape = !(0x21..=0x7e).contains(&byte)
            || matches!(
                byte,
                b'#' | b'/' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'%'
            );
        if needs_escape {
            let _ = write!(out, "#{:02x}", byte);
        } else {
            out.push(byte as char);
        }
    }
    out
}

/// Renders a text string: a parenthesized literal when every character is
/// ASCII, otherwise a UTF-16BE hex string with byte order mark.
pub fn escape_string(s: &str) -> String {
    if s.is_ascii() {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('(');
        for c in s.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '(' => out.push_str("\\("),
                ')' => out.push_str("\\)"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '\u{8}' => out.push_str("\\b"),
                '\u{c}' => out.push_str("\\f"),
                other => out.push(other),
            }
        }
        out.push(')');
        out
    } else {
        let mut out = String::from("<feff");
        for unit in s.encode_utf16() {
            let _ = write!(out, "{:04x}", unit);
        }
        out.push('>');
        out
    }
}

pub fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 2);
    out.push('<');
    for byte in bytes {
        let _ = write!(out, "{:02x}", byte);
    }
    out.push('>');
    out
}

/// Shortest decimal representation without exponent. `-0` becomes `0`;
/// NaN and infinities cannot be represented in PDF and become `0`.
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        tracing::warn!("non-finite real {} written as 0", value);
        return "0".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// Rounds a length to 1/100 point.
pub fn round_point(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
