//! Canonical SISL writer.
//!
//! The emitted text is deterministic and bit-exact: one space after each
//! colon, `", "` between members, one space between tag and payload, bare
//! keys in insertion order, list members `_0..`, empty containers as
//! `!obj {}` / `!list {}`. Every conforming implementation must produce
//! identical bytes for equal documents, so this module is the single place
//! that knows the surface grammar on the write side (the splitter's sparse
//! fragments go through here too).
//!
//! # Example
//! ```
//! use sisl_core::{parse, write};
//!
//! let doc = parse(r#"{hello: !str "world"}"#).unwrap();
//! assert_eq!(write(&doc).unwrap(), r#"{hello: !str "world"}"#);
//! ```

use crate::error::{Result, SislError};
use crate::escape;
use crate::merge::Merged;
use crate::value::{Map, Value};

/// Serialize a document to canonical SISL text. The top level must be an
/// object (SISL has no bare-scalar document form).
pub fn write(value: &Value) -> Result<String> {
    let Value::Obj(map) = value else {
        return Err(SislError::Encode(
            "top-level document must be an object".to_string(),
        ));
    };
    let mut out = String::new();
    write_obj_body(map, &mut out)?;
    Ok(out)
}

fn write_obj_body(map: &Map, out: &mut String) -> Result<()> {
    out.push('{');
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(key);
        out.push_str(": ");
        write_value(value, out)?;
    }
    out.push('}');
    Ok(())
}

fn write_list_body(items: &[Value], out: &mut String) -> Result<()> {
    out.push('{');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('_');
        out.push_str(&i.to_string());
        out.push_str(": ");
        write_value(item, out)?;
    }
    out.push('}');
    Ok(())
}

fn write_value(value: &Value, out: &mut String) -> Result<()> {
    out.push('!');
    out.push_str(value.tag().as_str());
    out.push(' ');
    match value {
        Value::Obj(map) => write_obj_body(map, out),
        Value::List(items) => write_list_body(items, out),
        Value::Null => {
            out.push_str("\"\"");
            Ok(())
        }
        Value::Bool(b) => {
            out.push_str(if *b { "\"true\"" } else { "\"false\"" });
            Ok(())
        }
        Value::Int(n) => {
            out.push('"');
            out.push_str(&n.to_string());
            out.push('"');
            Ok(())
        }
        Value::Float(f) => {
            out.push('"');
            out.push_str(&format_float(*f)?);
            out.push('"');
            Ok(())
        }
        Value::Str(s) => {
            out.push('"');
            out.push_str(&escape::escape(s));
            out.push('"');
            Ok(())
        }
    }
}

/// Shortest decimal that re-parses to the same double, with `.0` appended
/// when the text has neither a point nor an exponent so the payload always
/// re-reads as a float.
pub(crate) fn format_float(f: f64) -> Result<String> {
    if !f.is_finite() {
        return Err(SislError::Encode(
            "non-finite float has no canonical form".to_string(),
        ));
    }
    let mut s = f.to_string();
    if !s.contains(['.', 'e', 'E']) {
        s.push_str(".0");
    }
    Ok(s)
}

/// Serialize a splitter fragment. Same grammar as [`write`], except list
/// bodies keep the fragment's sparse `_N` indices instead of densifying.
pub(crate) fn write_fragment(fragment: &Merged) -> Result<String> {
    let Merged::Obj(entries) = fragment else {
        return Err(SislError::Encode(
            "fragment top level must be an object".to_string(),
        ));
    };
    let mut out = String::new();
    write_sparse_obj_body(entries, &mut out)?;
    Ok(out)
}

fn write_sparse_obj_body(
    entries: &indexmap::IndexMap<String, Merged>,
    out: &mut String,
) -> Result<()> {
    out.push('{');
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(key);
        out.push_str(": ");
        write_sparse_value(value, out)?;
    }
    out.push('}');
    Ok(())
}

fn write_sparse_value(value: &Merged, out: &mut String) -> Result<()> {
    match value {
        Merged::Scalar(scalar) => write_value(scalar, out),
        Merged::Obj(entries) => {
            out.push_str("!obj ");
            write_sparse_obj_body(entries, out)
        }
        Merged::List(entries) => {
            out.push_str("!list {");
            for (i, (index, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('_');
                out.push_str(&index.to_string());
                out.push_str(": ");
                write_sparse_value(value, out)?;
            }
            out.push('}');
            Ok(())
        }
    }
}
