//! SISL document values.
//!
//! A document is a tree of [`Value`] nodes. Objects are insertion-ordered:
//! key order is part of document equality for every read and write path, so
//! `Obj` is backed by [`IndexMap`] (O(1) lookup, stable iteration order)
//! rather than a plain hash map.

use indexmap::IndexMap;

/// Insertion-ordered mapping used for [`Value::Obj`].
pub type Map = IndexMap<String, Value>;

/// A SISL document value. Mirrors JSON types but separates integers from
/// floats (SISL tags preserve the distinction).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Dense sequence: index `i` implies indices `0..i` exist.
    List(Vec<Value>),
    /// Key-value pairs in insertion order.
    Obj(Map),
}

impl Value {
    /// The SISL type tag for this value.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Null => Tag::Null,
            Value::Bool(_) => Tag::Bool,
            Value::Int(_) => Tag::Int,
            Value::Float(_) => Tag::Float,
            Value::Str(_) => Tag::Str,
            Value::List(_) => Tag::List,
            Value::Obj(_) => Tag::Obj,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_obj(&self) -> bool {
        matches!(self, Value::Obj(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_obj(&self) -> Option<&Map> {
        match self {
            Value::Obj(map) => Some(map),
            _ => None,
        }
    }
}

/// The seven SISL type tags (`!str`, `!int`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Str,
    Int,
    Float,
    Bool,
    Null,
    List,
    Obj,
}

impl Tag {
    /// Tag name as it appears after `!` in SISL text and in the typed-XML
    /// `type` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Str => "str",
            Tag::Int => "int",
            Tag::Float => "float",
            Tag::Bool => "bool",
            Tag::Null => "null",
            Tag::List => "list",
            Tag::Obj => "obj",
        }
    }

    /// Resolve a tag name; `None` for anything outside the seven literals.
    pub fn from_name(name: &str) -> Option<Tag> {
        match name {
            "str" => Some(Tag::Str),
            "int" => Some(Tag::Int),
            "float" => Some(Tag::Float),
            "bool" => Some(Tag::Bool),
            "null" => Some(Tag::Null),
            "list" => Some(Tag::List),
            "obj" => Some(Tag::Obj),
            _ => None,
        }
    }
}
