//! JSON adapter — `serde_json` on the outside, [`Value`] on the inside.
//!
//! Key order survives both directions (`serde_json` is built with
//! `preserve_order`, so its maps are insertion-ordered). Integers must fit
//! a 64-bit signed value; anything larger is rejected rather than silently
//! widened to a float.

use serde_json::Value as Json;

use crate::error::{Result, SislError};
use crate::value::{Map, Value};

/// Parse JSON text into a document.
pub fn from_json_str(input: &str) -> Result<Value> {
    let parsed: Json = serde_json::from_str(input)?;
    from_json(&parsed)
}

/// Convert a `serde_json` value into a document.
pub fn from_json(json: &Json) -> Result<Value> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if n.is_u64() {
                Err(SislError::JsonParse(format!(
                    "integer {n} does not fit a 64-bit signed value"
                )))
            } else {
                match n.as_f64() {
                    Some(f) => Ok(Value::Float(f)),
                    None => Err(SislError::JsonParse(format!("unrepresentable number {n}"))),
                }
            }
        }
        Json::String(s) => Ok(Value::Str(s.clone())),
        Json::Array(items) => {
            let list = items.iter().map(from_json).collect::<Result<Vec<_>>>()?;
            Ok(Value::List(list))
        }
        Json::Object(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(key.clone(), from_json(value)?);
            }
            Ok(Value::Obj(map))
        }
    }
}

/// Render a document as compact JSON text, key order preserved.
pub fn to_json_string(value: &Value) -> Result<String> {
    let json = to_json(value)?;
    Ok(serde_json::to_string(&json)?)
}

/// Convert a document into a `serde_json` value.
pub fn to_json(value: &Value) -> Result<Json> {
    match value {
        Value::Null => Ok(Json::Null),
        Value::Bool(b) => Ok(Json::Bool(*b)),
        Value::Int(n) => Ok(Json::Number((*n).into())),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .ok_or_else(|| SislError::Encode("non-finite float is not valid JSON".to_string())),
        Value::Str(s) => Ok(Json::String(s.clone())),
        Value::List(items) => {
            let array = items.iter().map(to_json).collect::<Result<Vec<_>>>()?;
            Ok(Json::Array(array))
        }
        Value::Obj(map) => {
            let mut entries = serde_json::Map::new();
            for (key, value) in map {
                entries.insert(key.clone(), to_json(value)?);
            }
            Ok(Json::Object(entries))
        }
    }
}
