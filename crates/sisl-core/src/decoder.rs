//! SISL text → document.
//!
//! Converts the parser's AST into a [`Value`] tree, enforcing the tag
//! contract: every scalar payload must validate for its tag, `!obj` and
//! `!list` must carry groupings, and `!list` bodies may only contain `_N`
//! members (gaps densify to `Null`, duplicates are rejected).
//!
//! # Example
//! ```
//! use sisl_core::{parse, Value};
//!
//! let doc = parse(r#"{count: !int "42"}"#).unwrap();
//! assert_eq!(doc.as_obj().unwrap()["count"], Value::Int(42));
//! ```

use crate::error::{Result, SislError};
use crate::parser::{Element, Grouping, Parser, Payload};
use crate::value::{Map, Tag, Value};

/// Parse one SISL document into a `Value::Obj`.
pub fn parse(input: &str) -> Result<Value> {
    let grouping = Parser::new(input).parse()?;
    Ok(Value::Obj(build_obj(&grouping)?))
}

fn build_obj(grouping: &Grouping) -> Result<Map> {
    let mut map = Map::new();
    for element in &grouping.elements {
        map.insert(element.name.clone(), build_value(element)?);
    }
    Ok(map)
}

fn build_value(element: &Element) -> Result<Value> {
    match &element.payload {
        Payload::Text(text) => decode_scalar(element.tag, text),
        Payload::Group(group) => match element.tag {
            Tag::Obj => Ok(Value::Obj(build_obj(group)?)),
            Tag::List => Ok(Value::List(build_list(group)?)),
            tag => Err(SislError::SislTag(format!(
                "tag '!{}' takes a quoted payload, got a grouping",
                tag.as_str()
            ))),
        },
    }
}

/// Decode a scalar payload for its tag. Shared with the joiner, which
/// performs the same validation on its sparse view.
pub(crate) fn decode_scalar(tag: Tag, text: &str) -> Result<Value> {
    match tag {
        Tag::Str => Ok(Value::Str(text.to_string())),
        Tag::Int => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| SislError::SislTag(format!("invalid integer payload: \"{text}\""))),
        Tag::Float => match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Value::Float(f)),
            _ => Err(SislError::SislTag(format!(
                "invalid float payload: \"{text}\""
            ))),
        },
        Tag::Bool => match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(SislError::SislTag(format!(
                "bool payload must be \"true\" or \"false\", got \"{text}\""
            ))),
        },
        Tag::Null => {
            if text.is_empty() {
                Ok(Value::Null)
            } else {
                Err(SislError::SislTag(format!(
                    "null payload must be empty, got \"{text}\""
                )))
            }
        }
        Tag::Obj | Tag::List => Err(SislError::SislTag(format!(
            "tag '!{}' takes a grouping payload, got a string",
            tag.as_str()
        ))),
    }
}

/// Build a dense list from a `!list` body: length = max(N)+1, positions
/// without an `_N` member become `Null`.
fn build_list(group: &Grouping) -> Result<Vec<Value>> {
    let mut entries: Vec<(usize, Value)> = Vec::with_capacity(group.elements.len());
    for element in &group.elements {
        let index = parse_list_index(&element.name)?;
        if entries.iter().any(|(seen, _)| *seen == index) {
            return Err(SislError::SislListIndex(format!(
                "duplicate list index '_{index}'"
            )));
        }
        entries.push((index, build_value(element)?));
    }
    entries.sort_by_key(|(index, _)| *index);

    let mut list = Vec::new();
    for (index, value) in entries {
        while list.len() < index {
            list.push(Value::Null);
        }
        list.push(value);
    }
    Ok(list)
}

/// Shared with the joiner: list member names must match `_N`.
pub(crate) fn parse_list_index(name: &str) -> Result<usize> {
    let bad = || {
        SislError::SislListIndex(format!(
            "list member '{name}' does not match '_N' with a non-negative index"
        ))
    };
    let digits = name.strip_prefix('_').ok_or_else(bad)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    digits
        .parse::<usize>()
        .map_err(|_| SislError::SislListIndex(format!("list index out of range: '{name}'")))
}
