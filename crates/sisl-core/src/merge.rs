//! Joiner — deep-merges a sequence of SISL fragments into one document.
//!
//! Fragments are folded left to right with these rules at each position:
//!
//! - Obj ⊕ Obj: key union; shared keys merge recursively, new keys append.
//!   First appearance determines position.
//! - List ⊕ List: index-wise merge on the *literal* `_N` indices. Indices
//!   only one side carries are taken as-is; positions no fragment ever set
//!   densify to `Null` at the end.
//! - Anything else (scalar overwrites, type mismatches): the right-hand
//!   side replaces the accumulator. There is no merge failure mode.
//!
//! The fold works on a sparse intermediate rather than on documents:
//! densifying `{_2: ...}` into `[null, null, ...]` before merging would
//! turn unset positions into explicit `Null`s that clobber earlier
//! fragments' values.

use std::collections::btree_map::Entry as ListEntry;
use std::collections::BTreeMap;

use indexmap::map::Entry as ObjEntry;
use indexmap::IndexMap;

use crate::decoder;
use crate::error::Result;
use crate::parser::{Element, Grouping, Parser, Payload};
use crate::value::{Tag, Value};

/// Sparse merge tree: objects stay ordered, lists keep their literal `_N`
/// indices, scalars hold the decoded value.
#[derive(Debug, Clone)]
pub(crate) enum Merged {
    Obj(IndexMap<String, Merged>),
    List(BTreeMap<usize, Merged>),
    Scalar(Value),
}

/// Parse each fragment and fold it into the accumulator. A single fragment
/// yields its plain parse; an empty sequence yields `{}`.
pub fn join<S: AsRef<str>>(fragments: &[S]) -> Result<Value> {
    let mut accumulator: Option<Merged> = None;
    for fragment in fragments {
        let grouping = Parser::new(fragment.as_ref()).parse()?;
        let parsed = from_grouping(&grouping)?;
        match accumulator.as_mut() {
            Some(acc) => merge_into(acc, parsed),
            None => accumulator = Some(parsed),
        }
    }
    Ok(match accumulator {
        Some(merged) => merged.into_value(),
        None => Value::Obj(crate::value::Map::new()),
    })
}

pub(crate) fn from_grouping(grouping: &Grouping) -> Result<Merged> {
    let mut entries = IndexMap::new();
    for element in &grouping.elements {
        entries.insert(element.name.clone(), from_element(element)?);
    }
    Ok(Merged::Obj(entries))
}

fn from_element(element: &Element) -> Result<Merged> {
    match &element.payload {
        Payload::Text(text) => Ok(Merged::Scalar(decoder::decode_scalar(element.tag, text)?)),
        Payload::Group(group) => match element.tag {
            Tag::Obj => {
                let mut entries = IndexMap::new();
                for child in &group.elements {
                    entries.insert(child.name.clone(), from_element(child)?);
                }
                Ok(Merged::Obj(entries))
            }
            Tag::List => {
                let mut entries = BTreeMap::new();
                for child in &group.elements {
                    let index = decoder::parse_list_index(&child.name)?;
                    if entries.insert(index, from_element(child)?).is_some() {
                        return Err(crate::error::SislError::SislListIndex(format!(
                            "duplicate list index '_{index}'"
                        )));
                    }
                }
                Ok(Merged::List(entries))
            }
            tag => Err(crate::error::SislError::SislTag(format!(
                "tag '!{}' takes a quoted payload, got a grouping",
                tag.as_str()
            ))),
        },
    }
}

/// Fold `next` into `acc`. Only Obj⊕Obj and List⊕List merge structurally;
/// every other pairing is an overwrite.
pub(crate) fn merge_into(acc: &mut Merged, next: Merged) {
    match (acc, next) {
        (Merged::Obj(left), Merged::Obj(right)) => {
            for (key, value) in right {
                match left.entry(key) {
                    ObjEntry::Occupied(mut slot) => merge_into(slot.get_mut(), value),
                    ObjEntry::Vacant(slot) => {
                        slot.insert(value);
                    }
                }
            }
        }
        (Merged::List(left), Merged::List(right)) => {
            for (index, value) in right {
                match left.entry(index) {
                    ListEntry::Occupied(mut slot) => merge_into(slot.get_mut(), value),
                    ListEntry::Vacant(slot) => {
                        slot.insert(value);
                    }
                }
            }
        }
        (acc, next) => *acc = next,
    }
}

impl Merged {
    /// Densify into a document, filling unset list positions with `Null`.
    pub(crate) fn into_value(self) -> Value {
        match self {
            Merged::Scalar(value) => value,
            Merged::Obj(entries) => Value::Obj(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into_value()))
                    .collect(),
            ),
            Merged::List(entries) => {
                let Some(max) = entries.keys().next_back().copied() else {
                    return Value::List(Vec::new());
                };
                let mut list = vec![Value::Null; max + 1];
                for (index, value) in entries {
                    list[index] = value.into_value();
                }
                Value::List(list)
            }
        }
    }
}
