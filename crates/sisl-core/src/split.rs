//! Splitter — size-bounded fragmentation of a document into SISL strings.
//!
//! Each fragment is a complete, parseable SISL document carrying a subset
//! of the original's paths; the deep merge of all fragments reproduces the
//! original exactly. Fragments wrap every value in its chain of `!obj` /
//! `!list` containers (list wrappers keep the sparse `_N` index of the
//! value, so two fragments can address different positions of one list).
//!
//! The walk never mutates the document: leaves are enumerated with an
//! explicit cursor stack in depth-first insertion order, then greedily
//! packed — each wrapped leaf is deep-merged into the current fragment as
//! long as the fragment's canonical encoding stays within the limit.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::encoder;
use crate::error::{Result, SislError};
use crate::merge::{merge_into, Merged};
use crate::value::Value;

/// One step on the path from the document root to a leaf.
#[derive(Clone)]
enum Step {
    Key(String),
    Index(usize),
}

/// A leaf is a scalar or an empty container — the units the packer moves
/// between fragments. Empty containers count so no path is lost.
struct Leaf<'a> {
    path: Vec<Step>,
    value: &'a Value,
}

/// Split `doc` into an ordered sequence of SISL strings, each at most
/// `max_length` characters. Returns a single-element sequence exactly when
/// the canonical encoding of `doc` fits.
pub fn split(doc: &Value, max_length: usize) -> Result<Vec<String>> {
    let full = encoder::write(doc)?;
    if full.len() <= max_length {
        return Ok(vec![full]);
    }

    let leaves = collect_leaves(doc);
    if leaves.is_empty() {
        // `{}` is the only leafless document; it did not fit above.
        return Err(SislError::FragmentTooLarge {
            required: full.len(),
            max: max_length,
        });
    }

    let mut parts: Vec<String> = Vec::new();
    let mut current: Option<(Merged, String)> = None;

    for leaf in &leaves {
        let fragment = wrap_leaf(leaf);
        let alone = encoder::write_fragment(&fragment)?;
        if alone.len() > max_length {
            return Err(SislError::FragmentTooLarge {
                required: alone.len(),
                max: max_length,
            });
        }

        current = Some(match current {
            None => (fragment, alone),
            Some((acc, acc_text)) => {
                let mut candidate = acc.clone();
                merge_into(&mut candidate, fragment.clone());
                let text = encoder::write_fragment(&candidate)?;
                if text.len() <= max_length {
                    (candidate, text)
                } else {
                    parts.push(acc_text);
                    (fragment, alone)
                }
            }
        });
    }

    if let Some((_, text)) = current {
        parts.push(text);
    }
    Ok(parts)
}

/// Depth-first, insertion-order leaf enumeration with an explicit cursor
/// stack (container + next-child position).
fn collect_leaves(doc: &Value) -> Vec<Leaf<'_>> {
    struct Frame<'a> {
        value: &'a Value,
        next: usize,
    }

    let mut leaves = Vec::new();
    let mut path: Vec<Step> = Vec::new();
    let mut stack = vec![Frame {
        value: doc,
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let child = match frame.value {
            Value::Obj(map) => map
                .get_index(frame.next)
                .map(|(key, value)| (Step::Key(key.clone()), value)),
            Value::List(items) => items
                .get(frame.next)
                .map(|value| (Step::Index(frame.next), value)),
            _ => None,
        };

        match child {
            Some((step, value)) => {
                frame.next += 1;
                let is_branch = match value {
                    Value::Obj(map) => !map.is_empty(),
                    Value::List(items) => !items.is_empty(),
                    _ => false,
                };
                if is_branch {
                    path.push(step);
                    stack.push(Frame { value, next: 0 });
                } else {
                    let mut leaf_path = path.clone();
                    leaf_path.push(step);
                    leaves.push(Leaf {
                        path: leaf_path,
                        value,
                    });
                }
            }
            None => {
                stack.pop();
                path.pop();
            }
        }
    }

    leaves
}

/// Rebuild the container chain that carries one leaf to its position.
fn wrap_leaf(leaf: &Leaf<'_>) -> Merged {
    let mut current = match leaf.value {
        Value::Obj(_) => Merged::Obj(IndexMap::new()),
        Value::List(_) => Merged::List(BTreeMap::new()),
        scalar => Merged::Scalar(scalar.clone()),
    };
    for step in leaf.path.iter().rev() {
        current = match step {
            Step::Key(key) => {
                let mut entries = IndexMap::new();
                entries.insert(key.clone(), current);
                Merged::Obj(entries)
            }
            Step::Index(index) => {
                let mut entries = BTreeMap::new();
                entries.insert(*index, current);
                Merged::List(entries)
            }
        };
    }
    current
}
