//! Lookup and assignment over JSON values
//!
//! Reads walk objects by key and arrays by numeric segment. Writes create
//! missing intermediate containers as objects and replace any scalar that
//! sits where a container is needed. A write may append to an array but
//! never pads it.

use serde_json::{Map, Value};
use tracing::trace;

use crate::path::Path;

/// Get the value stored at `path`, if every segment resolves
///
/// An explicit `null` at the path is returned as `Some(&Value::Null)`.
#[must_use]
pub fn get<'a>(value: &'a Value, path: &Path) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(value, |current, segment| step(current, segment))
}

/// Whether `path` resolves to any value, including `null`
#[must_use]
pub fn has(value: &Value, path: &Path) -> bool {
    get(value, path).is_some()
}

/// Whether `path` resolves to a value that is not `null`
#[must_use]
pub fn has_value(value: &Value, path: &Path) -> bool {
    get(value, path).is_some_and(|found| !found.is_null())
}

/// Return a copy of `value` with `new_value` written at `path`
///
/// The input is never modified.
#[must_use]
pub fn set(value: &Value, path: &Path, new_value: Value) -> Value {
    let mut updated = value.clone();
    set_in_place(&mut updated, path, new_value);
    updated
}

/// Write `new_value` at `path` inside a tree the caller owns
pub fn set_in_place(target: &mut Value, path: &Path, new_value: Value) {
    write(target, path.segments(), new_value);
}

fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    }
}

fn write(current: &mut Value, segments: &[String], new_value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *current = new_value;
        return;
    };

    // Arrays grow by at most one slot; any further index turns the array
    // into an object keyed by the segment.
    if let Value::Array(items) = current {
        match head.parse::<usize>() {
            Ok(index) if index < items.len() => {
                write(&mut items[index], rest, new_value);
                return;
            }
            Ok(index) if index == items.len() => {
                items.push(Value::Null);
                write(&mut items[index], rest, new_value);
                return;
            }
            _ => trace!(segment = %head, len = items.len(), "segment does not address array slot"),
        }
    }

    if !current.is_object() {
        if !current.is_null() {
            trace!(segment = %head, "replacing non-container value with object");
        }
        *current = Value::Object(Map::new());
    }

    if let Value::Object(map) = current {
        let slot = map.entry(head.clone()).or_insert(Value::Null);
        write(slot, rest, new_value);
    }
}
