//! Named and indexed access strategies.

use serde_json::Value;

use super::{AccessError, PropertyAccessor, PropertyPath};
use crate::{Collection, ElementKey};

/// Follows named properties: every segment must be an existing object field.
#[derive(Clone, Copy, Debug, Default)]
pub struct NamedAccess;

/// Follows keys and positions: array slots by decimal index, object keys by
/// name. Writing may append one past the end of an array or insert a new
/// object key.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexedAccess;

type Step = for<'v> fn(&'v Value, &str) -> Option<&'v Value>;
type StepMut = for<'v> fn(&'v mut Value, &str) -> Option<&'v mut Value>;
type Place = fn(&mut Value, &str, Value) -> Result<(), Value>;

fn named_step<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
    value.as_object()?.get(segment)
}

fn named_step_mut<'v>(value: &'v mut Value, segment: &str) -> Option<&'v mut Value> {
    value.as_object_mut()?.get_mut(segment)
}

fn named_place(parent: &mut Value, segment: &str, value: Value) -> Result<(), Value> {
    match named_step_mut(parent, segment) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(value),
    }
}

fn indexed_step<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
    match value {
        Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
        Value::Object(map) => map.get(segment),
        _ => None,
    }
}

fn indexed_step_mut<'v>(value: &'v mut Value, segment: &str) -> Option<&'v mut Value> {
    match value {
        Value::Array(items) => items.get_mut(segment.parse::<usize>().ok()?),
        Value::Object(map) => map.get_mut(segment),
        _ => None,
    }
}

fn indexed_place(parent: &mut Value, segment: &str, value: Value) -> Result<(), Value> {
    match parent {
        Value::Array(items) => match segment.parse::<usize>() {
            Ok(index) if index == items.len() => {
                items.push(value);
                Ok(())
            }
            Ok(index) => match items.get_mut(index) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(value),
            },
            Err(_) => Err(value),
        },
        Value::Object(map) => {
            map.insert(segment.to_owned(), value);
            Ok(())
        }
        _ => Err(value),
    }
}

fn walk<'v>(
    mut current: &'v Value,
    path: &PropertyPath,
    segments: &[String],
    step: Step,
) -> Result<&'v Value, AccessError> {
    for segment in segments {
        current = step(current, segment).ok_or_else(|| AccessError::not_found(path, segment))?;
    }
    Ok(current)
}

fn write_at(
    target: &mut Value,
    path: &PropertyPath,
    segments: &[String],
    value: Value,
    (step, place): (StepMut, Place),
) -> Result<(), AccessError> {
    let Some((last, parents)) = segments.split_last() else {
        return Err(AccessError::not_found_for(path));
    };
    let mut parent = target;
    for segment in parents {
        parent = step(parent, segment).ok_or_else(|| AccessError::not_found(path, segment))?;
    }
    place(parent, last, value).map_err(|_| AccessError::not_found(path, last))
}

impl PropertyAccessor<Value> for NamedAccess {
    fn read<'t>(&self, target: &'t Value, path: &PropertyPath) -> Result<&'t Value, AccessError> {
        walk(target, path, path.segments(), named_step)
    }

    fn write(
        &self,
        target: &mut Value,
        path: &PropertyPath,
        value: Value,
    ) -> Result<(), AccessError> {
        write_at(
            target,
            path,
            path.segments(),
            value,
            (named_step_mut, named_place),
        )
    }
}

impl PropertyAccessor<Value> for IndexedAccess {
    fn read<'t>(&self, target: &'t Value, path: &PropertyPath) -> Result<&'t Value, AccessError> {
        walk(target, path, path.segments(), indexed_step)
    }

    fn write(
        &self,
        target: &mut Value,
        path: &PropertyPath,
        value: Value,
    ) -> Result<(), AccessError> {
        write_at(
            target,
            path,
            path.segments(),
            value,
            (indexed_step_mut, indexed_place),
        )
    }
}

// Collections expose entries by key only; they have no named properties.
impl PropertyAccessor<Collection> for NamedAccess {
    fn read<'t>(
        &self,
        _target: &'t Collection,
        path: &PropertyPath,
    ) -> Result<&'t Value, AccessError> {
        Err(AccessError::not_found_for(path))
    }

    fn write(
        &self,
        _target: &mut Collection,
        path: &PropertyPath,
        _value: Value,
    ) -> Result<(), AccessError> {
        Err(AccessError::not_found_for(path))
    }
}

impl PropertyAccessor<Collection> for IndexedAccess {
    fn read<'t>(
        &self,
        target: &'t Collection,
        path: &PropertyPath,
    ) -> Result<&'t Value, AccessError> {
        let Some((first, rest)) = path.segments().split_first() else {
            return Err(AccessError::not_found_for(path));
        };
        let entry = target
            .get(&ElementKey::parse(first))
            .ok_or_else(|| AccessError::not_found(path, first))?;
        walk(entry, path, rest, indexed_step)
    }

    fn write(
        &self,
        target: &mut Collection,
        path: &PropertyPath,
        value: Value,
    ) -> Result<(), AccessError> {
        let Some((first, rest)) = path.segments().split_first() else {
            return Err(AccessError::not_found_for(path));
        };
        let key = ElementKey::parse(first);
        if rest.is_empty() {
            target.insert(key, value);
            return Ok(());
        }
        let entry = target
            .get_mut(&key)
            .ok_or_else(|| AccessError::not_found(path, first))?;
        write_at(entry, path, rest, value, (indexed_step_mut, indexed_place))
    }
}
