//! Layering of argument structs through their JSON form.
//!
//! A field of the overriding layer only wins if it differs from the field's
//! default value, so defaults filled in by `clap` never clobber configured values.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Layers `overrides` on top of `base`.
///
/// # Errors
///
/// Fails if either value does not round trip through JSON.
#[inline]
pub fn merge<T>(base: &T, overrides: &T) -> serde_json::Result<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    let mut merged = serde_json::to_value(base)?;
    let defaults = serde_json::to_value(T::default())?;
    apply(&mut merged, serde_json::to_value(overrides)?, &defaults);
    serde_json::from_value(merged)
}

/// Layers `patch` on top of `value` in place, skipping patch fields equal to `defaults`.
///
/// Fields of `patch` that `defaults` does not know are dropped.
#[inline]
pub fn apply(value: &mut Value, patch: Value, defaults: &Value) {
    let Value::Object(patch) = patch else {
        return;
    };
    let Value::Object(target) = value else {
        return;
    };
    apply_object(target, patch, defaults);
}

/// Walks `patch` alongside `target` and `defaults`.
fn apply_object(target: &mut Map<String, Value>, patch: Map<String, Value>, defaults: &Value) {
    for (key, new) in patch {
        let Some(default) = defaults.get(&key) else {
            log::debug!("ignoring unknown key `{key}`");
            continue;
        };
        if let Some(Value::Object(nested)) = target.get_mut(&key) {
            if let Value::Object(new_nested) = new {
                apply_object(nested, new_nested, default);
                continue;
            }
        }
        if new != *default {
            target.insert(key, new);
        }
    }
}
