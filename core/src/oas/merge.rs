//! # Deep Merge
//!
//! Merges a JSON/YAML mapping (or another node subtree) into a node,
//! interpreting keys through the target kind's nesting descriptor.
//!
//! Scalar fields follow the default-overwrite law: a value already set on
//! the target is only replaced when `overwrite` is true, so manually
//! authored values survive merges of inferred data while a forced re-merge
//! replaces everything. Append-only array fields (`required`, `enum`,
//! operation `tags`) are always merged by set-union.
//!
//! A key the target kind neither declares as a field nor as a child slot is
//! a hard error (except `x-...` extension keys, which are stored verbatim).

use crate::error::{AppError, AppResult};
use crate::oas::nesting::{nesting, Slot};
use crate::oas::node::Node;
use crate::oas::tree::{get_child, get_collection_item, get_indexed_collection_item};
use serde_json::{Map, Value};

/// Merges a JSON `source` mapping into `target`.
pub fn merge(target: &mut Node, source: &Value, overwrite: bool) -> AppResult<()> {
    match source.as_object() {
        Some(map) => merge_map(target, map, overwrite),
        None => Err(AppError::General(format!(
            "merge source for {} must be a mapping, got {}",
            target.path(),
            source
        ))),
    }
}

/// Merges another node subtree into `target` by serializing it first.
pub fn merge_node(target: &mut Node, source: &Node, overwrite: bool) -> AppResult<()> {
    let value = source.to_value()?;
    merge(target, &value, overwrite)
}

/// Merges a YAML document into `target`.
pub fn merge_yaml(target: &mut Node, yaml: &str, overwrite: bool) -> AppResult<()> {
    let value: Value = serde_yaml::from_str(yaml)
        .map_err(|e| AppError::General(format!("Failed to parse merge YAML: {}", e)))?;
    merge(target, &value, overwrite)
}

fn merge_map(target: &mut Node, source: &Map<String, Value>, overwrite: bool) -> AppResult<()> {
    let nest = nesting(target.kind());
    for (key, value) in source {
        let field = if key == "$ref" { "ref" } else { key.as_str() };
        match nest.slot(field) {
            Some(Slot::Singular(kind)) => {
                // A boolean in a singular slot that doubles as a declared
                // field (additionalProperties) merges as a scalar.
                if !value.is_object() && nest.declares_field(field) {
                    merge_scalar(target, field, value, overwrite);
                    continue;
                }
                merge(get_child(target, kind), value, overwrite)?;
            }
            Some(Slot::Indexed(kind, _)) => {
                let Some(entries) = value.as_object() else {
                    return Err(AppError::General(format!(
                        "expected a mapping for \"{}\" while merging into {}",
                        key,
                        target.path()
                    )));
                };
                for (entry_key, entry_value) in entries {
                    let child = get_indexed_collection_item(
                        target,
                        kind,
                        Value::String(entry_key.clone()),
                    );
                    merge(child, entry_value, overwrite)?;
                }
            }
            Some(Slot::Collection(kind)) => {
                let Some(items) = value.as_array() else {
                    return Err(AppError::General(format!(
                        "expected a list for \"{}\" while merging into {}",
                        key,
                        target.path()
                    )));
                };
                let member_nesting = nesting(kind);
                for item in items {
                    let Some(member) = item.as_object() else {
                        return Err(AppError::General(format!(
                            "expected mapping members in \"{}\" while merging into {}",
                            key,
                            target.path()
                        )));
                    };
                    // Flat fields identify the member; nested slots are
                    // merged recursively after locate-or-create.
                    let mut flat = Map::new();
                    let mut nested = Map::new();
                    for (member_key, member_value) in member {
                        if member_nesting.slot(member_key).is_some() {
                            nested.insert(member_key.clone(), member_value.clone());
                        } else if member_nesting.declares_field(member_key)
                            || member_key.starts_with("x-")
                        {
                            flat.insert(member_key.clone(), member_value.clone());
                        } else {
                            return Err(AppError::UnknownMergeKey {
                                path: format!("{}/{}", target.path(), key),
                                key: member_key.clone(),
                            });
                        }
                    }
                    let child = get_collection_item(target, kind, &flat);
                    merge_map(child, &nested, overwrite)?;
                }
            }
            None => {
                if nest.is_set_field(field) {
                    merge_set_field(target, field, value)?;
                } else if nest.declares_field(field) || field.starts_with("x-") {
                    merge_scalar(target, field, value, overwrite);
                } else {
                    return Err(AppError::UnknownMergeKey {
                        path: target.path().to_string(),
                        key: key.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Writes a scalar field only when forced or still at the unset default.
fn merge_scalar(target: &mut Node, field: &str, value: &Value, overwrite: bool) {
    if overwrite || !target.is_set(field) {
        target.set(field.to_string(), value.clone());
    }
}

/// Set-union for append-only array fields, preserving first-seen order.
fn merge_set_field(target: &mut Node, field: &str, value: &Value) -> AppResult<()> {
    let Some(incoming) = value.as_array() else {
        return Err(AppError::General(format!(
            "expected a list for \"{}\" while merging into {}",
            field,
            target.path()
        )));
    };
    let mut merged = target
        .get(field)
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    for item in incoming {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    target.set(field.to_string(), Value::Array(merged));
    Ok(())
}
