//! # Tree Utility
//!
//! Find-or-create operations over the schema node graph, driven entirely by
//! the nesting descriptor table. Callers never attach children by hand;
//! they ask for the child they need and get the existing one or a fresh one.
//!
//! Passing a kind that the parent's descriptor does not declare is a
//! programmer error and panics.

use crate::oas::nesting::nesting;
use crate::oas::node::{Node, NodeKind};
use serde_json::{Map, Value};

/// Escapes a value for use as a JSON-pointer segment in provenance paths.
fn pointer_escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Returns the singular child of `kind` under `parent`, creating it first if
/// it does not exist yet.
///
/// # Panics
///
/// If `kind` is not a singular slot in `parent`'s nesting descriptor.
pub fn get_child(parent: &mut Node, kind: NodeKind) -> &mut Node {
    let slot = nesting(parent.kind()).singular_slot(kind).unwrap_or_else(|| {
        panic!(
            "{:?} is not a singular child of {:?} (at {})",
            kind,
            parent.kind(),
            parent.path()
        )
    });
    if !parent.singular.contains_key(slot) {
        let child = create_child(parent, kind, &Map::new());
        parent.singular.insert(slot, Box::new(child));
    }
    match parent.singular.get_mut(slot) {
        Some(child) => child.as_mut(),
        None => unreachable!(),
    }
}

/// Returns the first member of the `kind` collection under `parent` whose
/// fields all equal `matches`, appending a new member with those fields
/// pre-set when none matches.
///
/// Insertion order is preserved and becomes sibling order in the output.
/// An empty `matches` always appends.
///
/// # Panics
///
/// If `kind` is not a plain collection slot in `parent`'s descriptor.
pub fn get_collection_item<'a>(
    parent: &'a mut Node,
    kind: NodeKind,
    matches: &Map<String, Value>,
) -> &'a mut Node {
    let slot = nesting(parent.kind())
        .collection_slot(kind)
        .unwrap_or_else(|| {
            panic!(
                "{:?} is not a collection child of {:?} (at {})",
                kind,
                parent.kind(),
                parent.path()
            )
        });
    let found = if matches.is_empty() {
        None
    } else {
        parent.collections.get(slot).and_then(|items| {
            items
                .iter()
                .position(|item| matches.iter().all(|(k, v)| item.get(k) == Some(v)))
        })
    };
    let index = match found {
        Some(index) => index,
        None => {
            let mut child = create_child(parent, kind, matches);
            let next = parent.collections.get(slot).map_or(0, Vec::len);
            child.set_path(format!("{}/{}/{}", parent.path(), slot, next));
            parent.collections.entry(slot).or_default().push(child);
            next
        }
    };
    match parent.collections.get_mut(slot).and_then(|v| v.get_mut(index)) {
        Some(child) => child,
        None => unreachable!(),
    }
}

/// Returns the member of the indexed `kind` collection under `parent` whose
/// key field strictly equals `key` (type and value), creating it when absent.
///
/// # Panics
///
/// If `kind` is not an indexed collection slot in `parent`'s descriptor.
pub fn get_indexed_collection_item<'a>(
    parent: &'a mut Node,
    kind: NodeKind,
    key: Value,
) -> &'a mut Node {
    let (slot, key_field) = nesting(parent.kind())
        .indexed_slot(kind)
        .unwrap_or_else(|| {
            panic!(
                "{:?} is not an indexed collection child of {:?} (at {})",
                kind,
                parent.kind(),
                parent.path()
            )
        });
    let found = parent
        .collections
        .get(slot)
        .and_then(|items| items.iter().position(|item| item.get(key_field) == Some(&key)));
    let index = match found {
        Some(index) => index,
        None => {
            let mut fields = Map::new();
            fields.insert(key_field.to_string(), key.clone());
            let mut child = create_child(parent, kind, &fields);
            let segment = match &key {
                Value::String(s) => pointer_escape(s),
                other => other.to_string(),
            };
            child.set_path(format!("{}/{}/{}", parent.path(), slot, segment));
            let items = parent.collections.entry(slot).or_default();
            items.push(child);
            items.len() - 1
        }
    };
    match parent.collections.get_mut(slot).and_then(|v| v.get_mut(index)) {
        Some(child) => child,
        None => unreachable!(),
    }
}

/// Removes the indexed `kind` member keyed by `key` under `parent`.
/// Returns whether a member was removed.
pub fn remove_indexed_item(parent: &mut Node, kind: NodeKind, key: &Value) -> bool {
    let Some((slot, key_field)) = nesting(parent.kind()).indexed_slot(kind) else {
        return false;
    };
    let Some(items) = parent.collections.get_mut(slot) else {
        return false;
    };
    match items.iter().position(|item| item.get(key_field) == Some(key)) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

/// Creates a detached child node of `kind` with `initial` fields pre-set and
/// provenance under `parent`. The caller attaches it (the locate functions
/// do this internally).
///
/// # Panics
///
/// If `kind` cannot be nested under `parent` at all, or if any of `initial`
/// names a nested-child slot of `kind` — nested slots must be populated by
/// recursive creation, never passed as flat fields.
pub fn create_child(parent: &Node, kind: NodeKind, initial: &Map<String, Value>) -> Node {
    let child_nesting = nesting(kind);
    for key in initial.keys() {
        if child_nesting.slot(key).is_some() {
            panic!(
                "cannot pass nested slot \"{}\" as a flat field when creating {:?} under {}",
                key,
                kind,
                parent.path()
            );
        }
    }
    let slot = nesting(parent.kind()).child_slot(kind).unwrap_or_else(|| {
        panic!(
            "{:?} cannot be nested under {:?} (at {})",
            kind,
            parent.kind(),
            parent.path()
        )
    });
    let mut node = Node::with_path(kind, format!("{}/{}", parent.path(), slot));
    for (key, value) in initial {
        let field = if key == "$ref" { "ref" } else { key.as_str() };
        node.set(field.to_string(), value.clone());
    }
    node
}

/// Returns the path item for `path` under the document root.
pub fn get_path<'a>(api: &'a mut Node, path: &str) -> &'a mut Node {
    get_indexed_collection_item(api, NodeKind::PathItem, Value::String(path.to_string()))
}

/// Returns the named schema under `components/schemas`, creating the
/// components holder on the way if needed.
pub fn get_definition<'a>(api: &'a mut Node, name: &str) -> &'a mut Node {
    let components = get_child(api, NodeKind::Components);
    get_indexed_collection_item(components, NodeKind::Schema, Value::String(name.to_string()))
}

/// Returns the nested schema of a parameter, response or header.
pub fn get_schema(node: &mut Node) -> &mut Node {
    get_child(node, NodeKind::Schema)
}

/// Returns the property named `name` of an object schema.
pub fn get_property<'a>(schema: &'a mut Node, name: &str) -> &'a mut Node {
    get_indexed_collection_item(schema, NodeKind::Property, Value::String(name.to_string()))
}

/// Returns the operation for an HTTP `method` under a path item, carrying
/// the owning path into the operation's `path` field.
///
/// # Panics
///
/// If `method` is not a known HTTP method.
pub fn get_operation<'a>(path_item: &'a mut Node, method: &str) -> &'a mut Node {
    let kind = NodeKind::from_http_method(method)
        .unwrap_or_else(|| panic!("unknown HTTP method \"{}\"", method));
    let path = path_item.get("path").cloned();
    let operation = get_child(path_item, kind);
    if let Some(path) = path {
        if !operation.is_set("path") {
            operation.set("path", path);
        }
    }
    operation
}

/// Returns the parameter of an operation matched by `name` and `location`
/// (the `in` member), creating it when absent.
pub fn get_operation_parameter<'a>(
    operation: &'a mut Node,
    name: &str,
    location: &str,
) -> &'a mut Node {
    let mut matches = Map::new();
    matches.insert("name".to_string(), Value::String(name.to_string()));
    matches.insert("in".to_string(), Value::String(location.to_string()));
    get_collection_item(operation, NodeKind::Parameter, &matches)
}
