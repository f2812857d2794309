//! # Schema Nodes
//!
//! The typed tree making up a generated API document. Every node carries a
//! closed kind tag; which children it may hold is declared exclusively by the
//! kind's nesting descriptor (see [`crate::oas::nesting`]).
//!
//! Scalar fields distinguish "unset" (absent from the field map) from an
//! explicit `null`, so defaults survive merging and serialization untouched.

use crate::error::{AppError, AppResult};
use crate::oas::nesting::nesting;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// The closed set of node kinds a document tree may contain.
///
/// The seven HTTP verb kinds share one operation descriptor, and the schema
/// family (`Schema`, `Property`, `Items`, `AdditionalProperties`) shares one
/// schema descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The document root.
    OpenApi,
    /// Document metadata (`info`).
    Info,
    /// Reusable component holder (`components`).
    Components,
    /// One entry under `paths`.
    PathItem,
    /// A GET operation.
    Get,
    /// A POST operation.
    Post,
    /// A PUT operation.
    Put,
    /// A PATCH operation.
    Patch,
    /// A DELETE operation.
    Delete,
    /// An OPTIONS operation.
    Options,
    /// A HEAD operation.
    Head,
    /// An operation parameter.
    Parameter,
    /// A named schema under `components/schemas`.
    Schema,
    /// A named property of an object schema.
    Property,
    /// The element schema of an array.
    Items,
    /// The value schema of an open-ended mapping.
    AdditionalProperties,
    /// A response keyed by status code.
    Response,
    /// A response header.
    Header,
    /// A document-level tag.
    Tag,
}

impl NodeKind {
    /// Returns the operation kind for an HTTP method name, if any.
    pub fn from_http_method(method: &str) -> Option<NodeKind> {
        match method.to_ascii_lowercase().as_str() {
            "get" => Some(NodeKind::Get),
            "post" => Some(NodeKind::Post),
            "put" => Some(NodeKind::Put),
            "patch" => Some(NodeKind::Patch),
            "delete" => Some(NodeKind::Delete),
            "options" => Some(NodeKind::Options),
            "head" => Some(NodeKind::Head),
            _ => None,
        }
    }

    /// Whether this kind is one of the seven HTTP operations.
    pub fn is_operation(self) -> bool {
        matches!(
            self,
            NodeKind::Get
                | NodeKind::Post
                | NodeKind::Put
                | NodeKind::Patch
                | NodeKind::Delete
                | NodeKind::Options
                | NodeKind::Head
        )
    }

    /// Whether this kind uses the shared schema descriptor.
    pub fn is_schema(self) -> bool {
        matches!(
            self,
            NodeKind::Schema | NodeKind::Property | NodeKind::Items | NodeKind::AdditionalProperties
        )
    }
}

/// One node of the generated document tree.
///
/// Fields absent from the map are *unset*; `Value::Null` is an explicitly
/// set null. Children live in the slots the kind's nesting descriptor
/// declares and are created lazily by the tree utility.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) fields: Map<String, Value>,
    pub(crate) singular: IndexMap<&'static str, Box<Node>>,
    pub(crate) collections: IndexMap<&'static str, Vec<Node>>,
    pub(crate) path: String,
}

impl Node {
    /// Creates a root node with provenance `#`.
    pub fn new(kind: NodeKind) -> Self {
        Self::with_path(kind, "#".to_string())
    }

    pub(crate) fn with_path(kind: NodeKind, path: String) -> Self {
        Node {
            kind,
            fields: Map::new(),
            singular: IndexMap::new(),
            collections: IndexMap::new(),
            path,
        }
    }

    /// The node's kind tag.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The provenance trail of this node, JSON-pointer-like, for diagnostics.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn set_path(&mut self, path: String) {
        self.path = path;
    }

    /// Returns a field value if it was explicitly set.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether a field was explicitly set (including an explicit `null`).
    pub fn is_set(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Sets a scalar field.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Clears a field back to the unset default, returning the old value.
    pub fn unset(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Returns the singular child in `slot`, if it was created.
    pub fn singular_child(&self, slot: &str) -> Option<&Node> {
        self.singular.get(slot).map(|b| b.as_ref())
    }

    /// Returns the members of the collection in `slot`, if any were created.
    pub fn collection(&self, slot: &str) -> Option<&[Node]> {
        self.collections.get(slot).map(|v| v.as_slice())
    }

    /// Serializes the subtree to a JSON value.
    pub fn to_value(&self) -> AppResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| AppError::General(format!("Failed to serialize {}: {}", self.path, e)))
    }

    /// Writes `fields`, singular children and collections into a serializer
    /// map, optionally skipping one field (used to strip the key field from
    /// indexed collection members).
    fn entries<S: SerializeMap>(&self, map: &mut S, skip: Option<&str>) -> Result<(), S::Error> {
        let nest = nesting(self.kind);
        for (key, value) in &self.fields {
            if Some(key.as_str()) == skip {
                continue;
            }
            // A nested additionalProperties child shadows the boolean field.
            if key == "additionalProperties" && self.singular.contains_key("additionalProperties") {
                continue;
            }
            // The owning path is bookkeeping on operations, not output.
            if key == "path" && self.kind.is_operation() {
                continue;
            }
            let key = if key == "ref" { "$ref" } else { key.as_str() };
            map.serialize_entry(key, value)?;
        }
        for (slot, child) in &self.singular {
            map.serialize_entry(slot, child.as_ref())?;
        }
        for (slot, items) in &self.collections {
            match nest.indexed.iter().find(|(_, s, _)| s == slot) {
                Some((_, _, key_field)) => {
                    map.serialize_entry(slot, &IndexedSlot { items, key_field })?
                }
                None => map.serialize_entry(slot, items)?,
            }
        }
        Ok(())
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeBody {
            node: self,
            skip: None,
        }
        .serialize(serializer)
    }
}

/// A node body with at most one field suppressed.
struct NodeBody<'a> {
    node: &'a Node,
    skip: Option<&'a str>,
}

impl Serialize for NodeBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.node.entries(&mut map, self.skip)?;
        map.end()
    }
}

/// An indexed collection slot rendered as a JSON object keyed by each
/// member's key field, with the key field stripped from the member body.
struct IndexedSlot<'a> {
    items: &'a [Node],
    key_field: &'static str,
}

impl Serialize for IndexedSlot<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for item in self.items {
            let key = match item.get(self.key_field) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            map.serialize_entry(
                &key,
                &NodeBody {
                    node: item,
                    skip: Some(self.key_field),
                },
            )?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::tree;
    use serde_json::json;

    #[test]
    fn test_unset_is_distinct_from_null() {
        let mut node = Node::new(NodeKind::Schema);
        assert!(!node.is_set("default"));
        node.set("default", Value::Null);
        assert!(node.is_set("default"));
        assert_eq!(node.get("default"), Some(&Value::Null));
        node.unset("default");
        assert!(!node.is_set("default"));
    }

    #[test]
    fn test_serialize_ref_field() {
        let mut node = Node::new(NodeKind::Property);
        node.set("ref", "#/components/schemas/User");
        assert_eq!(
            node.to_value().unwrap(),
            json!({"$ref": "#/components/schemas/User"})
        );
    }

    #[test]
    fn test_serialize_indexed_collection_strips_key() {
        let mut schema = Node::new(NodeKind::Schema);
        schema.set("type", "object");
        tree::get_property(&mut schema, "id").set("type", "integer");
        assert_eq!(
            schema.to_value().unwrap(),
            json!({"type": "object", "properties": {"id": {"type": "integer"}}})
        );
    }

    #[test]
    fn test_additional_properties_child_shadows_boolean() {
        let mut schema = Node::new(NodeKind::Schema);
        schema.set("type", "object");
        schema.set("additionalProperties", true);
        tree::get_child(&mut schema, NodeKind::AdditionalProperties).set("type", "string");
        assert_eq!(
            schema.to_value().unwrap(),
            json!({"type": "object", "additionalProperties": {"type": "string"}})
        );
    }

    #[test]
    fn test_http_method_lookup() {
        assert_eq!(NodeKind::from_http_method("GET"), Some(NodeKind::Get));
        assert_eq!(NodeKind::from_http_method("trace"), None);
        assert!(NodeKind::Patch.is_operation());
        assert!(!NodeKind::Tag.is_operation());
    }
}
