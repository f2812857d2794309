//! # Nesting Descriptors
//!
//! Per node-kind tables declaring which child slots exist and how they are
//! shaped: singular (one optional child), plain collection (ordered list,
//! matched structurally), or indexed collection (keyed by one scalar field).
//!
//! This is pure data. The tree utility and the merge interpreter branch on
//! these tables alone; no node kind may grow children outside its table.

use crate::oas::node::NodeKind;

/// How one named child slot of a node kind is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// At most one child of the given kind.
    Singular(NodeKind),
    /// An ordered list of children, matched structurally on any fields.
    Collection(NodeKind),
    /// A collection whose members are uniquely keyed by one scalar field.
    Indexed(NodeKind, &'static str),
}

/// The nesting descriptor of one node kind.
pub struct Nesting {
    /// Singular child slots: (child kind, slot name).
    pub singular: &'static [(NodeKind, &'static str)],
    /// Plain collection slots: (member kind, slot name).
    pub collections: &'static [(NodeKind, &'static str)],
    /// Indexed collection slots: (member kind, slot name, key field).
    pub indexed: &'static [(NodeKind, &'static str, &'static str)],
    /// Declared scalar fields.
    pub fields: &'static [&'static str],
    /// Append-only array fields, merged by set-union.
    pub set_fields: &'static [&'static str],
}

impl Nesting {
    /// Resolves a slot name to its shape, if declared.
    pub fn slot(&self, name: &str) -> Option<Slot> {
        if let Some((kind, _)) = self.singular.iter().find(|(_, s)| *s == name) {
            return Some(Slot::Singular(*kind));
        }
        if let Some((kind, _)) = self.collections.iter().find(|(_, s)| *s == name) {
            return Some(Slot::Collection(*kind));
        }
        self.indexed
            .iter()
            .find(|(_, s, _)| *s == name)
            .map(|(kind, _, key)| Slot::Indexed(*kind, key))
    }

    /// The singular slot name holding children of `kind`, if declared.
    pub fn singular_slot(&self, kind: NodeKind) -> Option<&'static str> {
        self.singular
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, s)| *s)
    }

    /// The plain collection slot name holding members of `kind`, if declared.
    pub fn collection_slot(&self, kind: NodeKind) -> Option<&'static str> {
        self.collections
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, s)| *s)
    }

    /// The indexed collection slot (name, key field) for members of `kind`.
    pub fn indexed_slot(&self, kind: NodeKind) -> Option<(&'static str, &'static str)> {
        self.indexed
            .iter()
            .find(|(k, _, _)| *k == kind)
            .map(|(_, s, key)| (*s, *key))
    }

    /// Any slot name (of any shape) that may hold children of `kind`.
    pub fn child_slot(&self, kind: NodeKind) -> Option<&'static str> {
        self.singular_slot(kind)
            .or_else(|| self.collection_slot(kind))
            .or_else(|| self.indexed_slot(kind).map(|(s, _)| s))
    }

    /// Whether `name` is a declared scalar field of this kind.
    pub fn declares_field(&self, name: &str) -> bool {
        self.fields.contains(&name) || self.set_fields.contains(&name)
    }

    /// Whether `name` is an append-only array field.
    pub fn is_set_field(&self, name: &str) -> bool {
        self.set_fields.contains(&name)
    }
}

static OPENAPI: Nesting = Nesting {
    singular: &[
        (NodeKind::Info, "info"),
        (NodeKind::Components, "components"),
    ],
    collections: &[(NodeKind::Tag, "tags")],
    indexed: &[(NodeKind::PathItem, "paths", "path")],
    fields: &["openapi"],
    set_fields: &[],
};

static INFO: Nesting = Nesting {
    singular: &[],
    collections: &[],
    indexed: &[],
    fields: &["title", "description", "version", "termsOfService"],
    set_fields: &[],
};

static COMPONENTS: Nesting = Nesting {
    singular: &[],
    collections: &[],
    indexed: &[(NodeKind::Schema, "schemas", "schema")],
    fields: &[],
    set_fields: &[],
};

static PATH_ITEM: Nesting = Nesting {
    singular: &[
        (NodeKind::Get, "get"),
        (NodeKind::Post, "post"),
        (NodeKind::Put, "put"),
        (NodeKind::Patch, "patch"),
        (NodeKind::Delete, "delete"),
        (NodeKind::Options, "options"),
        (NodeKind::Head, "head"),
    ],
    collections: &[(NodeKind::Parameter, "parameters")],
    indexed: &[],
    fields: &["path", "summary", "description"],
    set_fields: &[],
};

static OPERATION: Nesting = Nesting {
    singular: &[],
    collections: &[(NodeKind::Parameter, "parameters")],
    indexed: &[(NodeKind::Response, "responses", "response")],
    fields: &["path", "operationId", "summary", "description", "deprecated"],
    set_fields: &["tags"],
};

static PARAMETER: Nesting = Nesting {
    singular: &[(NodeKind::Schema, "schema")],
    collections: &[],
    indexed: &[],
    fields: &[
        "name",
        "in",
        "description",
        "required",
        "deprecated",
        "allowEmptyValue",
        "style",
        "example",
    ],
    set_fields: &[],
};

static SCHEMA: Nesting = Nesting {
    singular: &[
        (NodeKind::Items, "items"),
        (NodeKind::AdditionalProperties, "additionalProperties"),
    ],
    collections: &[],
    indexed: &[(NodeKind::Property, "properties", "property")],
    fields: &[
        "ref",
        "schema",
        "property",
        "title",
        "description",
        "type",
        "format",
        "default",
        "example",
        "nullable",
        "readOnly",
        "writeOnly",
        "additionalProperties",
        "pattern",
        "maximum",
        "exclusiveMaximum",
        "minimum",
        "exclusiveMinimum",
        "maxLength",
        "minLength",
        "maxItems",
        "minItems",
        "uniqueItems",
        "multipleOf",
    ],
    set_fields: &["required", "enum"],
};

static RESPONSE: Nesting = Nesting {
    singular: &[(NodeKind::Schema, "schema")],
    collections: &[],
    indexed: &[(NodeKind::Header, "headers", "header")],
    fields: &["response", "description"],
    set_fields: &[],
};

static HEADER: Nesting = Nesting {
    singular: &[(NodeKind::Schema, "schema")],
    collections: &[],
    indexed: &[],
    fields: &["header", "description"],
    set_fields: &[],
};

static TAG: Nesting = Nesting {
    singular: &[],
    collections: &[],
    indexed: &[],
    fields: &["name", "description"],
    set_fields: &[],
};

/// Returns the nesting descriptor of a node kind.
pub fn nesting(kind: NodeKind) -> &'static Nesting {
    match kind {
        NodeKind::OpenApi => &OPENAPI,
        NodeKind::Info => &INFO,
        NodeKind::Components => &COMPONENTS,
        NodeKind::PathItem => &PATH_ITEM,
        NodeKind::Get
        | NodeKind::Post
        | NodeKind::Put
        | NodeKind::Patch
        | NodeKind::Delete
        | NodeKind::Options
        | NodeKind::Head => &OPERATION,
        NodeKind::Parameter => &PARAMETER,
        NodeKind::Schema
        | NodeKind::Property
        | NodeKind::Items
        | NodeKind::AdditionalProperties => &SCHEMA,
        NodeKind::Response => &RESPONSE,
        NodeKind::Header => &HEADER,
        NodeKind::Tag => &TAG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_resolution() {
        let nest = nesting(NodeKind::OpenApi);
        assert_eq!(nest.slot("info"), Some(Slot::Singular(NodeKind::Info)));
        assert_eq!(
            nest.slot("paths"),
            Some(Slot::Indexed(NodeKind::PathItem, "path"))
        );
        assert_eq!(nest.slot("tags"), Some(Slot::Collection(NodeKind::Tag)));
        assert_eq!(nest.slot("nonsense"), None);
    }

    #[test]
    fn test_schema_family_shares_descriptor() {
        assert!(std::ptr::eq(
            nesting(NodeKind::Property),
            nesting(NodeKind::Items)
        ));
        assert!(std::ptr::eq(nesting(NodeKind::Get), nesting(NodeKind::Head)));
    }

    #[test]
    fn test_set_fields_are_declared() {
        let nest = nesting(NodeKind::Schema);
        assert!(nest.is_set_field("required"));
        assert!(nest.declares_field("required"));
        assert!(!nest.is_set_field("type"));
    }

    #[test]
    fn test_child_slot_lookup() {
        let nest = nesting(NodeKind::PathItem);
        assert_eq!(nest.child_slot(NodeKind::Get), Some("get"));
        assert_eq!(nest.child_slot(NodeKind::Parameter), Some("parameters"));
        assert_eq!(nest.child_slot(NodeKind::Tag), None);
    }
}
