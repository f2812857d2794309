//! # Class Metadata
//!
//! The property metadata model the description engine consumes, and the
//! traits at the seams to the external collaborators: the metadata source,
//! the naming strategy and the override annotation reader.

use crate::groups::GroupSpec;
use crate::oas::node::Node;
use indexmap::IndexMap;
use std::collections::HashSet;

/// A declared type: a name plus nested parameters for collection/map types.
///
/// `array<Point>` is `name: "array", params: [Point]`; a string-keyed map
/// `array<string, int>` carries two parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// The type name (primitive, collection or class).
    pub name: String,
    /// Nested type parameters.
    pub params: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// A parameterless type.
    pub fn new(name: impl Into<String>) -> Self {
        TypeDescriptor {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// A type with explicit parameters.
    pub fn with_params(name: impl Into<String>, params: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor {
            name: name.into(),
            params,
        }
    }

    /// An ordered collection of `element`.
    pub fn array_of(element: TypeDescriptor) -> Self {
        Self::with_params("array", vec![element])
    }

    /// A string-keyed map whose values are `value`.
    pub fn map_of(value: TypeDescriptor) -> Self {
        Self::with_params("array", vec![TypeDescriptor::new("string"), value])
    }
}

/// An opaque reflection handle used for override annotation lookup.
///
/// A property whose metadata carries no handle falls back to plain
/// name-based node location, skipping override resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyHandle {
    /// The physically declaring class.
    pub class: String,
    /// The field name on that class.
    pub name: String,
}

impl PropertyHandle {
    /// Creates a handle for `class::name`.
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        PropertyHandle {
            class: class.into(),
            name: name.into(),
        }
    }
}

/// Metadata of one serializable property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMetadata {
    /// The declaring class.
    pub class: String,
    /// The internal field name.
    pub name: String,
    /// A declared serialized name, overriding the naming strategy.
    pub serialized_name: Option<String>,
    /// Declared types. Zero means the type could not be resolved; more than
    /// one is an ambiguity the engine refuses to guess around.
    pub types: Vec<TypeDescriptor>,
    /// Declared serialization group membership.
    pub groups: Vec<String>,
    /// Reflection handle for override lookup, when the property physically
    /// exists.
    pub reflection: Option<PropertyHandle>,
}

impl PropertyMetadata {
    /// Creates metadata for `class::name` with a reflection handle and no
    /// declared type or groups.
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        let class = class.into();
        let name = name.into();
        PropertyMetadata {
            reflection: Some(PropertyHandle::new(class.clone(), name.clone())),
            class,
            name,
            serialized_name: None,
            types: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Sets the single declared type.
    pub fn with_type(mut self, ty: TypeDescriptor) -> Self {
        self.types = vec![ty];
        self
    }

    /// Sets the declared serialized name.
    pub fn with_serialized_name(mut self, name: impl Into<String>) -> Self {
        self.serialized_name = Some(name.into());
        self
    }

    /// Sets the declared group membership.
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Drops the reflection handle, marking the property as not physically
    /// present.
    pub fn without_reflection(mut self) -> Self {
        self.reflection = None;
        self
    }
}

/// Metadata of one class: its ordered property list.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetadata {
    /// The class name.
    pub class: String,
    /// Property metadata in declaration order.
    pub properties: Vec<PropertyMetadata>,
}

impl ClassMetadata {
    /// Creates metadata for `class` with no properties.
    pub fn new(class: impl Into<String>) -> Self {
        ClassMetadata {
            class: class.into(),
            properties: Vec::new(),
        }
    }

    /// Appends one property.
    pub fn with_property(mut self, property: PropertyMetadata) -> Self {
        self.properties.push(property);
        self
    }
}

/// The source of class metadata.
pub trait MetadataSource {
    /// Returns the metadata for `class`, if the source knows it.
    fn metadata_for_class(&self, class: &str) -> Option<&ClassMetadata>;

    /// Whether `class` resolves to a describable class at all. Defaults to
    /// metadata presence.
    fn class_exists(&self, class: &str) -> bool {
        self.metadata_for_class(class).is_some()
    }

    /// Whether `class` is a date/time-like class, rendered as an RFC 3339
    /// string.
    fn is_datetime(&self, class: &str) -> bool {
        matches!(class, "DateTime" | "DateTimeImmutable" | "DateTimeInterface")
    }
}

/// Maps an internal field name to its serialized name.
pub trait NamingStrategy {
    /// Translates the exposed name of a property.
    fn translate_name(&self, property: &PropertyMetadata) -> String;
}

/// Reader for manually authored schema overrides attached to source
/// declarations. All hooks default to no-ops.
pub trait OverrideReader {
    /// The schema-tree slot name for a property, given the computed default.
    fn property_name(&self, property: &PropertyHandle, default: &str) -> String {
        let _ = property;
        default.to_string()
    }

    /// Applies manually authored values to a property node in place.
    fn update_property(&self, property: &PropertyHandle, node: &mut Node, groups: Option<&GroupSpec>) {
        let _ = (property, node, groups);
    }

    /// Applies manually authored values to a class schema node in place.
    fn update_schema(&self, class: &str, node: &mut Node) {
        let _ = (class, node);
    }
}

/// An override reader that never overrides anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl OverrideReader for NoOverrides {}

/// An in-memory metadata source, filled up-front.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataSource {
    classes: IndexMap<String, ClassMetadata>,
    datetime_classes: HashSet<String>,
}

impl StaticMetadataSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the metadata of one class.
    pub fn with_class(mut self, metadata: ClassMetadata) -> Self {
        self.classes.insert(metadata.class.clone(), metadata);
        self
    }

    /// Registers an additional date/time-like class name.
    pub fn with_datetime_class(mut self, class: impl Into<String>) -> Self {
        self.datetime_classes.insert(class.into());
        self
    }
}

impl MetadataSource for StaticMetadataSource {
    fn metadata_for_class(&self, class: &str) -> Option<&ClassMetadata> {
        self.classes.get(class)
    }

    fn is_datetime(&self, class: &str) -> bool {
        self.datetime_classes.contains(class)
            || matches!(class, "DateTime" | "DateTimeImmutable" | "DateTimeInterface")
    }
}
