//! # Model Description Engine
//!
//! Walks the property metadata of one class and fills an object schema node:
//! group-based visibility filtering, name resolution, manual override
//! application, then recursive type classification. Nested object types are
//! routed through the model registry, which owns reference identity.
//!
//! The engine keeps two session-scoped caches: whether a class's metadata
//! uses groups at all (tri-state, unresolvable classes cached as unknown),
//! and group specifications remembered against nested model identities so a
//! later description of that model recovers its propagated filtering. Both
//! belong to one document build; create a fresh engine per build.

use crate::error::{AppError, AppResult};
use crate::groups::{normalized, should_skip_property, GroupSpec, DEFAULT_GROUP};
use crate::metadata::{MetadataSource, NamingStrategy, OverrideReader, TypeDescriptor};
use crate::model::{Model, ModelIdentity};
use crate::oas::node::{Node, NodeKind};
use crate::oas::tree;
use crate::registry::ModelRegistry;
use serde_json::Value;
use std::collections::HashMap;

/// Type names treated as homogeneous collections.
const COLLECTION_TYPES: [&str; 2] = ["array", "ArrayCollection"];

/// Primitive kinds that cannot be represented in a schema.
const UNSUPPORTED_TYPES: [&str; 4] = ["callable", "iterable", "resource", "mixed"];

/// Names the property being classified, for error reporting.
struct ItemContext<'c> {
    class: &'c str,
    property: &'c str,
}

/// The recursive model description engine. One instance per document build.
pub struct ModelDescriber<'a> {
    source: &'a dyn MetadataSource,
    naming: Option<&'a dyn NamingStrategy>,
    overrides: &'a dyn OverrideReader,
    previous_groups: HashMap<ModelIdentity, GroupSpec>,
    uses_groups_cache: HashMap<String, Option<bool>>,
}

impl<'a> ModelDescriber<'a> {
    /// Creates an engine over a metadata source and an override reader.
    pub fn new(source: &'a dyn MetadataSource, overrides: &'a dyn OverrideReader) -> Self {
        ModelDescriber {
            source,
            naming: None,
            overrides,
            previous_groups: HashMap::new(),
            uses_groups_cache: HashMap::new(),
        }
    }

    /// Installs a naming strategy. When present it decides every exposed
    /// property name and propagated groups degrade to the default marker.
    pub fn with_naming_strategy(mut self, naming: &'a dyn NamingStrategy) -> Self {
        self.naming = Some(naming);
        self
    }

    /// Whether the metadata source has metadata for the model's class.
    /// No side effects.
    pub fn supports(&self, model: &Model) -> bool {
        self.source.metadata_for_class(model.class()).is_some()
    }

    /// Describes `model` into `schema`. Idempotent on nodes carrying manual
    /// overrides: an already decided `type` or `ref` is never clobbered.
    pub fn describe(
        &mut self,
        model: &Model,
        registry: &mut dyn ModelRegistry,
        schema: &mut Node,
    ) -> AppResult<()> {
        let source = self.source;
        let overrides = self.overrides;
        let class = model.class();
        let metadata = source
            .metadata_for_class(class)
            .ok_or_else(|| AppError::NoMetadataFound {
                class: class.to_string(),
            })?;
        log::debug!(
            "describing {} ({} properties)",
            class,
            metadata.properties.len()
        );

        schema.set("type", "object");
        overrides.update_schema(class, schema);

        let identity = model.identity();
        for item in &metadata.properties {
            if let Some(spec) = model.groups() {
                if should_skip_property(spec, item) {
                    continue;
                }
            }

            // resolve this property's effective groups, remembering the
            // enclosing mapping for propagation into the nested type
            let mut groups: Option<GroupSpec> = model.groups().cloned();
            let mut previous: Option<GroupSpec> = None;
            let nested_entry = model.groups().and_then(|s| s.nested_for(&item.name)).cloned();
            if let Some(nested) = nested_entry {
                previous = model.groups().cloned();
                groups = Some(nested);
            } else if let Some(remembered) = self.previous_groups.get(&identity).cloned() {
                let uses = match item.types.first() {
                    Some(ty) => self.uses_groups(&ty.name),
                    None => None,
                };
                groups = match uses {
                    Some(false) => None,
                    _ if self.naming.is_some() => Some(GroupSpec::of([DEFAULT_GROUP])),
                    _ => Some(remembered),
                };
            }
            let groups = normalized(groups.as_ref());

            let name = match self.naming {
                Some(strategy) => strategy.translate_name(item),
                None => item
                    .serialized_name
                    .clone()
                    .unwrap_or_else(|| item.name.clone()),
            };

            // a property without a reflection handle is located by name
            // alone; override resolution is skipped for it only
            let node_name = match &item.reflection {
                Some(handle) => overrides.property_name(handle, &name),
                None => name.clone(),
            };
            {
                let property = tree::get_property(schema, &node_name);
                if let Some(handle) = &item.reflection {
                    overrides.update_property(handle, property, groups.as_ref());
                }
                // manual override wins outright
                if property.is_set("type") || property.is_set("ref") {
                    continue;
                }
            }

            if item.types.is_empty() {
                // no resolvable type: withdraw the auto-created node rather
                // than emitting an empty schema
                log::debug!("withdrawing property {}::{}", class, item.name);
                tree::remove_indexed_item(
                    schema,
                    NodeKind::Property,
                    &Value::String(node_name.clone()),
                );
                continue;
            }
            if item.types.len() > 1 {
                return Err(AppError::TypeInferenceAmbiguous {
                    class: class.to_string(),
                    property: item.name.clone(),
                });
            }

            let ctx = ItemContext {
                class,
                property: &item.name,
            };
            let property = tree::get_property(schema, &node_name);
            self.describe_item(
                &ctx,
                &item.types[0],
                property,
                registry,
                groups.as_ref(),
                previous.as_ref(),
            )?;
        }
        Ok(())
    }

    /// Classifies one type descriptor into `node`, recursing through
    /// collection and map parameters.
    fn describe_item(
        &mut self,
        ctx: &ItemContext<'_>,
        ty: &TypeDescriptor,
        node: &mut Node,
        registry: &mut dyn ModelRegistry,
        groups: Option<&GroupSpec>,
        previous: Option<&GroupSpec>,
    ) -> AppResult<()> {
        if let Some((nested, is_hash)) = nested_collection_type(ty) {
            if is_hash {
                node.set("type", "object");
                // a hash of untyped arrays is a free-form object
                if nested.name == "array" && nested.params.is_empty() {
                    node.set("additionalProperties", true);
                    return Ok(());
                }
                let values = tree::get_child(node, NodeKind::AdditionalProperties);
                return self.describe_item(ctx, nested, values, registry, groups, previous);
            }
            node.set("type", "array");
            let items = tree::get_child(node, NodeKind::Items);
            return self.describe_item(ctx, nested, items, registry, groups, previous);
        }

        let name = ty.name.as_str();
        if COLLECTION_TYPES.contains(&name) {
            if name == "array" {
                // bare untyped array: open-ended object
                node.set("type", "object");
                node.set("additionalProperties", true);
                return Ok(());
            }
            return Err(AppError::TypeInferenceMissing {
                class: ctx.class.to_string(),
                property: ctx.property.to_string(),
            });
        }
        if UNSUPPORTED_TYPES.contains(&name) {
            return Err(AppError::UnsupportedType {
                class: ctx.class.to_string(),
                property: ctx.property.to_string(),
                kind: name.to_string(),
            });
        }

        match name {
            "bool" | "boolean" => node.set("type", "boolean"),
            "string" => node.set("type", "string"),
            "int" | "integer" => node.set("type", "integer"),
            "float" | "double" => {
                node.set("type", "number");
                node.set("format", name);
            }
            _ if self.source.is_datetime(name) => {
                node.set("type", "string");
                node.set("format", "date-time");
            }
            _ if self.source.class_exists(name) => {
                let model = Model::new(name, groups.cloned());
                let reference = registry.register(&model)?;
                node.set("ref", reference);
                if let Some(previous) = previous {
                    self.previous_groups
                        .insert(model.identity(), previous.clone());
                }
            }
            _ => {
                // custom handler types have no class here; the caller may
                // rely on a manual override already present
                log::warn!(
                    "cannot infer a schema for type \"{}\" of {}::{}",
                    name,
                    ctx.class,
                    ctx.property
                );
            }
        }
        Ok(())
    }

    /// Whether `class`'s metadata uses group filtering below the default
    /// group. Memoized; unresolvable classes are cached as unknown so the
    /// lookup is not retried.
    fn uses_groups(&mut self, class: &str) -> Option<bool> {
        if let Some(cached) = self.uses_groups_cache.get(class) {
            return *cached;
        }
        let result = self.source.metadata_for_class(class).map(|metadata| {
            metadata
                .properties
                .iter()
                .any(|p| !p.groups.is_empty() && p.groups != [DEFAULT_GROUP])
        });
        self.uses_groups_cache.insert(class.to_string(), result);
        result
    }
}

/// For a parametrized collection type, the nested element type and whether
/// the collection is a hash (string-keyed map).
fn nested_collection_type(ty: &TypeDescriptor) -> Option<(&TypeDescriptor, bool)> {
    if !COLLECTION_TYPES.contains(&ty.name.as_str()) {
        return None;
    }
    match ty.params.len() {
        0 => None,
        1 => Some((&ty.params[0], false)),
        _ => Some((&ty.params[1], true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        ClassMetadata, NoOverrides, PropertyHandle, PropertyMetadata, StaticMetadataSource,
    };
    use crate::registry::SchemaRegistry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Registry double that records every registration.
    #[derive(Default)]
    struct RecordingRegistry {
        models: Vec<Model>,
    }

    impl ModelRegistry for RecordingRegistry {
        fn register(&mut self, model: &Model) -> AppResult<String> {
            self.models.push(model.clone());
            let short = model.class().rsplit('\\').next().unwrap_or(model.class());
            Ok(format!("#/components/schemas/{}", short))
        }
    }

    fn point_source() -> StaticMetadataSource {
        StaticMetadataSource::new().with_class(
            ClassMetadata::new("Point")
                .with_property(
                    PropertyMetadata::new("Point", "x").with_type(TypeDescriptor::new("int")),
                )
                .with_property(
                    PropertyMetadata::new("Point", "y").with_type(TypeDescriptor::new("int")),
                ),
        )
    }

    #[test]
    fn test_describe_plain_object() {
        let source = point_source();
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("Point", None), &mut registry, &mut schema)
            .unwrap();
        assert_eq!(
            schema.to_value().unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "x": {"type": "integer"},
                    "y": {"type": "integer"}
                }
            })
        );
        assert!(registry.models.is_empty());
    }

    #[test]
    fn test_describe_is_idempotent() {
        let source = point_source();
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = SchemaRegistry::new();
        let model = Model::new("Point", None);
        let mut first = Node::new(NodeKind::Schema);
        let mut second = Node::new(NodeKind::Schema);
        describer.describe(&model, &mut registry, &mut first).unwrap();
        describer.describe(&model, &mut registry, &mut second).unwrap();
        assert_eq!(first.to_value().unwrap(), second.to_value().unwrap());
    }

    #[test]
    fn test_nested_object_registers_once() {
        let source = point_source().with_class(
            ClassMetadata::new("Box")
                .with_property(PropertyMetadata::new("Box", "items").with_type(
                    TypeDescriptor::array_of(TypeDescriptor::new("Point")),
                ))
                .with_property(
                    PropertyMetadata::new("Box", "origin").with_type(TypeDescriptor::new("Point")),
                ),
        );
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = SchemaRegistry::new();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("Box", None), &mut registry, &mut schema)
            .unwrap();
        let value = schema.to_value().unwrap();
        assert_eq!(value["properties"]["items"]["type"], json!("array"));
        assert_eq!(
            value["properties"]["items"]["items"]["$ref"],
            json!("#/components/schemas/Point")
        );
        // second reference reuses the first registration
        assert_eq!(
            value["properties"]["origin"]["$ref"],
            json!("#/components/schemas/Point")
        );
        assert_eq!(
            registry.definition_name(&Model::new("Point", None)),
            Some("Point")
        );
    }

    #[test]
    fn test_string_keyed_map() {
        let source = StaticMetadataSource::new().with_class(
            ClassMetadata::new("Counts").with_property(
                PropertyMetadata::new("Counts", "values")
                    .with_type(TypeDescriptor::map_of(TypeDescriptor::new("int"))),
            ),
        );
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("Counts", None), &mut registry, &mut schema)
            .unwrap();
        assert_eq!(
            schema.to_value().unwrap()["properties"]["values"],
            json!({"type": "object", "additionalProperties": {"type": "integer"}})
        );
    }

    #[test]
    fn test_bare_array_is_free_form() {
        let source = StaticMetadataSource::new().with_class(
            ClassMetadata::new("Bag").with_property(
                PropertyMetadata::new("Bag", "stuff").with_type(TypeDescriptor::new("array")),
            ),
        );
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("Bag", None), &mut registry, &mut schema)
            .unwrap();
        assert_eq!(
            schema.to_value().unwrap()["properties"]["stuff"],
            json!({"type": "object", "additionalProperties": true})
        );
    }

    #[test]
    fn test_datetime_property() {
        let source = StaticMetadataSource::new().with_class(
            ClassMetadata::new("Event").with_property(
                PropertyMetadata::new("Event", "at").with_type(TypeDescriptor::new("DateTime")),
            ),
        );
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("Event", None), &mut registry, &mut schema)
            .unwrap();
        assert_eq!(
            schema.to_value().unwrap()["properties"]["at"],
            json!({"type": "string", "format": "date-time"})
        );
    }

    #[test]
    fn test_withdrawal_of_untyped_property() {
        let source = StaticMetadataSource::new().with_class(
            ClassMetadata::new("Partial")
                .with_property(
                    PropertyMetadata::new("Partial", "known")
                        .with_type(TypeDescriptor::new("string")),
                )
                .with_property(PropertyMetadata::new("Partial", "mystery")),
        );
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("Partial", None), &mut registry, &mut schema)
            .unwrap();
        let value = schema.to_value().unwrap();
        assert_eq!(
            value["properties"],
            json!({"known": {"type": "string"}}),
            "withdrawn property must be absent from the output"
        );
    }

    #[test]
    fn test_override_supremacy() {
        struct TypeOverride;
        impl OverrideReader for TypeOverride {
            fn update_property(
                &self,
                property: &PropertyHandle,
                node: &mut Node,
                _groups: Option<&GroupSpec>,
            ) {
                if property.name == "x" {
                    node.set("type", "string");
                    node.set("format", "custom");
                }
            }
        }
        let source = point_source();
        let overrides = TypeOverride;
        let mut describer = ModelDescriber::new(&source, &overrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("Point", None), &mut registry, &mut schema)
            .unwrap();
        let value = schema.to_value().unwrap();
        // the manual type survives inference untouched
        assert_eq!(
            value["properties"]["x"],
            json!({"type": "string", "format": "custom"})
        );
        assert_eq!(value["properties"]["y"], json!({"type": "integer"}));
    }

    #[test]
    fn test_override_renames_property() {
        struct Renamer;
        impl OverrideReader for Renamer {
            fn property_name(&self, _property: &PropertyHandle, default: &str) -> String {
                format!("{}_renamed", default)
            }
        }
        let source = point_source();
        let overrides = Renamer;
        let mut describer = ModelDescriber::new(&source, &overrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("Point", None), &mut registry, &mut schema)
            .unwrap();
        let value = schema.to_value().unwrap();
        assert!(value["properties"]["x_renamed"].is_object());
    }

    #[test]
    fn test_missing_reflection_skips_overrides() {
        struct Renamer;
        impl OverrideReader for Renamer {
            fn property_name(&self, _property: &PropertyHandle, _default: &str) -> String {
                "should_not_appear".to_string()
            }
        }
        let source = StaticMetadataSource::new().with_class(
            ClassMetadata::new("Ghost").with_property(
                PropertyMetadata::new("Ghost", "virtual")
                    .with_type(TypeDescriptor::new("string"))
                    .without_reflection(),
            ),
        );
        let overrides = Renamer;
        let mut describer = ModelDescriber::new(&source, &overrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("Ghost", None), &mut registry, &mut schema)
            .unwrap();
        let value = schema.to_value().unwrap();
        assert!(value["properties"]["virtual"].is_object());
        assert!(value["properties"].get("should_not_appear").is_none());
    }

    #[test]
    fn test_group_filtering() {
        let source = StaticMetadataSource::new().with_class(
            ClassMetadata::new("User")
                .with_property(
                    PropertyMetadata::new("User", "id")
                        .with_type(TypeDescriptor::new("int"))
                        .with_groups(["public"]),
                )
                .with_property(
                    PropertyMetadata::new("User", "secret")
                        .with_type(TypeDescriptor::new("string"))
                        .with_groups(["internal"]),
                ),
        );
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(
                &Model::new("User", Some(GroupSpec::of(["public"]))),
                &mut registry,
                &mut schema,
            )
            .unwrap();
        let value = schema.to_value().unwrap();
        assert!(value["properties"]["id"].is_object());
        assert!(value["properties"].get("secret").is_none());
    }

    #[test]
    fn test_nested_groups_reach_the_registry() {
        let source = StaticMetadataSource::new()
            .with_class(
                ClassMetadata::new("User").with_property(
                    PropertyMetadata::new("User", "address")
                        .with_type(TypeDescriptor::new("Address")),
                ),
            )
            .with_class(
                ClassMetadata::new("Address").with_property(
                    PropertyMetadata::new("Address", "street")
                        .with_type(TypeDescriptor::new("string"))
                        .with_groups(["compact"]),
                ),
            );
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        let spec = GroupSpec::new().with_nested("address", GroupSpec::of(["compact"]));
        describer
            .describe(
                &Model::new("User", Some(spec)),
                &mut registry,
                &mut schema,
            )
            .unwrap();
        assert_eq!(registry.models.len(), 1);
        assert_eq!(registry.models[0].class(), "Address");
        assert_eq!(
            registry.models[0].groups(),
            Some(&GroupSpec::of(["compact"]))
        );
    }

    #[test]
    fn test_no_metadata_is_fatal() {
        let source = StaticMetadataSource::new();
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        let err = describer
            .describe(&Model::new("Nope", None), &mut registry, &mut schema)
            .unwrap_err();
        assert!(matches!(err, AppError::NoMetadataFound { .. }));
    }

    #[test]
    fn test_ambiguous_types_are_fatal() {
        let mut property = PropertyMetadata::new("Poly", "value");
        property.types = vec![TypeDescriptor::new("int"), TypeDescriptor::new("string")];
        let source = StaticMetadataSource::new()
            .with_class(ClassMetadata::new("Poly").with_property(property));
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        let err = describer
            .describe(&Model::new("Poly", None), &mut registry, &mut schema)
            .unwrap_err();
        assert!(matches!(err, AppError::TypeInferenceAmbiguous { .. }));
    }

    #[test]
    fn test_unsupported_type_is_fatal() {
        let source = StaticMetadataSource::new().with_class(
            ClassMetadata::new("Weird").with_property(
                PropertyMetadata::new("Weird", "cb").with_type(TypeDescriptor::new("callable")),
            ),
        );
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        let err = describer
            .describe(&Model::new("Weird", None), &mut registry, &mut schema)
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedType { .. }));
    }

    #[test]
    fn test_collection_without_element_type_is_fatal() {
        let source = StaticMetadataSource::new().with_class(
            ClassMetadata::new("Bag").with_property(
                PropertyMetadata::new("Bag", "items")
                    .with_type(TypeDescriptor::new("ArrayCollection")),
            ),
        );
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        let err = describer
            .describe(&Model::new("Bag", None), &mut registry, &mut schema)
            .unwrap_err();
        assert!(matches!(err, AppError::TypeInferenceMissing { .. }));
    }

    #[test]
    fn test_zero_property_class_is_fine() {
        let source = StaticMetadataSource::new().with_class(ClassMetadata::new("Empty"));
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("Empty", None), &mut registry, &mut schema)
            .unwrap();
        assert_eq!(schema.to_value().unwrap(), json!({"type": "object"}));
    }

    #[test]
    fn test_unresolvable_custom_type_stays_untyped() {
        let source = StaticMetadataSource::new().with_class(
            ClassMetadata::new("Custom").with_property(
                PropertyMetadata::new("Custom", "blob")
                    .with_type(TypeDescriptor::new("VendorBlob")),
            ),
        );
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("Custom", None), &mut registry, &mut schema)
            .unwrap();
        // node exists but carries no inferred type
        assert_eq!(schema.to_value().unwrap()["properties"]["blob"], json!({}));
        assert!(registry.models.is_empty());
    }

    #[test]
    fn test_naming_strategy_decides_exposed_names() {
        struct SnakeUpper;
        impl crate::metadata::NamingStrategy for SnakeUpper {
            fn translate_name(&self, property: &PropertyMetadata) -> String {
                property.name.to_uppercase()
            }
        }
        let source = point_source();
        let naming = SnakeUpper;
        let mut describer =
            ModelDescriber::new(&source, &NoOverrides).with_naming_strategy(&naming);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("Point", None), &mut registry, &mut schema)
            .unwrap();
        let value = schema.to_value().unwrap();
        assert!(value["properties"]["X"].is_object());
        assert!(value["properties"].get("x").is_none());
    }

    #[test]
    fn test_serialized_name_wins_without_strategy() {
        let source = StaticMetadataSource::new().with_class(
            ClassMetadata::new("User").with_property(
                PropertyMetadata::new("User", "emailAddress")
                    .with_type(TypeDescriptor::new("string"))
                    .with_serialized_name("email_address"),
            ),
        );
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        let mut registry = RecordingRegistry::default();
        let mut schema = Node::new(NodeKind::Schema);
        describer
            .describe(&Model::new("User", None), &mut registry, &mut schema)
            .unwrap();
        assert!(schema.to_value().unwrap()["properties"]["email_address"].is_object());
    }

    #[test]
    fn test_supports_reports_metadata_presence() {
        let source = point_source();
        let describer = ModelDescriber::new(&source, &NoOverrides);
        assert!(describer.supports(&Model::new("Point", None)));
        assert!(!describer.supports(&Model::new("Nope", None)));
    }

    #[test]
    fn test_uses_groups_cache_tri_state() {
        let source = StaticMetadataSource::new()
            .with_class(
                ClassMetadata::new("Grouped").with_property(
                    PropertyMetadata::new("Grouped", "a")
                        .with_type(TypeDescriptor::new("string"))
                        .with_groups(["g"]),
                ),
            )
            .with_class(
                ClassMetadata::new("Plain").with_property(
                    PropertyMetadata::new("Plain", "a").with_type(TypeDescriptor::new("string")),
                ),
            );
        let mut describer = ModelDescriber::new(&source, &NoOverrides);
        assert_eq!(describer.uses_groups("Grouped"), Some(true));
        assert_eq!(describer.uses_groups("Plain"), Some(false));
        assert_eq!(describer.uses_groups("Unknown"), None);
        // cached, including the unknown entry
        assert_eq!(describer.uses_groups_cache.len(), 3);
        assert_eq!(describer.uses_groups("Unknown"), None);
        assert_eq!(describer.uses_groups_cache.len(), 3);
    }
}
