//! # Serialization Groups
//!
//! A group specification filters which properties of a class are exposed.
//! It is either absent (no filtering), a flat set of group names, or a
//! per-property mapping whose entries scope a nested specification to that
//! property's type. Both shapes can occur together.

use crate::metadata::PropertyMetadata;
use indexmap::IndexMap;

/// The implicit group every ungrouped property belongs to.
pub const DEFAULT_GROUP: &str = "Default";

/// A (possibly property-scoped) serialization group specification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSpec {
    groups: Vec<String>,
    nested: IndexMap<String, GroupSpec>,
}

impl GroupSpec {
    /// An empty specification (matches nothing but `Default`-less lookups).
    pub fn new() -> Self {
        Self::default()
    }

    /// A flat specification from a list of group names.
    pub fn of<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GroupSpec {
            groups: groups.into_iter().map(Into::into).collect(),
            nested: IndexMap::new(),
        }
    }

    /// Adds one scalar group name.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Scopes a nested specification to the property named `property`.
    pub fn with_nested(mut self, property: impl Into<String>, nested: GroupSpec) -> Self {
        self.nested.insert(property.into(), nested);
        self
    }

    /// The scalar group names.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// The nested specification scoped to `property`, if any.
    pub fn nested_for(&self, property: &str) -> Option<&GroupSpec> {
        self.nested.get(property)
    }

    /// The nested entries, in insertion order.
    pub fn nested(&self) -> impl Iterator<Item = (&str, &GroupSpec)> {
        self.nested.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether no scalar groups and no nested entries are present.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.nested.is_empty()
    }

    /// Whether a scalar group is requested.
    pub fn contains(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Drops the nested entries, keeping only the scalar group names.
    pub fn scalars_only(&self) -> GroupSpec {
        GroupSpec {
            groups: self.groups.clone(),
            nested: IndexMap::new(),
        }
    }

    /// Whether this is exactly the `Default` singleton with no nesting.
    pub fn is_default_only(&self) -> bool {
        self.nested.is_empty() && self.groups.len() == 1 && self.groups[0] == DEFAULT_GROUP
    }
}

/// Normalizes an effective group specification: keep scalar entries only and
/// collapse the `Default` singleton to "no filtering".
pub fn normalized(spec: Option<&GroupSpec>) -> Option<GroupSpec> {
    let flat = spec?.scalars_only();
    if flat.is_default_only() {
        return None;
    }
    Some(flat)
}

/// The visibility filter: whether a property is excluded by the requested
/// specification.
///
/// A property-scoped nested entry always keeps its property. A property with
/// no declared groups belongs to `Default` only. Otherwise the property is
/// skipped iff its declared groups share nothing with the requested scalars.
pub fn should_skip_property(spec: &GroupSpec, property: &PropertyMetadata) -> bool {
    if spec.nested_for(&property.name).is_some() {
        return false;
    }
    if property.groups.is_empty() {
        return !spec.contains(DEFAULT_GROUP);
    }
    !property.groups.iter().any(|g| spec.contains(g))
}
