//! # Model Requests
//!
//! A model is a (class, group specification) pair. Its identity is the
//! canonical form the registry deduplicates on; the engine never synthesizes
//! reference names itself.

use crate::groups::GroupSpec;
use std::fmt;

/// A request to describe one class under one group specification.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    class: String,
    groups: Option<GroupSpec>,
}

impl Model {
    /// Creates a model request.
    pub fn new(class: impl Into<String>, groups: Option<GroupSpec>) -> Self {
        Model {
            class: class.into(),
            groups,
        }
    }

    /// The requested class name.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The requested group specification, if any.
    pub fn groups(&self) -> Option<&GroupSpec> {
        self.groups.as_ref()
    }

    /// The normalized identity of this request. Two requests are the same
    /// model iff their identities are equal: group order is irrelevant and
    /// the `Default` singleton equals "no filtering".
    pub fn identity(&self) -> ModelIdentity {
        let groups = match &self.groups {
            Some(spec) if !spec.is_default_only() => format!("!{}", canonical(spec)),
            _ => String::new(),
        };
        ModelIdentity(format!("{}{}", self.class, groups))
    }
}

/// The canonical, order-insensitive rendering of a model request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelIdentity(String);

impl ModelIdentity {
    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Renders a group specification with sorted scalars and sorted nested keys.
fn canonical(spec: &GroupSpec) -> String {
    let mut scalars: Vec<&str> = spec.groups().iter().map(String::as_str).collect();
    scalars.sort_unstable();
    scalars.dedup();
    let mut nested: Vec<(&str, &GroupSpec)> = spec.nested().collect();
    nested.sort_unstable_by_key(|(name, _)| *name);
    let mut out = format!("[{}]", scalars.join(","));
    for (name, inner) in nested {
        out.push_str(&format!("{}:{}", name, canonical(inner)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_ignores_group_order() {
        let a = Model::new("User", Some(GroupSpec::of(["a", "b"])));
        let b = Model::new("User", Some(GroupSpec::of(["b", "a"])));
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn test_default_singleton_equals_no_filtering() {
        let plain = Model::new("User", None);
        let default = Model::new("User", Some(GroupSpec::of(["Default"])));
        assert_eq!(plain.identity(), default.identity());
    }

    #[test]
    fn test_different_groups_differ() {
        let a = Model::new("User", Some(GroupSpec::of(["admin"])));
        let b = Model::new("User", None);
        assert_ne!(a.identity(), b.identity());
        let c = Model::new("Account", Some(GroupSpec::of(["admin"])));
        assert_ne!(a.identity(), c.identity());
    }

    #[test]
    fn test_nested_entries_participate_in_identity() {
        let a = Model::new(
            "User",
            Some(GroupSpec::of(["a"]).with_nested("address", GroupSpec::of(["compact"]))),
        );
        let b = Model::new("User", Some(GroupSpec::of(["a"])));
        assert_ne!(a.identity(), b.identity());
    }
}
