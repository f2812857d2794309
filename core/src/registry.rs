//! # Model Registry
//!
//! Owns reference identity for described models: the first `register` call
//! for an identity allocates a stable definition name and queues the model;
//! every later call for the same identity returns the same reference without
//! re-describing anything, which is what terminates cyclic class graphs.
//!
//! Description itself happens in [`SchemaRegistry::flush`], after the
//! triggering call has returned, so the engine and the registry recurse
//! through the queue rather than through the call stack.

use crate::describer::ModelDescriber;
use crate::error::AppResult;
use crate::model::{Model, ModelIdentity};
use crate::oas::node::Node;
use crate::oas::tree;
use indexmap::IndexMap;
use std::collections::HashSet;

/// The authority for model reference identity.
pub trait ModelRegistry {
    /// Returns the `$ref` string for a model. Identical identities yield
    /// identical references across one document build.
    fn register(&mut self, model: &Model) -> AppResult<String>;
}

/// A queue-draining registry writing definitions under
/// `#/components/schemas`.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    names: IndexMap<ModelIdentity, String>,
    models: IndexMap<ModelIdentity, Model>,
    described: HashSet<ModelIdentity>,
    taken: HashSet<String>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The definition name allocated for a model, if it was registered.
    pub fn definition_name(&self, model: &Model) -> Option<&str> {
        self.names.get(&model.identity()).map(String::as_str)
    }

    /// Allocates a document-unique definition name from the class short
    /// name, suffixing a counter when distinct identities collide on it.
    fn allocate_name(&mut self, class: &str) -> String {
        let base = class
            .rsplit(|c| c == ':' || c == '\\' || c == '.')
            .next()
            .unwrap_or(class)
            .to_string();
        let mut name = base.clone();
        let mut counter = 2;
        while self.taken.contains(&name) {
            name = format!("{}{}", base, counter);
            counter += 1;
        }
        self.taken.insert(name.clone());
        name
    }

    /// Describes every queued model into `api`'s `components/schemas`,
    /// including models registered while draining. Each identity is
    /// described at most once, so this terminates on cyclic class graphs.
    pub fn flush(&mut self, describer: &mut ModelDescriber<'_>, api: &mut Node) -> AppResult<()> {
        loop {
            let pending: Vec<(ModelIdentity, Model)> = self
                .models
                .iter()
                .filter(|(identity, _)| !self.described.contains(*identity))
                .map(|(identity, model)| (identity.clone(), model.clone()))
                .collect();
            if pending.is_empty() {
                return Ok(());
            }
            for (identity, model) in pending {
                // mark before describing: recursion back into register must
                // see this identity as settled
                self.described.insert(identity.clone());
                let Some(name) = self.names.get(&identity).cloned() else {
                    continue;
                };
                let schema = tree::get_definition(api, &name);
                describer.describe(&model, self, schema)?;
            }
        }
    }
}

impl ModelRegistry for SchemaRegistry {
    fn register(&mut self, model: &Model) -> AppResult<String> {
        let identity = model.identity();
        if let Some(name) = self.names.get(&identity) {
            return Ok(format!("#/components/schemas/{}", name));
        }
        let name = self.allocate_name(model.class());
        log::debug!("registered model {} as {}", identity, name);
        self.names.insert(identity.clone(), name.clone());
        self.models.insert(identity, model.clone());
        Ok(format!("#/components/schemas/{}", name))
    }
}
