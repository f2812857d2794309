#![deny(missing_docs)]

//! # apidoc-core
//!
//! Turns class-level type metadata into a normalized OpenAPI-style schema
//! document: a recursive model description engine over an externally
//! supplied metadata source, writing into a typed schema tree through
//! descriptor-driven find-or-create and deep-merge operations.

/// Shared error types.
pub mod error;

/// The model description engine.
pub mod describer;

/// Serialization group specifications and filtering.
pub mod groups;

/// Property metadata and external collaborator traits.
pub mod metadata;

/// Model requests and their normalized identity.
pub mod model;

/// Schema tree: nodes, nesting descriptors, find-or-create, merge.
pub mod oas;

/// Model reference registry.
pub mod registry;

pub use describer::ModelDescriber;
pub use error::{AppError, AppResult};
pub use groups::{GroupSpec, DEFAULT_GROUP};
pub use metadata::{
    ClassMetadata, MetadataSource, NamingStrategy, NoOverrides, OverrideReader, PropertyHandle,
    PropertyMetadata, StaticMetadataSource, TypeDescriptor,
};
pub use model::{Model, ModelIdentity};
pub use oas::{merge, merge_node, merge_yaml, nesting, Nesting, Node, NodeKind, Slot};
pub use registry::{ModelRegistry, SchemaRegistry};
