//! # Schema Tree Layer
//!
//! The typed document tree (nodes, nesting descriptors) and the generic
//! operations over it (find-or-create, deep merge).

/// Deep merge of JSON/YAML/node sources into a node.
pub mod merge;

/// Per-kind nesting descriptor tables.
pub mod nesting;

/// Node kinds and the node tree itself.
pub mod node;

/// Find-or-create tree operations.
pub mod tree;

pub use merge::{merge, merge_node, merge_yaml};
pub use nesting::{nesting, Nesting, Slot};
pub use node::{Node, NodeKind};
