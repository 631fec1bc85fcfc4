//! # Pagesmith Document
//!
//! The page tree: typed nodes, per-viewport override layers, recursive
//! traversals and the JSON shape persisted by collaborators.

pub mod error;
pub mod id_generator;
pub mod node;
pub mod serializer;
mod tree;

pub use error::{DocumentError, DocumentResult};
pub use id_generator::{get_document_seed, IdGenerator};
pub use node::{
    ContentOverrides, Layout, Node, NodeContent, NodeType, Overrides, Props, StyleOverrides,
    ViewportClass, ROOT_ID,
};
pub use serializer::{
    forest_from_json, from_json, parse_document, to_json, to_json_pretty, OutlineSerializer,
};
