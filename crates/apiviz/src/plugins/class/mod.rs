//! Class diagram plugin
//!
//! Builds UML-like package and class diagrams from documentation entities
//! and serializes them as Graphviz DOT.

mod database;
mod grouping;
mod relationship;
mod renderer;
mod stereotype;

pub use database::{DiagramModel, RelationshipKind, ANNOTATION_INTERFACE, IMPLICIT_SUPERTYPES};
pub use grouping::{
    group_id, is_external, sanitize_group_name, Grouping, DEFAULT_GROUP, EXTERNAL_GROUP,
};
pub use relationship::{Relationship, RelationshipParser, RelationshipSpec};
pub use renderer::{escape_label, node_label, GraphvizRenderer};
pub use stereotype::Stereotype;
