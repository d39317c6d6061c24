//! APIviz - UML-like class and package diagrams from API documentation
//!
//! Reads a documentation model (packages, types, their hierarchy and
//! free-form annotation tags) and produces Graphviz DOT text ready for the
//! `dot` layout tool.
//!
//! # Quick Start
//!
//! ```rust
//! use apiviz::{overview_diagram, DocModel};
//!
//! let source = DocModel::from_json(
//!     r#"{"packages": [{"name": "com.example", "types": [{"qualified_name": "com.example.Foo"}]}]}"#,
//! ).unwrap();
//! let dot = overview_diagram(&source).unwrap();
//! assert!(dot.contains("label=\"com.example\""));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, populate a diagram model yourself:
//!
//! ```rust
//! use apiviz::prelude::*;
//!
//! let source = DocModel::new(
//!     vec![PackageDoc::new("a")
//!         .with_type(TypeDoc::new("a.B").with_superclass("a.C"))
//!         .with_type(TypeDoc::new("a.C"))],
//!     vec![],
//! ).unwrap();
//!
//! let mut model = DiagramModel::for_package(&source, "a", DiagramOptions::package_summary());
//! model.add_type_named("a.B").unwrap();
//! assert_eq!(model.node_count(), 2);
//! assert_eq!(model.edge_count_of(RelationshipKind::Generalization), 1);
//!
//! let dot = GraphvizRenderer::new().render(&model).unwrap();
//! assert!(dot.contains("\"a_B\" -> \"a_C\" [arrowhead=enormal];"));
//! ```

pub mod core;
pub mod plugins;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        DiagramError, DiagramOptions, DocModel, DocumentationSource, Entity, EntityId,
        FontConfig, MethodDoc, Orientation, PackageDoc, RenderConfig, Renderer, Tag, TagKind,
        TypeDoc, TypeKind,
    };
    pub use crate::plugins::class::{
        DiagramModel, GraphvizRenderer, Relationship, RelationshipKind, RelationshipParser,
        Stereotype,
    };
    pub use crate::plugins::orchestrator::{DiagramJob, DiagramKind, DiagramOutput, Orchestrator};
}

/// DOT text of the overview diagram: every documented package
///
/// # Example
/// ```rust
/// use apiviz::{overview_diagram, DocModel};
///
/// let dot = overview_diagram(&DocModel::default()).unwrap();
/// assert!(dot.starts_with("digraph __G__ {"));
/// ```
pub fn overview_diagram<S: DocumentationSource>(source: &S) -> anyhow::Result<String> {
    plugins::Orchestrator::new(source).render(&plugins::DiagramJob::overview())
}

/// DOT text of one package's summary diagram
pub fn package_diagram<S: DocumentationSource>(
    source: &S,
    package: &str,
) -> anyhow::Result<String> {
    plugins::Orchestrator::new(source).render(&plugins::DiagramJob::package_summary(package))
}

/// DOT text of a single-class diagram
///
/// The class must be documented; its package sets the local scope.
pub fn class_diagram<S: DocumentationSource>(
    source: &S,
    qualified_name: &str,
) -> anyhow::Result<String> {
    let package = source
        .package_of(qualified_name)
        .ok_or_else(|| DiagramError::unknown_entity(qualified_name))?;
    plugins::Orchestrator::new(source).render(&plugins::DiagramJob::class(
        package.name.as_str(),
        qualified_name,
    ))
}

/// Build every diagram of `source` in parallel
///
/// Each output carries its own result; one broken diagram never hides the
/// others.
pub fn all_diagrams<S: DocumentationSource>(source: &S) -> Vec<plugins::DiagramOutput> {
    plugins::Orchestrator::new(source).render_all()
}
