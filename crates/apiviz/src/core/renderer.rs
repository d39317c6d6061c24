//! Core renderer trait for diagram output
//!
//! A renderer turns a fully populated diagram model into the text handed to
//! an external layout tool.

use anyhow::Result;

/// Core trait for diagram renderers
///
/// # Example
/// ```
/// use apiviz::core::{DiagramOptions, DocModel, Renderer};
/// use apiviz::plugins::class::{DiagramModel, GraphvizRenderer};
///
/// let source = DocModel::default();
/// let model = DiagramModel::new(&source, DiagramOptions::overview());
/// let renderer = GraphvizRenderer::new();
/// let dot = renderer.render(&model).unwrap();
/// assert!(dot.starts_with("digraph __G__ {"));
/// ```
pub trait Renderer<D>: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the diagram model into the output format
    fn render(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
