//! Graphviz renderer
//!
//! Serializes a [`DiagramModel`] into DOT text for the `dot` layout tool.
//! Output is fully determined by the model: nodes come out group by group,
//! edges kind by kind, so serializing the same model twice is byte-identical.

use std::fmt::Write as _;

use anyhow::Result;
use tracing::{debug, span, Level};

use super::database::{DiagramModel, RelationshipKind};
use super::relationship::Relationship;
use super::stereotype::Stereotype;
use crate::core::{DocumentationSource, Entity, EntityId, RenderConfig, Renderer};

const LANDMARK_FILL: &str = "khaki1";
const DEFAULT_FILL: &str = "white";
const DIMOUT_LINE: &str = "gray";
const DEFAULT_LINE: &str = "black";
const DIMOUT_FONT: &str = "gray30";
const DEFAULT_FONT: &str = "black";

/// Arrowhead of an edge kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrowHead {
    Fixed(&'static str),
    /// `open` when one-way, `none` otherwise
    Navigable,
}

/// Per-kind edge styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeStyle {
    arrowhead: ArrowHead,
    arrowtail: Option<&'static str>,
    dashed: bool,
    labeled: bool,
}

impl EdgeStyle {
    fn of(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::Generalization => Self {
                arrowhead: ArrowHead::Fixed("enormal"),
                arrowtail: None,
                dashed: false,
                labeled: false,
            },
            RelationshipKind::Realization => Self {
                arrowhead: ArrowHead::Fixed("enormal"),
                arrowtail: None,
                dashed: true,
                labeled: false,
            },
            RelationshipKind::Dependency => Self {
                arrowhead: ArrowHead::Fixed("open"),
                arrowtail: None,
                dashed: true,
                labeled: true,
            },
            RelationshipKind::Association => Self {
                arrowhead: ArrowHead::Navigable,
                arrowtail: None,
                dashed: false,
                labeled: true,
            },
            RelationshipKind::Aggregation => Self {
                arrowhead: ArrowHead::Fixed("open"),
                arrowtail: Some("ediamond"),
                dashed: false,
                labeled: true,
            },
            RelationshipKind::Composition => Self {
                arrowhead: ArrowHead::Fixed("open"),
                arrowtail: Some("diamond"),
                dashed: false,
                labeled: true,
            },
        }
    }
}

/// Escape text for a double-quoted DOT string
pub fn escape_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Display name of an entity, relative to `package_prefix`
///
/// Packages keep their full name. A type loses the prefix and, if a scope
/// remains, renders as `Simple\n(scope)` using the DOT line break escape.
pub fn node_label(entity: &Entity<'_>, package_prefix: &str) -> String {
    let name = entity.name();
    if !entity.is_type() {
        return escape_label(name);
    }

    let name = name.strip_prefix(package_prefix).unwrap_or(name);
    match name.rsplit_once('.') {
        Some((scope, simple)) => format!("{}\\n({})", escape_label(simple), escape_label(scope)),
        None => escape_label(name),
    }
}

fn quoted_id(id: &EntityId) -> String {
    format!("\"{}\"", escape_label(&id.node_id()))
}

/// DOT serializer for class and package diagrams
#[derive(Debug, Clone, Default)]
pub struct GraphvizRenderer {
    config: RenderConfig,
}

impl GraphvizRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Serialize `model` into a complete DOT document
    pub fn render_model<S: DocumentationSource>(
        &self,
        model: &DiagramModel<'_, S>,
    ) -> Result<String> {
        let render_span = span!(
            Level::DEBUG,
            "render_dot",
            nodes = model.node_count(),
            edges = model.edge_count()
        );
        let _enter = render_span.enter();

        let mut out = String::new();
        self.write_header(&mut out, model)?;
        self.write_nodes(&mut out, model)?;
        for kind in RelationshipKind::ALL {
            let style = EdgeStyle::of(kind);
            for (source, rel) in model.edges(kind) {
                write_edge(&mut out, source, rel, style)?;
            }
        }
        out.push_str("}\n");

        debug!(bytes = out.len(), "Rendered DOT document");
        Ok(out)
    }

    fn write_header<S: DocumentationSource>(
        &self,
        out: &mut String,
        model: &DiagramModel<'_, S>,
    ) -> Result<()> {
        let font = escape_label(&self.config.font.normal);
        writeln!(out, "digraph __G__ {{")?;
        writeln!(out, "rankdir={};", model.options().orientation.rankdir())?;
        out.push_str(
            "ranksep=0.3;\n\
             nodesep=0.3;\n\
             mclimit=10;\n\
             outputorder=edgesfirst;\n\
             center=1;\n\
             remincross=true;\n\
             searchsize=1024;\n",
        );
        writeln!(
            out,
            "edge [fontsize=10, fontname=\"{}\", style=\"setlinewidth(0.6)\"];",
            font
        )?;
        writeln!(
            out,
            "node [shape=box, fontsize=10, fontname=\"{}\", width=0.1, height=0.1, \
             style=\"setlinewidth(0.6)\"];",
            font
        )?;
        Ok(())
    }

    fn write_nodes<S: DocumentationSource>(
        &self,
        out: &mut String,
        model: &DiagramModel<'_, S>,
    ) -> Result<()> {
        // Groups only order the node list; they are not drawn as clusters.
        for (_, members) in model.grouping().groups() {
            for id in members {
                if let Some(entity) = model.entity(id) {
                    self.write_node(out, model, &entity)?;
                }
            }
        }
        Ok(())
    }

    fn write_node<S: DocumentationSource>(
        &self,
        out: &mut String,
        model: &DiagramModel<'_, S>,
        entity: &Entity<'_>,
    ) -> Result<()> {
        let id = entity.id();
        let dimmed = model.is_dimout(&id);

        let mut label = String::new();
        if let Some(stereotype) = Stereotype::classify(entity) {
            write!(label, "&#171;{}&#187;\\n", escape_label(stereotype.as_str()))?;
        }
        label.push_str(&node_label(entity, model.package_prefix()));

        write!(out, "{} [label=\"{}\"", quoted_id(&id), label)?;
        if entity
            .as_type()
            .is_some_and(|ty| ty.is_abstract && !ty.is_interface())
        {
            write!(out, ", fontname=\"{}\"", escape_label(&self.config.font.italic))?;
        }
        writeln!(
            out,
            ", style=\"filled\", color=\"{}\", fontcolor=\"{}\", fillcolor=\"{}\"];",
            if dimmed { DIMOUT_LINE } else { DEFAULT_LINE },
            if dimmed { DIMOUT_FONT } else { DEFAULT_FONT },
            if model.is_landmark(&id) { LANDMARK_FILL } else { DEFAULT_FILL },
        )?;
        Ok(())
    }
}

fn write_edge(
    out: &mut String,
    source: &EntityId,
    rel: &Relationship,
    style: EdgeStyle,
) -> Result<()> {
    let arrowhead = match style.arrowhead {
        ArrowHead::Fixed(head) => head,
        ArrowHead::Navigable if rel.oneway => "open",
        ArrowHead::Navigable => "none",
    };

    write!(
        out,
        "{} -> {} [arrowhead={}",
        quoted_id(source),
        quoted_id(&rel.target),
        arrowhead
    )?;
    if let Some(tail) = style.arrowtail {
        write!(out, ", arrowtail={}, dir=both", tail)?;
    }
    if style.dashed || rel.informal {
        out.push_str(", style=dashed");
    }
    if style.labeled {
        write!(
            out,
            ", headlabel=\"{}\", taillabel=\"{}\", label=\"{}\"",
            escape_label(&rel.target_label),
            escape_label(&rel.source_label),
            escape_label(&rel.edge_label)
        )?;
    }
    out.push_str("];\n");
    Ok(())
}

impl<'a, S: DocumentationSource> Renderer<DiagramModel<'a, S>> for GraphvizRenderer {
    type Output = String;

    fn render(&self, database: &DiagramModel<'a, S>) -> Result<Self::Output> {
        self.render_model(database)
    }

    fn name(&self) -> &'static str {
        "graphviz"
    }

    fn format(&self) -> &'static str {
        "dot"
    }
}
