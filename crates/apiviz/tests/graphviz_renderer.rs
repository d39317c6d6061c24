//! Graphviz renderer coverage
//!
//! Node styling, edge styling per relationship kind and output stability.

use apiviz::plugins::class::{DiagramModel, GraphvizRenderer};
use apiviz::{
    DiagramOptions, DocModel, DocumentationSource, FontConfig, MethodDoc, Orientation, PackageDoc,
    RenderConfig, Renderer, TypeDoc, TypeKind,
};

fn source() -> DocModel {
    DocModel::new(
        vec![
            PackageDoc::new("app")
                .with_tag("stereotype", "facade")
                .with_type(
                    TypeDoc::new("app.Registry")
                        .with_tag("group", "core api")
                        .with_tag("uses", "app.Loader 1 * reads from")
                        .with_tag("has", "app.Entry 1 * entries")
                        .with_tag("owns", "lib.Cache - - ")
                        .with_tag("composedOf", "app.Entry 1 1..* parts oneway"),
                )
                .with_type(TypeDoc::new("app.Loader").with_kind(TypeKind::Interface))
                .with_type(
                    TypeDoc::new("app.Entry")
                        .with_tag("stereotype", "value \"object\""),
                ),
            PackageDoc::new("lib"),
        ],
        vec![TypeDoc::new("lib.Cache").with_method(MethodDoc::new("get").with_static())],
    )
    .unwrap()
}

fn render(source: &DocModel, options: DiagramOptions) -> String {
    let mut model = DiagramModel::for_package(source, "app", options);
    for ty in source.types() {
        model.add_type(ty).unwrap();
    }
    GraphvizRenderer::new().render(&model).unwrap()
}

#[test]
fn test_each_kind_has_its_own_style() {
    let dot = render(&source(), DiagramOptions::package_summary());

    assert!(dot.contains(
        "\"app_Registry\" -> \"app_Loader\" [arrowhead=open, style=dashed, headlabel=\"*\", taillabel=\"1\", label=\"reads from\"];"
    ));
    assert!(dot.contains(
        "\"app_Registry\" -> \"app_Entry\" [arrowhead=none, headlabel=\"*\", taillabel=\"1\", label=\"entries\"];"
    ));
    assert!(dot.contains(
        "\"app_Registry\" -> \"lib_Cache\" [arrowhead=open, arrowtail=ediamond, dir=both, headlabel=\"\", taillabel=\"\", label=\"\"];"
    ));
    assert!(dot.contains(
        "\"app_Registry\" -> \"app_Entry\" [arrowhead=open, arrowtail=diamond, dir=both, headlabel=\"1..*\", taillabel=\"1\", label=\"parts\"];"
    ));
}

#[test]
fn test_edge_sections_follow_kind_order() {
    let dot = render(&source(), DiagramOptions::package_summary());
    let dependency = dot.find("label=\"reads from\"").unwrap();
    let association = dot.find("label=\"entries\"").unwrap();
    let aggregation = dot.find("arrowtail=ediamond").unwrap();
    let composition = dot.find("arrowtail=diamond").unwrap();
    assert!(dependency < association);
    assert!(association < aggregation);
    assert!(aggregation < composition);
}

#[test]
fn test_nodes_precede_edges() {
    let dot = render(&source(), DiagramOptions::package_summary());
    let last_node = dot.rfind("fillcolor=").unwrap();
    let first_edge = dot.find(" -> ").unwrap();
    assert!(last_node < first_edge);
}

#[test]
fn test_external_types_are_dimmed() {
    let dot = render(&source(), DiagramOptions::package_summary());
    assert!(dot.contains(
        "\"lib_Cache\" [label=\"&#171;static&#187;\\nCache\\n(lib)\", style=\"filled\", color=\"gray\", fontcolor=\"gray30\", fillcolor=\"white\"];"
    ));

    let undimmed = render(&source(), DiagramOptions::package_summary().with_auto_dimout(false));
    assert!(undimmed.contains(
        "\"lib_Cache\" [label=\"&#171;static&#187;\\nCache\\n(lib)\", style=\"filled\", color=\"black\""
    ));
}

#[test]
fn test_custom_stereotype_is_escaped() {
    let dot = render(&source(), DiagramOptions::package_summary());
    assert!(dot.contains("[label=\"&#171;value \\\"object\\\"&#187;\\nEntry\""));
}

#[test]
fn test_package_nodes() {
    let source = source();
    let mut model = DiagramModel::new(&source, DiagramOptions::overview());
    for pkg in source.packages() {
        model.add_package(pkg);
    }
    let dot = GraphvizRenderer::new().render(&model).unwrap();

    assert!(dot.contains("\"app\" [label=\"&#171;facade&#187;\\napp\", style=\"filled\""));
    assert!(dot.contains("\"lib\" [label=\"lib\", style=\"filled\", color=\"black\""));
    assert!(!dot.contains(" -> "));
}

#[test]
fn test_configured_fonts() {
    let source = DocModel::new(
        vec![PackageDoc::new("a").with_type(TypeDoc::new("a.Base").with_abstract())],
        vec![],
    )
    .unwrap();
    let mut model = DiagramModel::for_package(&source, "a", DiagramOptions::overview());
    model.add_type_named("a.Base").unwrap();

    let renderer =
        GraphvizRenderer::with_config(RenderConfig::new(FontConfig::new("arial", "ariali")));
    let dot = renderer.render(&model).unwrap();
    assert!(dot.contains("edge [fontsize=10, fontname=\"arial\", style=\"setlinewidth(0.6)\"];"));
    assert!(dot.contains("\"a_Base\" [label=\"Base\", fontname=\"ariali\""));
}

#[test]
fn test_abstract_interface_is_not_italic() {
    let source = DocModel::new(
        vec![PackageDoc::new("a").with_type(
            TypeDoc::new("a.Api").with_kind(TypeKind::Interface).with_abstract(),
        )],
        vec![],
    )
    .unwrap();
    let mut model = DiagramModel::for_package(&source, "a", DiagramOptions::overview());
    model.add_type_named("a.Api").unwrap();
    let dot = GraphvizRenderer::new().render(&model).unwrap();
    assert!(!dot.contains("Helvetica-Oblique"));
}

#[test]
fn test_orientation_sets_rankdir() {
    let landscape = render(&source(), DiagramOptions::package_summary());
    assert!(landscape.contains("rankdir=RL;\n"));

    let portrait = render(
        &source(),
        DiagramOptions::package_summary().with_orientation(Orientation::Portrait),
    );
    assert!(portrait.contains("rankdir=BT;\n"));
}

#[test]
fn test_serialization_is_idempotent() {
    let source = source();
    let mut model = DiagramModel::for_package(&source, "app", DiagramOptions::class_diagram());
    for ty in source.types() {
        model.add_type(ty).unwrap();
    }
    let renderer = GraphvizRenderer::new();
    let first = renderer.render(&model).unwrap();
    let second = renderer.render(&model).unwrap();
    assert_eq!(first, second);
    assert!(first.ends_with("}\n"));
}

#[test]
fn test_output_independent_of_declaration_order() {
    let forward = source();
    let reversed = {
        let mut packages: Vec<PackageDoc> = forward.packages().cloned().collect();
        packages.reverse();
        for pkg in &mut packages {
            pkg.types.reverse();
        }
        DocModel::new(packages, forward.external_types().to_vec()).unwrap()
    };
    assert_eq!(
        render(&forward, DiagramOptions::package_summary()),
        render(&reversed, DiagramOptions::package_summary())
    );
}
