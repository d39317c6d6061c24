//! Public API and diagram set tests

use apiviz::prelude::*;
use apiviz::{all_diagrams, class_diagram, overview_diagram, package_diagram};

fn source() -> DocModel {
    DocModel::from_json(
        r#"{
            "packages": [
                {
                    "name": "net.core",
                    "tags": [{ "name": "@apiviz.landmark" }],
                    "types": [
                        { "qualified_name": "net.core.Channel", "kind": "interface" },
                        {
                            "qualified_name": "net.core.Pipeline",
                            "tags": [{ "name": "@apiviz.owns", "text": "net.core.Channel" }]
                        },
                        {
                            "qualified_name": "net.core.Internal",
                            "tags": [{ "name": "@apiviz.hidden" }]
                        }
                    ]
                },
                {
                    "name": "net.util",
                    "types": [
                        {
                            "qualified_name": "net.util.Timer",
                            "tags": [{ "name": "@apiviz.uses", "text": "net.core.Channel - - schedules" }],
                            "see": ["net.core.Pipeline"]
                        }
                    ]
                }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_overview_lists_packages() {
    let dot = overview_diagram(&source()).unwrap();
    assert!(dot.contains(
        "\"net_core\" [label=\"net.core\", style=\"filled\", color=\"black\", \
         fontcolor=\"black\", fillcolor=\"khaki1\"];"
    ));
    assert!(dot.contains("\"net_util\" [label=\"net.util\""));
    assert!(!dot.contains("Channel"));
}

#[test]
fn test_package_summary_skips_hidden_types() {
    let dot = package_diagram(&source(), "net.core").unwrap();
    assert!(dot.contains("\"net_core_Pipeline\""));
    assert!(!dot.contains("Internal"));
}

#[test]
fn test_package_summary_dims_foreign_types() {
    let dot = package_diagram(&source(), "net.util").unwrap();
    assert!(dot.contains(
        "\"net_core_Channel\" [label=\"&#171;interface&#187;\\nChannel\\n(net.core)\", style=\"filled\", color=\"gray\""
    ));
    assert!(dot.contains("\"net_util_Timer\" [label=\"Timer\", style=\"filled\", color=\"black\""));
}

#[test]
fn test_class_diagram_highlights_focal_class() {
    let dot = class_diagram(&source(), "net.util.Timer").unwrap();
    assert!(dot.contains("rankdir=BT;"));
    assert!(dot.contains(
        "\"net_util_Timer\" [label=\"Timer\", style=\"filled\", color=\"black\", \
         fontcolor=\"black\", fillcolor=\"khaki1\"];"
    ));
    // Cross reference rendered as an undirected dashed edge
    assert!(
        dot.contains("\"net_core_Pipeline\" -> \"net_util_Timer\" [arrowhead=none, style=dashed")
    );
}

#[test]
fn test_class_diagram_requires_documented_type() {
    let err = class_diagram(&source(), "net.core.Nope").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DiagramError>(),
        Some(DiagramError::UnknownEntity { .. })
    ));
}

#[test]
fn test_all_diagrams_in_publication_order() {
    let names: Vec<_> = all_diagrams(&source())
        .into_iter()
        .map(|output| {
            assert!(output.result.is_ok(), "{} failed", output.name);
            output.name
        })
        .collect();

    assert_eq!(
        names,
        vec![
            "overview-summary",
            "net/core/package-summary",
            "net/util/package-summary",
            "net/core/Channel",
            "net/core/Pipeline",
            "net/util/Timer",
        ]
    );
}

#[test]
fn test_parallel_output_matches_sequential() {
    let source = source();
    let orchestrator = Orchestrator::new(&source);
    let jobs = orchestrator.jobs();

    let parallel = orchestrator.render_jobs(&jobs);
    for (job, output) in jobs.iter().zip(parallel) {
        assert_eq!(job.name, output.name);
        assert_eq!(orchestrator.render(job).unwrap(), output.result.unwrap());
    }
}

#[test]
fn test_job_modes() {
    assert_eq!(DiagramJob::overview().options(), DiagramOptions::overview());
    assert_eq!(
        DiagramJob::package_summary("a").options(),
        DiagramOptions::package_summary()
    );
    let class = DiagramJob::class("a", "a.B");
    assert_eq!(class.options(), DiagramOptions::class_diagram());
    assert!(matches!(class.kind, DiagramKind::Class { .. }));
}
