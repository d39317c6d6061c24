//! Diagram set orchestration
//!
//! Turns a documentation source into every diagram published with it:
//! one overview, one summary per package and one diagram per class. Each
//! diagram owns its model, so the whole set is built in parallel.

use std::fmt;

use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, info, span, warn, Level};

use crate::core::{DiagramError, DiagramOptions, DocumentationSource, Entity, TagKind};
use crate::plugins::class::{DiagramModel, GraphvizRenderer};

/// Name of the overview diagram
pub const OVERVIEW_NAME: &str = "overview-summary";
/// File stem of a package summary inside the package directory
pub const PACKAGE_SUMMARY_NAME: &str = "package-summary";

/// What one diagram shows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    /// Every documented package
    Overview,
    /// Every visible type of one package
    PackageSummary { package: String },
    /// One type and its direct neighbourhood
    Class { package: String, qualified_name: String },
}

/// A diagram to build, with the output name it is published under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagramJob {
    /// `/`-separated output path without extension
    pub name: String,
    pub kind: DiagramKind,
}

impl DiagramJob {
    pub fn overview() -> Self {
        Self {
            name: OVERVIEW_NAME.to_string(),
            kind: DiagramKind::Overview,
        }
    }

    pub fn package_summary(package: impl Into<String>) -> Self {
        let package = package.into();
        Self {
            name: format!("{}/{}", package.replace('.', "/"), PACKAGE_SUMMARY_NAME),
            kind: DiagramKind::PackageSummary { package },
        }
    }

    pub fn class(package: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        Self {
            name: qualified_name.replace('.', "/"),
            kind: DiagramKind::Class {
                package: package.into(),
                qualified_name,
            },
        }
    }

    /// Behaviour flags of this diagram's mode
    pub fn options(&self) -> DiagramOptions {
        match self.kind {
            DiagramKind::Overview => DiagramOptions::overview(),
            DiagramKind::PackageSummary { .. } => DiagramOptions::package_summary(),
            DiagramKind::Class { .. } => DiagramOptions::class_diagram(),
        }
    }
}

impl fmt::Display for DiagramJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Outcome of one diagram: DOT text or the reason it could not be built
#[derive(Debug)]
pub struct DiagramOutput {
    pub name: String,
    pub result: Result<String>,
}

impl DiagramOutput {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Builds and serializes diagrams for one documentation source
pub struct Orchestrator<'a, S: DocumentationSource> {
    source: &'a S,
    renderer: GraphvizRenderer,
}

impl<'a, S: DocumentationSource> Orchestrator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self::with_renderer(source, GraphvizRenderer::new())
    }

    pub fn with_renderer(source: &'a S, renderer: GraphvizRenderer) -> Self {
        Self { source, renderer }
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    /// Every diagram of the source, in publication order
    ///
    /// Hidden types get neither a class diagram nor a place in their
    /// package summary.
    pub fn jobs(&self) -> Vec<DiagramJob> {
        let mut jobs = vec![DiagramJob::overview()];
        jobs.extend(
            self.source
                .packages()
                .map(|pkg| DiagramJob::package_summary(pkg.name.as_str())),
        );
        for pkg in self.source.packages() {
            jobs.extend(
                pkg.types
                    .iter()
                    .filter(|ty| !is_hidden(Entity::Type(*ty)))
                    .map(|ty| DiagramJob::class(pkg.name.as_str(), ty.qualified_name.as_str())),
            );
        }
        debug!(count = jobs.len(), "Planned diagram jobs");
        jobs
    }

    /// Populate the model for one job
    pub fn build(&self, job: &DiagramJob) -> Result<DiagramModel<'a, S>> {
        let options = job.options();
        match &job.kind {
            DiagramKind::Overview => {
                let mut model = DiagramModel::new(self.source, options);
                for pkg in self.source.packages() {
                    model.add_package(pkg);
                }
                Ok(model)
            }
            DiagramKind::PackageSummary { package } => {
                let pkg = self
                    .source
                    .find_package(package)
                    .ok_or_else(|| DiagramError::unknown_entity(package.as_str()))?;
                let mut model = DiagramModel::for_package(self.source, package, options);
                for ty in pkg.types.iter().filter(|ty| !is_hidden(Entity::Type(*ty))) {
                    model.add_type(ty)?;
                }
                Ok(model)
            }
            DiagramKind::Class {
                package,
                qualified_name,
            } => {
                let ty = self
                    .source
                    .find_type(qualified_name)
                    .ok_or_else(|| DiagramError::unknown_entity(qualified_name.as_str()))?;
                let mut model = DiagramModel::for_package(self.source, package, options);
                model.add_type(ty)?;
                model.add_landmark(Entity::Type(ty));
                Ok(model)
            }
        }
    }

    /// Build and serialize one diagram
    pub fn render(&self, job: &DiagramJob) -> Result<String> {
        let diagram_span = span!(Level::INFO, "diagram", name = %job.name);
        let _enter = diagram_span.enter();

        let model = self.build(job)?;
        let dot = self.renderer.render_model(&model)?;
        info!(
            nodes = model.node_count(),
            edges = model.edge_count(),
            "Built diagram"
        );
        Ok(dot)
    }

    /// Build every diagram of the source in parallel
    pub fn render_all(&self) -> Vec<DiagramOutput> {
        self.render_jobs(&self.jobs())
    }

    /// Build `jobs` in parallel; results keep the order of `jobs`
    ///
    /// A failing diagram is reported in its own output and never stops the
    /// others.
    pub fn render_jobs(&self, jobs: &[DiagramJob]) -> Vec<DiagramOutput> {
        let set_span = span!(Level::INFO, "diagram_set", jobs = jobs.len());
        let _enter = set_span.enter();

        let outputs: Vec<DiagramOutput> = jobs
            .par_iter()
            .map(|job| {
                let result = self.render(job);
                if let Err(e) = &result {
                    warn!(diagram = %job.name, error = %e, "Diagram failed");
                }
                DiagramOutput {
                    name: job.name.clone(),
                    result,
                }
            })
            .collect();

        let failed = outputs.iter().filter(|o| !o.is_ok()).count();
        info!(total = outputs.len(), failed, "Diagram set complete");
        outputs
    }
}

fn is_hidden(entity: Entity<'_>) -> bool {
    entity.has_tag(TagKind::Hidden)
}
