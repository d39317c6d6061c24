//! Diagram model
//!
//! Accumulates the nodes and typed edges of one diagram. Registering a type
//! pulls in its supertype, interfaces and annotated relationships; nothing is
//! ever removed. One model is built per diagram, serialized once and dropped.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use anyhow::Result;
use tracing::{debug, trace};

use super::grouping::Grouping;
use super::relationship::{Relationship, RelationshipParser};
use crate::core::{
    DiagramError, DiagramOptions, DocumentationSource, Entity, EntityId, PackageDoc, TagKind,
    TypeDoc,
};

/// Implicit supertypes that never appear as generalization targets
pub const IMPLICIT_SUPERTYPES: [&str; 3] =
    ["java.lang.Object", "java.lang.Enum", "java.lang.Annotation"];

/// Interface every annotation type implicitly realizes
pub const ANNOTATION_INTERFACE: &str = "java.lang.annotation.Annotation";

/// Relationship kinds, in rendering order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelationshipKind {
    /// `extends`
    Generalization,
    /// `implements`
    Realization,
    /// `uses`
    Dependency,
    /// `has`
    Association,
    /// `owns`
    Aggregation,
    /// `composedOf`
    Composition,
}

impl RelationshipKind {
    pub const ALL: [RelationshipKind; 6] = [
        RelationshipKind::Generalization,
        RelationshipKind::Realization,
        RelationshipKind::Dependency,
        RelationshipKind::Association,
        RelationshipKind::Aggregation,
        RelationshipKind::Composition,
    ];

    /// Kind declared by a relationship tag
    pub fn from_tag(kind: TagKind) -> Option<Self> {
        match kind {
            TagKind::Uses => Some(RelationshipKind::Dependency),
            TagKind::Has => Some(RelationshipKind::Association),
            TagKind::Owns => Some(RelationshipKind::Aggregation),
            TagKind::ComposedOf => Some(RelationshipKind::Composition),
            _ => None,
        }
    }

    /// Derived from the type hierarchy rather than from tags
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            RelationshipKind::Generalization | RelationshipKind::Realization
        )
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::Generalization => write!(f, "generalization"),
            RelationshipKind::Realization => write!(f, "realization"),
            RelationshipKind::Dependency => write!(f, "dependency"),
            RelationshipKind::Association => write!(f, "association"),
            RelationshipKind::Aggregation => write!(f, "aggregation"),
            RelationshipKind::Composition => write!(f, "composition"),
        }
    }
}

/// Nodes and edges of one diagram
pub struct DiagramModel<'a, S: DocumentationSource> {
    source: &'a S,
    options: DiagramOptions,
    grouping: Grouping,
    parser: RelationshipParser,
    entities: BTreeMap<EntityId, Entity<'a>>,
    edges: BTreeMap<RelationshipKind, BTreeMap<EntityId, Vec<Relationship>>>,
    see_also: BTreeSet<(String, String)>,
    expanded: HashSet<EntityId>,
}

impl<'a, S: DocumentationSource> DiagramModel<'a, S> {
    /// Model without a local package: nothing is considered external
    pub fn new(source: &'a S, options: DiagramOptions) -> Self {
        Self::with_prefix(source, String::new(), options)
    }

    /// Model local to `package`; types outside it are external
    pub fn for_package(source: &'a S, package: &str, options: DiagramOptions) -> Self {
        Self::with_prefix(source, format!("{}.", package), options)
    }

    fn with_prefix(source: &'a S, package_prefix: String, options: DiagramOptions) -> Self {
        Self {
            source,
            options,
            grouping: Grouping::new(package_prefix, &options),
            parser: RelationshipParser::new(),
            entities: BTreeMap::new(),
            edges: BTreeMap::new(),
            see_also: BTreeSet::new(),
            expanded: HashSet::new(),
        }
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    pub fn package_prefix(&self) -> &str {
        self.grouping.package_prefix()
    }

    pub fn grouping(&self) -> &Grouping {
        &self.grouping
    }

    /// Register a package node
    pub fn add_package(&mut self, pkg: &'a PackageDoc) {
        self.register(Entity::Package(pkg));
    }

    /// Register a type together with its supertype, interfaces and tagged
    /// relationships
    pub fn add_type(&mut self, ty: &'a TypeDoc) -> Result<()> {
        self.register_type(ty, true)
    }

    pub fn add_package_named(&mut self, name: &str) -> Result<()> {
        let pkg = self
            .source
            .find_package(name)
            .ok_or_else(|| DiagramError::unknown_entity(name))?;
        self.add_package(pkg);
        Ok(())
    }

    pub fn add_type_named(&mut self, qualified_name: &str) -> Result<()> {
        let ty = self
            .source
            .find_type(qualified_name)
            .ok_or_else(|| DiagramError::unknown_entity(qualified_name))?;
        self.add_type(ty)
    }

    /// Highlight an entity regardless of tags
    pub fn add_landmark(&mut self, entity: Entity<'a>) {
        self.grouping.add_landmark(entity.id());
    }

    /// Dim an entity regardless of scope
    pub fn add_dimout(&mut self, entity: Entity<'a>) {
        self.grouping.add_dimout(entity.id());
    }

    pub fn add_generalization(&mut self, ty: Entity<'a>, supertype: Entity<'a>) {
        self.add_structural(RelationshipKind::Generalization, ty, supertype);
    }

    pub fn add_realization(&mut self, ty: Entity<'a>, interface: Entity<'a>) {
        self.add_structural(RelationshipKind::Realization, ty, interface);
    }

    /// Record a labelled edge and register its target node
    pub fn add_relationship(
        &mut self,
        kind: RelationshipKind,
        source: Entity<'a>,
        target: Entity<'a>,
        relationship: Relationship,
    ) {
        self.register(target);
        trace!(%kind, from = %source.name(), to = %relationship.target, "Adding relationship");
        self.edges
            .entry(kind)
            .or_default()
            .entry(source.id())
            .or_default()
            .push(relationship);
    }

    fn add_structural(&mut self, kind: RelationshipKind, ty: Entity<'a>, supertype: Entity<'a>) {
        let targets = self.edges.entry(kind).or_default().entry(ty.id()).or_default();
        let target = supertype.id();
        if !targets.iter().any(|rel| rel.target == target) {
            trace!(%kind, from = %ty.name(), to = %target, "Adding supertype");
            targets.push(Relationship::structural(target));
        }
    }

    fn register(&mut self, entity: Entity<'a>) {
        self.grouping.register(&entity);
        self.entities.entry(entity.id()).or_insert(entity);
    }

    fn register_type(&mut self, ty: &'a TypeDoc, include_related: bool) -> Result<()> {
        let entity = Entity::Type(ty);
        self.register(entity);

        // A type is expanded at most once, which also stops cycles.
        if include_related && self.expanded.insert(entity.id()) {
            self.add_related(ty)?;
        }
        Ok(())
    }

    fn add_related(&mut self, ty: &'a TypeDoc) -> Result<()> {
        let entity = Entity::Type(ty);

        if let Some(name) = ty.superclass.as_deref() {
            if !IMPLICIT_SUPERTYPES.contains(&name) {
                match self.source.find_type(name) {
                    Some(supertype) => {
                        self.register_type(supertype, false)?;
                        self.add_generalization(entity, Entity::Type(supertype));
                    }
                    None => debug!(
                        ty = %ty.qualified_name,
                        supertype = name,
                        "Supertype not in documentation source"
                    ),
                }
            }
        }

        for name in &ty.interfaces {
            if name == ANNOTATION_INTERFACE {
                continue;
            }
            match self.source.find_type(name) {
                Some(interface) => {
                    self.register_type(interface, false)?;
                    self.add_realization(entity, Entity::Type(interface));
                }
                None => debug!(
                    ty = %ty.qualified_name,
                    interface = %name,
                    "Interface not in documentation source"
                ),
            }
        }

        for tag in &ty.tags {
            let Some(kind) = tag.kind().and_then(RelationshipKind::from_tag) else {
                continue;
            };
            let (target, relationship) = self.parser.parse(&tag.text, self.source)?;
            self.add_relationship(kind, entity, target, relationship);
        }

        if self.options.use_see_tags {
            self.add_see_also(ty)?;
        }
        Ok(())
    }

    /// Derive "see also" edges, one per unordered pair of names
    fn add_see_also(&mut self, ty: &'a TypeDoc) -> Result<()> {
        for name in &ty.see {
            let Some(referenced) = self.source.find_type(name) else {
                trace!(
                    ty = %ty.qualified_name,
                    reference = %name,
                    "Skipping unresolvable cross reference"
                );
                continue;
            };
            self.register_type(referenced, false)?;

            let a = ty.qualified_name.as_str();
            let b = referenced.qualified_name.as_str();
            let (from, to) = match a.cmp(b) {
                std::cmp::Ordering::Less => (ty, referenced),
                std::cmp::Ordering::Greater => (referenced, ty),
                std::cmp::Ordering::Equal => continue,
            };

            let pair = (from.qualified_name.clone(), to.qualified_name.clone());
            if self.see_also.insert(pair) {
                let to = Entity::Type(to);
                self.add_relationship(
                    RelationshipKind::Association,
                    Entity::Type(from),
                    to,
                    Relationship::see_also(to.id()),
                );
            }
        }
        Ok(())
    }

    /// Registered entity by id
    pub fn entity(&self, id: &EntityId) -> Option<Entity<'a>> {
        self.entities.get(id).copied()
    }

    /// Registered entities in canonical order
    pub fn entities(&self) -> impl Iterator<Item = Entity<'a>> + '_ {
        self.entities.values().copied()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn is_landmark(&self, id: &EntityId) -> bool {
        self.grouping.is_landmark(id)
    }

    pub fn is_dimout(&self, id: &EntityId) -> bool {
        self.grouping.is_dimout(id)
    }

    /// Edges of one kind: sources in canonical order, each source's edges in
    /// declaration order
    pub fn edges(
        &self,
        kind: RelationshipKind,
    ) -> impl Iterator<Item = (&EntityId, &Relationship)> {
        self.edges
            .get(&kind)
            .into_iter()
            .flat_map(|by_source| {
                by_source
                    .iter()
                    .flat_map(|(source, rels)| rels.iter().map(move |rel| (source, rel)))
            })
    }

    pub fn node_count(&self) -> usize {
        self.entities.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges
            .values()
            .flat_map(|by_source| by_source.values())
            .map(Vec::len)
            .sum()
    }

    pub fn edge_count_of(&self, kind: RelationshipKind) -> usize {
        self.edges(kind).count()
    }
}
