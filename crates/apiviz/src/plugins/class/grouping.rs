//! Entity grouping and visibility
//!
//! Every registered entity lands in exactly one named group, and may be
//! flagged as a landmark (highlighted) or dimmed out (outside the local
//! package scope).

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::core::{DiagramOptions, Entity, EntityId, TagKind};

/// Group for entities inside the package prefix without a `group` tag
pub const DEFAULT_GROUP: &str = "default";
/// Group for types outside the package prefix without a `group` tag
pub const EXTERNAL_GROUP: &str = "external";

/// Collapse runs of whitespace, `.`, `-` and `$` into a single `_`
pub fn sanitize_group_name(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.trim().chars() {
        if c.is_whitespace() || matches!(c, '.' | '-' | '$') {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// True for types whose qualified name lies outside `package_prefix`
///
/// Packages are never external.
pub fn is_external(entity: &Entity<'_>, package_prefix: &str) -> bool {
    entity.is_type() && !entity.name().starts_with(package_prefix)
}

/// Group identifier for an entity
pub fn group_id(entity: &Entity<'_>, package_prefix: &str) -> String {
    if let Some(tag) = entity.tag(TagKind::Group) {
        sanitize_group_name(&tag.text)
    } else if is_external(entity, package_prefix) {
        EXTERNAL_GROUP.to_string()
    } else {
        DEFAULT_GROUP.to_string()
    }
}

/// Group membership plus landmark and dimout sets for one diagram
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    package_prefix: String,
    auto_landmark: bool,
    auto_dimout: bool,
    groups: BTreeMap<String, BTreeSet<EntityId>>,
    landmarks: BTreeSet<EntityId>,
    dimouts: BTreeSet<EntityId>,
}

impl Grouping {
    pub fn new(package_prefix: impl Into<String>, options: &DiagramOptions) -> Self {
        Self {
            package_prefix: package_prefix.into(),
            auto_landmark: options.auto_landmark,
            auto_dimout: options.auto_dimout,
            ..Self::default()
        }
    }

    pub fn package_prefix(&self) -> &str {
        &self.package_prefix
    }

    /// Assign `entity` to its group and apply automatic highlighting.
    ///
    /// A landmark-tagged entity is never auto-dimmed, even when it lies
    /// outside the package prefix. Calling this twice is harmless.
    pub fn register(&mut self, entity: &Entity<'_>) {
        let id = entity.id();
        let group = group_id(entity, &self.package_prefix);
        trace!(entity = %id, group = %group, "Registering entity");
        self.groups.entry(group).or_default().insert(id.clone());

        if self.auto_landmark && entity.has_tag(TagKind::Landmark) {
            self.landmarks.insert(id);
            return;
        }

        if self.auto_dimout && is_external(entity, &self.package_prefix) {
            self.dimouts.insert(id);
        }
    }

    pub fn add_landmark(&mut self, id: EntityId) {
        self.landmarks.insert(id);
    }

    pub fn add_dimout(&mut self, id: EntityId) {
        self.dimouts.insert(id);
    }

    pub fn is_landmark(&self, id: &EntityId) -> bool {
        self.landmarks.contains(id)
    }

    pub fn is_dimout(&self, id: &EntityId) -> bool {
        self.dimouts.contains(id)
    }

    /// Name of the group holding `id`, if registered
    pub fn group_of(&self, id: &EntityId) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, members)| members.contains(id))
            .map(|(name, _)| name.as_str())
    }

    /// Groups in name order, members in canonical order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &BTreeSet<EntityId>)> {
        self.groups.iter().map(|(name, members)| (name.as_str(), members))
    }

    pub fn landmarks(&self) -> impl Iterator<Item = &EntityId> {
        self.landmarks.iter()
    }

    pub fn dimouts(&self) -> impl Iterator<Item = &EntityId> {
        self.dimouts.iter()
    }
}
