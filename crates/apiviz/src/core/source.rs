//! Documentation source abstraction
//!
//! The diagram engine never walks source code itself. It reads packages and
//! types from a [`DocumentationSource`], which is safe to share between
//! threads so independent diagrams can be built concurrently.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::entity::{Entity, PackageDoc, TypeDoc};
use super::error::DiagramError;

/// Read-only view of a documented code base
pub trait DocumentationSource: Send + Sync {
    /// Look up a type by qualified name, documented or external
    fn find_type(&self, qualified_name: &str) -> Option<&TypeDoc>;

    /// Look up a documented package by name
    fn find_package(&self, name: &str) -> Option<&PackageDoc>;

    /// Documented packages in canonical (name) order
    fn packages(&self) -> impl Iterator<Item = &PackageDoc>;

    /// Package a documented type is declared in
    fn package_of(&self, qualified_name: &str) -> Option<&PackageDoc>;

    /// Documented types, package by package, each in qualified-name order
    fn types(&self) -> impl Iterator<Item = &TypeDoc> {
        self.packages().flat_map(|pkg| pkg.types.iter())
    }

    /// Resolve a name to a type, or failing that to a package
    fn resolve(&self, name: &str) -> Option<Entity<'_>> {
        self.find_type(name)
            .map(Entity::Type)
            .or_else(|| self.find_package(name).map(Entity::Package))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Documented { package: usize, index: usize },
    External(usize),
}

/// In-memory documentation source loaded from JSON
///
/// ```json
/// {
///   "packages": [
///     { "name": "com.example", "types": [ { "qualified_name": "com.example.Foo" } ] }
///   ],
///   "external": [ { "qualified_name": "java.util.List", "kind": "interface" } ]
/// }
/// ```
///
/// `external` types can be referenced and resolved but are never enumerated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocModel {
    #[serde(default)]
    packages: Vec<PackageDoc>,
    #[serde(default)]
    external: Vec<TypeDoc>,
    #[serde(skip)]
    index: HashMap<String, Slot>,
}

impl DocModel {
    /// Build a model, sorting it into canonical order and indexing every type
    pub fn new(packages: Vec<PackageDoc>, external: Vec<TypeDoc>) -> Result<Self, DiagramError> {
        let mut model = Self {
            packages,
            external,
            index: HashMap::new(),
        };
        model.reindex()?;
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, DiagramError> {
        let model: DocModel = serde_json::from_str(json)?;
        model.indexed()
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, DiagramError> {
        let model: DocModel = serde_json::from_reader(reader)?;
        model.indexed()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DiagramError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let model = Self::from_json(&content).map_err(|e| match e {
            DiagramError::ModelError { message } => {
                DiagramError::model_error(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;
        debug!(
            path = %path.display(),
            packages = model.packages.len(),
            types = model.type_count(),
            "Loaded documentation model"
        );
        Ok(model)
    }

    fn indexed(mut self) -> Result<Self, DiagramError> {
        self.reindex()?;
        Ok(self)
    }

    fn reindex(&mut self) -> Result<(), DiagramError> {
        self.packages.sort_by(|a, b| a.name.cmp(&b.name));
        for pkg in &mut self.packages {
            pkg.types.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        }
        self.external.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));

        if let Some(pair) = self.packages.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(DiagramError::model_error(format!(
                "duplicate package: {}",
                pair[0].name
            )));
        }

        self.index.clear();
        for (package, pkg) in self.packages.iter().enumerate() {
            for (index, ty) in pkg.types.iter().enumerate() {
                Self::insert(
                    &mut self.index,
                    &ty.qualified_name,
                    Slot::Documented { package, index },
                )?;
            }
        }
        for (index, ty) in self.external.iter().enumerate() {
            Self::insert(&mut self.index, &ty.qualified_name, Slot::External(index))?;
        }
        Ok(())
    }

    fn insert(
        index: &mut HashMap<String, Slot>,
        name: &str,
        slot: Slot,
    ) -> Result<(), DiagramError> {
        if index.insert(name.to_string(), slot).is_some() {
            return Err(DiagramError::model_error(format!("duplicate type: {}", name)));
        }
        Ok(())
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Number of documented types
    pub fn type_count(&self) -> usize {
        self.packages.iter().map(|pkg| pkg.types.len()).sum()
    }

    pub fn external_types(&self) -> &[TypeDoc] {
        &self.external
    }
}

impl DocumentationSource for DocModel {
    fn find_type(&self, qualified_name: &str) -> Option<&TypeDoc> {
        match self.index.get(qualified_name)? {
            Slot::Documented { package, index } => self.packages[*package].types.get(*index),
            Slot::External(index) => self.external.get(*index),
        }
    }

    fn find_package(&self, name: &str) -> Option<&PackageDoc> {
        self.packages
            .binary_search_by(|pkg| pkg.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.packages[i])
    }

    fn packages(&self) -> impl Iterator<Item = &PackageDoc> {
        self.packages.iter()
    }

    fn package_of(&self, qualified_name: &str) -> Option<&PackageDoc> {
        match self.index.get(qualified_name)? {
            Slot::Documented { package, .. } => self.packages.get(*package),
            Slot::External(_) => None,
        }
    }
}
