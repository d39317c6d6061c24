//! Documentation entities
//!
//! Packages and types as the documentation source exposes them, plus the
//! annotation tags attached to them. Entities are immutable: the diagram
//! engine only records facts *about* them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared kind of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Class => write!(f, "class"),
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Enum => write!(f, "enum"),
            TypeKind::Annotation => write!(f, "annotation"),
        }
    }
}

/// Annotation tags the diagram engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Landmark,
    Group,
    Stereotype,
    Uses,
    Has,
    Owns,
    ComposedOf,
    Hidden,
}

impl TagKind {
    /// Match a raw tag name.
    ///
    /// A leading `@` and an `apiviz.` namespace are optional, so `@apiviz.uses`,
    /// `apiviz.uses` and `uses` are the same tag.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let name = name.strip_prefix('@').unwrap_or(name);
        let name = name.strip_prefix("apiviz.").unwrap_or(name);
        match name {
            "landmark" => Some(TagKind::Landmark),
            "group" => Some(TagKind::Group),
            "stereotype" => Some(TagKind::Stereotype),
            "uses" => Some(TagKind::Uses),
            "has" => Some(TagKind::Has),
            "owns" => Some(TagKind::Owns),
            "composedOf" | "composed_of" | "composed-of" => Some(TagKind::ComposedOf),
            "hidden" => Some(TagKind::Hidden),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TagKind::Landmark => "landmark",
            TagKind::Group => "group",
            TagKind::Stereotype => "stereotype",
            TagKind::Uses => "uses",
            TagKind::Has => "has",
            TagKind::Owns => "owns",
            TagKind::ComposedOf => "composedOf",
            TagKind::Hidden => "hidden",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A free-form annotation: a name token and its raw text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub text: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn kind(&self) -> Option<TagKind> {
        TagKind::from_name(&self.name)
    }
}

/// A declared method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDoc {
    pub name: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "constructor")]
    pub is_constructor: bool,
}

impl MethodDoc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            is_constructor: false,
        }
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_constructor(mut self) -> Self {
        self.is_constructor = true;
        self
    }
}

/// A documented (or merely referenced) type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDoc {
    pub qualified_name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub exception: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodDoc>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Informal cross references, by qualified name
    #[serde(default)]
    pub see: Vec<String>,
}

impl TypeDoc {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind: TypeKind::Class,
            exception: false,
            is_abstract: false,
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            tags: Vec::new(),
            see: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_exception(mut self) -> Self {
        self.exception = true;
        self
    }

    pub fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_superclass(mut self, name: impl Into<String>) -> Self {
        self.superclass = Some(name.into());
        self
    }

    pub fn with_interface(mut self, name: impl Into<String>) -> Self {
        self.interfaces.push(name.into());
        self
    }

    pub fn with_method(mut self, method: MethodDoc) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.tags.push(Tag::new(name, text));
        self
    }

    pub fn with_see(mut self, name: impl Into<String>) -> Self {
        self.see.push(name.into());
        self
    }

    /// Name after the last `.`
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit_once('.')
            .map_or(self.qualified_name.as_str(), |(_, simple)| simple)
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

/// A package and the types documented in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDoc {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub types: Vec<TypeDoc>,
}

impl PackageDoc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn with_tag(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.tags.push(Tag::new(name, text));
        self
    }

    pub fn with_type(mut self, ty: TypeDoc) -> Self {
        self.types.push(ty);
        self
    }
}

/// Identity of an entity inside one diagram
///
/// Ordering is the canonical output order: packages first, then types, each
/// by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityId {
    Package(String),
    Type(String),
}

impl EntityId {
    pub fn name(&self) -> &str {
        match self {
            EntityId::Package(name) | EntityId::Type(name) => name,
        }
    }

    /// Graphviz node identifier
    pub fn node_id(&self) -> String {
        self.name().replace('.', "_")
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Borrowed view of a package or a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity<'a> {
    Package(&'a PackageDoc),
    Type(&'a TypeDoc),
}

impl<'a> Entity<'a> {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Package(pkg) => EntityId::Package(pkg.name.clone()),
            Entity::Type(ty) => EntityId::Type(ty.qualified_name.clone()),
        }
    }

    /// Qualified name for types, plain name for packages
    pub fn name(&self) -> &'a str {
        match self {
            Entity::Package(pkg) => &pkg.name,
            Entity::Type(ty) => &ty.qualified_name,
        }
    }

    pub fn tags(&self) -> &'a [Tag] {
        match self {
            Entity::Package(pkg) => &pkg.tags,
            Entity::Type(ty) => &ty.tags,
        }
    }

    /// First tag of the given kind
    pub fn tag(&self, kind: TagKind) -> Option<&'a Tag> {
        self.tags().iter().find(|t| t.kind() == Some(kind))
    }

    pub fn has_tag(&self, kind: TagKind) -> bool {
        self.tag(kind).is_some()
    }

    pub fn as_type(&self) -> Option<&'a TypeDoc> {
        match self {
            Entity::Type(ty) => Some(ty),
            Entity::Package(_) => None,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Entity::Type(_))
    }
}
