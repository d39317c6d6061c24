//! Stereotype inference
//!
//! Structural checks run first, in a fixed order where later matches
//! replace earlier ones; an explicit `stereotype` tag always has the last
//! word.

use std::fmt;

use crate::core::{Entity, TagKind, TypeDoc, TypeKind};

/// Classification label shown above an entity's name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stereotype {
    Interface,
    Exception,
    Annotation,
    Enum,
    /// Every declared (non-constructor) method is static
    Static,
    /// Text of an explicit `stereotype` tag
    Custom(String),
}

impl Stereotype {
    pub fn as_str(&self) -> &str {
        match self {
            Stereotype::Interface => "interface",
            Stereotype::Exception => "exception",
            Stereotype::Annotation => "annotation",
            Stereotype::Enum => "enum",
            Stereotype::Static => "static",
            Stereotype::Custom(text) => text,
        }
    }

    /// Derive the stereotype of an entity, if any
    pub fn classify(entity: &Entity<'_>) -> Option<Stereotype> {
        let structural = entity.as_type().and_then(Self::classify_type);

        match entity.tag(TagKind::Stereotype) {
            Some(tag) => Some(Stereotype::Custom(tag.text.trim().to_string())),
            None => structural,
        }
    }

    fn classify_type(ty: &TypeDoc) -> Option<Stereotype> {
        let interface = ty.is_interface().then_some(Stereotype::Interface);

        if ty.exception {
            Some(Stereotype::Exception)
        } else if ty.kind == TypeKind::Annotation {
            Some(Stereotype::Annotation)
        } else if ty.kind == TypeKind::Enum {
            Some(Stereotype::Enum)
        } else if is_static_only(ty) {
            Some(Stereotype::Static)
        } else {
            interface
        }
    }
}

/// At least one method besides constructors, and all of them static
fn is_static_only(ty: &TypeDoc) -> bool {
    let mut methods = ty.methods.iter().filter(|m| !m.is_constructor).peekable();
    methods.peek().is_some() && methods.all(|m| m.is_static)
}

impl fmt::Display for Stereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
