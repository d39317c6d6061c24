//! Relationship annotation parser
//!
//! Parses the payload of `uses` / `has` / `owns` / `composedOf` tags:
//!
//! ```text
//! <target>
//! <target> <source label> <target label> [edge label words...] [oneway]
//! ```
//!
//! A lone target is a one-way relationship without labels. `-` in a label
//! position stands for an empty label. Exactly two words is an error.

use chumsky::Parser as _;
use tracing::trace;

use crate::core::chumsky_utils::words;
use crate::core::{DiagramError, DocumentationSource, Entity, EntityId};

const EMPTY_LABEL: &str = "-";
const ONEWAY: &str = "oneway";
const SEE_ALSO_LABEL: &str = "&#171;see also&#187;";

/// Syntactic content of a relationship payload, target not yet resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipSpec {
    pub target: String,
    pub source_label: String,
    pub target_label: String,
    pub edge_label: String,
    pub oneway: bool,
}

impl RelationshipSpec {
    /// Split and validate a payload without consulting any documentation
    pub fn parse(payload: &str) -> Result<Self, DiagramError> {
        let mut args: Vec<&str> = words()
            .parse(payload)
            .into_result()
            .map_err(|errors| {
                DiagramError::relationship_syntax(payload, format!("{:?}", errors))
            })?;

        // Positions 1..=3 are the two endpoint labels and the first edge label word.
        for arg in args.iter_mut().take(4).skip(1) {
            if *arg == EMPTY_LABEL {
                *arg = "";
            }
        }

        match args.as_slice() {
            [] => Err(DiagramError::relationship_syntax(payload, "empty relationship")),
            [target] => Ok(Self {
                target: target.to_string(),
                source_label: String::new(),
                target_label: String::new(),
                edge_label: String::new(),
                oneway: true,
            }),
            [_, _] => Err(DiagramError::relationship_syntax(
                payload,
                "expected a target alone or a target with two endpoint labels",
            )),
            [target, source_label, target_label, rest @ ..] => {
                let (label_words, oneway) = match rest.split_last() {
                    Some((last, init)) if last.eq_ignore_ascii_case(ONEWAY) => (init, true),
                    _ => (rest, false),
                };
                let edge_label = label_words
                    .iter()
                    .filter(|w| !w.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" ");

                Ok(Self {
                    target: target.to_string(),
                    source_label: source_label.to_string(),
                    target_label: target_label.to_string(),
                    edge_label,
                    oneway,
                })
            }
        }
    }
}

/// A labelled edge from some source entity to `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub target: EntityId,
    pub source_label: String,
    pub target_label: String,
    pub edge_label: String,
    pub oneway: bool,
    /// Derived from a cross reference rather than declared
    pub informal: bool,
}

impl Relationship {
    /// Unlabelled edge, used for generalization and realization
    pub fn structural(target: EntityId) -> Self {
        Self {
            target,
            source_label: String::new(),
            target_label: String::new(),
            edge_label: String::new(),
            oneway: true,
            informal: false,
        }
    }

    /// Undirected "see also" edge between two cross-referencing types
    pub fn see_also(target: EntityId) -> Self {
        Self {
            target,
            source_label: String::new(),
            target_label: String::new(),
            edge_label: SEE_ALSO_LABEL.to_string(),
            oneway: false,
            informal: true,
        }
    }

    fn from_spec(spec: RelationshipSpec, target: EntityId) -> Self {
        Self {
            target,
            source_label: spec.source_label,
            target_label: spec.target_label,
            edge_label: spec.edge_label,
            oneway: spec.oneway,
            informal: false,
        }
    }
}

/// Parses relationship payloads and resolves their targets
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipParser;

impl RelationshipParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse `payload` and resolve its target against `source`
    ///
    /// The target may name a type or a package. An unknown name fails the
    /// same way a malformed payload does.
    pub fn parse<'s, S: DocumentationSource>(
        &self,
        payload: &str,
        source: &'s S,
    ) -> Result<(Entity<'s>, Relationship), DiagramError> {
        let spec = RelationshipSpec::parse(payload)?;
        let target = source
            .resolve(&spec.target)
            .ok_or_else(|| DiagramError::unresolved_target(payload, spec.target.clone()))?;

        trace!(target = %target.name(), oneway = spec.oneway, "Parsed relationship");
        let relationship = Relationship::from_spec(spec, target.id());
        Ok((target, relationship))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DocModel, PackageDoc, TypeDoc};

    fn source() -> DocModel {
        DocModel::new(
            vec![PackageDoc::new("x").with_type(TypeDoc::new("x.Y"))],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_single_token() {
        let spec = RelationshipSpec::parse("x.Y").unwrap();
        assert_eq!(spec.target, "x.Y");
        assert_eq!(spec.source_label, "");
        assert_eq!(spec.target_label, "");
        assert_eq!(spec.edge_label, "");
        assert!(spec.oneway);
    }

    #[test]
    fn test_full_payload_with_oneway() {
        let spec = RelationshipSpec::parse("x.Y label1 label2 flows oneway").unwrap();
        assert_eq!(spec.target, "x.Y");
        assert_eq!(spec.source_label, "label1");
        assert_eq!(spec.target_label, "label2");
        assert_eq!(spec.edge_label, "flows");
        assert!(spec.oneway);
    }

    #[test]
    fn test_oneway_is_case_insensitive() {
        let spec = RelationshipSpec::parse("x.Y 1 * holds many ONEWAY").unwrap();
        assert_eq!(spec.edge_label, "holds many");
        assert!(spec.oneway);
    }

    #[test]
    fn test_without_oneway() {
        let spec = RelationshipSpec::parse("x.Y 1 0..* contains  many\n items").unwrap();
        assert_eq!(spec.edge_label, "contains many items");
        assert!(!spec.oneway);
    }

    #[test]
    fn test_three_tokens_has_empty_edge_label() {
        let spec = RelationshipSpec::parse("x.Y 1 *").unwrap();
        assert_eq!(spec.edge_label, "");
        assert!(!spec.oneway);
    }

    #[test]
    fn test_oneway_in_target_label_position_is_a_label() {
        let spec = RelationshipSpec::parse("x.Y a oneway").unwrap();
        assert_eq!(spec.target_label, "oneway");
        assert!(!spec.oneway);
    }

    #[test]
    fn test_dash_means_empty() {
        let spec = RelationshipSpec::parse("x.Y - - - oneway").unwrap();
        assert_eq!(spec.source_label, "");
        assert_eq!(spec.target_label, "");
        assert_eq!(spec.edge_label, "");
        assert!(spec.oneway);
    }

    #[test]
    fn test_two_tokens_rejected() {
        let err = RelationshipSpec::parse("x.Y label1").unwrap_err();
        assert!(matches!(err, DiagramError::RelationshipSyntax { .. }));
        assert!(err.to_string().contains("x.Y label1"));

        // Still two tokens once the dash is blanked out
        assert!(RelationshipSpec::parse("x.Y -").is_err());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            RelationshipSpec::parse("   "),
            Err(DiagramError::RelationshipSyntax { .. })
        ));
    }

    #[test]
    fn test_resolves_target() {
        let source = source();
        let (target, rel) = RelationshipParser::new()
            .parse("x.Y - - owns oneway", &source)
            .unwrap();
        assert_eq!(target.name(), "x.Y");
        assert_eq!(rel.target, EntityId::Type("x.Y".to_string()));
        assert_eq!(rel.edge_label, "owns");
        assert!(!rel.informal);
    }

    #[test]
    fn test_resolves_package_target() {
        let source = source();
        let (target, _) = RelationshipParser::new().parse("x", &source).unwrap();
        assert!(matches!(target, Entity::Package(_)));
    }

    #[test]
    fn test_unknown_target() {
        let source = source();
        let err = RelationshipParser::new()
            .parse("x.Missing 1 *", &source)
            .unwrap_err();
        match err {
            DiagramError::UnresolvedTarget { payload, name } => {
                assert_eq!(payload, "x.Missing 1 *");
                assert_eq!(name, "x.Missing");
            }
            other => panic!("Expected unresolved target, got {other:?}"),
        }
    }

    #[test]
    fn test_see_also_relationship() {
        let rel = Relationship::see_also(EntityId::Type("p.B".to_string()));
        assert!(rel.informal);
        assert!(!rel.oneway);
        assert!(rel.edge_label.contains("see also"));
    }
}
