//! Core error types for diagram construction
//!
//! Every failure the diagram engine can signal is a variant here. Nothing is
//! recovered locally: the caller decides whether to skip one diagram or abort
//! the whole run.

use thiserror::Error;

/// Core error types for diagram construction
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Invalid relationship syntax: {payload} ({reason})")]
    RelationshipSyntax { payload: String, reason: String },

    #[error("Invalid relationship syntax: {payload} (Unknown package or class name: {name})")]
    UnresolvedTarget { payload: String, name: String },

    #[error("Unknown entity: {name}")]
    UnknownEntity { name: String },

    #[error("Model error: {message}")]
    ModelError { message: String },

    #[error("Renderer error: {message}")]
    RendererError { message: String },

    #[error("Graphviz exited with a non-zero return value: {status}")]
    RendererExit { status: i32 },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new relationship syntax error
    pub fn relationship_syntax(payload: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RelationshipSyntax {
            payload: payload.into(),
            reason: reason.into(),
        }
    }

    /// Create a new unresolved relationship target error
    pub fn unresolved_target(payload: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnresolvedTarget {
            payload: payload.into(),
            name: name.into(),
        }
    }

    /// Create a new unknown entity error
    pub fn unknown_entity(name: impl Into<String>) -> Self {
        Self::UnknownEntity { name: name.into() }
    }

    /// Create a new model error
    pub fn model_error(message: impl Into<String>) -> Self {
        Self::ModelError {
            message: message.into(),
        }
    }

    /// Create a new renderer error
    pub fn renderer_error(message: impl Into<String>) -> Self {
        Self::RendererError {
            message: message.into(),
        }
    }

    /// True for malformed or unresolvable relationship annotations.
    ///
    /// These point at a documentation defect rather than a tooling problem.
    pub fn is_annotation_error(&self) -> bool {
        matches!(
            self,
            Self::RelationshipSyntax { .. } | Self::UnresolvedTarget { .. }
        )
    }
}

impl From<serde_json::Error> for DiagramError {
    fn from(err: serde_json::Error) -> Self {
        Self::model_error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_syntax_error() {
        let error =
            DiagramError::relationship_syntax("x.Y label1", "expected 1 or at least 3 tokens");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Invalid relationship syntax"));
        assert!(error_msg.contains("x.Y label1"));
        assert!(error.is_annotation_error());
    }

    #[test]
    fn test_unresolved_target_error() {
        let error = DiagramError::unresolved_target("x.Nope - - uses", "x.Nope");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unknown package or class name"));
        assert!(error_msg.contains("x.Nope"));
        assert!(error.is_annotation_error());
    }

    #[test]
    fn test_unknown_entity_error() {
        let error = DiagramError::unknown_entity("a.Missing");
        assert_eq!(error.to_string(), "Unknown entity: a.Missing");
        assert!(!error.is_annotation_error());
    }

    #[test]
    fn test_renderer_exit_error() {
        let error = DiagramError::RendererExit { status: 2 };
        assert!(error.to_string().contains("non-zero return value: 2"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: DiagramError = json_err.into();
        assert!(format!("{}", error).starts_with("Model error"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: DiagramError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
