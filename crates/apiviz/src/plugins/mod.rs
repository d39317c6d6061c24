//! Diagram implementations
//!
//! The class plugin holds the diagram engine; the orchestrator turns a whole
//! documentation source into the set of diagrams published alongside it.

pub mod class;
pub mod orchestrator;

pub use class::*;
pub use orchestrator::*;
