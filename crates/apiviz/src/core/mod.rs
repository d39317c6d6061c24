//! Core abstractions for diagram generation
//!
//! The documentation source seam, entity vocabulary, configuration, errors
//! and logging shared by every diagram kind.

pub mod chumsky_utils;
mod entity;
mod error;
pub mod logging;
mod renderer;
mod source;
mod types;

pub use entity::*;
pub use error::*;
pub use logging::*;
pub use renderer::*;
pub use source::*;
pub use types::*;
