//! Code Analyzer Module
//!
//! Turns a source tree into a [`ProjectModel`](crate::types::ProjectModel):
//! - File scanning with hidden/generated directory pruning
//! - Tree-sitter parsing into per-file summaries
//! - Model building with per-file error recovery

pub mod builder;
pub mod parser;
pub mod scanner;

pub use builder::ProjectModelBuilder;
